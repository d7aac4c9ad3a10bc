use crate::AppState;
use axum::extract::ws::{Message as Frame, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use log::*;
use realtime::{stats, Broadcaster, Channel, ConnectionId};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::timeout;

/// Subscribe to dog statistics
pub async fn dogs(ws: WebSocketUpgrade, State(app_state): State<AppState>) -> Response {
    upgrade(ws, app_state, Channel::Dogs)
}

/// Subscribe to cat statistics
pub async fn cats(ws: WebSocketUpgrade, State(app_state): State<AppState>) -> Response {
    upgrade(ws, app_state, Channel::Cats)
}

/// Subscribe to server status
pub async fn status(ws: WebSocketUpgrade, State(app_state): State<AppState>) -> Response {
    upgrade(ws, app_state, Channel::Status)
}

fn upgrade(ws: WebSocketUpgrade, app_state: AppState, channel: Channel) -> Response {
    debug!("WebSocket upgrade requested on channel {channel}");
    ws.on_upgrade(move |socket| handle_socket(socket, app_state, channel))
}

/// Unregisters its connection when dropped, so every way out of the connection task,
/// including a panic or cancellation, releases the registry entry.
struct Registration {
    broadcaster: Arc<Broadcaster>,
    connection_id: ConnectionId,
}

impl Drop for Registration {
    fn drop(&mut self) {
        self.broadcaster.unregister_connection(&self.connection_id);
    }
}

/// Owns one connection from upgrade to close.
///
/// The connection is registered before its snapshot is computed, so no broadcast
/// that happens in between is lost. Broadcasts queued meanwhile are written after
/// the snapshot. A failed or timed-out write drops that frame only; the connection
/// ends when the client goes away or shutdown is announced.
async fn handle_socket(socket: WebSocket, app_state: AppState, channel: Channel) {
    let (mut sink, mut stream) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<Frame>();

    let broadcaster = app_state.broadcaster.clone();
    let send_timeout = app_state.config().ws_send_timeout();
    let mut shutdown = broadcaster.shutdown_signal();
    let _registration = Registration {
        connection_id: broadcaster.register_connection(channel, tx),
        broadcaster: Arc::clone(&broadcaster),
    };

    let snapshot = match stats::snapshot(app_state.db_conn_ref(), broadcaster.status(), channel)
        .await
    {
        Ok(message) => message.to_frame().map_err(|e| e.to_string()),
        Err(e) => Err(format!("{e:?}")),
    };

    let delivered = match snapshot {
        Ok(frame) => match timeout(send_timeout, sink.send(frame)).await {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                warn!("Failed to send {channel} snapshot: {e}");
                false
            }
            Err(_) => {
                warn!("Timed out sending {channel} snapshot");
                false
            }
        },
        Err(e) => {
            error!("Failed to build {channel} snapshot: {e}");
            false
        }
    };

    let mut stopping = *shutdown.borrow_and_update();

    if delivered {
        loop {
            if stopping && rx.is_empty() {
                debug!("Closing {channel} connection for shutdown");
                break;
            }

            tokio::select! {
                // Queued frames go out before the shutdown branch is considered, so the
                // final `stopping` status reaches the client.
                biased;

                outbound = rx.recv() => {
                    let Some(frame) = outbound else { break };
                    match timeout(send_timeout, sink.send(frame)).await {
                        Ok(Ok(())) => {}
                        Ok(Err(e)) => debug!("Dropped a {channel} frame, send failed: {e}"),
                        Err(_) => {
                            warn!("Dropped a {channel} frame, send timed out after {send_timeout:?}")
                        }
                    }
                }
                changed = shutdown.changed(), if !stopping => {
                    stopping = changed.is_err() || *shutdown.borrow_and_update();
                }
                inbound = stream.next() => match inbound {
                    Some(Ok(Frame::Close(_))) | None => break,
                    Some(Err(e)) => {
                        debug!("WebSocket receive error on {channel}: {e}");
                        break;
                    }
                    // Clients have nothing to say on these channels.
                    Some(Ok(_)) => {}
                },
            }
        }
    }

    if timeout(send_timeout, sink.close()).await.is_err() {
        debug!("Timed out closing {channel} connection");
    }
}
