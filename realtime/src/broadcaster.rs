use crate::connection::{ConnectionId, ConnectionRegistry, Subscriber};
use crate::message::{Channel, Message};
use crate::status::{RunState, StatusState};
use log::*;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Outcome of delivering one message to the subscribers of one channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishReport {
    pub delivered: usize,
    pub failed: usize,
}

/// Fans messages out to every subscriber of a channel and keeps the server status
/// current while doing so.
///
/// Delivery is best effort: a subscriber whose queue is closed is logged and skipped,
/// and stays registered until its own connection task unregisters it.
pub struct Broadcaster {
    registry: Arc<ConnectionRegistry>,
    status: Arc<StatusState>,
    /// Flips to true once shutdown has been announced.
    stopping: watch::Sender<bool>,
}

impl Broadcaster {
    pub fn new(registry: Arc<ConnectionRegistry>, status: Arc<StatusState>) -> Self {
        let (stopping, _) = watch::channel(false);
        Self {
            registry,
            status,
            stopping,
        }
    }

    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    pub fn status(&self) -> &Arc<StatusState> {
        &self.status
    }

    /// Register a new connection and return its unique ID
    pub fn register_connection(&self, channel: Channel, sender: Subscriber) -> ConnectionId {
        let connection_id = self.registry.register(channel, sender);
        info!(
            "Registered WebSocket connection {} on channel {channel} ({} open)",
            connection_id.as_str(),
            self.registry.count(channel)
        );
        connection_id
    }

    /// Unregister a connection by ID
    pub fn unregister_connection(&self, connection_id: &ConnectionId) {
        if self.registry.unregister(connection_id) {
            info!("Unregistered WebSocket connection {}", connection_id.as_str());
        }
    }

    /// Delivers `message` to every subscriber of `channel`.
    ///
    /// Records activity first. Unless `channel` is the status channel itself, the
    /// refreshed server status is then delivered to the status channel as well.
    pub fn publish(&self, channel: Channel, message: &Message) -> PublishReport {
        self.status.touch();

        let report = self.fan_out(channel, message);
        debug!(
            "Published {} on {channel}: {} delivered, {} failed",
            message.message_type(),
            report.delivered,
            report.failed
        );

        if channel != Channel::Status {
            let status_report =
                self.fan_out(Channel::Status, &Message::ServerStatus(self.status.read()));
            trace!(
                "Cascaded server_status: {} delivered, {} failed",
                status_report.delivered,
                status_report.failed
            );
        }

        report
    }

    /// Records activity and delivers the current server status to the status channel.
    pub fn publish_status(&self) -> PublishReport {
        self.status.touch();
        self.fan_out(Channel::Status, &Message::ServerStatus(self.status.read()))
    }

    /// Marks the server as stopping and tells every status subscriber, then signals
    /// connection tasks to flush their queues and close.
    pub fn announce_shutdown(&self) -> PublishReport {
        self.status.set_status(RunState::Stopping);
        let report = self.publish_status();
        info!(
            "Announced shutdown to {} status subscriber(s)",
            report.delivered
        );
        self.stopping.send_replace(true);
        report
    }

    /// Resolves when shutdown is announced. Connection tasks select on it.
    pub fn shutdown_signal(&self) -> watch::Receiver<bool> {
        self.stopping.subscribe()
    }

    /// Waits up to `grace` for every connection to unregister. Returns false when
    /// some were still open at the deadline.
    pub async fn drain(&self, grace: Duration) -> bool {
        let drained = tokio::time::timeout(grace, async {
            while !self.registry.is_empty() {
                tokio::time::sleep(Duration::from_millis(20)).await;
            }
        })
        .await
        .is_ok();

        if !drained {
            warn!("WebSocket connections still open after {grace:?}, shutting down anyway");
        }
        drained
    }

    fn fan_out(&self, channel: Channel, message: &Message) -> PublishReport {
        let subscribers = self.registry.snapshot(channel);
        if subscribers.is_empty() {
            return PublishReport::default();
        }

        // Serialized once so every subscriber receives the identical frame.
        let frame = match message.to_frame() {
            Ok(frame) => frame,
            Err(e) => {
                error!("Failed to serialize {} message: {e}", message.message_type());
                return PublishReport {
                    delivered: 0,
                    failed: subscribers.len(),
                };
            }
        };

        let results: Vec<(ConnectionId, bool)> = subscribers
            .into_iter()
            .map(|(connection_id, sender)| {
                let sent = sender.send(frame.clone()).is_ok();
                (connection_id, sent)
            })
            .collect();

        let mut report = PublishReport::default();
        for (connection_id, sent) in results {
            if sent {
                report.delivered += 1;
            } else {
                report.failed += 1;
                warn!(
                    "Failed to deliver {} to connection {} on {channel}: connection is closing",
                    message.message_type(),
                    connection_id.as_str()
                );
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::AggregateStats;
    use axum::extract::ws::Message as Frame;
    use events::AnimalKind;
    use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};

    fn broadcaster() -> Broadcaster {
        Broadcaster::new(
            Arc::new(ConnectionRegistry::new()),
            Arc::new(StatusState::new()),
        )
    }

    fn subscribe(broadcaster: &Broadcaster, channel: Channel) -> UnboundedReceiver<Frame> {
        let (tx, rx) = unbounded_channel();
        broadcaster.register_connection(channel, tx);
        rx
    }

    fn text(frame: Frame) -> serde_json::Value {
        match frame {
            Frame::Text(text) => serde_json::from_str(text.as_str()).unwrap(),
            other => panic!("expected a text frame, got {other:?}"),
        }
    }

    fn dog_stats() -> Message {
        Message::stats(
            AnimalKind::Dog,
            AggregateStats {
                current_in_shelter: 1,
                adopted_total: 0,
                returned_total: 0,
                total: 1,
            },
        )
    }

    #[test]
    fn publish_touches_status() {
        let broadcaster = broadcaster();
        assert!(broadcaster.status().read().last_activity.is_none());

        broadcaster.publish(Channel::Dogs, &dog_stats());

        assert!(broadcaster.status().read().last_activity.is_some());
    }

    #[test]
    fn publish_delivers_one_identical_frame_per_subscriber() {
        let broadcaster = broadcaster();
        let mut receivers: Vec<_> = (0..5)
            .map(|_| subscribe(&broadcaster, Channel::Dogs))
            .collect();

        let report = broadcaster.publish(Channel::Dogs, &dog_stats());

        assert_eq!(
            report,
            PublishReport {
                delivered: 5,
                failed: 0
            }
        );
        let frames: Vec<Frame> = receivers
            .iter_mut()
            .map(|rx| rx.try_recv().unwrap())
            .collect();
        assert!(frames.windows(2).all(|pair| pair[0] == pair[1]));
        assert!(receivers.iter_mut().all(|rx| rx.try_recv().is_err()));
    }

    #[test]
    fn publish_skips_closed_subscribers_without_removing_them() {
        let broadcaster = broadcaster();
        let mut alive = subscribe(&broadcaster, Channel::Cats);
        drop(subscribe(&broadcaster, Channel::Cats));

        let cat_stats = Message::stats(AnimalKind::Cat, AggregateStats::default());
        let report = broadcaster.publish(Channel::Cats, &cat_stats);

        assert_eq!(
            report,
            PublishReport {
                delivered: 1,
                failed: 1
            }
        );
        assert!(alive.try_recv().is_ok());
        assert_eq!(broadcaster.registry().count(Channel::Cats), 2);
    }

    #[test]
    fn stats_publish_cascades_status_to_status_channel() {
        let broadcaster = broadcaster();
        let mut status_rx = subscribe(&broadcaster, Channel::Status);
        let mut cats_rx = subscribe(&broadcaster, Channel::Cats);

        broadcaster.publish(Channel::Dogs, &dog_stats());

        let status = text(status_rx.try_recv().unwrap());
        assert_eq!(status["type"], "server_status");
        assert_eq!(
            status["last_activity"],
            serde_json::to_value(broadcaster.status().read().last_activity).unwrap()
        );
        assert!(cats_rx.try_recv().is_err());
    }

    #[test]
    fn status_publish_does_not_cascade_again() {
        let broadcaster = broadcaster();
        let mut status_rx = subscribe(&broadcaster, Channel::Status);

        broadcaster.publish(
            Channel::Status,
            &Message::ServerStatus(broadcaster.status().read()),
        );

        assert!(status_rx.try_recv().is_ok());
        assert!(status_rx.try_recv().is_err());
    }

    #[test]
    fn announce_shutdown_reports_stopping() {
        let broadcaster = broadcaster();
        let mut status_rx = subscribe(&broadcaster, Channel::Status);

        broadcaster.announce_shutdown();

        assert_eq!(text(status_rx.try_recv().unwrap())["status"], "stopping");
    }

    #[test]
    fn announce_shutdown_raises_the_shutdown_signal() {
        let broadcaster = broadcaster();
        let signal = broadcaster.shutdown_signal();
        assert!(!*signal.borrow());

        broadcaster.announce_shutdown();

        assert!(*signal.borrow());
        assert!(*broadcaster.shutdown_signal().borrow());
    }

    #[tokio::test]
    async fn drain_completes_once_every_connection_is_gone() {
        let broadcaster = Arc::new(broadcaster());
        let (tx, _rx) = unbounded_channel();
        let id = broadcaster.register_connection(Channel::Cats, tx);

        let closer = Arc::clone(&broadcaster);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(30)).await;
            closer.unregister_connection(&id);
        });

        assert!(broadcaster.drain(Duration::from_secs(2)).await);
    }

    #[tokio::test]
    async fn drain_gives_up_after_the_grace_period() {
        let broadcaster = broadcaster();
        let (tx, _rx) = unbounded_channel();
        broadcaster.register_connection(Channel::Dogs, tx);

        assert!(!broadcaster.drain(Duration::from_millis(50)).await);
        assert_eq!(broadcaster.registry().count(Channel::Dogs), 1);
    }

    #[test]
    fn unregister_connection_is_idempotent() {
        let broadcaster = broadcaster();
        let (tx, _rx) = unbounded_channel();
        let id = broadcaster.register_connection(Channel::Dogs, tx);

        broadcaster.unregister_connection(&id);
        broadcaster.unregister_connection(&id);

        assert_eq!(broadcaster.registry().count(Channel::Dogs), 0);
    }
}
