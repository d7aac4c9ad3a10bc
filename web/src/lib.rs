use axum::http::{header, HeaderValue, Method};
use events::EventSender;
use log::*;
use realtime::Broadcaster;
use sea_orm::DatabaseConnection;
use service::config::Config;
use std::future::Future;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

mod controller;
mod error;
mod params;
mod router;
mod ws;

pub use error::{Error, Result};

/// State shared by every request handler.
#[derive(Clone)]
pub struct AppState {
    pub service_state: service::AppState,
    /// Fan-out and connection registry for the WebSocket channels.
    pub broadcaster: Arc<Broadcaster>,
    /// Queue to the broadcast worker; mutations emit through it.
    pub event_sender: EventSender,
}

impl AppState {
    pub fn new(
        service_state: service::AppState,
        broadcaster: Arc<Broadcaster>,
        event_sender: EventSender,
    ) -> Self {
        Self {
            service_state,
            broadcaster,
            event_sender,
        }
    }

    pub fn db_conn_ref(&self) -> &DatabaseConnection {
        self.service_state.db_conn_ref()
    }

    pub fn config(&self) -> &Config {
        &self.service_state.config
    }
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring invalid CORS origin {origin}: {e}");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}

/// Builds the full application router, CORS included.
pub fn app(app_state: AppState) -> axum::Router {
    let cors = cors_layer(app_state.config());
    router::define_routes(app_state).layer(cors)
}

/// Serves the API until `shutdown` resolves, then stops accepting connections.
pub async fn init_server(
    app_state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let listen_addr = app_state.config().listen_addr();
    info!("Server starting... listening for connections on http://{listen_addr}");

    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    axum::serve(listener, app(app_state))
        .with_graceful_shutdown(shutdown)
        .await
}
