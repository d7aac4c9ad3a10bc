//! Shelter platform server: REST resources for dogs and cats plus live statistics
//! pushed to WebSocket subscribers.

use events::EventPublisher;
use log::*;
use migration::{Migrator, MigratorTrait};
use realtime::{Broadcaster, ConnectionRegistry, StatsBroadcastHandler, StatsRepository, StatusState};
use service::{config::Config, logging::Logger, AppState};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let config = Config::new();
    if let Err(e) = Logger::init_logger(&config) {
        eprintln!("Failed to initialize logger: {e}");
    }

    info!(
        "Starting up shelter platform ({} environment)",
        config.runtime_env()
    );

    let db = match service::init_database(&config).await {
        Ok(db) => Arc::new(db),
        Err(e) => {
            error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };

    if config.run_migrations {
        info!("Applying pending migrations");
        if let Err(e) = Migrator::up(db.as_ref(), None).await {
            error!("Failed to apply migrations: {e}");
            std::process::exit(1);
        }
    }

    let broadcaster = Arc::new(Broadcaster::new(
        Arc::new(ConnectionRegistry::new()),
        Arc::new(StatusState::new()),
    ));

    // All stats broadcasts run on this one worker so subscribers observe mutations
    // in the order they were committed.
    let stats_repository: Arc<dyn StatsRepository> = db.clone();
    let (event_sender, broadcast_worker) = EventPublisher::new()
        .with_handler(Arc::new(StatsBroadcastHandler::new(
            stats_repository,
            Arc::clone(&broadcaster),
        )))
        .spawn_worker();

    // One timed write for the final status plus one for the close frame.
    let drain_grace = config.ws_send_timeout() * 2;
    let service_state = AppState::new(config, &db);
    let app_state = web::AppState::new(service_state, Arc::clone(&broadcaster), event_sender);

    let shutdown_broadcaster = Arc::clone(&broadcaster);
    let shutdown = async move {
        shutdown_signal().await;
        info!("Shutdown signal received, notifying status subscribers");
        shutdown_broadcaster.announce_shutdown();
    };

    if let Err(e) = web::init_server(app_state, shutdown).await {
        error!("Server error: {e}");
    }

    // The listener no longer waits for upgraded connections, so give their tasks a
    // bounded window to write the final status and close.
    if broadcaster.drain(drain_grace).await {
        info!("All WebSocket connections closed");
    }

    broadcast_worker.abort();
    info!("Server stopped");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
