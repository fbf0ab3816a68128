//! # BarberDesk API Server
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        API Server Startup                               │
//! │                                                                         │
//! │  env ──► ApiConfig ──► Database (pool + migrations) ──► Router          │
//! │                                                       │                 │
//! │                                                       ▼                 │
//! │                                    TcpListener 0.0.0.0:BARBERDESK_PORT  │
//! │                                                       │                 │
//! │                                        Ctrl+C / SIGTERM ──► shutdown    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;

use barberdesk_api::{router, ApiConfig, AppState};
use barberdesk_db::{Database, DbConfig};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "barberdesk_api=info,barberdesk_db=info,barberdesk_core=info".into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting BarberDesk API server...");

    let config = ApiConfig::load()?;
    info!(
        port = config.port,
        database = %config.database_path.display(),
        default_slot_duration = config.default_slot_duration,
        "Configuration loaded"
    );

    let db = Database::new(
        DbConfig::new(config.database_path.clone()).max_connections(config.db_max_connections),
    )
    .await?;

    let app = router(AppState::new(db.clone(), config.default_slot_duration));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM. A handler that cannot be installed is
/// logged and never fires.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
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
                error!(error = %e, "Failed to install SIGTERM handler");
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

    info!("Shutdown signal received");
}
