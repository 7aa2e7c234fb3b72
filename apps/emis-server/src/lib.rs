//! # emis-server: Session API for the Emissions Tracker
//!
//! HTTP + JSON front for the cashier terminals.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Session API Server                               │
//! │                                                                         │
//! │  Terminal ───► HTTP (8000) ───► routes::* ───► emis-db ───► SQLite     │
//! │                                     │                                   │
//! │                                     ▼                                   │
//! │                     emis-core (validation, balancing)                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Startup Sequence
//! 1. Load [`ServerConfig`] (defaults → emis.toml → `EMIS_*`)
//! 2. Open the database, run migrations, seed locations
//! 3. Serve until Ctrl+C / SIGTERM, then close the pool

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use emis_db::{Database, DbConfig, DbResult};

pub use crate::config::{ConfigError, ServerConfig};
pub use crate::error::{ApiError, ErrorCode};
pub use crate::state::AppState;

/// Builds the application router with state and request tracing attached.
pub fn build_app(state: AppState) -> Router {
    routes::router()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Makes sure every name in `names` exists as a location.
pub async fn seed_locations(db: &Database, names: &[String]) -> DbResult<()> {
    for name in names {
        db.locations().ensure(name).await?;
    }
    Ok(())
}

/// Opens the configured database and seeds it.
pub async fn connect(config: &ServerConfig) -> anyhow::Result<Database> {
    if let Some(dir) = config.database_path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating data directory {}", dir.display()))?;
    }

    let db = Database::new(
        DbConfig::new(&config.database_path).max_connections(config.max_connections),
    )
    .await
    .context("opening database")?;

    seed_locations(&db, &config.seed_locations)
        .await
        .context("seeding locations")?;

    info!(
        path = %config.database_path.display(),
        locations = config.seed_locations.len(),
        "Database ready"
    );
    Ok(db)
}

/// Runs the server until a shutdown signal arrives.
pub async fn run(config: ServerConfig) -> anyhow::Result<()> {
    let addr = config.socket_addr()?;
    let db = connect(&config).await?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;

    info!(%addr, "Session API listening");

    axum::serve(listener, build_app(AppState::new(db.clone())))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=emis=trace` - Show trace for emis crates only
/// - Default: `info,emis=debug,sqlx=warn`
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,emis=debug,sqlx=warn,tower_http=debug"));

    tracing_subscriber::fmt().with_env_filter(filter).with_target(true).init();
}

/// Resolves on Ctrl+C or SIGTERM.
///
/// A handler that fails to install is logged and never fires; the other
/// one still works.
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

    info!("Shutdown signal received, starting graceful shutdown...");
}
