//! # Emissions Tracker Server
//!
//! ```bash
//! EMIS_PORT=8000 EMIS_DATABASE_PATH=./emis.db cargo run -p emis-server
//! ```

use tracing::info;

use emis_server::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    emis_server::init_tracing();

    info!("Starting Emissions Tracker server...");

    let config = ServerConfig::load()?;
    info!(
        bind = %config.bind_addr,
        port = config.port,
        database = %config.database_path.display(),
        "Configuration loaded"
    );

    emis_server::run(config).await
}
