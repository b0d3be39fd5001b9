//! Sock inventory server
//!
//! Reads configuration from the YAML file named by `SOCKS_CONFIG` (defaults
//! otherwise), opens the configured store and serves the inventory API.
//! Log verbosity follows `RUST_LOG`, `info` by default.

use anyhow::Result;
use socks::config::AppConfig;
use socks::server::ServerBuilder;
use socks::storage;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::load()?;
    let store = storage::connect(&config.storage).await?;

    tracing::info!(
        backend = ?config.storage.backend,
        import_mode = ?config.import.mode,
        "Starting sock inventory"
    );

    ServerBuilder::new()
        .with_shared_store(store)
        .with_config(config)
        .serve_configured()
        .await
}
