//! AquaWatch - Main Entry Point

use api::config::AppConfig;
use api::{init_logging, run_server};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_logging(&config.logging)?;

    info!("=== AquaWatch v{} ===", env!("CARGO_PKG_VERSION"));
    info!("History store: {}", config.storage.path);

    run_server(config).await?;

    Ok(())
}
