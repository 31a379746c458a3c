//! Drowsiness Pipeline - Main Entry Point

use api::{init_logging, run_server, AppSettings};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    info!("=== DrowsyGuard Pipeline v{} ===", env!("CARGO_PKG_VERSION"));

    let settings = AppSettings::load()?;
    info!("Starting drowsiness monitoring service on {}", settings.bind_addr);

    run_server(settings).await?;

    Ok(())
}
