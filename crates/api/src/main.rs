//! Disease Risk Prediction Service - Main Entry Point

use api::{init_logging, run_server, AppConfig};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    info!("=== RiskCast v{} ===", env!("CARGO_PKG_VERSION"));

    let settings = AppConfig::load()?;
    run_server(settings).await
}
