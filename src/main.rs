use std::sync::Arc;

use ddc_panel::{config, server, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = config::load_from_env()?;
    let level_control = telemetry::init(&config);
    config.print_summary();

    server::run(config, Arc::new(level_control)).await
}
