//! HTTP server initialization and runtime setup.
//!
//! Builds the data directory, wires the application state, warms the
//! container cache and runs the Axum server until a shutdown signal.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::ServiceExt;
use axum::extract::Request;

use crate::config::Config;
use crate::routes::app_router;
use crate::state::AppState;
use crate::telemetry::LogLevelControl;

/// Runs the HTTP server with the given configuration.
///
/// # Errors
///
/// Returns an error if:
/// - the data directory cannot be created
/// - the donation ledger fails to open
/// - the server bind fails or the runtime errors out
pub async fn run(config: Config, level_control: Arc<dyn LogLevelControl>) -> Result<()> {
    tokio::fs::create_dir_all(&config.data_dir).await?;

    let behind_proxy = config.behind_proxy;
    let listen_addr = config.listen_addr.clone();

    let state = AppState::initialize(config, level_control).await?;
    tracing::info!("Application state initialized");

    // Warm the container cache; the page degrades gracefully without it.
    if let Err(e) = state.container_service.refresh().await {
        tracing::warn!("Initial container refresh failed: {e}");
    }

    let app = app_router(state, behind_proxy);

    let addr: SocketAddr = listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        return;
    }
    tracing::info!("Shutdown signal received");
}
