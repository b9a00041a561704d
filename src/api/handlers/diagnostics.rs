//! Handlers for temp debug mode, performance and port diagnostics.

use axum::{Form, Json, extract::State};
use serde_json::json;

use crate::api::dto::EnableDebugForm;
use crate::error::AppError;
use crate::state::AppState;

fn with_success(mut data: serde_json::Value) -> serde_json::Value {
    data["success"] = json!(true);
    data
}

/// Enables temporary debug logging.
///
/// # Endpoint
///
/// `POST /enable_temp_debug`
pub async fn enable_temp_debug_handler(
    State(state): State<AppState>,
    Form(form): Form<EnableDebugForm>,
) -> Result<Json<serde_json::Value>, AppError> {
    let data = state.diagnostics.enable_temp_debug(form.duration).await?;
    Ok(Json(with_success(data)))
}

/// Disables temporary debug logging.
///
/// # Endpoint
///
/// `POST /disable_temp_debug`
pub async fn disable_temp_debug_handler(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let data = state.diagnostics.disable_temp_debug().await?;
    Ok(Json(with_success(data)))
}

/// Reports the debug window state.
///
/// # Endpoint
///
/// `GET /temp_debug_status`
pub async fn temp_debug_status_handler(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let data = state.diagnostics.debug_status().await?;
    Ok(Json(with_success(data)))
}

/// Host and process statistics.
///
/// # Endpoint
///
/// `GET /performance_stats`
pub async fn performance_stats_handler(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let performance_data = state.performance.get_stats().await?;
    Ok(Json(json!({
        "success": true,
        "performance_data": performance_data,
    })))
}

/// Checks local reachability of the configured port.
///
/// # Endpoint
///
/// `GET /port_diagnostics`
pub async fn port_diagnostics_handler(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let data = state.diagnostics.port_diagnostics().await?;
    Ok(Json(with_success(data)))
}
