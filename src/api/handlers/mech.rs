//! Handlers for mech difficulty, reset and status endpoints.

use axum::{Json, extract::State};
use chrono::Utc;
use serde_json::json;

use crate::api::dto::{DifficultyBody, SpeedConfigBody};
use crate::api::extractors::ClientMeta;
use crate::domain::repositories::ActionEntry;
use crate::error::AppError;
use crate::state::AppState;

fn difficulty_response(
    info: crate::application::services::mech_service::DifficultyInfo,
) -> serde_json::Value {
    let mut value = serde_json::to_value(&info).unwrap_or_else(|_| json!({}));
    value["success"] = json!(true);
    value
}

/// Current evolution difficulty.
///
/// # Endpoint
///
/// `GET /api/mech/difficulty`
pub async fn get_difficulty_handler(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    Ok(Json(difficulty_response(
        state.mech_service.difficulty().await?,
    )))
}

/// Sets or clears the difficulty override.
///
/// # Endpoint
///
/// `POST /api/mech/difficulty`
///
/// `manual_override: true` pins a static multiplier; `false` returns the
/// mech to dynamic difficulty regardless of the multiplier value.
pub async fn set_difficulty_handler(
    State(state): State<AppState>,
    Json(body): Json<DifficultyBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let Some(multiplier) = body.difficulty_multiplier else {
        return Err(AppError::bad_request(
            "Missing difficulty_multiplier parameter",
            json!({}),
        ));
    };

    let info = if body.manual_override {
        state.mech_service.set_difficulty(multiplier).await?
    } else {
        state.mech_service.reset_difficulty().await?
    };

    Ok(Json(difficulty_response(info)))
}

/// Returns difficulty to dynamic mode.
///
/// # Endpoint
///
/// `POST /api/mech/difficulty/reset`
pub async fn reset_difficulty_handler(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    Ok(Json(difficulty_response(
        state.mech_service.reset_difficulty().await?,
    )))
}

/// Full reset back to level 1.
///
/// # Endpoint
///
/// `POST /api/mech/reset`
pub async fn mech_reset_handler(
    State(state): State<AppState>,
    meta: ClientMeta,
) -> Result<Json<serde_json::Value>, AppError> {
    let previous_status = state.mech_service.current_status().await?;

    let outcome = state.mech_service.full_reset().await?;
    state.media_service.purge_display_cache().await;

    let user = meta.username.unwrap_or_else(|| "Unknown".to_string());
    if let Err(e) = state
        .action_log
        .record(ActionEntry::new(
            "MECH_RESET",
            "Mech System",
            "Web UI",
            format!(
                "Reset to Level 1 by {user} - Previous: Level {}",
                previous_status["current_level"]
            ),
        ))
        .await
    {
        tracing::warn!("Failed to log mech reset action: {e}");
    }

    Ok(Json(json!({
        "success": true,
        "message": outcome.message,
        "previous_status": previous_status,
        "operations": outcome.operations,
        "timestamp": outcome.timestamp.to_rfc3339(),
    })))
}

/// Current mech system status.
///
/// # Endpoint
///
/// `GET /api/mech/status`
pub async fn mech_status_handler(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let status = state.mech_service.current_status().await?;
    Ok(Json(json!({
        "success": true,
        "status": status,
        "timestamp": Utc::now().to_rfc3339(),
    })))
}

/// Animation speed parameters for a donation total.
///
/// # Endpoint
///
/// `POST /api/mech-speed-config`
pub async fn speed_config_handler(
    State(state): State<AppState>,
    Json(body): Json<SpeedConfigBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    Ok(Json(
        state.mech_service.speed_config(body.total_donations).await?,
    ))
}

/// Placeholder for the donation broadcast simulation.
///
/// # Endpoint
///
/// `POST /api/simulate-donation-broadcast`
pub async fn simulate_broadcast_handler() -> Json<serde_json::Value> {
    tracing::info!("Simulating donation broadcast...");
    Json(json!({
        "success": true,
        "message": "Donation broadcast simulation not yet implemented",
    }))
}
