//! Handlers for spam-protection configuration.

use axum::{Json, extract::State};
use serde_json::json;

use crate::domain::entities::SpamProtectionConfig;
use crate::error::AppError;
use crate::state::AppState;

/// Current spam-protection settings.
///
/// # Endpoint
///
/// `GET /api/spam-protection`
pub async fn get_spam_protection_handler(
    State(state): State<AppState>,
) -> Result<Json<SpamProtectionConfig>, AppError> {
    Ok(Json(state.spam_service.get_config().await?))
}

/// Persists new spam-protection settings.
///
/// # Endpoint
///
/// `POST /api/spam-protection`
pub async fn save_spam_protection_handler(
    State(state): State<AppState>,
    Json(config): Json<SpamProtectionConfig>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.spam_service.save_config(config).await?;
    Ok(Json(json!({ "success": true })))
}
