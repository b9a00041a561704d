//! Handlers for configuration save and container refresh.

use std::collections::HashMap;

use axum::{
    Form, Json,
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
};
use serde_json::json;

use crate::error::AppError;
use crate::state::AppState;

fn is_ajax(headers: &HeaderMap) -> bool {
    headers
        .get("x-requested-with")
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == "XMLHttpRequest")
}

/// Applies a configuration form submission.
///
/// # Endpoint
///
/// `POST /save_config_api`
///
/// AJAX requests (`X-Requested-With: XMLHttpRequest`) receive the save
/// outcome as JSON; plain form posts are redirected back to the config
/// page.
pub async fn save_config_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    tracing::info!("save_config_api called");
    let ajax = is_ajax(&headers);

    match state.configuration_service.save(&form).await {
        Ok(outcome) => {
            tracing::info!("Configuration saved successfully: {}", outcome.message);
            if ajax {
                Json(json!({
                    "success": true,
                    "message": outcome.message,
                    "config_files": outcome.config_files,
                    "critical_settings_changed": outcome.critical_settings_changed,
                }))
                .into_response()
            } else {
                Redirect::to("/").into_response()
            }
        }
        Err(e) => {
            tracing::warn!("Failed to save configuration: {e}");
            if ajax {
                e.into_response()
            } else {
                Redirect::to("/").into_response()
            }
        }
    }
}

/// Forces a refresh of the container listing.
///
/// # Endpoint
///
/// `POST /refresh_containers`
pub async fn refresh_containers_handler(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let outcome = state.container_service.refresh().await?;
    Ok(Json(json!({
        "success": true,
        "container_count": outcome.container_count,
        "timestamp": outcome.timestamp,
        "formatted_time": outcome.formatted_time,
    })))
}
