//! Handler for the heartbeat monitor script download.

use axum::{
    Form,
    extract::State,
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::api::dto::MonitorScriptForm;
use crate::application::services::{MonitorScriptRequest, ScriptType};
use crate::domain::repositories::ActionEntry;
use crate::error::AppError;
use crate::state::AppState;

/// Generates and downloads a heartbeat monitor script.
///
/// # Endpoint
///
/// `POST /download_monitor_script`
///
/// # Response
///
/// The script as an attachment (`.py`, `.sh` or `.bat`); validation
/// problems map to `400`.
pub async fn download_monitor_script_handler(
    State(state): State<AppState>,
    Form(form): Form<MonitorScriptForm>,
) -> Result<Response, AppError> {
    let Some(script_type) = ScriptType::from_form_value(&form.script_type) else {
        return Err(AppError::bad_request(
            format!("Unknown script type: {}", form.script_type),
            json!({ "script_type": form.script_type }),
        ));
    };

    let script = state.monitor_scripts.generate(&MonitorScriptRequest {
        script_type,
        monitor_bot_token: form.monitor_bot_token,
        alert_webhook_url: form.alert_webhook_url,
        ddc_bot_user_id: form.ddc_bot_user_id,
        heartbeat_channel_id: form.heartbeat_channel_id,
        monitor_timeout_seconds: form.monitor_timeout_seconds,
        alert_channel_ids: form.alert_channel_ids,
    })?;

    if let Err(e) = state
        .action_log
        .record(ActionEntry::new(
            "DOWNLOAD",
            format!("Heartbeat monitor script ({})", script_type.display_name()),
            "Web UI",
            "",
        ))
        .await
    {
        tracing::warn!("Failed to log script download: {e}");
    }
    tracing::info!(
        "Generated and downloaded heartbeat monitor script ({})",
        script_type.display_name()
    );

    Ok((
        [
            (CONTENT_TYPE, script.mime_type.to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", script.filename),
            ),
        ],
        script.content,
    )
        .into_response())
}
