//! Handler for the first-time setup submission.

use axum::{Form, Json, extract::State};
use serde_json::json;

use crate::api::dto::SetupForm;
use crate::domain::repositories::ActionEntry;
use crate::error::AppError;
use crate::state::AppState;

/// Stores the initial admin password.
///
/// # Endpoint
///
/// `POST /setup` (public while no password is configured)
///
/// # Response
///
/// Always `200` with a `success` flag; the setup page script inspects the
/// body rather than the status code. Once a password exists every further
/// attempt is rejected.
pub async fn setup_save_handler(
    State(state): State<AppState>,
    Form(form): Form<SetupForm>,
) -> Json<serde_json::Value> {
    match state
        .auth_service
        .set_initial_password(&form.password, &form.confirm_password)
        .await
    {
        Ok(()) => {
            tracing::info!("First-time setup completed successfully");
            if let Err(e) = state
                .action_log
                .record(ActionEntry::new(
                    "SETUP",
                    "Panel Password",
                    "Web UI",
                    "First-time password setup completed",
                ))
                .await
            {
                tracing::warn!("Failed to log setup completion: {e}");
            }

            Json(json!({
                "success": true,
                "message": "Setup completed! You can now login with username \"admin\" and your password.",
            }))
        }
        Err(AppError::Validation { message, .. }) => {
            Json(json!({ "success": false, "error": message }))
        }
        Err(e) => {
            tracing::error!("Setup failed: {e}");
            Json(json!({
                "success": false,
                "error": "Setup failed: Unable to save configuration",
            }))
        }
    }
}
