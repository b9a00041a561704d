//! Handlers for the donation endpoints.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::{AddPowerBody, DonationClickBody, DonationClickResponse, SubmitDonationBody};
use crate::api::extractors::ClientMeta;
use crate::application::services::{ClientContext, DonationClickRequest, DonationSubmission};
use crate::error::AppError;
use crate::state::AppState;

/// Current donation/mech status for the public donation widget.
///
/// # Endpoint
///
/// `GET /api/donation/status` (public)
pub async fn donation_status_handler(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    Ok(Json(state.mech_service.donation_status().await?))
}

/// Records a donation button click.
///
/// # Endpoint
///
/// `POST /api/donation/click` (public)
///
/// # Response
///
/// `200` with a UTC timestamp on success, `400` with
/// `error: "Invalid donation type"` for anything outside
/// `{coffee, paypal}`. Tracking failures never surface here; only
/// validation does.
pub async fn donation_click_handler(
    State(state): State<AppState>,
    meta: ClientMeta,
    Json(body): Json<DonationClickBody>,
) -> Response {
    let Some(donation_type) = body.donation_type else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"success": false, "error": "Missing donation type"})),
        )
            .into_response();
    };

    let result = state
        .donation_tracking
        .record_donation_click(DonationClickRequest {
            donation_type,
            context: ClientContext {
                username: meta.username,
                forwarded_for: meta.forwarded_for,
                remote_addr: meta.remote_addr,
            },
        })
        .await;

    if result.success {
        Json(DonationClickResponse {
            success: true,
            timestamp: result.timestamp,
            message: Some(result.message),
            error: None,
        })
        .into_response()
    } else {
        (
            StatusCode::BAD_REQUEST,
            Json(DonationClickResponse {
                success: false,
                timestamp: None,
                message: None,
                error: result.error,
            }),
        )
            .into_response()
    }
}

/// Adds (or pretends to remove) Power for testing.
///
/// # Endpoint
///
/// `POST /api/donation/add-power`
///
/// Negative amounts are acknowledged but not applied: the ledger only
/// accepts positive donations, so the response reports the unchanged
/// Power together with a "reduction not supported" message.
pub async fn add_power_handler(
    State(state): State<AppState>,
    Json(body): Json<AddPowerBody>,
) -> Result<Response, AppError> {
    let Some(amount) = body.parsed_amount() else {
        return Err(AppError::bad_request(
            "Invalid amount - must be numeric",
            json!({ "amount": body.amount }),
        ));
    };

    if amount == 0 {
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(json!({"success": false, "error": "Amount must be non-zero"})),
        )
            .into_response());
    }

    if amount < 0 {
        let current = state.mech_service.state().await?;
        let would_be = (current.power + amount).max(0);
        return Ok(Json(json!({
            "success": true,
            "Power": current.power,
            "level": current.level,
            "level_name": current.level_name,
            "total_donated": current.total_donated,
            "message": format!("Power reduction not supported (would be ${would_be})"),
        }))
        .into_response());
    }

    state
        .donation_service
        .add_test_power(amount, &body.donation_type, &body.user)
        .await?;

    let new_state = state.mech_service.state_uncached().await?;
    Ok(Json(json!({
        "success": true,
        "Power": new_state.power,
        "level": new_state.level,
        "level_name": new_state.level_name,
        "total_donated": new_state.total_donated,
    }))
    .into_response())
}

/// Resets Power to 0 by clearing the donation ledger.
///
/// # Endpoint
///
/// `POST /api/donation/reset-power`
pub async fn reset_power_handler(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.mech_service.full_reset().await?;
    state.media_service.purge_display_cache().await;

    let reset_state = state.mech_service.state_uncached().await?;
    Ok(Json(json!({
        "success": true,
        "message": "Power reset to 0",
        "level": reset_state.level,
        "level_name": reset_state.level_name,
        "Power": reset_state.power,
        "total_donated": reset_state.total_donated,
    })))
}

/// Reports the current Power after automatic decay.
///
/// # Endpoint
///
/// `POST /api/donation/consume-power`
pub async fn consume_power_handler(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let current = state.mech_service.state().await?;
    Ok(Json(json!({
        "success": true,
        "new_Power": current.power.max(0),
        "level": current.level,
        "level_name": current.level_name,
        "message": "Power decay calculated automatically",
    })))
}

/// Records a manual donation from the web UI modal.
///
/// # Endpoint
///
/// `POST /api/donation/submit`
pub async fn submit_donation_handler(
    State(state): State<AppState>,
    Json(body): Json<SubmitDonationBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    body.validate()?;

    let outcome = state
        .donation_service
        .submit(DonationSubmission {
            amount: body.amount,
            donor_name: body.donor_name.unwrap_or_default(),
            publish_to_discord: body.publish_to_discord.unwrap_or(true),
            source: body.source.unwrap_or_else(|| "web_ui_manual".to_string()),
        })
        .await?;

    state.mech_service.invalidate_cache().await;

    Ok(Json(json!({
        "success": true,
        "message": format!("Donation of ${} recorded", outcome.amount),
        "donation_info": outcome,
    })))
}

/// Donation history for the management modal.
///
/// # Endpoint
///
/// `GET /api/donations/list`
pub async fn donations_list_handler(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let history = state.donation_service.history(100).await?;
    Ok(Json(json!({
        "success": true,
        "donations": history.donations,
        "stats": {
            "total_power": history.stats.total_power,
            "total_donations": history.stats.total_donations,
            "average_donation": history.stats.average_donation,
        },
    })))
}

/// Deletes or restores a ledger event via a compensation event.
///
/// # Endpoint
///
/// `POST /api/donations/delete/{index}`
pub async fn delete_donation_handler(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<serde_json::Value>, AppError> {
    let outcome = state.donation_service.delete_or_restore(index).await?;
    state.mech_service.invalidate_cache().await;

    tracing::info!(
        "{} event at index {index} (seq {}, type {})",
        outcome.action,
        outcome.deleted_seq,
        outcome.event_type
    );

    Ok(Json(json!({
        "success": true,
        "message": format!(
            "Event {} successfully (seq #{})",
            outcome.action.to_lowercase(),
            outcome.deleted_seq
        ),
    })))
}
