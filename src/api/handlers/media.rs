//! Handlers serving rendered mech media and the music catalog.

use axum::{
    Json,
    extract::{Path, State},
    http::header::{CACHE_CONTROL, CONTENT_DISPOSITION, CONTENT_TYPE, ETAG},
    response::{IntoResponse, Response},
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::TestAnimationBody;
use crate::application::services::{DisplayKind, RenderedMedia};
use crate::error::AppError;
use crate::state::AppState;

fn media_response(media: RenderedMedia, cache_control: &'static str) -> Response {
    (
        [
            (CONTENT_TYPE, media.content_type.to_string()),
            (CACHE_CONTROL, cache_control.to_string()),
        ],
        media.bytes,
    )
        .into_response()
}

/// Live mech animation for the current state.
///
/// # Endpoint
///
/// `GET /mech_animation` (public)
pub async fn mech_animation_handler(State(state): State<AppState>) -> Result<Response, AppError> {
    let mech_state = state.mech_service.state().await?;
    let media = state.media_service.live_animation(&mech_state).await?;
    Ok(media_response(media, "max-age=5"))
}

/// Renders a test animation for arbitrary donation parameters.
///
/// # Endpoint
///
/// `POST /api/test-mech-animation`
pub async fn test_animation_handler(
    State(state): State<AppState>,
    Json(body): Json<TestAnimationBody>,
) -> Result<Response, AppError> {
    body.validate()?;

    let donor = body.donor_name.as_deref().unwrap_or("Test User");
    tracing::info!(
        "Generating test mech animation for {donor}, donations: {}",
        body.total_donations
    );

    let (level, speed) = state.mech_service.hypothetical(body.total_donations).await?;
    let media = state.media_service.test_animation(level, speed)?;
    Ok(media_response(media, "max-age=60"))
}

/// Pre-rendered display image for a level.
///
/// # Endpoint
///
/// `GET /api/mech/display/{level}/{image_type}` (public)
pub async fn display_image_handler(
    State(state): State<AppState>,
    Path((level, image_type)): Path<(u8, String)>,
) -> Result<Response, AppError> {
    let Some(kind) = DisplayKind::from_path_value(&image_type) else {
        return Err(AppError::bad_request(
            "Invalid image type. Must be \"shadow\" or \"unlocked\".",
            json!({ "image_type": image_type }),
        ));
    };

    let media = state.media_service.display_image(level, kind).await?;
    tracing::info!(
        "Served mech display image: Level {level} {image_type} ({} bytes)",
        media.bytes.len()
    );

    Ok((
        [
            (CONTENT_TYPE, media.content_type.to_string()),
            (CACHE_CONTROL, "public, max-age=86400".to_string()),
            (ETAG, format!("mech-{level}-{image_type}")),
            (
                CONTENT_DISPOSITION,
                format!("inline; filename=\"{}\"", media.filename),
            ),
        ],
        media.bytes,
    )
        .into_response())
}

/// Available display images.
///
/// # Endpoint
///
/// `GET /api/mech/display/info` (public)
pub async fn display_info_handler(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut info = state.media_service.display_info().await?;
    info["success"] = json!(true);
    Ok(Json(info))
}

/// Music track for a level.
///
/// # Endpoint
///
/// `GET /api/mech/music/{level}` (public)
pub async fn music_track_handler(
    State(state): State<AppState>,
    Path(level): Path<u8>,
) -> Result<Json<serde_json::Value>, AppError> {
    let track = state.music_service.track(level)?;
    tracing::info!("Providing YouTube URL for mech music level {level}: {}", track.title);
    Ok(Json(json!({
        "success": true,
        "level": track.level,
        "title": track.title,
        "url": track.url,
        "platform": "YouTube",
        "monetized": true,
    })))
}

/// The full music catalog.
///
/// # Endpoint
///
/// `GET /api/mech/music/info` (public)
pub async fn music_info_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    let mut info = state.music_service.info();
    info["success"] = json!(true);
    Json(info)
}
