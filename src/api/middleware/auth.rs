//! Basic authentication middleware.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBasic;

use crate::{error::AppError, state::AppState};

/// Authenticates requests using HTTP Basic credentials.
///
/// # Header Format
///
/// ```text
/// Authorization: Basic base64(user:password)
/// ```
///
/// # Errors
///
/// Returns `401 Unauthorized` (with a `WWW-Authenticate: Basic`
/// challenge) if:
/// - the Authorization header is missing or malformed
/// - no password has been configured yet (first-time setup pending)
/// - the credentials do not match
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let AuthBasic((username, password)) = AuthBasic::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| {
            AppError::unauthorized(
                "Unauthorized",
                serde_json::json!({"reason": "Authorization header is missing or invalid"}),
            )
        })?;

    let req = Request::from_parts(parts, body);

    st.auth_service
        .authenticate(&username, password.as_deref().unwrap_or(""))
        .await?;

    Ok(next.run(req).await)
}
