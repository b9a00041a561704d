//! Custom extractors.

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::request::Parts,
};
use axum_auth::AuthBasic;

use crate::state::AppState;

/// Best-effort client identity for attribution purposes.
///
/// Extraction never rejects: a request without credentials, forwarding
/// headers or even a peer address still resolves, just with fewer fields.
/// `username` is only set when the provided basic credentials actually
/// verify; unverified credentials fall back to IP attribution.
pub struct ClientMeta {
    pub username: Option<String>,
    pub forwarded_for: Option<String>,
    pub remote_addr: Option<String>,
}

impl FromRequestParts<AppState> for ClientMeta {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let forwarded_for = parts
            .headers
            .get("x-forwarded-for")
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let remote_addr = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|info| info.0.ip().to_string());

        let username = match AuthBasic::from_request_parts(parts, &()).await {
            Ok(AuthBasic((user, password))) => state
                .auth_service
                .authenticate(&user, password.as_deref().unwrap_or(""))
                .await
                .is_ok()
                .then_some(user),
            Err(_) => None,
        };

        Ok(Self {
            username,
            forwarded_for,
            remote_addr,
        })
    }
}
