//! First-time setup page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};

use crate::state::AppState;

/// Template for the first-time setup page.
#[derive(Template, WebTemplate)]
#[template(path = "setup.html")]
pub struct SetupTemplate {}

/// Renders the setup page while no password is configured.
///
/// # Endpoint
///
/// `GET /setup`
///
/// Once a password hash exists the page redirects to the config page;
/// setup is strictly a first-installation flow.
pub async fn setup_page_handler(State(state): State<AppState>) -> Response {
    match state.auth_service.is_configured().await {
        Ok(true) => Redirect::to("/").into_response(),
        Ok(false) => SetupTemplate {}.into_response(),
        Err(e) => {
            tracing::error!("Failed to check setup state: {e}");
            e.into_response()
        }
    }
}
