//! Discord bot setup instructions page.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;

use crate::domain::entities::PanelConfig;
use crate::state::AppState;

/// Template for the Discord bot setup page.
#[derive(Template, WebTemplate)]
#[template(path = "discord_bot_setup.html")]
pub struct BotSetupTemplate {
    pub config: PanelConfig,
}

/// Renders the bot setup walkthrough.
///
/// # Endpoint
///
/// `GET /discord_bot_setup`
pub async fn discord_bot_setup_handler(State(state): State<AppState>) -> BotSetupTemplate {
    let config = match state.configuration_service.page_data(false).await {
        Ok(page) => page.config,
        Err(e) => {
            tracing::error!("Failed to load config for bot setup page: {e}");
            PanelConfig::default()
        }
    };

    BotSetupTemplate { config }
}
