//! Main configuration page.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use serde::Deserialize;

use crate::domain::entities::{ContainerInfo, PanelConfig};
use crate::state::AppState;

/// Template for the configuration page.
///
/// Renders `templates/config.html` with the stored configuration and the
/// current container listing.
#[derive(Template, WebTemplate)]
#[template(path = "config.html")]
pub struct ConfigPageTemplate {
    pub config: PanelConfig,
    pub containers: Vec<ContainerInfo>,
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ConfigPageQuery {
    #[serde(default)]
    pub force_refresh: String,
}

/// Renders the configuration page.
///
/// # Endpoint
///
/// `GET /?force_refresh=true|false`
///
/// Service failures degrade to a page with an error banner instead of an
/// error response; the panel must stay reachable to fix whatever broke.
pub async fn config_page_handler(
    State(state): State<AppState>,
    Query(query): Query<ConfigPageQuery>,
) -> ConfigPageTemplate {
    let force_refresh = query.force_refresh.eq_ignore_ascii_case("true");

    match state.configuration_service.page_data(force_refresh).await {
        Ok(page) => ConfigPageTemplate {
            config: page.config,
            containers: page.containers,
            error_message: None,
        },
        Err(e) => {
            tracing::error!("Failed to prepare configuration page data: {e}");
            ConfigPageTemplate {
                config: PanelConfig::default(),
                containers: Vec::new(),
                error_message: Some(
                    "Failed to load configuration data. Please check the logs.".to_string(),
                ),
            }
        }
    }
}
