//! Configuration page data assembly and save handling.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::json;

use crate::application::services::container_service::ContainerRefreshService;
use crate::domain::entities::{
    ContainerInfo, PanelConfig, panel_config::{ContainerConfig, KNOWN_CONTAINER_ACTIONS},
};
use crate::domain::repositories::{ActionEntry, ActionLog, ConfigStore};
use crate::error::AppError;

const SUPPORTED_LANGUAGES: [&str; 3] = ["en", "de", "fr"];

/// Everything the config page template needs.
#[derive(Debug, Clone)]
pub struct PageData {
    pub config: PanelConfig,
    pub containers: Vec<ContainerInfo>,
}

/// Result of a configuration save.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SaveOutcome {
    pub message: String,
    pub config_files: Vec<String>,
    /// True when a setting was changed that requires a bot restart.
    pub critical_settings_changed: bool,
}

/// Prepares the config page and applies form submissions.
pub struct ConfigurationService<C: ConfigStore> {
    store: Arc<C>,
    containers: Arc<ContainerRefreshService>,
    action_log: Arc<dyn ActionLog>,
}

impl<C: ConfigStore> ConfigurationService<C> {
    pub fn new(
        store: Arc<C>,
        containers: Arc<ContainerRefreshService>,
        action_log: Arc<dyn ActionLog>,
    ) -> Self {
        Self {
            store,
            containers,
            action_log,
        }
    }

    /// Loads the page data. Container listing failures degrade to an
    /// empty list so the page always renders.
    pub async fn page_data(&self, force_refresh: bool) -> Result<PageData, AppError> {
        let config = self.store.load().await?;
        let containers = self.containers.listing_for_page(force_refresh).await;
        Ok(PageData { config, containers })
    }

    /// Applies a config-form submission.
    ///
    /// Container fields arrive as `display_name_{container}` and
    /// `allowed_actions_{container}` (comma-separated) keys.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for an empty timezone, an
    /// unsupported language or a non-numeric heartbeat channel id.
    pub async fn save(&self, form: &HashMap<String, String>) -> Result<SaveOutcome, AppError> {
        let mut config = self.store.load().await?;
        let mut critical_settings_changed = false;

        if let Some(timezone) = form.get("timezone") {
            if timezone.trim().is_empty() {
                return Err(AppError::bad_request(
                    "Timezone must not be empty",
                    json!({"field": "timezone"}),
                ));
            }
            if *timezone != config.timezone {
                critical_settings_changed = true;
            }
            config.timezone = timezone.clone();
        }

        if let Some(language) = form.get("language") {
            if !SUPPORTED_LANGUAGES.contains(&language.as_str()) {
                return Err(AppError::bad_request(
                    "Unsupported language",
                    json!({"field": "language", "supported": SUPPORTED_LANGUAGES}),
                ));
            }
            if *language != config.language {
                critical_settings_changed = true;
            }
            config.language = language.clone();
        }

        if let Some(enabled) = form.get("donations_enabled") {
            config.donations_enabled =
                enabled == "1" || enabled.eq_ignore_ascii_case("true") || enabled == "on";
        }

        if let Some(channel_id) = form.get("heartbeat_channel_id") {
            let trimmed = channel_id.trim();
            if trimmed.is_empty() {
                config.heartbeat_channel_id = None;
            } else if trimmed.chars().all(|c| c.is_ascii_digit()) {
                config.heartbeat_channel_id = Some(trimmed.to_string());
            } else {
                return Err(AppError::bad_request(
                    "Heartbeat channel id must be numeric",
                    json!({"field": "heartbeat_channel_id"}),
                ));
            }
        }

        apply_container_fields(&mut config, form);

        self.store.save(&config).await?;

        if let Err(e) = self
            .action_log
            .record(ActionEntry::new(
                "SAVE",
                "Panel Configuration",
                "Web UI",
                format!("critical_settings_changed: {critical_settings_changed}"),
            ))
            .await
        {
            tracing::warn!("Failed to log configuration save: {e}");
        }

        Ok(SaveOutcome {
            message: "Configuration saved successfully.".to_string(),
            config_files: vec!["config.json".to_string()],
            critical_settings_changed,
        })
    }
}

fn apply_container_fields(config: &mut PanelConfig, form: &HashMap<String, String>) {
    for (key, value) in form {
        if let Some(container_name) = key.strip_prefix("display_name_") {
            container_entry(config, container_name).display_name = value.trim().to_string();
        } else if let Some(container_name) = key.strip_prefix("allowed_actions_") {
            container_entry(config, container_name).allowed_actions = value
                .split(',')
                .map(str::trim)
                .filter(|action| KNOWN_CONTAINER_ACTIONS.contains(action))
                .map(str::to_string)
                .collect();
        }
    }
}

fn container_entry<'a>(config: &'a mut PanelConfig, name: &str) -> &'a mut ContainerConfig {
    if let Some(position) = config.containers.iter().position(|c| c.name == name) {
        return &mut config.containers[position];
    }
    config.containers.push(ContainerConfig {
        name: name.to_string(),
        display_name: String::new(),
        allowed_actions: Vec::new(),
    });
    config.containers.last_mut().expect("just pushed")
}
