//! DTOs for configuration, diagnostics and setup endpoints.

use serde::Deserialize;

/// Form body of `POST /enable_temp_debug`.
#[derive(Debug, Deserialize)]
pub struct EnableDebugForm {
    #[serde(default = "default_debug_minutes")]
    pub duration: u64,
}

fn default_debug_minutes() -> u64 {
    10
}

/// Form body of `POST /download_monitor_script`.
#[derive(Debug, Deserialize)]
pub struct MonitorScriptForm {
    #[serde(default = "default_script_type")]
    pub script_type: String,
    #[serde(default)]
    pub monitor_bot_token: String,
    #[serde(default)]
    pub alert_webhook_url: String,
    #[serde(default)]
    pub ddc_bot_user_id: String,
    #[serde(default)]
    pub heartbeat_channel_id: String,
    #[serde(default)]
    pub monitor_timeout_seconds: String,
    #[serde(default)]
    pub alert_channel_ids: String,
}

fn default_script_type() -> String {
    "python".to_string()
}

/// Form body of `POST /setup`.
#[derive(Debug, Deserialize)]
pub struct SetupForm {
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}
