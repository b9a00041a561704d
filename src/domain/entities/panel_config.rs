//! Panel configuration persisted as `config.json` in the data directory.

use serde::{Deserialize, Serialize};

/// Actions the Discord bot may be allowed to perform on a container.
pub const KNOWN_CONTAINER_ACTIONS: [&str; 3] = ["start", "stop", "restart"];

/// A container the bot manages, as configured through the web UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerConfig {
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub allowed_actions: Vec<String>,
}

/// The panel's persisted configuration.
///
/// `web_ui_password_hash` being `None` means first-time setup has not run
/// yet; the `/setup` flow is only reachable in that state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelConfig {
    #[serde(default = "default_web_ui_user")]
    pub web_ui_user: String,
    #[serde(default)]
    pub web_ui_password_hash: Option<String>,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_true")]
    pub donations_enabled: bool,
    #[serde(default)]
    pub heartbeat_channel_id: Option<String>,
    /// Static difficulty override for the mech; `None` means dynamic mode.
    #[serde(default)]
    pub mech_difficulty_override: Option<f64>,
    #[serde(default)]
    pub containers: Vec<ContainerConfig>,
}

fn default_web_ui_user() -> String {
    "admin".to_string()
}

fn default_timezone() -> String {
    "Europe/Berlin".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            web_ui_user: default_web_ui_user(),
            web_ui_password_hash: None,
            timezone: default_timezone(),
            language: default_language(),
            donations_enabled: true,
            heartbeat_channel_id: None,
            mech_difficulty_override: None,
            containers: Vec::new(),
        }
    }
}

impl PanelConfig {
    /// Returns true once the admin password has been set via `/setup`.
    pub fn is_configured(&self) -> bool {
        self.web_ui_password_hash.is_some()
    }
}
