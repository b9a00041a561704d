//! Spam-protection configuration for the Discord bot's command handling.
//!
//! The panel only edits and persists this configuration; enforcement
//! happens in the bot process, which reads the same file.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Rate window applied to a command (or globally).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpamRule {
    pub window_seconds: u32,
    pub max_commands_per_window: u32,
}

impl Default for SpamRule {
    fn default() -> Self {
        Self {
            window_seconds: 60,
            max_commands_per_window: 5,
        }
    }
}

/// Global on/off switch plus the default rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalSpamSettings {
    pub enabled: bool,
    #[serde(flatten)]
    pub rule: SpamRule,
}

impl Default for GlobalSpamSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            rule: SpamRule::default(),
        }
    }
}

/// Full spam-protection configuration, persisted as `spam_protection.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpamProtectionConfig {
    #[serde(default)]
    pub global_settings: GlobalSpamSettings,
    /// Per-command overrides of the global rule, keyed by command name.
    #[serde(default)]
    pub command_overrides: BTreeMap<String, SpamRule>,
}

impl SpamProtectionConfig {
    /// Returns the rule applied to `command`.
    pub fn rule_for(&self, command: &str) -> SpamRule {
        self.command_overrides
            .get(command)
            .copied()
            .unwrap_or(self.global_settings.rule)
    }
}
