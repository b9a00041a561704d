//! Spam-protection configuration management.

use std::sync::Arc;

use serde_json::json;

use crate::domain::entities::{SpamProtectionConfig, SpamRule};
use crate::domain::repositories::{ActionEntry, ActionLog, ConfigStore};
use crate::error::AppError;

/// Loads, validates and persists the bot's spam-protection settings.
pub struct SpamProtectionService<C: ConfigStore> {
    store: Arc<C>,
    action_log: Arc<dyn ActionLog>,
}

impl<C: ConfigStore> SpamProtectionService<C> {
    pub fn new(store: Arc<C>, action_log: Arc<dyn ActionLog>) -> Self {
        Self { store, action_log }
    }

    /// Current settings (defaults when never saved).
    pub async fn get_config(&self) -> Result<SpamProtectionConfig, AppError> {
        self.store.load_spam_protection().await
    }

    /// Validates and persists new settings; the save is audit-logged.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] when any rule has a zero window or
    /// zero command budget.
    pub async fn save_config(&self, config: SpamProtectionConfig) -> Result<(), AppError> {
        validate_rule("global_settings", &config.global_settings.rule)?;
        for (command, rule) in &config.command_overrides {
            validate_rule(command, rule)?;
        }

        self.store.save_spam_protection(&config).await?;

        if let Err(e) = self
            .action_log
            .record(ActionEntry::new(
                "SAVE",
                "Spam Protection Settings",
                "Web UI",
                format!("Spam protection enabled: {}", config.global_settings.enabled),
            ))
            .await
        {
            tracing::warn!("Failed to log spam protection save: {e}");
        }

        Ok(())
    }
}

fn validate_rule(scope: &str, rule: &SpamRule) -> Result<(), AppError> {
    if rule.window_seconds == 0 || rule.max_commands_per_window == 0 {
        return Err(AppError::bad_request(
            "Spam protection windows and command budgets must be at least 1",
            json!({ "scope": scope }),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::{MockActionLog, MockConfigStore};

    fn silent_log() -> Arc<MockActionLog> {
        let mut log = MockActionLog::new();
        log.expect_record().returning(|_| Ok(()));
        Arc::new(log)
    }

    #[tokio::test]
    async fn test_save_valid_config() {
        let mut store = MockConfigStore::new();
        store
            .expect_save_spam_protection()
            .times(1)
            .returning(|_| Ok(()));

        let service = SpamProtectionService::new(Arc::new(store), silent_log());
        assert!(service.save_config(SpamProtectionConfig::default()).await.is_ok());
    }

    #[tokio::test]
    async fn test_save_rejects_zero_window() {
        let store = MockConfigStore::new();
        let service = SpamProtectionService::new(Arc::new(store), silent_log());

        let mut config = SpamProtectionConfig::default();
        config.global_settings.rule.window_seconds = 0;

        let result = service.save_config(config).await;
        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_save_rejects_bad_override() {
        let store = MockConfigStore::new();
        let service = SpamProtectionService::new(Arc::new(store), silent_log());

        let mut config = SpamProtectionConfig::default();
        config.command_overrides.insert(
            "restart".to_string(),
            SpamRule {
                window_seconds: 60,
                max_commands_per_window: 0,
            },
        );

        let result = service.save_config(config).await;
        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_save_survives_failing_audit_log() {
        let mut store = MockConfigStore::new();
        store
            .expect_save_spam_protection()
            .returning(|_| Ok(()));
        let mut log = MockActionLog::new();
        log.expect_record()
            .returning(|_| Err(AppError::service_unavailable("down", serde_json::json!({}))));

        let service = SpamProtectionService::new(Arc::new(store), Arc::new(log));
        assert!(service.save_config(SpamProtectionConfig::default()).await.is_ok());
    }
}
