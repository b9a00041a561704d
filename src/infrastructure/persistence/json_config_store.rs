//! JSON file implementation of the configuration store.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::json;
use tokio::fs;

use crate::domain::entities::{PanelConfig, SpamProtectionConfig};
use crate::domain::repositories::ConfigStore;
use crate::error::{AppError, map_io_error};

/// Configuration store backed by JSON files in the data directory.
///
/// Saves go through a `.tmp` sibling followed by a rename, so a crash
/// mid-write can never leave a half-written document behind.
pub struct JsonConfigStore {
    config_path: PathBuf,
    spam_path: PathBuf,
}

impl JsonConfigStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            config_path: data_dir.join("config.json"),
            spam_path: data_dir.join("spam_protection.json"),
        }
    }

    async fn load_document<T: DeserializeOwned + Default>(path: &Path) -> Result<T, AppError> {
        match fs::read_to_string(path).await {
            Ok(raw) => serde_json::from_str(&raw).map_err(|e| {
                tracing::error!("Corrupt document {}: {e}", path.display());
                AppError::internal(
                    "Stored configuration is corrupt",
                    json!({ "path": path.display().to_string() }),
                )
            }),
            // Missing file is the unconfigured first-start state.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(T::default()),
            Err(e) => Err(map_io_error("config load", e)),
        }
    }

    async fn save_document<T: Serialize>(path: &Path, document: &T) -> Result<(), AppError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| map_io_error("config save", e))?;
        }

        let raw = serde_json::to_string_pretty(document)
            .map_err(|e| AppError::internal("Failed to serialize configuration", json!({ "reason": e.to_string() })))?;

        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, raw)
            .await
            .map_err(|e| map_io_error("config save", e))?;
        fs::rename(&tmp_path, path)
            .await
            .map_err(|e| map_io_error("config save", e))?;

        Ok(())
    }
}

#[async_trait]
impl ConfigStore for JsonConfigStore {
    async fn load(&self) -> Result<PanelConfig, AppError> {
        Self::load_document(&self.config_path).await
    }

    async fn save(&self, config: &PanelConfig) -> Result<(), AppError> {
        Self::save_document(&self.config_path, config).await
    }

    async fn load_spam_protection(&self) -> Result<SpamProtectionConfig, AppError> {
        Self::load_document(&self.spam_path).await
    }

    async fn save_spam_protection(&self, config: &SpamProtectionConfig) -> Result<(), AppError> {
        Self::save_document(&self.spam_path, config).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_load_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let store = JsonConfigStore::new(dir.path());

        let config = store.load().await.unwrap();
        assert!(!config.is_configured());

        let spam = store.load_spam_protection().await.unwrap();
        assert!(spam.global_settings.enabled);
    }

    #[tokio::test]
    async fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let store = JsonConfigStore::new(dir.path());

        let mut config = PanelConfig::default();
        config.web_ui_password_hash = Some("hash".to_string());
        config.timezone = "UTC".to_string();
        store.save(&config).await.unwrap();

        let reloaded = store.load().await.unwrap();
        assert_eq!(reloaded, config);

        // No stray tmp file left behind
        assert!(!dir.path().join("config.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_internal_error() {
        let dir = TempDir::new().unwrap();
        tokio::fs::write(dir.path().join("config.json"), "{not json")
            .await
            .unwrap();

        let store = JsonConfigStore::new(dir.path());
        let result = store.load().await;
        assert!(matches!(result.unwrap_err(), AppError::Internal { .. }));
    }

    #[tokio::test]
    async fn test_spam_config_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = JsonConfigStore::new(dir.path());

        let mut spam = SpamProtectionConfig::default();
        spam.global_settings.enabled = false;
        store.save_spam_protection(&spam).await.unwrap();

        let reloaded = store.load_spam_protection().await.unwrap();
        assert!(!reloaded.global_settings.enabled);
    }
}
