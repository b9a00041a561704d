//! Store trait for panel and spam-protection configuration.

use crate::domain::entities::{PanelConfig, SpamProtectionConfig};
use crate::error::AppError;
use async_trait::async_trait;

/// Persistence interface for the two configuration documents.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::JsonConfigStore`] - JSON files
///   under the data directory, replaced atomically on save
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Loads the panel configuration.
    ///
    /// A missing file yields the defaults; this is the unconfigured
    /// first-start state, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::ServiceUnavailable`] on unreadable storage and
    /// [`AppError::Internal`] on a corrupt document.
    async fn load(&self) -> Result<PanelConfig, AppError>;

    /// Persists the panel configuration atomically.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::ServiceUnavailable`] on write failures.
    async fn save(&self, config: &PanelConfig) -> Result<(), AppError>;

    /// Loads the spam-protection configuration (defaults when missing).
    ///
    /// # Errors
    ///
    /// Same classification as [`Self::load`].
    async fn load_spam_protection(&self) -> Result<SpamProtectionConfig, AppError>;

    /// Persists the spam-protection configuration atomically.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::ServiceUnavailable`] on write failures.
    async fn save_spam_protection(&self, config: &SpamProtectionConfig) -> Result<(), AppError>;
}
