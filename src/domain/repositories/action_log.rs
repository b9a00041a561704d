//! Sink trait for the user-action audit log.

use crate::error::AppError;
use async_trait::async_trait;

/// One auditable user action.
#[derive(Debug, Clone)]
pub struct ActionEntry {
    pub action: String,
    pub target: String,
    pub source: String,
    pub details: String,
}

impl ActionEntry {
    pub fn new(
        action: impl Into<String>,
        target: impl Into<String>,
        source: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            action: action.into(),
            target: target.into(),
            source: source.into(),
            details: details.into(),
        }
    }
}

/// Append-only audit log of user actions.
///
/// Callers on hot paths treat failures as best-effort: a sink error is
/// warned about and swallowed, never propagated to the user.
///
/// # Implementations
///
/// - [`crate::infrastructure::FileActionLog`] - line-per-entry file in the
///   data directory
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ActionLog: Send + Sync {
    /// Appends one entry.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::ServiceUnavailable`] on write failures.
    async fn record(&self, entry: ActionEntry) -> Result<(), AppError>;
}
