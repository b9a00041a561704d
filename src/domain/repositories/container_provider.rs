//! Provider trait for the host's container runtime.

use crate::domain::entities::ContainerInfo;
use crate::error::AppError;
use async_trait::async_trait;

/// Source of the live container list.
///
/// # Implementations
///
/// - [`crate::infrastructure::docker::DockerCliProvider`] - shells out to
///   the docker CLI
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContainerProvider: Send + Sync {
    /// Lists all containers, running or not.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::ServiceUnavailable`] when the runtime cannot be
    /// queried (missing CLI, daemon down) and [`AppError::Internal`] when
    /// its output cannot be parsed.
    async fn list_containers(&self) -> Result<Vec<ContainerInfo>, AppError>;
}
