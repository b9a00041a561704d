//! Docker container information as reported by the container provider.

use serde::{Deserialize, Serialize};

/// One container row from `docker ps`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerInfo {
    pub id: String,
    pub name: String,
    pub image: String,
    /// Lifecycle state, e.g. `running`, `exited`.
    pub state: String,
    /// Human status line, e.g. `Up 3 hours`.
    pub status: String,
}

impl ContainerInfo {
    pub fn is_running(&self) -> bool {
        self.state.eq_ignore_ascii_case("running")
    }
}
