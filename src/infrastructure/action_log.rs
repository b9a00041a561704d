//! Action log sinks: audit file and the Matrix channel mirror.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::domain::repositories::{ActionEntry, ActionLog};
use crate::error::{AppError, map_io_error};

/// Audit log appended to `action.log` in the data directory.
pub struct FileActionLog {
    path: PathBuf,
}

impl FileActionLog {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join("action.log"),
        }
    }
}

#[async_trait]
impl ActionLog for FileActionLog {
    async fn record(&self, entry: ActionEntry) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| map_io_error("action log", e))?;
        }

        let line = format!(
            "{} | {} | {} | {} | {}\n",
            Utc::now().to_rfc3339(),
            entry.action,
            entry.target,
            entry.source,
            entry.details
        );

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| map_io_error("action log", e))?;
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| map_io_error("action log", e))?;

        tracing::info!(
            action = %entry.action,
            target = %entry.target,
            source = %entry.source,
            "user action recorded"
        );

        Ok(())
    }
}

/// Mirror sink for the Matrix server integration.
///
/// The Matrix bridge tails the service log, so this sink only needs to
/// emit a structured line with the `MATRIX-SERVER` marker.
pub struct MatrixLog;

#[async_trait]
impl ActionLog for MatrixLog {
    async fn record(&self, entry: ActionEntry) -> Result<(), AppError> {
        tracing::info!(
            target: "matrix",
            "[MATRIX-SERVER] {} {} by {} - {}",
            entry.action,
            entry.target,
            entry.source,
            entry.details
        );
        Ok(())
    }
}
