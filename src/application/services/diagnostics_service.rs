//! Temporary debug mode and port diagnostics.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use tokio::sync::RwLock;

use crate::error::AppError;
use crate::telemetry::LogLevelControl;

#[derive(Debug, Clone, Copy)]
struct DebugWindow {
    expires_at: DateTime<Utc>,
    generation: u64,
}

/// Time-boxed log-level escalation and simple port checks.
///
/// Enabling debug mode raises the global filter and schedules an
/// automatic revert. The generation counter makes a stale revert task
/// harmless when debug mode was re-enabled or disabled in the meantime.
pub struct DiagnosticsService {
    level_control: Arc<dyn LogLevelControl>,
    max_minutes: u64,
    listen_addr: String,
    window: Arc<RwLock<Option<DebugWindow>>>,
    generation: AtomicU64,
}

impl DiagnosticsService {
    pub fn new(
        level_control: Arc<dyn LogLevelControl>,
        max_minutes: u64,
        listen_addr: String,
    ) -> Self {
        Self {
            level_control,
            max_minutes,
            listen_addr,
            window: Arc::new(RwLock::new(None)),
            generation: AtomicU64::new(0),
        }
    }

    /// Enables debug logging for `duration_minutes`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] when the duration is zero or
    /// exceeds the configured maximum.
    pub async fn enable_temp_debug(&self, duration_minutes: u64) -> Result<Value, AppError> {
        if duration_minutes == 0 || duration_minutes > self.max_minutes {
            return Err(AppError::bad_request(
                "Invalid debug duration",
                json!({ "duration_minutes": duration_minutes, "max_minutes": self.max_minutes }),
            ));
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let expires_at = Utc::now() + chrono::Duration::minutes(duration_minutes as i64);

        self.level_control.set_debug(true);
        *self.window.write().await = Some(DebugWindow {
            expires_at,
            generation,
        });

        let window = Arc::clone(&self.window);
        let level_control = Arc::clone(&self.level_control);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(duration_minutes * 60)).await;
            let mut window = window.write().await;
            if window.map(|w| w.generation) == Some(generation) {
                *window = None;
                level_control.set_debug(false);
                tracing::info!("Temporary debug mode expired");
            }
        });

        tracing::info!("Temporary debug mode enabled for {duration_minutes} minute(s)");
        Ok(json!({
            "is_enabled": true,
            "duration_minutes": duration_minutes,
            "expires_at": expires_at.to_rfc3339(),
        }))
    }

    /// Disables debug logging immediately.
    pub async fn disable_temp_debug(&self) -> Result<Value, AppError> {
        *self.window.write().await = None;
        self.level_control.set_debug(false);
        tracing::info!("Temporary debug mode disabled");
        Ok(json!({ "is_enabled": false }))
    }

    /// Reports whether debug mode is active and for how much longer.
    pub async fn debug_status(&self) -> Result<Value, AppError> {
        let window = *self.window.read().await;
        let now = Utc::now();

        match window {
            Some(w) if w.expires_at > now => {
                let remaining = (w.expires_at - now).num_seconds().max(0);
                Ok(json!({
                    "is_enabled": true,
                    "remaining_seconds": remaining,
                    "expires_at": w.expires_at.to_rfc3339(),
                }))
            }
            // Expired but not yet reverted counts as disabled.
            _ => Ok(json!({ "is_enabled": false, "remaining_seconds": 0 })),
        }
    }

    /// Checks whether the configured port accepts local TCP connects.
    pub async fn port_diagnostics(&self) -> Result<Value, AppError> {
        let port: u16 = self
            .listen_addr
            .rsplit(':')
            .next()
            .and_then(|p| p.parse().ok())
            .ok_or_else(|| {
                AppError::internal(
                    "Listen address has no parseable port",
                    json!({ "listen_addr": self.listen_addr }),
                )
            })?;

        let reachable = tokio::time::timeout(
            Duration::from_secs(1),
            tokio::net::TcpStream::connect(("127.0.0.1", port)),
        )
        .await
        .map(|r| r.is_ok())
        .unwrap_or(false);

        Ok(json!({
            "listen_addr": self.listen_addr,
            "port": port,
            "reachable": reachable,
            "checked_at": Utc::now().to_rfc3339(),
        }))
    }
}
