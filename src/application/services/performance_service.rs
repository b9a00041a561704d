//! Host and process statistics for the performance endpoint.

use std::time::Instant;

use serde_json::{Value, json};
use sysinfo::System;
use tokio::sync::Mutex;

use crate::error::AppError;

/// Collects system and process statistics via `sysinfo`.
///
/// The `System` handle is kept between calls so CPU usage deltas are
/// meaningful; refreshes are serialized behind a mutex.
pub struct PerformanceStatsService {
    system: Mutex<System>,
    started_at: Instant,
}

impl PerformanceStatsService {
    pub fn new() -> Self {
        Self {
            system: Mutex::new(System::new()),
            started_at: Instant::now(),
        }
    }

    /// Snapshot of memory, CPU and process statistics.
    pub async fn get_stats(&self) -> Result<Value, AppError> {
        let mut system = self.system.lock().await;
        system.refresh_memory();
        system.refresh_cpu_usage();

        let process_memory_bytes = sysinfo::get_current_pid()
            .ok()
            .and_then(|pid| {
                system.refresh_processes(sysinfo::ProcessesToUpdate::Some(&[pid]), true);
                system.process(pid).map(|p| p.memory())
            })
            .unwrap_or(0);

        let cpu_usage_percent = if system.cpus().is_empty() {
            0.0
        } else {
            system.global_cpu_usage()
        };

        Ok(json!({
            "uptime_seconds": self.started_at.elapsed().as_secs(),
            "memory": {
                "total_bytes": system.total_memory(),
                "used_bytes": system.used_memory(),
                "process_bytes": process_memory_bytes,
            },
            "cpu": {
                "cores": system.cpus().len(),
                "usage_percent": cpu_usage_percent,
            },
        }))
    }
}

impl Default for PerformanceStatsService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stats_shape() {
        let service = PerformanceStatsService::new();
        let stats = service.get_stats().await.unwrap();

        assert!(stats["memory"]["total_bytes"].is_u64());
        assert!(stats["cpu"]["cores"].is_u64());
        assert!(stats["uptime_seconds"].is_u64());
    }
}
