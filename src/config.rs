//! Service configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before the server
//! starts.
//!
//! ## Variables
//!
//! - `DDC_DATA_DIR` - Directory holding `config.json`, `spam_protection.json`,
//!   the donation ledger and rendered display images (default: `./data`)
//! - `LISTEN` - Bind address (default: `0.0.0.0:8374`)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)
//! - `BEHIND_PROXY` - When true, client IPs are read from
//!   `X-Forwarded-For`; enable only behind a trusted reverse proxy
//! - `STATUS_CACHE_TTL_SECONDS` - Mech status cache lifetime (default: 5)
//! - `ANIMATION_CACHE_TTL_SECONDS` - Rendered animation cache lifetime
//!   (default: 30)
//! - `DOCKER_BIN` - Docker CLI executable (default: `docker`)
//! - `TEMP_DEBUG_MAX_MINUTES` - Upper bound for the temporary debug window
//!   (default: 60)

use anyhow::Result;
use std::env;
use std::path::PathBuf;

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub listen_addr: String,
    pub log_level: String,
    pub log_format: String,
    /// When true, rate limiting and client identification read the IP from
    /// X-Forwarded-For. Enable only behind a trusted reverse proxy.
    pub behind_proxy: bool,
    /// TTL (seconds) for the in-memory mech status cache.
    pub status_cache_ttl_seconds: u64,
    /// TTL (seconds) for rendered mech animations.
    pub animation_cache_ttl_seconds: u64,
    /// Docker CLI executable used by the container provider.
    pub docker_bin: String,
    /// Upper bound (minutes) accepted by the temp debug endpoint.
    pub temp_debug_max_minutes: u64,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Self {
        let data_dir = env::var("DDC_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data"));

        let listen_addr = env::var("LISTEN").unwrap_or_else(|_| "0.0.0.0:8374".to_string());
        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

        let behind_proxy = env::var("BEHIND_PROXY")
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(false);

        let status_cache_ttl_seconds = env::var("STATUS_CACHE_TTL_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5);

        let animation_cache_ttl_seconds = env::var("ANIMATION_CACHE_TTL_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);

        let docker_bin = env::var("DOCKER_BIN").unwrap_or_else(|_| "docker".to_string());

        let temp_debug_max_minutes = env::var("TEMP_DEBUG_MAX_MINUTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(60);

        Self {
            data_dir,
            listen_addr,
            log_level,
            log_format,
            behind_proxy,
            status_cache_ttl_seconds,
            animation_cache_ttl_seconds,
            docker_bin,
            temp_debug_max_minutes,
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `log_format` is not `text` or `json`
    /// - `listen_addr` is not `host:port`
    /// - a TTL or the debug window bound is zero
    pub fn validate(&self) -> Result<()> {
        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if !self.listen_addr.contains(':') {
            anyhow::bail!(
                "LISTEN must be in format 'host:port', got '{}'",
                self.listen_addr
            );
        }

        if self.status_cache_ttl_seconds == 0 {
            anyhow::bail!("STATUS_CACHE_TTL_SECONDS must be greater than 0");
        }

        if self.animation_cache_ttl_seconds == 0 {
            anyhow::bail!("ANIMATION_CACHE_TTL_SECONDS must be greater than 0");
        }

        if self.temp_debug_max_minutes == 0 || self.temp_debug_max_minutes > 1440 {
            anyhow::bail!(
                "TEMP_DEBUG_MAX_MINUTES must be between 1 and 1440, got {}",
                self.temp_debug_max_minutes
            );
        }

        if self.docker_bin.trim().is_empty() {
            anyhow::bail!("DOCKER_BIN must not be empty");
        }

        Ok(())
    }

    /// Prints configuration summary.
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr);
        tracing::info!("  Data directory: {}", self.data_dir.display());
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
        tracing::info!("  Behind proxy: {}", self.behind_proxy);
        tracing::info!("  Status cache TTL: {}s", self.status_cache_ttl_seconds);
        tracing::info!("  Docker binary: {}", self.docker_bin);
    }
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if validation fails.
///
/// # Note
///
/// Expects environment variables to be already loaded (e.g. via
/// `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env();
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn base_config() -> Config {
        Config {
            data_dir: PathBuf::from("/tmp/ddc-test"),
            listen_addr: "0.0.0.0:8374".to_string(),
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            behind_proxy: false,
            status_cache_ttl_seconds: 5,
            animation_cache_ttl_seconds: 30,
            docker_bin: "docker".to_string(),
            temp_debug_max_minutes: 60,
        }
    }

    #[test]
    fn test_config_validation() {
        let mut config = base_config();
        assert!(config.validate().is_ok());

        config.log_format = "xml".to_string();
        assert!(config.validate().is_err());
        config.log_format = "json".to_string();
        assert!(config.validate().is_ok());

        config.listen_addr = "8374".to_string();
        assert!(config.validate().is_err());
        config.listen_addr = "127.0.0.1:8374".to_string();

        config.status_cache_ttl_seconds = 0;
        assert!(config.validate().is_err());
        config.status_cache_ttl_seconds = 5;

        config.temp_debug_max_minutes = 0;
        assert!(config.validate().is_err());
        config.temp_debug_max_minutes = 2000;
        assert!(config.validate().is_err());
    }

    #[test]
    #[serial]
    fn test_defaults_without_env() {
        // SAFETY: Tests touching the environment run serially due to #[serial]
        unsafe {
            env::remove_var("DDC_DATA_DIR");
            env::remove_var("LISTEN");
            env::remove_var("BEHIND_PROXY");
        }

        let config = Config::from_env();
        assert_eq!(config.listen_addr, "0.0.0.0:8374");
        assert_eq!(config.data_dir, PathBuf::from("./data"));
        assert!(!config.behind_proxy);
    }

    #[test]
    #[serial]
    fn test_behind_proxy_parsing() {
        // SAFETY: serial test, no concurrent env access
        unsafe {
            env::set_var("BEHIND_PROXY", "TRUE");
        }
        assert!(Config::from_env().behind_proxy);

        unsafe {
            env::set_var("BEHIND_PROXY", "0");
        }
        assert!(!Config::from_env().behind_proxy);

        unsafe {
            env::remove_var("BEHIND_PROXY");
        }
    }
}
