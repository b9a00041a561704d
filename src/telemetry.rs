//! Tracing subscriber setup with a reloadable level filter.
//!
//! The filter layer is wrapped in `reload` so the diagnostics service can
//! temporarily raise the log level to `debug` and drop back without a
//! restart.

use tracing_subscriber::{
    EnvFilter, layer::SubscriberExt, registry::Registry, reload, util::SubscriberInitExt,
};

use crate::config::Config;

/// Switch for the global log level, injected into the diagnostics service.
pub trait LogLevelControl: Send + Sync {
    /// Raises the filter to `debug` or restores the configured default.
    fn set_debug(&self, enabled: bool);

    /// Whether the debug filter is currently applied.
    fn is_debug(&self) -> bool;
}

/// Production implementation backed by the subscriber's reload handle.
pub struct ReloadLevelControl {
    handle: reload::Handle<EnvFilter, Registry>,
    default_directives: String,
    debug_active: std::sync::atomic::AtomicBool,
}

impl LogLevelControl for ReloadLevelControl {
    fn set_debug(&self, enabled: bool) {
        let directives = if enabled {
            "debug"
        } else {
            self.default_directives.as_str()
        };
        if let Err(e) = self.handle.reload(EnvFilter::new(directives)) {
            tracing::warn!("Failed to reload log filter: {e}");
            return;
        }
        self.debug_active
            .store(enabled, std::sync::atomic::Ordering::Relaxed);
        tracing::info!("Log filter set to '{directives}'");
    }

    fn is_debug(&self) -> bool {
        self.debug_active.load(std::sync::atomic::Ordering::Relaxed)
    }
}

/// No-op control for tests and the admin CLI.
pub struct NoopLevelControl;

impl LogLevelControl for NoopLevelControl {
    fn set_debug(&self, _enabled: bool) {}
    fn is_debug(&self) -> bool {
        false
    }
}

/// Initializes the global subscriber and returns the level control.
///
/// Must be called exactly once, before any spans are created.
pub fn init(config: &Config) -> ReloadLevelControl {
    let (filter_layer, handle) = reload::Layer::new(EnvFilter::new(&config.log_level));
    let registry = tracing_subscriber::registry().with(filter_layer);

    if config.log_format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    ReloadLevelControl {
        handle,
        default_directives: config.log_level.clone(),
        debug_active: std::sync::atomic::AtomicBool::new(false),
    }
}
