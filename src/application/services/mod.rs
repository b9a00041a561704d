//! Application services: the business logic behind the HTTP layer.
//!
//! Each service owns one concern, takes its stores as constructor
//! arguments and returns tagged [`crate::error::AppError`] kinds. Route
//! handlers hold services through [`crate::state::AppState`] and never
//! reach past them.

pub mod auth_service;
pub mod configuration_service;
pub mod container_service;
pub mod diagnostics_service;
pub mod donation_service;
pub mod donation_tracking_service;
pub mod mech_media_service;
pub mod mech_music_service;
pub mod mech_service;
pub mod monitor_script_service;
pub mod performance_service;
pub mod spam_protection_service;

pub use auth_service::AuthService;
pub use configuration_service::ConfigurationService;
pub use container_service::ContainerRefreshService;
pub use diagnostics_service::DiagnosticsService;
pub use donation_service::{DonationService, DonationSubmission};
pub use donation_tracking_service::{
    ClientContext, DonationClickRequest, DonationClickResult, DonationTrackingService,
};
pub use mech_media_service::{DisplayKind, MechMediaService, RenderedMedia};
pub use mech_music_service::MechMusicService;
pub use mech_service::MechService;
pub use monitor_script_service::{MonitorScriptRequest, MonitorScriptService, ScriptType};
pub use performance_service::PerformanceStatsService;
pub use spam_protection_service::SpamProtectionService;
