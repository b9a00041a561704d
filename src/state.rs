//! Shared application state.
//!
//! Every service is constructed exactly once in [`AppState::initialize`]
//! and injected by reference; no lazily-initialized globals exist anywhere
//! in the crate.

use std::sync::Arc;
use std::time::Duration;

use crate::application::services::{
    AuthService, ConfigurationService, ContainerRefreshService, DiagnosticsService,
    DonationService, DonationTrackingService, MechMediaService, MechMusicService, MechService,
    MonitorScriptService, PerformanceStatsService, SpamProtectionService,
};
use crate::config::Config;
use crate::domain::repositories::ActionLog;
use crate::error::AppError;
use crate::infrastructure::docker::DockerCliProvider;
use crate::infrastructure::persistence::{FileDonationLedger, JsonConfigStore};
use crate::infrastructure::{FileActionLog, MatrixLog};
use crate::telemetry::LogLevelControl;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub auth_service: Arc<AuthService<JsonConfigStore>>,
    pub configuration_service: Arc<ConfigurationService<JsonConfigStore>>,
    pub container_service: Arc<ContainerRefreshService>,
    pub mech_service: Arc<MechService<FileDonationLedger, JsonConfigStore>>,
    pub donation_service: Arc<DonationService<FileDonationLedger>>,
    pub donation_tracking: Arc<DonationTrackingService>,
    pub spam_service: Arc<SpamProtectionService<JsonConfigStore>>,
    pub diagnostics: Arc<DiagnosticsService>,
    pub performance: Arc<PerformanceStatsService>,
    pub monitor_scripts: Arc<MonitorScriptService>,
    pub media_service: Arc<MechMediaService>,
    pub music_service: Arc<MechMusicService>,
    pub action_log: Arc<dyn ActionLog>,
}

impl AppState {
    /// Builds all stores and services for the given configuration.
    ///
    /// # Errors
    ///
    /// Fails when the donation ledger cannot be opened.
    pub async fn initialize(
        config: Config,
        level_control: Arc<dyn LogLevelControl>,
    ) -> Result<Self, AppError> {
        let config = Arc::new(config);

        let config_store = Arc::new(JsonConfigStore::new(&config.data_dir));
        let ledger = Arc::new(FileDonationLedger::open(&config.data_dir).await?);
        let action_log: Arc<dyn ActionLog> = Arc::new(FileActionLog::new(&config.data_dir));
        let matrix_log: Arc<dyn ActionLog> = Arc::new(MatrixLog);
        let docker = Arc::new(DockerCliProvider::new(config.docker_bin.clone()));

        let container_service = Arc::new(ContainerRefreshService::new(docker));
        let auth_service = Arc::new(AuthService::new(config_store.clone()));
        let configuration_service = Arc::new(ConfigurationService::new(
            config_store.clone(),
            container_service.clone(),
            action_log.clone(),
        ));
        let mech_service = Arc::new(MechService::new(
            ledger.clone(),
            config_store.clone(),
            Duration::from_secs(config.status_cache_ttl_seconds),
        ));
        let donation_service = Arc::new(DonationService::new(ledger, action_log.clone()));
        let donation_tracking = Arc::new(DonationTrackingService::new(
            action_log.clone(),
            matrix_log,
        ));
        let spam_service = Arc::new(SpamProtectionService::new(
            config_store,
            action_log.clone(),
        ));
        let diagnostics = Arc::new(DiagnosticsService::new(
            level_control,
            config.temp_debug_max_minutes,
            config.listen_addr.clone(),
        ));
        let media_service = Arc::new(MechMediaService::new(
            &config.data_dir,
            Duration::from_secs(config.animation_cache_ttl_seconds),
        ));

        Ok(Self {
            config,
            auth_service,
            configuration_service,
            container_service,
            mech_service,
            donation_service,
            donation_tracking,
            spam_service,
            diagnostics,
            performance: Arc::new(PerformanceStatsService::new()),
            monitor_scripts: Arc::new(MonitorScriptService::new()),
            media_service,
            music_service: Arc::new(MechMusicService::new()),
            action_log,
        })
    }
}
