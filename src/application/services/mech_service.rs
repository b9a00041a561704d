//! Mech state derivation: leveling, difficulty and power decay.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::domain::entities::{
    DifficultyMode, DonationEvent, DonationStats, LEVELS, MAX_LEVEL, MechState, level_spec,
    mech::{DIFFICULTY_MAX, DIFFICULTY_MIN},
    replay,
};
use crate::domain::repositories::{ConfigStore, DonationLedger};
use crate::error::AppError;
use crate::infrastructure::cache::TtlCache;

/// Power lost per hour is `level * DECAY_PER_LEVEL_PER_HOUR`.
const DECAY_PER_LEVEL_PER_HOUR: f64 = 0.1;

/// Milestones for the dynamic difficulty curve: once the active donation
/// total crosses a milestone, later levels cost proportionally more.
const DYNAMIC_STEPS: [(i64, f64); 4] = [(0, 1.0), (100, 1.25), (400, 1.5), (850, 2.0)];

const SPEED_MIN: f64 = 0.25;
const SPEED_MAX: f64 = 3.0;

/// Outcome of a difficulty read or update.
#[derive(Debug, Clone, serde::Serialize)]
pub struct DifficultyInfo {
    pub difficulty_multiplier: f64,
    #[serde(flatten)]
    pub mode: DifficultyMode,
}

/// Outcome of a full mech reset.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ResetOutcome {
    pub message: String,
    pub operations: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

/// Derives mech state from the donation ledger and the difficulty
/// configuration. Status reads go through a short-lived cache; every
/// mutation invalidates it.
pub struct MechService<L: DonationLedger, C: ConfigStore> {
    ledger: Arc<L>,
    config_store: Arc<C>,
    status_cache: TtlCache<(), MechState>,
}

impl<L: DonationLedger, C: ConfigStore> MechService<L, C> {
    pub fn new(ledger: Arc<L>, config_store: Arc<C>, status_ttl: Duration) -> Self {
        Self {
            ledger,
            config_store,
            status_cache: TtlCache::new(status_ttl),
        }
    }

    /// Current mech state, served from cache when fresh.
    ///
    /// # Errors
    ///
    /// Propagates ledger/store failures. A cache miss is not an error.
    pub async fn state(&self) -> Result<MechState, AppError> {
        if let Some((state, age)) = self.status_cache.get(&()).await {
            tracing::debug!("Using cached mech status (age: {age:.1}s)");
            return Ok(state);
        }

        let state = self.compute_now().await?;
        self.status_cache.insert((), state.clone()).await;
        Ok(state)
    }

    /// Recomputes state directly, bypassing and refreshing the cache.
    pub async fn state_uncached(&self) -> Result<MechState, AppError> {
        let state = self.compute_now().await?;
        self.status_cache.insert((), state.clone()).await;
        Ok(state)
    }

    async fn compute_now(&self) -> Result<MechState, AppError> {
        let events = self.ledger.events().await?;
        let config = self.config_store.load().await?;
        Ok(compute_state(
            &events,
            config.mech_difficulty_override,
            Utc::now(),
        ))
    }

    /// Donation status payload for the public status endpoint.
    pub async fn donation_status(&self) -> Result<serde_json::Value, AppError> {
        let config = self.config_store.load().await?;
        let state = self.state().await?;
        Ok(json!({
            "enabled": config.donations_enabled,
            "level": state.level,
            "level_name": state.level_name,
            "power": state.power,
            "total_donated": state.total_donated,
            "threshold": state.threshold,
            "speed": state.speed,
        }))
    }

    /// Level and speed implied by a hypothetical donation total.
    pub async fn hypothetical(&self, total_donations: i64) -> Result<(u8, f64), AppError> {
        let config = self.config_store.load().await?;
        let total = total_donations.max(0);
        let multiplier = effective_multiplier(config.mech_difficulty_override, total);
        let level = level_for(total, multiplier);
        let threshold = next_threshold(level, multiplier);
        Ok((level, speed_for(total, threshold)))
    }

    /// Speed configuration for a hypothetical donation total.
    pub async fn speed_config(&self, total_donations: i64) -> Result<serde_json::Value, AppError> {
        let (level, speed) = self.hypothetical(total_donations).await?;
        Ok(json!({
            "total_donations": total_donations,
            "level": level,
            "speed": speed,
            "frame_delay_ms": frame_delay_ms(speed),
        }))
    }

    /// Current difficulty multiplier and mode.
    pub async fn difficulty(&self) -> Result<DifficultyInfo, AppError> {
        let config = self.config_store.load().await?;
        let events = self.ledger.events().await?;
        let total = DonationStats::from_records(&replay(&events)).total_power;
        Ok(difficulty_info(config.mech_difficulty_override, total))
    }

    /// Sets a static difficulty override.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] when the multiplier is outside
    /// [0.1, 10.0] or not finite.
    pub async fn set_difficulty(&self, multiplier: f64) -> Result<DifficultyInfo, AppError> {
        if !multiplier.is_finite() || !(DIFFICULTY_MIN..=DIFFICULTY_MAX).contains(&multiplier) {
            return Err(AppError::bad_request(
                "Invalid difficulty multiplier value",
                json!({ "multiplier": multiplier, "min": DIFFICULTY_MIN, "max": DIFFICULTY_MAX }),
            ));
        }

        let mut config = self.config_store.load().await?;
        config.mech_difficulty_override = Some(multiplier);
        self.config_store.save(&config).await?;
        self.status_cache.invalidate_all().await;

        Ok(DifficultyInfo {
            difficulty_multiplier: multiplier,
            mode: DifficultyMode::Static(multiplier),
        })
    }

    /// Clears the override, returning to dynamic difficulty.
    pub async fn reset_difficulty(&self) -> Result<DifficultyInfo, AppError> {
        let mut config = self.config_store.load().await?;
        config.mech_difficulty_override = None;
        self.config_store.save(&config).await?;
        self.status_cache.invalidate_all().await;

        self.difficulty().await
    }

    /// Resets the mech to level 1: clears the ledger, removes any
    /// difficulty override and drops cached state.
    pub async fn full_reset(&self) -> Result<ResetOutcome, AppError> {
        let mut operations = Vec::new();

        self.ledger.clear().await?;
        operations.push("donation ledger cleared".to_string());

        let mut config = self.config_store.load().await?;
        if config.mech_difficulty_override.take().is_some() {
            self.config_store.save(&config).await?;
            operations.push("difficulty override removed".to_string());
        }

        self.status_cache.invalidate_all().await;
        operations.push("status cache invalidated".to_string());

        Ok(ResetOutcome {
            message: "Mech reset to Level 1".to_string(),
            operations,
            timestamp: Utc::now(),
        })
    }

    /// Summary map for the status endpoint and the reset response.
    pub async fn current_status(&self) -> Result<serde_json::Value, AppError> {
        let state = self.state().await?;
        let events = self.ledger.events().await?;
        Ok(json!({
            "current_level": state.level,
            "level_name": state.level_name,
            "power": state.power,
            "total_donated": state.total_donated,
            "threshold": state.threshold,
            "difficulty_multiplier": state.difficulty_multiplier,
            "ledger_events": events.len(),
        }))
    }

    /// Drops cached state; used after out-of-band ledger writes.
    pub async fn invalidate_cache(&self) {
        self.status_cache.invalidate_all().await;
    }
}

fn difficulty_info(override_multiplier: Option<f64>, total_donated: i64) -> DifficultyInfo {
    match override_multiplier {
        Some(m) => DifficultyInfo {
            difficulty_multiplier: m,
            mode: DifficultyMode::Static(m),
        },
        None => DifficultyInfo {
            difficulty_multiplier: dynamic_multiplier(total_donated),
            mode: DifficultyMode::Dynamic,
        },
    }
}

fn dynamic_multiplier(total_donated: i64) -> f64 {
    DYNAMIC_STEPS
        .iter()
        .rev()
        .find(|(milestone, _)| total_donated >= *milestone)
        .map(|(_, multiplier)| *multiplier)
        .unwrap_or(1.0)
}

fn effective_multiplier(override_multiplier: Option<f64>, total_donated: i64) -> f64 {
    override_multiplier.unwrap_or_else(|| dynamic_multiplier(total_donated))
}

fn scaled_threshold(base: i64, multiplier: f64) -> i64 {
    (base as f64 * multiplier).ceil() as i64
}

fn level_for(total_donated: i64, multiplier: f64) -> u8 {
    LEVELS
        .iter()
        .rev()
        .find(|spec| total_donated >= scaled_threshold(spec.base_threshold, multiplier))
        .map(|spec| spec.level)
        .unwrap_or(1)
}

fn next_threshold(level: u8, multiplier: f64) -> i64 {
    let next = if level >= MAX_LEVEL { MAX_LEVEL } else { level + 1 };
    scaled_threshold(level_spec(next).base_threshold, multiplier)
}

fn speed_for(power: i64, threshold: i64) -> f64 {
    if threshold <= 0 {
        return SPEED_MIN;
    }
    let ratio = (power as f64 / threshold as f64).clamp(0.0, 1.0);
    (0.5 + ratio * 2.5).clamp(SPEED_MIN, SPEED_MAX)
}

/// GIF frame delay implied by a speed factor.
pub fn frame_delay_ms(speed: f64) -> u32 {
    (120.0 / speed.clamp(SPEED_MIN, SPEED_MAX)).round() as u32
}

/// Pure state derivation over a replayed ledger.
///
/// Power decays with time since the latest active donation; it can reach
/// zero but never goes negative, and decay never lowers the level (level
/// tracks `total_donated`, which decay does not touch).
pub fn compute_state(
    events: &[DonationEvent],
    difficulty_override: Option<f64>,
    now: DateTime<Utc>,
) -> MechState {
    let records = replay(events);
    let stats = DonationStats::from_records(&records);
    let total_donated = stats.total_power;

    let info = difficulty_info(difficulty_override, total_donated);
    let multiplier = info.difficulty_multiplier;

    let level = level_for(total_donated, multiplier);
    let spec = level_spec(level);
    let threshold = next_threshold(level, multiplier);

    let last_active = records
        .iter()
        .filter(|r| !r.deleted)
        .map(|r| r.recorded_at)
        .max();

    let power = match last_active {
        Some(last) => {
            let hours = (now - last).num_seconds().max(0) as f64 / 3600.0;
            let decay = (hours * level as f64 * DECAY_PER_LEVEL_PER_HOUR).floor() as i64;
            (total_donated - decay).max(0)
        }
        None => 0,
    };

    MechState {
        level,
        level_name: spec.name,
        power,
        total_donated,
        threshold,
        speed: speed_for(power, threshold),
        difficulty_multiplier: multiplier,
        difficulty_mode: info.mode,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::PanelConfig;
    use crate::domain::repositories::{MockConfigStore, MockDonationLedger};
    use chrono::Duration as ChronoDuration;

    fn added_at(seq: u64, amount: i64, recorded_at: DateTime<Utc>) -> DonationEvent {
        DonationEvent::DonationAdded {
            seq,
            donor: "donor".to_string(),
            amount,
            source: "test".to_string(),
            recorded_at,
        }
    }

    #[test]
    fn test_empty_ledger_is_level_one_with_zero_power() {
        let state = compute_state(&[], None, Utc::now());
        assert_eq!(state.level, 1);
        assert_eq!(state.level_name, "Scrapling");
        assert_eq!(state.power, 0);
        assert_eq!(state.total_donated, 0);
        assert_eq!(state.difficulty_multiplier, 1.0);
    }

    #[test]
    fn test_levels_follow_thresholds() {
        let now = Utc::now();
        // 175 donated raises the dynamic multiplier to 1.25, so level 6
        // (base 175) needs 219 and the mech sits at level 5 (125).
        let cases = [(5, 1), (10, 2), (25, 3), (99, 4), (175, 5)];
        for (amount, expected_level) in cases {
            let state = compute_state(&[added_at(1, amount, now)], None, now);
            assert_eq!(state.level, expected_level, "amount {amount}");
        }
    }

    #[test]
    fn test_dynamic_difficulty_raises_late_thresholds() {
        let now = Utc::now();
        // 400 donated puts the dynamic multiplier at 1.5, so level 7
        // (base 275) needs 413 and the mech stays at level 6 (263).
        let state = compute_state(&[added_at(1, 400, now)], None, now);
        assert_eq!(state.difficulty_multiplier, 1.5);
        assert_eq!(state.level, 6);
    }

    #[test]
    fn test_static_override_wins() {
        let now = Utc::now();
        let state = compute_state(&[added_at(1, 400, now)], Some(1.0), now);
        assert_eq!(state.difficulty_multiplier, 1.0);
        assert_eq!(state.level, 8);
        assert!(matches!(state.difficulty_mode, DifficultyMode::Static(_)));
    }

    #[test]
    fn test_power_decays_but_never_below_zero() {
        let now = Utc::now();
        let old = now - ChronoDuration::hours(100);
        // Level 2 decays 0.2/h; after 100h that is 20 of the 10 donated.
        let state = compute_state(&[added_at(1, 10, old)], None, now);
        assert_eq!(state.total_donated, 10);
        assert_eq!(state.power, 0);
        assert_eq!(state.level, 2, "decay must not lower the level");
    }

    #[test]
    fn test_fresh_donation_has_no_decay() {
        let now = Utc::now();
        let state = compute_state(&[added_at(1, 50, now)], None, now);
        assert_eq!(state.power, 50);
    }

    #[test]
    fn test_deleted_donations_do_not_count() {
        let now = Utc::now();
        let events = [
            added_at(1, 30, now),
            DonationEvent::DonationDeleted {
                seq: 2,
                target_seq: 1,
                recorded_at: now,
            },
        ];
        let state = compute_state(&events, None, now);
        assert_eq!(state.total_donated, 0);
        assert_eq!(state.level, 1);
    }

    #[test]
    fn test_speed_is_clamped() {
        let now = Utc::now();
        let low = compute_state(&[], None, now);
        assert!(low.speed >= SPEED_MIN && low.speed <= SPEED_MAX);

        let high = compute_state(&[added_at(1, 1200, now)], None, now);
        assert!(high.speed >= SPEED_MIN && high.speed <= SPEED_MAX);
    }

    #[test]
    fn test_frame_delay_scales_inverse_to_speed() {
        assert!(frame_delay_ms(0.5) > frame_delay_ms(2.0));
    }

    fn service_with(
        events: Vec<DonationEvent>,
        override_multiplier: Option<f64>,
    ) -> MechService<MockDonationLedger, MockConfigStore> {
        let mut ledger = MockDonationLedger::new();
        ledger.expect_events().returning(move || Ok(events.clone()));

        let mut store = MockConfigStore::new();
        store.expect_load().returning(move || {
            let mut config = PanelConfig::default();
            config.mech_difficulty_override = override_multiplier;
            Ok(config)
        });

        MechService::new(Arc::new(ledger), Arc::new(store), Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_state_is_cached_between_reads() {
        let mut ledger = MockDonationLedger::new();
        // One ledger read despite two state() calls
        ledger.expect_events().times(1).returning(|| Ok(vec![]));
        let mut store = MockConfigStore::new();
        store
            .expect_load()
            .times(1)
            .returning(|| Ok(PanelConfig::default()));

        let service = MechService::new(Arc::new(ledger), Arc::new(store), Duration::from_secs(60));
        let first = service.state().await.unwrap();
        let second = service.state().await.unwrap();
        assert_eq!(first.level, second.level);
    }

    #[tokio::test]
    async fn test_set_difficulty_validates_range() {
        let mut store = MockConfigStore::new();
        store.expect_load().returning(|| Ok(PanelConfig::default()));
        store.expect_save().returning(|_| Ok(()));
        let ledger = MockDonationLedger::new();
        let service = MechService::new(Arc::new(ledger), Arc::new(store), Duration::from_secs(5));

        for bad in [0.0, -1.0, 11.0, f64::NAN] {
            let result = service.set_difficulty(bad).await;
            assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
        }

        let info = service.set_difficulty(2.5).await.unwrap();
        assert_eq!(info.difficulty_multiplier, 2.5);
        assert!(matches!(info.mode, DifficultyMode::Static(_)));
    }

    #[tokio::test]
    async fn test_difficulty_reports_dynamic_without_override() {
        let service = service_with(vec![], None);
        let info = service.difficulty().await.unwrap();
        assert_eq!(info.difficulty_multiplier, 1.0);
        assert!(matches!(info.mode, DifficultyMode::Dynamic));
    }

    #[tokio::test]
    async fn test_full_reset_clears_ledger_and_override() {
        let mut ledger = MockDonationLedger::new();
        ledger.expect_clear().times(1).returning(|| Ok(()));
        let mut store = MockConfigStore::new();
        store.expect_load().returning(|| {
            let mut config = PanelConfig::default();
            config.mech_difficulty_override = Some(2.0);
            Ok(config)
        });
        store
            .expect_save()
            .withf(|config| config.mech_difficulty_override.is_none())
            .times(1)
            .returning(|_| Ok(()));

        let service = MechService::new(Arc::new(ledger), Arc::new(store), Duration::from_secs(5));
        let outcome = service.full_reset().await.unwrap();
        assert!(outcome.operations.iter().any(|op| op.contains("ledger")));
        assert!(outcome.operations.iter().any(|op| op.contains("override")));
    }

    #[tokio::test]
    async fn test_donation_status_reflects_config_flag() {
        let mut ledger = MockDonationLedger::new();
        ledger.expect_events().returning(|| Ok(vec![]));
        let mut store = MockConfigStore::new();
        store.expect_load().returning(|| {
            let mut config = PanelConfig::default();
            config.donations_enabled = false;
            Ok(config)
        });

        let service = MechService::new(Arc::new(ledger), Arc::new(store), Duration::from_secs(5));
        let status = service.donation_status().await.unwrap();
        assert_eq!(status["enabled"], false);
        assert_eq!(status["level"], 1);
    }
}
