//! Mech leveling model.
//!
//! The mech is a derived view over the donation ledger: level, power and
//! animation speed are computed from the active donation total, the
//! difficulty multiplier and elapsed time. Nothing here is persisted.

use serde::Serialize;

/// Static description of one evolution level.
#[derive(Debug, Clone, Copy)]
pub struct LevelSpec {
    pub level: u8,
    pub name: &'static str,
    /// Cumulative active-donation total required to reach this level.
    pub base_threshold: i64,
}

/// The eleven evolution stages, in ascending order.
///
/// `base_threshold` is scaled by the difficulty multiplier before
/// comparison, so the table itself never changes at runtime.
pub const LEVELS: [LevelSpec; 11] = [
    LevelSpec { level: 1, name: "Scrapling", base_threshold: 0 },
    LevelSpec { level: 2, name: "Servo Pup", base_threshold: 10 },
    LevelSpec { level: 3, name: "Gear Walker", base_threshold: 25 },
    LevelSpec { level: 4, name: "Steel Strider", base_threshold: 50 },
    LevelSpec { level: 5, name: "Plasma Runner", base_threshold: 100 },
    LevelSpec { level: 6, name: "Titan Frame", base_threshold: 175 },
    LevelSpec { level: 7, name: "Storm Colossus", base_threshold: 275 },
    LevelSpec { level: 8, name: "Fusion Juggernaut", base_threshold: 400 },
    LevelSpec { level: 9, name: "Quantum Sentinel", base_threshold: 600 },
    LevelSpec { level: 10, name: "Omega Mech", base_threshold: 850 },
    LevelSpec { level: 11, name: "Ascended Mech", base_threshold: 1200 },
];

pub const MIN_LEVEL: u8 = 1;
pub const MAX_LEVEL: u8 = 11;

/// How the evolution difficulty multiplier is determined.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "mode", content = "multiplier")]
pub enum DifficultyMode {
    /// Derived from the donation total (default).
    Dynamic,
    /// Operator override via the difficulty API.
    Static(f64),
}

/// Bounds accepted for a static difficulty override.
pub const DIFFICULTY_MIN: f64 = 0.1;
pub const DIFFICULTY_MAX: f64 = 10.0;

/// Snapshot of the mech derived from the ledger at one point in time.
#[derive(Debug, Clone, Serialize)]
pub struct MechState {
    pub level: u8,
    pub level_name: &'static str,
    /// Current power after decay, never negative.
    pub power: i64,
    /// Sum of active donation amounts, ignoring decay.
    pub total_donated: i64,
    /// Scaled donation total required for the next level
    /// (equals the top-level threshold once maxed out).
    pub threshold: i64,
    /// Animation speed factor, clamped to [0.25, 3.0].
    pub speed: f64,
    pub difficulty_multiplier: f64,
    pub difficulty_mode: DifficultyMode,
}

impl MechState {
    pub fn is_max_level(&self) -> bool {
        self.level >= MAX_LEVEL
    }
}

/// Returns the spec for a level, clamped into the valid range.
pub fn level_spec(level: u8) -> &'static LevelSpec {
    let idx = level.clamp(MIN_LEVEL, MAX_LEVEL) as usize - 1;
    &LEVELS[idx]
}
