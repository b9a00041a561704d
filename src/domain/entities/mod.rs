//! Core domain entities representing the panel's data model.
//!
//! Entities are plain data structures without service logic. The one
//! exception is the donation replay rule, which lives next to the event
//! types it interprets.
//!
//! # Entity Types
//!
//! - [`DonationEvent`] / [`DonationRecord`] - the append-only donation ledger
//! - [`MechState`] - derived mech snapshot and the static level table
//! - [`PanelConfig`] - persisted panel configuration
//! - [`SpamProtectionConfig`] - bot spam-protection settings
//! - [`ContainerInfo`] - docker container rows

pub mod container;
pub mod donation;
pub mod mech;
pub mod panel_config;
pub mod spam;

pub use container::ContainerInfo;
pub use donation::{
    DonationEvent, DonationRecord, DonationStats, DonationType, InvalidDonationType, NewDonation,
    replay,
};
pub use mech::{DifficultyMode, LevelSpec, LEVELS, MAX_LEVEL, MIN_LEVEL, MechState, level_spec};
pub use panel_config::{ContainerConfig, PanelConfig};
pub use spam::{GlobalSpamSettings, SpamProtectionConfig, SpamRule};
