//! Store and provider traits consumed by the application services.
//!
//! Each trait is `mockall::automock`-ed under `cfg(test)` so services can
//! be unit-tested without touching the filesystem or a docker daemon.

pub mod action_log;
pub mod config_store;
pub mod container_provider;
pub mod donation_ledger;

pub use action_log::{ActionEntry, ActionLog};
pub use config_store::ConfigStore;
pub use container_provider::ContainerProvider;
pub use donation_ledger::DonationLedger;

#[cfg(test)]
pub use action_log::MockActionLog;
#[cfg(test)]
pub use config_store::MockConfigStore;
#[cfg(test)]
pub use container_provider::MockContainerProvider;
#[cfg(test)]
pub use donation_ledger::MockDonationLedger;
