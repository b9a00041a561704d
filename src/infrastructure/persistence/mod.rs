//! File-backed store implementations.

pub mod file_donation_ledger;
pub mod json_config_store;

pub use file_donation_ledger::FileDonationLedger;
pub use json_config_store::JsonConfigStore;
