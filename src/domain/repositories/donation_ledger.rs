//! Store trait for the append-only donation event ledger.

use crate::domain::entities::{DonationEvent, NewDonation};
use crate::error::AppError;
use async_trait::async_trait;

/// Append-only event log backing the donation mech.
///
/// Implementations assign monotonically increasing sequence numbers and
/// never mutate written events. Deletion and restoration happen through
/// compensation events (see [`crate::domain::entities::replay`]).
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::FileDonationLedger`] - JSON
///   lines file in the data directory
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DonationLedger: Send + Sync {
    /// Appends a `DonationAdded` event and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for non-positive amounts and
    /// [`AppError::ServiceUnavailable`] on write failures.
    async fn append_donation(&self, donation: NewDonation) -> Result<DonationEvent, AppError>;

    /// Appends a `DonationDeleted` compensation event targeting
    /// `target_seq` and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no event with `target_seq`
    /// exists and [`AppError::ServiceUnavailable`] on write failures.
    async fn append_compensation(&self, target_seq: u64) -> Result<DonationEvent, AppError>;

    /// Returns all events in sequence order.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::ServiceUnavailable`] on read failures.
    async fn events(&self) -> Result<Vec<DonationEvent>, AppError>;

    /// Removes every event. Used by the mech full reset and the admin CLI.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::ServiceUnavailable`] on write failures.
    async fn clear(&self) -> Result<(), AppError>;
}
