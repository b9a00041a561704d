//! Donation ledger operations: manual submissions, test power, history
//! and event-sourced delete/restore.

use std::sync::Arc;

use serde_json::json;

use crate::domain::entities::{
    DonationEvent, DonationRecord, DonationStats, NewDonation, replay,
};
use crate::domain::repositories::{ActionEntry, ActionLog, DonationLedger};
use crate::error::AppError;

/// A manual donation entry from the web UI modal.
#[derive(Debug, Clone)]
pub struct DonationSubmission {
    pub amount: i64,
    pub donor_name: String,
    pub publish_to_discord: bool,
    pub source: String,
}

/// Outcome of a recorded donation.
#[derive(Debug, Clone, serde::Serialize)]
pub struct DonationOutcome {
    pub seq: u64,
    pub donor: String,
    pub amount: i64,
    pub source: String,
    pub publish_to_discord: bool,
}

/// Outcome of a delete/restore compensation.
#[derive(Debug, Clone, serde::Serialize)]
pub struct DeleteOutcome {
    /// `"Deleted"` when the target was an active donation,
    /// `"Restored"` when the target was a tombstone.
    pub action: &'static str,
    pub event_type: &'static str,
    pub deleted_seq: u64,
}

/// Donation history page: newest first, plus aggregates over the whole
/// ledger.
#[derive(Debug, Clone)]
pub struct DonationHistory {
    pub donations: Vec<DonationRecord>,
    pub stats: DonationStats,
}

/// Service over the append-only donation ledger.
pub struct DonationService<L: DonationLedger> {
    ledger: Arc<L>,
    action_log: Arc<dyn ActionLog>,
}

impl<L: DonationLedger> DonationService<L> {
    pub fn new(ledger: Arc<L>, action_log: Arc<dyn ActionLog>) -> Self {
        Self { ledger, action_log }
    }

    /// Records a manual donation.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for non-positive amounts or a
    /// blank donor name.
    pub async fn submit(&self, submission: DonationSubmission) -> Result<DonationOutcome, AppError> {
        if submission.amount <= 0 {
            return Err(AppError::bad_request(
                "Donation amount must be positive",
                json!({ "amount": submission.amount }),
            ));
        }

        let donor = if submission.donor_name.trim().is_empty() {
            "Anonymous".to_string()
        } else {
            submission.donor_name.trim().to_string()
        };

        let event = self
            .ledger
            .append_donation(NewDonation {
                donor: donor.clone(),
                amount: submission.amount,
                source: submission.source.clone(),
            })
            .await?;

        if let Err(e) = self
            .action_log
            .record(ActionEntry::new(
                "DONATION",
                format!("Donation of ${} by {donor}", submission.amount),
                "Web UI",
                format!("source: {}", submission.source),
            ))
            .await
        {
            tracing::warn!("Failed to log donation submission: {e}");
        }

        Ok(DonationOutcome {
            seq: event.seq(),
            donor,
            amount: submission.amount,
            source: submission.source,
            publish_to_discord: submission.publish_to_discord,
        })
    }

    /// Appends a positive test donation (the add-power test tool).
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for non-positive amounts; the
    /// negative-amount workaround lives in the HTTP handler, which never
    /// calls this for reductions.
    pub async fn add_test_power(
        &self,
        amount: i64,
        donation_type: &str,
        user: &str,
    ) -> Result<DonationOutcome, AppError> {
        self.submit(DonationSubmission {
            amount,
            donor_name: user.to_string(),
            publish_to_discord: false,
            source: format!("test:{donation_type}"),
        })
        .await
    }

    /// Donation history, newest first, limited to `limit` records.
    ///
    /// Stats are computed over the full ledger, not the returned page.
    pub async fn history(&self, limit: usize) -> Result<DonationHistory, AppError> {
        let events = self.ledger.events().await?;
        let records = replay(&events);
        let stats = DonationStats::from_records(&records);

        let mut donations = records;
        donations.reverse();
        donations.truncate(limit);

        Ok(DonationHistory { donations, stats })
    }

    /// Deletes or restores the event at `index` (position in the ledger)
    /// by appending a compensation event.
    ///
    /// Targeting an active donation deletes it; targeting a tombstone
    /// restores the donation that tombstone removed.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for an out-of-range index.
    pub async fn delete_or_restore(&self, index: usize) -> Result<DeleteOutcome, AppError> {
        let events = self.ledger.events().await?;
        let target = events.get(index).ok_or_else(|| {
            AppError::not_found(
                "No ledger event at that index",
                json!({ "index": index, "events": events.len() }),
            )
        })?;

        let (action, event_type) = match target {
            DonationEvent::DonationAdded { .. } => ("Deleted", "DonationAdded"),
            DonationEvent::DonationDeleted { .. } => ("Restored", "DonationDeleted"),
        };
        let target_seq = target.seq();

        self.ledger.append_compensation(target_seq).await?;

        Ok(DeleteOutcome {
            action,
            event_type,
            deleted_seq: target_seq,
        })
    }
}
