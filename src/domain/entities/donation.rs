//! Donation ledger entities and replay rules.
//!
//! Donations are stored as an append-only event log. Nothing is ever
//! rewritten in place: deleting a donation appends a compensation event,
//! and deleting a compensation event restores the original donation.
//! Current state is always derived by replaying the full log in order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The two donation buttons exposed by the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DonationType {
    Coffee,
    Paypal,
}

/// Rejection for any value outside the fixed donation-type set.
#[derive(Debug, thiserror::Error)]
#[error("Invalid donation type")]
pub struct InvalidDonationType;

impl std::str::FromStr for DonationType {
    type Err = InvalidDonationType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "coffee" => Ok(Self::Coffee),
            "paypal" => Ok(Self::Paypal),
            _ => Err(InvalidDonationType),
        }
    }
}

impl DonationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Coffee => "coffee",
            Self::Paypal => "paypal",
        }
    }
}

/// A single entry in the append-only donation ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DonationEvent {
    DonationAdded {
        seq: u64,
        donor: String,
        /// Whole currency units; always positive.
        amount: i64,
        source: String,
        recorded_at: DateTime<Utc>,
    },
    DonationDeleted {
        seq: u64,
        /// Sequence number of the event being compensated.
        target_seq: u64,
        recorded_at: DateTime<Utc>,
    },
}

impl DonationEvent {
    pub fn seq(&self) -> u64 {
        match self {
            Self::DonationAdded { seq, .. } | Self::DonationDeleted { seq, .. } => *seq,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::DonationAdded { .. } => "DonationAdded",
            Self::DonationDeleted { .. } => "DonationDeleted",
        }
    }
}

/// Input data for appending a donation to the ledger.
#[derive(Debug, Clone)]
pub struct NewDonation {
    pub donor: String,
    pub amount: i64,
    pub source: String,
}

/// A donation as seen after replay, with its current deletion flag.
#[derive(Debug, Clone, Serialize)]
pub struct DonationRecord {
    pub seq: u64,
    pub donor: String,
    pub amount: i64,
    pub source: String,
    pub recorded_at: DateTime<Utc>,
    pub deleted: bool,
}

/// Aggregates over the active (non-deleted) donations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DonationStats {
    pub total_power: i64,
    pub total_donations: usize,
    pub average_donation: f64,
}

impl DonationStats {
    pub fn from_records(records: &[DonationRecord]) -> Self {
        let active: Vec<_> = records.iter().filter(|r| !r.deleted).collect();
        let total_power: i64 = active.iter().map(|r| r.amount).sum();
        let total_donations = active.len();
        let average_donation = if total_donations == 0 {
            0.0
        } else {
            total_power as f64 / total_donations as f64
        };
        Self {
            total_power,
            total_donations,
            average_donation,
        }
    }
}

/// Replays the event log into the current set of donation records.
///
/// Compensation semantics: a `DonationDeleted` targeting a `DonationAdded`
/// marks that donation deleted; a `DonationDeleted` targeting another
/// `DonationDeleted` restores the donation that tombstone had removed.
/// The last compensation in sequence order wins.
pub fn replay(events: &[DonationEvent]) -> Vec<DonationRecord> {
    let mut records: Vec<DonationRecord> = Vec::new();
    // target_seq of each tombstone, so tombstoning a tombstone can be resolved
    let mut tombstone_targets: std::collections::HashMap<u64, u64> = std::collections::HashMap::new();

    for event in events {
        match event {
            DonationEvent::DonationAdded {
                seq,
                donor,
                amount,
                source,
                recorded_at,
            } => {
                records.push(DonationRecord {
                    seq: *seq,
                    donor: donor.clone(),
                    amount: *amount,
                    source: source.clone(),
                    recorded_at: *recorded_at,
                    deleted: false,
                });
            }
            DonationEvent::DonationDeleted {
                seq, target_seq, ..
            } => {
                if let Some(original_seq) = tombstone_targets.get(target_seq).copied() {
                    // Tombstoning a tombstone restores the original donation.
                    if let Some(record) = records.iter_mut().find(|r| r.seq == original_seq) {
                        record.deleted = false;
                    }
                    tombstone_targets.insert(*seq, original_seq);
                } else if let Some(record) = records.iter_mut().find(|r| r.seq == *target_seq) {
                    record.deleted = true;
                    tombstone_targets.insert(*seq, *target_seq);
                }
                // A dangling target_seq is ignored: replay must never fail.
            }
        }
    }

    records
}
