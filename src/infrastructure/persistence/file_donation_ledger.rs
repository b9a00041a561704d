//! JSON-lines implementation of the donation ledger.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::domain::entities::{DonationEvent, NewDonation};
use crate::domain::repositories::DonationLedger;
use crate::error::{AppError, map_io_error};

struct LedgerInner {
    events: Vec<DonationEvent>,
    next_seq: u64,
}

/// Donation ledger persisted as one JSON object per line.
///
/// Events are held in memory for reads; appends write through to the file
/// before becoming visible. All writes serialize through a single mutex,
/// which also makes sequence assignment race-free.
pub struct FileDonationLedger {
    path: PathBuf,
    inner: Mutex<LedgerInner>,
}

impl FileDonationLedger {
    /// Opens the ledger at `data_dir/donations.jsonl`, replaying any
    /// existing events into memory.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::ServiceUnavailable`] on unreadable storage and
    /// [`AppError::Internal`] on a corrupt line.
    pub async fn open(data_dir: &Path) -> Result<Self, AppError> {
        let path = data_dir.join("donations.jsonl");

        let events = match fs::read_to_string(&path).await {
            Ok(raw) => raw
                .lines()
                .filter(|line| !line.trim().is_empty())
                .map(|line| {
                    serde_json::from_str::<DonationEvent>(line).map_err(|e| {
                        tracing::error!("Corrupt ledger line in {}: {e}", path.display());
                        AppError::internal(
                            "Donation ledger is corrupt",
                            json!({ "path": path.display().to_string() }),
                        )
                    })
                })
                .collect::<Result<Vec<_>, _>>()?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(map_io_error("ledger open", e)),
        };

        let next_seq = events.iter().map(DonationEvent::seq).max().unwrap_or(0) + 1;

        Ok(Self {
            path,
            inner: Mutex::new(LedgerInner { events, next_seq }),
        })
    }

    async fn write_line(&self, event: &DonationEvent) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| map_io_error("ledger append", e))?;
        }

        let mut line = serde_json::to_string(event).map_err(|e| {
            AppError::internal(
                "Failed to serialize ledger event",
                json!({ "reason": e.to_string() }),
            )
        })?;
        line.push('\n');

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| map_io_error("ledger append", e))?;
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| map_io_error("ledger append", e))?;
        file.flush()
            .await
            .map_err(|e| map_io_error("ledger append", e))?;

        Ok(())
    }
}

#[async_trait]
impl DonationLedger for FileDonationLedger {
    async fn append_donation(&self, donation: NewDonation) -> Result<DonationEvent, AppError> {
        if donation.amount <= 0 {
            return Err(AppError::bad_request(
                "Donation amount must be positive",
                json!({ "amount": donation.amount }),
            ));
        }

        let mut inner = self.inner.lock().await;
        let event = DonationEvent::DonationAdded {
            seq: inner.next_seq,
            donor: donation.donor,
            amount: donation.amount,
            source: donation.source,
            recorded_at: Utc::now(),
        };

        self.write_line(&event).await?;
        inner.next_seq += 1;
        inner.events.push(event.clone());

        Ok(event)
    }

    async fn append_compensation(&self, target_seq: u64) -> Result<DonationEvent, AppError> {
        let mut inner = self.inner.lock().await;

        if !inner.events.iter().any(|e| e.seq() == target_seq) {
            return Err(AppError::not_found(
                "No ledger event with that sequence number",
                json!({ "target_seq": target_seq }),
            ));
        }

        let event = DonationEvent::DonationDeleted {
            seq: inner.next_seq,
            target_seq,
            recorded_at: Utc::now(),
        };

        self.write_line(&event).await?;
        inner.next_seq += 1;
        inner.events.push(event.clone());

        Ok(event)
    }

    async fn events(&self) -> Result<Vec<DonationEvent>, AppError> {
        Ok(self.inner.lock().await.events.clone())
    }

    async fn clear(&self) -> Result<(), AppError> {
        let mut inner = self.inner.lock().await;

        match fs::remove_file(&self.path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(map_io_error("ledger clear", e)),
        }

        inner.events.clear();
        inner.next_seq = 1;
        Ok(())
    }
}
