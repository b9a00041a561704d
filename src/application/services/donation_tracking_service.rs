//! Donation button click tracking.
//!
//! A click is validated, attributed to an actor, timestamped and written
//! to two sinks (audit log and the Matrix channel mirror). Identification
//! and both log writes are best-effort: nothing in this pipeline may fail
//! the click itself, so the public entry point is infallible by type.

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};

use crate::domain::entities::DonationType;
use crate::domain::repositories::{ActionEntry, ActionLog};

/// Client-side facts available for attributing a click.
#[derive(Debug, Clone, Default)]
pub struct ClientContext {
    /// Authenticated panel user, when the click came from a logged-in session.
    pub username: Option<String>,
    /// Raw `X-Forwarded-For` header value, possibly a comma-separated chain.
    pub forwarded_for: Option<String>,
    /// Peer socket address.
    pub remote_addr: Option<String>,
}

/// A donation click tracking request.
#[derive(Debug, Clone)]
pub struct DonationClickRequest {
    pub donation_type: String,
    pub context: ClientContext,
}

/// Outcome of a tracking attempt; immutable once constructed.
#[derive(Debug, Clone)]
pub struct DonationClickResult {
    pub success: bool,
    pub message: String,
    /// ISO-8601 UTC timestamp, present only on success.
    pub timestamp: Option<String>,
    pub error: Option<String>,
}

impl DonationClickResult {
    fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: String::new(),
            timestamp: None,
            error: Some(error.into()),
        }
    }
}

/// Service recording donation button clicks.
pub struct DonationTrackingService {
    action_log: Arc<dyn ActionLog>,
    matrix_log: Arc<dyn ActionLog>,
}

impl DonationTrackingService {
    pub fn new(action_log: Arc<dyn ActionLog>, matrix_log: Arc<dyn ActionLog>) -> Self {
        Self {
            action_log,
            matrix_log,
        }
    }

    /// Records a donation button click.
    ///
    /// Invalid donation types fail with no side effects. Everything after
    /// validation degrades instead of failing: actor identification falls
    /// back through forwarded-for, peer address and finally `"IP: Unknown"`,
    /// and a failing log sink is warned about and swallowed.
    pub async fn record_donation_click(&self, request: DonationClickRequest) -> DonationClickResult {
        let donation_type: DonationType = match request.donation_type.parse() {
            Ok(t) => t,
            Err(e) => return DonationClickResult::failure(e.to_string()),
        };

        let identifier = identify_actor(&request.context);
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);

        metrics::counter!("donation_clicks_total", "type" => donation_type.as_str())
            .increment(1);

        if let Err(e) = self
            .action_log
            .record(ActionEntry::new(
                "DONATION_CLICK",
                format!("Donation Button ({})", donation_type.as_str()),
                "Web UI DonationTrackingService",
                format!("Donation button clicked by: {identifier}"),
            ))
            .await
        {
            tracing::warn!("Failed to log donation action: {e}");
        }

        if let Err(e) = self
            .matrix_log
            .record(ActionEntry::new(
                "DONATION_CLICK",
                format!("Donation Button ({})", donation_type.as_str()),
                identifier.clone(),
                format!("timestamp: {timestamp}"),
            ))
            .await
        {
            tracing::warn!("Failed to log Matrix server action: {e}");
        }

        DonationClickResult {
            success: true,
            message: "Donation button click recorded for Matrix Thank You animation".to_string(),
            timestamp: Some(timestamp),
            error: None,
        }
    }
}

/// Resolves the best available actor identifier. Never fails.
fn identify_actor(context: &ClientContext) -> String {
    if let Some(username) = context
        .username
        .as_deref()
        .filter(|u| !u.trim().is_empty())
    {
        return format!("Web User: {username}");
    }

    ip_identifier(context)
}

fn ip_identifier(context: &ClientContext) -> String {
    if let Some(forwarded) = context.forwarded_for.as_deref() {
        // Only the first hop is the client; later entries are proxies.
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return format!("IP: {first}");
            }
        }
    }

    match context
        .remote_addr
        .as_deref()
        .filter(|addr| !addr.trim().is_empty())
    {
        Some(addr) => format!("IP: {addr}"),
        None => "IP: Unknown".to_string(),
    }
}
