//! DTOs for the donation endpoints.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_with::skip_serializing_none;
use std::sync::LazyLock;
use validator::Validate;

/// Donor names: word characters plus common punctuation.
static DONOR_NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w .,'-]{1,64}$").unwrap());

/// Body of `POST /api/donation/click`.
#[derive(Debug, Deserialize)]
pub struct DonationClickBody {
    /// `coffee` or `paypal`; anything else is rejected by the service.
    #[serde(rename = "type")]
    pub donation_type: Option<String>,
}

/// Response of `POST /api/donation/click`.
#[skip_serializing_none]
#[derive(Debug, Serialize)]
pub struct DonationClickResponse {
    pub success: bool,
    pub timestamp: Option<String>,
    pub message: Option<String>,
    pub error: Option<String>,
}

/// Body of `POST /api/donation/add-power`.
///
/// `amount` stays a raw JSON value because the test tool sends both
/// numbers and numeric strings.
#[derive(Debug, Deserialize)]
pub struct AddPowerBody {
    #[serde(default)]
    pub amount: Value,
    #[serde(rename = "type", default = "default_test_type")]
    pub donation_type: String,
    #[serde(default = "default_test_user")]
    pub user: String,
}

fn default_test_type() -> String {
    "test".to_string()
}

fn default_test_user() -> String {
    "Test".to_string()
}

impl AddPowerBody {
    /// Accepts integers and numeric strings; everything else is `None`.
    pub fn parsed_amount(&self) -> Option<i64> {
        match &self.amount {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

/// Body of `POST /api/donation/submit`.
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitDonationBody {
    #[validate(range(min = 1, message = "Donation amount must be positive"))]
    pub amount: i64,
    #[validate(regex(path = "*DONOR_NAME_REGEX", message = "Invalid donor name"))]
    pub donor_name: Option<String>,
    pub publish_to_discord: Option<bool>,
    pub source: Option<String>,
}

/// Body of `POST /api/test-mech-animation`.
#[derive(Debug, Deserialize, Validate)]
pub struct TestAnimationBody {
    #[validate(regex(path = "*DONOR_NAME_REGEX", message = "Invalid donor name"))]
    pub donor_name: Option<String>,
    pub amount: Option<String>,
    #[serde(default)]
    pub total_donations: i64,
}

/// Body of `POST /api/mech-speed-config`.
#[derive(Debug, Deserialize)]
pub struct SpeedConfigBody {
    #[serde(default)]
    pub total_donations: i64,
}

/// Body of `POST /api/mech/difficulty`.
#[derive(Debug, Deserialize)]
pub struct DifficultyBody {
    pub difficulty_multiplier: Option<f64>,
    #[serde(default)]
    pub manual_override: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_add_power_amount_accepts_number_and_string() {
        let body: AddPowerBody = serde_json::from_value(json!({"amount": 25})).unwrap();
        assert_eq!(body.parsed_amount(), Some(25));
        assert_eq!(body.donation_type, "test");
        assert_eq!(body.user, "Test");

        let body: AddPowerBody = serde_json::from_value(json!({"amount": "-10"})).unwrap();
        assert_eq!(body.parsed_amount(), Some(-10));

        let body: AddPowerBody = serde_json::from_value(json!({"amount": "lots"})).unwrap();
        assert_eq!(body.parsed_amount(), None);

        let body: AddPowerBody = serde_json::from_value(json!({})).unwrap();
        assert_eq!(body.parsed_amount(), None);
    }

    #[test]
    fn test_submit_body_validation() {
        let body = SubmitDonationBody {
            amount: 0,
            donor_name: None,
            publish_to_discord: None,
            source: None,
        };
        assert!(body.validate().is_err());

        let body = SubmitDonationBody {
            amount: 10,
            donor_name: Some("Max M.".to_string()),
            publish_to_discord: Some(true),
            source: None,
        };
        assert!(body.validate().is_ok());

        let body = SubmitDonationBody {
            amount: 10,
            donor_name: Some("<script>".to_string()),
            publish_to_discord: None,
            source: None,
        };
        assert!(body.validate().is_err());
    }
}
