//! Request/response DTOs for the JSON API.

pub mod donation;
pub mod panel;

pub use donation::{
    AddPowerBody, DifficultyBody, DonationClickBody, DonationClickResponse, SpeedConfigBody,
    SubmitDonationBody, TestAnimationBody,
};
pub use panel::{EnableDebugForm, MonitorScriptForm, SetupForm};
