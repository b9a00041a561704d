//! # DDC Control Panel
//!
//! Web control panel for the DDC Discord container-management bot, built
//! with Axum.
//!
//! ## Architecture
//!
//! The crate follows a layered structure with explicit dependency
//! injection:
//!
//! - **Domain Layer** ([`domain`]) - entities and store traits
//! - **Application Layer** ([`application`]) - services holding the
//!   business logic (mech leveling, donation ledger, diagnostics, ...)
//! - **Infrastructure Layer** ([`infrastructure`]) - JSON/JSONL file
//!   stores, docker CLI access, caches and log sinks
//! - **API Layer** ([`api`]) - JSON/binary route handlers, DTOs and
//!   middleware
//! - **Web Layer** ([`web`]) - server-rendered HTML pages
//!
//! ## Features
//!
//! - Event-sourced donation ledger driving the gamified mech
//! - Procedural GIF/WebP mech rendering
//! - First-time setup flow and HTTP Basic authentication
//! - Time-boxed debug logging and host diagnostics
//! - Heartbeat monitor script generation
//!
//! ## Quick Start
//!
//! ```bash
//! export DDC_DATA_DIR="./data"
//! export LISTEN="0.0.0.0:8374"
//!
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via
//! [`config::Config`]. See the [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod telemetry;
pub mod web;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{
        AuthService, DonationService, DonationTrackingService, MechService,
    };
    pub use crate::domain::entities::{DonationEvent, MechState, PanelConfig};
    pub use crate::error::AppError;
    pub use crate::state::AppState;
}
