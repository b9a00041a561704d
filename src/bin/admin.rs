//! CLI administration tool for the DDC control panel.
//!
//! Operates directly on the data directory, so the panel does not need to
//! be running (or reachable) for recovery tasks.
//!
//! # Usage
//!
//! ```bash
//! # Set (or replace) the panel password
//! cargo run --bin admin -- password set
//!
//! # Remove the password, re-enabling the /setup flow
//! cargo run --bin admin -- password clear
//!
//! # Show the current mech state
//! cargo run --bin admin -- mech status
//!
//! # Reset the mech to level 1
//! cargo run --bin admin -- mech reset
//!
//! # List the donation ledger
//! cargo run --bin admin -- donations list
//! ```
//!
//! # Environment Variables
//!
//! - `DDC_DATA_DIR` (default `./data`): the panel's data directory

use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Password};

use ddc_panel::application::services::auth_service::generate_password_hash;
use ddc_panel::application::services::mech_service::compute_state;
use ddc_panel::config::Config;
use ddc_panel::domain::entities::replay;
use ddc_panel::domain::repositories::{ConfigStore, DonationLedger};
use ddc_panel::infrastructure::persistence::{FileDonationLedger, JsonConfigStore};

/// CLI tool for managing the DDC control panel.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage the panel password
    Password {
        #[command(subcommand)]
        action: PasswordAction,
    },

    /// Mech state and reset
    Mech {
        #[command(subcommand)]
        action: MechAction,
    },

    /// Donation ledger inspection
    Donations {
        #[command(subcommand)]
        action: DonationAction,
    },
}

#[derive(Subcommand)]
enum PasswordAction {
    /// Set or replace the panel password
    Set,
    /// Remove the password (re-enables first-time setup)
    Clear {
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum MechAction {
    /// Show the derived mech state
    Status,
    /// Clear the ledger and difficulty override
    Reset {
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum DonationAction {
    /// Print all ledger events with their replayed state
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = Config::from_env();

    let store = JsonConfigStore::new(&config.data_dir);
    let ledger = FileDonationLedger::open(&config.data_dir).await?;

    match cli.command {
        Commands::Password { action } => match action {
            PasswordAction::Set => password_set(&store).await?,
            PasswordAction::Clear { yes } => password_clear(&store, yes).await?,
        },
        Commands::Mech { action } => match action {
            MechAction::Status => mech_status(&store, &ledger).await?,
            MechAction::Reset { yes } => mech_reset(&store, &ledger, yes).await?,
        },
        Commands::Donations { action } => match action {
            DonationAction::List => donations_list(&ledger).await?,
        },
    }

    Ok(())
}

async fn password_set(store: &JsonConfigStore) -> Result<()> {
    let password = Password::new()
        .with_prompt("New panel password")
        .with_confirmation("Confirm password", "Passwords do not match")
        .interact()?;

    if password.len() < 6 {
        anyhow::bail!("Password must be at least 6 characters long");
    }

    let mut config = store.load().await?;
    config.web_ui_password_hash = Some(generate_password_hash(&password));
    config.web_ui_user = "admin".to_string();
    store.save(&config).await?;

    println!("{}", "Password updated.".green());
    println!("Login as {} with the new password.", "admin".bold());
    Ok(())
}

async fn password_clear(store: &JsonConfigStore, yes: bool) -> Result<()> {
    if !yes
        && !Confirm::new()
            .with_prompt("Remove the panel password? The web UI will be open for setup again")
            .default(false)
            .interact()?
    {
        println!("Aborted.");
        return Ok(());
    }

    let mut config = store.load().await?;
    config.web_ui_password_hash = None;
    store.save(&config).await?;

    println!("{}", "Password removed; /setup is available again.".yellow());
    Ok(())
}

async fn mech_status(store: &JsonConfigStore, ledger: &FileDonationLedger) -> Result<()> {
    let config = store.load().await?;
    let events = ledger.events().await?;
    let state = compute_state(&events, config.mech_difficulty_override, Utc::now());

    println!("{}", "Mech status".bold());
    println!(
        "  Level:       {} ({})",
        state.level.to_string().cyan(),
        state.level_name
    );
    println!("  Power:       ${}", state.power);
    println!("  Donated:     ${}", state.total_donated);
    println!("  Threshold:   ${}", state.threshold);
    println!(
        "  Difficulty:  x{} ({:?})",
        state.difficulty_multiplier, state.difficulty_mode
    );
    println!("  Events:      {}", events.len());
    Ok(())
}

async fn mech_reset(store: &JsonConfigStore, ledger: &FileDonationLedger, yes: bool) -> Result<()> {
    if !yes
        && !Confirm::new()
            .with_prompt("Clear the donation ledger and reset the mech to level 1?")
            .default(false)
            .interact()?
    {
        println!("Aborted.");
        return Ok(());
    }

    ledger.clear().await?;

    let mut config = store.load().await?;
    if config.mech_difficulty_override.take().is_some() {
        store.save(&config).await?;
    }

    println!("{}", "Mech reset to level 1.".green());
    Ok(())
}

async fn donations_list(ledger: &FileDonationLedger) -> Result<()> {
    let events = ledger.events().await?;
    if events.is_empty() {
        println!("Ledger is empty.");
        return Ok(());
    }

    let records = replay(&events);
    println!("{}", "Donation ledger".bold());
    for record in &records {
        let marker = if record.deleted {
            "deleted".red()
        } else {
            "active".green()
        };
        println!(
            "  #{:<4} {:<20} ${:<6} {:<16} [{}]",
            record.seq,
            record.donor,
            record.amount,
            record.recorded_at.format("%Y-%m-%d %H:%M"),
            marker
        );
    }
    Ok(())
}
