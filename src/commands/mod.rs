//! Command-line interface.
//!
//! Every subcommand lives in its own module exposing an `XxxArgs` struct
//! and a `cmd` entry point. Handlers open the store through [`open_store`],
//! run one operation and print the outcome with the `msg_*` macros.

pub mod database;
pub mod fuel;
pub mod init;
pub mod remind;
pub mod stats;
pub mod vehicle;

use crate::db::db::Db;
use crate::libs::config::Config;
use crate::libs::messages::Message;
use crate::{msg_debug, msg_info, msg_warning};
use anyhow::Result;
use clap::{Parser, Subcommand};
use dialoguer::{theme::ColorfulTheme, Confirm};

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Configuration initialization")]
    Init(init::InitArgs),
    #[command(about = "Manage vehicles")]
    Vehicle(vehicle::VehicleArgs),
    #[command(about = "Record and browse refuelings")]
    Fuel(fuel::FuelArgs),
    #[command(about = "Fuel economy and cost statistics")]
    Stats(stats::StatsArgs),
    #[command(about = "Show tire calibration reminders")]
    Remind,
    #[command(about = "Database status and maintenance")]
    Db(database::DbArgs),
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub async fn menu() -> Result<()> {
        let cli = Self::parse();
        match cli.command {
            Commands::Init(args) => init::cmd(args),
            Commands::Vehicle(args) => vehicle::cmd(args).await,
            Commands::Fuel(args) => fuel::cmd(args).await,
            Commands::Stats(args) => stats::cmd(args).await,
            Commands::Remind => remind::cmd().await,
            Commands::Db(args) => database::cmd(args).await,
        }
    }
}

/// Opens the configured database and reports what the schema manager did.
pub(crate) fn open_store() -> Result<(Config, Db)> {
    let config = Config::read()?;
    let mut db = Db::from_config(&config)?;
    msg_debug!(Message::DatabaseLocation(db.location().to_string()));
    db.handle()?;

    if let Some(report) = db.last_migration_report() {
        if !report.applied.is_empty() {
            msg_info!(Message::MigrationsApplied(report.applied.len()));
        }
        for failure in &report.failed {
            msg_warning!(Message::MigrationSkipped(failure.to_string()));
        }
    }

    Ok((config, db))
}

/// Asks before a destructive action unless `assume_yes` is set.
pub(crate) fn confirm(prompt: Message, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    let confirmed = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt.to_string())
        .default(false)
        .interact()?;
    if !confirmed {
        msg_info!(Message::OperationCancelled);
    }
    Ok(confirmed)
}
