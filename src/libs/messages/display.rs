//! Text rendering for [`Message`].
//!
//! Every user-facing string lives here so the wording stays consistent
//! across commands:
//!
//! ```rust
//! use fuelbook::libs::messages::Message;
//!
//! assert_eq!(Message::VehicleNotFound(7).to_string(), "Vehicle #7 not found");
//! ```

use super::types::Message;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = match self {
            // === VEHICLE MESSAGES ===
            Message::VehicleCreated(name, id) => format!("Vehicle '{}' created with id {}", name, id),
            Message::VehicleUpdated(name) => format!("Vehicle '{}' updated", name),
            Message::VehicleDeleted(name) => format!("Vehicle '{}' deleted", name),
            Message::VehicleNotFound(id) => format!("Vehicle #{} not found", id),
            Message::VehicleHasEntries(name, count) => format!(
                "Vehicle '{}' still has {} fuel entries. Delete them first.",
                name, count
            ),
            Message::VehicleCalibrated(name, date) => format!("Calibration of '{}' recorded on {}", name, date),
            Message::VehiclesHeader => "Vehicles:".to_string(),
            Message::VehicleHeader(name) => format!("Vehicle '{}':", name),
            Message::NoVehiclesFound => "No vehicles registered yet. Add one with 'fuelbook vehicle add'.".to_string(),
            Message::ConfirmDeleteVehicle(name) => format!("Delete vehicle '{}'?", name),

            // === FUEL ENTRY MESSAGES ===
            Message::FuelEntryCreated(id) => format!("Fuel entry #{} recorded", id),
            Message::FuelEntryUpdated(id) => format!("Fuel entry #{} updated", id),
            Message::FuelEntryDeleted(id) => format!("Fuel entry #{} deleted", id),
            Message::FuelEntryNotFound(id) => format!("Fuel entry #{} not found", id),
            Message::FuelEntriesHeader(scope) => format!("Fuel entries for {}:", scope),
            Message::LatestFuelEntryHeader(name) => format!("Latest fuel entry of '{}':", name),
            Message::NoFuelEntriesFound => "No fuel entries found.".to_string(),
            Message::ConfirmDeleteFuelEntry(id) => format!("Delete fuel entry #{}?", id),
            Message::CalibrationRecordedWithEntry(name) => {
                format!("Tire calibration of '{}' recorded with this refueling", name)
            }

            // === STATISTICS MESSAGES ===
            Message::StatsHeader(scope) => format!("Statistics for {}:", scope),
            Message::EconomyHeader => "Average economy (km/L):".to_string(),
            Message::CostsHeader => "Costs:".to_string(),
            Message::InsufficientHistory(count) => format!(
                "Not enough history to compute economy ({} entries, at least 2 needed)",
                count
            ),
            Message::SkippedSegments(count) => format!("{} segments skipped (odometer did not advance)", count),
            Message::ManualEconomyFallback => "Using the manually entered economy figures".to_string(),
            Message::FuelComparison {
                best,
                price_ratio,
                economy_ratio,
            } => format!(
                "Best fuel right now: {} (price ratio {:.2}, economy ratio {:.2})",
                best, price_ratio, economy_ratio
            ),
            Message::FuelComparisonUnavailable => {
                "Fuel comparison needs a price and an economy figure for both fuels".to_string()
            }

            // === REMINDER MESSAGES ===
            Message::RemindersHeader => "Calibration reminders:".to_string(),
            Message::CalibrationReminder(name, status) => format!("{}: {}", name, status),
            Message::NoRemindersEnabled => "No vehicle has calibration reminders enabled.".to_string(),

            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved => "Configuration saved".to_string(),
            Message::ConfigDeleted => "Configuration deleted".to_string(),
            Message::ConfigModuleStorage => "Storage".to_string(),
            Message::ConfigModuleReminders => "Reminders".to_string(),

            // === DATABASE MESSAGES ===
            Message::DatabaseLocation(location) => format!("Database: {}", location),
            Message::DatabaseStatus(status) => format!("Status: {}", status),
            Message::DatabaseReconnected => "Database connection re-established".to_string(),
            Message::DatabaseReset => "Database reset. All vehicles and fuel entries were removed.".to_string(),
            Message::ConfirmResetDatabase => "This removes every vehicle and fuel entry. Continue?".to_string(),
            Message::DatabaseVersion { current, latest } => {
                format!("Database version: {} (latest known: {})", current, latest)
            }
            Message::DatabaseUpToDate => "Database schema is up to date".to_string(),
            Message::DatabaseNeedsUpdate => "Database schema needs to be updated".to_string(),
            Message::MigrationHistory => "Migration history:".to_string(),
            Message::MigrationsApplied(count) => format!("Applied {} database migrations", count),
            Message::MigrationSkipped(error) => format!("Migration skipped: {}", error),

            // === PROMPTS ===
            Message::PromptSelectModules => "Select the settings to configure".to_string(),
            Message::PromptDbFile => "Database file (relative to the data directory, or absolute)".to_string(),
            Message::PromptWal => "Enable write-ahead logging?".to_string(),
            Message::PromptDefaultFrequency => "Default calibration reminder frequency (days)".to_string(),

            // === GENERAL MESSAGES ===
            Message::OperationCancelled => "Operation cancelled".to_string(),
            Message::InvalidDate(value) => format!("Invalid date '{}'. Use YYYY-MM-DD.", value),
            Message::NothingToUpdate => "Nothing to update".to_string(),
        };

        write!(f, "{}", text)
    }
}
