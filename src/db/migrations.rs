//! Schema creation and additive migrations.
//!
//! The schema only ever grows. [`ensure_schema`] creates the two base tables
//! if they are missing, then [`MigrationManager::apply`] walks a fixed,
//! versioned list of "add column if absent" steps for databases created by
//! older releases.
//!
//! ## Features
//!
//! - **Idempotent**: presence of each column is checked with `PRAGMA table_info`
//!   before anything is altered, so a second run changes nothing
//! - **Non-fatal**: a failing step is logged and reported, later steps still run
//! - **Backfill**: a step may carry an `UPDATE` that fills the new column
//! - **History**: applied versions are recorded in `schema_migrations`
//!
//! ## Usage
//!
//! ```rust,no_run
//! use fuelbook::db::migrations::{ensure_schema, MigrationManager};
//! use rusqlite::Connection;
//!
//! let conn = Connection::open("fuelbook.db").unwrap();
//! ensure_schema(&conn).unwrap();
//! let report = MigrationManager::new().apply(&conn).unwrap();
//! assert!(report.failed.is_empty());
//! ```

use crate::db::schema::{table_columns, TABLE_FUEL_ENTRIES, TABLE_VEHICLES};
use crate::libs::error::{StoreError, StoreResult};
use rusqlite::{params, Connection};

const SCHEMA_VEHICLES: &str = "CREATE TABLE IF NOT EXISTS vehicles (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    tank_capacity REAL NOT NULL,
    manual_economy_gasoline REAL,
    manual_economy_ethanol REAL,
    pointer_mode TEXT,
    save_location INTEGER,
    calibration_reminder INTEGER,
    reminder_frequency_days INTEGER,
    last_calibration_date TEXT,
    show_on_dashboard INTEGER DEFAULT 1,
    odometer REAL DEFAULT 0
)";
const SCHEMA_FUEL_ENTRIES: &str = "CREATE TABLE IF NOT EXISTS fuel_entries (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    date TEXT NOT NULL,
    odometer REAL NOT NULL,
    liters REAL NOT NULL,
    amount_paid REAL NOT NULL,
    price_per_liter REAL NOT NULL,
    fuel_kind TEXT NOT NULL,
    route_kind TEXT NOT NULL,
    calibration_performed INTEGER NOT NULL,
    latitude REAL,
    longitude REAL,
    vehicle_id INTEGER NOT NULL,
    FOREIGN KEY (vehicle_id) REFERENCES vehicles(id)
)";
const INDEX_FUEL_ENTRIES_VEHICLE: &str = "CREATE INDEX IF NOT EXISTS idx_fuel_entries_vehicle ON fuel_entries(vehicle_id)";
const MIGRATIONS_TABLE: &str = "CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)";
const RECORD_MIGRATION: &str = "INSERT OR IGNORE INTO schema_migrations (version, name) VALUES (?1, ?2)";
const SELECT_VERSION: &str = "SELECT MAX(version) FROM schema_migrations";
const SELECT_HISTORY: &str = "SELECT version, name, applied_at FROM schema_migrations ORDER BY version";

/// Creates the base tables when absent. Safe to call on every start.
pub fn ensure_schema(conn: &Connection) -> StoreResult<()> {
    conn.execute(SCHEMA_VEHICLES, [])?;
    conn.execute(SCHEMA_FUEL_ENTRIES, [])?;
    conn.execute(INDEX_FUEL_ENTRIES_VEHICLE, [])?;
    Ok(())
}

/// One additive step: add `column` to `table` unless it already exists.
#[derive(Debug, Clone)]
pub struct Migration {
    pub version: u32,
    pub name: &'static str,
    pub table: &'static str,
    pub column: &'static str,
    /// Column type and constraints, e.g. `INTEGER DEFAULT 1`.
    pub definition: &'static str,
    /// Statement run once, right after the column is added.
    pub backfill: Option<&'static str>,
}

/// Row of `schema_migrations`.
#[derive(Debug, Clone, PartialEq)]
pub struct MigrationRecord {
    pub version: u32,
    pub name: String,
    pub applied_at: String,
}

/// What one [`MigrationManager::apply`] run did.
#[derive(Debug, Default)]
pub struct MigrationReport {
    /// Versions whose column was added in this run.
    pub applied: Vec<u32>,
    /// Versions whose column was already there.
    pub already_present: Vec<u32>,
    /// Steps that failed; each is a [`StoreError::MigrationFailed`].
    pub failed: Vec<StoreError>,
}

impl MigrationReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

enum StepOutcome {
    Applied,
    AlreadyPresent,
}

/// Ordered registry of additive migrations.
#[derive(Debug, Clone)]
pub struct MigrationManager {
    migrations: Vec<Migration>,
}

impl Default for MigrationManager {
    fn default() -> Self {
        Self::new()
    }
}

impl MigrationManager {
    /// Manager with every built-in migration registered.
    pub fn new() -> Self {
        let mut manager = Self::empty();
        manager.register_migrations();
        manager
    }

    /// Manager with no steps; leaves a legacy schema as it is.
    pub fn empty() -> Self {
        Self { migrations: Vec::new() }
    }

    /// Manager over a custom list, sorted by version.
    pub fn with_migrations(mut migrations: Vec<Migration>) -> Self {
        migrations.sort_by_key(|m| m.version);
        Self { migrations }
    }

    fn register_migrations(&mut self) {
        // Version 1: amount paid was once computed on the fly from liters and price
        self.add_migration(
            1,
            "add_fuel_entry_amount_paid",
            TABLE_FUEL_ENTRIES,
            "amount_paid",
            "REAL",
            Some("UPDATE fuel_entries SET amount_paid = ROUND(liters * price_per_liter, 2) WHERE amount_paid IS NULL"),
        );

        // Version 2: per-vehicle dashboard visibility
        self.add_migration(2, "add_vehicle_show_on_dashboard", TABLE_VEHICLES, "show_on_dashboard", "INTEGER DEFAULT 1", None);

        // Version 3: current odometer kept on the vehicle itself
        self.add_migration(3, "add_vehicle_odometer", TABLE_VEHICLES, "odometer", "REAL DEFAULT 0", None);
    }

    fn add_migration(
        &mut self,
        version: u32,
        name: &'static str,
        table: &'static str,
        column: &'static str,
        definition: &'static str,
        backfill: Option<&'static str>,
    ) {
        self.migrations.push(Migration {
            version,
            name,
            table,
            column,
            definition,
            backfill,
        });
    }

    pub fn migrations(&self) -> &[Migration] {
        &self.migrations
    }

    /// Highest registered version, 0 when the list is empty.
    pub fn latest_version(&self) -> u32 {
        self.migrations.last().map(|m| m.version).unwrap_or(0)
    }

    /// Runs every step in version order.
    ///
    /// Only a failure to create the tracking table is returned as an error.
    /// Individual steps that fail are logged and collected in the report.
    pub fn apply(&self, conn: &Connection) -> StoreResult<MigrationReport> {
        conn.execute(MIGRATIONS_TABLE, [])?;

        let mut report = MigrationReport::default();
        for migration in &self.migrations {
            match Self::apply_one(conn, migration) {
                Ok(StepOutcome::Applied) => {
                    tracing::info!(
                        version = migration.version,
                        table = migration.table,
                        column = migration.column,
                        "migration applied"
                    );
                    report.applied.push(migration.version);
                }
                Ok(StepOutcome::AlreadyPresent) => report.already_present.push(migration.version),
                Err(e) => {
                    let failure = StoreError::MigrationFailed {
                        version: migration.version,
                        table: migration.table,
                        column: migration.column,
                        reason: e.to_string(),
                    };
                    tracing::warn!(version = migration.version, "{}", failure);
                    report.failed.push(failure);
                }
            }
        }

        if report.applied.is_empty() && report.is_clean() {
            tracing::debug!("database schema is up to date");
        }
        Ok(report)
    }

    fn apply_one(conn: &Connection, migration: &Migration) -> StoreResult<StepOutcome> {
        let columns = table_columns(conn, migration.table)?;
        if columns.contains(migration.column) {
            conn.execute(RECORD_MIGRATION, params![migration.version, migration.name])?;
            return Ok(StepOutcome::AlreadyPresent);
        }

        // The column, its backfill and the history row land together or not at all
        let tx = conn.unchecked_transaction()?;
        tx.execute(
            &format!("ALTER TABLE {} ADD COLUMN {} {}", migration.table, migration.column, migration.definition),
            [],
        )?;
        if let Some(backfill) = migration.backfill {
            tx.execute(backfill, [])?;
        }
        tx.execute(RECORD_MIGRATION, params![migration.version, migration.name])?;
        tx.commit()?;
        Ok(StepOutcome::Applied)
    }

    /// Highest recorded version, 0 for a database that never ran migrations.
    pub fn current_version(conn: &Connection) -> StoreResult<u32> {
        let version: Option<u32> = match conn.query_row(SELECT_VERSION, [], |row| row.get(0)) {
            Ok(version) => version,
            Err(rusqlite::Error::SqliteFailure(_, Some(msg))) if msg.contains("no such table") => None,
            Err(e) => return Err(e.into()),
        };
        Ok(version.unwrap_or(0))
    }

    pub fn history(conn: &Connection) -> StoreResult<Vec<MigrationRecord>> {
        let mut stmt = conn.prepare(SELECT_HISTORY)?;
        let history = stmt
            .query_map([], |row| {
                Ok(MigrationRecord {
                    version: row.get(0)?,
                    name: row.get(1)?,
                    applied_at: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(history)
    }

    /// True when some registered column is missing on this connection.
    pub fn needs_migration(&self, conn: &Connection) -> StoreResult<bool> {
        for migration in &self.migrations {
            if !table_columns(conn, migration.table)?.contains(migration.column) {
                return Ok(true);
            }
        }
        Ok(false)
    }
}
