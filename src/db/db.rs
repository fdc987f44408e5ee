use crate::db::migrations::{ensure_schema, MigrationManager, MigrationReport};
use crate::db::schema::{SchemaInfo, TABLE_FUEL_ENTRIES, TABLE_VEHICLES};
use crate::libs::config::Config;
use crate::libs::error::{StoreError, StoreResult};
use rusqlite::Connection;
use std::fmt;
use std::fs;
use std::path::PathBuf;

pub const DB_FILE_NAME: &str = "fuelbook.db";

/// Where the database lives.
#[derive(Debug, Clone, PartialEq)]
pub enum DbLocation {
    File(PathBuf),
    /// Private in-memory database; contents vanish on reconnect.
    Memory,
}

impl fmt::Display for DbLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DbLocation::File(path) => write!(f, "{}", path.display()),
            DbLocation::Memory => write!(f, ":memory:"),
        }
    }
}

/// An open connection together with the column layout it was opened with.
pub struct Handle {
    pub conn: Connection,
    pub schema: SchemaInfo,
}

/// Result of a connection probe.
#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseStatus {
    pub connected: bool,
    pub schema_version: Option<u32>,
    pub message: String,
}

/// Store handle owned by the application root.
///
/// The connection is opened on first use, initialised with
/// [`ensure_schema`] and the migration list, then cached until
/// [`Db::reconnect`], [`Db::reset`] or [`Db::close`].
pub struct Db {
    location: DbLocation,
    wal: bool,
    migrations: MigrationManager,
    handle: Option<Handle>,
    last_report: Option<MigrationReport>,
}

impl Db {
    pub fn new(location: DbLocation) -> Db {
        Db::with_migrations(location, MigrationManager::new())
    }

    pub fn with_migrations(location: DbLocation, migrations: MigrationManager) -> Db {
        Db {
            location,
            wal: true,
            migrations,
            handle: None,
            last_report: None,
        }
    }

    pub fn open_in_memory() -> Db {
        Db::new(DbLocation::Memory)
    }

    /// Handle for the database configured in `config` (or `FUELBOOK_DB`).
    pub fn from_config(config: &Config) -> StoreResult<Db> {
        let path = config
            .database_path()
            .map_err(|e| StoreError::StorageUnavailable(format!("cannot resolve database path: {}", e)))?;
        Ok(Db::new(DbLocation::File(path)).wal(config.storage.wal))
    }

    pub fn wal(mut self, enabled: bool) -> Db {
        self.wal = enabled;
        self
    }

    pub fn location(&self) -> &DbLocation {
        &self.location
    }

    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    /// Migration outcome of the most recent open.
    pub fn last_migration_report(&self) -> Option<&MigrationReport> {
        self.last_report.as_ref()
    }

    pub fn migration_manager(&self) -> &MigrationManager {
        &self.migrations
    }

    /// The cached connection, opening it first if needed.
    pub fn handle(&mut self) -> StoreResult<&mut Handle> {
        if self.handle.is_none() {
            let (handle, report) = self.open()?;
            self.last_report = Some(report);
            self.handle = Some(handle);
        }
        self.handle
            .as_mut()
            .ok_or_else(|| StoreError::StorageUnavailable("connection is not open".to_string()))
    }

    fn open(&self) -> StoreResult<(Handle, MigrationReport)> {
        let unavailable = |e: &dyn fmt::Display| StoreError::StorageUnavailable(format!("{}: {}", self.location, e));

        let conn = match &self.location {
            DbLocation::File(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent).map_err(|e| unavailable(&e))?;
                }
                let conn = Connection::open(path).map_err(|e| unavailable(&e))?;
                if self.wal {
                    conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get::<_, String>(0))
                        .map_err(|e| unavailable(&e))?;
                }
                conn
            }
            DbLocation::Memory => Connection::open_in_memory().map_err(|e| unavailable(&e))?,
        };

        ensure_schema(&conn).map_err(|e| unavailable(&e))?;
        let report = self.migrations.apply(&conn).map_err(|e| unavailable(&e))?;
        let schema = SchemaInfo::load(&conn)?;
        tracing::debug!(location = %self.location, applied = report.applied.len(), "database opened");

        Ok((Handle { conn, schema }, report))
    }

    /// Drops the cached connection and opens a fresh one.
    pub fn reconnect(&mut self) -> StoreResult<()> {
        tracing::debug!(location = %self.location, "forcing reconnect");
        self.close()?;
        self.handle().map(|_| ())
    }

    /// Closes the cached connection, if any.
    pub fn close(&mut self) -> StoreResult<()> {
        if let Some(handle) = self.handle.take() {
            handle.conn.close().map_err(|(_, e)| StoreError::from(e))?;
            tracing::debug!(location = %self.location, "database closed");
        }
        Ok(())
    }

    /// Probes the cached connection without opening one.
    ///
    /// A failed probe discards the cached connection.
    pub fn status(&mut self) -> DatabaseStatus {
        let Some(handle) = self.handle.as_ref() else {
            return DatabaseStatus {
                connected: false,
                schema_version: None,
                message: "not connected".to_string(),
            };
        };

        match MigrationManager::current_version(&handle.conn) {
            Ok(version) => DatabaseStatus {
                connected: true,
                schema_version: Some(version),
                message: format!("connected to {} (schema v{})", self.location, version),
            },
            Err(e) => {
                self.handle = None;
                DatabaseStatus {
                    connected: false,
                    schema_version: None,
                    message: format!("connection error: {}", e),
                }
            }
        }
    }

    /// Drops both tables and re-initialises an empty schema.
    pub fn reset(&mut self) -> StoreResult<()> {
        {
            let handle = self.handle()?;
            handle.conn.execute(&format!("DROP TABLE IF EXISTS {}", TABLE_FUEL_ENTRIES), [])?;
            handle.conn.execute(&format!("DROP TABLE IF EXISTS {}", TABLE_VEHICLES), [])?;
        }
        tracing::info!(location = %self.location, "database reset");
        if self.location != DbLocation::Memory {
            return self.reconnect();
        }

        // Closing an in-memory database would discard it, so re-initialise in place
        if let Some(handle) = self.handle.as_mut() {
            ensure_schema(&handle.conn)?;
            let report = self.migrations.apply(&handle.conn)?;
            handle.schema = SchemaInfo::load(&handle.conn)?;
            self.last_report = Some(report);
        }
        Ok(())
    }
}
