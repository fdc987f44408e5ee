//! Error taxonomy for the storage layer.
//!
//! Every store operation returns [`StoreResult`]. The `Display` text of a
//! [`StoreError`] is the human-readable half of the result, so callers can
//! show it directly or match on the variant to react to a specific failure.
//!
//! The metrics engines (`consumption`, `reminder`, `report`) never produce
//! these errors; sparse history is reported through sentinel values instead.

use thiserror::Error;

/// Result alias used by the database layer.
pub type StoreResult<T> = Result<T, StoreError>;

/// Failures surfaced by the store and the schema manager.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The database file could not be opened or initialised.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    /// An update or delete targeted a row that does not exist.
    #[error("{entity} #{id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// Vehicle deletion refused while fuel entries still reference it.
    #[error("vehicle #{vehicle_id} still has {count} fuel entries recorded")]
    HasDependents { vehicle_id: i64, count: i64 },

    /// A single additive migration could not be applied.
    #[error("migration v{version} ({table}.{column}) failed: {reason}")]
    MigrationFailed {
        version: u32,
        table: &'static str,
        column: &'static str,
        reason: String,
    },

    /// Input rejected before reaching storage.
    #[error("invalid input: {0}")]
    ValidationFailed(String),

    /// Driver error on an otherwise open connection.
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        StoreError::NotFound { entity, id }
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        StoreError::ValidationFailed(reason.into())
    }
}
