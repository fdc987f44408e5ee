//! Database layer for fuelbook.
//!
//! SQLite persistence for vehicles and their refuelings. A single [`db::Db`]
//! handle is created by the application root and lent to the record stores;
//! it opens its connection lazily and keeps it for the life of the process.
//!
//! ## Features
//!
//! - **Lazy connection**: opened, created and migrated on first use
//! - **Additive migrations**: columns are only ever added, never dropped
//! - **Typed rows**: 0/1 integers and nullable numerics stop at this layer
//! - **Business guards**: a vehicle with refuelings cannot be deleted
//!
//! ## Usage
//!
//! ```rust,no_run
//! use fuelbook::db::{db::Db, fuel_entries::FuelEntries, vehicles::Vehicles};
//! use fuelbook::libs::fuel_entry::{FuelEntryInput, FuelKind};
//! use fuelbook::libs::vehicle::VehicleInput;
//! use chrono::NaiveDate;
//!
//! let mut db = Db::open_in_memory();
//! let civic = Vehicles::new(&mut db).create(&VehicleInput::new("Civic", 47.0)).unwrap();
//!
//! let date = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
//! let entry = FuelEntryInput::new(civic.id, date, 45210.0, 35.0, 210.0, FuelKind::Gasoline);
//! FuelEntries::new(&mut db).create(&entry).unwrap();
//! ```

/// Store handle: connection lifecycle, status, reconnect and reset.
pub mod db;

/// Base tables and the versioned list of additive migrations.
pub mod migrations;

/// Column snapshot used to tolerate a partially migrated schema.
pub mod schema;

/// Vehicle CRUD with the delete guard.
pub mod vehicles;

/// Refueling CRUD and history queries.
pub mod fuel_entries;
