//! # fuelbook
//!
//! Vehicle and refueling log backed by SQLite.
//!
//! - [`db`]: store handle, schema migrations and record stores
//! - [`libs`]: domain types, consumption/reminder/cost engines, configuration
//!   and terminal output
//! - [`commands`]: the `fuelbook` command-line interface

pub mod commands;
pub mod db;
pub mod libs;
