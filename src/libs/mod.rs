pub mod config;
pub mod consumption;
pub mod data_storage;
pub mod error;
pub mod formatter;
pub mod fuel_entry;
pub mod messages;
pub mod reminder;
pub mod report;
pub mod vehicle;
pub mod view;
