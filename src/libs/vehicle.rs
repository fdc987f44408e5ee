//! Vehicle domain types.
//!
//! A [`Vehicle`] is always a row that exists in storage (it carries the id
//! assigned by the store). A [`VehicleInput`] is the set of mutable fields
//! used for creation and full-row updates.

use crate::libs::error::{StoreError, StoreResult};
use chrono::NaiveDate;
use rusqlite::types::{ToSql, ToSqlOutput};
use std::fmt;
use std::str::FromStr;

/// Reminder frequency applied when the input leaves it unset.
pub const DEFAULT_REMINDER_FREQUENCY_DAYS: u32 = 30;

/// How the fuel gauge of the vehicle is displayed.
///
/// Read back leniently: unknown or missing text falls back to `Analog`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerMode {
    #[default]
    Analog,
    Digital,
}

impl PointerMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PointerMode::Analog => "analog",
            PointerMode::Digital => "digital",
        }
    }
}

impl fmt::Display for PointerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PointerMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "analog" | "analogico" | "analógico" => Ok(PointerMode::Analog),
            "digital" => Ok(PointerMode::Digital),
            other => Err(format!("unknown pointer mode '{}'", other)),
        }
    }
}

impl ToSql for PointerMode {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    pub id: i64,
    pub name: String,
    /// Liters.
    pub tank_capacity: f64,
    /// Manually entered km/L figures, used when history is too short.
    pub manual_economy_gasoline: Option<f64>,
    pub manual_economy_ethanol: Option<f64>,
    pub pointer_mode: PointerMode,
    pub save_location: bool,
    pub calibration_reminder: bool,
    pub reminder_frequency_days: u32,
    pub last_calibration_date: Option<NaiveDate>,
    pub show_on_dashboard: bool,
    /// Current odometer reading in km.
    pub odometer: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VehicleInput {
    pub name: String,
    pub tank_capacity: f64,
    pub manual_economy_gasoline: Option<f64>,
    pub manual_economy_ethanol: Option<f64>,
    pub pointer_mode: PointerMode,
    pub save_location: bool,
    pub calibration_reminder: bool,
    pub reminder_frequency_days: Option<u32>,
    pub last_calibration_date: Option<NaiveDate>,
    pub show_on_dashboard: bool,
    pub odometer: f64,
}

impl VehicleInput {
    pub fn new(name: &str, tank_capacity: f64) -> Self {
        Self {
            name: name.to_string(),
            tank_capacity,
            manual_economy_gasoline: None,
            manual_economy_ethanol: None,
            pointer_mode: PointerMode::default(),
            save_location: false,
            calibration_reminder: false,
            reminder_frequency_days: None,
            last_calibration_date: None,
            show_on_dashboard: true,
            odometer: 0.0,
        }
    }

    /// Frequency to persist, falling back to the 30-day default.
    pub fn frequency_or_default(&self) -> u32 {
        self.reminder_frequency_days.unwrap_or(DEFAULT_REMINDER_FREQUENCY_DAYS)
    }

    /// Rejects malformed input before any statement is executed.
    pub fn validate(&self) -> StoreResult<()> {
        if self.name.trim().is_empty() {
            return Err(StoreError::invalid("vehicle name must not be empty"));
        }
        if !self.tank_capacity.is_finite() || self.tank_capacity <= 0.0 {
            return Err(StoreError::invalid(format!(
                "tank capacity must be greater than zero, got {}",
                self.tank_capacity
            )));
        }
        for (label, value) in [
            ("gasoline", self.manual_economy_gasoline),
            ("ethanol", self.manual_economy_ethanol),
        ] {
            if let Some(v) = value {
                if !v.is_finite() || v <= 0.0 {
                    return Err(StoreError::invalid(format!("manual {} economy must be positive, got {}", label, v)));
                }
            }
        }
        if self.reminder_frequency_days == Some(0) {
            return Err(StoreError::invalid("reminder frequency must be at least one day"));
        }
        if !self.odometer.is_finite() || self.odometer < 0.0 {
            return Err(StoreError::invalid(format!("odometer must be a non-negative number, got {}", self.odometer)));
        }
        Ok(())
    }
}

impl From<&Vehicle> for VehicleInput {
    fn from(vehicle: &Vehicle) -> Self {
        Self {
            name: vehicle.name.clone(),
            tank_capacity: vehicle.tank_capacity,
            manual_economy_gasoline: vehicle.manual_economy_gasoline,
            manual_economy_ethanol: vehicle.manual_economy_ethanol,
            pointer_mode: vehicle.pointer_mode,
            save_location: vehicle.save_location,
            calibration_reminder: vehicle.calibration_reminder,
            reminder_frequency_days: Some(vehicle.reminder_frequency_days),
            last_calibration_date: vehicle.last_calibration_date,
            show_on_dashboard: vehicle.show_on_dashboard,
            odometer: vehicle.odometer,
        }
    }
}

/// Changes to a stored vehicle.
///
/// `None` keeps the current value. For optional fields `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VehiclePatch {
    pub name: Option<String>,
    pub tank_capacity: Option<f64>,
    pub manual_economy_gasoline: Option<Option<f64>>,
    pub manual_economy_ethanol: Option<Option<f64>>,
    pub pointer_mode: Option<PointerMode>,
    pub save_location: Option<bool>,
    pub calibration_reminder: Option<bool>,
    pub reminder_frequency_days: Option<u32>,
    pub last_calibration_date: Option<Option<NaiveDate>>,
    pub show_on_dashboard: Option<bool>,
    pub odometer: Option<f64>,
}

impl VehiclePatch {
    /// Writes the patched fields into `input`. Returns `true` if anything changed.
    pub fn apply_to(&self, input: &mut VehicleInput) -> bool {
        let before = input.clone();
        if let Some(name) = &self.name {
            input.name = name.clone();
        }
        if let Some(v) = self.tank_capacity {
            input.tank_capacity = v;
        }
        if let Some(v) = self.manual_economy_gasoline {
            input.manual_economy_gasoline = v;
        }
        if let Some(v) = self.manual_economy_ethanol {
            input.manual_economy_ethanol = v;
        }
        if let Some(v) = self.pointer_mode {
            input.pointer_mode = v;
        }
        if let Some(v) = self.save_location {
            input.save_location = v;
        }
        if let Some(v) = self.calibration_reminder {
            input.calibration_reminder = v;
        }
        if let Some(v) = self.reminder_frequency_days {
            input.reminder_frequency_days = Some(v);
        }
        if let Some(v) = self.last_calibration_date {
            input.last_calibration_date = v;
        }
        if let Some(v) = self.show_on_dashboard {
            input.show_on_dashboard = v;
        }
        if let Some(v) = self.odometer {
            input.odometer = v;
        }
        *input != before
    }
}
