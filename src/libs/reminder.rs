//! Tire-calibration reminders.
//!
//! The state is recomputed from the vehicle's last-calibration date and
//! reminder frequency on every read. No "due" flag is ever stored.
//!
//! ```text
//! reminder off                         -> Disabled
//! no calibration on record             -> Due
//! remaining = frequency - elapsed <= 0 -> Due
//! otherwise                            -> Upcoming { days_until: remaining }
//! ```

use crate::libs::vehicle::Vehicle;
use chrono::NaiveDate;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationStatus {
    Disabled,
    /// `overdue_days` is `None` when the vehicle was never calibrated.
    Due { overdue_days: Option<i64> },
    Upcoming { days_until: i64 },
}

impl CalibrationStatus {
    pub fn is_due(&self) -> bool {
        matches!(self, CalibrationStatus::Due { .. })
    }
}

impl fmt::Display for CalibrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalibrationStatus::Disabled => write!(f, "reminder off"),
            CalibrationStatus::Due { overdue_days: None } => write!(f, "due (no calibration recorded)"),
            CalibrationStatus::Due { overdue_days: Some(0) } => write!(f, "due today"),
            CalibrationStatus::Due { overdue_days: Some(days) } => write!(f, "overdue by {} days", days),
            CalibrationStatus::Upcoming { days_until: 1 } => write!(f, "in 1 day"),
            CalibrationStatus::Upcoming { days_until } => write!(f, "in {} days", days_until),
        }
    }
}

/// Computes the calibration state.
///
/// # Arguments
///
/// * `enabled` - Whether the vehicle has calibration reminders switched on
/// * `frequency_days` - Days between calibrations
/// * `last_calibration` - Date of the last calibration, if any
/// * `today` - Reference date for the elapsed-days computation
pub fn calibration_status(
    enabled: bool,
    frequency_days: u32,
    last_calibration: Option<NaiveDate>,
    today: NaiveDate,
) -> CalibrationStatus {
    if !enabled {
        return CalibrationStatus::Disabled;
    }
    let Some(last) = last_calibration else {
        return CalibrationStatus::Due { overdue_days: None };
    };

    let elapsed_days = (today - last).num_days();
    let remaining = i64::from(frequency_days) - elapsed_days;
    if remaining <= 0 {
        CalibrationStatus::Due {
            overdue_days: Some(-remaining),
        }
    } else {
        CalibrationStatus::Upcoming { days_until: remaining }
    }
}

/// Calibration state for a stored vehicle.
pub fn vehicle_calibration_status(vehicle: &Vehicle, today: NaiveDate) -> CalibrationStatus {
    calibration_status(
        vehicle.calibration_reminder,
        vehicle.reminder_frequency_days,
        vehicle.last_calibration_date,
        today,
    )
}
