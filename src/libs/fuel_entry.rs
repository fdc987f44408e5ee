//! Refueling record types.

use crate::libs::consumption::cost_per_liter;
use crate::libs::error::{StoreError, StoreResult};
use chrono::NaiveDate;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FuelKind {
    Gasoline,
    Ethanol,
}

impl FuelKind {
    pub const ALL: [FuelKind; 2] = [FuelKind::Gasoline, FuelKind::Ethanol];

    pub fn as_str(&self) -> &'static str {
        match self {
            FuelKind::Gasoline => "gasoline",
            FuelKind::Ethanol => "ethanol",
        }
    }
}

impl FromStr for FuelKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gasoline" | "gas" | "gasolina" => Ok(FuelKind::Gasoline),
            "ethanol" | "etanol" => Ok(FuelKind::Ethanol),
            other => Err(format!("unknown fuel kind '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RouteKind {
    City,
    Highway,
    #[default]
    Mixed,
}

impl RouteKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteKind::City => "city",
            RouteKind::Highway => "highway",
            RouteKind::Mixed => "mixed",
        }
    }
}

impl FromStr for RouteKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "city" | "cidade" => Ok(RouteKind::City),
            "highway" | "estrada" => Ok(RouteKind::Highway),
            "mixed" | "misto" => Ok(RouteKind::Mixed),
            other => Err(format!("unknown route kind '{}'", other)),
        }
    }
}

macro_rules! text_enum_sql {
    ($ty:ty) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ToSql for $ty {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.as_str()))
            }
        }

        impl FromSql for $ty {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                value
                    .as_str()
                    .and_then(|s| s.parse().map_err(|e: String| FromSqlError::Other(e.into())))
            }
        }
    };
}

text_enum_sql!(FuelKind);
text_enum_sql!(RouteKind);

/// Where the refueling happened.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Both halves must be present for a stored pair to become a point.
    pub fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        match (latitude, longitude) {
            (Some(latitude), Some(longitude)) => Some(Self { latitude, longitude }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuelEntry {
    pub id: i64,
    pub vehicle_id: i64,
    pub date: NaiveDate,
    pub odometer: f64,
    pub liters: f64,
    pub amount_paid: f64,
    pub price_per_liter: f64,
    pub fuel_kind: FuelKind,
    pub route_kind: RouteKind,
    pub calibration_performed: bool,
    pub location: Option<GeoPoint>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuelEntryInput {
    pub vehicle_id: i64,
    pub date: NaiveDate,
    pub odometer: f64,
    pub liters: f64,
    pub amount_paid: f64,
    /// Derived from `amount_paid / liters` when absent.
    pub price_per_liter: Option<f64>,
    pub fuel_kind: FuelKind,
    pub route_kind: RouteKind,
    pub calibration_performed: bool,
    pub location: Option<GeoPoint>,
}

impl FuelEntryInput {
    pub fn new(vehicle_id: i64, date: NaiveDate, odometer: f64, liters: f64, amount_paid: f64, fuel_kind: FuelKind) -> Self {
        Self {
            vehicle_id,
            date,
            odometer,
            liters,
            amount_paid,
            price_per_liter: None,
            fuel_kind,
            route_kind: RouteKind::default(),
            calibration_performed: false,
            location: None,
        }
    }

    pub fn resolved_price_per_liter(&self) -> f64 {
        self.price_per_liter.unwrap_or_else(|| cost_per_liter(self.amount_paid, self.liters))
    }

    pub fn validate(&self) -> StoreResult<()> {
        if !self.odometer.is_finite() || self.odometer < 0.0 {
            return Err(StoreError::invalid(format!("odometer must be a non-negative number, got {}", self.odometer)));
        }
        if !self.liters.is_finite() || self.liters <= 0.0 {
            return Err(StoreError::invalid(format!("liters must be greater than zero, got {}", self.liters)));
        }
        if !self.amount_paid.is_finite() || self.amount_paid <= 0.0 {
            return Err(StoreError::invalid(format!("amount paid must be greater than zero, got {}", self.amount_paid)));
        }
        let price = self.resolved_price_per_liter();
        if !price.is_finite() || price <= 0.0 {
            return Err(StoreError::invalid(format!("price per liter must be greater than zero, got {}", price)));
        }
        if let Some(point) = self.location {
            if !(-90.0..=90.0).contains(&point.latitude) {
                return Err(StoreError::invalid(format!("latitude out of range: {}", point.latitude)));
            }
            if !(-180.0..=180.0).contains(&point.longitude) {
                return Err(StoreError::invalid(format!("longitude out of range: {}", point.longitude)));
            }
        }
        Ok(())
    }
}

impl From<&FuelEntry> for FuelEntryInput {
    fn from(entry: &FuelEntry) -> Self {
        Self {
            vehicle_id: entry.vehicle_id,
            date: entry.date,
            odometer: entry.odometer,
            liters: entry.liters,
            amount_paid: entry.amount_paid,
            price_per_liter: Some(entry.price_per_liter),
            fuel_kind: entry.fuel_kind,
            route_kind: entry.route_kind,
            calibration_performed: entry.calibration_performed,
            location: entry.location,
        }
    }
}

/// Changes to a stored refueling. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FuelEntryPatch {
    pub date: Option<NaiveDate>,
    pub odometer: Option<f64>,
    pub liters: Option<f64>,
    pub amount_paid: Option<f64>,
    pub price_per_liter: Option<f64>,
    pub fuel_kind: Option<FuelKind>,
    pub route_kind: Option<RouteKind>,
    pub calibration_performed: Option<bool>,
    /// `Some(None)` removes the stored location.
    pub location: Option<Option<GeoPoint>>,
}

impl FuelEntryPatch {
    /// Writes the patched fields into `input`. Returns `true` if anything changed.
    ///
    /// A new amount or volume without an explicit price re-derives the price.
    pub fn apply_to(&self, input: &mut FuelEntryInput) -> bool {
        let before = input.clone();
        if let Some(v) = self.date {
            input.date = v;
        }
        if let Some(v) = self.odometer {
            input.odometer = v;
        }
        if let Some(v) = self.liters {
            input.liters = v;
        }
        if let Some(v) = self.amount_paid {
            input.amount_paid = v;
        }
        if self.price_per_liter.is_some() {
            input.price_per_liter = self.price_per_liter;
        } else if self.liters.is_some() || self.amount_paid.is_some() {
            input.price_per_liter = None;
        }
        if let Some(v) = self.fuel_kind {
            input.fuel_kind = v;
        }
        if let Some(v) = self.route_kind {
            input.route_kind = v;
        }
        if let Some(v) = self.calibration_performed {
            input.calibration_performed = v;
        }
        if let Some(v) = self.location {
            input.location = v;
        }
        *input != before
    }
}
