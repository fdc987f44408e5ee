//! Fuel economy and cost calculations.
//!
//! Pure functions that turn a vehicle's refueling history into km/L figures
//! and cost ratios. Nothing here touches storage and nothing here fails:
//! sparse history is reported as [`Consumption::InsufficientData`] or as a
//! `None` economy for a fuel kind.
//!
//! ## Segment Model
//!
//! ```text
//! entries sorted by odometer:  e0 ──── e1 ──── e2 ──── e3
//! segments:                      s0      s1      s2
//!
//! distance(si) = odometer(e[i+1]) - odometer(e[i])
//! si is attributed to fuel_kind(e[i]) together with liters(e[i])
//! economy(kind) = Σ distance / Σ liters   over the kind's segments
//! ```
//!
//! Segments with a non-positive distance (duplicate or out-of-order
//! odometer readings) are dropped and contribute nothing to any kind.
//!
//! ## Rounding
//!
//! Every derived ratio is rounded to two decimals where it is computed, so
//! two computations over the same history always compare equal.

use crate::libs::fuel_entry::{FuelEntry, FuelKind};
use std::collections::BTreeMap;

/// Rounds to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Distance per liter, or `None` when no fuel was attributed.
pub fn economy(distance: f64, liters: f64) -> Option<f64> {
    if !distance.is_finite() || !liters.is_finite() || liters <= 0.0 {
        return None;
    }
    Some(round2(distance / liters))
}

/// Cost per km. Zero when the distance is not positive, unlike [`economy`].
///
/// ```rust
/// use fuelbook::libs::consumption::cost_per_distance;
///
/// assert_eq!(cost_per_distance(180.0, 450.0), 0.40);
/// assert_eq!(cost_per_distance(180.0, 0.0), 0.0);
/// ```
pub fn cost_per_distance(total_paid: f64, total_distance: f64) -> f64 {
    if !total_paid.is_finite() || !total_distance.is_finite() || total_distance <= 0.0 {
        return 0.0;
    }
    round2(total_paid / total_distance)
}

/// Cost per liter. Zero when no fuel was bought.
pub fn cost_per_liter(total_paid: f64, total_liters: f64) -> f64 {
    if !total_paid.is_finite() || !total_liters.is_finite() || total_liters <= 0.0 {
        return 0.0;
    }
    round2(total_paid / total_liters)
}

/// Distance and fuel attributed to one fuel kind.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct KindTotals {
    pub distance: f64,
    pub liters: f64,
    pub segments: usize,
}

impl KindTotals {
    pub fn economy(&self) -> Option<f64> {
        economy(self.distance, self.liters)
    }
}

/// Economy per fuel kind for a history with at least one segment candidate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FuelEconomy {
    pub totals: BTreeMap<FuelKind, KindTotals>,
    /// Segments dropped because the odometer did not advance.
    pub skipped_segments: usize,
}

impl FuelEconomy {
    /// km/L for the kind, `None` if no valid segment was attributed to it.
    pub fn for_kind(&self, kind: FuelKind) -> Option<f64> {
        self.totals.get(&kind).and_then(KindTotals::economy)
    }

    pub fn gasoline(&self) -> Option<f64> {
        self.for_kind(FuelKind::Gasoline)
    }

    pub fn ethanol(&self) -> Option<f64> {
        self.for_kind(FuelKind::Ethanol)
    }

    /// Distance covered by all valid segments.
    pub fn total_distance(&self) -> f64 {
        self.totals.values().map(|t| t.distance).sum()
    }
}

/// Outcome of [`calculate_consumption`].
#[derive(Debug, Clone, PartialEq)]
pub enum Consumption {
    /// Fewer than two entries: no segment exists.
    InsufficientData,
    Computed(FuelEconomy),
}

impl Consumption {
    pub fn for_kind(&self, kind: FuelKind) -> Option<f64> {
        match self {
            Consumption::InsufficientData => None,
            Consumption::Computed(economy) => economy.for_kind(kind),
        }
    }

    pub fn is_insufficient(&self) -> bool {
        matches!(self, Consumption::InsufficientData)
    }
}

/// Calculates fuel economy per fuel kind for one vehicle's history.
///
/// The input order does not matter; entries are sorted ascending by
/// odometer before pairing. Each segment is attributed to the earlier
/// entry's fuel kind and liters.
///
/// # Arguments
///
/// * `entries` - Refueling records of a single vehicle, in any order
///
/// # Returns
///
/// [`Consumption::InsufficientData`] for fewer than two entries, otherwise
/// the per-kind totals. A kind with no valid segment has no economy.
///
/// # Examples
///
/// ```rust
/// use chrono::NaiveDate;
/// use fuelbook::libs::consumption::calculate_consumption;
/// use fuelbook::libs::fuel_entry::{FuelEntry, FuelKind, RouteKind};
///
/// let fill = |id: i64, odometer: f64, liters: f64| FuelEntry {
///     id,
///     vehicle_id: 1,
///     date: NaiveDate::from_ymd_opt(2025, 9, id as u32).unwrap(),
///     odometer,
///     liters,
///     amount_paid: liters * 6.0,
///     price_per_liter: 6.0,
///     fuel_kind: FuelKind::Gasoline,
///     route_kind: RouteKind::Mixed,
///     calibration_performed: false,
///     location: None,
/// };
/// let entries = vec![fill(2, 1200.0, 8.0), fill(1, 1000.0, 10.0)];
///
/// let consumption = calculate_consumption(&entries);
/// assert_eq!(consumption.for_kind(FuelKind::Gasoline), Some(20.0));
/// assert_eq!(consumption.for_kind(FuelKind::Ethanol), None);
/// ```
pub fn calculate_consumption(entries: &[FuelEntry]) -> Consumption {
    if entries.len() < 2 {
        return Consumption::InsufficientData;
    }

    let mut ordered: Vec<&FuelEntry> = entries.iter().collect();
    ordered.sort_by(|a, b| a.odometer.total_cmp(&b.odometer));

    let mut result = FuelEconomy::default();
    for pair in ordered.windows(2) {
        let (earlier, later) = (pair[0], pair[1]);
        let distance = later.odometer - earlier.odometer;
        if distance <= 0.0 {
            result.skipped_segments += 1;
            continue;
        }

        let totals = result.totals.entry(earlier.fuel_kind).or_default();
        totals.distance += distance;
        totals.liters += earlier.liters;
        totals.segments += 1;
    }

    Consumption::Computed(result)
}

/// Which fuel is cheaper to run on, given pump prices and known economy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuelComparison {
    pub best: FuelKind,
    /// ethanol price / gasoline price
    pub price_ratio: f64,
    /// ethanol km/L / gasoline km/L
    pub economy_ratio: f64,
}

/// Compares ethanol against gasoline for a vehicle.
///
/// Ethanol wins when its relative price is lower than its relative
/// economy. Returns `None` if any figure is missing or not positive.
pub fn compare_fuels(
    price_gasoline: f64,
    price_ethanol: f64,
    economy_gasoline: Option<f64>,
    economy_ethanol: Option<f64>,
) -> Option<FuelComparison> {
    let positive = |v: f64| v.is_finite() && v > 0.0;
    let (economy_gasoline, economy_ethanol) = (economy_gasoline?, economy_ethanol?);
    if ![price_gasoline, price_ethanol, economy_gasoline, economy_ethanol].into_iter().all(positive) {
        return None;
    }

    let price_ratio = round2(price_ethanol / price_gasoline);
    let economy_ratio = round2(economy_ethanol / economy_gasoline);
    let best = if price_ratio < economy_ratio { FuelKind::Ethanol } else { FuelKind::Gasoline };

    Some(FuelComparison {
        best,
        price_ratio,
        economy_ratio,
    })
}
