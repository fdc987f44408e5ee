//! Spending summary over a set of refuelings.
//!
//! Distance for the report is measured per vehicle as the span between its
//! lowest and highest odometer readings in the set, then summed. This is a
//! coarser figure than the segment-based economy in
//! [`consumption`](crate::libs::consumption) and is only used for cost per km.

use crate::libs::consumption::{calculate_consumption, cost_per_distance, cost_per_liter, round2, Consumption};
use crate::libs::fuel_entry::{FuelEntry, FuelKind};
use crate::libs::vehicle::Vehicle;
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CostReport {
    pub entries: usize,
    pub total_spent: f64,
    pub total_liters: f64,
    pub average_price_per_liter: f64,
    /// Mean amount paid per refueling.
    pub average_ticket: f64,
    pub distance: f64,
    pub cost_per_km: f64,
    pub spent_by_kind: BTreeMap<FuelKind, f64>,
}

impl CostReport {
    pub fn from_entries(entries: &[FuelEntry]) -> Self {
        let mut spent_by_kind: BTreeMap<FuelKind, f64> = FuelKind::ALL.into_iter().map(|k| (k, 0.0)).collect();
        if entries.is_empty() {
            return Self {
                spent_by_kind,
                ..Self::default()
            };
        }

        let mut total_spent = 0.0;
        let mut total_liters = 0.0;
        let mut spans: HashMap<i64, (f64, f64)> = HashMap::new();

        for entry in entries {
            total_spent += entry.amount_paid;
            total_liters += entry.liters;
            *spent_by_kind.entry(entry.fuel_kind).or_default() += entry.amount_paid;

            let span = spans.entry(entry.vehicle_id).or_insert((entry.odometer, entry.odometer));
            span.0 = span.0.min(entry.odometer);
            span.1 = span.1.max(entry.odometer);
        }

        let distance: f64 = spans.values().map(|(min, max)| (max - min).max(0.0)).sum();
        for value in spent_by_kind.values_mut() {
            *value = round2(*value);
        }

        Self {
            entries: entries.len(),
            total_spent: round2(total_spent),
            total_liters: round2(total_liters),
            average_price_per_liter: cost_per_liter(total_spent, total_liters),
            average_ticket: round2(total_spent / entries.len() as f64),
            distance: round2(distance),
            cost_per_km: cost_per_distance(total_spent, distance),
            spent_by_kind,
        }
    }
}

/// Where an economy figure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EconomySource {
    History,
    Manual,
}

/// Economy of one vehicle for one fuel kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KindEconomy {
    pub km_per_liter: f64,
    pub source: EconomySource,
}

/// Per-vehicle economy: measured from history when possible, otherwise the
/// figures the owner typed in.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsumptionReport {
    pub vehicle_id: i64,
    pub vehicle_name: String,
    pub gasoline: Option<KindEconomy>,
    pub ethanol: Option<KindEconomy>,
    pub skipped_segments: usize,
    pub insufficient_history: bool,
}

impl ConsumptionReport {
    /// `entries` must belong to `vehicle`; their order does not matter.
    pub fn for_vehicle(vehicle: &Vehicle, entries: &[FuelEntry]) -> Self {
        let consumption = calculate_consumption(entries);
        let skipped_segments = match &consumption {
            Consumption::Computed(economy) => economy.skipped_segments,
            Consumption::InsufficientData => 0,
        };

        let pick = |kind: FuelKind, manual: Option<f64>| match consumption.for_kind(kind) {
            Some(km_per_liter) => Some(KindEconomy {
                km_per_liter,
                source: EconomySource::History,
            }),
            None => manual.map(|km_per_liter| KindEconomy {
                km_per_liter,
                source: EconomySource::Manual,
            }),
        };

        Self {
            vehicle_id: vehicle.id,
            vehicle_name: vehicle.name.clone(),
            gasoline: pick(FuelKind::Gasoline, vehicle.manual_economy_gasoline),
            ethanol: pick(FuelKind::Ethanol, vehicle.manual_economy_ethanol),
            skipped_segments,
            insufficient_history: consumption.is_insufficient(),
        }
    }

    pub fn for_kind(&self, kind: FuelKind) -> Option<KindEconomy> {
        match kind {
            FuelKind::Gasoline => self.gasoline,
            FuelKind::Ethanol => self.ethanol,
        }
    }

    pub fn uses_manual_figures(&self) -> bool {
        [self.gasoline, self.ethanol]
            .iter()
            .flatten()
            .any(|e| e.source == EconomySource::Manual)
    }
}

/// Entries dated within `[from, to]`; an open bound does not filter.
pub fn filter_period(entries: &[FuelEntry], from: Option<NaiveDate>, to: Option<NaiveDate>) -> Vec<FuelEntry> {
    entries
        .iter()
        .filter(|e| from.map_or(true, |from| e.date >= from))
        .filter(|e| to.map_or(true, |to| e.date <= to))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::fuel_entry::RouteKind;

    fn entry(vehicle_id: i64, day: u32, odometer: f64, liters: f64, paid: f64, kind: FuelKind) -> FuelEntry {
        FuelEntry {
            id: i64::from(day),
            vehicle_id,
            date: NaiveDate::from_ymd_opt(2025, 9, day).unwrap(),
            odometer,
            liters,
            amount_paid: paid,
            price_per_liter: round2(paid / liters),
            fuel_kind: kind,
            route_kind: RouteKind::City,
            calibration_performed: false,
            location: None,
        }
    }

    fn september() -> Vec<FuelEntry> {
        vec![
            entry(1, 1, 45210.0, 35.0, 210.0, FuelKind::Gasoline),
            entry(1, 8, 45540.0, 32.0, 188.0, FuelKind::Ethanol),
            entry(1, 15, 45930.0, 38.0, 228.0, FuelKind::Gasoline),
            entry(1, 22, 46260.0, 30.0, 174.0, FuelKind::Ethanol),
            entry(1, 29, 46620.0, 36.0, 216.0, FuelKind::Gasoline),
        ]
    }

    #[test]
    fn empty_history_is_all_zero() {
        let report = CostReport::from_entries(&[]);
        assert_eq!(report.total_spent, 0.0);
        assert_eq!(report.cost_per_km, 0.0);
        assert_eq!(report.spent_by_kind[&FuelKind::Ethanol], 0.0);
    }

    #[test]
    fn month_summary() {
        let report = CostReport::from_entries(&september());
        assert_eq!(report.entries, 5);
        assert_eq!(report.total_spent, 1016.0);
        assert_eq!(report.total_liters, 171.0);
        assert_eq!(report.average_price_per_liter, 5.94);
        assert_eq!(report.average_ticket, 203.2);
        assert_eq!(report.distance, 1410.0);
        assert_eq!(report.cost_per_km, 0.72);
        assert_eq!(report.spent_by_kind[&FuelKind::Gasoline], 654.0);
        assert_eq!(report.spent_by_kind[&FuelKind::Ethanol], 362.0);
    }

    #[test]
    fn distance_is_summed_per_vehicle() {
        let entries = vec![
            entry(1, 1, 1000.0, 10.0, 60.0, FuelKind::Gasoline),
            entry(1, 2, 1300.0, 10.0, 60.0, FuelKind::Gasoline),
            entry(2, 3, 90000.0, 10.0, 60.0, FuelKind::Gasoline),
            entry(2, 4, 90200.0, 10.0, 60.0, FuelKind::Gasoline),
        ];
        assert_eq!(CostReport::from_entries(&entries).distance, 500.0);
    }

    fn vehicle(manual_gasoline: Option<f64>, manual_ethanol: Option<f64>) -> Vehicle {
        Vehicle {
            id: 1,
            name: "Civic".to_string(),
            tank_capacity: 47.0,
            manual_economy_gasoline: manual_gasoline,
            manual_economy_ethanol: manual_ethanol,
            pointer_mode: Default::default(),
            save_location: false,
            calibration_reminder: false,
            reminder_frequency_days: 30,
            last_calibration_date: None,
            show_on_dashboard: true,
            odometer: 0.0,
        }
    }

    #[test]
    fn history_beats_manual_figures() {
        let report = ConsumptionReport::for_vehicle(&vehicle(Some(10.0), Some(7.0)), &september());
        // each segment counts the liters of the fill that started it
        let gasoline = report.gasoline.unwrap();
        assert_eq!(gasoline.source, EconomySource::History);
        assert_eq!(gasoline.km_per_liter, round2((330.0 + 330.0) / (35.0 + 38.0)));
        let ethanol = report.ethanol.unwrap();
        assert_eq!(ethanol.source, EconomySource::History);
        assert_eq!(ethanol.km_per_liter, round2((390.0 + 360.0) / (32.0 + 30.0)));
        assert!(!report.uses_manual_figures());
    }

    #[test]
    fn short_history_falls_back_to_manual_figures() {
        let history = &september()[..1];
        let report = ConsumptionReport::for_vehicle(&vehicle(Some(11.5), None), history);
        assert!(report.insufficient_history);
        assert_eq!(
            report.gasoline,
            Some(KindEconomy {
                km_per_liter: 11.5,
                source: EconomySource::Manual
            })
        );
        assert_eq!(report.ethanol, None);
        assert!(report.uses_manual_figures());
    }

    #[test]
    fn period_filter_is_inclusive() {
        let from = NaiveDate::from_ymd_opt(2025, 9, 8);
        let to = NaiveDate::from_ymd_opt(2025, 9, 22);
        assert_eq!(filter_period(&september(), from, to).len(), 3);
        assert_eq!(filter_period(&september(), None, to).len(), 4);
        assert_eq!(filter_period(&september(), None, None).len(), 5);
    }
}
