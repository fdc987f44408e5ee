use super::formatter::{format_date, format_distance, format_economy, format_money, format_optional_date};
use super::fuel_entry::{FuelEntry, FuelKind};
use super::reminder::CalibrationStatus;
use super::report::{ConsumptionReport, CostReport, EconomySource, KindEconomy};
use super::vehicle::Vehicle;
use crate::db::db::DatabaseStatus;
use crate::db::migrations::MigrationRecord;
use anyhow::Result;
use prettytable::{row, Table};
use std::collections::HashMap;

pub struct View {}

impl View {
    pub fn vehicles(vehicles: &[Vehicle]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", "NAME", "TANK (L)", "ODOMETER", "REMINDER", "LAST CALIBRATION", "DASHBOARD"]);
        for vehicle in vehicles {
            let reminder = if vehicle.calibration_reminder {
                format!("every {} days", vehicle.reminder_frequency_days)
            } else {
                "off".to_string()
            };
            table.add_row(row![
                vehicle.id,
                vehicle.name,
                format!("{:.1}", vehicle.tank_capacity),
                format_distance(vehicle.odometer),
                reminder,
                format_optional_date(vehicle.last_calibration_date.as_ref()),
                yes_no(vehicle.show_on_dashboard)
            ]);
        }
        table.printstd();

        Ok(())
    }

    /// Field/value listing of a single vehicle.
    pub fn vehicle(vehicle: &Vehicle) -> Result<()> {
        let mut table = Table::new();

        let optional_economy = |v: Option<f64>| v.map_or("-".to_string(), |km_l| format!("{:.2} km/L", km_l));
        table.add_row(row!["ID", vehicle.id]);
        table.add_row(row!["Name", vehicle.name]);
        table.add_row(row!["Tank capacity", format!("{:.1} L", vehicle.tank_capacity)]);
        table.add_row(row!["Odometer", format_distance(vehicle.odometer)]);
        table.add_row(row!["Manual economy (gasoline)", optional_economy(vehicle.manual_economy_gasoline)]);
        table.add_row(row!["Manual economy (ethanol)", optional_economy(vehicle.manual_economy_ethanol)]);
        table.add_row(row!["Fuel gauge", vehicle.pointer_mode]);
        table.add_row(row!["Save location", yes_no(vehicle.save_location)]);
        table.add_row(row!["Calibration reminder", yes_no(vehicle.calibration_reminder)]);
        table.add_row(row!["Reminder frequency", format!("{} days", vehicle.reminder_frequency_days)]);
        table.add_row(row![
            "Last calibration",
            format_optional_date(vehicle.last_calibration_date.as_ref())
        ]);
        table.add_row(row!["Show on dashboard", yes_no(vehicle.show_on_dashboard)]);
        table.printstd();

        Ok(())
    }

    /// `names` maps vehicle ids to display names; unknown ids print the id.
    pub fn fuel_entries(entries: &[FuelEntry], names: &HashMap<i64, String>) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row![
            "ID", "VEHICLE", "DATE", "ODOMETER", "LITERS", "PAID", "PRICE/L", "FUEL", "ROUTE", "CALIBRATED"
        ]);
        for entry in entries {
            let vehicle = names
                .get(&entry.vehicle_id)
                .cloned()
                .unwrap_or_else(|| format!("#{}", entry.vehicle_id));
            table.add_row(row![
                entry.id,
                vehicle,
                format_date(&entry.date),
                format_distance(entry.odometer),
                format!("{:.2}", entry.liters),
                format_money(entry.amount_paid),
                format_money(entry.price_per_liter),
                entry.fuel_kind,
                entry.route_kind,
                yes_no(entry.calibration_performed)
            ]);
        }
        table.printstd();

        Ok(())
    }

    pub fn consumption(reports: &[ConsumptionReport]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["VEHICLE", "GASOLINE", "ETHANOL"]);
        for report in reports {
            table.add_row(row![
                report.vehicle_name,
                economy_cell(report.for_kind(FuelKind::Gasoline)),
                economy_cell(report.for_kind(FuelKind::Ethanol))
            ]);
        }
        table.printstd();

        Ok(())
    }

    pub fn costs(report: &CostReport) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["Refuelings", report.entries]);
        table.add_row(row!["Total spent", format_money(report.total_spent)]);
        table.add_row(row!["Total liters", format!("{:.2}", report.total_liters)]);
        table.add_row(row!["Average price per liter", format_money(report.average_price_per_liter)]);
        table.add_row(row!["Average refueling", format_money(report.average_ticket)]);
        table.add_row(row!["Distance", format_distance(report.distance)]);
        table.add_row(row!["Cost per km", format_money(report.cost_per_km)]);
        for (kind, spent) in &report.spent_by_kind {
            table.add_row(row![format!("Spent on {}", kind), format_money(*spent)]);
        }
        table.printstd();

        Ok(())
    }

    pub fn reminders(rows: &[(Vehicle, CalibrationStatus)]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", "VEHICLE", "LAST CALIBRATION", "EVERY", "STATUS"]);
        for (vehicle, status) in rows {
            let status = if status.is_due() {
                format!("⚠️ {}", status)
            } else {
                status.to_string()
            };
            table.add_row(row![
                vehicle.id,
                vehicle.name,
                format_optional_date(vehicle.last_calibration_date.as_ref()),
                format!("{} days", vehicle.reminder_frequency_days),
                status
            ]);
        }
        table.printstd();

        Ok(())
    }

    pub fn database_status(location: &str, status: &DatabaseStatus) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["Location", location]);
        table.add_row(row!["Connected", yes_no(status.connected)]);
        table.add_row(row![
            "Schema version",
            status.schema_version.map_or("-".to_string(), |v| v.to_string())
        ]);
        table.add_row(row!["Message", status.message]);
        table.printstd();

        Ok(())
    }

    pub fn migrations(history: &[MigrationRecord]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["VERSION", "NAME", "APPLIED AT"]);
        for record in history {
            table.add_row(row![format!("v{}", record.version), record.name, record.applied_at]);
        }
        table.printstd();

        Ok(())
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

fn economy_cell(economy: Option<KindEconomy>) -> String {
    match economy {
        Some(KindEconomy {
            km_per_liter,
            source: EconomySource::Manual,
        }) => format!("{} (manual)", format_economy(Some(km_per_liter))),
        Some(KindEconomy { km_per_liter, .. }) => format_economy(Some(km_per_liter)),
        None => format_economy(None),
    }
}
