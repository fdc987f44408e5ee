use super::{confirm, open_store};
use crate::{
    db::{db::Db, fuel_entries::FuelEntries, vehicles::Vehicles},
    libs::{
        fuel_entry::{FuelEntryInput, FuelEntryPatch, FuelKind, GeoPoint, RouteKind},
        messages::Message,
        view::View,
    },
    msg_error, msg_info, msg_print, msg_success,
};
use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::{Args, Subcommand};
use std::collections::HashMap;

#[derive(Debug, Args)]
pub struct FuelArgs {
    #[command(subcommand)]
    command: FuelCommand,
}

#[derive(Debug, Subcommand)]
enum FuelCommand {
    /// Record a refueling
    Add {
        /// Vehicle id
        vehicle: i64,
        /// Odometer reading at the pump (km)
        #[arg(long)]
        odometer: f64,
        #[arg(long)]
        liters: f64,
        /// Amount paid
        #[arg(long)]
        paid: f64,
        /// Price per liter; derived from amount and liters when omitted
        #[arg(long)]
        price: Option<f64>,
        /// gasoline or ethanol
        #[arg(long, default_value = "gasoline")]
        kind: FuelKind,
        /// city, highway or mixed
        #[arg(long, default_value = "mixed")]
        route: RouteKind,
        /// Defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Tires were calibrated at this stop
        #[arg(long)]
        calibrated: bool,
        #[arg(long, requires = "longitude", allow_hyphen_values = true)]
        latitude: Option<f64>,
        #[arg(long, requires = "latitude", allow_hyphen_values = true)]
        longitude: Option<f64>,
    },
    List {
        /// Only entries of this vehicle
        #[arg(long)]
        vehicle: Option<i64>,
    },
    /// Most recent refueling of a vehicle
    Last {
        vehicle: i64,
    },
    Edit {
        id: i64,
        #[arg(long)]
        odometer: Option<f64>,
        #[arg(long)]
        liters: Option<f64>,
        #[arg(long)]
        paid: Option<f64>,
        #[arg(long)]
        price: Option<f64>,
        #[arg(long)]
        kind: Option<FuelKind>,
        #[arg(long)]
        route: Option<RouteKind>,
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Whether tires were calibrated at this stop
        #[arg(long)]
        calibrated: Option<bool>,
        #[arg(long, requires = "longitude", allow_hyphen_values = true)]
        latitude: Option<f64>,
        #[arg(long, requires = "latitude", allow_hyphen_values = true)]
        longitude: Option<f64>,
        /// Remove the stored location
        #[arg(long, conflicts_with_all = ["latitude", "longitude"])]
        clear_location: bool,
    },
    Delete {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

pub async fn cmd(args: FuelArgs) -> Result<()> {
    match args.command {
        FuelCommand::Add {
            vehicle,
            odometer,
            liters,
            paid,
            price,
            kind,
            route,
            date,
            calibrated,
            latitude,
            longitude,
        } => {
            let mut input = FuelEntryInput::new(
                vehicle,
                date.unwrap_or_else(|| Local::now().date_naive()),
                odometer,
                liters,
                paid,
                kind,
            );
            input.price_per_liter = price;
            input.route_kind = route;
            input.calibration_performed = calibrated;
            input.location = GeoPoint::from_parts(latitude, longitude);
            handle_add(input)
        }
        FuelCommand::List { vehicle } => handle_list(vehicle),
        FuelCommand::Last { vehicle } => handle_last(vehicle),
        FuelCommand::Edit {
            id,
            odometer,
            liters,
            paid,
            price,
            kind,
            route,
            date,
            calibrated,
            latitude,
            longitude,
            clear_location,
        } => {
            let location = match GeoPoint::from_parts(latitude, longitude) {
                Some(point) => Some(Some(point)),
                None if clear_location => Some(None),
                None => None,
            };
            let patch = FuelEntryPatch {
                date,
                odometer,
                liters,
                amount_paid: paid,
                price_per_liter: price,
                fuel_kind: kind,
                route_kind: route,
                calibration_performed: calibrated,
                location,
            };
            handle_edit(id, patch)
        }
        FuelCommand::Delete { id, yes } => handle_delete(id, yes),
    }
}

fn handle_add(input: FuelEntryInput) -> Result<()> {
    let (_, mut db) = open_store()?;

    let Some(vehicle) = Vehicles::new(&mut db).get(input.vehicle_id)? else {
        msg_error!(Message::VehicleNotFound(input.vehicle_id));
        return Ok(());
    };

    let id = FuelEntries::new(&mut db).create(&input)?;
    msg_success!(Message::FuelEntryCreated(id));

    if input.calibration_performed && Vehicles::new(&mut db).advance_calibration(vehicle.id, input.date)? {
        msg_info!(Message::CalibrationRecordedWithEntry(vehicle.name));
    }
    Ok(())
}

fn handle_edit(id: i64, patch: FuelEntryPatch) -> Result<()> {
    let (_, mut db) = open_store()?;

    let Some(current) = FuelEntries::new(&mut db).get(id)? else {
        msg_error!(Message::FuelEntryNotFound(id));
        return Ok(());
    };

    let mut input = FuelEntryInput::from(&current);
    if !patch.apply_to(&mut input) {
        msg_info!(Message::NothingToUpdate);
        return Ok(());
    }

    FuelEntries::new(&mut db).update(id, &input)?;
    msg_success!(Message::FuelEntryUpdated(id));

    if input.calibration_performed && !current.calibration_performed {
        let mut vehicles = Vehicles::new(&mut db);
        if vehicles.advance_calibration(input.vehicle_id, input.date)? {
            if let Some(vehicle) = vehicles.get(input.vehicle_id)? {
                msg_info!(Message::CalibrationRecordedWithEntry(vehicle.name));
            }
        }
    }
    Ok(())
}

fn handle_list(vehicle_id: Option<i64>) -> Result<()> {
    let (_, mut db) = open_store()?;
    let names = vehicle_names(&mut db)?;

    let (scope, entries) = match vehicle_id {
        Some(id) => {
            let Some(name) = names.get(&id).cloned() else {
                msg_error!(Message::VehicleNotFound(id));
                return Ok(());
            };
            (name, FuelEntries::new(&mut db).list_by_vehicle(id)?)
        }
        None => ("all vehicles".to_string(), FuelEntries::new(&mut db).list_all()?),
    };

    if entries.is_empty() {
        msg_info!(Message::NoFuelEntriesFound);
        return Ok(());
    }

    msg_print!(Message::FuelEntriesHeader(scope), true);
    View::fuel_entries(&entries, &names)?;
    Ok(())
}

fn handle_last(vehicle_id: i64) -> Result<()> {
    let (_, mut db) = open_store()?;
    let names = vehicle_names(&mut db)?;

    let Some(name) = names.get(&vehicle_id).cloned() else {
        msg_error!(Message::VehicleNotFound(vehicle_id));
        return Ok(());
    };

    match FuelEntries::new(&mut db).latest_for_vehicle(vehicle_id)? {
        Some(entry) => {
            msg_print!(Message::LatestFuelEntryHeader(name), true);
            View::fuel_entries(&[entry], &names)?;
        }
        None => msg_info!(Message::NoFuelEntriesFound),
    }
    Ok(())
}

fn handle_delete(id: i64, yes: bool) -> Result<()> {
    let (_, mut db) = open_store()?;
    let mut entries = FuelEntries::new(&mut db);

    if entries.get(id)?.is_none() {
        msg_error!(Message::FuelEntryNotFound(id));
        return Ok(());
    }

    if !confirm(Message::ConfirmDeleteFuelEntry(id), yes)? {
        return Ok(());
    }

    entries.delete(id)?;
    msg_success!(Message::FuelEntryDeleted(id));
    Ok(())
}

fn vehicle_names(db: &mut Db) -> Result<HashMap<i64, String>> {
    Ok(Vehicles::new(db).list()?.into_iter().map(|v| (v.id, v.name)).collect())
}
