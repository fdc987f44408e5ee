use super::{confirm, open_store};
use crate::{
    db::vehicles::Vehicles,
    libs::{
        error::StoreError,
        formatter::format_date,
        messages::Message,
        vehicle::{PointerMode, VehicleInput, VehiclePatch},
        view::View,
    },
    msg_error, msg_info, msg_print, msg_success,
};
use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::{Args, Subcommand, ValueEnum};

#[derive(Debug, Args)]
pub struct VehicleArgs {
    #[command(subcommand)]
    command: VehicleCommand,
}

/// Fields shared by `add` and `edit`. On edit, absent flags keep the stored value.
#[derive(Debug, Args)]
struct VehicleFields {
    /// Manually measured gasoline economy (km/L)
    #[arg(long)]
    gasoline_economy: Option<f64>,
    /// Manually measured ethanol economy (km/L)
    #[arg(long)]
    ethanol_economy: Option<f64>,
    /// Fuel gauge type: analog or digital
    #[arg(long)]
    pointer: Option<PointerMode>,
    /// Store GPS coordinates with each refueling
    #[arg(long)]
    save_location: Option<bool>,
    /// Enable tire calibration reminders
    #[arg(long)]
    reminder: Option<bool>,
    /// Days between tire calibrations
    #[arg(long)]
    every: Option<u32>,
    /// Date of the last tire calibration (YYYY-MM-DD)
    #[arg(long)]
    last_calibration: Option<NaiveDate>,
    /// List the vehicle on dashboards and reminders
    #[arg(long)]
    dashboard: Option<bool>,
    /// Current odometer reading (km)
    #[arg(long)]
    odometer: Option<f64>,
}

/// Optional fields that `edit --clear` can empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ClearableField {
    GasolineEconomy,
    EthanolEconomy,
    LastCalibration,
}

#[derive(Debug, Subcommand)]
enum VehicleCommand {
    /// Register a vehicle
    Add {
        name: String,
        /// Tank capacity in liters
        #[arg(long)]
        tank: f64,
        #[command(flatten)]
        fields: VehicleFields,
    },
    List,
    Show {
        id: i64,
    },
    Edit {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        tank: Option<f64>,
        #[command(flatten)]
        fields: VehicleFields,
        /// Empty an optional field; wins over a value given for it
        #[arg(long, value_enum)]
        clear: Vec<ClearableField>,
    },
    Delete {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Record a tire calibration
    Calibrate {
        id: i64,
        /// Defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

pub async fn cmd(args: VehicleArgs) -> Result<()> {
    match args.command {
        VehicleCommand::Add { name, tank, fields } => handle_add(name, tank, fields),
        VehicleCommand::List => handle_list(),
        VehicleCommand::Show { id } => handle_show(id),
        VehicleCommand::Edit {
            id,
            name,
            tank,
            fields,
            clear,
        } => {
            let mut patch = fields.into_patch();
            patch.name = name;
            patch.tank_capacity = tank;
            for field in clear {
                match field {
                    ClearableField::GasolineEconomy => patch.manual_economy_gasoline = Some(None),
                    ClearableField::EthanolEconomy => patch.manual_economy_ethanol = Some(None),
                    ClearableField::LastCalibration => patch.last_calibration_date = Some(None),
                }
            }
            handle_edit(id, patch)
        }
        VehicleCommand::Delete { id, yes } => handle_delete(id, yes),
        VehicleCommand::Calibrate { id, date } => handle_calibrate(id, date),
    }
}

impl VehicleFields {
    fn into_patch(self) -> VehiclePatch {
        VehiclePatch {
            manual_economy_gasoline: self.gasoline_economy.map(Some),
            manual_economy_ethanol: self.ethanol_economy.map(Some),
            pointer_mode: self.pointer,
            save_location: self.save_location,
            calibration_reminder: self.reminder,
            reminder_frequency_days: self.every,
            last_calibration_date: self.last_calibration.map(Some),
            show_on_dashboard: self.dashboard,
            odometer: self.odometer,
            ..VehiclePatch::default()
        }
    }
}

fn handle_add(name: String, tank: f64, fields: VehicleFields) -> Result<()> {
    let (config, mut db) = open_store()?;

    let mut input = VehicleInput::new(&name, tank);
    fields.into_patch().apply_to(&mut input);
    if input.reminder_frequency_days.is_none() {
        input.reminder_frequency_days = Some(config.reminders.default_frequency_days);
    }

    let vehicle = Vehicles::new(&mut db).create(&input)?;
    msg_success!(Message::VehicleCreated(vehicle.name, vehicle.id));
    Ok(())
}

fn handle_list() -> Result<()> {
    let (_, mut db) = open_store()?;
    let vehicles = Vehicles::new(&mut db).list()?;

    if vehicles.is_empty() {
        msg_info!(Message::NoVehiclesFound);
        return Ok(());
    }

    msg_print!(Message::VehiclesHeader, true);
    View::vehicles(&vehicles)?;
    Ok(())
}

fn handle_show(id: i64) -> Result<()> {
    let (_, mut db) = open_store()?;

    match Vehicles::new(&mut db).get(id)? {
        Some(vehicle) => {
            msg_print!(Message::VehicleHeader(vehicle.name.clone()), true);
            View::vehicle(&vehicle)?;
        }
        None => msg_error!(Message::VehicleNotFound(id)),
    }
    Ok(())
}

fn handle_edit(id: i64, patch: VehiclePatch) -> Result<()> {
    let (_, mut db) = open_store()?;
    let mut vehicles = Vehicles::new(&mut db);

    let Some(current) = vehicles.get(id)? else {
        msg_error!(Message::VehicleNotFound(id));
        return Ok(());
    };

    let mut input = VehicleInput::from(&current);
    if !patch.apply_to(&mut input) {
        msg_info!(Message::NothingToUpdate);
        return Ok(());
    }

    let updated = vehicles.update(id, &input)?;
    msg_success!(Message::VehicleUpdated(updated.name));
    Ok(())
}

fn handle_delete(id: i64, yes: bool) -> Result<()> {
    let (_, mut db) = open_store()?;
    let mut vehicles = Vehicles::new(&mut db);

    let Some(vehicle) = vehicles.get(id)? else {
        msg_error!(Message::VehicleNotFound(id));
        return Ok(());
    };

    if !confirm(Message::ConfirmDeleteVehicle(vehicle.name.clone()), yes)? {
        return Ok(());
    }

    match vehicles.delete(id) {
        Ok(()) => msg_success!(Message::VehicleDeleted(vehicle.name)),
        Err(StoreError::HasDependents { count, .. }) => msg_error!(Message::VehicleHasEntries(vehicle.name, count)),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

fn handle_calibrate(id: i64, date: Option<NaiveDate>) -> Result<()> {
    let (_, mut db) = open_store()?;
    let mut vehicles = Vehicles::new(&mut db);
    let date = date.unwrap_or_else(|| Local::now().date_naive());

    let Some(vehicle) = vehicles.get(id)? else {
        msg_error!(Message::VehicleNotFound(id));
        return Ok(());
    };

    vehicles.mark_calibrated(id, date)?;
    msg_success!(Message::VehicleCalibrated(vehicle.name, format_date(&date)));
    Ok(())
}
