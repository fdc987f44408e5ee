use super::open_store;
use crate::{
    db::{fuel_entries::FuelEntries, vehicles::Vehicles},
    libs::{
        consumption::compare_fuels,
        fuel_entry::FuelKind,
        messages::Message,
        report::{filter_period, ConsumptionReport, CostReport},
        view::View,
    },
    msg_error, msg_info, msg_print,
};
use anyhow::Result;
use chrono::NaiveDate;
use clap::Args;

#[derive(Debug, Args)]
pub struct StatsArgs {
    /// Restrict to one vehicle
    #[arg(short, long)]
    vehicle: Option<i64>,
    /// First day of the period (inclusive)
    #[arg(long)]
    from: Option<NaiveDate>,
    /// Last day of the period (inclusive)
    #[arg(long)]
    to: Option<NaiveDate>,
    /// Current gasoline pump price, for the fuel comparison
    #[arg(long, requires = "ethanol_price")]
    gasoline_price: Option<f64>,
    /// Current ethanol pump price, for the fuel comparison
    #[arg(long, requires = "gasoline_price")]
    ethanol_price: Option<f64>,
}

pub async fn cmd(args: StatsArgs) -> Result<()> {
    let (_, mut db) = open_store()?;

    let vehicles = match args.vehicle {
        Some(id) => match Vehicles::new(&mut db).get(id)? {
            Some(vehicle) => vec![vehicle],
            None => {
                msg_error!(Message::VehicleNotFound(id));
                return Ok(());
            }
        },
        None => Vehicles::new(&mut db).list()?,
    };

    if vehicles.is_empty() {
        msg_info!(Message::NoVehiclesFound);
        return Ok(());
    }

    let mut period_entries = Vec::new();
    let mut economy = Vec::with_capacity(vehicles.len());
    for vehicle in &vehicles {
        let history = FuelEntries::new(&mut db).list_by_vehicle(vehicle.id)?;
        let history = filter_period(&history, args.from, args.to);
        economy.push(ConsumptionReport::for_vehicle(vehicle, &history));
        period_entries.extend(history);
    }

    let scope = match &vehicles[..] {
        [single] if args.vehicle.is_some() => format!("'{}'", single.name),
        _ => "all vehicles".to_string(),
    };
    msg_print!(Message::StatsHeader(scope), true);

    msg_print!(Message::EconomyHeader);
    View::consumption(&economy)?;
    for report in &economy {
        if report.insufficient_history {
            let count = period_entries.iter().filter(|e| e.vehicle_id == report.vehicle_id).count();
            msg_info!(format!("{}: {}", report.vehicle_name, Message::InsufficientHistory(count)));
        }
        if report.skipped_segments > 0 {
            msg_info!(format!("{}: {}", report.vehicle_name, Message::SkippedSegments(report.skipped_segments)));
        }
    }
    if economy.iter().any(ConsumptionReport::uses_manual_figures) {
        msg_info!(Message::ManualEconomyFallback);
    }

    msg_print!(Message::CostsHeader, true);
    View::costs(&CostReport::from_entries(&period_entries))?;

    if let (Some(gasoline_price), Some(ethanol_price)) = (args.gasoline_price, args.ethanol_price) {
        println!();
        for report in &economy {
            let comparison = compare_fuels(
                gasoline_price,
                ethanol_price,
                report.for_kind(FuelKind::Gasoline).map(|e| e.km_per_liter),
                report.for_kind(FuelKind::Ethanol).map(|e| e.km_per_liter),
            );
            match comparison {
                Some(cmp) => msg_print!(format!(
                    "{}: {}",
                    report.vehicle_name,
                    Message::FuelComparison {
                        best: cmp.best.to_string(),
                        price_ratio: cmp.price_ratio,
                        economy_ratio: cmp.economy_ratio,
                    }
                )),
                None => msg_info!(format!("{}: {}", report.vehicle_name, Message::FuelComparisonUnavailable)),
            }
        }
    }

    Ok(())
}
