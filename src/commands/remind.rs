use super::open_store;
use crate::{
    db::vehicles::Vehicles,
    libs::{messages::Message, reminder::vehicle_calibration_status, view::View},
    msg_info, msg_print,
};
use anyhow::Result;
use chrono::Local;

/// Calibration status of every dashboard vehicle with reminders enabled.
pub async fn cmd() -> Result<()> {
    let (_, mut db) = open_store()?;
    let today = Local::now().date_naive();

    let rows: Vec<_> = Vehicles::new(&mut db)
        .list()?
        .into_iter()
        .filter(|v| v.show_on_dashboard && v.calibration_reminder)
        .map(|v| {
            let status = vehicle_calibration_status(&v, today);
            (v, status)
        })
        .collect();

    if rows.is_empty() {
        msg_info!(Message::NoRemindersEnabled);
        return Ok(());
    }

    msg_print!(Message::RemindersHeader, true);
    View::reminders(&rows)?;
    Ok(())
}
