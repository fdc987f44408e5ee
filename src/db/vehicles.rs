use crate::db::db::Db;
use crate::db::schema::{insert_sql, optional_date_at, update_sql, TABLE_VEHICLES};
use crate::libs::error::{StoreError, StoreResult};
use crate::libs::formatter::format_date;
use crate::libs::vehicle::{Vehicle, VehicleInput, DEFAULT_REMINDER_FREQUENCY_DAYS};
use chrono::NaiveDate;
use rusqlite::{params, params_from_iter, OptionalExtension, Row, ToSql};

/// Read order; `map_row` relies on it.
const VEHICLE_COLUMNS: &[&str] = &[
    "id",
    "name",
    "tank_capacity",
    "manual_economy_gasoline",
    "manual_economy_ethanol",
    "pointer_mode",
    "save_location",
    "calibration_reminder",
    "reminder_frequency_days",
    "last_calibration_date",
    "show_on_dashboard",
    "odometer",
];
const COUNT_FUEL_ENTRIES: &str = "SELECT COUNT(*) FROM fuel_entries WHERE vehicle_id = ?1";
const DELETE_VEHICLE: &str = "DELETE FROM vehicles WHERE id = ?1";
const UPDATE_LAST_CALIBRATION: &str = "UPDATE vehicles SET last_calibration_date = ?2 WHERE id = ?1";

/// Vehicle rows of the store.
pub struct Vehicles<'a> {
    db: &'a mut Db,
}

impl<'a> Vehicles<'a> {
    pub fn new(db: &'a mut Db) -> Self {
        Self { db }
    }

    /// Inserts a vehicle and returns the stored row, defaults included.
    pub fn create(&mut self, input: &VehicleInput) -> StoreResult<Vehicle> {
        input.validate()?;
        let id = {
            let handle = self.db.handle()?;
            let values = WriteValues::from(input);
            let fields = handle.schema.writable(TABLE_VEHICLES, values.fields());
            handle.conn.execute(&insert_sql(TABLE_VEHICLES, &fields), params_from_iter(fields.iter().map(|(_, v)| v)))?;
            handle.conn.last_insert_rowid()
        };
        tracing::debug!(vehicle_id = id, "vehicle created");
        self.get(id)?.ok_or(StoreError::not_found("vehicle", id))
    }

    /// Replaces every mutable field of the vehicle.
    pub fn update(&mut self, id: i64, input: &VehicleInput) -> StoreResult<Vehicle> {
        input.validate()?;
        let affected = {
            let handle = self.db.handle()?;
            let values = WriteValues::from(input);
            let fields = handle.schema.writable(TABLE_VEHICLES, values.fields());
            let mut bound: Vec<&dyn ToSql> = fields.iter().map(|(_, v)| *v).collect();
            bound.push(&id);
            handle.conn.execute(&update_sql(TABLE_VEHICLES, &fields), params_from_iter(bound))?
        };
        if affected == 0 {
            return Err(StoreError::not_found("vehicle", id));
        }
        self.get(id)?.ok_or(StoreError::not_found("vehicle", id))
    }

    /// Deletes a vehicle that has no fuel entries.
    ///
    /// Fails with [`StoreError::HasDependents`] and leaves the row alone
    /// when any entry still references it.
    pub fn delete(&mut self, id: i64) -> StoreResult<()> {
        let handle = self.db.handle()?;
        let count: i64 = handle.conn.query_row(COUNT_FUEL_ENTRIES, params![id], |row| row.get(0))?;
        if count > 0 {
            return Err(StoreError::HasDependents { vehicle_id: id, count });
        }
        let affected = handle.conn.execute(DELETE_VEHICLE, params![id])?;
        if affected == 0 {
            return Err(StoreError::not_found("vehicle", id));
        }
        Ok(())
    }

    pub fn get(&mut self, id: i64) -> StoreResult<Option<Vehicle>> {
        let handle = self.db.handle()?;
        let sql = format!(
            "SELECT {} FROM vehicles WHERE id = ?1",
            handle.schema.select_list(TABLE_VEHICLES, VEHICLE_COLUMNS)
        );
        handle.conn.query_row(&sql, params![id], map_row).optional().map_err(Into::into)
    }

    /// All vehicles ordered by name.
    pub fn list(&mut self) -> StoreResult<Vec<Vehicle>> {
        let handle = self.db.handle()?;
        let sql = format!(
            "SELECT {} FROM vehicles ORDER BY name COLLATE NOCASE, id",
            handle.schema.select_list(TABLE_VEHICLES, VEHICLE_COLUMNS)
        );
        let mut stmt = handle.conn.prepare(&sql)?;
        let vehicles = stmt.query_map([], map_row)?.collect::<Result<Vec<_>, _>>()?;
        Ok(vehicles)
    }

    /// Records a tire calibration on `date`.
    pub fn mark_calibrated(&mut self, id: i64, date: NaiveDate) -> StoreResult<()> {
        let handle = self.db.handle()?;
        let affected = handle.conn.execute(UPDATE_LAST_CALIBRATION, params![id, format_date(&date)])?;
        if affected == 0 {
            return Err(StoreError::not_found("vehicle", id));
        }
        Ok(())
    }

    /// Moves the last calibration date forward to `date`.
    ///
    /// Returns `false` without writing when the stored date is already the
    /// same day or later.
    pub fn advance_calibration(&mut self, id: i64, date: NaiveDate) -> StoreResult<bool> {
        let vehicle = self.get(id)?.ok_or_else(|| StoreError::not_found("vehicle", id))?;
        if vehicle.last_calibration_date.is_some_and(|last| last >= date) {
            tracing::debug!(vehicle_id = id, %date, "calibration already recorded on or after this date");
            return Ok(false);
        }
        self.mark_calibrated(id, date)?;
        Ok(true)
    }

    /// Number of fuel entries owned by the vehicle.
    pub fn count_fuel_entries(&mut self, id: i64) -> StoreResult<i64> {
        let handle = self.db.handle()?;
        Ok(handle.conn.query_row(COUNT_FUEL_ENTRIES, params![id], |row| row.get(0))?)
    }
}

/// Storage form of a [`VehicleInput`]: booleans as 0/1, dates as text.
struct WriteValues<'i> {
    input: &'i VehicleInput,
    save_location: i64,
    calibration_reminder: i64,
    reminder_frequency_days: u32,
    last_calibration_date: Option<String>,
    show_on_dashboard: i64,
    name: String,
}

impl<'i> From<&'i VehicleInput> for WriteValues<'i> {
    fn from(input: &'i VehicleInput) -> Self {
        Self {
            input,
            save_location: i64::from(input.save_location),
            calibration_reminder: i64::from(input.calibration_reminder),
            reminder_frequency_days: input.frequency_or_default(),
            last_calibration_date: input.last_calibration_date.as_ref().map(format_date),
            show_on_dashboard: i64::from(input.show_on_dashboard),
            name: input.name.trim().to_string(),
        }
    }
}

impl WriteValues<'_> {
    fn fields(&self) -> Vec<(&'static str, &dyn ToSql)> {
        vec![
            ("name", &self.name),
            ("tank_capacity", &self.input.tank_capacity),
            ("manual_economy_gasoline", &self.input.manual_economy_gasoline),
            ("manual_economy_ethanol", &self.input.manual_economy_ethanol),
            ("pointer_mode", &self.input.pointer_mode),
            ("save_location", &self.save_location),
            ("calibration_reminder", &self.calibration_reminder),
            ("reminder_frequency_days", &self.reminder_frequency_days),
            ("last_calibration_date", &self.last_calibration_date),
            ("show_on_dashboard", &self.show_on_dashboard),
            ("odometer", &self.input.odometer),
        ]
    }
}

fn map_row(row: &Row) -> rusqlite::Result<Vehicle> {
    let pointer_mode: Option<String> = row.get(5)?;
    Ok(Vehicle {
        id: row.get(0)?,
        name: row.get(1)?,
        tank_capacity: row.get(2)?,
        manual_economy_gasoline: row.get(3)?,
        manual_economy_ethanol: row.get(4)?,
        pointer_mode: pointer_mode.and_then(|s| s.parse().ok()).unwrap_or_default(),
        save_location: row.get::<_, Option<i64>>(6)?.unwrap_or(0) != 0,
        calibration_reminder: row.get::<_, Option<i64>>(7)?.unwrap_or(0) != 0,
        reminder_frequency_days: row
            .get::<_, Option<i64>>(8)?
            .and_then(|days| u32::try_from(days).ok())
            .filter(|days| *days > 0)
            .unwrap_or(DEFAULT_REMINDER_FREQUENCY_DAYS),
        last_calibration_date: optional_date_at(row, 9)?,
        show_on_dashboard: row.get::<_, Option<i64>>(10)?.map_or(true, |v| v != 0),
        odometer: row.get::<_, Option<f64>>(11)?.unwrap_or(0.0),
    })
}
