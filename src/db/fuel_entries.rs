use crate::db::db::Db;
use crate::db::schema::{date_at, insert_sql, update_sql, TABLE_FUEL_ENTRIES};
use crate::libs::consumption::round2;
use crate::libs::error::{StoreError, StoreResult};
use crate::libs::formatter::format_date;
use crate::libs::fuel_entry::{FuelEntry, FuelEntryInput, GeoPoint};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row, ToSql};

/// Read order; `map_row` relies on it.
const FUEL_ENTRY_COLUMNS: &[&str] = &[
    "id",
    "vehicle_id",
    "date",
    "odometer",
    "liters",
    "amount_paid",
    "price_per_liter",
    "fuel_kind",
    "route_kind",
    "calibration_performed",
    "latitude",
    "longitude",
];
/// Most recent first; consumers re-sort as they need.
const ORDER_RECENT_FIRST: &str = "ORDER BY date DESC, odometer DESC, id DESC";
const VEHICLE_EXISTS: &str = "SELECT EXISTS(SELECT 1 FROM vehicles WHERE id = ?1)";
const DELETE_FUEL_ENTRY: &str = "DELETE FROM fuel_entries WHERE id = ?1";

/// Refueling rows of the store.
pub struct FuelEntries<'a> {
    db: &'a mut Db,
}

impl<'a> FuelEntries<'a> {
    pub fn new(db: &'a mut Db) -> Self {
        Self { db }
    }

    /// Records a refueling and returns its id.
    pub fn create(&mut self, input: &FuelEntryInput) -> StoreResult<i64> {
        input.validate()?;
        let handle = self.db.handle()?;
        ensure_vehicle(&handle.conn, input.vehicle_id)?;

        let values = WriteValues::from(input);
        let fields = handle.schema.writable(TABLE_FUEL_ENTRIES, values.fields());
        let affected = handle
            .conn
            .execute(&insert_sql(TABLE_FUEL_ENTRIES, &fields), params_from_iter(fields.iter().map(|(_, v)| v)))?;
        if affected == 0 {
            return Err(StoreError::StorageUnavailable("fuel entry was not written".to_string()));
        }

        let id = handle.conn.last_insert_rowid();
        tracing::debug!(fuel_entry_id = id, vehicle_id = input.vehicle_id, "fuel entry created");
        Ok(id)
    }

    /// Replaces every field of the entry.
    pub fn update(&mut self, id: i64, input: &FuelEntryInput) -> StoreResult<()> {
        input.validate()?;
        let handle = self.db.handle()?;
        ensure_vehicle(&handle.conn, input.vehicle_id)?;

        let values = WriteValues::from(input);
        let fields = handle.schema.writable(TABLE_FUEL_ENTRIES, values.fields());
        let mut bound: Vec<&dyn ToSql> = fields.iter().map(|(_, v)| *v).collect();
        bound.push(&id);
        let affected = handle.conn.execute(&update_sql(TABLE_FUEL_ENTRIES, &fields), params_from_iter(bound))?;
        if affected == 0 {
            return Err(StoreError::not_found("fuel entry", id));
        }
        Ok(())
    }

    pub fn delete(&mut self, id: i64) -> StoreResult<()> {
        let handle = self.db.handle()?;
        let affected = handle.conn.execute(DELETE_FUEL_ENTRY, params![id])?;
        if affected == 0 {
            return Err(StoreError::not_found("fuel entry", id));
        }
        Ok(())
    }

    pub fn get(&mut self, id: i64) -> StoreResult<Option<FuelEntry>> {
        let handle = self.db.handle()?;
        let sql = format!(
            "SELECT {} FROM fuel_entries WHERE id = ?1",
            handle.schema.select_list(TABLE_FUEL_ENTRIES, FUEL_ENTRY_COLUMNS)
        );
        handle.conn.query_row(&sql, params![id], map_row).optional().map_err(Into::into)
    }

    /// Entries of one vehicle, most recent first (date, then odometer).
    pub fn list_by_vehicle(&mut self, vehicle_id: i64) -> StoreResult<Vec<FuelEntry>> {
        self.fetch("WHERE vehicle_id = ?1", Some(vehicle_id), None)
    }

    /// Every entry, most recent first.
    pub fn list_all(&mut self) -> StoreResult<Vec<FuelEntry>> {
        self.fetch("", None, None)
    }

    /// Head of [`FuelEntries::list_by_vehicle`].
    pub fn latest_for_vehicle(&mut self, vehicle_id: i64) -> StoreResult<Option<FuelEntry>> {
        Ok(self.fetch("WHERE vehicle_id = ?1", Some(vehicle_id), Some(1))?.into_iter().next())
    }

    fn fetch(&mut self, filter: &str, vehicle_id: Option<i64>, limit: Option<u32>) -> StoreResult<Vec<FuelEntry>> {
        let handle = self.db.handle()?;
        let mut sql = format!(
            "SELECT {} FROM fuel_entries {} {}",
            handle.schema.select_list(TABLE_FUEL_ENTRIES, FUEL_ENTRY_COLUMNS),
            filter,
            ORDER_RECENT_FIRST
        );
        if let Some(limit) = limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }

        let mut stmt = handle.conn.prepare(&sql)?;
        let rows = match vehicle_id {
            Some(id) => stmt.query_map(params![id], map_row)?.collect::<Result<Vec<_>, _>>()?,
            None => stmt.query_map([], map_row)?.collect::<Result<Vec<_>, _>>()?,
        };
        Ok(rows)
    }
}

fn ensure_vehicle(conn: &Connection, vehicle_id: i64) -> StoreResult<()> {
    let exists: bool = conn.query_row(VEHICLE_EXISTS, params![vehicle_id], |row| row.get(0))?;
    if !exists {
        return Err(StoreError::not_found("vehicle", vehicle_id));
    }
    Ok(())
}

/// Storage form of a [`FuelEntryInput`].
struct WriteValues<'i> {
    input: &'i FuelEntryInput,
    date: String,
    price_per_liter: f64,
    calibration_performed: i64,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

impl<'i> From<&'i FuelEntryInput> for WriteValues<'i> {
    fn from(input: &'i FuelEntryInput) -> Self {
        Self {
            input,
            date: format_date(&input.date),
            price_per_liter: input.resolved_price_per_liter(),
            calibration_performed: i64::from(input.calibration_performed),
            latitude: input.location.map(|p| p.latitude),
            longitude: input.location.map(|p| p.longitude),
        }
    }
}

impl WriteValues<'_> {
    fn fields(&self) -> Vec<(&'static str, &dyn ToSql)> {
        vec![
            ("date", &self.date),
            ("odometer", &self.input.odometer),
            ("liters", &self.input.liters),
            ("amount_paid", &self.input.amount_paid),
            ("price_per_liter", &self.price_per_liter),
            ("fuel_kind", &self.input.fuel_kind),
            ("route_kind", &self.input.route_kind),
            ("calibration_performed", &self.calibration_performed),
            ("latitude", &self.latitude),
            ("longitude", &self.longitude),
            ("vehicle_id", &self.input.vehicle_id),
        ]
    }
}

fn map_row(row: &Row) -> rusqlite::Result<FuelEntry> {
    let liters: f64 = row.get(4)?;
    let price_per_liter: f64 = row.get(6)?;
    // Absent on databases where the amount_paid migration did not run
    let amount_paid = row
        .get::<_, Option<f64>>(5)?
        .unwrap_or_else(|| round2(liters * price_per_liter));

    Ok(FuelEntry {
        id: row.get(0)?,
        vehicle_id: row.get(1)?,
        date: date_at(row, 2)?,
        odometer: row.get(3)?,
        liters,
        amount_paid,
        price_per_liter,
        fuel_kind: row.get(7)?,
        route_kind: row.get(8)?,
        calibration_performed: row.get::<_, Option<i64>>(9)?.unwrap_or(0) != 0,
        location: GeoPoint::from_parts(row.get(10)?, row.get(11)?),
    })
}
