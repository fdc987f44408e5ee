//! Column layout snapshot and statement builders.
//!
//! Columns added by migrations may be missing when a migration failed. The
//! record stores never name such a column directly: reads go through
//! [`SchemaInfo::select_list`], which substitutes `NULL AS column`, and
//! writes go through [`SchemaInfo::writable`], which drops the field.

use crate::libs::error::StoreResult;
use crate::libs::formatter::parse_stored_date;
use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{Connection, Row, ToSql};
use std::collections::{HashMap, HashSet};

pub const TABLE_VEHICLES: &str = "vehicles";
pub const TABLE_FUEL_ENTRIES: &str = "fuel_entries";

/// Reads the column names of a table through `PRAGMA table_info`.
///
/// An absent table yields an empty set.
pub fn table_columns(conn: &Connection, table: &str) -> StoreResult<HashSet<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info('{}')", table))?;
    let names = stmt.query_map([], |row| row.get::<_, String>(1))?.collect::<Result<HashSet<_>, _>>()?;
    Ok(names)
}

/// Which columns each table actually has on the open connection.
#[derive(Debug, Clone, Default)]
pub struct SchemaInfo {
    columns: HashMap<String, HashSet<String>>,
}

impl SchemaInfo {
    pub fn load(conn: &Connection) -> StoreResult<Self> {
        let mut columns = HashMap::new();
        for table in [TABLE_VEHICLES, TABLE_FUEL_ENTRIES] {
            columns.insert(table.to_string(), table_columns(conn, table)?);
        }
        Ok(Self { columns })
    }

    pub fn has(&self, table: &str, column: &str) -> bool {
        self.columns.get(table).is_some_and(|cols| cols.contains(column))
    }

    /// `a, b, NULL AS c` with absent columns replaced by nulls, preserving order.
    pub fn select_list(&self, table: &str, columns: &[&str]) -> String {
        columns
            .iter()
            .map(|col| {
                if self.has(table, col) {
                    (*col).to_string()
                } else {
                    format!("NULL AS {}", col)
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Keeps only the fields whose column exists.
    pub fn writable<'a>(&self, table: &str, fields: Vec<(&'static str, &'a dyn ToSql)>) -> Vec<(&'static str, &'a dyn ToSql)> {
        fields.into_iter().filter(|(col, _)| self.has(table, col)).collect()
    }
}

/// `INSERT INTO t (a, b) VALUES (?1, ?2)`
pub fn insert_sql(table: &str, fields: &[(&'static str, &dyn ToSql)]) -> String {
    let names: Vec<&str> = fields.iter().map(|(name, _)| *name).collect();
    let slots: Vec<String> = (1..=fields.len()).map(|i| format!("?{}", i)).collect();
    format!("INSERT INTO {} ({}) VALUES ({})", table, names.join(", "), slots.join(", "))
}

/// `UPDATE t SET a = ?1, b = ?2 WHERE id = ?3`; the id is bound last.
pub fn update_sql(table: &str, fields: &[(&'static str, &dyn ToSql)]) -> String {
    let sets: Vec<String> = fields
        .iter()
        .enumerate()
        .map(|(i, (name, _))| format!("{} = ?{}", name, i + 1))
        .collect();
    format!("UPDATE {} SET {} WHERE id = ?{}", table, sets.join(", "), fields.len() + 1)
}

/// Required date column.
pub fn date_at(row: &Row, idx: usize) -> rusqlite::Result<NaiveDate> {
    let raw: String = row.get(idx)?;
    parse_stored_date(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, format!("unrecognised date '{}'", raw).into())
    })
}

/// Nullable date column; unparseable text is treated as absent.
pub fn optional_date_at(row: &Row, idx: usize) -> rusqlite::Result<Option<NaiveDate>> {
    let raw: Option<String> = row.get(idx)?;
    Ok(raw.as_deref().and_then(parse_stored_date))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_columns_are_selected_as_null() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute("CREATE TABLE vehicles (id INTEGER PRIMARY KEY, name TEXT)", []).unwrap();
        let schema = SchemaInfo::load(&conn).unwrap();

        assert!(schema.has(TABLE_VEHICLES, "name"));
        assert!(!schema.has(TABLE_VEHICLES, "odometer"));
        assert!(!schema.has(TABLE_FUEL_ENTRIES, "id"));
        assert_eq!(schema.select_list(TABLE_VEHICLES, &["id", "odometer"]), "id, NULL AS odometer");
    }

    #[test]
    fn statement_builders_number_placeholders() {
        let (a, b) = (1, "x");
        let fields: Vec<(&'static str, &dyn ToSql)> = vec![("a", &a), ("b", &b)];
        assert_eq!(insert_sql("t", &fields), "INSERT INTO t (a, b) VALUES (?1, ?2)");
        assert_eq!(update_sql("t", &fields), "UPDATE t SET a = ?1, b = ?2 WHERE id = ?3");
    }
}
