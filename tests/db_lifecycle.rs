#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use fuelbook::db::db::{Db, DbLocation};
    use fuelbook::db::fuel_entries::FuelEntries;
    use fuelbook::db::vehicles::Vehicles;
    use fuelbook::libs::error::StoreError;
    use fuelbook::libs::fuel_entry::{FuelEntryInput, FuelKind};
    use fuelbook::libs::vehicle::VehicleInput;
    use std::path::PathBuf;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct DbTestContext {
        temp_dir: TempDir,
    }

    impl DbTestContext {
        fn db_path(&self) -> PathBuf {
            self.temp_dir.path().join("data").join("fuelbook.db")
        }
    }

    impl TestContext for DbTestContext {
        fn setup() -> Self {
            DbTestContext {
                temp_dir: tempfile::tempdir().unwrap(),
            }
        }
    }

    fn seed(db: &mut Db) -> i64 {
        let vehicle = Vehicles::new(db).create(&VehicleInput::new("Civic", 47.0)).unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
        FuelEntries::new(db)
            .create(&FuelEntryInput::new(vehicle.id, date, 45210.0, 35.0, 210.0, FuelKind::Gasoline))
            .unwrap();
        vehicle.id
    }

    #[test_context(DbTestContext)]
    #[test]
    fn test_connection_opens_lazily(ctx: &mut DbTestContext) {
        let mut db = Db::new(DbLocation::File(ctx.db_path()));
        assert!(!db.is_open());
        assert!(!ctx.db_path().exists());

        // Status never opens the database
        let status = db.status();
        assert!(!status.connected);
        assert_eq!(status.schema_version, None);
        assert!(!db.is_open());

        // First operation creates the file, including missing directories
        assert!(Vehicles::new(&mut db).list().unwrap().is_empty());
        assert!(db.is_open());
        assert!(ctx.db_path().exists());

        let status = db.status();
        assert!(status.connected);
        assert_eq!(status.schema_version, Some(3));
    }

    #[test_context(DbTestContext)]
    #[test]
    fn test_reconnect_keeps_data(ctx: &mut DbTestContext) {
        let mut db = Db::new(DbLocation::File(ctx.db_path()));
        let vehicle_id = seed(&mut db);

        db.reconnect().unwrap();
        assert!(db.is_open());
        assert!(db.last_migration_report().unwrap().applied.is_empty());
        assert_eq!(FuelEntries::new(&mut db).list_by_vehicle(vehicle_id).unwrap().len(), 1);

        db.close().unwrap();
        assert!(!db.is_open());
        assert!(!db.status().connected);

        // A new handle on the same file sees the same rows
        let mut other = Db::new(DbLocation::File(ctx.db_path()));
        assert_eq!(Vehicles::new(&mut other).list().unwrap().len(), 1);
    }

    #[test_context(DbTestContext)]
    #[test]
    fn test_reset_removes_everything(ctx: &mut DbTestContext) {
        let mut db = Db::new(DbLocation::File(ctx.db_path()));
        seed(&mut db);

        db.reset().unwrap();

        assert!(Vehicles::new(&mut db).list().unwrap().is_empty());
        assert!(FuelEntries::new(&mut db).list_all().unwrap().is_empty());

        // The store is usable again right away
        seed(&mut db);
        assert_eq!(Vehicles::new(&mut db).list().unwrap().len(), 1);
    }

    #[test]
    fn test_reset_in_memory() {
        let mut db = Db::open_in_memory();
        seed(&mut db);

        db.reset().unwrap();
        assert!(db.is_open());
        assert!(Vehicles::new(&mut db).list().unwrap().is_empty());

        let vehicle_id = seed(&mut db);
        assert_eq!(FuelEntries::new(&mut db).list_by_vehicle(vehicle_id).unwrap().len(), 1);
    }

    #[test_context(DbTestContext)]
    #[test]
    fn test_unreachable_location_is_storage_unavailable(ctx: &mut DbTestContext) {
        // A regular file where a directory is expected
        let blocker = ctx.temp_dir.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();
        let mut db = Db::new(DbLocation::File(blocker.join("fuelbook.db")));

        assert!(matches!(
            Vehicles::new(&mut db).list(),
            Err(StoreError::StorageUnavailable(_))
        ));
        assert!(!db.is_open());
        assert!(!db.status().connected);
    }

    #[test_context(DbTestContext)]
    #[test]
    fn test_wal_can_be_disabled(ctx: &mut DbTestContext) {
        let mut db = Db::new(DbLocation::File(ctx.db_path())).wal(false);
        let mode: String = db
            .handle()
            .unwrap()
            .conn
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
            .unwrap();
        assert_eq!(mode.to_lowercase(), "delete");

        let mut db = Db::new(DbLocation::File(ctx.temp_dir.path().join("wal.db")));
        let mode: String = db
            .handle()
            .unwrap()
            .conn
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
            .unwrap();
        assert_eq!(mode.to_lowercase(), "wal");
    }
}
