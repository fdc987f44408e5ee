#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use fuelbook::db::db::{Db, DbLocation};
    use fuelbook::db::fuel_entries::FuelEntries;
    use fuelbook::db::vehicles::Vehicles;
    use fuelbook::libs::error::StoreError;
    use fuelbook::libs::fuel_entry::{FuelEntryInput, FuelEntryPatch, FuelKind, GeoPoint, RouteKind};
    use fuelbook::libs::vehicle::VehicleInput;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct FuelTestContext {
        _temp_dir: TempDir,
        db: Db,
        vehicle_id: i64,
    }

    impl TestContext for FuelTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let mut db = Db::new(DbLocation::File(temp_dir.path().join("fuelbook.db")));
            let vehicle_id = Vehicles::new(&mut db).create(&VehicleInput::new("Civic", 47.0)).unwrap().id;
            FuelTestContext {
                _temp_dir: temp_dir,
                db,
                vehicle_id,
            }
        }
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, day).unwrap()
    }

    #[test_context(FuelTestContext)]
    #[test]
    fn test_fuel_entry_crud(ctx: &mut FuelTestContext) {
        let mut entries = FuelEntries::new(&mut ctx.db);

        // Create
        let mut input = FuelEntryInput::new(ctx.vehicle_id, date(1), 45210.0, 35.0, 210.0, FuelKind::Gasoline);
        input.route_kind = RouteKind::Highway;
        input.calibration_performed = true;
        input.location = Some(GeoPoint::new(-23.5505, -46.6333));
        let id = entries.create(&input).unwrap();
        assert!(id > 0);

        // Read
        let entry = entries.get(id).unwrap().unwrap();
        assert_eq!(entry.vehicle_id, ctx.vehicle_id);
        assert_eq!(entry.date, date(1));
        assert_eq!(entry.odometer, 45210.0);
        assert_eq!(entry.liters, 35.0);
        assert_eq!(entry.amount_paid, 210.0);
        assert_eq!(entry.price_per_liter, 6.0);
        assert_eq!(entry.fuel_kind, FuelKind::Gasoline);
        assert_eq!(entry.route_kind, RouteKind::Highway);
        assert!(entry.calibration_performed);
        assert_eq!(entry.location, Some(GeoPoint::new(-23.5505, -46.6333)));

        // Update
        let mut input = FuelEntryInput::from(&entry);
        input.fuel_kind = FuelKind::Ethanol;
        input.liters = 40.0;
        input.amount_paid = 172.0;
        input.price_per_liter = None;
        input.location = None;
        entries.update(id, &input).unwrap();

        let entry = entries.get(id).unwrap().unwrap();
        assert_eq!(entry.fuel_kind, FuelKind::Ethanol);
        assert_eq!(entry.price_per_liter, 4.3);
        assert_eq!(entry.location, None);

        // Delete
        entries.delete(id).unwrap();
        assert!(entries.get(id).unwrap().is_none());
    }

    #[test_context(FuelTestContext)]
    #[test]
    fn test_explicit_price_is_kept(ctx: &mut FuelTestContext) {
        let mut input = FuelEntryInput::new(ctx.vehicle_id, date(2), 100.0, 30.0, 180.0, FuelKind::Gasoline);
        input.price_per_liter = Some(5.99);

        let mut entries = FuelEntries::new(&mut ctx.db);
        let id = entries.create(&input).unwrap();
        assert_eq!(entries.get(id).unwrap().unwrap().price_per_liter, 5.99);
    }

    #[test_context(FuelTestContext)]
    #[test]
    fn test_history_is_most_recent_first(ctx: &mut FuelTestContext) {
        let mut entries = FuelEntries::new(&mut ctx.db);

        let older = entries
            .create(&FuelEntryInput::new(ctx.vehicle_id, date(1), 1000.0, 30.0, 180.0, FuelKind::Gasoline))
            .unwrap();
        // Same day, two stops: the higher odometer is the later one
        let same_day_second = entries
            .create(&FuelEntryInput::new(ctx.vehicle_id, date(8), 1400.0, 20.0, 120.0, FuelKind::Gasoline))
            .unwrap();
        let same_day_first = entries
            .create(&FuelEntryInput::new(ctx.vehicle_id, date(8), 1300.0, 25.0, 150.0, FuelKind::Ethanol))
            .unwrap();

        let ids: Vec<i64> = entries.list_by_vehicle(ctx.vehicle_id).unwrap().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![same_day_second, same_day_first, older]);

        let latest = entries.latest_for_vehicle(ctx.vehicle_id).unwrap().unwrap();
        assert_eq!(latest.id, same_day_second);
    }

    #[test_context(FuelTestContext)]
    #[test]
    fn test_entries_are_scoped_to_their_vehicle(ctx: &mut FuelTestContext) {
        let other = Vehicles::new(&mut ctx.db).create(&VehicleInput::new("Uno", 48.0)).unwrap().id;

        let mut entries = FuelEntries::new(&mut ctx.db);
        entries
            .create(&FuelEntryInput::new(ctx.vehicle_id, date(1), 1000.0, 30.0, 180.0, FuelKind::Gasoline))
            .unwrap();
        entries
            .create(&FuelEntryInput::new(other, date(2), 5000.0, 30.0, 180.0, FuelKind::Gasoline))
            .unwrap();

        assert_eq!(entries.list_by_vehicle(ctx.vehicle_id).unwrap().len(), 1);
        assert_eq!(entries.list_by_vehicle(other).unwrap().len(), 1);
        assert_eq!(entries.list_all().unwrap().len(), 2);
        assert!(entries.latest_for_vehicle(other + 100).unwrap().is_none());
    }

    #[test_context(FuelTestContext)]
    #[test]
    fn test_entry_for_unknown_vehicle_is_rejected(ctx: &mut FuelTestContext) {
        let mut entries = FuelEntries::new(&mut ctx.db);
        let input = FuelEntryInput::new(9999, date(1), 1000.0, 30.0, 180.0, FuelKind::Gasoline);

        assert!(matches!(
            entries.create(&input),
            Err(StoreError::NotFound { entity: "vehicle", id: 9999 })
        ));
        assert!(entries.list_all().unwrap().is_empty());
    }

    #[test_context(FuelTestContext)]
    #[test]
    fn test_invalid_entries_are_rejected(ctx: &mut FuelTestContext) {
        let mut entries = FuelEntries::new(&mut ctx.db);

        let zero_liters = FuelEntryInput::new(ctx.vehicle_id, date(1), 1000.0, 0.0, 180.0, FuelKind::Gasoline);
        assert!(matches!(entries.create(&zero_liters), Err(StoreError::ValidationFailed(_))));

        let mut bad_location = FuelEntryInput::new(ctx.vehicle_id, date(1), 1000.0, 30.0, 180.0, FuelKind::Gasoline);
        bad_location.location = Some(GeoPoint::new(91.0, 0.0));
        assert!(matches!(entries.create(&bad_location), Err(StoreError::ValidationFailed(_))));

        assert!(entries.list_all().unwrap().is_empty());
    }

    #[test_context(FuelTestContext)]
    #[test]
    fn test_missing_entry_is_not_found(ctx: &mut FuelTestContext) {
        let mut entries = FuelEntries::new(&mut ctx.db);
        let input = FuelEntryInput::new(ctx.vehicle_id, date(1), 1000.0, 30.0, 180.0, FuelKind::Gasoline);

        assert!(matches!(
            entries.update(77, &input),
            Err(StoreError::NotFound { entity: "fuel entry", id: 77 })
        ));
        assert!(matches!(entries.delete(77), Err(StoreError::NotFound { entity: "fuel entry", .. })));
    }

    #[test_context(FuelTestContext)]
    #[test]
    fn test_patch_edits_calibration_and_location(ctx: &mut FuelTestContext) {
        let mut entries = FuelEntries::new(&mut ctx.db);
        let mut input = FuelEntryInput::new(ctx.vehicle_id, date(1), 45210.0, 35.0, 210.0, FuelKind::Gasoline);
        input.location = Some(GeoPoint::new(-23.5505, -46.6333));
        let id = entries.create(&input).unwrap();

        // Flag the calibration and clear the location
        let mut edited = FuelEntryInput::from(&entries.get(id).unwrap().unwrap());
        let patch = FuelEntryPatch {
            calibration_performed: Some(true),
            location: Some(None),
            ..FuelEntryPatch::default()
        };
        assert!(patch.apply_to(&mut edited));
        entries.update(id, &edited).unwrap();

        let entry = entries.get(id).unwrap().unwrap();
        assert!(entry.calibration_performed);
        assert_eq!(entry.location, None);
        assert_eq!(entry.price_per_liter, 6.0);

        // Set a new location
        let mut edited = FuelEntryInput::from(&entry);
        let patch = FuelEntryPatch {
            location: Some(Some(GeoPoint::new(-22.9068, -43.1729))),
            ..FuelEntryPatch::default()
        };
        assert!(patch.apply_to(&mut edited));
        entries.update(id, &edited).unwrap();
        let entry = entries.get(id).unwrap().unwrap();
        assert_eq!(entry.location, Some(GeoPoint::new(-22.9068, -43.1729)));

        // An empty patch or the same values change nothing
        let mut unchanged = FuelEntryInput::from(&entry);
        assert!(!FuelEntryPatch::default().apply_to(&mut unchanged));
        let same = FuelEntryPatch {
            calibration_performed: Some(true),
            fuel_kind: Some(FuelKind::Gasoline),
            ..FuelEntryPatch::default()
        };
        assert!(!same.apply_to(&mut unchanged));
    }

    #[test]
    fn test_patch_rederives_price_on_new_amount() {
        let mut input = FuelEntryInput::new(1, date(1), 45210.0, 35.0, 210.0, FuelKind::Gasoline);
        input.price_per_liter = Some(6.0);

        let patch = FuelEntryPatch {
            amount_paid: Some(224.0),
            ..FuelEntryPatch::default()
        };
        assert!(patch.apply_to(&mut input));
        assert_eq!(input.price_per_liter, None);
        assert_eq!(input.resolved_price_per_liter(), 6.4);

        let patch = FuelEntryPatch {
            amount_paid: Some(230.0),
            price_per_liter: Some(6.5),
            ..FuelEntryPatch::default()
        };
        assert!(patch.apply_to(&mut input));
        assert_eq!(input.price_per_liter, Some(6.5));
    }
}
