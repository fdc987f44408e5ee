#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use fuelbook::db::db::{Db, DbLocation};
    use fuelbook::db::fuel_entries::FuelEntries;
    use fuelbook::db::vehicles::Vehicles;
    use fuelbook::libs::error::StoreError;
    use fuelbook::libs::fuel_entry::{FuelEntryInput, FuelKind};
    use fuelbook::libs::vehicle::{PointerMode, VehicleInput, VehiclePatch};
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct VehicleTestContext {
        _temp_dir: TempDir,
        db: Db,
    }

    impl TestContext for VehicleTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db = Db::new(DbLocation::File(temp_dir.path().join("fuelbook.db")));
            VehicleTestContext { _temp_dir: temp_dir, db }
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn civic() -> VehicleInput {
        let mut input = VehicleInput::new("Civic", 47.0);
        input.manual_economy_gasoline = Some(11.5);
        input.pointer_mode = PointerMode::Digital;
        input.save_location = true;
        input.calibration_reminder = true;
        input.reminder_frequency_days = Some(15);
        input.last_calibration_date = Some(date(2025, 8, 20));
        input.odometer = 45210.0;
        input
    }

    #[test_context(VehicleTestContext)]
    #[test]
    fn test_vehicle_crud(ctx: &mut VehicleTestContext) {
        let mut vehicles = Vehicles::new(&mut ctx.db);

        // Create
        let created = vehicles.create(&civic()).unwrap();
        assert!(created.id > 0);
        assert_eq!(created.name, "Civic");
        assert_eq!(created.manual_economy_gasoline, Some(11.5));
        assert_eq!(created.manual_economy_ethanol, None);
        assert_eq!(created.pointer_mode, PointerMode::Digital);
        assert!(created.save_location);
        assert!(created.calibration_reminder);
        assert_eq!(created.reminder_frequency_days, 15);
        assert_eq!(created.last_calibration_date, Some(date(2025, 8, 20)));
        assert!(created.show_on_dashboard);
        assert_eq!(created.odometer, 45210.0);

        // Update replaces every field
        let mut input = VehicleInput::from(&created);
        input.name = "Civic EXL".to_string();
        input.tank_capacity = 50.0;
        input.manual_economy_gasoline = None;
        input.manual_economy_ethanol = Some(8.1);
        input.pointer_mode = PointerMode::Analog;
        input.save_location = false;
        input.calibration_reminder = false;
        input.show_on_dashboard = false;
        let updated = vehicles.update(created.id, &input).unwrap();

        // Read back
        let fetched = vehicles.get(created.id).unwrap().unwrap();
        assert_eq!(fetched, updated);
        assert_eq!(fetched.name, "Civic EXL");
        assert_eq!(fetched.tank_capacity, 50.0);
        assert_eq!(fetched.manual_economy_gasoline, None);
        assert_eq!(fetched.manual_economy_ethanol, Some(8.1));
        assert_eq!(fetched.pointer_mode, PointerMode::Analog);
        assert!(!fetched.save_location);
        assert!(!fetched.calibration_reminder);
        assert!(!fetched.show_on_dashboard);

        // Delete
        vehicles.delete(created.id).unwrap();
        assert!(vehicles.get(created.id).unwrap().is_none());
    }

    #[test_context(VehicleTestContext)]
    #[test]
    fn test_unset_frequency_defaults_to_thirty_days(ctx: &mut VehicleTestContext) {
        let vehicle = Vehicles::new(&mut ctx.db).create(&VehicleInput::new("Uno", 48.0)).unwrap();
        assert_eq!(vehicle.reminder_frequency_days, 30);
        assert!(vehicle.show_on_dashboard);
        assert_eq!(vehicle.odometer, 0.0);
        assert_eq!(vehicle.last_calibration_date, None);
    }

    #[test_context(VehicleTestContext)]
    #[test]
    fn test_list_is_ordered_by_name(ctx: &mut VehicleTestContext) {
        let mut vehicles = Vehicles::new(&mut ctx.db);
        for name in ["saveiro", "Argo", "Mobi"] {
            vehicles.create(&VehicleInput::new(name, 50.0)).unwrap();
        }

        let names: Vec<String> = vehicles.list().unwrap().into_iter().map(|v| v.name).collect();
        assert_eq!(names, vec!["Argo", "Mobi", "saveiro"]);
    }

    #[test_context(VehicleTestContext)]
    #[test]
    fn test_delete_refused_while_entries_exist(ctx: &mut VehicleTestContext) {
        let vehicle = Vehicles::new(&mut ctx.db).create(&civic()).unwrap();
        let entry = FuelEntryInput::new(vehicle.id, date(2025, 9, 1), 45210.0, 35.0, 210.0, FuelKind::Gasoline);
        FuelEntries::new(&mut ctx.db).create(&entry).unwrap();

        let result = Vehicles::new(&mut ctx.db).delete(vehicle.id);
        assert!(matches!(
            result,
            Err(StoreError::HasDependents { vehicle_id, count: 1 }) if vehicle_id == vehicle.id
        ));

        // Nothing was removed
        let mut vehicles = Vehicles::new(&mut ctx.db);
        assert_eq!(vehicles.get(vehicle.id).unwrap(), Some(vehicle.clone()));
        assert_eq!(vehicles.count_fuel_entries(vehicle.id).unwrap(), 1);
        assert_eq!(FuelEntries::new(&mut ctx.db).list_by_vehicle(vehicle.id).unwrap().len(), 1);
    }

    #[test_context(VehicleTestContext)]
    #[test]
    fn test_missing_vehicle_is_not_found(ctx: &mut VehicleTestContext) {
        let mut vehicles = Vehicles::new(&mut ctx.db);

        assert!(vehicles.get(404).unwrap().is_none());
        assert!(matches!(
            vehicles.update(404, &civic()),
            Err(StoreError::NotFound { entity: "vehicle", id: 404 })
        ));
        assert!(matches!(vehicles.delete(404), Err(StoreError::NotFound { id: 404, .. })));
        assert!(matches!(
            vehicles.mark_calibrated(404, date(2025, 9, 1)),
            Err(StoreError::NotFound { id: 404, .. })
        ));
    }

    #[test_context(VehicleTestContext)]
    #[test]
    fn test_invalid_input_is_rejected_before_writing(ctx: &mut VehicleTestContext) {
        let mut vehicles = Vehicles::new(&mut ctx.db);

        let mut input = civic();
        input.tank_capacity = -1.0;
        assert!(matches!(vehicles.create(&input), Err(StoreError::ValidationFailed(_))));

        let mut input = civic();
        input.reminder_frequency_days = Some(0);
        assert!(matches!(vehicles.create(&input), Err(StoreError::ValidationFailed(_))));

        assert!(vehicles.list().unwrap().is_empty());
    }

    #[test_context(VehicleTestContext)]
    #[test]
    fn test_mark_calibrated_only_touches_the_date(ctx: &mut VehicleTestContext) {
        let mut vehicles = Vehicles::new(&mut ctx.db);
        let vehicle = vehicles.create(&civic()).unwrap();

        vehicles.mark_calibrated(vehicle.id, date(2025, 9, 14)).unwrap();

        let fetched = vehicles.get(vehicle.id).unwrap().unwrap();
        assert_eq!(fetched.last_calibration_date, Some(date(2025, 9, 14)));
        assert_eq!(fetched.name, vehicle.name);
        assert_eq!(fetched.reminder_frequency_days, vehicle.reminder_frequency_days);
    }

    #[test_context(VehicleTestContext)]
    #[test]
    fn test_out_of_range_frequency_reads_as_default(ctx: &mut VehicleTestContext) {
        let mut vehicles = Vehicles::new(&mut ctx.db);
        let first = vehicles.create(&VehicleInput::new("Astra", 52.0)).unwrap();
        let second = vehicles.create(&civic()).unwrap();

        ctx.db
            .handle()
            .unwrap()
            .conn
            .execute(
                "UPDATE vehicles SET reminder_frequency_days = -5 WHERE id = ?1",
                [second.id],
            )
            .unwrap();

        let mut vehicles = Vehicles::new(&mut ctx.db);
        let listed = vehicles.list().unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, first.id);
        assert_eq!(listed[1].reminder_frequency_days, 30);
        assert_eq!(vehicles.get(second.id).unwrap().unwrap().reminder_frequency_days, 30);
    }

    #[test_context(VehicleTestContext)]
    #[test]
    fn test_calibration_date_only_moves_forward(ctx: &mut VehicleTestContext) {
        let mut vehicles = Vehicles::new(&mut ctx.db);
        let vehicle = vehicles.create(&civic()).unwrap();
        assert_eq!(vehicle.last_calibration_date, Some(date(2025, 8, 20)));

        // An older refuel logged late keeps the newer calibration
        assert!(!vehicles.advance_calibration(vehicle.id, date(2024, 1, 1)).unwrap());
        assert!(!vehicles.advance_calibration(vehicle.id, date(2025, 8, 20)).unwrap());
        let fetched = vehicles.get(vehicle.id).unwrap().unwrap();
        assert_eq!(fetched.last_calibration_date, Some(date(2025, 8, 20)));

        assert!(vehicles.advance_calibration(vehicle.id, date(2025, 9, 3)).unwrap());
        let fetched = vehicles.get(vehicle.id).unwrap().unwrap();
        assert_eq!(fetched.last_calibration_date, Some(date(2025, 9, 3)));

        // Never calibrated: any date is recorded
        let astra = vehicles.create(&VehicleInput::new("Astra", 52.0)).unwrap();
        assert!(vehicles.advance_calibration(astra.id, date(2020, 5, 1)).unwrap());
        assert_eq!(
            vehicles.get(astra.id).unwrap().unwrap().last_calibration_date,
            Some(date(2020, 5, 1))
        );

        assert!(matches!(
            vehicles.advance_calibration(999, date(2025, 9, 3)),
            Err(StoreError::NotFound { entity: "vehicle", id: 999 })
        ));
    }

    #[test_context(VehicleTestContext)]
    #[test]
    fn test_patch_can_clear_optional_fields(ctx: &mut VehicleTestContext) {
        let mut vehicles = Vehicles::new(&mut ctx.db);
        let mut input = civic();
        input.manual_economy_ethanol = Some(8.1);
        let vehicle = vehicles.create(&input).unwrap();

        let mut edited = VehicleInput::from(&vehicle);
        let patch = VehiclePatch {
            manual_economy_gasoline: Some(None),
            last_calibration_date: Some(None),
            tank_capacity: Some(50.0),
            ..VehiclePatch::default()
        };
        assert!(patch.apply_to(&mut edited));
        let updated = vehicles.update(vehicle.id, &edited).unwrap();

        assert_eq!(updated.manual_economy_gasoline, None);
        assert_eq!(updated.last_calibration_date, None);
        assert_eq!(updated.tank_capacity, 50.0);
        assert_eq!(updated.manual_economy_ethanol, Some(8.1));
        assert_eq!(updated.reminder_frequency_days, 15);

        // Re-applying the same patch is a no-op
        let mut again = VehicleInput::from(&updated);
        assert!(!patch.apply_to(&mut again));
    }
}
