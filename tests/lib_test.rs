use anyhow::Result;
use chrono::NaiveDate;
use lift_tracker_lib::{
    AppService, Config, ConfigError, DbError, Direction, LiftStore, MemoryStore, SqliteStore,
    Step, TrainingCycle, Units, WeightError,
};
use tempfile::TempDir;

// Helper function to create a test service with an in-memory store.
// The TempDir must outlive the service so config saves have somewhere to go.
fn create_test_service(store: Box<dyn LiftStore>) -> (AppService, TempDir) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let config_path = dir.path().join("config.toml");
    let service = AppService::with_store(Config::default(), store, ":memory:".into(), config_path);
    (service, dir)
}

fn sqlite_service() -> Result<(AppService, TempDir)> {
    Ok(create_test_service(Box::new(SqliteStore::open_in_memory()?)))
}

fn memory_service() -> (AppService, TempDir) {
    create_test_service(Box::new(MemoryStore::new()))
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_add_and_list_lifts() -> Result<()> {
    for (mut service, _dir) in [sqlite_service()?, memory_service()] {
        let squat = service.add_lift_on("Squat", "315", date(2024, 3, 1))?;
        let bench = service.add_lift_on("  Bench Press ", "225.5", date(2024, 3, 2))?;

        assert!(squat.id.is_some());
        assert_ne!(squat.id, bench.id);
        assert_eq!(bench.lift.name, "Bench Press");

        let lifts = service.list_lifts()?;
        assert_eq!(lifts.len(), 2);
        assert_eq!(lifts[0].lift.name, "Squat");
        assert_eq!(lifts[0].lift.max_weight, 315.0);
        assert_eq!(lifts[0].date, date(2024, 3, 1));
        assert_eq!(lifts[1].lift.max_weight, 225.5);
    }
    Ok(())
}

#[test]
fn test_names_need_not_be_unique() -> Result<()> {
    let (mut service, _dir) = sqlite_service()?;
    service.add_lift("Deadlift", "405")?;
    service.add_lift("Deadlift", "415")?;
    assert_eq!(service.list_lifts()?.len(), 2);
    Ok(())
}

#[test]
fn test_add_rejects_invalid_input() -> Result<()> {
    let (mut service, _dir) = memory_service();

    let err = service.add_lift("Squat", "abc").unwrap_err();
    assert!(matches!(
        err.downcast_ref::<WeightError>(),
        Some(WeightError::NotANumber(_))
    ));

    let err = service.add_lift("Squat", "0").unwrap_err();
    assert!(matches!(
        err.downcast_ref::<WeightError>(),
        Some(WeightError::NotPositive(_))
    ));

    assert!(service.add_lift("   ", "100").is_err());
    assert!(service.list_lifts()?.is_empty());
    Ok(())
}

#[test]
fn test_add_rejects_weight_that_overflows_in_pounds() -> Result<()> {
    let (mut service, _dir) = sqlite_service()?;
    service.set_units(Units::Metric)?;

    let err = service.add_lift("Squat", "1e308").unwrap_err();
    assert!(matches!(
        err.downcast_ref::<WeightError>(),
        Some(WeightError::OutOfRange(_))
    ));
    assert!(service.list_lifts()?.is_empty());

    let id = service.add_lift("Squat", "100")?.id.unwrap();
    let err = service.edit_max_weight(id, "1e308").unwrap_err();
    assert!(matches!(
        err.downcast_ref::<WeightError>(),
        Some(WeightError::OutOfRange(_))
    ));
    let (_, plan) = service.prescription_for(id, Some("5/3/1"))?;
    assert!(plan.working_sets.weights().iter().all(|w| w.is_finite()));
    Ok(())
}

#[test]
fn test_metric_input_is_stored_in_pounds() -> Result<()> {
    let (mut service, _dir) = sqlite_service()?;
    service.set_units(Units::Metric)?;

    let tracked = service.add_lift("Squat", "100")?;
    assert!((tracked.lift.max_weight - 220.462_262).abs() < 1e-3);

    let stored = service.get_lift(tracked.id.unwrap())?;
    assert!((stored.lift.max_weight - tracked.lift.max_weight).abs() < 1e-9);
    Ok(())
}

#[test]
fn test_edit_overwrites_weight_and_keeps_date() -> Result<()> {
    let (mut service, _dir) = sqlite_service()?;
    let tracked = service.add_lift_on("Bench Press", "200", date(2023, 12, 24))?;
    let id = tracked.id.unwrap();

    service.edit_max_weight(id, "210")?;

    let updated = service.get_lift(id)?;
    assert_eq!(updated.lift.max_weight, 210.0);
    assert_eq!(updated.date, date(2023, 12, 24));
    assert_eq!(updated.id, Some(id));
    Ok(())
}

#[test]
fn test_edit_unknown_lift_fails() -> Result<()> {
    let (mut service, _dir) = memory_service();
    let err = service.edit_max_weight(42, "100").unwrap_err();
    assert!(matches!(
        err.downcast_ref::<DbError>(),
        Some(DbError::LiftNotFound(42))
    ));
    Ok(())
}

#[test]
fn test_step_max_weight() -> Result<()> {
    let (mut service, _dir) = memory_service();
    let id = service.add_lift("Press", "100")?.id.unwrap();

    assert_eq!(service.step_max_weight(id, Step::Small, Direction::Up)?, 105.0);
    assert_eq!(service.step_max_weight(id, Step::Large, Direction::Down)?, 95.0);
    assert_eq!(service.get_lift(id)?.lift.max_weight, 95.0);
    Ok(())
}

#[test]
fn test_step_in_kilograms() -> Result<()> {
    let (mut service, _dir) = memory_service();
    service.set_units(Units::Metric)?;
    let id = service.add_lift("Squat", "100")?.id.unwrap();

    let new_max = service.step_max_weight(id, Step::Small, Direction::Up)?;
    assert!((lift_tracker_lib::units::to_kg(new_max) - 102.5).abs() < 1e-9);
    Ok(())
}

#[test]
fn test_step_down_to_zero_is_rejected() -> Result<()> {
    let (mut service, _dir) = memory_service();
    let id = service.add_lift("Curl", "3")?.id.unwrap();

    let err = service
        .step_max_weight(id, Step::Small, Direction::Down)
        .unwrap_err();
    assert_eq!(
        err.downcast_ref::<WeightError>(),
        Some(&WeightError::NotPositive(0.0))
    );
    assert_eq!(service.get_lift(id)?.lift.max_weight, 3.0);
    Ok(())
}

#[test]
fn test_delete_lift() -> Result<()> {
    let (mut service, _dir) = sqlite_service()?;
    let id = service.add_lift("Squat", "300")?.id.unwrap();
    service.add_lift("Deadlift", "400")?;

    service.delete_lift(id)?;
    let lifts = service.list_lifts()?;
    assert_eq!(lifts.len(), 1);
    assert_eq!(lifts[0].lift.name, "Deadlift");

    let err = service.delete_lift(id).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<DbError>(),
        Some(DbError::LiftNotFound(_))
    ));
    Ok(())
}

#[test]
fn test_store_contract_reports_missing_ids() -> Result<()> {
    let mut stores: Vec<Box<dyn LiftStore>> = vec![
        Box::new(SqliteStore::open_in_memory()?),
        Box::new(MemoryStore::new()),
    ];
    for store in &mut stores {
        let id = store.create("Row", 150.0, date(2024, 1, 1))?;
        assert!(store.update_max_weight(id, 160.0)?);
        assert!(!store.update_max_weight(id + 100, 160.0)?);
        assert_eq!(store.find_by_id(id)?.map(|l| l.lift.max_weight), Some(160.0));
        assert!(store.delete_by_id(id)?);
        assert!(!store.delete_by_id(id)?);
        assert!(store.find_by_id(id)?.is_none());
    }
    Ok(())
}

#[test]
fn test_prescription_for_stored_lift() -> Result<()> {
    let (mut service, _dir) = sqlite_service()?;
    let id = service.add_lift("Squat", "300")?.id.unwrap();

    let (tracked, plan) = service.prescription_for(id, Some("5/3/1"))?;
    assert_eq!(tracked.lift.name, "Squat");
    assert_eq!(plan.working_sets.weights(), [225.0, 255.0, 285.0]);
    assert!(plan.warm_up.is_some());

    let (_, deload) = service.prescription_for(id, Some("Deload"))?;
    assert!(deload.warm_up.is_none());
    assert_eq!(deload.working_sets.weights(), [120.0, 150.0, 180.0]);

    let (_, unknown) = service.prescription_for(id, Some("foo"))?;
    assert_eq!(unknown.cycle, TrainingCycle::FiveThreeOne);
    Ok(())
}

#[test]
fn test_prescription_follows_edits() -> Result<()> {
    let (mut service, _dir) = memory_service();
    let id = service.add_lift("Bench Press", "200")?.id.unwrap();
    service.edit_max_weight(id, "300")?;

    let (_, plan) = service.prescription_for(id, Some("5/3/1"))?;
    assert_eq!(plan.working_sets.weights(), [225.0, 255.0, 285.0]);
    Ok(())
}

#[test]
fn test_default_cycle_from_config() -> Result<()> {
    let (mut service, _dir) = memory_service();
    let id = service.add_lift("Squat", "300")?.id.unwrap();

    let (_, plan) = service.prescription_for(id, None)?;
    assert_eq!(plan.cycle, TrainingCycle::FiveThreeOne);

    assert_eq!(service.set_default_cycle("deload")?, TrainingCycle::Deload);
    let (_, plan) = service.prescription_for(id, None)?;
    assert_eq!(plan.cycle, TrainingCycle::Deload);

    assert!(matches!(
        service.set_default_cycle("4/4/4"),
        Err(ConfigError::InvalidCycle(_))
    ));
    assert_eq!(service.config.default_cycle, "Deload");
    Ok(())
}

#[test]
fn test_prescription_for_missing_lift() {
    let (service, _dir) = memory_service();
    let err = service.prescription_for(7, None).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<DbError>(),
        Some(DbError::LiftNotFound(7))
    ));
}

#[test]
fn test_sqlite_store_persists_across_connections() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let db_path = dir.path().join("lifts.sqlite");

    let id = {
        let mut store = SqliteStore::open(&db_path)?;
        store.create("Squat", 315.0, date(2024, 5, 5))?
    };

    let store = SqliteStore::open(&db_path)?;
    let lifts = store.list_all()?;
    assert_eq!(lifts.len(), 1);
    assert_eq!(lifts[0].id, Some(id));
    assert_eq!(lifts[0].date, date(2024, 5, 5));
    Ok(())
}

#[test]
fn test_config_round_trip() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("nested").join("config.toml");

    // Missing file is created with defaults.
    let config = lift_tracker_lib::load_config_util(&path)?;
    assert_eq!(config, Config::default());
    assert_eq!(config.units, Units::Imperial);
    assert!(path.exists());

    let custom = Config {
        units: Units::Metric,
        default_cycle: "3/3/3".to_string(),
        ..Default::default()
    };
    lift_tracker_lib::save_config_util(&path, &custom)?;
    assert_eq!(lift_tracker_lib::load_config_util(&path)?, custom);

    // Partial files fall back to defaults for missing fields.
    std::fs::write(&path, "units = \"metric\"\n")?;
    let partial = lift_tracker_lib::load_config_util(&path)?;
    assert_eq!(partial.units, Units::Metric);
    assert_eq!(partial.default_cycle, "5/3/1");
    Ok(())
}

#[test]
fn test_parse_color() {
    assert!(lift_tracker_lib::parse_color("darkblue").is_ok());
    assert!(matches!(
        lift_tracker_lib::parse_color("chartreuse"),
        Err(ConfigError::InvalidColor(_))
    ));
}
