//! End-to-end tests of the stores against real backing files

use std::path::PathBuf;

use rota_board::backup;
use rota_board::settings::ViewSettingsStore;
use rota_board::{DayPatch, DayType, ScheduleStore};

/// A backing-file path that is unique to one test, so tests don't trip on each other
fn test_file(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("rota-board-test-{}-{}.json", name, std::process::id()));
    let _ = std::fs::remove_file(&path);
    path
}

fn date(s: &str) -> chrono::NaiveDate {
    s.parse().unwrap()
}

#[test]
fn schedule_store_round_trips_through_its_file() {
    let _ = env_logger::builder().is_test(true).try_init();
    let path = test_file("schedules-roundtrip");

    let mut store = ScheduleStore::new(&path);
    let schedule = store.add_schedule("night shift", 6, Some(6), Some(date("2024-01-01")));
    store.apply_cycle(schedule.id(), date("2024-01-01"), 2, 2);
    store.update_day(date("2024-01-03"), Some(DayPatch::note("swap with Omar")));

    let retrieved = ScheduleStore::from_file(&path).unwrap();
    assert_eq!(store, retrieved);

    let reloaded = retrieved.active_schedule().unwrap();
    assert_eq!(reloaded.name(), "night shift");
    assert_eq!(reloaded.days()[&date("2024-01-01")].day_type(), DayType::Work);
    assert_eq!(reloaded.days()[&date("2024-01-03")].day_type(), DayType::Holiday);
    assert_eq!(reloaded.days()[&date("2024-01-03")].note(), Some("swap with Omar"));

    let _ = std::fs::remove_file(&path);
}

#[test]
fn corrupt_schedule_file_opens_as_empty() {
    let _ = env_logger::builder().is_test(true).try_init();
    let path = test_file("schedules-corrupt");
    std::fs::write(&path, "{ this is not json").unwrap();

    // The strict constructor reports the problem...
    assert!(ScheduleStore::from_file(&path).is_err());
    // ...the regular startup path shrugs and starts fresh
    let store = ScheduleStore::open(&path);
    assert!(store.schedules().is_empty());
    assert_eq!(store.active_schedule_id(), None);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn stale_active_pointer_is_repaired_on_load() {
    let _ = env_logger::builder().is_test(true).try_init();
    let path = test_file("schedules-stale-pointer");

    // A persisted blob whose active pointer refers to a schedule that is gone
    std::fs::write(&path, serde_json::json!({
        "schedules": [{
            "id": "still-here",
            "name": "kept",
            "startDayOfWeek": 0,
            "days": {},
            "monthsToShow": 12
        }],
        "activeScheduleId": "deleted-long-ago"
    }).to_string()).unwrap();

    let store = ScheduleStore::open(&path);
    assert_eq!(store.active_schedule().unwrap().name(), "kept");

    let _ = std::fs::remove_file(&path);
}

#[test]
fn view_settings_blob_heals_across_reloads() {
    let _ = env_logger::builder().is_test(true).try_init();
    let path = test_file("settings-heal");

    // A blob from an old app version: most fields don't exist yet
    std::fs::write(&path, serde_json::json!({
        "zoomLevel": 1.75,
        "backgroundColors": {"workDay": "#AA0000"}
    }).to_string()).unwrap();

    let mut store = ViewSettingsStore::open(&path);
    let settings = store.current();
    assert_eq!(settings.zoom_level, 1.75);
    assert_eq!(settings.background_colors.work_day, "#AA0000");
    assert_eq!(settings.background_colors.holiday_day, "#FFFFFF");
    assert_eq!(settings.grid_cols, 3);

    // Any mutation persists the complete, current-shaped blob
    store.set_show_ticker(false);

    let reloaded = ViewSettingsStore::from_file(&path).unwrap();
    let settings = reloaded.current();
    assert_eq!(settings.zoom_level, 1.75);
    assert_eq!(settings.show_ticker, false);

    let raw: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert!(raw.get("colorPresets").is_some());
    assert!(raw.get("tickerSpeed").is_some());

    let _ = std::fs::remove_file(&path);
}

#[test]
fn full_backup_round_trips_across_stores() {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut schedules = ScheduleStore::ephemeral();
    let schedule = schedules.add_schedule("rotation", 0, None, Some(date("2024-01-01")));
    schedules.apply_cycle(schedule.id(), date("2024-01-01"), 1, 3);
    let mut settings = ViewSettingsStore::ephemeral();
    settings.set_zoom_level(2.0);

    let raw = serde_json::to_string(&backup::export(&schedules, &settings)).unwrap();

    let mut restored_schedules = ScheduleStore::ephemeral();
    let mut restored_settings = ViewSettingsStore::ephemeral();
    let payload = backup::parse_backup(&raw).unwrap();
    backup::restore(payload, &mut restored_schedules, &mut restored_settings);

    assert_eq!(restored_schedules.schedules(), schedules.schedules());
    assert_eq!(restored_schedules.active_schedule_id(), Some(schedule.id()));
    assert_eq!(restored_settings.current().zoom_level, 2.0);
}
