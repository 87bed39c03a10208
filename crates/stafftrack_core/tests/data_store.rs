use chrono::NaiveDate;
use serde_json::json;
use stafftrack_core::db::open_db;
use stafftrack_core::store::seed::seed_document;
use stafftrack_core::{
    AppData, BlobStore, DataStore, EventLog, FileBlobStore, LogDate, MemoryBlobStore,
    SqliteBlobStore, StaffTrackService, DEFAULT_ACADEMIC_YEAR, STORAGE_KEY,
};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 20).unwrap()
}

#[test]
fn empty_store_returns_seed_and_persists_it() {
    let blobs = MemoryBlobStore::new();
    let store = DataStore::new(&blobs);

    let first = store.load_on(today());
    assert_eq!(first, seed_document(today()));
    assert_eq!(blobs.write_count(), 1);
    assert!(blobs.peek(STORAGE_KEY).is_some());

    let later = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
    let second = store.load_on(later);
    assert_eq!(second, first);
    assert_eq!(blobs.write_count(), 1);
}

#[test]
fn seed_document_has_expected_literals() {
    let seed = seed_document(today());
    let staff: Vec<&str> = seed.staff.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(staff, vec!["Alice Johnson", "Bob Smith", "Charlie Davis"]);

    let types: Vec<(&str, f64)> = seed
        .event_types
        .iter()
        .map(|t| (t.name.as_str(), t.default_value))
        .collect();
    assert_eq!(
        types,
        vec![
            ("Sick Leave", 1.0),
            ("Class Cover", -1.0),
            ("Training Day", 0.0),
            ("Late Arrival", 0.5)
        ]
    );

    assert_eq!(seed.logs.len(), 2);
    assert_eq!(seed.logs[0].notes, "Covered for Dave");
    assert_eq!(seed.logs[0].value, -1.0);
    assert_eq!(seed.logs[0].staff_id, seed.staff[0].id);
    assert_eq!(seed.logs[1].notes, "Flu");
    assert_eq!(seed.logs[1].staff_id, seed.staff[1].id);
    assert!(seed.logs.iter().all(|log| log.date == today()));
    assert!(seed.logs.iter().all(|log| log.academic_year == "2024-25"));
}

#[test]
fn malformed_document_falls_back_to_seed_without_overwriting() {
    let blobs = MemoryBlobStore::with_value(STORAGE_KEY, "{not json");
    let store = DataStore::new(&blobs);

    assert_eq!(store.load_on(today()), seed_document(today()));
    assert_eq!(blobs.peek(STORAGE_KEY).as_deref(), Some("{not json"));
}

#[test]
fn wrongly_typed_document_falls_back_to_seed() {
    let raw = json!({ "staff": [{ "id": 7 }] }).to_string();
    let blobs = MemoryBlobStore::with_value(STORAGE_KEY, raw);
    let store = DataStore::new(&blobs);

    assert_eq!(store.load_on(today()), seed_document(today()));
}

#[test]
fn blank_date_and_null_value_survive_load_and_next_save() {
    let stored = json!({
        "staff": [{ "id": "z1", "name": "Zed Real" }],
        "eventTypes": [],
        "logs": [{
            "id": "l1", "staffId": "z1", "eventTypeId": "gone",
            "date": "", "academicYear": "2023-24", "value": null, "notes": ""
        }]
    });
    let blobs = MemoryBlobStore::with_value(STORAGE_KEY, stored.to_string());
    let mut service = StaffTrackService::open_on(DataStore::new(&blobs), today());

    let names: Vec<&str> = service.data().staff.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Zed Real"]);
    assert_eq!(service.data().logs[0].date, LogDate::Raw(String::new()));
    assert_eq!(service.data().logs[0].value, 0.0);

    service.add_staff("New Hire").unwrap();
    let saved: serde_json::Value =
        serde_json::from_str(&blobs.peek(STORAGE_KEY).unwrap()).unwrap();
    assert_eq!(saved["staff"][0]["name"], "Zed Real");
    assert_eq!(saved["staff"][1]["name"], "New Hire");
    assert_eq!(saved["logs"][0]["date"], "");
    assert_eq!(saved["logs"][0]["value"], 0.0);
}

#[test]
fn read_failure_falls_back_to_seed() {
    let blobs = MemoryBlobStore::new();
    blobs.set_fail_reads(true);
    let store = DataStore::new(&blobs);

    assert_eq!(store.load_on(today()), seed_document(today()));
    assert_eq!(blobs.write_count(), 0);
}

#[test]
fn write_failure_is_reported_but_not_raised() {
    let blobs = MemoryBlobStore::new();
    blobs.set_fail_writes(true);
    let store = DataStore::new(&blobs);

    let data = store.load_on(today());
    assert_eq!(data, seed_document(today()));
    assert!(!store.save(&data));

    blobs.set_fail_writes(false);
    assert!(store.save(&data));
}

#[test]
fn legacy_logs_get_default_year_and_migration_is_idempotent() {
    let legacy = json!({
        "staff": [{ "id": "1", "name": "Alice Johnson" }],
        "eventTypes": [],
        "logs": [
            {
                "id": "101", "staffId": "1", "eventTypeId": "2", "date": "2024-10-01",
                "value": -1, "notes": "Covered"
            },
            {
                "id": "102", "staffId": "1", "eventTypeId": "2", "date": "2023-10-01",
                "academicYear": "2023-24", "value": 1.5, "notes": ""
            }
        ]
    });
    let blobs = MemoryBlobStore::with_value(STORAGE_KEY, legacy.to_string());
    let store = DataStore::new(&blobs);

    let migrated = store.load_on(today());
    assert_eq!(migrated.logs[0].academic_year, DEFAULT_ACADEMIC_YEAR);
    assert_eq!(migrated.logs[1].academic_year, "2023-24");
    assert_eq!(migrated.logs[1].value, 1.5);

    assert!(store.save(&migrated));
    let reloaded = store.load_on(today());
    assert_eq!(reloaded, migrated);
}

#[test]
fn missing_collections_decode_as_empty() {
    let blobs = MemoryBlobStore::with_value(STORAGE_KEY, "{}");
    let store = DataStore::new(&blobs);
    assert_eq!(store.load_on(today()), AppData::default());
}

#[test]
fn save_then_load_round_trips_fractional_values() {
    let blobs = MemoryBlobStore::new();
    let store = DataStore::new(&blobs);
    let mut data = store.load_on(today());
    data.event_types[0].default_value = 0.25;
    data.logs.insert(
        0,
        EventLog {
            id: "x".to_string(),
            staff_id: "3".to_string(),
            event_type_id: "4".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 9, 2).unwrap().into(),
            academic_year: "2024-25".to_string(),
            value: -0.75,
            notes: "Half \"quoted\" note\nwith newline".to_string(),
        },
    );

    assert!(store.save(&data));
    assert_eq!(store.load_on(today()), data);
}

#[test]
fn persisted_shape_uses_camel_case_wire_names() {
    let blobs = MemoryBlobStore::new();
    let store = DataStore::new(&blobs);
    store.load_on(today());

    let raw = blobs.peek(STORAGE_KEY).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["eventTypes"][1]["defaultValue"], -1.0);
    assert_eq!(value["eventTypes"][1]["color"], "#3b82f6");
    assert_eq!(value["logs"][0]["staffId"], "1");
    assert_eq!(value["logs"][0]["eventTypeId"], "2");
    assert_eq!(value["logs"][0]["academicYear"], "2024-25");
    assert_eq!(value["logs"][0]["date"], "2025-01-20");
}

#[test]
fn custom_key_isolates_documents() {
    let blobs = MemoryBlobStore::new();
    let v5 = DataStore::new(&blobs);
    let v6 = DataStore::with_key(&blobs, "stafftrack_data_v6");

    let mut data = v5.load_on(today());
    data.staff.clear();
    assert!(v6.save(&data));

    assert_eq!(v5.load_on(today()).staff.len(), 3);
    assert!(v6.load_on(today()).staff.is_empty());
}

#[test]
fn sqlite_backend_persists_across_connections() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stafftrack.db");

    let conn = open_db(&path).unwrap();
    let mut data = DataStore::new(SqliteBlobStore::new(&conn)).load_on(today());
    data.logs.clear();
    assert!(DataStore::new(SqliteBlobStore::new(&conn)).save(&data));
    drop(conn);

    let conn = open_db(&path).unwrap();
    let reloaded = DataStore::new(SqliteBlobStore::new(&conn)).load_on(today());
    assert_eq!(reloaded, data);
}

#[test]
fn file_backend_persists_document() {
    let dir = tempfile::tempdir().unwrap();
    let blobs = FileBlobStore::new(dir.path());
    let store = DataStore::new(&blobs);

    let data = store.load_on(today());
    assert!(dir.path().join("stafftrack_data_v5.json").exists());
    assert!(blobs.read(STORAGE_KEY).unwrap().is_some());
    assert_eq!(store.load_on(today()), data);
}
