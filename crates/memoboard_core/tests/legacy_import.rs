use memoboard_core::db::open_db;
use memoboard_core::{
    run_legacy_import, Collection, LaundryRepository, RecordStore, ReminderRepository,
    SqliteRecordStore,
};
use serde_json::json;
use std::path::{Path, PathBuf};

fn file_store(dir: &Path) -> SqliteRecordStore {
    SqliteRecordStore::try_new(open_db(dir.join("memoboard.db")).unwrap()).unwrap()
}

fn write_legacy(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("legacy_export.json");
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn import_copies_legacy_arrays_once() {
    let dir = tempfile::tempdir().unwrap();
    let store = file_store(dir.path());
    let legacy = write_legacy(
        dir.path(),
        &json!({
            "laundryLoads": [
                {"id": "l1", "created_date": "2025-12-01T08:00:00.000Z", "load_type": "whites", "status": "pending"}
            ],
            "reminders": [
                {"id": "r1", "title": "dentist", "priority": "medium", "completed": false}
            ]
        })
        .to_string(),
    );

    let summary = run_legacy_import(&store, &legacy);
    assert!(summary.ran);
    assert_eq!(summary.imported, 2);
    assert_eq!(summary.failed, 0);

    assert_eq!(LaundryRepository::new(&store).list().unwrap().len(), 1);
    assert_eq!(ReminderRepository::new(&store).list().unwrap().len(), 1);

    // The marker gates a second run even if the export grows afterwards.
    write_legacy(
        dir.path(),
        &json!({
            "reminders": [
                {"id": "r2", "title": "late addition", "priority": "low", "completed": false}
            ]
        })
        .to_string(),
    );
    let second = run_legacy_import(&store, &legacy);
    assert!(!second.ran);
    assert_eq!(ReminderRepository::new(&store).list().unwrap().len(), 1);
}

#[test]
fn missing_export_still_sets_the_marker() {
    let dir = tempfile::tempdir().unwrap();
    let store = file_store(dir.path());
    let legacy = dir.path().join("never_written.json");

    let summary = run_legacy_import(&store, &legacy);
    assert!(summary.ran);
    assert_eq!(summary.imported, 0);

    let second = run_legacy_import(&store, &legacy);
    assert!(!second.ran);
}

#[test]
fn unparseable_export_is_retried_on_the_next_run() {
    let dir = tempfile::tempdir().unwrap();
    let store = file_store(dir.path());
    let legacy = write_legacy(dir.path(), "not json at all {");

    let summary = run_legacy_import(&store, &legacy);
    assert!(!summary.ran);

    // The marker was not set, so a repaired export imports normally.
    write_legacy(
        dir.path(),
        &json!({
            "notes": [
                {"id": "n1", "title": "door code", "content": "4711", "color": "yellow", "pinned": true}
            ]
        })
        .to_string(),
    );
    let retried = run_legacy_import(&store, &legacy);
    assert!(retried.ran);
    assert_eq!(retried.imported, 1);
    assert_eq!(store.list_all(Collection::Notes).unwrap().len(), 1);
}

#[test]
fn bad_items_are_skipped_without_aborting_the_import() {
    let dir = tempfile::tempdir().unwrap();
    let store = file_store(dir.path());
    let legacy = write_legacy(
        dir.path(),
        &json!({
            "spendings": [
                {"id": "s1", "title": "rent", "amount": 900, "category": "utilities"},
                {"title": "no id, cannot key this record"},
                "not even an object"
            ]
        })
        .to_string(),
    );

    let summary = run_legacy_import(&store, &legacy);
    assert!(summary.ran);
    assert_eq!(summary.imported, 1);
    assert_eq!(summary.failed, 2);
    assert_eq!(store.list_all(Collection::Spendings).unwrap().len(), 1);
}
