use chrono::{DateTime, NaiveDate, Utc};
use memoboard_core::db::open_db_in_memory;
use memoboard_core::{
    BlockColor, BlockItem, BlockType, Collection, CustomBlockPatch, CustomBlockRepository,
    LaundryRepository, LoadStatus, LoadType, NewCustomBlock, NewLaundryLoad, NewNote,
    NewReminder, NewSpending, NoteColor, NoteRepository, NotePatch, Priority,
    ReminderRepository, RepoError, SpendingCategory, SpendingPatch, SpendingRepository,
    SqliteRecordStore, LaundryLoadPatch,
};
use serde_json::json;

fn store() -> SqliteRecordStore {
    SqliteRecordStore::try_new(open_db_in_memory().unwrap()).unwrap()
}

#[test]
fn reminder_create_and_list_roundtrip() {
    let store = store();
    let repo = ReminderRepository::new(&store);

    let due = NaiveDate::from_ymd_opt(2026, 3, 1)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap();
    let created = repo
        .create(&NewReminder {
            title: "renew insurance".to_string(),
            due_date: Some(due),
            priority: Priority::High,
            completed: false,
        })
        .unwrap();

    assert!(!created.id.is_empty());
    assert_eq!(created.due_date, Some(due));
    assert!(!created.completed);

    let listed = repo.list().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0], created);
}

#[test]
fn spending_patch_merges_single_field() {
    let store = store();
    let repo = SpendingRepository::new(&store);

    let created = repo
        .create(&NewSpending {
            title: "cinema".to_string(),
            amount: 24.0,
            category: SpendingCategory::Entertainment,
            date: None,
        })
        .unwrap();

    let updated = repo
        .update(
            &created.id,
            &SpendingPatch {
                amount: Some(30.0),
                ..SpendingPatch::default()
            },
        )
        .unwrap();

    assert_eq!(updated.amount, 30.0);
    assert_eq!(updated.title, "cinema");
    assert_eq!(updated.category, SpendingCategory::Entertainment);
    assert_eq!(updated.created_date, created.created_date);
}

#[test]
fn note_pin_toggle_via_patch() {
    let store = store();
    let repo = NoteRepository::new(&store);

    let created = repo
        .create(&NewNote {
            title: "wifi password".to_string(),
            content: "under the router".to_string(),
            color: NoteColor::Blue,
            pinned: false,
        })
        .unwrap();

    let updated = repo
        .update(
            &created.id,
            &NotePatch {
                pinned: Some(true),
                ..NotePatch::default()
            },
        )
        .unwrap();

    assert!(updated.pinned);
    assert_eq!(updated.content, "under the router");
}

#[test]
fn laundry_status_transitions_are_free_form() {
    let store = store();
    let repo = LaundryRepository::new(&store);

    let created = repo
        .create(&NewLaundryLoad {
            load_type: LoadType::Towels,
            status: LoadStatus::Complete,
            notes: None,
            scheduled_date: None,
        })
        .unwrap();

    // Any status may follow any other, including going backwards.
    let updated = repo
        .update(
            &created.id,
            &LaundryLoadPatch {
                status: Some(LoadStatus::Pending),
                ..LaundryLoadPatch::default()
            },
        )
        .unwrap();

    assert_eq!(updated.status, LoadStatus::Pending);
    assert!(updated.is_pending());
}

#[test]
fn delete_then_update_fails_not_found() {
    let store = store();
    let repo = ReminderRepository::new(&store);

    let created = repo
        .create(&NewReminder {
            title: "one off".to_string(),
            due_date: None,
            priority: Priority::Low,
            completed: false,
        })
        .unwrap();

    repo.delete(&created.id).unwrap();
    repo.delete(&created.id).unwrap();

    let err = repo
        .update(
            &created.id,
            &memoboard_core::ReminderPatch {
                completed: Some(true),
                ..Default::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound { .. }));
}

#[test]
fn custom_block_items_replace_as_a_whole_sequence() {
    let store = store();
    let repo = CustomBlockRepository::new(&store);

    let created = repo
        .create(&NewCustomBlock {
            name: "camping prep".to_string(),
            block_type: BlockType::Checklist,
            color: BlockColor::Emerald,
            icon: "ListChecks".to_string(),
            items: vec![BlockItem::checklist("1", "tent")],
        })
        .unwrap();
    assert_eq!(created.items.len(), 1);

    let replacement = vec![
        BlockItem::checklist("1", "tent"),
        BlockItem::checklist("2", "sleeping bags"),
    ];
    let updated = repo
        .update(
            &created.id,
            &CustomBlockPatch {
                items: Some(replacement.clone()),
                ..CustomBlockPatch::default()
            },
        )
        .unwrap();

    assert_eq!(updated.items, replacement);
    assert_eq!(updated.block_type, BlockType::Checklist);
    assert_eq!(updated.checked_count(), 0);
}

#[test]
fn custom_block_items_are_validated_against_block_type() {
    let store = store();
    let repo = CustomBlockRepository::new(&store);

    let err = repo
        .create(&NewCustomBlock {
            name: "water intake".to_string(),
            block_type: BlockType::Counter,
            color: BlockColor::Indigo,
            icon: "Hash".to_string(),
            items: vec![BlockItem::text_entry("1", "not a number")],
        })
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));

    let created = repo
        .create(&NewCustomBlock {
            name: "groceries".to_string(),
            block_type: BlockType::Checklist,
            color: BlockColor::Amber,
            icon: "Star".to_string(),
            items: Vec::new(),
        })
        .unwrap();

    let err = repo
        .update(
            &created.id,
            &CustomBlockPatch {
                items: Some(vec![BlockItem::checklist("1", "   ")]),
                ..CustomBlockPatch::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
}

#[test]
fn counter_block_totals_its_item_values() {
    let store = store();
    let repo = CustomBlockRepository::new(&store);

    let created = repo
        .create(&NewCustomBlock {
            name: "pushups".to_string(),
            block_type: BlockType::Counter,
            color: BlockColor::Violet,
            icon: "Hash".to_string(),
            items: vec![BlockItem::counter("1", 20.0), BlockItem::counter("2", 15.0)],
        })
        .unwrap();

    assert_eq!(created.counter_total(), 35.0);
}

#[test]
fn legacy_documents_decode_leniently() {
    let store = store();

    store
        .import_record(
            Collection::Spendings,
            json!({
                "id": "legacy-spend",
                "title": "mystery purchase",
                "amount": "12.5",
                "category": "vintage",
                "date": "not a date"
            })
            .as_object()
            .unwrap(),
        )
        .unwrap();
    store
        .import_record(
            Collection::Spendings,
            json!({
                "id": "broken-spend",
                "title": "unpriced",
                "amount": "lots",
                "category": "dining"
            })
            .as_object()
            .unwrap(),
        )
        .unwrap();

    let listed = SpendingRepository::new(&store).list().unwrap();
    assert_eq!(listed.len(), 2);

    let legacy = listed.iter().find(|s| s.id == "legacy-spend").unwrap();
    assert_eq!(legacy.amount, 12.5);
    assert_eq!(legacy.category, SpendingCategory::Other);
    assert_eq!(legacy.date, None);
    assert_eq!(legacy.created_date, DateTime::<Utc>::UNIX_EPOCH);

    let broken = listed.iter().find(|s| s.id == "broken-spend").unwrap();
    assert_eq!(broken.amount, 0.0);
    assert_eq!(broken.category, SpendingCategory::Dining);
}
