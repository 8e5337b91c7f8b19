use chrono::{Duration, Local, NaiveDateTime};
use memoboard_core::db::{open_db, open_db_in_memory};
use memoboard_core::{
    LaundryRepository, LoadStatus, LoadType, ManualClock, NewLaundryLoad, NewReminder,
    Notification, Notifier, NotifyScheduler, NotifyWorker, Permission, Priority,
    ReminderRepository, SqliteRecordStore, SystemClock,
};
use std::path::Path;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
struct RecordingNotifier {
    permission: Arc<Mutex<Permission>>,
    sent: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    fn with_permission(permission: Permission) -> Self {
        Self {
            permission: Arc::new(Mutex::new(permission)),
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn granted() -> Self {
        Self::with_permission(Permission::Granted)
    }

    fn set_permission(&self, permission: Permission) {
        *self.permission.lock().unwrap() = permission;
    }

    fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn request_permission(&mut self) -> Permission {
        self.permission()
    }

    fn permission(&self) -> Permission {
        *self.permission.lock().unwrap()
    }

    fn notify(&mut self, notification: &Notification) {
        self.sent.lock().unwrap().push(notification.clone());
    }
}

fn memory_store() -> SqliteRecordStore {
    SqliteRecordStore::try_new(open_db_in_memory().unwrap()).unwrap()
}

fn file_store(dir: &Path) -> SqliteRecordStore {
    SqliteRecordStore::try_new(open_db(dir.join("memoboard.db")).unwrap()).unwrap()
}

fn seed_reminder(store: &SqliteRecordStore, title: &str, due: Option<NaiveDateTime>) {
    ReminderRepository::new(store)
        .create(&NewReminder {
            title: title.to_string(),
            due_date: due,
            priority: Priority::High,
            completed: false,
        })
        .unwrap();
}

fn seed_load(store: &SqliteRecordStore, status: LoadStatus) {
    LaundryRepository::new(store)
        .create(&NewLaundryLoad {
            load_type: LoadType::Colors,
            status,
            notes: None,
            scheduled_date: None,
        })
        .unwrap();
}

#[test]
fn live_window_emits_exactly_once_per_reminder() {
    let store = memory_store();
    let now = Local::now();
    seed_reminder(&store, "take out trash", Some(now.naive_local() + Duration::seconds(30)));

    let notifier = RecordingNotifier::granted();
    let clock = ManualClock::new(now);
    let mut scheduler = NotifyScheduler::new(store, notifier.clone(), clock.clone());
    scheduler.start();

    scheduler.poll();
    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].title, "Reminder");
    assert_eq!(sent[0].body, "take out trash");
    assert!(sent[0].require_interaction);

    // Re-polling at the due moment stays silent: already notified.
    clock.advance(Duration::seconds(30));
    scheduler.poll();
    assert_eq!(notifier.sent().len(), 1);
}

#[test]
fn missed_backfill_aggregates_recent_overdue_reminders() {
    let store = memory_store();
    let now = Local::now();
    seed_reminder(&store, "water plants", Some(now.naive_local() - Duration::hours(2)));
    seed_reminder(&store, "call plumber", Some(now.naive_local() - Duration::hours(2)));
    // Stale misses older than a day are suppressed.
    seed_reminder(&store, "ancient", Some(now.naive_local() - Duration::hours(30)));

    let notifier = RecordingNotifier::granted();
    let mut scheduler = NotifyScheduler::new(store, notifier.clone(), ManualClock::new(now));
    scheduler.start();

    scheduler.poll();
    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].title, "Missed Reminders");
    assert_eq!(sent[0].body, "You have 2 overdue reminders.");

    // Backfilled reminders never re-fire through the live window.
    scheduler.poll();
    assert_eq!(notifier.sent().len(), 1);
}

#[test]
fn backfill_runs_only_on_the_first_successful_load() {
    let dir = tempfile::tempdir().unwrap();
    let scheduler_store = file_store(dir.path());
    let seed_store = file_store(dir.path());

    let now = Local::now();
    let notifier = RecordingNotifier::granted();
    let mut scheduler =
        NotifyScheduler::new(scheduler_store, notifier.clone(), ManualClock::new(now));
    scheduler.start();

    scheduler.poll();
    assert_eq!(notifier.sent().len(), 0);

    // A reminder that was already overdue before this poll would have
    // been backfilled; after the first load it is simply stale.
    seed_reminder(&seed_store, "missed while empty", Some(now.naive_local() - Duration::hours(2)));
    scheduler.poll();
    assert_eq!(notifier.sent().len(), 0);
}

#[test]
fn laundry_digest_fires_at_most_once_per_calendar_day() {
    let store = memory_store();
    seed_load(&store, LoadStatus::Pending);
    seed_load(&store, LoadStatus::Washing);
    seed_load(&store, LoadStatus::Complete);

    let notifier = RecordingNotifier::granted();
    let clock = ManualClock::new(Local::now());
    let mut scheduler = NotifyScheduler::new(store, notifier.clone(), clock.clone());
    scheduler.start();

    scheduler.poll();
    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].title, "Laundry Reminder");
    assert_eq!(sent[0].body, "You have 2 pending laundry loads.");

    scheduler.poll();
    assert_eq!(notifier.sent().len(), 1);

    // The next calendar day re-arms the digest.
    clock.advance(Duration::hours(36));
    scheduler.poll();
    assert_eq!(notifier.sent().len(), 2);
}

#[test]
fn laundry_digest_throttle_survives_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let now = Local::now();

    let first_store = file_store(dir.path());
    seed_load(&first_store, LoadStatus::Pending);

    let first_notifier = RecordingNotifier::granted();
    let mut first =
        NotifyScheduler::new(first_store, first_notifier.clone(), ManualClock::new(now));
    first.start();
    first.poll();
    assert_eq!(first_notifier.sent().len(), 1);
    drop(first);

    let second_notifier = RecordingNotifier::granted();
    let mut second = NotifyScheduler::new(
        file_store(dir.path()),
        second_notifier.clone(),
        ManualClock::new(now),
    );
    second.start();
    second.poll();
    assert_eq!(second_notifier.sent().len(), 0);
}

#[test]
fn denied_permission_suppresses_emission_until_granted() {
    let store = memory_store();
    let now = Local::now();
    seed_reminder(&store, "water plants", Some(now.naive_local() - Duration::hours(2)));
    seed_load(&store, LoadStatus::Pending);

    let notifier = RecordingNotifier::with_permission(Permission::Denied);
    let mut scheduler = NotifyScheduler::new(store, notifier.clone(), ManualClock::new(now));
    scheduler.start();

    scheduler.poll();
    assert_eq!(notifier.sent().len(), 0);

    // Polling continues, so a grant later in the session takes effect;
    // the first granted load runs the backfill.
    notifier.set_permission(Permission::Granted);
    scheduler.poll();
    let sent = notifier.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].title, "Missed Reminders");
    assert_eq!(sent[0].body, "You have 1 overdue reminders.");
    assert_eq!(sent[1].title, "Laundry Reminder");
}

#[test]
fn worker_polls_once_on_spawn_and_stops_cleanly() {
    let store = memory_store();
    // Slightly in the future: inside the live window, out of backfill reach.
    seed_reminder(&store, "stretch", Some(Local::now().naive_local() + Duration::seconds(20)));

    let notifier = RecordingNotifier::granted();
    let scheduler = NotifyScheduler::new(store, notifier.clone(), SystemClock);
    let worker = NotifyWorker::spawn(scheduler).unwrap();
    worker.stop();

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].body, "stretch");
}
