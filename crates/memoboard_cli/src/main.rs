//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `memoboard_core` wiring
//!   without any UI attached: seed an in-memory store, print the insight
//!   aggregates, run one scheduler poll.

use chrono::Local;
use memoboard_core::db::open_db_in_memory;
use memoboard_core::service::insights;
use memoboard_core::{
    LaundryRepository, LoadStatus, LoadType, LogNotifier, NewLaundryLoad, NewReminder,
    NewSpending, NotifyScheduler, Priority, RepoError, ReminderRepository, SpendingCategory,
    SpendingRepository, SqliteRecordStore, SystemClock,
};

fn main() {
    println!("memoboard_core version={}", memoboard_core::core_version());

    let store = match open_store() {
        Ok(store) => store,
        Err(message) => {
            eprintln!("store bootstrap failed: {message}");
            std::process::exit(1);
        }
    };

    if let Err(err) = seed(&store) {
        eprintln!("seed failed: {err}");
        std::process::exit(1);
    }

    if let Err(err) = print_insights(&store) {
        eprintln!("insights failed: {err}");
        std::process::exit(1);
    }

    // One live tick against the seeded store, emitting through logging.
    let mut scheduler = NotifyScheduler::new(store, LogNotifier, SystemClock);
    scheduler.start();
    scheduler.poll();
    println!("scheduler poll=ok");
}

fn open_store() -> Result<SqliteRecordStore, String> {
    let conn = open_db_in_memory().map_err(|err| err.to_string())?;
    SqliteRecordStore::try_new(conn).map_err(|err| err.to_string())
}

fn seed(store: &SqliteRecordStore) -> Result<(), RepoError> {
    LaundryRepository::new(store).create(&NewLaundryLoad {
        load_type: LoadType::Darks,
        status: LoadStatus::Washing,
        notes: Some("hoodie inside out".to_string()),
        scheduled_date: None,
    })?;

    SpendingRepository::new(store).create(&NewSpending {
        title: "weekly groceries".to_string(),
        amount: 54.20,
        category: SpendingCategory::Groceries,
        date: Some(Local::now().date_naive()),
    })?;

    ReminderRepository::new(store).create(&NewReminder {
        title: "water the plants".to_string(),
        due_date: Some(Local::now().naive_local()),
        priority: Priority::High,
        completed: false,
    })?;

    Ok(())
}

fn print_insights(store: &SqliteRecordStore) -> Result<(), RepoError> {
    let now = Local::now();
    let loads = LaundryRepository::new(store).list()?;
    let spendings = SpendingRepository::new(store).list()?;
    let reminders = ReminderRepository::new(store).list()?;

    println!(
        "pending_laundry={}",
        insights::pending_laundry_count(&loads)
    );
    println!(
        "weekly_spending={:.2}",
        insights::weekly_spending_total(&spendings, now)
    );
    println!(
        "pending_reminders={}",
        insights::pending_reminder_count(&reminders)
    );
    for entry in insights::category_totals(&spendings) {
        println!(
            "category={} total={:.2}",
            entry.category.as_str(),
            entry.total
        );
    }
    Ok(())
}
