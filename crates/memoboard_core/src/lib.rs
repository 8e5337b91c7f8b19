//! Core domain logic for the memoboard household dashboard.
//! This crate is the single source of truth for persistence and
//! notification-scheduling invariants; presentation lives outside.

pub mod db;
pub mod logging;
pub mod model;
pub mod notify;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::block::{
    validate_items, BlockColor, BlockItem, BlockType, CustomBlock, CustomBlockPatch,
    NewCustomBlock, ValidationError,
};
pub use model::laundry::{LaundryLoad, LaundryLoadPatch, LoadStatus, LoadType, NewLaundryLoad};
pub use model::note::{NewNote, Note, NoteColor, NotePatch};
pub use model::reminder::{NewReminder, Priority, Reminder, ReminderPatch};
pub use model::spending::{NewSpending, Spending, SpendingCategory, SpendingPatch};
pub use notify::clock::{Clock, ManualClock, SystemClock};
pub use notify::notifier::{LogNotifier, Notification, Notifier, Permission};
pub use notify::scheduler::{NotifyScheduler, SchedulerConfig};
pub use notify::worker::NotifyWorker;
pub use repo::entity_repo::{
    CustomBlockRepository, Entity, EntityRepository, LaundryRepository, NoteRepository,
    ReminderRepository, SpendingRepository,
};
pub use repo::legacy_import::{run_legacy_import, ImportSummary};
pub use repo::record_store::{
    Collection, RecordData, RecordStore, RepoError, RepoResult, SqliteRecordStore,
};
pub use repo::settings_repo::SettingsRepository;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
