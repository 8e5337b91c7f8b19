//! Named accessors over the scalar settings table.
//!
//! # Invariants
//! - The legacy-import marker is write-once; nothing ever clears it.
//! - The laundry notification date is stored with calendar-day
//!   granularity so the digest throttle survives restarts.

use crate::repo::record_store::{RecordStore, RepoResult};
use chrono::NaiveDate;

pub const SETTING_LEGACY_IMPORT_DONE: &str = "legacy_import_done";
pub const SETTING_LAST_LAUNDRY_NOTIFY: &str = "last_laundry_notify";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Facade over the two scalar settings.
pub struct SettingsRepository<'s, S: RecordStore> {
    store: &'s S,
}

impl<'s, S: RecordStore> SettingsRepository<'s, S> {
    pub fn new(store: &'s S) -> Self {
        Self { store }
    }

    /// Returns whether the one-time legacy import already ran.
    pub fn legacy_import_done(&self) -> RepoResult<bool> {
        Ok(self.store.setting(SETTING_LEGACY_IMPORT_DONE)?.is_some())
    }

    pub fn mark_legacy_import_done(&self) -> RepoResult<()> {
        self.store.set_setting(SETTING_LEGACY_IMPORT_DONE, "true")
    }

    /// Calendar date of the last laundry digest notification, if any.
    ///
    /// An unparseable stored value reads as `None`, which re-arms the
    /// digest rather than wedging it.
    pub fn last_laundry_notify(&self) -> RepoResult<Option<NaiveDate>> {
        Ok(self
            .store
            .setting(SETTING_LAST_LAUNDRY_NOTIFY)?
            .and_then(|raw| NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()))
    }

    pub fn set_last_laundry_notify(&self, date: NaiveDate) -> RepoResult<()> {
        self.store.set_setting(
            SETTING_LAST_LAUNDRY_NOTIFY,
            &date.format(DATE_FORMAT).to_string(),
        )
    }
}
