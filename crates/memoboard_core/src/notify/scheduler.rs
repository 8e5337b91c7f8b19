//! Due-date and digest decision logic.
//!
//! # Responsibility
//! - Decide, per tick, which reminders and laundry loads deserve an
//!   alert, and remember what has already been alerted.
//!
//! # Invariants
//! - At most one live-window notification per reminder per scheduler
//!   lifetime (the notified-id set is cleared only by dropping the
//!   scheduler).
//! - The missed backfill runs exactly once per scheduler lifetime, on
//!   the first successful reminder load.
//! - At most one laundry digest per calendar day, across restarts (the
//!   last-notified date is persisted).
//! - A failed read logs and skips the tick; one tick never cancels
//!   subsequent ticks. Ticks take `&mut self`, so a tick cannot overlap
//!   an unfinished one.

use crate::model::reminder::Reminder;
use crate::model::laundry::LaundryLoad;
use crate::notify::clock::Clock;
use crate::notify::notifier::{Notification, Notifier, Permission};
use crate::repo::entity_repo::{LaundryRepository, ReminderRepository};
use crate::repo::record_store::RecordStore;
use crate::repo::settings_repo::SettingsRepository;
use chrono::{DateTime, Duration, Local};
use log::{info, warn};
use std::collections::HashSet;
use std::time::Duration as StdDuration;

/// Timing knobs for the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Reminder re-read cadence; also the worker tick interval.
    pub reminder_poll_interval: StdDuration,
    /// Maximum age of the cached laundry snapshot before a re-read.
    pub laundry_refresh_interval: StdDuration,
    /// How far in the past a missed reminder may be before it counts as
    /// stale and is suppressed.
    pub missed_backfill_window: StdDuration,
    /// Absolute distance from now within which a reminder is live-due.
    pub live_due_window: StdDuration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            reminder_poll_interval: StdDuration::from_secs(30),
            laundry_refresh_interval: StdDuration::from_secs(60 * 60),
            missed_backfill_window: StdDuration::from_secs(24 * 60 * 60),
            live_due_window: StdDuration::from_secs(60),
        }
    }
}

/// Polls reminder/laundry snapshots and emits one-time alerts.
pub struct NotifyScheduler<S: RecordStore, N: Notifier, C: Clock> {
    store: S,
    notifier: N,
    clock: C,
    config: SchedulerConfig,
    notified: HashSet<String>,
    backfill_done: bool,
    laundry: Vec<LaundryLoad>,
    laundry_refreshed_at: Option<DateTime<Local>>,
}

impl<S: RecordStore, N: Notifier, C: Clock> NotifyScheduler<S, N, C> {
    pub fn new(store: S, notifier: N, clock: C) -> Self {
        Self::with_config(store, notifier, clock, SchedulerConfig::default())
    }

    pub fn with_config(store: S, notifier: N, clock: C, config: SchedulerConfig) -> Self {
        Self {
            store,
            notifier,
            clock,
            config,
            notified: HashSet::new(),
            backfill_done: false,
            laundry: Vec::new(),
            laundry_refreshed_at: None,
        }
    }

    pub fn config(&self) -> SchedulerConfig {
        self.config
    }

    /// Requests notification permission. Call once, before the first
    /// poll; the permission request is never retried afterwards.
    pub fn start(&mut self) {
        let permission = self.notifier.request_permission();
        info!("event=notify_start module=notify status=ok permission={permission}");
    }

    /// Runs one scheduler tick.
    ///
    /// Refreshes the laundry snapshot when it is older than the laundry
    /// interval, re-reads reminders, then runs the backfill, live-window
    /// and digest checks while permission is granted. Never panics and
    /// never propagates errors.
    pub fn poll(&mut self) {
        let now = self.clock.now();
        self.refresh_laundry_if_stale(now);

        let reminders = match ReminderRepository::new(&self.store).list() {
            Ok(reminders) => reminders,
            Err(err) => {
                warn!("event=notify_poll module=notify status=error stage=reminders error={err}");
                return;
            }
        };

        if self.notifier.permission() != Permission::Granted {
            return;
        }

        self.backfill_missed(&reminders, now);
        self.check_live_window(&reminders, now);
        self.laundry_digest(now);
    }

    fn refresh_laundry_if_stale(&mut self, now: DateTime<Local>) {
        let interval = chrono_interval(self.config.laundry_refresh_interval);
        let stale = match self.laundry_refreshed_at {
            Some(refreshed_at) => now.signed_duration_since(refreshed_at) >= interval,
            None => true,
        };
        if !stale {
            return;
        }

        match LaundryRepository::new(&self.store).list() {
            Ok(loads) => {
                self.laundry = loads;
                self.laundry_refreshed_at = Some(now);
            }
            // Keep the previous snapshot; the next tick retries.
            Err(err) => {
                warn!("event=notify_poll module=notify status=error stage=laundry error={err}");
            }
        }
    }

    fn backfill_missed(&mut self, reminders: &[Reminder], now: DateTime<Local>) {
        if self.backfill_done {
            return;
        }
        self.backfill_done = true;

        let window = chrono_interval(self.config.missed_backfill_window);
        let now_naive = now.naive_local();
        let missed: Vec<&Reminder> = reminders
            .iter()
            .filter(|reminder| {
                reminder.is_pending()
                    && reminder.due_date.is_some_and(|due| {
                        let gap = now_naive.signed_duration_since(due);
                        gap > Duration::zero() && gap < window
                    })
            })
            .collect();

        if missed.is_empty() {
            return;
        }

        self.notifier.notify(&Notification::new(
            "Missed Reminders",
            format!("You have {} overdue reminders.", missed.len()),
        ));
        for reminder in missed {
            self.notified.insert(reminder.id.clone());
        }
    }

    fn check_live_window(&mut self, reminders: &[Reminder], now: DateTime<Local>) {
        let window = chrono_interval(self.config.live_due_window);
        let now_naive = now.naive_local();

        for reminder in reminders {
            if !reminder.is_pending() {
                continue;
            }
            let Some(due) = reminder.due_date else {
                continue;
            };
            let distance = now_naive.signed_duration_since(due).abs();
            if distance < window && !self.notified.contains(&reminder.id) {
                self.notifier.notify(
                    &Notification::new("Reminder", reminder.title.clone()).require_interaction(),
                );
                self.notified.insert(reminder.id.clone());
            }
        }
    }

    fn laundry_digest(&mut self, now: DateTime<Local>) {
        let today = now.date_naive();
        let last = match SettingsRepository::new(&self.store).last_laundry_notify() {
            Ok(last) => last,
            Err(err) => {
                warn!(
                    "event=notify_poll module=notify status=error stage=digest_read error={err}"
                );
                return;
            }
        };
        if last == Some(today) {
            return;
        }

        let pending = self
            .laundry
            .iter()
            .filter(|load| load.is_pending())
            .count();
        if pending == 0 {
            return;
        }

        self.notifier.notify(&Notification::new(
            "Laundry Reminder",
            format!("You have {pending} pending laundry loads."),
        ));
        if let Err(err) = SettingsRepository::new(&self.store).set_last_laundry_notify(today) {
            warn!("event=notify_poll module=notify status=error stage=digest_write error={err}");
        }
    }
}

fn chrono_interval(value: StdDuration) -> Duration {
    Duration::from_std(value).unwrap_or(Duration::MAX)
}
