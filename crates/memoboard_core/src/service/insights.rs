//! Insight aggregation over repository snapshots.
//!
//! # Responsibility
//! - Derive the dashboard's headline numbers (spending windows, pending
//!   counts, category totals) and listing orders from plain snapshots.
//!
//! # Invariants
//! - Every function is pure; callers pass `now` explicitly.
//! - Malformed numeric input was already coerced to zero by the lenient
//!   codecs, so totals never fail.

use crate::model::laundry::LaundryLoad;
use crate::model::note::Note;
use crate::model::reminder::Reminder;
use crate::model::spending::{Spending, SpendingCategory};
use chrono::{DateTime, Datelike, Duration, Local};
use std::cmp::Ordering;

/// Sum of amounts whose effective date falls in the trailing 7 days.
///
/// There is no upper bound: a future-dated expense counts into the
/// window as well.
pub fn weekly_spending_total(spendings: &[Spending], now: DateTime<Local>) -> f64 {
    let cutoff = (now - Duration::days(7)).naive_local();
    spendings
        .iter()
        .filter(|spending| spending.effective_datetime() >= cutoff)
        .map(|spending| spending.amount)
        .sum()
}

/// Sum of amounts effective on today's calendar date.
pub fn today_spending_total(spendings: &[Spending], now: DateTime<Local>) -> f64 {
    let today = now.date_naive();
    spendings
        .iter()
        .filter(|spending| spending.effective_datetime().date() == today)
        .map(|spending| spending.amount)
        .sum()
}

/// Sum of amounts effective in the current calendar month.
pub fn month_spending_total(spendings: &[Spending], now: DateTime<Local>) -> f64 {
    let today = now.date_naive();
    spendings
        .iter()
        .filter(|spending| {
            let date = spending.effective_datetime().date();
            date.year() == today.year() && date.month() == today.month()
        })
        .map(|spending| spending.amount)
        .sum()
}

/// Count of laundry loads whose status has not reached `complete`.
pub fn pending_laundry_count(loads: &[LaundryLoad]) -> usize {
    loads.iter().filter(|load| load.is_pending()).count()
}

/// Count of reminders not yet completed.
pub fn pending_reminder_count(reminders: &[Reminder]) -> usize {
    reminders.iter().filter(|reminder| reminder.is_pending()).count()
}

/// One category's aggregated spending.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category: SpendingCategory,
    pub total: f64,
}

/// Groups spending by category, summed and sorted descending by total.
///
/// Only categories that appear in the snapshot are returned; the sort is
/// stable, so equal totals keep the closed category order.
pub fn category_totals(spendings: &[Spending]) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = SpendingCategory::ALL
        .into_iter()
        .filter(|category| spendings.iter().any(|spending| spending.category == *category))
        .map(|category| CategoryTotal {
            category,
            total: spendings
                .iter()
                .filter(|spending| spending.category == category)
                .map(|spending| spending.amount)
                .sum(),
        })
        .collect();

    totals.sort_by(|a, b| b.total.partial_cmp(&a.total).unwrap_or(Ordering::Equal));
    totals
}

/// Reorders a note snapshot so pinned notes come first.
///
/// Relative order within each group is preserved.
pub fn pinned_first(notes: &[Note]) -> Vec<Note> {
    let mut ordered: Vec<Note> = notes.iter().filter(|note| note.pinned).cloned().collect();
    ordered.extend(notes.iter().filter(|note| !note.pinned).cloned());
    ordered
}

/// Urgency buckets for reminder display.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReminderBuckets {
    /// Pending, due in the past and not today.
    pub overdue: Vec<Reminder>,
    /// Pending, due today, in the future, or without a due date.
    pub upcoming: Vec<Reminder>,
    pub completed: Vec<Reminder>,
}

/// Splits a reminder snapshot into urgency buckets.
pub fn partition_reminders(reminders: &[Reminder], now: DateTime<Local>) -> ReminderBuckets {
    let now_naive = now.naive_local();
    let today = now.date_naive();
    let mut buckets = ReminderBuckets::default();

    for reminder in reminders {
        if reminder.completed {
            buckets.completed.push(reminder.clone());
            continue;
        }
        match reminder.due_date {
            Some(due) if due < now_naive && due.date() != today => {
                buckets.overdue.push(reminder.clone());
            }
            _ => buckets.upcoming.push(reminder.clone()),
        }
    }

    buckets
}
