//! Timed reminder domain model.
//!
//! # Invariants
//! - `due_date` is wall-clock local time; unparseable persisted values
//!   decode to `None` and never fire notifications.
//! - Completed reminders are excluded from every urgency computation.

use crate::model::lenient::{de_created_date, de_opt_datetime, ser_opt_datetime, unix_epoch};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reminder priority label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// One persisted reminder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: String,
    #[serde(default = "unix_epoch", deserialize_with = "de_created_date")]
    pub created_date: DateTime<Utc>,
    pub title: String,
    #[serde(
        default,
        deserialize_with = "de_opt_datetime",
        serialize_with = "ser_opt_datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub due_date: Option<NaiveDateTime>,
    pub priority: Priority,
    #[serde(default)]
    pub completed: bool,
}

impl Reminder {
    /// Returns whether this reminder still participates in urgency checks.
    pub fn is_pending(&self) -> bool {
        !self.completed
    }
}

/// Creation fields for one reminder.
#[derive(Debug, Clone, Serialize)]
pub struct NewReminder {
    pub title: String,
    #[serde(serialize_with = "ser_opt_datetime", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDateTime>,
    pub priority: Priority,
    pub completed: bool,
}

/// Partial update for one reminder. Absent fields are preserved.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReminderPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(serialize_with = "ser_opt_datetime", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}
