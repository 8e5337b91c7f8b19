//! Spending record domain model.
//!
//! # Invariants
//! - `amount` is stored as provided; malformed persisted values decode
//!   to zero instead of failing the whole listing.
//! - Unknown categories decode to `Other`; the closed set stays stable.

use crate::model::lenient::{de_amount, de_created_date, de_opt_date, unix_epoch};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::de::Deserializer;
use serde::{Deserialize, Serialize};

/// Expense category. Unknown persisted values fold into `Other`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpendingCategory {
    Groceries,
    Utilities,
    Entertainment,
    Transport,
    Dining,
    Shopping,
    Health,
    #[default]
    Other,
}

impl SpendingCategory {
    pub const ALL: [SpendingCategory; 8] = [
        SpendingCategory::Groceries,
        SpendingCategory::Utilities,
        SpendingCategory::Entertainment,
        SpendingCategory::Transport,
        SpendingCategory::Dining,
        SpendingCategory::Shopping,
        SpendingCategory::Health,
        SpendingCategory::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Groceries => "groceries",
            Self::Utilities => "utilities",
            Self::Entertainment => "entertainment",
            Self::Transport => "transport",
            Self::Dining => "dining",
            Self::Shopping => "shopping",
            Self::Health => "health",
            Self::Other => "other",
        }
    }

    /// Maps a persisted category value; anything unknown becomes `Other`.
    pub fn parse(value: &str) -> SpendingCategory {
        match value.trim().to_ascii_lowercase().as_str() {
            "groceries" => Self::Groceries,
            "utilities" => Self::Utilities,
            "entertainment" => Self::Entertainment,
            "transport" => Self::Transport,
            "dining" => Self::Dining,
            "shopping" => Self::Shopping,
            "health" => Self::Health,
            _ => Self::Other,
        }
    }
}

impl<'de> Deserialize<'de> for SpendingCategory {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(SpendingCategory::parse(&raw))
    }
}

/// One persisted expense entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spending {
    pub id: String,
    #[serde(default = "unix_epoch", deserialize_with = "de_created_date")]
    pub created_date: DateTime<Utc>,
    pub title: String,
    #[serde(default, deserialize_with = "de_amount")]
    pub amount: f64,
    #[serde(default)]
    pub category: SpendingCategory,
    #[serde(default, deserialize_with = "de_opt_date", skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

impl Spending {
    /// Wall-clock moment used for time-window aggregation: the explicit
    /// `date` at midnight, else the creation timestamp in local time.
    pub fn effective_datetime(&self) -> NaiveDateTime {
        match self.date {
            Some(date) => date.and_time(NaiveTime::MIN),
            None => self.created_date.with_timezone(&Local).naive_local(),
        }
    }
}

/// Creation fields for one expense entry.
#[derive(Debug, Clone, Serialize)]
pub struct NewSpending {
    pub title: String,
    pub amount: f64,
    pub category: SpendingCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

/// Partial update for one expense entry. Absent fields are preserved.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SpendingPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<SpendingCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}
