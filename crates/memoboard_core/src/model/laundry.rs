//! Laundry load domain model.
//!
//! # Invariants
//! - Status transitions are free-form; any status may follow any other.
//! - A load counts as pending for insight/digest purposes until its
//!   status reaches `complete`.

use crate::model::lenient::{de_created_date, de_opt_date, unix_epoch};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Fabric category of one laundry load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadType {
    Whites,
    Colors,
    Darks,
    Delicates,
    Bedding,
    Towels,
}

/// Progress state of one laundry load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadStatus {
    Pending,
    Washing,
    Drying,
    Complete,
}

/// One persisted laundry load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaundryLoad {
    pub id: String,
    #[serde(default = "unix_epoch", deserialize_with = "de_created_date")]
    pub created_date: DateTime<Utc>,
    pub load_type: LoadType,
    pub status: LoadStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "de_opt_date", skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<NaiveDate>,
}

impl LaundryLoad {
    /// Returns whether this load still needs attention.
    pub fn is_pending(&self) -> bool {
        self.status != LoadStatus::Complete
    }
}

/// Creation fields for one laundry load.
#[derive(Debug, Clone, Serialize)]
pub struct NewLaundryLoad {
    pub load_type: LoadType,
    pub status: LoadStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<NaiveDate>,
}

/// Partial update for one laundry load. Absent fields are preserved.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LaundryLoadPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_type: Option<LoadType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<LoadStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<NaiveDate>,
}
