//! Sticky note domain model.
//!
//! # Invariants
//! - Pinned notes sort before unpinned notes in any listing helper.
//! - Unknown persisted colors decode to the default palette entry.

use crate::model::lenient::{de_created_date, unix_epoch};
use chrono::{DateTime, Utc};
use serde::de::Deserializer;
use serde::{Deserialize, Serialize};

/// Sticky note palette. Unknown persisted values fold into `Yellow`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteColor {
    #[default]
    Yellow,
    Blue,
    Green,
    Pink,
    Purple,
}

impl NoteColor {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Yellow => "yellow",
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Pink => "pink",
            Self::Purple => "purple",
        }
    }

    /// Maps a persisted color value; anything unknown becomes `Yellow`.
    pub fn parse(value: &str) -> NoteColor {
        match value.trim().to_ascii_lowercase().as_str() {
            "blue" => Self::Blue,
            "green" => Self::Green,
            "pink" => Self::Pink,
            "purple" => Self::Purple,
            _ => Self::Yellow,
        }
    }
}

impl<'de> Deserialize<'de> for NoteColor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(NoteColor::parse(&raw))
    }
}

/// One persisted sticky note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    #[serde(default = "unix_epoch", deserialize_with = "de_created_date")]
    pub created_date: DateTime<Utc>,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub color: NoteColor,
    #[serde(default)]
    pub pinned: bool,
}

/// Creation fields for one sticky note.
#[derive(Debug, Clone, Serialize)]
pub struct NewNote {
    pub title: String,
    pub content: String,
    pub color: NoteColor,
    pub pinned: bool,
}

/// Partial update for one sticky note. Absent fields are preserved.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NotePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<NoteColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pinned: Option<bool>,
}
