//! Custom block domain model.
//!
//! # Responsibility
//! - Define user-created widget blocks (checklist, counter, free text)
//!   and the item sequence each block owns.
//! - Enforce the per-type item shape contract used at the repository
//!   boundary.
//!
//! # Invariants
//! - `block_type` is chosen at creation and never patched; the patch type
//!   deliberately carries no such field.
//! - Items are owned exclusively by their parent block and are replaced
//!   as a whole sequence on update, never merged element-wise.
//! - Checklist and text items require non-empty `text`; counter items
//!   require `value`.

use crate::model::lenient::{de_created_date, de_opt_number, unix_epoch};
use chrono::{DateTime, Utc};
use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Widget shape of a custom block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockType {
    Checklist,
    Counter,
    Text,
}

impl BlockType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Checklist => "checklist",
            Self::Counter => "counter",
            Self::Text => "text",
        }
    }
}

/// Accent color of a custom block. Unknown values fold into `Indigo`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockColor {
    #[default]
    Indigo,
    Rose,
    Emerald,
    Amber,
    Violet,
}

impl BlockColor {
    /// Maps a persisted color value; anything unknown becomes `Indigo`.
    pub fn parse(value: &str) -> BlockColor {
        match value.trim().to_ascii_lowercase().as_str() {
            "rose" => Self::Rose,
            "emerald" => Self::Emerald,
            "amber" => Self::Amber,
            "violet" => Self::Violet,
            _ => Self::Indigo,
        }
    }
}

impl<'de> Deserialize<'de> for BlockColor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(BlockColor::parse(&raw))
    }
}

/// Item shape violation found at the repository boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A checklist/text item is missing its text payload.
    ItemTextRequired {
        block_type: BlockType,
        item_id: String,
    },
    /// A counter item is missing its numeric payload.
    ItemValueRequired { item_id: String },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ItemTextRequired {
                block_type,
                item_id,
            } => write!(
                f,
                "{} item `{item_id}` requires non-empty text",
                block_type.as_str()
            ),
            Self::ItemValueRequired { item_id } => {
                write!(f, "counter item `{item_id}` requires a value")
            }
        }
    }
}

impl Error for ValidationError {}

/// One entry in a custom block's ordered item sequence.
///
/// The wire shape stays flat for legacy-data compatibility; which fields
/// must be populated follows the parent block's `block_type` and is
/// enforced by [`validate_items`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockItem {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
    #[serde(default, deserialize_with = "de_opt_number", skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

impl BlockItem {
    /// Builds an unchecked checklist entry.
    pub fn checklist(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: Some(text.into()),
            checked: Some(false),
            value: None,
        }
    }

    /// Builds a counter entry.
    pub fn counter(id: impl Into<String>, value: f64) -> Self {
        Self {
            id: id.into(),
            text: None,
            checked: None,
            value: Some(value),
        }
    }

    /// Builds a free-text entry.
    pub fn text_entry(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: Some(text.into()),
            checked: None,
            value: None,
        }
    }

    pub fn is_checked(&self) -> bool {
        self.checked.unwrap_or(false)
    }
}

/// Checks an item sequence against the shape rules of one block type.
pub fn validate_items(block_type: BlockType, items: &[BlockItem]) -> Result<(), ValidationError> {
    for item in items {
        match block_type {
            BlockType::Checklist | BlockType::Text => {
                let has_text = item
                    .text
                    .as_deref()
                    .is_some_and(|text| !text.trim().is_empty());
                if !has_text {
                    return Err(ValidationError::ItemTextRequired {
                        block_type,
                        item_id: item.id.clone(),
                    });
                }
            }
            BlockType::Counter => {
                if item.value.is_none() {
                    return Err(ValidationError::ItemValueRequired {
                        item_id: item.id.clone(),
                    });
                }
            }
        }
    }
    Ok(())
}

fn default_icon() -> String {
    "Star".to_string()
}

/// One persisted custom block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomBlock {
    pub id: String,
    #[serde(default = "unix_epoch", deserialize_with = "de_created_date")]
    pub created_date: DateTime<Utc>,
    pub name: String,
    pub block_type: BlockType,
    #[serde(default)]
    pub color: BlockColor,
    #[serde(default = "default_icon")]
    pub icon: String,
    #[serde(default)]
    pub items: Vec<BlockItem>,
}

impl CustomBlock {
    /// Number of checked entries, for checklist progress display.
    pub fn checked_count(&self) -> usize {
        self.items.iter().filter(|item| item.is_checked()).count()
    }

    /// Sum of counter entry values; missing values count as zero.
    pub fn counter_total(&self) -> f64 {
        self.items
            .iter()
            .map(|item| item.value.unwrap_or(0.0))
            .sum()
    }
}

/// Creation fields for one custom block.
#[derive(Debug, Clone, Serialize)]
pub struct NewCustomBlock {
    pub name: String,
    pub block_type: BlockType,
    pub color: BlockColor,
    pub icon: String,
    pub items: Vec<BlockItem>,
}

/// Partial update for one custom block. Absent fields are preserved; a
/// present `items` field replaces the whole sequence.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CustomBlockPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<BlockColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<BlockItem>>,
}
