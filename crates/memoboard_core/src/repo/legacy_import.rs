//! One-time import of the legacy flat key-value export.
//!
//! # Responsibility
//! - Copy record arrays found under the legacy collection names into the
//!   keyed store, then persist the marker so this runs at most once.
//!
//! # Invariants
//! - Import failures are logged and swallowed; startup is never blocked.
//! - An unreadable or unparseable export does not set the marker, so the
//!   import retries on the next start.
//! - Per-item failures skip the item and keep going.

use crate::repo::record_store::{Collection, RepoError, RepoResult, SqliteRecordStore};
use crate::repo::settings_repo::SettingsRepository;
use log::{error, info, warn};
use serde_json::Value;
use std::path::Path;

/// Outcome summary of one legacy import attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Whether the import body ran (false when already done or unreadable).
    pub ran: bool,
    pub imported: usize,
    pub failed: usize,
}

/// Copies records out of a legacy flat JSON export, at most once.
///
/// Never returns an error; every failure mode is logged and swallowed.
pub fn run_legacy_import(store: &SqliteRecordStore, legacy_path: &Path) -> ImportSummary {
    let settings = SettingsRepository::new(store);
    match settings.legacy_import_done() {
        Ok(true) => return ImportSummary::default(),
        Ok(false) => {}
        Err(err) => {
            error!("event=legacy_import module=repo status=error stage=marker_read error={err}");
            return ImportSummary::default();
        }
    }

    if !legacy_path.exists() {
        // Nothing to migrate; remember that so the check never repeats.
        mark_done(&settings);
        info!("event=legacy_import module=repo status=ok outcome=no_legacy_store");
        return ImportSummary {
            ran: true,
            ..ImportSummary::default()
        };
    }

    let raw = match std::fs::read_to_string(legacy_path) {
        Ok(raw) => raw,
        Err(err) => {
            error!(
                "event=legacy_import module=repo status=error stage=read path={} error={}",
                legacy_path.display(),
                err
            );
            return ImportSummary::default();
        }
    };

    let root: Value = match serde_json::from_str(&raw) {
        Ok(root) => root,
        Err(err) => {
            error!(
                "event=legacy_import module=repo status=error stage=parse path={} error={}",
                legacy_path.display(),
                err
            );
            return ImportSummary::default();
        }
    };

    let mut summary = ImportSummary {
        ran: true,
        imported: 0,
        failed: 0,
    };
    for collection in Collection::ALL {
        let Some(items) = root.get(collection.legacy_key()).and_then(Value::as_array) else {
            continue;
        };
        for item in items {
            match import_item(store, collection, item) {
                Ok(()) => summary.imported += 1,
                Err(err) => {
                    summary.failed += 1;
                    warn!(
                        "event=legacy_import module=repo status=error stage=item collection={collection} error={err}"
                    );
                }
            }
        }
    }

    mark_done(&settings);
    info!(
        "event=legacy_import module=repo status=ok imported={} failed={}",
        summary.imported, summary.failed
    );
    summary
}

fn import_item(store: &SqliteRecordStore, collection: Collection, item: &Value) -> RepoResult<()> {
    match item {
        Value::Object(doc) => store.import_record(collection, doc),
        _ => Err(RepoError::InvalidData("legacy item is not an object".into())),
    }
}

fn mark_done(settings: &SettingsRepository<'_, SqliteRecordStore>) {
    if let Err(err) = settings.mark_legacy_import_done() {
        error!("event=legacy_import module=repo status=error stage=marker_write error={err}");
    }
}
