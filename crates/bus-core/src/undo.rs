//! Undo of an import: deletes every resource a document names.

use bus_model::{BusinessDataDocument, ResourceStore, StoreError};
use serde::Serialize;
use tracing::{debug, info};

/// Serialized as `[processed, resources_deleted, tiles_deleted]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(into = "[u64; 3]")]
pub struct UndoReport {
    /// Resources named by the document.
    pub processed: u64,
    /// Resources that existed and were deleted.
    pub resources_deleted: u64,
    /// Tiles removed along with them.
    pub tiles_deleted: u64,
}

impl From<UndoReport> for [u64; 3] {
    fn from(report: UndoReport) -> Self {
        [
            report.processed,
            report.resources_deleted,
            report.tiles_deleted,
        ]
    }
}

/// Deletes the resources of `document`. Ids missing from the store are
/// skipped without a delete call.
pub fn undo_document(
    document: &BusinessDataDocument,
    store: &mut dyn ResourceStore,
) -> Result<UndoReport, StoreError> {
    let ids: Vec<&str> = document.resources().iter().map(|r| r.id()).collect();
    if !ids.is_empty() {
        info!(resources = ids.len(), "attempting to delete resources");
    }
    let mut report = UndoReport::default();
    for id in &ids {
        if !store.exists(id)? {
            debug!(resource = %id, "not in store");
            continue;
        }
        let deleted = store.delete(id)?;
        if deleted.deleted > 0 {
            report.processed += 1;
            report.resources_deleted += deleted.resources();
            report.tiles_deleted += deleted.tiles();
        }
    }
    if !ids.is_empty() {
        info!(
            processed = report.processed,
            resources_deleted = report.resources_deleted,
            tiles_deleted = report.tiles_deleted,
            not_found = ids.len() as u64 - report.processed,
            "undo complete"
        );
    }
    Ok(report)
}
