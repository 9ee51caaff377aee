//! Conditions that stop a run before any row is processed.

use std::path::PathBuf;

use bus_model::StoreError;
use thiserror::Error;

/// A fatal condition. Operations turn it into a single error record with an
/// empty subject and return empty data.
#[derive(Debug, Error)]
pub enum FatalError {
    #[error("Need an input file; use --source")]
    MissingSource,
    #[error("Could not open the file: {}", .path.display())]
    UnreadableSource {
        path: PathBuf,
        #[source]
        source: StoreError,
    },
    #[error("Invalid or missing graph UUID. Use --graph")]
    InvalidGraph,
    #[error("No bulk upload sheet for graph {name}")]
    NoSheetProfile { name: String },
    #[error(transparent)]
    Store(#[from] StoreError),
}
