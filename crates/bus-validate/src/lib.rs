//! Validation and reporting for bulk upload runs.

mod natural;
mod report;
mod translated;

pub use natural::{natural_cmp, sort_records};
pub use report::{EMPTY_RUN_HELP, EMPTY_RUN_MESSAGE, RunReport, finalize};
pub use translated::check_translated_keys;

use serde::Serialize;

/// Whether a run may emit its document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GatingDecision {
    pub block_output: bool,
    pub blocking_errors: usize,
}

/// Any error left after the warn policy has been applied blocks output.
pub fn gate_output(report: &RunReport) -> GatingDecision {
    GatingDecision {
        block_output: report.has_errors(),
        blocking_errors: report.errors.len(),
    }
}
