//! Final report of a run: warn policy, empty-run guard and ordering.

use bus_model::{Diagnostics, ErrorRecord, WarnMode};
use serde::Serialize;

use crate::natural::sort_records;

pub const EMPTY_RUN_MESSAGE: &str = "No valid data found";
pub const EMPTY_RUN_HELP: &str =
    "The validator has been through the file provided and cannot find any valid data.";

/// Errors and warnings after the warn policy has been applied, each sorted
/// naturally by subject.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub errors: Vec<ErrorRecord>,
    pub warnings: Vec<ErrorRecord>,
    pub warn_mode: WarnMode,
}

impl RunReport {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// Records returned by a validation run: errors and any remaining
    /// warnings, merged and sorted by subject.
    pub fn validation_records(&self) -> Vec<ErrorRecord> {
        let mut records: Vec<ErrorRecord> = self
            .errors
            .iter()
            .chain(self.warnings.iter())
            .cloned()
            .collect();
        sort_records(&mut records);
        records
    }
}

/// Applies the empty-run guard and the warn policy.
///
/// A run with no diagnostics and no resources gets a single
/// [`EMPTY_RUN_MESSAGE`] warning before the policy is applied.
pub fn finalize(mut diagnostics: Diagnostics, resource_count: usize, warn_mode: WarnMode) -> RunReport {
    if diagnostics.is_empty() && resource_count == 0 {
        diagnostics.warning("", EMPTY_RUN_MESSAGE, EMPTY_RUN_HELP);
    }
    match warn_mode {
        WarnMode::Strict => diagnostics.promote_warnings(),
        WarnMode::Ignore => diagnostics.clear_warnings(),
        WarnMode::Warn => {}
    }
    let (mut errors, mut warnings) = diagnostics.into_parts();
    sort_records(&mut errors);
    sort_records(&mut warnings);
    RunReport {
        errors,
        warnings,
        warn_mode,
    }
}
