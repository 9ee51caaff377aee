//! Error and warning accumulation.
//!
//! Every stage takes a `&mut Diagnostics` and appends to it; nothing in the
//! pipeline aborts on a per-field failure.

use serde::{Deserialize, Serialize};

/// A single diagnostic: the subject (business identifier of the row), the
/// message and a help text. Subject and help may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub subject: String,
    pub message: String,
    pub help: String,
}

impl ErrorRecord {
    pub fn new(
        subject: impl Into<String>,
        message: impl Into<String>,
        help: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            message: message.into(),
            help: help.into(),
        }
    }
}

/// Ordered errors and warnings collected over a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    errors: Vec<ErrorRecord>,
    warnings: Vec<ErrorRecord>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(
        &mut self,
        subject: impl Into<String>,
        message: impl Into<String>,
        help: impl Into<String>,
    ) {
        self.errors.push(ErrorRecord::new(subject, message, help));
    }

    pub fn warning(
        &mut self,
        subject: impl Into<String>,
        message: impl Into<String>,
        help: impl Into<String>,
    ) {
        self.warnings.push(ErrorRecord::new(subject, message, help));
    }

    pub fn errors(&self) -> &[ErrorRecord] {
        &self.errors
    }

    pub fn warnings(&self) -> &[ErrorRecord] {
        &self.warnings
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }

    /// Appends another run's records, keeping their order.
    pub fn merge(&mut self, other: Diagnostics) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    /// Moves every warning to the end of the error list.
    pub fn promote_warnings(&mut self) {
        let warnings = std::mem::take(&mut self.warnings);
        self.errors.extend(warnings);
    }

    pub fn clear_warnings(&mut self) {
        self.warnings.clear();
    }

    pub fn into_parts(self) -> (Vec<ErrorRecord>, Vec<ErrorRecord>) {
        (self.errors, self.warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn promote_keeps_order() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.warning("2", "w", "");
        diagnostics.error("1", "e", "");
        diagnostics.promote_warnings();
        let subjects: Vec<_> = diagnostics.errors().iter().map(|r| r.subject.as_str()).collect();
        assert_eq!(subjects, ["1", "2"]);
        assert_eq!(diagnostics.warning_count(), 0);
    }

    #[test]
    fn merge_appends() {
        let mut first = Diagnostics::new();
        first.error("a", "one", "");
        let mut second = Diagnostics::new();
        second.error("b", "two", "");
        second.warning("b", "three", "");
        first.merge(second);
        assert_eq!(first.error_count(), 2);
        assert_eq!(first.warning_count(), 1);
    }
}
