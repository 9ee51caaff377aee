//! Controlled vocabularies for concept nodes.
//!
//! A [`Vocabulary`] holds the values of one collection. Spelling aliases are
//! extra entries that point at an existing value id, so several labels can
//! resolve to the same concept.

use serde::{Deserialize, Serialize};

/// A controlled value: one label of a concept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlledValue {
    pub valueid: String,
    pub conceptid: String,
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    values: Vec<ControlledValue>,
}

impl Vocabulary {
    pub fn new(values: Vec<ControlledValue>) -> Self {
        Self { values }
    }

    /// Registers `alias` as another label for the value labelled `existing`.
    ///
    /// Returns false when `existing` is not part of the vocabulary.
    pub fn add_alias(&mut self, existing: &str, alias: &str) -> bool {
        let Some(value) = self.exact(existing).cloned() else {
            return false;
        };
        if self.exact(alias).is_none() {
            self.values.push(ControlledValue {
                label: alias.to_string(),
                ..value
            });
        }
        true
    }

    /// Case-sensitive label match.
    pub fn exact(&self, label: &str) -> Option<&ControlledValue> {
        self.values.iter().find(|value| value.label == label)
    }

    /// Case-insensitive match ignoring surrounding whitespace.
    pub fn case_insensitive(&self, label: &str) -> Option<&ControlledValue> {
        let needle = label.trim().to_lowercase();
        self.values
            .iter()
            .find(|value| value.label.trim().to_lowercase() == needle)
    }

    /// Label for a value id, used when annotating tiles.
    pub fn label_for(&self, valueid: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|value| value.valueid == valueid)
            .map(|value| value.label.as_str())
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|value| value.label.as_str())
    }

    pub fn values(&self) -> &[ControlledValue] {
        &self.values
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(valueid: &str, label: &str) -> ControlledValue {
        ControlledValue {
            valueid: valueid.to_string(),
            conceptid: format!("c-{valueid}"),
            label: label.to_string(),
        }
    }

    #[test]
    fn alias_points_at_existing_value() {
        let mut vocabulary = Vocabulary::new(vec![value("v-1", "Iran (Islamic Republic of)")]);
        assert!(vocabulary.add_alias("Iran (Islamic Republic of)", "Iran"));
        assert_eq!(vocabulary.exact("Iran").map(|v| v.valueid.as_str()), Some("v-1"));
        assert!(!vocabulary.add_alias("Atlantis", "Lost City"));
        assert_eq!(vocabulary.values().len(), 2);
    }

    #[test]
    fn case_insensitive_lookup_trims() {
        let vocabulary = Vocabulary::new(vec![value("v-1", "Settlement")]);
        assert!(vocabulary.exact("settlement").is_none());
        assert_eq!(
            vocabulary.case_insensitive("  settlement ").map(|v| v.label.as_str()),
            Some("Settlement")
        );
        assert_eq!(vocabulary.label_for("v-1"), Some("Settlement"));
    }
}
