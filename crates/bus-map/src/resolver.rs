//! Concept/node resolution over nested sheet documents.
//!
//! Keys become node ids. For concept nodes with a vocabulary, labels become
//! value ids using this order:
//!
//! 1. exact label
//! 2. case-insensitive, trimmed label (accepted with a warning)
//! 3. global label lookup with exactly one candidate (not for the labels of
//!    a concept-list value)
//!
//! Anything else is reported as an error and left unchanged. A failing store
//! lookup aborts the document. The `_` key
//! carries the row's business identifier and is used as the subject of
//! every record raised below it.

use bus_model::{Datatype, Diagnostics, SchemaStore, StoreError};
use serde_json::{Map, Value};
use tracing::trace;

use crate::index::{IndexedNode, NodeIndex};
use crate::score::closest_label;

/// Key carrying the row's business identifier.
pub const SUBJECT_KEY: &str = "_";

pub struct ConceptResolver<'a> {
    index: &'a NodeIndex,
    store: &'a dyn SchemaStore,
}

impl<'a> ConceptResolver<'a> {
    pub fn new(index: &'a NodeIndex, store: &'a dyn SchemaStore) -> Self {
        Self { index, store }
    }

    /// Resolves one top-level sheet document.
    ///
    /// # Errors
    ///
    /// Returns the store error when the global label lookup fails.
    pub fn resolve_document(
        &self,
        document: &Value,
        diagnostics: &mut Diagnostics,
    ) -> Result<Value, StoreError> {
        let subject = document
            .get(SUBJECT_KEY)
            .map(subject_text)
            .unwrap_or_default();
        self.resolve_value(document, &subject, diagnostics)
    }

    fn resolve_value(
        &self,
        value: &Value,
        subject: &str,
        diagnostics: &mut Diagnostics,
    ) -> Result<Value, StoreError> {
        Ok(match value {
            Value::Object(map) => {
                let subject = map
                    .get(SUBJECT_KEY)
                    .map(subject_text)
                    .unwrap_or_else(|| subject.to_string());
                Value::Object(self.resolve_object(map, &subject, diagnostics)?)
            }
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .map(|item| self.resolve_value(item, subject, diagnostics))
                    .collect::<Result<_, _>>()?,
            ),
            other => other.clone(),
        })
    }

    fn resolve_object(
        &self,
        map: &Map<String, Value>,
        subject: &str,
        diagnostics: &mut Diagnostics,
    ) -> Result<Map<String, Value>, StoreError> {
        let mut resolved = Map::with_capacity(map.len());
        for (key, value) in map {
            if key == SUBJECT_KEY {
                resolved.insert(key.clone(), value.clone());
                continue;
            }
            let Some(entry) = self.index.resolve(key) else {
                resolved.insert(key.clone(), self.resolve_value(value, subject, diagnostics)?);
                continue;
            };
            let value = if entry.has_vocabulary() {
                self.resolve_concept(entry, value, subject, diagnostics)?
            } else {
                self.resolve_value(value, subject, diagnostics)?
            };
            resolved.insert(entry.node.nodeid.clone(), value);
        }
        Ok(resolved)
    }

    fn resolve_concept(
        &self,
        entry: &IndexedNode,
        value: &Value,
        subject: &str,
        diagnostics: &mut Diagnostics,
    ) -> Result<Value, StoreError> {
        match value {
            Value::Null => Ok(Value::Null),
            Value::Array(items) => {
                // A concept node's list holds one value per group instance;
                // only a concept-list value is a list of labels.
                let allow_global = entry.node.datatype != Datatype::ConceptList;
                let mut resolved = Vec::with_capacity(items.len());
                for item in items {
                    resolved.push(match item {
                        Value::String(label) => {
                            self.resolve_label(entry, label, allow_global, subject, diagnostics)?
                        }
                        Value::Number(_) | Value::Bool(_) => self.resolve_label(
                            entry,
                            &item.to_string(),
                            allow_global,
                            subject,
                            diagnostics,
                        )?,
                        other => self.resolve_value(other, subject, diagnostics)?,
                    });
                }
                Ok(Value::Array(resolved))
            }
            Value::String(label) => self.resolve_label(entry, label, true, subject, diagnostics),
            Value::Number(_) | Value::Bool(_) => {
                self.resolve_label(entry, &value.to_string(), true, subject, diagnostics)
            }
            Value::Object(_) => self.resolve_value(value, subject, diagnostics),
        }
    }

    fn resolve_label(
        &self,
        entry: &IndexedNode,
        label: &str,
        allow_global: bool,
        subject: &str,
        diagnostics: &mut Diagnostics,
    ) -> Result<Value, StoreError> {
        let Some(vocabulary) = entry.vocabulary.as_ref() else {
            return Ok(Value::String(label.to_string()));
        };
        if let Some(found) = vocabulary.exact(label) {
            return Ok(Value::String(found.valueid.clone()));
        }
        if let Some(found) = vocabulary.case_insensitive(label) {
            diagnostics.warning(
                subject,
                format!("Invalid concept value '{label}'"),
                format!("Did you mean '{}'?", found.label),
            );
            return Ok(Value::String(found.valueid.clone()));
        }
        if allow_global {
            let candidates = self.store.find_values_by_label(label.trim())?;
            if let [only] = candidates.as_slice() {
                trace!(node = %entry.node.nodeid, valueid = %only.valueid, "global concept match");
                return Ok(Value::String(only.valueid.clone()));
            }
        }
        let valid = vocabulary
            .labels()
            .map(|known| format!("'{known}'"))
            .collect::<Vec<_>>()
            .join(", ");
        let mut help = format!("Valid values: {valid}.");
        if let Some(suggestion) = closest_label(label, vocabulary.labels()) {
            help.push_str(&format!(" Did you mean '{suggestion}'?"));
        }
        diagnostics.error(
            subject,
            format!(
                "Invalid concept value \"{}\" for \"{}\".",
                label.trim(),
                entry.node.name
            ),
            help,
        );
        Ok(Value::String(label.to_string()))
    }
}

/// Text form of a subject value; numbers keep their JSON rendering.
fn subject_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
