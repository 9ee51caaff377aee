//! Post-translation key check.

use bus_model::{Diagnostics, Schema};
use serde_json::Value;

const SUBJECT_KEY: &str = "_";

/// Verifies that every key of the translated documents (except `_`) is a
/// node id of `schema`. Returns false when any key is not.
pub fn check_translated_keys(
    documents: &[Value],
    schema: &Schema,
    diagnostics: &mut Diagnostics,
) -> bool {
    let mut valid = true;
    for document in documents {
        let subject = document
            .get(SUBJECT_KEY)
            .and_then(Value::as_str)
            .unwrap_or_default();
        valid &= check_value(document, schema, subject, diagnostics);
    }
    valid
}

fn check_value(value: &Value, schema: &Schema, subject: &str, diagnostics: &mut Diagnostics) -> bool {
    match value {
        Value::Object(map) => {
            let mut valid = true;
            for (key, child) in map {
                if key == SUBJECT_KEY {
                    continue;
                }
                if schema.node(key).is_none() {
                    diagnostics.error(subject, format!("\"{key}\" is an invalid column value."), "");
                    valid = false;
                    continue;
                }
                valid &= check_value(child, schema, subject, diagnostics);
            }
            valid
        }
        Value::Array(items) => items
            .iter()
            .fold(true, |valid, item| check_value(item, schema, subject, diagnostics) && valid),
        _ => true,
    }
}
