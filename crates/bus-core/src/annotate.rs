//! Human-readable annotations on generated business data.

use std::collections::BTreeMap;

use bus_map::NodeIndex;
use bus_model::BusinessDataDocument;
use serde_json::Value;

/// Adds `nodegroup_name`, `data_fields` (node id → node name) and
/// `concept_labels` (value id → label) to every tile. Annotations that
/// would be empty are left out.
pub fn annotate_document(document: &mut BusinessDataDocument, index: &NodeIndex) {
    for tile in document
        .resources_mut()
        .iter_mut()
        .flat_map(|resource| resource.tiles.iter_mut())
    {
        tile.nodegroup_name = index
            .by_id(&tile.nodegroup_id)
            .map(|entry| entry.node.name.clone());

        let mut fields = BTreeMap::new();
        let mut labels = BTreeMap::new();
        for (key, value) in &tile.data {
            let Some(entry) = index.by_id(key) else {
                continue;
            };
            fields.insert(key.clone(), entry.node.name.clone());
            let Some(vocabulary) = entry.vocabulary.as_ref() else {
                continue;
            };
            for valueid in value_ids(value) {
                if let Some(label) = vocabulary.label_for(valueid) {
                    labels.insert(valueid.to_string(), label.to_string());
                }
            }
        }
        tile.data_fields = (!fields.is_empty()).then_some(fields);
        tile.concept_labels = (!labels.is_empty()).then_some(labels);
    }
}

fn value_ids(value: &Value) -> Vec<&str> {
    match value {
        Value::String(id) => vec![id.as_str()],
        Value::Array(items) => items.iter().filter_map(Value::as_str).collect(),
        _ => Vec::new(),
    }
}
