//! Summary of an import: resource ids and their business identifiers.

use bus_model::{BusinessDataDocument, ResourceStore, StoreError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub uuid: String,
    pub eamenaid: String,
}

/// Business identifier stored in a resource's `nodegroup_id` tile.
///
/// The value is either plain text or a language-tagged
/// `{lang: {"value": ...}}` object; other shapes yield `None`.
pub fn business_id(
    store: &dyn ResourceStore,
    resource_id: &str,
    nodegroup_id: &str,
    language: &str,
) -> Result<Option<String>, StoreError> {
    let Some(data) = store.tile_data(resource_id, nodegroup_id)? else {
        return Ok(None);
    };
    let text = match data.get(nodegroup_id) {
        Some(Value::String(text)) => Some(text.clone()),
        Some(Value::Object(languages)) => languages
            .get(language)
            .and_then(|entry| entry.get("value"))
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    };
    Ok(text.filter(|text| !text.is_empty()))
}

/// One entry per resource of `document` that has a business identifier in
/// the store. `nodegroup_for` names the identifier node group of a graph.
pub fn summarize(
    document: &BusinessDataDocument,
    store: &dyn ResourceStore,
    language: &str,
    mut nodegroup_for: impl FnMut(&str) -> Result<String, StoreError>,
) -> Result<Vec<ImportSummary>, StoreError> {
    let mut entries = Vec::new();
    for resource in document.resources() {
        let nodegroup_id = nodegroup_for(resource.graph_id())?;
        if let Some(eamenaid) = business_id(store, resource.id(), &nodegroup_id, language)? {
            entries.push(ImportSummary {
                uuid: resource.id().to_string(),
                eamenaid,
            });
        }
    }
    Ok(entries)
}
