//! In-memory implementation of every collaborator trait.
//!
//! Backs the command-line catalog file and the test suites. Call counters
//! make cache and deletion behavior observable.

use std::cell::Cell;
use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;
use crate::options::Language;
use crate::resource::Resource;
use crate::schema::{Schema, SchemaSummary};
use crate::store::{
    DeleteReport, GeometryProbe, ResourceHit, ResourceStore, ScanHit, SchemaStore,
};
use crate::vocabulary::ControlledValue;

/// Search-index entry mapping a business identifier to a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexedBusinessId {
    pub graph_id: String,
    pub business_id: String,
    pub resourceinstanceid: String,
}

/// Serializable snapshot of a [`MemoryStore`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub schemas: Vec<Schema>,
    /// Collection id → controlled values.
    #[serde(default)]
    pub collections: BTreeMap<String, Vec<ControlledValue>>,
    #[serde(default)]
    pub languages: Vec<Language>,
    #[serde(default)]
    pub resources: Vec<Resource>,
    #[serde(default)]
    pub business_ids: Vec<IndexedBusinessId>,
}

/// Number of calls made to the expensive store operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub find: usize,
    pub scan: usize,
    pub delete: usize,
    pub probe: usize,
}

#[derive(Debug)]
pub struct MemoryStore {
    catalog: Catalog,
    accept_geometry: bool,
    calls: Cell<CallCounts>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::from_catalog(Catalog::default())
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_catalog(catalog: Catalog) -> Self {
        Self {
            catalog,
            accept_geometry: true,
            calls: Cell::new(CallCounts::default()),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn into_catalog(self) -> Catalog {
        self.catalog
    }

    #[must_use]
    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.catalog.schemas.push(schema);
        self
    }

    #[must_use]
    pub fn with_collection(
        mut self,
        collection_id: impl Into<String>,
        values: Vec<ControlledValue>,
    ) -> Self {
        self.catalog.collections.insert(collection_id.into(), values);
        self
    }

    #[must_use]
    pub fn with_language(mut self, language: Language) -> Self {
        self.catalog.languages.push(language);
        self
    }

    #[must_use]
    pub fn with_resource(mut self, resource: Resource) -> Self {
        self.catalog.resources.push(resource);
        self
    }

    /// Adds a search-index entry for an existing resource.
    #[must_use]
    pub fn with_business_id(
        mut self,
        graph_id: impl Into<String>,
        business_id: impl Into<String>,
        resourceinstanceid: impl Into<String>,
    ) -> Self {
        self.catalog.business_ids.push(IndexedBusinessId {
            graph_id: graph_id.into(),
            business_id: business_id.into(),
            resourceinstanceid: resourceinstanceid.into(),
        });
        self
    }

    /// Makes the geometry probe reject every feature collection.
    #[must_use]
    pub fn rejecting_geometry(mut self) -> Self {
        self.accept_geometry = false;
        self
    }

    pub fn calls(&self) -> CallCounts {
        self.calls.get()
    }

    pub fn reset_calls(&self) {
        self.calls.set(CallCounts::default());
    }

    fn record(&self, update: impl FnOnce(&mut CallCounts)) {
        let mut counts = self.calls.get();
        update(&mut counts);
        self.calls.set(counts);
    }

    fn resource(&self, resource_id: &str) -> Option<&Resource> {
        self.catalog
            .resources
            .iter()
            .find(|resource| resource.id() == resource_id)
    }
}

/// Text values of a tile: plain strings and `{lang: {"value": ...}}` entries.
fn string_values(data: &Map<String, Value>) -> Vec<String> {
    let mut values = Vec::new();
    for value in data.values() {
        match value {
            Value::String(text) => values.push(text.clone()),
            Value::Object(languages) => {
                for entry in languages.values() {
                    if let Some(text) = entry.get("value").and_then(Value::as_str) {
                        values.push(text.to_string());
                    }
                }
            }
            _ => {}
        }
    }
    values
}

impl SchemaStore for MemoryStore {
    fn get_schema(&self, graph_id: &str) -> Result<Option<Schema>> {
        Ok(self
            .catalog
            .schemas
            .iter()
            .find(|schema| schema.graph_id == graph_id)
            .cloned())
    }

    fn list_schemas(&self) -> Result<Vec<SchemaSummary>> {
        Ok(self.catalog.schemas.iter().map(Schema::summary).collect())
    }

    fn controlled_values(
        &self,
        collection_id: &str,
        _language: &str,
    ) -> Result<Vec<ControlledValue>> {
        Ok(self
            .catalog
            .collections
            .get(collection_id)
            .cloned()
            .unwrap_or_default())
    }

    fn find_values_by_label(&self, label: &str) -> Result<Vec<ControlledValue>> {
        let mut seen = BTreeSet::new();
        Ok(self
            .catalog
            .collections
            .values()
            .flatten()
            .filter(|value| value.label == label && seen.insert(value.valueid.clone()))
            .cloned()
            .collect())
    }

    fn languages(&self) -> Result<Vec<Language>> {
        Ok(self.catalog.languages.clone())
    }
}

impl ResourceStore for MemoryStore {
    fn find_by_business_id(
        &self,
        graph_id: &str,
        business_id: &str,
    ) -> Result<Option<ResourceHit>> {
        self.record(|counts| counts.find += 1);
        Ok(self
            .catalog
            .business_ids
            .iter()
            .find(|entry| entry.graph_id == graph_id && entry.business_id == business_id)
            .map(|entry| ResourceHit {
                resourceinstanceid: entry.resourceinstanceid.clone(),
                graph_id: entry.graph_id.clone(),
            }))
    }

    fn scan_by_business_id(&self, graph_id: &str, business_id: &str) -> Result<Option<ScanHit>> {
        self.record(|counts| counts.scan += 1);
        let needle = business_id.to_lowercase();
        for resource in &self.catalog.resources {
            if resource.graph_id() != graph_id {
                continue;
            }
            let values: Vec<String> = resource
                .tiles
                .iter()
                .flat_map(|tile| string_values(&tile.data))
                .collect();
            if values
                .iter()
                .any(|value| value.to_lowercase().contains(&needle))
            {
                return Ok(Some(ScanHit {
                    resourceinstanceid: resource.id().to_string(),
                    string_values: values,
                }));
            }
        }
        Ok(None)
    }

    fn exists(&self, resource_id: &str) -> Result<bool> {
        Ok(self.resource(resource_id).is_some())
    }

    fn tile_data(
        &self,
        resource_id: &str,
        nodegroup_id: &str,
    ) -> Result<Option<Map<String, Value>>> {
        Ok(self.resource(resource_id).and_then(|resource| {
            resource
                .tiles
                .iter()
                .find(|tile| tile.nodegroup_id == nodegroup_id)
                .map(|tile| tile.data.clone())
        }))
    }

    fn delete(&mut self, resource_id: &str) -> Result<DeleteReport> {
        self.record(|counts| counts.delete += 1);
        let Some(position) = self
            .catalog
            .resources
            .iter()
            .position(|resource| resource.id() == resource_id)
        else {
            return Ok(DeleteReport::default());
        };
        let removed = self.catalog.resources.remove(position);
        self.catalog
            .business_ids
            .retain(|entry| entry.resourceinstanceid != resource_id);
        let tiles = removed.tiles.len() as u64;
        let mut per_entity = BTreeMap::new();
        per_entity.insert(DeleteReport::RESOURCE.to_string(), 1);
        per_entity.insert(DeleteReport::TILE.to_string(), tiles);
        Ok(DeleteReport {
            deleted: 1 + tiles,
            per_entity,
        })
    }
}

impl GeometryProbe for MemoryStore {
    fn accepts(&self, _feature_collection: &Value) -> Result<bool> {
        self.record(|counts| counts.probe += 1);
        Ok(self.accept_geometry)
    }
}
