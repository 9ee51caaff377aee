//! Interfaces to the collaborators the pipeline consumes.
//!
//! The pipeline never performs I/O itself. Schema metadata, existing
//! resources, geometry acceptance and spreadsheet rows all arrive through
//! these traits. Lookups take `&self`; only deletion needs `&mut self`.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;
use crate::options::Language;
use crate::schema::{Schema, SchemaSummary};
use crate::vocabulary::ControlledValue;

/// One flat spreadsheet row: header → raw cell, in column order.
pub type RawRow = Vec<(String, Value)>;

pub trait SchemaStore {
    fn get_schema(&self, graph_id: &str) -> Result<Option<Schema>>;

    fn list_schemas(&self) -> Result<Vec<SchemaSummary>>;

    /// Values of a collection: top concepts plus one level of children.
    fn controlled_values(&self, collection_id: &str, language: &str)
    -> Result<Vec<ControlledValue>>;

    /// Values anywhere in the thesaurus whose label equals `label`.
    fn find_values_by_label(&self, label: &str) -> Result<Vec<ControlledValue>>;

    fn languages(&self) -> Result<Vec<Language>>;
}

/// Result of the index-backed business identifier lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceHit {
    pub resourceinstanceid: String,
    pub graph_id: String,
}

/// Candidate returned by the slow scan. The caller confirms the match
/// against `string_values`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanHit {
    pub resourceinstanceid: String,
    /// Every string value held by the resource's tiles.
    pub string_values: Vec<String>,
}

/// Counts reported by a delete, keyed by entity kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteReport {
    /// Total rows removed across every entity kind.
    pub deleted: u64,
    /// Rows removed per kind; see [`DeleteReport::RESOURCE`] and
    /// [`DeleteReport::TILE`].
    pub per_entity: BTreeMap<String, u64>,
}

impl DeleteReport {
    pub const RESOURCE: &'static str = "resource_instance";
    pub const TILE: &'static str = "tile";

    pub fn resources(&self) -> u64 {
        self.per_entity.get(Self::RESOURCE).copied().unwrap_or(0)
    }

    pub fn tiles(&self) -> u64 {
        self.per_entity.get(Self::TILE).copied().unwrap_or(0)
    }
}

pub trait ResourceStore {
    /// Exact lookup through the search index.
    fn find_by_business_id(&self, graph_id: &str, business_id: &str)
    -> Result<Option<ResourceHit>>;

    /// Slow scan over stored tile values.
    fn scan_by_business_id(&self, graph_id: &str, business_id: &str) -> Result<Option<ScanHit>>;

    fn exists(&self, resource_id: &str) -> Result<bool>;

    /// Data of the first tile of `nodegroup_id` in a stored resource.
    fn tile_data(&self, resource_id: &str, nodegroup_id: &str) -> Result<Option<Map<String, Value>>>;

    fn delete(&mut self, resource_id: &str) -> Result<DeleteReport>;
}

/// Final acceptance check for a geometry feature collection.
pub trait GeometryProbe {
    fn accepts(&self, feature_collection: &Value) -> Result<bool>;
}

/// Source of flat spreadsheet rows.
pub trait RowSource {
    fn columns(&self, source: &Path) -> Result<Vec<String>>;

    fn rows(&self, source: &Path) -> Result<Vec<RawRow>>;
}
