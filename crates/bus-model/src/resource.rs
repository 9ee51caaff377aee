//! Business data emitted by the pipeline.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identity block of a resource in the import document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceInstance {
    pub resourceinstanceid: String,
    /// Graph the resource is an instance of.
    pub graph_id: String,
    /// Same as `resourceinstanceid` for generated resources.
    pub legacyid: String,
}

/// One node-group instance inside a resource.
///
/// Tiles form a forest: `parenttile_id` is either `None` or the `tileid` of
/// another tile of the same resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub tileid: String,
    /// Tile of the parent node group instance.
    pub parenttile_id: Option<String>,
    pub nodegroup_id: String,
    pub resourceinstance_id: String,
    #[serde(default)]
    pub sortorder: i64,
    /// Always `null` in generated documents.
    #[serde(default)]
    pub provisionaledits: Option<Value>,
    /// Node id → value, in the shape the node's datatype expects.
    #[serde(default)]
    pub data: Map<String, Value>,
    /// Annotation: display name of the node group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nodegroup_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_fields: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concept_labels: Option<BTreeMap<String, String>>,
}

impl Tile {
    pub fn new(
        tileid: impl Into<String>,
        nodegroup_id: impl Into<String>,
        resourceinstance_id: impl Into<String>,
        parenttile_id: Option<String>,
    ) -> Self {
        Self {
            tileid: tileid.into(),
            parenttile_id,
            nodegroup_id: nodegroup_id.into(),
            resourceinstance_id: resourceinstance_id.into(),
            sortorder: 0,
            provisionaledits: None,
            data: Map::new(),
            nodegroup_name: None,
            data_fields: None,
            concept_labels: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub resourceinstance: ResourceInstance,
    #[serde(default)]
    pub tiles: Vec<Tile>,
    /// Business identifier of the originating sheet row, used to attribute
    /// diagnostics. Never serialized.
    #[serde(skip)]
    pub subject: Option<String>,
}

impl Resource {
    pub fn new(
        resourceinstanceid: impl Into<String>,
        graph_id: impl Into<String>,
        legacyid: impl Into<String>,
    ) -> Self {
        Self {
            resourceinstance: ResourceInstance {
                resourceinstanceid: resourceinstanceid.into(),
                graph_id: graph_id.into(),
                legacyid: legacyid.into(),
            },
            tiles: Vec::new(),
            subject: None,
        }
    }

    pub fn with_subject(mut self, subject: Option<String>) -> Self {
        self.subject = subject;
        self
    }

    pub fn id(&self) -> &str {
        &self.resourceinstance.resourceinstanceid
    }

    pub fn graph_id(&self) -> &str {
        &self.resourceinstance.graph_id
    }

    /// Subject used for diagnostics; empty when the row had no identifier.
    pub fn subject(&self) -> &str {
        self.subject.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BusinessData {
    #[serde(default)]
    pub resources: Vec<Resource>,
}

/// Top-level document: `{"business_data": {"resources": [...]}}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BusinessDataDocument {
    pub business_data: BusinessData,
}

impl BusinessDataDocument {
    pub fn new(resources: Vec<Resource>) -> Self {
        Self {
            business_data: BusinessData { resources },
        }
    }

    pub fn resources(&self) -> &[Resource] {
        &self.business_data.resources
    }

    pub fn resources_mut(&mut self) -> &mut Vec<Resource> {
        &mut self.business_data.resources
    }

    pub fn is_empty(&self) -> bool {
        self.business_data.resources.is_empty()
    }
}
