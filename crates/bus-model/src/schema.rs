//! Graph schema: nodes, node groups and datatypes.
//!
//! A node group's root node shares the node group's identifier. Single-node
//! groups therefore hold exactly one node whose `nodeid` equals the
//! `nodegroup_id`.

use serde::{Deserialize, Serialize};

use crate::key::node_key;

/// Datatype tag carried by a node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Datatype {
    /// Language-tagged text.
    String,
    /// Plain text.
    NonLocalizedString,
    Date,
    Concept,
    ConceptList,
    GeojsonFeatureCollection,
    ResourceInstance,
    ResourceInstanceList,
    /// Structural node with no value.
    Semantic,
    Number,
    /// Any tag the pipeline does not convert; values pass through.
    Other(String),
}

impl Datatype {
    pub fn parse(tag: &str) -> Self {
        match tag {
            "string" => Self::String,
            "non-localized-string" => Self::NonLocalizedString,
            "date" => Self::Date,
            "concept" => Self::Concept,
            "concept-list" => Self::ConceptList,
            "geojson-feature-collection" => Self::GeojsonFeatureCollection,
            "resource-instance" => Self::ResourceInstance,
            "resource-instance-list" => Self::ResourceInstanceList,
            "semantic" => Self::Semantic,
            "number" => Self::Number,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::String => "string",
            Self::NonLocalizedString => "non-localized-string",
            Self::Date => "date",
            Self::Concept => "concept",
            Self::ConceptList => "concept-list",
            Self::GeojsonFeatureCollection => "geojson-feature-collection",
            Self::ResourceInstance => "resource-instance",
            Self::ResourceInstanceList => "resource-instance-list",
            Self::Semantic => "semantic",
            Self::Number => "number",
            Self::Other(tag) => tag,
        }
    }

    /// Concept-typed nodes resolve labels against a vocabulary.
    pub fn is_concept(&self) -> bool {
        matches!(self, Self::Concept | Self::ConceptList)
    }

    /// Reference-typed nodes point at other resources.
    pub fn is_reference(&self) -> bool {
        matches!(self, Self::ResourceInstance | Self::ResourceInstanceList)
    }

    /// New tiles carry a null placeholder for these datatypes.
    pub fn has_tile_placeholder(&self) -> bool {
        matches!(self, Self::Date | Self::Concept)
    }
}

impl From<String> for Datatype {
    fn from(tag: String) -> Self {
        Self::parse(&tag)
    }
}

impl From<Datatype> for String {
    fn from(datatype: Datatype) -> Self {
        datatype.as_str().to_string()
    }
}

impl std::fmt::Display for Datatype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reference target configured on a resource-instance node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetGraph {
    /// Graph the reference may point into.
    pub graphid: String,
    #[serde(default, rename = "ontologyProperty")]
    pub ontology_property: String,
    #[serde(default, rename = "inverseOntologyProperty")]
    pub inverse_ontology_property: String,
}

/// Datatype-specific node configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Reference targets, tried in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub graphs: Vec<TargetGraph>,
    /// Controlled-vocabulary collection for concept nodes.
    #[serde(
        default,
        rename = "rdmCollection",
        skip_serializing_if = "Option::is_none"
    )]
    pub rdm_collection: Option<String>,
}

/// A single node of a graph schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub nodeid: String,
    /// Human-readable display name.
    pub name: String,
    pub datatype: Datatype,
    /// Owning node group; `None` only for the graph root.
    #[serde(default)]
    pub nodegroup_id: Option<String>,
    #[serde(default)]
    pub config: NodeConfig,
}

impl Node {
    /// Normalized column key derived from the display name.
    pub fn key(&self) -> String {
        node_key(&self.name)
    }
}

/// Node group cardinality.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cardinality {
    #[serde(rename = "1")]
    One,
    #[default]
    #[serde(rename = "n")]
    Many,
}

/// A node group; each instance of it becomes one tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeGroup {
    /// Same id as the group's root node.
    pub nodegroupid: String,
    /// Enclosing group; `None` for top-level groups.
    #[serde(default)]
    pub parentnodegroup_id: Option<String>,
    #[serde(default)]
    pub cardinality: Cardinality,
}

/// Identifier and display name of a schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaSummary {
    pub graph_id: String,
    pub name: String,
}

/// A graph schema loaded once per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub graph_id: String,
    /// Display name, e.g. `Heritage Place`.
    pub name: String,
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub nodegroups: Vec<NodeGroup>,
}

impl Schema {
    pub fn node(&self, nodeid: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.nodeid == nodeid)
    }

    pub fn nodegroup(&self, nodegroupid: &str) -> Option<&NodeGroup> {
        self.nodegroups
            .iter()
            .find(|group| group.nodegroupid == nodegroupid)
    }

    pub fn is_nodegroup(&self, id: &str) -> bool {
        self.nodegroup(id).is_some()
    }

    /// Nodes owned by a node group, including its root node.
    pub fn nodes_in_group<'a>(&'a self, nodegroupid: &'a str) -> impl Iterator<Item = &'a Node> {
        self.nodes
            .iter()
            .filter(move |node| node.nodegroup_id.as_deref() == Some(nodegroupid))
    }

    /// Parent node group, or `None` for top-level groups.
    pub fn parent_group(&self, nodegroupid: &str) -> Option<&str> {
        self.nodegroup(nodegroupid)
            .and_then(|group| group.parentnodegroup_id.as_deref())
    }

    /// A group whose only node is its root stores a bare value.
    pub fn is_single_node_group(&self, nodegroupid: &str) -> bool {
        let mut nodes = self.nodes_in_group(nodegroupid);
        matches!(
            (nodes.next(), nodes.next()),
            (Some(node), None) if node.nodeid == nodegroupid
        )
    }

    pub fn summary(&self) -> SchemaSummary {
        SchemaSummary {
            graph_id: self.graph_id.clone(),
            name: self.name.clone(),
        }
    }
}
