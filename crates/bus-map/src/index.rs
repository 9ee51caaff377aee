//! Key → node index for one schema.
//!
//! Column keys are matched loosely (see [`loose_key`]): direct node keys
//! first, then template header aliases in either direction, then the actor
//! suffix rule. The index is built once per run.

use std::collections::BTreeMap;

use bus_model::{
    ControlledValue, Node, Schema, SchemaStore, StoreError, Vocabulary, loose_key,
};
use bus_standards::SheetProfile;
use serde::Serialize;
use tracing::debug;

/// A node reachable from the index, with its vocabulary when it has one.
#[derive(Debug, Clone)]
pub struct IndexedNode {
    pub node: Node,
    /// Normalized column key of the node.
    pub key: String,
    /// Collection values plus template label aliases; `None` until
    /// vocabularies are loaded, and for nodes without a collection.
    pub vocabulary: Option<Vocabulary>,
}

impl IndexedNode {
    /// True when concept values of this node are checked against a
    /// vocabulary.
    pub fn has_vocabulary(&self) -> bool {
        self.node.datatype.is_concept() && self.vocabulary.is_some()
    }
}

/// One entry of the node listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeListing {
    pub nodeid: String,
    pub name: String,
    /// Datatype tag as stored in the graph, e.g. `concept-list`.
    pub datatype: String,
    /// Column header expected in the sheet.
    pub key: String,
    /// Accepted labels for concept nodes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<ControlledValue>>,
}

#[derive(Debug, Clone, Default)]
pub struct NodeIndex {
    nodes: Vec<IndexedNode>,
    by_key: BTreeMap<String, usize>,
    by_id: BTreeMap<String, usize>,
    actor_suffix: Option<&'static str>,
}

impl NodeIndex {
    /// Indexes every node of `schema`, applying the profile's exclusions and
    /// header aliases.
    pub fn build(schema: &Schema, profile: Option<&SheetProfile>) -> Self {
        let mut index = Self {
            actor_suffix: profile.and_then(|profile| profile.actor_suffix),
            ..Self::default()
        };
        for node in &schema.nodes {
            let key = node.key();
            if profile.is_some_and(|profile| profile.is_excluded(&key, &node.nodeid)) {
                debug!(nodeid = %node.nodeid, key = %key, "skipping duplicated node");
                continue;
            }
            let position = index.nodes.len();
            index.by_key.insert(loose_key(&key), position);
            index.by_id.insert(node.nodeid.clone(), position);
            index.nodes.push(IndexedNode {
                node: node.clone(),
                key,
                vocabulary: None,
            });
        }
        for (position, entry) in index.nodes.iter().enumerate() {
            let mut alternatives: Vec<String> = Vec::new();
            if let Some(profile) = profile {
                alternatives.extend(profile.aliases_for(&entry.key).map(loose_key));
                if let Some(stripped) = profile.strip_actor_suffix(&entry.key) {
                    alternatives.push(loose_key(stripped));
                }
            }
            for alternative in alternatives {
                index.by_key.entry(alternative).or_insert(position);
            }
        }
        index
    }

    /// Loads the vocabularies of concept nodes and applies the profile's
    /// label aliases. Collections shared by several nodes are fetched once.
    pub fn load_vocabularies(
        &mut self,
        store: &dyn SchemaStore,
        language: &str,
        profile: Option<&SheetProfile>,
    ) -> Result<(), StoreError> {
        let mut collections: BTreeMap<String, Vec<ControlledValue>> = BTreeMap::new();
        for entry in &mut self.nodes {
            if !entry.node.datatype.is_concept() {
                continue;
            }
            let Some(collection) = entry.node.config.rdm_collection.as_deref() else {
                continue;
            };
            if !collections.contains_key(collection) {
                let values = store.controlled_values(collection, language)?;
                collections.insert(collection.to_string(), values);
            }
            let values = collections.get(collection).cloned().unwrap_or_default();
            let mut vocabulary = Vocabulary::new(values);
            if let Some(profile) = profile {
                for alias in profile
                    .concept_aliases
                    .iter()
                    .filter(|alias| alias.node_key == entry.key)
                {
                    vocabulary.add_alias(alias.label, alias.alias);
                }
            }
            entry.vocabulary = Some(vocabulary);
        }
        debug!(collections = collections.len(), "vocabularies loaded");
        Ok(())
    }

    /// Resolves a column key to its node.
    pub fn resolve(&self, key: &str) -> Option<&IndexedNode> {
        let loose = loose_key(key);
        if let Some(position) = self.by_key.get(&loose) {
            return self.nodes.get(*position);
        }
        let suffix = self.actor_suffix?;
        let stripped = key.strip_suffix(suffix)?;
        self.by_key
            .get(&loose_key(stripped))
            .and_then(|position| self.nodes.get(*position))
    }

    pub fn by_id(&self, nodeid: &str) -> Option<&IndexedNode> {
        self.by_id
            .get(nodeid)
            .and_then(|position| self.nodes.get(*position))
    }

    pub fn iter(&self) -> impl Iterator<Item = &IndexedNode> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Listing of the indexed nodes in schema order. Concept nodes with a
    /// vocabulary include its values.
    pub fn listings(&self) -> Vec<NodeListing> {
        self.nodes
            .iter()
            .map(|entry| NodeListing {
                nodeid: entry.node.nodeid.clone(),
                name: entry.node.name.clone(),
                datatype: entry.node.datatype.as_str().to_string(),
                key: entry.key.clone(),
                values: entry
                    .vocabulary
                    .as_ref()
                    .filter(|_| entry.node.datatype.is_concept())
                    .map(|vocabulary| vocabulary.values().to_vec()),
            })
            .collect()
    }
}
