//! Tile builder: resolved documents → resources with a forest of tiles.

use bus_model::{AppendMode, Diagnostics, Resource, Schema, StoreError, Tile};
use bus_standards::SheetProfile;
use serde_json::{Map, Value};
use tracing::debug;

use crate::identity::ResourceResolver;
use crate::ids::new_id;

const SUBJECT_KEY: &str = "_";

const APPEND_HELP: &str = "In append mode, the UNIQUEID column must contain a valid EAMENA ID, so the system knows which resource should be appended.";

/// A new tile of `nodegroup_id` with null placeholders for the group's date
/// and concept nodes.
pub fn new_tile(
    schema: &Schema,
    resource_id: &str,
    nodegroup_id: &str,
    parent: Option<String>,
) -> Tile {
    let mut tile = Tile::new(new_id(), nodegroup_id, resource_id, parent);
    for node in schema.nodes_in_group(nodegroup_id) {
        if node.datatype.has_tile_placeholder() {
            tile.data.insert(node.nodeid.clone(), Value::Null);
        }
    }
    tile
}

pub struct TileBuilder<'a> {
    schema: &'a Schema,
    profile: Option<&'a SheetProfile>,
    append_mode: AppendMode,
}

impl<'a> TileBuilder<'a> {
    pub fn new(schema: &'a Schema, profile: Option<&'a SheetProfile>) -> Self {
        Self {
            schema,
            profile,
            append_mode: AppendMode::New,
        }
    }

    #[must_use]
    pub fn with_append_mode(mut self, append_mode: AppendMode) -> Self {
        self.append_mode = append_mode;
        self
    }

    /// Builds one resource per document. Documents whose target resource
    /// cannot be determined are reported and skipped.
    pub fn build(
        &self,
        documents: &[Value],
        resolver: &mut ResourceResolver<'_>,
        diagnostics: &mut Diagnostics,
    ) -> Result<Vec<Resource>, StoreError> {
        let mut resources = Vec::with_capacity(documents.len());
        for document in documents {
            let Value::Object(document) = document else {
                continue;
            };
            if let Some(resource) = self.build_resource(document, resolver, diagnostics)? {
                resources.push(resource);
            }
        }
        debug!(
            documents = documents.len(),
            resources = resources.len(),
            tiles = resources.iter().map(|r| r.tiles.len()).sum::<usize>(),
            "tiles built"
        );
        Ok(resources)
    }

    fn build_resource(
        &self,
        document: &Map<String, Value>,
        resolver: &mut ResourceResolver<'_>,
        diagnostics: &mut Diagnostics,
    ) -> Result<Option<Resource>, StoreError> {
        let graph_id = self.schema.graph_id.as_str();
        let subject = document.get(SUBJECT_KEY).map(subject_text);
        let mut existing = None;
        let mut skipped_group = None;

        match (self.append_mode, subject.as_deref()) {
            (AppendMode::Append, None) => {
                diagnostics.error("", "Missing UNIQUEID", "");
                return Ok(None);
            }
            (AppendMode::Append, Some(business_id)) => {
                match resolver.resolve(graph_id, business_id, true)? {
                    Some(id) => existing = Some(id),
                    None => {
                        diagnostics.error(
                            business_id,
                            "Cannot resolve existing EAMENA ID",
                            APPEND_HELP,
                        );
                        return Ok(None);
                    }
                }
            }
            (AppendMode::New, Some(business_id)) => {
                if let Some(profile) = self.profile.filter(|p| p.upsert_by_identifier)
                    && let Some(id) = resolver.resolve(graph_id, business_id, false)?
                {
                    debug!(business_id, resource = %id, "extending existing resource");
                    existing = Some(id);
                    skipped_group = Some(profile.business_id_nodegroup);
                }
            }
            (AppendMode::New, None) => {}
        }

        let id = existing.unwrap_or_else(new_id);
        let mut resource = Resource::new(id.clone(), graph_id, id).with_subject(subject);
        for (key, value) in document {
            if key == SUBJECT_KEY || skipped_group == Some(key.as_str()) {
                continue;
            }
            self.flatten(value, key, None, &mut resource);
        }
        Ok(Some(resource))
    }

    /// Appends the tiles of `value`, stored under `nodegroup_id`.
    fn flatten(
        &self,
        value: &Value,
        nodegroup_id: &str,
        parent: Option<&str>,
        resource: &mut Resource,
    ) {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                for item in items {
                    self.flatten(item, nodegroup_id, parent, resource);
                }
            }
            Value::Object(fields) => {
                let mut tile = self.tile(resource, nodegroup_id, parent);
                let mut children = Vec::new();
                for (key, field) in fields {
                    let nested = matches!(field, Value::Array(_) | Value::Object(_));
                    if nested && self.schema.is_nodegroup(key) {
                        children.push((key, field));
                    } else {
                        tile.data.insert(key.clone(), field.clone());
                    }
                }
                let tileid = tile.tileid.clone();
                resource.tiles.push(tile);
                for (key, field) in children {
                    self.flatten(field, key, Some(&tileid), resource);
                }
            }
            scalar => {
                let mut tile = self.tile(resource, nodegroup_id, parent);
                tile.data.insert(nodegroup_id.to_string(), scalar.clone());
                resource.tiles.push(tile);
            }
        }
    }

    fn tile(&self, resource: &Resource, nodegroup_id: &str, parent: Option<&str>) -> Tile {
        new_tile(
            self.schema,
            resource.id(),
            nodegroup_id,
            parent.map(str::to_string),
        )
    }
}

fn subject_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
