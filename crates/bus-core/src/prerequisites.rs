//! Placeholder resources for references that cannot be resolved.

use std::collections::{BTreeMap, BTreeSet};

use bus_model::{Resource, Schema, SchemaStore, StoreError, TargetGraph, Tile};
use bus_standards::hash::placeholder_key;
use bus_standards::{PlaceholderTemplate, placeholder_template};
use serde_json::Value;
use tracing::debug;

use crate::identity::ResourceResolver;
use crate::ids::new_id;
use crate::tiles::new_tile;

pub struct PrerequisiteResolver<'a> {
    schema: &'a Schema,
    schemas: &'a dyn SchemaStore,
    target_schemas: BTreeMap<String, Option<Schema>>,
}

impl<'a> PrerequisiteResolver<'a> {
    pub fn new(schema: &'a Schema, schemas: &'a dyn SchemaStore) -> Self {
        Self {
            schema,
            schemas,
            target_schemas: BTreeMap::new(),
        }
    }

    /// One placeholder resource per distinct unresolved reference, in the
    /// order the references are first seen.
    pub fn resolve(
        &mut self,
        resources: &[Resource],
        resolver: &mut ResourceResolver<'_>,
    ) -> Result<Vec<Resource>, StoreError> {
        let schema = self.schema;
        let mut seen = BTreeSet::new();
        let mut placeholders = Vec::new();
        for tile in resources.iter().flat_map(|resource| &resource.tiles) {
            for (key, value) in &tile.data {
                let Value::String(raw) = value else {
                    continue;
                };
                let Some(node) = schema.node(key) else {
                    continue;
                };
                if !node.datatype.is_reference() {
                    continue;
                }
                if resolves(&node.config.graphs, raw, resolver)? {
                    continue;
                }
                let Some((target, template)) = first_template(&node.config.graphs) else {
                    debug!(nodeid = %node.nodeid, "no placeholder template for reference targets");
                    continue;
                };
                if !seen.insert(placeholder_key(raw, &target.graphid)) {
                    continue;
                }
                placeholders.push(self.placeholder(template, raw)?);
            }
        }
        debug!(placeholders = placeholders.len(), "prerequisites resolved");
        Ok(placeholders)
    }

    fn placeholder(
        &mut self,
        template: &PlaceholderTemplate,
        raw: &str,
    ) -> Result<Resource, StoreError> {
        let id = new_id();
        let mut resource = Resource::new(id.clone(), template.graph_id, id.clone());
        let mut tile = match self.target_schema(template.graph_id)? {
            Some(schema) => new_tile(schema, &id, template.nodegroup_id, None),
            None => Tile::new(new_id(), template.nodegroup_id, &id, None),
        };
        tile.data.insert(
            template.identifier_node.to_string(),
            Value::String(raw.to_string()),
        );
        for node in template.null_nodes {
            tile.data.insert((*node).to_string(), Value::Null);
        }
        resource.tiles.push(tile);
        Ok(resource)
    }

    fn target_schema(&mut self, graph_id: &str) -> Result<Option<&Schema>, StoreError> {
        if !self.target_schemas.contains_key(graph_id) {
            let schema = self.schemas.get_schema(graph_id)?;
            self.target_schemas.insert(graph_id.to_string(), schema);
        }
        Ok(self.target_schemas.get(graph_id).and_then(Option::as_ref))
    }
}

fn resolves(
    targets: &[TargetGraph],
    raw: &str,
    resolver: &mut ResourceResolver<'_>,
) -> Result<bool, StoreError> {
    for target in targets {
        if resolver.resolve(&target.graphid, raw, false)?.is_some() {
            return Ok(true);
        }
    }
    Ok(false)
}

fn first_template(
    targets: &[TargetGraph],
) -> Option<(&TargetGraph, &'static PlaceholderTemplate)> {
    targets.iter().find_map(|target| {
        placeholder_template(&target.graphid).map(|template| (target, template))
    })
}
