//! Datatype mapper: converts raw tile values according to node datatypes.
//!
//! Failures are recorded against the resource's subject and the raw value is
//! kept, so one bad cell never stops the rest of the run.

use std::collections::BTreeMap;

use bus_model::{
    Datatype, Diagnostics, GeometryProbe, Language, Node, Resource, Schema, StoreError,
};
use serde_json::{Value, json};
use tracing::trace;

use crate::dates::normalize_date;
use crate::geometry::{geojson_from_wkt, stamp_node_id};
use crate::identity::ResourceResolver;
use crate::ids::new_id;

const GEOMETRY_HELP: &str = "Please check your geometry data is in the WKT format, all co-ordinates are two-dimensional, and no co-ordinates are duplicated.";

pub struct DatatypeMapper<'a> {
    schema: &'a Schema,
    language: Language,
    probe: &'a dyn GeometryProbe,
    /// Graph id → display name, for reference failure help texts.
    graph_names: &'a BTreeMap<String, String>,
}

impl<'a> DatatypeMapper<'a> {
    pub fn new(
        schema: &'a Schema,
        language: Language,
        probe: &'a dyn GeometryProbe,
        graph_names: &'a BTreeMap<String, String>,
    ) -> Self {
        Self {
            schema,
            language,
            probe,
            graph_names,
        }
    }

    pub fn map_resources(
        &self,
        resources: &mut [Resource],
        resolver: &mut ResourceResolver<'_>,
        diagnostics: &mut Diagnostics,
    ) -> Result<(), StoreError> {
        for resource in resources {
            self.map_resource(resource, resolver, diagnostics)?;
        }
        Ok(())
    }

    pub fn map_resource(
        &self,
        resource: &mut Resource,
        resolver: &mut ResourceResolver<'_>,
        diagnostics: &mut Diagnostics,
    ) -> Result<(), StoreError> {
        let subject = resource.subject().to_string();
        for tile in &mut resource.tiles {
            for (key, value) in &mut tile.data {
                if value.is_null() {
                    continue;
                }
                let Some(node) = self.schema.node(key) else {
                    continue;
                };
                self.map_value(node, value, &subject, resolver, diagnostics)?;
            }
        }
        Ok(())
    }

    fn map_value(
        &self,
        node: &Node,
        value: &mut Value,
        subject: &str,
        resolver: &mut ResourceResolver<'_>,
        diagnostics: &mut Diagnostics,
    ) -> Result<(), StoreError> {
        match &node.datatype {
            Datatype::String => {
                if !value.is_object() {
                    *value = json!({
                        (self.language.code.as_str()): {
                            "value": text_of(value),
                            "direction": self.language.default_direction.as_str(),
                        }
                    });
                }
            }
            Datatype::Date => {
                let raw = text_of(value);
                match normalize_date(&raw) {
                    Some(date) => *value = Value::String(date),
                    None => diagnostics.error(
                        subject,
                        format!("Cannot parse date string: \"{raw}\""),
                        "",
                    ),
                }
            }
            Datatype::ConceptList => {
                if !value.is_array() && !value.is_object() {
                    *value = Value::Array(vec![value.take()]);
                }
            }
            Datatype::GeojsonFeatureCollection => {
                if let Value::String(text) = value {
                    match geojson_from_wkt(text, self.probe)? {
                        Some(mut collection) => {
                            stamp_node_id(&mut collection, &node.nodeid);
                            *value = collection;
                        }
                        None => diagnostics.error(subject, "Invalid geometry.", GEOMETRY_HELP),
                    }
                }
            }
            Datatype::ResourceInstance | Datatype::ResourceInstanceList => {
                if !value.is_array() {
                    self.map_reference(node, value, subject, resolver, diagnostics)?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn map_reference(
        &self,
        node: &Node,
        value: &mut Value,
        subject: &str,
        resolver: &mut ResourceResolver<'_>,
        diagnostics: &mut Diagnostics,
    ) -> Result<(), StoreError> {
        let raw = text_of(value);
        for target in &node.config.graphs {
            if let Some(resource_id) = resolver.resolve(&target.graphid, &raw, false)? {
                trace!(nodeid = %node.nodeid, target = %target.graphid, "reference resolved");
                *value = json!([{
                    "ontologyProperty": target.ontology_property,
                    "inverseOntologyProperty": target.inverse_ontology_property,
                    "resourceId": resource_id,
                    "resourceXresourceId": new_id(),
                }]);
                return Ok(());
            }
        }
        let expected: Vec<&str> = node
            .config
            .graphs
            .iter()
            .map(|target| {
                self.graph_names
                    .get(&target.graphid)
                    .map_or(target.graphid.as_str(), String::as_str)
            })
            .collect();
        diagnostics.error(
            subject,
            format!("Cannot resolve linked resource: '{raw}' is not in the database."),
            format!("Expecting: {}", expected.join(", ")),
        );
        Ok(())
    }
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
