//! Shared fixtures: a small Heritage Place schema, a Grid Square schema and
//! an in-memory sheet.

#![allow(dead_code)]

use std::path::Path;

use bus_model::{
    Cardinality, ControlledValue, Datatype, Direction, Language, MemoryStore, Node, NodeConfig,
    NodeGroup, RawRow, Result, RowSource, Schema, TargetGraph,
};
use bus_standards::{grid_square, heritage_place};
use serde_json::Value;

pub const HP: &str = heritage_place::GRAPH_ID;
pub const GRID: &str = grid_square::GRAPH_ID;
pub const EAMENA_ID: &str = heritage_place::BUSINESS_ID_NODEGROUP;

pub fn node(nodeid: &str, name: &str, datatype: Datatype, nodegroup: &str) -> Node {
    Node {
        nodeid: nodeid.to_string(),
        name: name.to_string(),
        datatype,
        nodegroup_id: Some(nodegroup.to_string()),
        config: NodeConfig::default(),
    }
}

pub fn concept(nodeid: &str, name: &str, nodegroup: &str, collection: &str) -> Node {
    let mut node = node(nodeid, name, Datatype::Concept, nodegroup);
    node.config.rdm_collection = Some(collection.to_string());
    node
}

pub fn reference(nodeid: &str, name: &str, datatype: Datatype, targets: &[&str]) -> Node {
    let mut node = node(nodeid, name, datatype, nodeid);
    node.config.graphs = targets
        .iter()
        .map(|graphid| TargetGraph {
            graphid: (*graphid).to_string(),
            ontology_property: "P53_has_former_or_current_location".to_string(),
            inverse_ontology_property: "P53i_is_former_or_current_location_of".to_string(),
        })
        .collect();
    node
}

pub fn group(id: &str, parent: Option<&str>) -> NodeGroup {
    NodeGroup {
        nodegroupid: id.to_string(),
        parentnodegroup_id: parent.map(str::to_string),
        cardinality: Cardinality::Many,
    }
}

pub fn heritage_schema() -> Schema {
    Schema {
        graph_id: HP.to_string(),
        name: "Heritage Place".to_string(),
        nodes: vec![
            node(EAMENA_ID, "EAMENA ID", Datatype::String, EAMENA_ID),
            node("n-name", "Resource Name", Datatype::String, "n-name"),
            node("ng-desc", "Description Assignment", Datatype::Semantic, "ng-desc"),
            node("n-desc", "General Description", Datatype::String, "ng-desc"),
            concept("n-type", "Heritage Place Type", "ng-desc", "c-types"),
            node("ng-assess", "Assessment Summary", Datatype::Semantic, "ng-assess"),
            concept("n-activity", "Assessment Activity Type", "ng-assess", "c-activity"),
            node("n-date", "Assessment Activity Date", Datatype::Date, "ng-assess"),
            node("ng-geo", "Geometry", Datatype::Semantic, "ng-geo"),
            node(
                "n-geo",
                "Geometric Place Expression",
                Datatype::GeojsonFeatureCollection,
                "ng-geo",
            ),
            node("ng-dist", "Disturbance Event", Datatype::Semantic, "ng-dist"),
            node("n-cause", "Disturbance Cause Type", Datatype::String, "ng-dist"),
            node("ng-effect", "Damage Observation", Datatype::Semantic, "ng-effect"),
            node("n-effect", "Effect Type", Datatype::String, "ng-effect"),
            reference("n-grid", "Grid ID", Datatype::ResourceInstance, &[GRID]),
            reference(
                "n-related",
                "HP Related Resource",
                Datatype::ResourceInstanceList,
                &[HP, GRID],
            ),
        ],
        nodegroups: vec![
            group(EAMENA_ID, None),
            group("n-name", None),
            group("ng-desc", None),
            group("ng-assess", None),
            group("ng-geo", None),
            group("ng-dist", None),
            group("ng-effect", Some("ng-dist")),
            group("n-grid", None),
            group("n-related", None),
        ],
    }
}

pub fn grid_schema() -> Schema {
    Schema {
        graph_id: GRID.to_string(),
        name: "Grid Square".to_string(),
        nodes: vec![
            node(grid_square::GRID_ID_NODE, "Grid ID", Datatype::NonLocalizedString, grid_square::GRID_ID_NODE),
            node("g-geo", "Grid Geometry", Datatype::GeojsonFeatureCollection, "g-geo"),
        ],
        nodegroups: vec![group(grid_square::GRID_ID_NODE, None), group("g-geo", None)],
    }
}

pub fn value(valueid: &str, label: &str) -> ControlledValue {
    ControlledValue {
        valueid: valueid.to_string(),
        conceptid: format!("c-{valueid}"),
        label: label.to_string(),
    }
}

/// Store holding both schemas, their vocabularies and English.
pub fn store() -> MemoryStore {
    MemoryStore::new()
        .with_schema(heritage_schema())
        .with_schema(grid_schema())
        .with_collection("c-types", vec![value("v-1", "Settlement"), value("v-2", "Tomb")])
        .with_collection(
            "c-activity",
            vec![value("v-10", "Desk-based Assessment"), value("v-11", "Field Survey")],
        )
        .with_language(Language::new("en", Direction::Ltr))
}

pub fn row(cells: &[(&str, &str)]) -> RawRow {
    cells
        .iter()
        .map(|(header, value)| ((*header).to_string(), Value::String((*value).to_string())))
        .collect()
}

/// Rows served from memory; the path is ignored.
#[derive(Debug, Clone, Default)]
pub struct Sheet {
    pub columns: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl Sheet {
    pub fn new(rows: Vec<RawRow>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for (header, _) in rows.iter().flatten() {
            if !columns.contains(header) {
                columns.push(header.clone());
            }
        }
        Self { columns, rows }
    }
}

impl RowSource for Sheet {
    fn columns(&self, _source: &Path) -> Result<Vec<String>> {
        Ok(self.columns.clone())
    }

    fn rows(&self, _source: &Path) -> Result<Vec<RawRow>> {
        Ok(self.rows.clone())
    }
}

pub fn sheet_path() -> &'static Path {
    Path::new("sheet.csv")
}
