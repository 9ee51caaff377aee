use bus_ingest::Unflattener;
use bus_map::NodeIndex;
use bus_model::{
    Cardinality, Datatype, Diagnostics, Node, NodeConfig, NodeGroup, RawRow, Schema,
};
use bus_standards::{grid_square, heritage_place};
use serde_json::{Value, json};

fn node(nodeid: &str, name: &str, datatype: Datatype, nodegroup: &str) -> Node {
    Node {
        nodeid: nodeid.to_string(),
        name: name.to_string(),
        datatype,
        nodegroup_id: Some(nodegroup.to_string()),
        config: NodeConfig::default(),
    }
}

fn group(id: &str, parent: Option<&str>) -> NodeGroup {
    NodeGroup {
        nodegroupid: id.to_string(),
        parentnodegroup_id: parent.map(str::to_string),
        cardinality: Cardinality::Many,
    }
}

fn heritage_schema() -> Schema {
    Schema {
        graph_id: heritage_place::GRAPH_ID.to_string(),
        name: "Heritage Place".to_string(),
        nodes: vec![
            node("n-name", "Resource Name", Datatype::String, "n-name"),
            node("ng-desc", "Description Assignment", Datatype::Semantic, "ng-desc"),
            node("n-desc", "General Description", Datatype::String, "ng-desc"),
            node("n-type", "Heritage Place Type", Datatype::Concept, "ng-desc"),
            node("ng-dist", "Disturbance Event", Datatype::Semantic, "ng-dist"),
            node("n-cause", "Disturbance Cause Type", Datatype::String, "ng-dist"),
            node("ng-effect", "Damage Observation", Datatype::Semantic, "ng-effect"),
            node("n-effect", "Effect Type", Datatype::String, "ng-effect"),
        ],
        nodegroups: vec![
            group("n-name", None),
            group("ng-desc", None),
            group("ng-dist", None),
            group("ng-effect", Some("ng-dist")),
        ],
    }
}

fn row(cells: &[(&str, &str)]) -> RawRow {
    cells
        .iter()
        .map(|(header, value)| ((*header).to_string(), Value::String((*value).to_string())))
        .collect()
}

fn unflatten(schema: &Schema, rows: &[RawRow]) -> Vec<Value> {
    let profile = &heritage_place::PROFILE;
    let index = NodeIndex::build(schema, Some(profile));
    Unflattener::new(schema, profile, &index).unflatten(rows)
}

// =========================================================================
// Grouping
// =========================================================================

#[test]
fn single_row_groups_cells_by_nodegroup() {
    let schema = heritage_schema();
    let documents = unflatten(
        &schema,
        &[row(&[
            ("UNIQUEID", "EAMENA-0000001"),
            ("Resource Name", "Tell Ahmar"),
            ("GENERAL_DESCRIPTION", "A large mound."),
            ("HERITAGE_PLACE_TYPE", "Settlement"),
        ])],
    );
    assert_eq!(
        documents,
        vec![json!({
            "_": "EAMENA-0000001",
            "RESOURCE_NAME": ["Tell Ahmar"],
            "DESCRIPTION_ASSIGNMENT": [{
                "GENERAL_DESCRIPTION": "A large mound.",
                "HERITAGE_PLACE_TYPE": "Settlement"
            }]
        })]
    );
}

#[test]
fn continuation_rows_extend_the_previous_resource() {
    let schema = heritage_schema();
    let documents = unflatten(
        &schema,
        &[
            row(&[
                ("UNIQUEID", "EAMENA-0000001"),
                ("DISTURBANCE_CAUSE_TYPE", "Agriculture"),
                ("EFFECT_TYPE", "Cut"),
            ]),
            row(&[("UNIQUEID", ""), ("DISTURBANCE_CAUSE_TYPE", ""), ("EFFECT_TYPE", "Erosion")]),
            row(&[("UNIQUEID", " "), ("DISTURBANCE_CAUSE_TYPE", "Looting")]),
            row(&[("UNIQUEID", "EAMENA-0000002"), ("RESOURCE_NAME", "Tell Brak")]),
        ],
    );
    assert_eq!(documents.len(), 2);
    assert_eq!(
        documents[0]["DISTURBANCE_EVENT"],
        json!([
            {
                "DISTURBANCE_CAUSE_TYPE": "Agriculture",
                "DAMAGE_OBSERVATION": [{"EFFECT_TYPE": "Cut"}, {"EFFECT_TYPE": "Erosion"}]
            },
            {"DISTURBANCE_CAUSE_TYPE": "Looting"}
        ])
    );
    assert_eq!(documents[1]["_"], "EAMENA-0000002");
}

#[test]
fn child_group_without_parent_values_gets_an_empty_parent() {
    let schema = heritage_schema();
    let documents = unflatten(
        &schema,
        &[row(&[("UNIQUEID", "EAMENA-0000001"), ("EFFECT_TYPE", "Cut")])],
    );
    assert_eq!(
        documents[0]["DISTURBANCE_EVENT"],
        json!([{"DAMAGE_OBSERVATION": [{"EFFECT_TYPE": "Cut"}]}])
    );
}

#[test]
fn rows_without_identifier_column_are_separate_resources() {
    let schema = heritage_schema();
    let documents = unflatten(
        &schema,
        &[
            row(&[("RESOURCE_NAME", "One")]),
            row(&[("RESOURCE_NAME", "")]),
            row(&[("RESOURCE_NAME", "Two")]),
        ],
    );
    assert_eq!(
        documents,
        vec![json!({"RESOURCE_NAME": ["One"]}), json!({"RESOURCE_NAME": ["Two"]})]
    );
}

#[test]
fn node_backed_identifier_is_also_a_value() {
    let schema = Schema {
        graph_id: grid_square::GRAPH_ID.to_string(),
        name: "Grid Square".to_string(),
        nodes: vec![
            node(grid_square::GRID_ID_NODE, "Grid ID", Datatype::String, grid_square::GRID_ID_NODE),
            node("n-geom", "Grid Geometry", Datatype::GeojsonFeatureCollection, "n-geom"),
        ],
        nodegroups: vec![group(grid_square::GRID_ID_NODE, None), group("n-geom", None)],
    };
    let profile = &grid_square::PROFILE;
    let index = NodeIndex::build(&schema, Some(profile));
    let documents = Unflattener::new(&schema, profile, &index).unflatten(&[row(&[
        ("Grid ID", "E35N42-11"),
        ("GRID_GEOMETRY", "POLYGON((35 42, 35.25 42, 35.25 42.25, 35 42))"),
    ])]);
    assert_eq!(documents[0]["_"], "E35N42-11");
    assert_eq!(documents[0]["GRID_ID"], json!(["E35N42-11"]));
    assert!(documents[0]["GRID_GEOMETRY"][0].is_string());
}

// =========================================================================
// Header checks
// =========================================================================

#[test]
fn unexpected_headers_warn_once() {
    let schema = heritage_schema();
    let profile = &heritage_place::PROFILE;
    let index = NodeIndex::build(&schema, Some(profile));
    let unflattener = Unflattener::new(&schema, profile, &index);
    let columns: Vec<String> = ["UNIQUEID", "Favourite Colour", "", "Favourite Colour", "EFFECT_TYPE"]
        .iter()
        .map(|column| (*column).to_string())
        .collect();
    let mut diagnostics = Diagnostics::new();
    unflattener.check_columns(&columns, &mut diagnostics);
    assert_eq!(diagnostics.error_count(), 0);
    assert_eq!(diagnostics.warning_count(), 1);
    let warning = &diagnostics.warnings()[0];
    assert_eq!(warning.message, "Unexpected column header: \"Favourite Colour\"");
    assert_eq!(
        warning.help,
        "Please check you are using the correct version of the Heritage Place bulk upload template."
    );
}
