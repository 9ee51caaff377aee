mod common;

use std::collections::BTreeMap;

use bus_core::{BulkUploader, ImportSummary};
use bus_model::{
    BusinessDataDocument, MemoryStore, RawRow, Resource, ResourceStore, RunOptions, Tile,
};
use bus_standards::grid_square;
use common::{EAMENA_ID, GRID, HP, Sheet, row, sheet_path, store};
use serde_json::{Value, json};

fn place(id: &str, cells: &[(&str, &str)]) -> RawRow {
    let mut cells = cells.to_vec();
    cells.insert(0, ("UNIQUEID", id));
    row(&cells)
}

fn stored(id: &str, graph: &str, tiles: &[(&str, Value)]) -> Resource {
    let mut resource = Resource::new(id, graph, id);
    for (position, (nodegroup, value)) in tiles.iter().enumerate() {
        let mut tile = Tile::new(format!("{id}-t{position}"), *nodegroup, id, None);
        tile.data.insert((*nodegroup).to_string(), value.clone());
        resource.tiles.push(tile);
    }
    resource
}

fn listing(ids: &[&str]) -> BusinessDataDocument {
    BusinessDataDocument::new(ids.iter().map(|id| Resource::new(*id, HP, *id)).collect())
}

// =============================================================================
// Prerequisites
// =============================================================================

#[test]
fn unresolved_references_get_one_placeholder_each() {
    let mut store = store().with_business_id(GRID, "E35N33-11", "g-1");
    let sheet = Sheet::new(vec![
        place("EAMENA-1", &[("GRID_ID", "E99N99-99")]),
        place(
            "EAMENA-2",
            &[("GRID_ID", "E99N99-99"), ("HP_RELATED_RESOURCE", "E99N99-99")],
        ),
        place(
            "EAMENA-3",
            &[("GRID_ID", "E35N33-11"), ("HP_RELATED_RESOURCE", "E10N10-10")],
        ),
    ]);
    let mut uploader = BulkUploader::new(&mut store, &sheet, RunOptions::new().with_graph(HP));
    let output = uploader.prerequisites(Some(sheet_path()));
    assert!(output.report.errors.is_empty());

    let placeholders = output.data.resources();
    let identifiers: Vec<&Value> = placeholders
        .iter()
        .map(|resource| {
            assert_eq!(resource.graph_id(), GRID);
            assert_eq!(resource.tiles.len(), 1);
            assert_eq!(resource.tiles[0].nodegroup_id, grid_square::GRID_ID_NODE);
            &resource.tiles[0].data[grid_square::GRID_ID_NODE]
        })
        .collect();
    assert_eq!(identifiers, [&json!("E99N99-99"), &json!("E10N10-10")]);
}

#[test]
fn resolvable_references_need_no_placeholders() {
    let mut store = store().with_business_id(GRID, "E35N33-11", "g-1");
    let sheet = Sheet::new(vec![place("EAMENA-1", &[("GRID_ID", "E35N33-11")])]);
    let mut uploader = BulkUploader::new(&mut store, &sheet, RunOptions::new().with_graph(HP));
    let output = uploader.prerequisites(Some(sheet_path()));
    assert!(output.data.is_empty());
    assert!(output.report.warnings.is_empty());
}

// =============================================================================
// Annotation
// =============================================================================

#[test]
fn annotation_names_groups_fields_and_concepts() {
    let mut store = store();
    let sheet = Sheet::new(vec![place(
        "EAMENA-1",
        &[("GENERAL_DESCRIPTION", "A large mound."), ("HERITAGE_PLACE_TYPE", "Settlement")],
    )]);
    let mut uploader = BulkUploader::new(&mut store, &sheet, RunOptions::new().with_graph(HP));
    let document = uploader.convert(Some(sheet_path())).data.expect("document");
    let output = uploader.annotate(document);
    assert!(output.report.errors.is_empty());

    let tile = &output.data.resources()[0].tiles[0];
    assert_eq!(tile.nodegroup_name.as_deref(), Some("Description Assignment"));
    let fields = tile.data_fields.as_ref().expect("fields");
    assert_eq!(fields["n-desc"], "General Description");
    assert_eq!(fields["n-type"], "Heritage Place Type");
    assert_eq!(
        tile.concept_labels,
        Some(BTreeMap::from([("v-1".to_string(), "Settlement".to_string())]))
    );

    let serialized = serde_json::to_value(&output.data).expect("serialize");
    let tile = &serialized["business_data"]["resources"][0]["tiles"][0];
    assert_eq!(tile["nodegroup_name"], "Description Assignment");
}

#[test]
fn annotation_needs_a_graph() {
    let mut store = store();
    let sheet = Sheet::default();
    let mut uploader = BulkUploader::new(&mut store, &sheet, RunOptions::new());
    let output = uploader.annotate(listing(&["r-1"]));
    assert!(output.data.is_empty());
    assert_eq!(
        output.report.errors[0].message,
        "Invalid or missing graph UUID. Use --graph"
    );
}

// =============================================================================
// Summary
// =============================================================================

#[test]
fn summary_pairs_ids_with_stored_identifiers() {
    let mut store = store()
        .with_resource(stored(
            "r-1",
            HP,
            &[(EAMENA_ID, json!({"en": {"value": "EAMENA-0000001", "direction": "ltr"}}))],
        ))
        .with_resource(stored("r-2", HP, &[("n-name", json!("Tell"))]))
        .with_resource(stored("g-1", GRID, &[(grid_square::GRID_ID_NODE, json!("E35N33-11"))]));
    let sheet = Sheet::default();
    let mut uploader = BulkUploader::new(&mut store, &sheet, RunOptions::new());
    let mut document = listing(&["r-1", "r-2", "r-3"]);
    document
        .resources_mut()
        .push(Resource::new("g-1", GRID, "g-1"));
    let output = uploader.summary(&document);
    assert_eq!(
        output.data,
        vec![
            ImportSummary {
                uuid: "r-1".to_string(),
                eamenaid: "EAMENA-0000001".to_string(),
            },
            ImportSummary {
                uuid: "g-1".to_string(),
                eamenaid: "E35N33-11".to_string(),
            },
        ]
    );
    assert!(output.report.errors.is_empty());
}

// =============================================================================
// Undo
// =============================================================================

#[test]
fn undo_deletes_known_resources_only() {
    let mut store = MemoryStore::new()
        .with_resource(stored("r-1", HP, &[("n-name", json!("A")), ("n-name", json!("B"))]))
        .with_resource(stored("r-2", HP, &[("n-name", json!("C"))]));
    let sheet = Sheet::default();
    let output = {
        let mut uploader = BulkUploader::new(&mut store, &sheet, RunOptions::new());
        uploader.undo(&listing(&["r-1", "r-2", "r-missing"]))
    };
    assert_eq!(
        serde_json::to_value(output.data).expect("serialize"),
        json!([2, 2, 3])
    );
    assert_eq!(store.calls().delete, 2);
    assert!(!store.exists("r-1").expect("exists"));
    assert!(!store.exists("r-2").expect("exists"));
}

#[test]
fn undo_of_empty_document_reports_no_data() {
    let mut store = MemoryStore::new();
    let sheet = Sheet::default();
    let mut uploader = BulkUploader::new(&mut store, &sheet, RunOptions::new());
    let output = uploader.undo(&BusinessDataDocument::default());
    assert_eq!(output.data.processed, 0);
    assert_eq!(output.report.warnings.len(), 1);
}
