mod common;

use bus_core::{BulkUploader, RunOutput};
use bus_ingest::CsvRowSource;
use bus_model::{
    AppendMode, BusinessDataDocument, Direction, ErrorRecord, Language, MemoryStore, RawRow,
    RunOptions, Schema, WarnMode,
};
use bus_validate::{EMPTY_RUN_HELP, EMPTY_RUN_MESSAGE};
use common::{
    GRID, HP, Sheet, concept, group, heritage_schema, row, sheet_path, store, value,
};
use serde_json::{Value, json};

fn options() -> RunOptions {
    RunOptions::new().with_graph(HP)
}

fn convert(
    store: &mut MemoryStore,
    rows: Vec<RawRow>,
    options: RunOptions,
) -> RunOutput<Option<BusinessDataDocument>> {
    let sheet = Sheet::new(rows);
    let mut uploader = BulkUploader::new(store, &sheet, options);
    uploader.convert(Some(sheet_path()))
}

fn validate(store: &mut MemoryStore, rows: Vec<RawRow>, options: RunOptions) -> Vec<ErrorRecord> {
    let sheet = Sheet::new(rows);
    let mut uploader = BulkUploader::new(store, &sheet, options);
    uploader.validate(Some(sheet_path())).data
}

fn place(id: &str, cells: &[(&str, &str)]) -> RawRow {
    let mut cells = cells.to_vec();
    cells.insert(0, ("UNIQUEID", id));
    row(&cells)
}

fn only_tile_value(document: &BusinessDataDocument, nodeid: &str) -> Value {
    let resource = &document.resources()[0];
    resource
        .tiles
        .iter()
        .find_map(|tile| tile.data.get(nodeid).cloned())
        .expect("node value")
}

// =============================================================================
// Conversion
// =============================================================================

#[test]
fn single_row_becomes_one_resource() {
    let mut store = store();
    let rows = vec![place(
        "EAMENA-0000001",
        &[("GENERAL_DESCRIPTION", "A large mound."), ("HERITAGE_PLACE_TYPE", "Settlement")],
    )];
    let output = convert(&mut store, rows, options());
    assert!(output.report.errors.is_empty());
    assert!(output.report.warnings.is_empty());

    let document = output.data.expect("document");
    assert_eq!(document.resources().len(), 1);
    let resource = &document.resources()[0];
    assert_eq!(resource.graph_id(), HP);
    assert_eq!(resource.resourceinstance.legacyid, resource.id());
    assert_eq!(resource.tiles.len(), 1);

    let tile = &resource.tiles[0];
    assert_eq!(tile.nodegroup_id, "ng-desc");
    assert_eq!(tile.parenttile_id, None);
    assert_eq!(tile.data.get("n-type"), Some(&json!("v-1")));
    assert_eq!(
        tile.data.get("n-desc"),
        Some(&json!({"en": {"value": "A large mound.", "direction": "ltr"}}))
    );
}

#[test]
fn continuation_rows_add_tiles_to_the_same_resource() {
    let mut store = store();
    let rows = vec![
        place("EAMENA-0000001", &[("RESOURCE_NAME", "Tell Ahmar")]),
        place("", &[("RESOURCE_NAME", "Til Barsip")]),
        place("EAMENA-0000002", &[("RESOURCE_NAME", "Tell Halaf")]),
    ];
    let document = convert(&mut store, rows, options()).data.expect("document");
    let resources = document.resources();
    assert_eq!(resources.len(), 2);
    assert_eq!(resources[0].tiles.len(), 2);
    assert_eq!(resources[1].tiles.len(), 1);
}

#[test]
fn dates_are_normalized_and_bad_dates_reported() {
    let mut store = store();
    let rows = vec![
        place("EAMENA-0000001", &[("ASSESSMENT_ACTIVITY_DATE", "05/11/2019")]),
        place("EAMENA-0000002", &[("ASSESSMENT_ACTIVITY_DATE", "yesterday")]),
    ];
    let output = convert(&mut store, rows, options());
    assert!(output.data.is_none());
    assert_eq!(
        output.report.errors,
        vec![ErrorRecord::new(
            "EAMENA-0000002",
            "Cannot parse date string: \"yesterday\"",
            ""
        )]
    );

    let rows = vec![place("EAMENA-0000001", &[("ASSESSMENT_ACTIVITY_DATE", "05/11/2019")])];
    let document = convert(&mut store, rows, options()).data.expect("document");
    assert_eq!(only_tile_value(&document, "n-date"), json!("2019-11-05"));
}

#[test]
fn geometry_becomes_a_stamped_feature_collection() {
    let mut store = store();
    let rows = vec![place("EAMENA-0000001", &[("GEOMETRIC_PLACE_EXPRESSION", "POINT (36.2 30.5)")])];
    let document = convert(&mut store, rows, options()).data.expect("document");
    let collection = only_tile_value(&document, "n-geo");
    assert_eq!(collection["type"], "FeatureCollection");
    assert_eq!(collection["features"][0]["properties"]["nodeId"], "n-geo");
    assert_eq!(collection["features"][0]["geometry"]["type"], "Point");
    assert_eq!(store.calls().probe, 1);
}

#[test]
fn rejected_geometry_is_an_error() {
    let mut store = store().rejecting_geometry();
    let rows = vec![place("EAMENA-0000001", &[("GEOMETRIC_PLACE_EXPRESSION", "POINT (36.2 30.5)")])];
    let output = convert(&mut store, rows, options());
    assert!(output.data.is_none());
    assert_eq!(output.report.errors[0].message, "Invalid geometry.");
    assert!(output.report.errors[0].help.contains("WKT format"));
}

#[test]
fn references_resolve_to_relation_lists() {
    let mut store = store().with_business_id(GRID, "E35N33-11", "g-1");
    let rows = vec![place("EAMENA-0000001", &[("GRID_ID", "E35N33-11")])];
    let document = convert(&mut store, rows, options()).data.expect("document");
    let relations = only_tile_value(&document, "n-grid");
    assert_eq!(relations[0]["resourceId"], "g-1");
    assert_eq!(relations[0]["ontologyProperty"], "P53_has_former_or_current_location");
    assert!(relations[0]["resourceXresourceId"].as_str().is_some_and(|id| id.len() == 36));
}

#[test]
fn unresolvable_reference_names_expected_graphs() {
    let mut store = store();
    let rows = vec![place("EAMENA-0000001", &[("HP_RELATED_RESOURCE", "EAMENA-9999999")])];
    let output = convert(&mut store, rows, options());
    assert!(output.data.is_none());
    assert_eq!(
        output.report.errors,
        vec![ErrorRecord::new(
            "EAMENA-0000001",
            "Cannot resolve linked resource: 'EAMENA-9999999' is not in the database.",
            "Expecting: Heritage Place, Grid Square"
        )]
    );
}

// =============================================================================
// Concepts
// =============================================================================

#[test]
fn near_miss_concept_warns_but_converts() {
    let mut store = store();
    let rows = vec![place("EAMENA-0000001", &[("HERITAGE_PLACE_TYPE", "settlement")])];
    let output = convert(&mut store, rows, options());
    assert!(output.report.errors.is_empty());
    assert_eq!(
        output.report.warnings,
        vec![ErrorRecord::new(
            "EAMENA-0000001",
            "Invalid concept value 'settlement'",
            "Did you mean 'Settlement'?"
        )]
    );
    let document = output.data.expect("document");
    assert_eq!(only_tile_value(&document, "n-type"), json!("v-1"));
}

#[test]
fn template_spelling_alias_is_accepted() {
    let mut store = store();
    let rows = vec![place("EAMENA-0000001", &[("ASSESSMENT_ACTIVITY_TYPE", "Desk Based Assessment")])];
    let output = convert(&mut store, rows, options());
    assert!(output.report.warnings.is_empty());
    let document = output.data.expect("document");
    assert_eq!(only_tile_value(&document, "n-activity"), json!("v-10"));
}

#[test]
fn unknown_concept_lists_valid_values() {
    let mut store = store();
    let rows = vec![place("EAMENA-0000001", &[("HERITAGE_PLACE_TYPE", "Tmb")])];
    let output = convert(&mut store, rows, options());
    assert!(output.data.is_none());
    assert_eq!(
        output.report.errors,
        vec![ErrorRecord::new(
            "EAMENA-0000001",
            "Invalid concept value \"Tmb\" for \"Heritage Place Type\".",
            "Valid values: 'Settlement', 'Tomb'. Did you mean 'Tomb'?"
        )]
    );
}

// =============================================================================
// Warning policy
// =============================================================================

#[test]
fn strict_mode_blocks_output_on_warnings() {
    let mut store = store();
    let rows = vec![place("EAMENA-0000001", &[("HERITAGE_PLACE_TYPE", "settlement")])];
    let output = convert(&mut store, rows, options().with_warn_mode(WarnMode::Strict));
    assert!(output.data.is_none());
    assert_eq!(output.report.errors.len(), 1);
    assert!(output.report.warnings.is_empty());
}

#[test]
fn ignore_mode_drops_warnings() {
    let mut store = store();
    let rows = vec![place("EAMENA-0000001", &[("COLOUR", "red"), ("RESOURCE_NAME", "Tell")])];
    let output = convert(&mut store, rows, options().with_warn_mode(WarnMode::Ignore));
    assert!(output.data.is_some());
    assert!(output.report.warnings.is_empty());
}

#[test]
fn unexpected_columns_warn_once() {
    let mut store = store();
    let rows = vec![
        place("EAMENA-0000001", &[("COLOUR", "red")]),
        place("EAMENA-0000002", &[("COLOUR", "blue")]),
    ];
    let output = convert(&mut store, rows, options());
    assert_eq!(output.report.warnings.len(), 1);
    assert_eq!(output.report.warnings[0].subject, "");
    assert_eq!(output.report.warnings[0].message, "Unexpected column header: \"COLOUR\"");
}

#[test]
fn empty_sheet_reports_no_valid_data() {
    let mut store = store();
    let output = convert(&mut store, Vec::new(), options());
    assert_eq!(
        output.report.warnings,
        vec![ErrorRecord::new("", EMPTY_RUN_MESSAGE, EMPTY_RUN_HELP)]
    );
    assert!(output.data.is_some_and(|document| document.is_empty()));
}

#[test]
fn validate_sorts_records_naturally() {
    let mut store = store();
    let rows = vec![
        place("EAMENA-10", &[("HERITAGE_PLACE_TYPE", "Tmb")]),
        place("EAMENA-2", &[("HERITAGE_PLACE_TYPE", "settlement")]),
        place("EAMENA-2", &[("ASSESSMENT_ACTIVITY_DATE", "never")]),
    ];
    let records = validate(&mut store, rows, options());
    let subjects: Vec<&str> = records.iter().map(|record| record.subject.as_str()).collect();
    assert_eq!(subjects, ["EAMENA-2", "EAMENA-2", "EAMENA-10"]);
    assert_eq!(records[0].message, "Cannot parse date string: \"never\"");
    assert_eq!(records[1].message, "Invalid concept value 'settlement'");
}

#[test]
fn validate_order_ignores_subject_case() {
    let mut store = store();
    let rows = vec![
        place("B-1", &[("ASSESSMENT_ACTIVITY_DATE", "never")]),
        place("a-2", &[("ASSESSMENT_ACTIVITY_DATE", "soon")]),
    ];
    let records = validate(&mut store, rows, options());
    let subjects: Vec<&str> = records.iter().map(|record| record.subject.as_str()).collect();
    assert_eq!(subjects, ["a-2", "B-1"]);
}

// =============================================================================
// Append mode
// =============================================================================

#[test]
fn append_mode_requires_known_identifiers() {
    let mut store = store().with_business_id(HP, "EAMENA-0000001", "r-1");
    let rows = vec![
        place("EAMENA-0000001", &[("RESOURCE_NAME", "Tell")]),
        place("EAMENA-0000404", &[("RESOURCE_NAME", "Tell")]),
    ];
    let output = convert(
        &mut store,
        rows,
        options().with_append_mode(AppendMode::Append),
    );
    assert!(output.data.is_none());
    assert_eq!(output.report.errors.len(), 1);
    assert_eq!(output.report.errors[0].subject, "EAMENA-0000404");
    assert_eq!(output.report.errors[0].message, "Cannot resolve existing EAMENA ID");
}

// =============================================================================
// Intermediate stages
// =============================================================================

#[test]
fn unflatten_keeps_column_keys_and_subject() {
    let mut store = store();
    let sheet = Sheet::new(vec![place(
        "EAMENA-0000001",
        &[("GENERAL_DESCRIPTION", "A large mound."), ("RESOURCE_NAME", "Tell")],
    )]);
    let mut uploader = BulkUploader::new(&mut store, &sheet, options());
    let output = uploader.unflatten(Some(sheet_path()));
    assert_eq!(
        output.data,
        vec![json!({
            "_": "EAMENA-0000001",
            "DESCRIPTION_ASSIGNMENT": [{"GENERAL_DESCRIPTION": "A large mound."}],
            "RESOURCE_NAME": ["Tell"]
        })]
    );
}

#[test]
fn translate_uses_node_ids_and_drops_subject() {
    let mut store = store();
    let sheet = Sheet::new(vec![place("EAMENA-0000001", &[("HERITAGE_PLACE_TYPE", "Tomb")])]);
    let mut uploader = BulkUploader::new(&mut store, &sheet, options());
    let output = uploader.translate(Some(sheet_path()));
    assert_eq!(output.data, vec![json!({"ng-desc": [{"n-type": "v-2"}]})]);
}

#[test]
fn global_label_resolves_in_single_node_and_grouped_columns() {
    let mut schema = heritage_schema();
    schema
        .nodes
        .push(concept("n-country", "Country Type", "n-country", "c-country"));
    schema.nodegroups.push(group("n-country", None));
    let mut store = MemoryStore::new()
        .with_schema(schema)
        .with_collection("c-types", vec![value("v-1", "Settlement"), value("v-2", "Tomb")])
        .with_collection("c-country", vec![value("v-egypt", "Egypt")])
        .with_collection("c-monuments", vec![value("v-cairn", "Cairn")])
        .with_language(Language::new("en", Direction::Ltr));
    let sheet = Sheet::new(vec![place(
        "EAMENA-0000001",
        &[("COUNTRY_TYPE", "Cairn"), ("HERITAGE_PLACE_TYPE", "Cairn")],
    )]);
    let mut uploader = BulkUploader::new(&mut store, &sheet, options());
    let output = uploader.translate(Some(sheet_path()));
    assert!(output.report.errors.is_empty());
    assert_eq!(
        output.data,
        vec![json!({"n-country": ["v-cairn"], "ng-desc": [{"n-type": "v-cairn"}]})]
    );
}

#[test]
fn list_nodes_includes_vocabularies() {
    let mut store = store();
    let sheet = Sheet::default();
    let mut uploader = BulkUploader::new(&mut store, &sheet, options());
    let output = uploader.list_nodes();
    assert!(output.report.errors.is_empty());
    let listing = output
        .data
        .iter()
        .find(|entry| entry.nodeid == "n-type")
        .expect("concept node");
    assert_eq!(listing.key, "HERITAGE_PLACE_TYPE");
    let labels: Vec<&str> = listing
        .values
        .iter()
        .flatten()
        .map(|value| value.label.as_str())
        .collect();
    assert_eq!(labels, ["Settlement", "Tomb"]);
}

// =============================================================================
// Fatal conditions
// =============================================================================

fn fatal_message(output: &RunOutput<Vec<ErrorRecord>>) -> &str {
    assert_eq!(output.report.errors.len(), 1);
    assert_eq!(output.report.errors[0].subject, "");
    assert!(output.report.warnings.is_empty());
    &output.report.errors[0].message
}

#[test]
fn missing_source_is_fatal() {
    let mut store = store();
    let sheet = Sheet::default();
    let mut uploader = BulkUploader::new(&mut store, &sheet, options());
    let output = uploader.validate(None);
    assert_eq!(fatal_message(&output), "Need an input file; use --source");
    assert_eq!(output.data.len(), 1);
}

#[test]
fn missing_or_unknown_graph_is_fatal() {
    let mut store = store();
    let sheet = Sheet::default();
    for options in [RunOptions::new(), RunOptions::new().with_graph("not-a-graph")] {
        let mut uploader = BulkUploader::new(&mut store, &sheet, options);
        let output = uploader.validate(Some(sheet_path()));
        assert_eq!(fatal_message(&output), "Invalid or missing graph UUID. Use --graph");
    }
}

#[test]
fn graph_without_sheet_is_fatal() {
    let mut store = MemoryStore::new().with_schema(Schema {
        graph_id: "g-other".to_string(),
        name: "Information Resource".to_string(),
        nodes: Vec::new(),
        nodegroups: Vec::new(),
    });
    let sheet = Sheet::default();
    let mut uploader = BulkUploader::new(&mut store, &sheet, RunOptions::new().with_graph("g-other"));
    let output = uploader.validate(Some(sheet_path()));
    assert_eq!(
        fatal_message(&output),
        "No bulk upload sheet for graph Information Resource"
    );
}

#[test]
fn unreadable_file_is_fatal() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("missing.csv");
    let mut store = store();
    let source = CsvRowSource::new();
    let mut uploader = BulkUploader::new(&mut store, &source, options());
    let output = uploader.validate(Some(&path));
    assert_eq!(
        fatal_message(&output),
        format!("Could not open the file: {}", path.display())
    );
}

#[test]
fn fatal_convert_returns_no_document() {
    let mut store = store();
    let sheet = Sheet::default();
    let output = BulkUploader::new(&mut store, &sheet, options()).convert(None);
    assert!(output.data.is_none());
    assert_eq!(output.report.errors[0].message, "Need an input file; use --source");
}
