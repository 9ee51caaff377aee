//! Data model shared by every stage of the bulk upload pipeline.
//!
//! The schema (nodes, node groups, vocabularies) is loaded once per run and
//! passed by reference. Nested sheet documents are plain
//! [`serde_json::Value`] trees; the emitted business data uses the typed
//! [`Resource`] and [`Tile`] structs.

pub mod diagnostics;
pub mod error;
pub mod key;
pub mod memory;
pub mod options;
pub mod resource;
pub mod schema;
pub mod store;
pub mod vocabulary;

pub use diagnostics::{Diagnostics, ErrorRecord};
pub use error::{Result, StoreError};
pub use key::{loose_key, node_key};
pub use memory::{CallCounts, Catalog, IndexedBusinessId, MemoryStore};
pub use options::{AppendMode, Direction, Language, RunOptions, WarnMode};
pub use resource::{BusinessData, BusinessDataDocument, Resource, ResourceInstance, Tile};
pub use schema::{Cardinality, Datatype, Node, NodeConfig, NodeGroup, Schema, SchemaSummary, TargetGraph};
pub use store::{
    DeleteReport, GeometryProbe, RawRow, ResourceHit, ResourceStore, RowSource, ScanHit,
    SchemaStore,
};
pub use vocabulary::{ControlledValue, Vocabulary};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostics_counts() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.error("EAMENA-0001", "Invalid geometry.", "");
        diagnostics.warning("EAMENA-0001", "Invalid concept value 'iran'", "Did you mean 'Iran'?");
        assert_eq!(diagnostics.error_count(), 1);
        assert_eq!(diagnostics.warning_count(), 1);
        assert!(diagnostics.has_errors());
    }

    #[test]
    fn document_serializes_with_null_provisional_edits() {
        let mut resource = Resource::new("r-1", "g-1", "r-1");
        resource.tiles.push(Tile::new("t-1", "ng-1", "r-1", None));
        let document = BusinessDataDocument::new(vec![resource]);
        let json = serde_json::to_value(&document).expect("serialize document");
        let tile = &json["business_data"]["resources"][0]["tiles"][0];
        assert!(tile["provisionaledits"].is_null());
        assert!(tile["parenttile_id"].is_null());
        assert_eq!(tile["sortorder"], 0);
        assert!(tile.get("nodegroup_name").is_none());
    }
}
