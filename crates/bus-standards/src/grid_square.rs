//! Grid Square template.

use crate::profile::SheetProfile;

pub const GRAPH_ID: &str = "77d18973-7428-11ea-b4d0-02e7594ce0a0";

/// Single-node group holding the grid identifier.
pub const GRID_ID_NODE: &str = "b3628db0-742d-11ea-b4d0-02e7594ce0a0";

pub const PROFILE: SheetProfile = SheetProfile {
    schema_name: "Grid Square",
    identifier_header: "GRID_ID",
    identifier_is_node: true,
    upsert_by_identifier: true,
    header_aliases: &[],
    actor_suffix: None,
    restricted_family: None,
    concept_aliases: &[],
    expected_headers: &[],
    business_id_nodegroup: GRID_ID_NODE,
};
