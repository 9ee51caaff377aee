//! Placeholder templates for referenced resources that do not exist yet.

use crate::grid_square;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaceholderTemplate {
    pub graph_id: &'static str,
    pub nodegroup_id: &'static str,
    /// Node receiving the raw identifier text.
    pub identifier_node: &'static str,
    /// Nodes written as explicit nulls.
    pub null_nodes: &'static [&'static str],
}

pub static PLACEHOLDER_TEMPLATES: &[PlaceholderTemplate] = &[
    PlaceholderTemplate {
        graph_id: grid_square::GRAPH_ID,
        nodegroup_id: grid_square::GRID_ID_NODE,
        identifier_node: grid_square::GRID_ID_NODE,
        null_nodes: &[],
    },
    PlaceholderTemplate {
        graph_id: "e98e1cee-c38b-11ea-9026-02e7594ce0a0",
        nodegroup_id: "e98e1cfe-c38b-11ea-9026-02e7594ce0a0",
        identifier_node: "e98e1cfe-c38b-11ea-9026-02e7594ce0a0",
        null_nodes: &[
            "e98e1d0b-c38b-11ea-9026-02e7594ce0a0",
            "e98e1d0c-c38b-11ea-9026-02e7594ce0a0",
            "e98e1d0e-c38b-11ea-9026-02e7594ce0a0",
            "e98e1d08-c38b-11ea-9026-02e7594ce0a0",
        ],
    },
];

pub fn placeholder_template(graph_id: &str) -> Option<&'static PlaceholderTemplate> {
    PLACEHOLDER_TEMPLATES
        .iter()
        .find(|template| template.graph_id == graph_id)
}
