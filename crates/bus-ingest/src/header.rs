//! Header canonicalization and column classification.

use std::collections::BTreeSet;

use bus_map::{IndexedNode, NodeIndex};
use bus_model::{Diagnostics, loose_key, node_key};
use bus_standards::SheetProfile;

/// Canonical UPPER_SNAKE form of a spreadsheet header.
pub fn canonical_header(raw: &str) -> String {
    node_key(raw)
}

/// What a spreadsheet column feeds.
#[derive(Debug, Clone, Copy)]
pub enum ColumnTarget<'a> {
    /// The business identifier column; `node` is set when the identifier is
    /// also stored as a node value.
    Identifier { node: Option<&'a IndexedNode> },
    Node(&'a IndexedNode),
    Unknown,
}

/// Classifies the columns of one sheet against a schema index.
#[derive(Debug, Clone, Copy)]
pub struct ColumnPlan<'a> {
    profile: &'a SheetProfile,
    index: &'a NodeIndex,
}

impl<'a> ColumnPlan<'a> {
    pub fn new(profile: &'a SheetProfile, index: &'a NodeIndex) -> Self {
        Self { profile, index }
    }

    pub fn classify(&self, header: &str) -> ColumnTarget<'a> {
        let canonical = canonical_header(header);
        if canonical.is_empty() {
            return ColumnTarget::Unknown;
        }
        if loose_key(&canonical) == loose_key(self.profile.identifier_header) {
            let node = if self.profile.identifier_is_node {
                self.index.resolve(&canonical)
            } else {
                None
            };
            return ColumnTarget::Identifier { node };
        }
        match self.index.resolve(&canonical) {
            Some(entry) => ColumnTarget::Node(entry),
            None => ColumnTarget::Unknown,
        }
    }

    pub fn is_identifier(&self, header: &str) -> bool {
        matches!(self.classify(header), ColumnTarget::Identifier { .. })
    }

    /// Warns once for every header that is unknown to the schema or missing
    /// from the published template. Empty headers are ignored.
    pub fn check_columns(&self, columns: &[String], diagnostics: &mut Diagnostics) {
        let mut seen = BTreeSet::new();
        for header in columns {
            let header = header.trim();
            if header.is_empty() || !seen.insert(header.to_string()) {
                continue;
            }
            let unknown = matches!(self.classify(header), ColumnTarget::Unknown);
            let expected = self
                .profile
                .expects_header(&canonical_header(header), loose_key);
            if unknown || !expected {
                diagnostics.warning(
                    "",
                    format!("Unexpected column header: \"{header}\""),
                    self.profile.template_hint(),
                );
            }
        }
    }
}
