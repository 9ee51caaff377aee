//! Sheet profiles: how the columns of one template map onto its schema.

use crate::{grid_square, heritage_place};

/// A concept label that the template spells differently from the thesaurus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConceptAlias {
    /// Column key of the concept node.
    pub node_key: &'static str,
    /// Label as stored in the vocabulary.
    pub label: &'static str,
    /// Extra label accepted for the same value.
    pub alias: &'static str,
}

/// A family of nodes sharing one display name, of which only the listed
/// node ids are authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestrictedFamily {
    pub key_prefix: &'static str,
    pub allowed_nodes: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetProfile {
    /// Schema display name the profile applies to.
    pub schema_name: &'static str,
    /// Column holding the row's business identifier.
    pub identifier_header: &'static str,
    /// The identifier column is also a node of the schema.
    pub identifier_is_node: bool,
    /// Rows whose identifier already exists extend that resource.
    pub upsert_by_identifier: bool,
    /// Node key ↔ template header pairs.
    pub header_aliases: &'static [(&'static str, &'static str)],
    /// Suffix some template headers carry on actor columns.
    pub actor_suffix: Option<&'static str>,
    pub restricted_family: Option<RestrictedFamily>,
    pub concept_aliases: &'static [ConceptAlias],
    /// Headers of the published template; empty disables the check.
    pub expected_headers: &'static [&'static str],
    /// Node group holding the business identifier of a stored resource.
    pub business_id_nodegroup: &'static str,
}

pub static PROFILES: &[SheetProfile] = &[heritage_place::PROFILE, grid_square::PROFILE];

impl SheetProfile {
    pub fn for_schema_name(name: &str) -> Option<&'static SheetProfile> {
        PROFILES.iter().find(|profile| profile.schema_name == name)
    }

    /// Help text shown for unexpected headers.
    pub fn template_hint(&self) -> String {
        format!(
            "Please check you are using the correct version of the {} bulk upload template.",
            self.schema_name
        )
    }

    /// True when a node belongs to a restricted family but is not on its
    /// allow-list.
    pub fn is_excluded(&self, node_key: &str, nodeid: &str) -> bool {
        self.restricted_family.is_some_and(|family| {
            node_key.starts_with(family.key_prefix) && !family.allowed_nodes.contains(&nodeid)
        })
    }

    /// Alternative spellings of a key, in either alias direction.
    pub fn aliases_for<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'static str> + 'a {
        self.header_aliases.iter().filter_map(move |(node, header)| {
            if *node == key {
                Some(*header)
            } else if *header == key {
                Some(*node)
            } else {
                None
            }
        })
    }

    /// Key without the actor suffix, when present.
    pub fn strip_actor_suffix<'a>(&self, key: &'a str) -> Option<&'a str> {
        self.actor_suffix.and_then(|suffix| key.strip_suffix(suffix))
    }

    /// True when `header` is part of the published template. `normalize`
    /// is applied to both sides before comparing.
    pub fn expects_header(&self, header: &str, normalize: impl Fn(&str) -> String) -> bool {
        if self.expected_headers.is_empty() {
            return true;
        }
        let wanted = normalize(header);
        self.expected_headers
            .iter()
            .any(|&expected| normalize(expected) == wanted)
    }
}
