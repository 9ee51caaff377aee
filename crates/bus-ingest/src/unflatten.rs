//! Row unflattening: flat sheet rows → nested per-resource documents.
//!
//! A row with a non-empty identifier starts a resource; rows with an empty
//! identifier continue the previous one. Cells are grouped by node group
//! and nested following the schema's parent links. Each group appears under
//! its root node's key as a list of instances:
//!
//! ```text
//! {"_": "EAMENA-0001",
//!  "RESOURCE_NAME": ["Tell Ahmar"],
//!  "DESCRIPTION_ASSIGNMENT": [{"GENERAL_DESCRIPTION": "..."}]}
//! ```
//!
//! Single-node groups store bare values; all other groups store mappings.

use std::collections::BTreeMap;

use bus_map::{IndexedNode, NodeIndex};
use bus_model::{Diagnostics, RawRow, Schema};
use bus_standards::SheetProfile;
use serde_json::{Map, Value};
use tracing::debug;

use crate::header::{ColumnPlan, ColumnTarget};

/// Key carrying the row's business identifier.
pub const SUBJECT_KEY: &str = "_";

pub struct Unflattener<'a> {
    schema: &'a Schema,
    plan: ColumnPlan<'a>,
}

impl<'a> Unflattener<'a> {
    pub fn new(schema: &'a Schema, profile: &'a SheetProfile, index: &'a NodeIndex) -> Self {
        Self {
            schema,
            plan: ColumnPlan::new(profile, index),
        }
    }

    /// Reports unexpected column headers as warnings.
    pub fn check_columns(&self, columns: &[String], diagnostics: &mut Diagnostics) {
        self.plan.check_columns(columns, diagnostics);
    }

    pub fn unflatten(&self, rows: &[RawRow]) -> Vec<Value> {
        let has_identifier = rows
            .iter()
            .flatten()
            .any(|(header, _)| self.plan.is_identifier(header));
        let mut targets: BTreeMap<&str, ColumnTarget<'a>> = BTreeMap::new();
        let mut resources: Vec<ResourceTree> = Vec::new();

        for row in rows {
            let mut identifier = None;
            let mut cells: Vec<(&IndexedNode, Value)> = Vec::new();
            for (header, raw) in row {
                let Some(value) = clean_cell(raw) else {
                    continue;
                };
                let target = *targets
                    .entry(header.as_str())
                    .or_insert_with(|| self.plan.classify(header));
                match target {
                    ColumnTarget::Identifier { node } => {
                        identifier = Some(cell_text(&value));
                        if let Some(entry) = node {
                            cells.push((entry, value));
                        }
                    }
                    ColumnTarget::Node(entry) => cells.push((entry, value)),
                    ColumnTarget::Unknown => {}
                }
            }
            if identifier.is_none() && cells.is_empty() {
                continue;
            }
            if !has_identifier || identifier.is_some() || resources.is_empty() {
                resources.push(ResourceTree::new(identifier));
            }
            if let Some(resource) = resources.last_mut() {
                resource.add_row(self.schema, &cells);
            }
        }

        debug!(rows = rows.len(), resources = resources.len(), "unflattened sheet");
        resources
            .iter()
            .map(|resource| resource.to_value(self.schema))
            .collect()
    }
}

/// Trimmed cell value; `None` for blanks.
fn clean_cell(raw: &Value) -> Option<Value> {
    match raw {
        Value::Null => None,
        Value::String(text) => {
            let text = text.trim();
            (!text.is_empty()).then(|| Value::String(text.to_string()))
        }
        other => Some(other.clone()),
    }
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// One node-group instance under construction.
#[derive(Debug)]
struct Instance {
    nodegroup: String,
    fields: Map<String, Value>,
    children: Vec<usize>,
}

#[derive(Debug)]
struct ResourceTree {
    subject: Option<String>,
    instances: Vec<Instance>,
    roots: Vec<usize>,
    latest: BTreeMap<String, usize>,
}

impl ResourceTree {
    fn new(subject: Option<String>) -> Self {
        Self {
            subject,
            instances: Vec::new(),
            roots: Vec::new(),
            latest: BTreeMap::new(),
        }
    }

    fn add_row(&mut self, schema: &Schema, cells: &[(&IndexedNode, Value)]) {
        let mut in_row: BTreeMap<String, usize> = BTreeMap::new();
        for (entry, value) in cells {
            let Some(nodegroup) = entry.node.nodegroup_id.as_deref() else {
                continue;
            };
            let instance = self.instance_for_row(schema, nodegroup, &mut in_row);
            self.instances[instance]
                .fields
                .insert(entry.key.clone(), value.clone());
        }
    }

    /// Instance of `nodegroup` created for the current row, creating it (and
    /// any missing ancestors) on first use.
    fn instance_for_row(
        &mut self,
        schema: &Schema,
        nodegroup: &str,
        in_row: &mut BTreeMap<String, usize>,
    ) -> usize {
        if let Some(existing) = in_row.get(nodegroup) {
            return *existing;
        }
        let parent = match schema.parent_group(nodegroup) {
            Some(parent) => {
                let known = in_row
                    .get(parent)
                    .or_else(|| self.latest.get(parent))
                    .copied();
                Some(match known {
                    Some(existing) => existing,
                    None => self.instance_for_row(schema, parent, in_row),
                })
            }
            None => None,
        };
        let position = self.instances.len();
        self.instances.push(Instance {
            nodegroup: nodegroup.to_string(),
            fields: Map::new(),
            children: Vec::new(),
        });
        match parent {
            Some(parent) => self.instances[parent].children.push(position),
            None => self.roots.push(position),
        }
        in_row.insert(nodegroup.to_string(), position);
        self.latest.insert(nodegroup.to_string(), position);
        position
    }

    fn to_value(&self, schema: &Schema) -> Value {
        let mut document = Map::new();
        if let Some(subject) = &self.subject {
            document.insert(SUBJECT_KEY.to_string(), Value::String(subject.clone()));
        }
        self.append_groups(schema, &self.roots, &mut document);
        Value::Object(document)
    }

    fn append_groups(&self, schema: &Schema, positions: &[usize], target: &mut Map<String, Value>) {
        for position in positions {
            let instance = &self.instances[*position];
            let key = group_key(schema, &instance.nodegroup);
            let value = self.instance_value(schema, instance);
            match target
                .entry(key)
                .or_insert_with(|| Value::Array(Vec::new()))
            {
                Value::Array(items) => items.push(value),
                other => *other = Value::Array(vec![other.take(), value]),
            }
        }
    }

    fn instance_value(&self, schema: &Schema, instance: &Instance) -> Value {
        if instance.children.is_empty()
            && instance.fields.len() == 1
            && schema.is_single_node_group(&instance.nodegroup)
            && let Some(value) = instance.fields.values().next()
        {
            return value.clone();
        }
        let mut fields = instance.fields.clone();
        self.append_groups(schema, &instance.children, &mut fields);
        Value::Object(fields)
    }
}

/// Key of a node group in the nested document: its root node's key.
fn group_key(schema: &Schema, nodegroup: &str) -> String {
    schema
        .node(nodegroup)
        .map_or_else(|| nodegroup.to_string(), bus_model::Node::key)
}
