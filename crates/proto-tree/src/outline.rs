//! Flattened, indented view of a tree for list-style display.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use proto_model::{ComponentId, ComponentInstance, ComponentTypeDefinition, PropValue};
use proto_props::PropertyScope;
use proto_registry::ComponentRegistry;

use crate::forest::ComponentTree;

/// One line of the outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutlineRow {
    Component {
        depth: usize,
        id: ComponentId,
        type_name: String,
        /// Title or label set on the instance, if any.
        label: Option<String>,
        /// Ordinary children plus every slot child.
        child_count: usize,
    },
    Slot {
        depth: usize,
        name: String,
        label: String,
        child_count: usize,
    },
}

impl OutlineRow {
    pub fn depth(&self) -> usize {
        match self {
            Self::Component { depth, .. } | Self::Slot { depth, .. } => *depth,
        }
    }
}

/// Outline rows for the whole forest, depth first.
///
/// Slots currently offered on a node are listed even when empty; a slot
/// that is hidden but still holds children is listed under its raw name.
pub fn outline(tree: &ComponentTree, registry: &ComponentRegistry) -> Vec<OutlineRow> {
    let mut rows = Vec::new();
    for root in &tree.roots {
        push_node(&mut rows, registry, root, None, 0);
    }
    rows
}

/// Text rendering of [`outline`], two spaces per level.
pub fn render_outline(tree: &ComponentTree, registry: &ComponentRegistry) -> String {
    let mut out = String::new();
    for row in outline(tree, registry) {
        let indent = "  ".repeat(row.depth());
        // Writing to a String cannot fail.
        let _ = match &row {
            OutlineRow::Component {
                id,
                type_name,
                label: Some(label),
                ..
            } => writeln!(out, "{indent}{type_name} \"{label}\" [{id}]"),
            OutlineRow::Component { id, type_name, .. } => {
                writeln!(out, "{indent}{type_name} [{id}]")
            }
            OutlineRow::Slot {
                label, child_count, ..
            } => writeln!(out, "{indent}<{label}> ({child_count})"),
        };
    }
    out
}

/// Human label for a node: containers show their title, leaves their
/// label and then their title.
pub fn node_label(node: &ComponentInstance, definition: Option<&ComponentTypeDefinition>) -> Option<String> {
    let is_container = definition.is_some_and(|def| def.accepts_children || def.has_slots());
    let keys: &[&str] = if is_container {
        &["title"]
    } else {
        &["label", "title"]
    };
    keys.iter()
        .filter_map(|key| node.property(key).and_then(PropValue::as_str))
        .map(str::trim)
        .find(|text| !text.is_empty())
        .map(str::to_string)
}

fn push_node(
    rows: &mut Vec<OutlineRow>,
    registry: &ComponentRegistry,
    node: &ComponentInstance,
    parent_type: Option<&str>,
    depth: usize,
) {
    let definition = registry.lookup(&node.type_name);
    rows.push(OutlineRow::Component {
        depth,
        id: node.id.clone(),
        type_name: node.type_name.clone(),
        label: node_label(node, definition),
        child_count: node.total_child_count(),
    });

    for child in &node.children {
        push_node(rows, registry, child, Some(&node.type_name), depth + 1);
    }

    let mut listed = BTreeSet::new();
    if let Ok(scope) = PropertyScope::new(registry, node, parent_type) {
        for slot in scope.available_slots() {
            push_slot(rows, registry, node, &slot.name, slot.display_label, depth + 1);
            listed.insert(slot.name);
        }
    }
    for (name, children) in &node.slot_children {
        if !listed.contains(name) && !children.is_empty() {
            push_slot(rows, registry, node, name, name.clone(), depth + 1);
        }
    }
}

fn push_slot(
    rows: &mut Vec<OutlineRow>,
    registry: &ComponentRegistry,
    owner: &ComponentInstance,
    name: &str,
    label: String,
    depth: usize,
) {
    let children = owner.slot(name);
    rows.push(OutlineRow::Slot {
        depth,
        name: name.to_string(),
        label,
        child_count: children.len(),
    });
    for child in children {
        push_node(rows, registry, child, Some(&owner.type_name), depth + 1);
    }
}
