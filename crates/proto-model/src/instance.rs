//! Component instances: the nodes of a prototype tree.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::ids::{ComponentId, CompositionId};
use crate::value::PropValue;

/// Back-reference from an instantiated composition to its library entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedCompositionRef {
    pub source_id: CompositionId,
    pub structural_hash: String,
}

/// Free-text description of what a function property should do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionBinding {
    pub prop_name: String,
    pub description: String,
}

/// One placed occurrence of a component type.
///
/// Children are owned, so a well-formed tree is a strict forest by
/// construction. Id uniqueness across the forest is maintained by the
/// editing engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentInstance {
    pub id: ComponentId,
    pub type_name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, PropValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ComponentInstance>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub slot_children: BTreeMap<String, Vec<ComponentInstance>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<ActionBinding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_composition_ref: Option<SavedCompositionRef>,
}

impl ComponentInstance {
    pub fn new(id: ComponentId, type_name: impl Into<String>) -> Self {
        Self {
            id,
            type_name: type_name.into(),
            properties: BTreeMap::new(),
            children: Vec::new(),
            slot_children: BTreeMap::new(),
            actions: Vec::new(),
            saved_composition_ref: None,
        }
    }

    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: ComponentInstance) -> Self {
        self.children.push(child);
        self
    }

    #[must_use]
    pub fn with_slot_child(mut self, slot: impl Into<String>, child: ComponentInstance) -> Self {
        self.slot_children.entry(slot.into()).or_default().push(child);
        self
    }

    /// Explicit value, if one is stored.
    pub fn property(&self, name: &str) -> Option<&PropValue> {
        self.properties.get(name)
    }

    pub fn action(&self, prop_name: &str) -> Option<&str> {
        self.actions
            .iter()
            .find(|a| a.prop_name == prop_name)
            .map(|a| a.description.as_str())
    }

    pub fn slot(&self, name: &str) -> &[ComponentInstance] {
        self.slot_children.get(name).map_or(&[], Vec::as_slice)
    }

    /// Ordinary children plus every slot child.
    pub fn total_child_count(&self) -> usize {
        self.children.len() + self.slot_children.values().map(Vec::len).sum::<usize>()
    }

    /// Names of slots that currently have a list, in name order.
    pub fn slot_names(&self) -> impl Iterator<Item = &str> {
        self.slot_children.keys().map(String::as_str)
    }

    /// Depth-first walk of this subtree, starting with `self`.
    ///
    /// Ordinary children are visited before slot children; slots are
    /// visited in name order.
    pub fn preorder(&self) -> Preorder<'_> {
        Preorder { stack: vec![self] }
    }

    pub fn ids(&self) -> impl Iterator<Item = &ComponentId> {
        self.preorder().map(|node| &node.id)
    }

    pub fn contains_id(&self, id: &ComponentId) -> bool {
        self.preorder().any(|node| &node.id == id)
    }

    pub fn find(&self, id: &ComponentId) -> Option<&ComponentInstance> {
        self.preorder().find(|node| &node.id == id)
    }

    pub fn find_mut(&mut self, id: &ComponentId) -> Option<&mut ComponentInstance> {
        if &self.id == id {
            return Some(self);
        }
        for child in self.children.iter_mut() {
            if let Some(found) = child.find_mut(id) {
                return Some(found);
            }
        }
        for list in self.slot_children.values_mut() {
            for child in list.iter_mut() {
                if let Some(found) = child.find_mut(id) {
                    return Some(found);
                }
            }
        }
        None
    }

    /// Replace every id in this subtree with one drawn from `next_id`.
    pub fn regenerate_ids<F>(&mut self, next_id: &mut F)
    where
        F: FnMut() -> ComponentId,
    {
        self.id = next_id();
        for child in self.children.iter_mut() {
            child.regenerate_ids(next_id);
        }
        for list in self.slot_children.values_mut() {
            for child in list.iter_mut() {
                child.regenerate_ids(next_id);
            }
        }
    }

    /// First id that occurs more than once in this subtree.
    pub fn duplicate_id(&self) -> Option<&ComponentId> {
        let mut seen = HashSet::new();
        self.ids().find(|id| !seen.insert(*id))
    }
}

/// Depth-first iterator over a component subtree.
pub struct Preorder<'a> {
    stack: Vec<&'a ComponentInstance>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = &'a ComponentInstance;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // Push in reverse so the first ordinary child is popped next.
        for list in node.slot_children.values().rev() {
            self.stack.extend(list.iter().rev());
        }
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}
