//! The component forest and positional lookups within it.

use std::collections::HashSet;

use proto_model::{ComponentId, ComponentInstance};
use serde::{Deserialize, Serialize};

/// A list that holds components: the top level, a node's ordinary
/// children, or one of a node's slots.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Container {
    Root,
    Children(ComponentId),
    Slot(ComponentId, String),
}

impl Container {
    /// Owning node, or `None` at the top level.
    pub fn parent(&self) -> Option<&ComponentId> {
        match self {
            Self::Root => None,
            Self::Children(parent) | Self::Slot(parent, _) => Some(parent),
        }
    }
}

/// Where a node sits: its container and its index within it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub container: Container,
    pub index: usize,
}

/// A composed prototype: an ordered list of top-level components.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentTree {
    pub roots: Vec<ComponentInstance>,
}

impl ComponentTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_roots(roots: Vec<ComponentInstance>) -> Self {
        Self { roots }
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Number of nodes in the whole forest.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Every node, depth first, roots in order.
    pub fn iter(&self) -> impl Iterator<Item = &ComponentInstance> {
        self.roots.iter().flat_map(ComponentInstance::preorder)
    }

    pub fn ids(&self) -> impl Iterator<Item = &ComponentId> {
        self.iter().map(|node| &node.id)
    }

    pub fn contains(&self, id: &ComponentId) -> bool {
        self.ids().any(|candidate| candidate == id)
    }

    pub fn find(&self, id: &ComponentId) -> Option<&ComponentInstance> {
        self.roots.iter().find_map(|root| root.find(id))
    }

    pub fn find_mut(&mut self, id: &ComponentId) -> Option<&mut ComponentInstance> {
        self.roots.iter_mut().find_map(|root| root.find_mut(id))
    }

    /// First id that appears more than once anywhere in the forest.
    pub fn duplicate_id(&self) -> Option<&ComponentId> {
        let mut seen = HashSet::new();
        self.ids().find(|id| !seen.insert(*id))
    }

    /// Position of `id`, searching ordinary children and every slot.
    pub fn locate(&self, id: &ComponentId) -> Option<Location> {
        locate_in(&self.roots, &Container::Root, id)
    }

    /// The node that owns `id`, if it is not a root.
    pub fn parent_of(&self, id: &ComponentId) -> Option<&ComponentInstance> {
        let location = self.locate(id)?;
        location.container.parent().and_then(|parent| self.find(parent))
    }

    /// Type name of the node that owns `id`.
    pub fn parent_type_of(&self, id: &ComponentId) -> Option<&str> {
        self.parent_of(id).map(|parent| parent.type_name.as_str())
    }

    /// The list behind `container`, if its owner exists.
    ///
    /// A slot list that has never been used does not exist yet.
    pub fn list(&self, container: &Container) -> Option<&Vec<ComponentInstance>> {
        match container {
            Container::Root => Some(&self.roots),
            Container::Children(parent) => self.find(parent).map(|node| &node.children),
            Container::Slot(parent, slot) => self
                .find(parent)
                .and_then(|node| node.slot_children.get(slot)),
        }
    }

    /// Mutable list behind `container`, creating an empty slot list on demand.
    pub fn list_mut(&mut self, container: &Container) -> Option<&mut Vec<ComponentInstance>> {
        match container {
            Container::Root => Some(&mut self.roots),
            Container::Children(parent) => self.find_mut(parent).map(|node| &mut node.children),
            Container::Slot(parent, slot) => self
                .find_mut(parent)
                .map(|node| node.slot_children.entry(slot.clone()).or_default()),
        }
    }

    /// Detach and return the subtree rooted at `id`.
    ///
    /// An emptied slot keeps its (now empty) list.
    pub fn remove(&mut self, id: &ComponentId) -> Option<(Location, ComponentInstance)> {
        let location = self.locate(id)?;
        let list = self.list_mut(&location.container)?;
        let node = list.remove(location.index);
        Some((location, node))
    }

    /// Insert `node` into `container` at `index`, clamped to the list length.
    ///
    /// Returns the node back if the container's owner does not exist.
    pub fn insert(
        &mut self,
        container: &Container,
        index: usize,
        node: ComponentInstance,
    ) -> std::result::Result<(), ComponentInstance> {
        match self.list_mut(container) {
            Some(list) => {
                let index = index.min(list.len());
                list.insert(index, node);
                Ok(())
            }
            None => Err(node),
        }
    }
}

fn locate_in(
    list: &[ComponentInstance],
    container: &Container,
    id: &ComponentId,
) -> Option<Location> {
    for (index, node) in list.iter().enumerate() {
        if &node.id == id {
            return Some(Location {
                container: container.clone(),
                index,
            });
        }
        let children = Container::Children(node.id.clone());
        if let Some(found) = locate_in(&node.children, &children, id) {
            return Some(found);
        }
        for (slot, slot_list) in &node.slot_children {
            let container = Container::Slot(node.id.clone(), slot.clone());
            if let Some(found) = locate_in(slot_list, &container, id) {
                return Some(found);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(value: &str) -> ComponentId {
        ComponentId::new(value).unwrap()
    }

    fn node(value: &str, type_name: &str) -> ComponentInstance {
        ComponentInstance::new(id(value), type_name)
    }

    fn sample() -> ComponentTree {
        ComponentTree::from_roots(vec![
            node("screen", "Screen").with_child(
                node("card", "Card")
                    .with_slot_child("header", node("save", "Button"))
                    .with_slot_child("content", node("text", "Paragraph")),
            ),
            node("footer", "Row"),
        ])
    }

    #[test]
    fn locate_reports_container_and_index() {
        let tree = sample();
        assert_eq!(
            tree.locate(&id("footer")),
            Some(Location {
                container: Container::Root,
                index: 1
            })
        );
        assert_eq!(
            tree.locate(&id("save")).unwrap().container,
            Container::Slot(id("card"), "header".to_string())
        );
        assert_eq!(tree.parent_type_of(&id("card")), Some("Screen"));
        assert_eq!(tree.parent_type_of(&id("screen")), None);
        assert!(tree.locate(&id("ghost")).is_none());
    }

    #[test]
    fn remove_detaches_whole_subtree() {
        let mut tree = sample();
        let (location, removed) = tree.remove(&id("card")).unwrap();
        assert_eq!(location.container, Container::Children(id("screen")));
        assert_eq!(removed.ids().count(), 3);
        assert!(!tree.contains(&id("text")));
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn insert_creates_slot_lists_on_demand() {
        let mut tree = sample();
        let slot = Container::Slot(id("screen"), "overlay".to_string());
        tree.insert(&slot, 5, node("late", "Toggle")).unwrap();
        assert_eq!(tree.list(&slot).unwrap().len(), 1);

        let missing = Container::Children(id("ghost"));
        assert!(tree.insert(&missing, 0, node("lost", "Toggle")).is_err());
    }

    #[test]
    fn serializes_as_a_plain_list() {
        let tree = ComponentTree::from_roots(vec![node("r1", "Row")]);
        let json = serde_json::to_string(&tree).unwrap();
        assert_eq!(json, r#"[{"id":"r1","typeName":"Row"}]"#);
    }
}
