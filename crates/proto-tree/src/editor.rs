//! The tree mutation engine.
//!
//! Every operation either commits completely or returns an error with the
//! tree untouched. Checks run before anything is changed; moves are applied
//! to a working copy that replaces the tree only on success.

use std::collections::HashSet;

use proto_model::{
    ActionBinding, ComponentId, ComponentInstance, ComponentTypeDefinition, IdSource, PropValue,
    RandomIds,
};
use proto_props::PropertyScope;
use proto_registry::ComponentRegistry;
use tracing::{debug, warn};

use crate::dnd::DropPlacement;
use crate::error::{Result, TreeError};
use crate::forest::{ComponentTree, Container};

/// Applies structural and property edits to a [`ComponentTree`].
///
/// Holds the registry by reference and a source of fresh ids. Fresh ids
/// are checked against the forest and redrawn on collision.
#[derive(Debug)]
pub struct TreeEditor<'r, I = RandomIds> {
    registry: &'r ComponentRegistry,
    ids: I,
}

impl<'r> TreeEditor<'r, RandomIds> {
    pub fn new(registry: &'r ComponentRegistry) -> Self {
        Self::with_ids(registry, RandomIds::new())
    }
}

impl<'r, I: IdSource> TreeEditor<'r, I> {
    pub fn with_ids(registry: &'r ComponentRegistry, ids: I) -> Self {
        Self { registry, ids }
    }

    pub fn registry(&self) -> &'r ComponentRegistry {
        self.registry
    }

    /// Property scope for `id`, with layout properties from its parent.
    pub fn scope<'t>(&self, tree: &'t ComponentTree, id: &ComponentId) -> Result<PropertyScope<'t>>
    where
        'r: 't,
    {
        let node = tree.find(id).ok_or_else(|| TreeError::NotFound(id.clone()))?;
        Ok(PropertyScope::new(
            self.registry,
            node,
            tree.parent_type_of(id),
        )?)
    }

    /// Append a new top-level component.
    pub fn insert_root(&mut self, tree: &mut ComponentTree, type_name: &str) -> Result<ComponentId> {
        let mut taken = taken_ids(tree);
        let node = self.instantiate(type_name, &mut taken)?;
        let id = node.id.clone();
        tree.roots.push(node);
        debug!(%id, type_name, "inserted root");
        Ok(id)
    }

    /// Append a new component under `parent`, as an ordinary child or in `slot`.
    ///
    /// A slot with an auto-add type always receives that type, whatever
    /// `type_name` asks for.
    pub fn insert_child(
        &mut self,
        tree: &mut ComponentTree,
        parent: &ComponentId,
        slot: Option<&str>,
        type_name: &str,
    ) -> Result<ComponentId> {
        let (container, actual_type) = match self.placement(tree, parent, slot, type_name) {
            Ok(target) => target,
            Err(err) => return reject(err),
        };
        if actual_type != type_name {
            debug!(requested = type_name, actual = %actual_type, "slot auto-adds its own type");
        }

        let mut taken = taken_ids(tree);
        let node = self.instantiate(&actual_type, &mut taken)?;
        let id = node.id.clone();
        if let Err(node) = tree.insert(&container, usize::MAX, node) {
            return reject(TreeError::NotFound(node.id));
        }
        debug!(%id, %parent, slot, type_name = %actual_type, "inserted child");
        Ok(id)
    }

    /// Remove `id` and its whole subtree from wherever it is.
    ///
    /// Returns the removed subtree, or `None` if `id` was not in the tree.
    pub fn delete(&self, tree: &mut ComponentTree, id: &ComponentId) -> Option<ComponentInstance> {
        let removed = tree.remove(id).map(|(_, node)| node);
        match &removed {
            Some(node) => debug!(%id, nodes = node.ids().count(), "deleted subtree"),
            None => debug!(%id, "delete of missing component ignored"),
        }
        removed
    }

    /// Clone the subtree at `id` with fresh ids and place it right after the original.
    pub fn duplicate(&mut self, tree: &mut ComponentTree, id: &ComponentId) -> Result<ComponentId> {
        let Some(location) = tree.locate(id) else {
            return reject(TreeError::NotFound(id.clone()));
        };
        let Some(original) = tree.find(id) else {
            return reject(TreeError::NotFound(id.clone()));
        };
        let mut copy = original.clone();
        let mut taken = taken_ids(tree);
        copy.regenerate_ids(&mut || self.fresh_id(&mut taken));
        let copy_id = copy.id.clone();
        if let Err(node) = tree.insert(&location.container, location.index + 1, copy) {
            return reject(TreeError::NotFound(node.id));
        }
        debug!(%id, copy = %copy_id, "duplicated subtree");
        Ok(copy_id)
    }

    /// Move `dragged` relative to `target`.
    ///
    /// `Before`/`After` require both nodes in the same list. `Inside`
    /// appends to the target's ordinary children and requires the target
    /// to accept them. Dropping a node on itself does nothing.
    pub fn move_node(
        &self,
        tree: &mut ComponentTree,
        dragged: &ComponentId,
        target: &ComponentId,
        placement: DropPlacement,
    ) -> Result<()> {
        if dragged == target {
            debug!(%dragged, "dropped onto itself, nothing to do");
            return Ok(());
        }
        match self.plan_move(tree, dragged, target, placement) {
            Ok(working) => {
                *tree = working;
                debug!(%dragged, %target, %placement, "moved component");
                Ok(())
            }
            Err(err) => reject(err),
        }
    }

    /// Attach an existing subtree, e.g. an instantiated saved composition.
    ///
    /// With no parent the subtree becomes a new root. Ids must not clash
    /// with any id already in the tree.
    pub fn insert_subtree(
        &self,
        tree: &mut ComponentTree,
        parent: Option<&ComponentId>,
        slot: Option<&str>,
        subtree: ComponentInstance,
    ) -> Result<ComponentId> {
        let taken = taken_ids(tree);
        if let Some(clash) = subtree.ids().find(|id| taken.contains(*id)) {
            return reject(TreeError::IdCollision(clash.clone()));
        }
        if let Some(clash) = subtree.duplicate_id() {
            return reject(TreeError::IdCollision(clash.clone()));
        }
        let container = match parent {
            None => Container::Root,
            Some(parent) => match self.placement(tree, parent, slot, &subtree.type_name) {
                Ok((container, actual)) if actual == subtree.type_name => container,
                Ok(_) => {
                    return reject(TreeError::TypeNotAllowed {
                        parent: parent.clone(),
                        slot: slot.unwrap_or_default().to_string(),
                        type_name: subtree.type_name,
                    });
                }
                Err(err) => return reject(err),
            },
        };
        if let Err(unknown) = self.check_types(&subtree) {
            return reject(unknown);
        }
        let id = subtree.id.clone();
        if let Err(node) = tree.insert(&container, usize::MAX, subtree) {
            return reject(TreeError::NotFound(node.id));
        }
        debug!(%id, "inserted subtree");
        Ok(id)
    }

    /// Set an explicit property value after checking name and type.
    pub fn set_property(
        &self,
        tree: &mut ComponentTree,
        id: &ComponentId,
        name: &str,
        value: PropValue,
    ) -> Result<()> {
        if let Err(err) = self
            .scope(tree, id)
            .and_then(|scope| Ok(scope.check_assignment(name, &value).map(|_| ())?))
        {
            return reject(err);
        }
        let node = tree
            .find_mut(id)
            .ok_or_else(|| TreeError::NotFound(id.clone()))?;
        debug!(%id, name, %value, "set property");
        node.properties.insert(name.to_string(), value);
        Ok(())
    }

    /// Drop the explicit value so the default applies again.
    ///
    /// Returns whether a value was removed.
    pub fn clear_property(
        &self,
        tree: &mut ComponentTree,
        id: &ComponentId,
        name: &str,
    ) -> Result<bool> {
        let node = tree
            .find_mut(id)
            .ok_or_else(|| TreeError::NotFound(id.clone()))?;
        let removed = node.properties.remove(name).is_some();
        debug!(%id, name, removed, "cleared property");
        Ok(removed)
    }

    /// Attach (or with a blank description, remove) an action note.
    pub fn set_action(
        &self,
        tree: &mut ComponentTree,
        id: &ComponentId,
        prop_name: &str,
        description: &str,
    ) -> Result<()> {
        if let Err(err) = self
            .scope(tree, id)
            .and_then(|scope| Ok(scope.check_action(prop_name).map(|_| ())?))
        {
            return reject(err);
        }
        let node = tree
            .find_mut(id)
            .ok_or_else(|| TreeError::NotFound(id.clone()))?;
        let description = description.trim();
        node.actions.retain(|a| a.prop_name != prop_name);
        if !description.is_empty() {
            node.actions.push(ActionBinding {
                prop_name: prop_name.to_string(),
                description: description.to_string(),
            });
        }
        debug!(%id, prop_name, "updated action");
        Ok(())
    }

    /// Resolve where a new `type_name` under `parent` goes, and as which type.
    fn placement(
        &self,
        tree: &ComponentTree,
        parent: &ComponentId,
        slot: Option<&str>,
        type_name: &str,
    ) -> Result<(Container, String)> {
        let scope = self.scope(tree, parent)?;
        let parent_type = &scope.definition.type_name;
        match slot {
            Some(slot) => {
                let rule = scope.slot_rule(slot).ok_or_else(|| TreeError::UnknownSlot {
                    parent: parent.clone(),
                    type_name: parent_type.clone(),
                    slot: slot.to_string(),
                })?;
                let actual = rule.auto_add.unwrap_or(type_name);
                if !rule.allowed.permits(actual) {
                    return Err(TreeError::TypeNotAllowed {
                        parent: parent.clone(),
                        slot: slot.to_string(),
                        type_name: actual.to_string(),
                    });
                }
                self.require(actual)?;
                Ok((
                    Container::Slot(parent.clone(), slot.to_string()),
                    actual.to_string(),
                ))
            }
            None => {
                if !scope.definition.accepts_children {
                    return Err(TreeError::ChildrenNotAccepted {
                        parent: parent.clone(),
                        type_name: parent_type.clone(),
                    });
                }
                self.require(type_name)?;
                Ok((Container::Children(parent.clone()), type_name.to_string()))
            }
        }
    }

    fn plan_move(
        &self,
        tree: &ComponentTree,
        dragged: &ComponentId,
        target: &ComponentId,
        placement: DropPlacement,
    ) -> Result<ComponentTree> {
        let dragged_at = tree
            .locate(dragged)
            .ok_or_else(|| TreeError::NotFound(dragged.clone()))?;
        let target_at = tree
            .locate(target)
            .ok_or_else(|| TreeError::NotFound(target.clone()))?;
        let dragged_node = tree
            .find(dragged)
            .ok_or_else(|| TreeError::NotFound(dragged.clone()))?;
        if dragged_node.contains_id(target) {
            return Err(TreeError::DropIntoDescendant {
                dragged: dragged.clone(),
                target: target.clone(),
            });
        }

        match placement {
            DropPlacement::Before | DropPlacement::After => {
                if dragged_at.container != target_at.container {
                    return Err(TreeError::CrossLevelReorder {
                        dragged: dragged.clone(),
                        target: target.clone(),
                    });
                }
            }
            DropPlacement::Inside => {
                let target_node = tree
                    .find(target)
                    .ok_or_else(|| TreeError::NotFound(target.clone()))?;
                let definition = self.require(&target_node.type_name)?;
                if !definition.accepts_children {
                    return Err(TreeError::ChildrenNotAccepted {
                        parent: target.clone(),
                        type_name: target_node.type_name.clone(),
                    });
                }
            }
        }

        let mut working = tree.clone();
        let (_, node) = working
            .remove(dragged)
            .ok_or_else(|| TreeError::NotFound(dragged.clone()))?;
        // Indices shift after removal, so find the target again.
        let target_at = working
            .locate(target)
            .ok_or_else(|| TreeError::NotFound(target.clone()))?;
        let (container, index) = match placement {
            DropPlacement::Before => (target_at.container, target_at.index),
            DropPlacement::After => (target_at.container, target_at.index + 1),
            DropPlacement::Inside => (Container::Children(target.clone()), usize::MAX),
        };
        working
            .insert(&container, index, node)
            .map_err(|node| TreeError::NotFound(node.id))?;
        Ok(working)
    }

    fn require(&self, type_name: &str) -> Result<&'r ComponentTypeDefinition> {
        self.registry
            .lookup(type_name)
            .ok_or_else(|| TreeError::UnknownType(type_name.to_string()))
    }

    fn check_types(&self, subtree: &ComponentInstance) -> Result<()> {
        match subtree.preorder().find(|node| !self.registry.contains(&node.type_name)) {
            Some(node) => Err(TreeError::UnknownType(node.type_name.clone())),
            None => Ok(()),
        }
    }

    /// Build a fresh instance of `type_name`, pre-populated with the type's
    /// default slot children.
    fn instantiate(
        &mut self,
        type_name: &str,
        taken: &mut HashSet<ComponentId>,
    ) -> Result<ComponentInstance> {
        let definition = match self.require(type_name) {
            Ok(definition) => definition,
            Err(err) => return reject(err),
        };
        let mut node = ComponentInstance::new(self.fresh_id(taken), type_name);
        for (slot, templates) in &definition.default_slot_children {
            let children = templates
                .iter()
                .map(|template| template.instantiate(&mut || self.fresh_id(taken)))
                .collect();
            node.slot_children.insert(slot.clone(), children);
        }
        Ok(node)
    }

    fn fresh_id(&mut self, taken: &mut HashSet<ComponentId>) -> ComponentId {
        loop {
            let candidate = self.ids.next_component_id();
            if taken.insert(candidate.clone()) {
                return candidate;
            }
            debug!(%candidate, "id source produced a taken id, drawing again");
        }
    }
}

fn taken_ids(tree: &ComponentTree) -> HashSet<ComponentId> {
    tree.ids().cloned().collect()
}

fn reject<T>(err: TreeError) -> Result<T> {
    warn!(error = %err, "rejected tree mutation");
    Err(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proto_model::SequentialIds;

    fn id(value: &str) -> ComponentId {
        ComponentId::new(value).unwrap()
    }

    fn editor(registry: &ComponentRegistry) -> TreeEditor<'_, SequentialIds> {
        TreeEditor::with_ids(registry, SequentialIds::new("c"))
    }

    #[test]
    fn auto_add_overrides_requested_type() {
        let registry = ComponentRegistry::builtin().unwrap();
        let mut editor = editor(&registry);
        let mut tree = ComponentTree::new();
        let viewer = editor.insert_root(&mut tree, "ImageViewer").unwrap();
        let control = editor
            .insert_child(&mut tree, &viewer, Some("controls"), "Button")
            .unwrap();
        assert_eq!(tree.find(&control).unwrap().type_name, "ZoomPanControl");
    }

    #[test]
    fn leaf_parents_refuse_children() {
        let registry = ComponentRegistry::builtin().unwrap();
        let mut editor = editor(&registry);
        let mut tree = ComponentTree::new();
        let button = editor.insert_root(&mut tree, "Button").unwrap();
        let before = tree.clone();
        assert!(matches!(
            editor.insert_child(&mut tree, &button, None, "Icon"),
            Err(TreeError::ChildrenNotAccepted { .. })
        ));
        assert!(matches!(
            editor.insert_child(&mut tree, &button, Some("header"), "Icon"),
            Err(TreeError::UnknownSlot { .. })
        ));
        assert_eq!(tree, before);
    }

    #[test]
    fn unknown_types_are_rejected() {
        let registry = ComponentRegistry::builtin().unwrap();
        let mut editor = editor(&registry);
        let mut tree = ComponentTree::new();
        assert!(matches!(
            editor.insert_root(&mut tree, "Marquee"),
            Err(TreeError::UnknownType(_))
        ));
        assert!(tree.is_empty());
    }

    #[test]
    fn default_slot_children_get_fresh_ids() {
        let registry = ComponentRegistry::builtin().unwrap();
        let mut editor = editor(&registry);
        let mut tree = ComponentTree::new();
        let first = editor.insert_root(&mut tree, "HelpTutorial").unwrap();
        let second = editor.insert_root(&mut tree, "HelpTutorial").unwrap();
        assert_eq!(tree.find(&first).unwrap().slot("slides").len(), 3);
        assert_eq!(tree.find(&second).unwrap().slot("slides").len(), 3);
        assert!(tree.duplicate_id().is_none());
        assert_eq!(tree.len(), 2 * (1 + 3 + 2));
    }

    #[test]
    fn generated_slots_accept_allowed_types_within_count() {
        let registry = ComponentRegistry::builtin().unwrap();
        let mut editor = editor(&registry);
        let mut tree = ComponentTree::new();
        let table = editor.insert_root(&mut tree, "DataTable").unwrap();
        editor
            .insert_child(&mut tree, &table, Some("column2"), "Paragraph")
            .unwrap();
        assert!(matches!(
            editor.insert_child(&mut tree, &table, Some("column2"), "Row"),
            Err(TreeError::TypeNotAllowed { .. })
        ));
        assert!(matches!(
            editor.insert_child(&mut tree, &table, Some("column5"), "Paragraph"),
            Err(TreeError::UnknownSlot { .. })
        ));
        editor
            .set_property(&mut tree, &table, "columnCount", PropValue::Number(5.0))
            .unwrap();
        editor
            .insert_child(&mut tree, &table, Some("column5"), "Paragraph")
            .unwrap();
    }

    #[test]
    fn colliding_ids_are_redrawn() {
        let registry = ComponentRegistry::builtin().unwrap();
        let mut editor = editor(&registry);
        let mut tree = ComponentTree::from_roots(vec![ComponentInstance::new(id("c1"), "Row")]);
        let fresh = editor.insert_root(&mut tree, "Row").unwrap();
        assert_eq!(fresh.as_str(), "c2");
    }

    #[test]
    fn duplicate_lands_next_to_original_in_same_slot() {
        let registry = ComponentRegistry::builtin().unwrap();
        let mut editor = editor(&registry);
        let mut tree = ComponentTree::new();
        let card = editor.insert_root(&mut tree, "Card").unwrap();
        let first = editor
            .insert_child(&mut tree, &card, Some("header"), "Button")
            .unwrap();
        let second = editor
            .insert_child(&mut tree, &card, Some("header"), "Button")
            .unwrap();
        let copy = editor.duplicate(&mut tree, &first).unwrap();
        let header: Vec<&ComponentId> = tree
            .find(&card)
            .unwrap()
            .slot("header")
            .iter()
            .map(|n| &n.id)
            .collect();
        assert_eq!(header, vec![&first, &copy, &second]);
    }

    #[test]
    fn set_property_validates_against_parent_layout() {
        let registry = ComponentRegistry::builtin().unwrap();
        let mut editor = editor(&registry);
        let mut tree = ComponentTree::new();
        let grid = editor.insert_root(&mut tree, "Grid").unwrap();
        let button = editor.insert_child(&mut tree, &grid, None, "Button").unwrap();
        editor
            .set_property(&mut tree, &button, "columnSpan", PropValue::Number(2.0))
            .unwrap();
        assert!(editor
            .set_property(&mut tree, &button, "variant", PropValue::from("neon"))
            .is_err());
        assert!(editor
            .set_property(&mut tree, &grid, "columnSpan", PropValue::Number(2.0))
            .is_err());
        assert!(editor.clear_property(&mut tree, &button, "columnSpan").unwrap());
        assert!(!editor.clear_property(&mut tree, &button, "columnSpan").unwrap());
    }

    #[test]
    fn actions_are_upserted_and_cleared() {
        let registry = ComponentRegistry::builtin().unwrap();
        let mut editor = editor(&registry);
        let mut tree = ComponentTree::new();
        let button = editor.insert_root(&mut tree, "Button").unwrap();
        editor
            .set_action(&mut tree, &button, "onClick", "Open settings")
            .unwrap();
        editor
            .set_action(&mut tree, &button, "onClick", "Open profile")
            .unwrap();
        let node = tree.find(&button).unwrap();
        assert_eq!(node.actions.len(), 1);
        assert_eq!(node.action("onClick"), Some("Open profile"));

        editor.set_action(&mut tree, &button, "onClick", "  ").unwrap();
        assert!(tree.find(&button).unwrap().actions.is_empty());
        assert!(editor.set_action(&mut tree, &button, "label", "x").is_err());
    }

    #[test]
    fn insert_subtree_rejects_clashing_ids() {
        let registry = ComponentRegistry::builtin().unwrap();
        let mut editor = editor(&registry);
        let mut tree = ComponentTree::new();
        let row = editor.insert_root(&mut tree, "Row").unwrap();
        let clash = ComponentInstance::new(row.clone(), "Button");
        assert!(matches!(
            editor.insert_subtree(&mut tree, None, None, clash),
            Err(TreeError::IdCollision(_))
        ));
        let fresh = ComponentInstance::new(id("fresh"), "Button");
        editor
            .insert_subtree(&mut tree, Some(&row), None, fresh)
            .unwrap();
        assert_eq!(tree.find(&row).unwrap().children.len(), 1);
    }
}
