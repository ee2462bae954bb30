//! Structural invariants of the mutation engine under random edit sequences.

use proptest::prelude::*;
use proto_model::{ComponentId, ComponentInstance, IdSource, SequentialIds};
use proto_registry::ComponentRegistry;
use proto_tree::{ComponentTree, DropPlacement, TreeEditor, TreeError};

const TYPES: &[&str] = &[
    "Row",
    "Column",
    "Grid",
    "Card",
    "Button",
    "Paragraph",
    "DataTable",
    "HelpTutorial",
];
const SLOTS: &[&str] = &["header", "content", "column1", "column2", "slides", "cards"];
const PLACEMENTS: &[DropPlacement] = &[
    DropPlacement::Before,
    DropPlacement::After,
    DropPlacement::Inside,
];

#[derive(Debug, Clone)]
enum Op {
    InsertRoot(usize),
    InsertChild(usize, usize),
    InsertInSlot(usize, usize, usize),
    Delete(usize),
    Duplicate(usize),
    Move(usize, usize, usize),
}

fn op() -> impl Strategy<Value = Op> {
    let pick = 0..64usize;
    prop_oneof![
        2 => (0..TYPES.len()).prop_map(Op::InsertRoot),
        3 => (pick.clone(), 0..TYPES.len()).prop_map(|(at, ty)| Op::InsertChild(at, ty)),
        3 => (pick.clone(), 0..SLOTS.len(), 0..TYPES.len())
            .prop_map(|(at, slot, ty)| Op::InsertInSlot(at, slot, ty)),
        1 => pick.clone().prop_map(Op::Delete),
        2 => pick.clone().prop_map(Op::Duplicate),
        3 => (pick.clone(), pick, 0..PLACEMENTS.len()).prop_map(|(a, b, p)| Op::Move(a, b, p)),
    ]
}

fn nth_id(tree: &ComponentTree, index: usize) -> Option<ComponentId> {
    let ids: Vec<&ComponentId> = tree.ids().collect();
    if ids.is_empty() {
        None
    } else {
        Some(ids[index % ids.len()].clone())
    }
}

fn apply(editor: &mut TreeEditor<'_, SequentialIds>, tree: &mut ComponentTree, op: &Op) {
    // Rejections are expected; only the resulting shape matters here.
    match *op {
        Op::InsertRoot(ty) => {
            let _ = editor.insert_root(tree, TYPES[ty]);
        }
        Op::InsertChild(at, ty) => {
            if let Some(parent) = nth_id(tree, at) {
                let _ = editor.insert_child(tree, &parent, None, TYPES[ty]);
            }
        }
        Op::InsertInSlot(at, slot, ty) => {
            if let Some(parent) = nth_id(tree, at) {
                let _ = editor.insert_child(tree, &parent, Some(SLOTS[slot]), TYPES[ty]);
            }
        }
        Op::Delete(at) => {
            if let Some(id) = nth_id(tree, at) {
                editor.delete(tree, &id);
            }
        }
        Op::Duplicate(at) => {
            if let Some(id) = nth_id(tree, at) {
                let _ = editor.duplicate(tree, &id);
            }
        }
        Op::Move(a, b, p) => {
            if let (Some(dragged), Some(target)) = (nth_id(tree, a), nth_id(tree, b)) {
                let _ = editor.move_node(tree, &dragged, &target, PLACEMENTS[p]);
            }
        }
    }
}

fn build(ops: &[Op], registry: &ComponentRegistry) -> ComponentTree {
    let mut editor = TreeEditor::with_ids(registry, SequentialIds::new("n"));
    let mut tree = ComponentTree::new();
    for op in ops {
        apply(&mut editor, &mut tree, op);
    }
    tree
}

/// The subtree with ids renumbered in traversal order, for shape comparison.
fn shape(node: &ComponentInstance) -> ComponentInstance {
    let mut copy = node.clone();
    let mut ids = SequentialIds::new("shape");
    copy.regenerate_ids(&mut || ids.next_component_id());
    copy
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn ids_stay_unique(ops in prop::collection::vec(op(), 1..40)) {
        let registry = ComponentRegistry::builtin().unwrap();
        let mut editor = TreeEditor::with_ids(&registry, SequentialIds::new("n"));
        let mut tree = ComponentTree::new();
        for op in &ops {
            apply(&mut editor, &mut tree, op);
            prop_assert!(tree.duplicate_id().is_none(), "duplicate id after {:?}", op);
        }
    }

    #[test]
    fn delete_removes_whole_subtree(ops in prop::collection::vec(op(), 1..30), pick in 0..64usize) {
        let registry = ComponentRegistry::builtin().unwrap();
        let mut tree = build(&ops, &registry);
        let Some(victim) = nth_id(&tree, pick) else {
            return Ok(());
        };
        let owned: Vec<ComponentId> = tree.find(&victim).unwrap().ids().cloned().collect();
        let before = tree.len();

        let editor = TreeEditor::with_ids(&registry, SequentialIds::new("x"));
        let removed = editor.delete(&mut tree, &victim).unwrap();

        prop_assert_eq!(removed.ids().count(), owned.len());
        prop_assert_eq!(tree.len(), before - owned.len());
        for id in &owned {
            prop_assert!(!tree.contains(id));
            prop_assert!(tree.locate(id).is_none());
        }
    }

    #[test]
    fn duplicate_is_a_fresh_sibling(ops in prop::collection::vec(op(), 1..30), pick in 0..64usize) {
        let registry = ComponentRegistry::builtin().unwrap();
        let mut tree = build(&ops, &registry);
        let Some(original) = nth_id(&tree, pick) else {
            return Ok(());
        };
        let location = tree.locate(&original).unwrap();

        let mut editor = TreeEditor::with_ids(&registry, SequentialIds::new("dup"));
        let copy = editor.duplicate(&mut tree, &original).unwrap();

        let copy_at = tree.locate(&copy).unwrap();
        prop_assert_eq!(&copy_at.container, &location.container);
        prop_assert_eq!(copy_at.index, location.index + 1);

        let original_node = tree.find(&original).unwrap();
        let copy_node = tree.find(&copy).unwrap();
        prop_assert_eq!(shape(original_node), shape(copy_node));
        prop_assert!(original_node.ids().all(|id| !copy_node.contains_id(id)));
        prop_assert!(tree.duplicate_id().is_none());
    }

    #[test]
    fn cross_level_reorder_is_rejected_untouched(
        ops in prop::collection::vec(op(), 1..30),
        a in 0..64usize,
        b in 0..64usize,
        after in any::<bool>(),
    ) {
        let registry = ComponentRegistry::builtin().unwrap();
        let mut tree = build(&ops, &registry);
        let (Some(dragged), Some(target)) = (nth_id(&tree, a), nth_id(&tree, b)) else {
            return Ok(());
        };
        let dragged_at = tree.locate(&dragged).unwrap();
        let target_at = tree.locate(&target).unwrap();
        if dragged_at.container == target_at.container
            || tree.find(&dragged).unwrap().contains_id(&target)
        {
            return Ok(());
        }

        let snapshot = serde_json::to_string(&tree).unwrap();
        let placement = if after { DropPlacement::After } else { DropPlacement::Before };
        let editor = TreeEditor::with_ids(&registry, SequentialIds::new("x"));
        let result = editor.move_node(&mut tree, &dragged, &target, placement);

        prop_assert!(
            matches!(result, Err(TreeError::CrossLevelReorder { .. })),
            "unexpected {:?}",
            result
        );
        prop_assert_eq!(serde_json::to_string(&tree).unwrap(), snapshot);
    }
}

#[test]
fn delete_child_leaves_empty_parent() {
    let registry = ComponentRegistry::builtin().unwrap();
    let mut editor = TreeEditor::with_ids(&registry, SequentialIds::new("n"));
    let mut tree = ComponentTree::new();

    let row = editor.insert_root(&mut tree, "Row").unwrap();
    let button = editor.insert_child(&mut tree, &row, None, "Button").unwrap();
    assert_eq!(tree.find(&row).unwrap().children.len(), 1);

    editor.delete(&mut tree, &button);
    assert!(tree.find(&row).unwrap().children.is_empty());
    assert_eq!(tree.len(), 1);
}

#[test]
fn slot_rejects_type_outside_allowed_set() {
    let registry = ComponentRegistry::builtin().unwrap();
    let mut editor = TreeEditor::with_ids(&registry, SequentialIds::new("n"));
    let mut tree = ComponentTree::new();

    let card = editor.insert_root(&mut tree, "Card").unwrap();
    let before = tree.find(&card).unwrap().slot_children.clone();
    let err = editor
        .insert_child(&mut tree, &card, Some("header"), "TextField")
        .unwrap_err();

    assert!(matches!(err, TreeError::TypeNotAllowed { .. }));
    assert_eq!(tree.find(&card).unwrap().slot_children, before);
}

#[test]
fn drop_inside_moves_root_under_container() {
    let registry = ComponentRegistry::builtin().unwrap();
    let mut editor = TreeEditor::with_ids(&registry, SequentialIds::new("n"));
    let mut tree = ComponentTree::new();

    let a = editor.insert_root(&mut tree, "Button").unwrap();
    let b = editor.insert_root(&mut tree, "Row").unwrap();
    editor
        .move_node(&mut tree, &a, &b, DropPlacement::Inside)
        .unwrap();

    let roots: Vec<&ComponentId> = tree.roots.iter().map(|n| &n.id).collect();
    assert_eq!(roots, vec![&b]);
    let children: Vec<&ComponentId> = tree.roots[0].children.iter().map(|n| &n.id).collect();
    assert_eq!(children, vec![&a]);
}

#[test]
fn drop_inside_a_leaf_is_rejected() {
    let registry = ComponentRegistry::builtin().unwrap();
    let mut editor = TreeEditor::with_ids(&registry, SequentialIds::new("n"));
    let mut tree = ComponentTree::new();

    let a = editor.insert_root(&mut tree, "Row").unwrap();
    let b = editor.insert_root(&mut tree, "Button").unwrap();
    let before = tree.clone();
    assert!(matches!(
        editor.move_node(&mut tree, &a, &b, DropPlacement::Inside),
        Err(TreeError::ChildrenNotAccepted { .. })
    ));
    assert_eq!(tree, before);
}

#[test]
fn drop_onto_own_descendant_is_rejected() {
    let registry = ComponentRegistry::builtin().unwrap();
    let mut editor = TreeEditor::with_ids(&registry, SequentialIds::new("n"));
    let mut tree = ComponentTree::new();

    let outer = editor.insert_root(&mut tree, "Row").unwrap();
    let inner = editor.insert_child(&mut tree, &outer, None, "Column").unwrap();
    let before = tree.clone();
    assert!(matches!(
        editor.move_node(&mut tree, &outer, &inner, DropPlacement::Inside),
        Err(TreeError::DropIntoDescendant { .. })
    ));
    assert_eq!(tree, before);

    editor
        .move_node(&mut tree, &outer, &outer, DropPlacement::Inside)
        .unwrap();
    assert_eq!(tree, before);
}

#[test]
fn reorder_within_slot_before_and_after() {
    let registry = ComponentRegistry::builtin().unwrap();
    let mut editor = TreeEditor::with_ids(&registry, SequentialIds::new("n"));
    let mut tree = ComponentTree::new();

    let card = editor.insert_root(&mut tree, "Card").unwrap();
    let first = editor.insert_child(&mut tree, &card, Some("content"), "Paragraph").unwrap();
    let second = editor.insert_child(&mut tree, &card, Some("content"), "Divider").unwrap();
    let third = editor.insert_child(&mut tree, &card, Some("content"), "Icon").unwrap();

    editor
        .move_node(&mut tree, &third, &first, DropPlacement::Before)
        .unwrap();
    editor
        .move_node(&mut tree, &first, &second, DropPlacement::After)
        .unwrap();

    let order: Vec<&ComponentId> = tree
        .find(&card)
        .unwrap()
        .slot("content")
        .iter()
        .map(|n| &n.id)
        .collect();
    assert_eq!(order, vec![&third, &second, &first]);
}

#[test]
fn drag_session_commits_pointer_placement() {
    let registry = ComponentRegistry::builtin().unwrap();
    let mut editor = TreeEditor::with_ids(&registry, SequentialIds::new("n"));
    let mut tree = ComponentTree::new();

    let a = editor.insert_root(&mut tree, "Paragraph").unwrap();
    let b = editor.insert_root(&mut tree, "Column").unwrap();

    let mut session = proto_tree::DragSession::start(a.clone());
    assert!(!session.hover_at(&editor, &tree, &a, 20.0, 40.0).unwrap());
    assert!(session.hover_at(&editor, &tree, &b, 20.0, 40.0).unwrap());
    let ghost = ComponentId::new("ghost").unwrap();
    assert!(matches!(
        session.hover_at(&editor, &tree, &ghost, 20.0, 40.0),
        Err(TreeError::NotFound(_))
    ));
    assert_eq!(
        session.candidate().map(|c| c.placement),
        Some(DropPlacement::Inside)
    );
    assert!(session.commit(&editor, &mut tree).unwrap());
    assert_eq!(tree.roots.len(), 1);
    assert_eq!(tree.roots[0].children[0].id, a);

    let idle = proto_tree::DragSession::start(b);
    assert!(!idle.commit(&editor, &mut tree).unwrap());
}
