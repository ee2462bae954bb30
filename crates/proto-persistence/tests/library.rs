//! Saved compositions across save, instantiate and edit.

use std::collections::BTreeMap;

use proptest::prelude::*;
use proto_model::{
    ComponentId, ComponentInstance, IdSource, PropValue, RandomIds, SequentialIds,
};
use proto_persistence::{
    CompositionLibrary, FileStore, MemoryStore, is_unmodified, structural_hash,
};
use proto_registry::ComponentRegistry;
use proto_tree::{ComponentTree, TreeEditor};

fn placeholder() -> ComponentId {
    ComponentId::new("tmp").unwrap()
}

fn properties() -> impl Strategy<Value = BTreeMap<String, PropValue>> {
    let value = prop_oneof![
        any::<bool>().prop_map(PropValue::Bool),
        (-1000i32..1000).prop_map(PropValue::from),
        "[a-z]{0,8}".prop_map(PropValue::Text),
    ];
    prop::collection::btree_map("[a-z]{1,6}", value, 0..4)
}

fn subtree() -> impl Strategy<Value = ComponentInstance> {
    let types = prop::sample::select(vec!["Row", "Card", "Button", "Paragraph", "Icon"]);
    let leaf = (types, properties()).prop_map(|(type_name, properties)| {
        let mut node = ComponentInstance::new(placeholder(), type_name);
        node.properties = properties;
        node
    });
    let tree = leaf.prop_recursive(3, 24, 3, |inner| {
        (
            inner.clone(),
            prop::collection::vec(inner.clone(), 0..3),
            prop::collection::btree_map(
                prop::sample::select(vec!["header", "content", "column1"]),
                prop::collection::vec(inner, 0..2),
                0..2,
            ),
        )
            .prop_map(|(mut node, children, slots)| {
                node.children = children;
                node.slot_children = slots
                    .into_iter()
                    .map(|(name, list)| (name.to_string(), list))
                    .collect();
                node
            })
    });
    tree.prop_map(|mut node| {
        let mut ids = SequentialIds::new("orig");
        node.regenerate_ids(&mut || ids.next_component_id());
        node
    })
}

/// The subtree with ids and origin markers stripped, for shape comparison.
fn shape(node: &ComponentInstance) -> ComponentInstance {
    let mut copy = node.clone();
    let mut ids = SequentialIds::new("shape");
    copy.regenerate_ids(&mut || ids.next_component_id());
    copy.saved_composition_ref = None;
    copy
}

proptest! {
    #[test]
    fn instantiate_regenerates_every_id(original in subtree()) {
        let mut library = CompositionLibrary::new(MemoryStore::new());
        let saved = library.save(&original, "Sample", None).unwrap();

        let mut ids = RandomIds::new();
        let copy = library
            .instantiate(&saved.id, &mut || ids.next_component_id())
            .unwrap()
            .unwrap();

        prop_assert_eq!(shape(&copy), shape(&original));
        prop_assert!(copy.ids().all(|id| !original.contains_id(id)));
        prop_assert!(copy.duplicate_id().is_none());

        let origin = copy.saved_composition_ref.as_ref().unwrap();
        prop_assert_eq!(&origin.source_id, &saved.id);
        prop_assert_eq!(&origin.structural_hash, &structural_hash(&original));
        prop_assert!(is_unmodified(&copy));

        // The stored snapshot is untouched by instantiation.
        prop_assert_eq!(library.get(&saved.id).unwrap().unwrap().component_snapshot, original);
    }
}

#[test]
fn root_edits_clear_unmodified() {
    let original = ComponentInstance::new(ComponentId::new("r").unwrap(), "Row")
        .with_property("title", "Toolbar")
        .with_child(ComponentInstance::new(ComponentId::new("b").unwrap(), "Button"));
    let mut library = CompositionLibrary::new(MemoryStore::new());
    let saved = library.save(&original, "Toolbar", None).unwrap();
    let mut ids = SequentialIds::new("n");
    let mut next = || ids.next_component_id();

    let fresh = library.instantiate(&saved.id, &mut next).unwrap().unwrap();
    assert!(is_unmodified(&fresh));

    let mut retitled = fresh.clone();
    retitled
        .properties
        .insert("title".to_string(), PropValue::from("Actions"));
    assert!(!is_unmodified(&retitled));

    let mut grown = fresh.clone();
    grown.children.push(ComponentInstance::new(
        ComponentId::new("extra").unwrap(),
        "Icon",
    ));
    assert!(!is_unmodified(&grown));

    let mut shrunk = fresh.clone();
    shrunk.children.clear();
    assert!(!is_unmodified(&shrunk));

    // Grandchild edits are below what the hash covers.
    let mut deep = fresh;
    deep.children[0]
        .properties
        .insert("label".to_string(), PropValue::from("Changed"));
    assert!(is_unmodified(&deep));
}

#[test]
fn instantiated_copy_drops_into_a_tree() {
    let registry = ComponentRegistry::builtin().unwrap();
    let mut editor = TreeEditor::with_ids(&registry, SequentialIds::new("c"));
    let mut tree = ComponentTree::new();
    let screen = editor.insert_root(&mut tree, "Screen").unwrap();
    let card = editor.insert_child(&mut tree, &screen, None, "Card").unwrap();
    editor
        .insert_child(&mut tree, &card, Some("header"), "Button")
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("library.json");
    let mut library = CompositionLibrary::new(FileStore::open(&path).unwrap());
    let saved = library
        .save(tree.find(&card).unwrap(), "Header card", Some("Card with one button"))
        .unwrap();

    // A second session sees the saved entry.
    let library = CompositionLibrary::new(FileStore::open(&path).unwrap());
    assert_eq!(library.list().unwrap().len(), 1);

    let mut ids = RandomIds::new();
    let copy = library
        .instantiate(&saved.id, &mut || ids.next_component_id())
        .unwrap()
        .unwrap();
    let copy_id = editor
        .insert_subtree(&mut tree, Some(&screen), None, copy)
        .unwrap();

    assert_eq!(tree.find(&screen).unwrap().children.len(), 2);
    assert!(tree.duplicate_id().is_none());
    assert!(is_unmodified(tree.find(&copy_id).unwrap()));
}
