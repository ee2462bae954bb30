//! Structural hashing for "unchanged since instantiated" detection.

use std::collections::BTreeMap;

use proto_model::{ComponentInstance, PropValue};
use serde::Serialize;
use sha2::{Digest, Sha256};

/// The part of an instance the structural hash covers.
///
/// Only the root's own shape: descendants count, their content does not.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HashInput<'a> {
    type_name: &'a str,
    properties: &'a BTreeMap<String, PropValue>,
    child_count: usize,
    slot_names: Vec<&'a str>,
}

/// SHA-256 (hex) over the type, explicit properties, ordinary child count
/// and slot names of `instance`.
///
/// Deterministic: properties and slots are keyed by sorted maps, so the
/// canonical JSON fed to the digest is stable.
pub fn structural_hash(instance: &ComponentInstance) -> String {
    let input = HashInput {
        type_name: &instance.type_name,
        properties: &instance.properties,
        child_count: instance.children.len(),
        slot_names: instance.slot_names().collect(),
    };
    // Serializing plain strings, numbers and maps cannot fail.
    let canonical = serde_json::to_vec(&input).unwrap_or_default();
    hex::encode(Sha256::digest(&canonical))
}

/// Whether an instantiated saved composition still matches its snapshot.
///
/// `false` for instances that did not come from the library.
pub fn is_unmodified(instance: &ComponentInstance) -> bool {
    instance
        .saved_composition_ref
        .as_ref()
        .is_some_and(|origin| origin.structural_hash == structural_hash(instance))
}
