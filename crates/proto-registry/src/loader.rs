//! Catalogue parsing and validation.
//!
//! A catalogue is checked once, at load time, so that every later lookup
//! can trust what it finds: every referenced type exists, every `showWhen`
//! key names a property that can exist next to it, and every auto-added
//! type is accepted by its own slot.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::Path;

use proto_model::{
    AllowedTypes, ComponentTemplate, ComponentTypeDefinition, PropValue, PropertyDefinition,
    SemanticType, ShowWhen,
};
use serde::{Deserialize, Serialize};

use crate::error::{RegistryError, Result};

/// Raw catalogue document as stored on disk or embedded.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalogue {
    /// Display order of categories.
    pub categories: Vec<String>,
    /// Extra properties children receive from their parent's type.
    #[serde(default)]
    pub layout_overlays: BTreeMap<String, Vec<PropertyDefinition>>,
    pub types: Vec<ComponentTypeDefinition>,
}

/// Parse catalogue JSON without validating it.
pub fn parse(json: &str) -> Result<Catalogue> {
    Ok(serde_json::from_str(json)?)
}

/// Read and parse a catalogue file.
pub fn read(path: &Path) -> Result<Catalogue> {
    let json = std::fs::read_to_string(path).map_err(|source| RegistryError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&json)
}

/// Check every cross-reference in the catalogue.
///
/// Stops at the first problem found.
pub fn validate(catalogue: &Catalogue) -> Result<()> {
    let mut type_names = HashSet::new();
    for def in &catalogue.types {
        if !type_names.insert(def.type_name.as_str()) {
            return Err(RegistryError::DuplicateType(def.type_name.clone()));
        }
    }

    for parent in catalogue.layout_overlays.keys() {
        if !type_names.contains(parent.as_str()) {
            return Err(RegistryError::UnknownOverlayParent(parent.clone()));
        }
    }

    // The parent is unknown at definition time, so a condition may lean on
    // any overlay property.
    let overlay_names: BTreeSet<&str> = catalogue
        .layout_overlays
        .values()
        .flatten()
        .map(|p| p.name.as_str())
        .collect();

    for (parent, overlay) in &catalogue.layout_overlays {
        let names: BTreeSet<&str> = overlay.iter().map(|p| p.name.as_str()).collect();
        for prop in overlay {
            check_conditions(parent, &prop.name, &prop.show_when, |n| names.contains(n))?;
            check_default(parent, prop)?;
        }
    }

    let categories: HashSet<&str> = catalogue.categories.iter().map(String::as_str).collect();
    let known = |name: &str| type_names.contains(name);

    for def in &catalogue.types {
        if !categories.contains(def.category.as_str()) {
            return Err(RegistryError::UnknownCategory {
                type_name: def.type_name.clone(),
                category: def.category.clone(),
            });
        }
        validate_type(def, &overlay_names, &known)?;
    }

    for def in &catalogue.types {
        for (slot, templates) in &def.default_slot_children {
            if !slot_is_declared(def, slot) {
                return Err(RegistryError::UnknownDefaultSlot {
                    type_name: def.type_name.clone(),
                    slot: slot.clone(),
                });
            }
            for template in templates {
                check_template(&def.type_name, template, catalogue)?;
            }
        }
    }

    Ok(())
}

fn validate_type(
    def: &ComponentTypeDefinition,
    overlay_names: &BTreeSet<&str>,
    known: &impl Fn(&str) -> bool,
) -> Result<()> {
    let mut seen = HashSet::new();
    for prop in &def.properties {
        if !seen.insert(prop.name.as_str()) {
            return Err(duplicate(def, &prop.name));
        }
    }
    let declared = |name: &str| def.property(name).is_some() || overlay_names.contains(name);

    for prop in &def.properties {
        check_conditions(&def.type_name, &prop.name, &prop.show_when, declared)?;
        check_default(&def.type_name, prop)?;
    }

    let mut seen_slots = HashSet::new();
    for slot in &def.slots {
        if !seen_slots.insert(slot.name.as_str()) {
            return Err(duplicate(def, &slot.name));
        }
        check_conditions(&def.type_name, &slot.name, &slot.show_when, declared)?;
        check_allowed(def, &slot.name, &slot.allowed_type_names, known)?;
        if let Some(auto_add) = &slot.auto_add_type_name {
            if !known(auto_add.as_str()) {
                return Err(RegistryError::UnknownReference {
                    type_name: def.type_name.clone(),
                    context: slot.name.clone(),
                    referenced: auto_add.clone(),
                });
            }
            if !slot.allowed_type_names.permits(auto_add) {
                return Err(RegistryError::AutoAddNotAllowed {
                    type_name: def.type_name.clone(),
                    slot: slot.name.clone(),
                    auto_add: auto_add.clone(),
                });
            }
        }
    }

    if let Some(dynamic) = &def.dynamic_slots {
        let count_ok = def
            .property(&dynamic.count_property)
            .is_some_and(|p| p.semantic_type == SemanticType::Number);
        if !count_ok {
            return Err(RegistryError::InvalidSlotCount {
                type_name: def.type_name.clone(),
                property: dynamic.count_property.clone(),
            });
        }
        if let Some(header) = &dynamic.header_property {
            if def.property(header).is_none() {
                return Err(RegistryError::DanglingCondition {
                    type_name: def.type_name.clone(),
                    owner: dynamic.prefix.clone(),
                    property: header.clone(),
                });
            }
        }
        check_allowed(def, &dynamic.prefix, &dynamic.allowed_type_names, known)?;
    }

    Ok(())
}

fn duplicate(def: &ComponentTypeDefinition, name: &str) -> RegistryError {
    RegistryError::DuplicateMember {
        type_name: def.type_name.clone(),
        name: name.to_string(),
    }
}

fn check_conditions(
    type_name: &str,
    owner: &str,
    show_when: &ShowWhen,
    declared: impl Fn(&str) -> bool,
) -> Result<()> {
    match show_when.referenced_properties().find(|&p| !declared(p)) {
        Some(property) => Err(RegistryError::DanglingCondition {
            type_name: type_name.to_string(),
            owner: owner.to_string(),
            property: property.to_string(),
        }),
        None => Ok(()),
    }
}

fn check_default(type_name: &str, prop: &PropertyDefinition) -> Result<()> {
    if prop.enum_options.is_empty() || prop.is_icon_reference {
        return Ok(());
    }
    match &prop.default_value {
        None => Ok(()),
        Some(PropValue::Text(value)) if prop.enum_options.contains(value) => Ok(()),
        Some(other) => Err(RegistryError::DefaultNotAnOption {
            type_name: type_name.to_string(),
            property: prop.name.clone(),
            value: other.to_string(),
        }),
    }
}

fn check_allowed(
    def: &ComponentTypeDefinition,
    context: &str,
    allowed: &AllowedTypes,
    known: &impl Fn(&str) -> bool,
) -> Result<()> {
    let Some(names) = allowed.names() else {
        return Ok(());
    };
    match names.iter().find(|n| !known(n.as_str())) {
        Some(unknown) => Err(RegistryError::UnknownReference {
            type_name: def.type_name.clone(),
            context: context.to_string(),
            referenced: unknown.clone(),
        }),
        None => Ok(()),
    }
}

fn slot_is_declared(def: &ComponentTypeDefinition, slot: &str) -> bool {
    def.static_slot(slot).is_some()
        || def
            .dynamic_slots
            .as_ref()
            .is_some_and(|d| d.slot_index(slot).is_some())
}

fn check_template(owner: &str, template: &ComponentTemplate, catalogue: &Catalogue) -> Result<()> {
    let Some(def) = catalogue
        .types
        .iter()
        .find(|t| t.type_name == template.type_name)
    else {
        return Err(RegistryError::UnknownReference {
            type_name: owner.to_string(),
            context: "defaultSlotChildren".to_string(),
            referenced: template.type_name.clone(),
        });
    };
    for (slot, children) in &template.slot_children {
        if !slot_is_declared(def, slot) {
            return Err(RegistryError::UnknownDefaultSlot {
                type_name: def.type_name.clone(),
                slot: slot.clone(),
            });
        }
        for child in children {
            check_template(owner, child, catalogue)?;
        }
    }
    for child in &template.children {
        check_template(owner, child, catalogue)?;
    }
    Ok(())
}
