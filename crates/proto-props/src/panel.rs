//! What a property editor shows, and what a renderer receives.

use std::collections::BTreeMap;

use proto_model::{PropValue, PropertyDefinition, SemanticType};

use crate::error::{PropertyError, Result};
use crate::scope::PropertyScope;
use crate::slots::AvailableSlot;
use crate::value::validate_value;

/// One row of the property editor.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelEntry<'a> {
    pub definition: &'a PropertyDefinition,
    pub value: Option<&'a PropValue>,
    /// Whether `value` was set on the instance rather than defaulted.
    pub explicit: bool,
}

/// A function property that takes a free-text action note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionEntry<'a> {
    pub prop_name: &'a str,
    pub description: Option<&'a str>,
    pub help: Option<&'a str>,
}

/// Full editor view of one instance.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyPanel<'a> {
    pub type_name: &'a str,
    pub properties: Vec<PanelEntry<'a>>,
    pub layout: Vec<PanelEntry<'a>>,
    pub actions: Vec<ActionEntry<'a>>,
    pub slots: Vec<AvailableSlot<'a>>,
}

impl<'a> PropertyScope<'a> {
    /// Build the editor view from the current property values.
    pub fn panel(&self) -> PropertyPanel<'a> {
        let entry = |definition: &'a PropertyDefinition| PanelEntry {
            definition,
            value: self.effective_value(&definition.name),
            explicit: self.instance.properties.contains_key(&definition.name),
        };
        let actions = self
            .visible_properties()
            .into_iter()
            .filter(|p| p.semantic_type == SemanticType::Function && p.accepts_action)
            .map(|p| ActionEntry {
                prop_name: &p.name,
                description: self.instance.action(&p.name),
                help: p.description.as_deref(),
            })
            .collect();
        PropertyPanel {
            type_name: &self.definition.type_name,
            properties: self.visible_properties().into_iter().map(entry).collect(),
            layout: self
                .visible_layout_properties()
                .into_iter()
                .map(entry)
                .collect(),
            actions,
            slots: self.available_slots(),
        }
    }

    /// Effective values of every declared and layout property, by name.
    ///
    /// Properties with neither an explicit value nor a default are absent.
    pub fn resolved_properties(&self) -> BTreeMap<String, PropValue> {
        self.definition
            .properties
            .iter()
            .chain(self.layout.iter())
            .filter_map(|def| {
                self.effective_value(&def.name)
                    .map(|value| (def.name.clone(), value.clone()))
            })
            .collect()
    }

    /// Validate a write of `value` to `name`, returning its definition.
    pub fn check_assignment(&self, name: &str, value: &PropValue) -> Result<&'a PropertyDefinition> {
        let definition = self.definition_of(name).ok_or_else(|| self.unknown(name))?;
        validate_value(definition, value)?;
        Ok(definition)
    }

    /// Validate that `name` may carry an action note.
    pub fn check_action(&self, name: &str) -> Result<&'a PropertyDefinition> {
        let definition = self.definition_of(name).ok_or_else(|| self.unknown(name))?;
        if definition.semantic_type != SemanticType::Function || !definition.accepts_action {
            return Err(PropertyError::NotAnAction {
                type_name: self.definition.type_name.clone(),
                property: name.to_string(),
            });
        }
        Ok(definition)
    }

    fn unknown(&self, name: &str) -> PropertyError {
        PropertyError::UnknownProperty {
            type_name: self.definition.type_name.clone(),
            property: name.to_string(),
        }
    }
}
