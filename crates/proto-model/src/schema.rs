//! Component type definitions.
//!
//! These are the entries of the metadata registry: what a kind of
//! component is called, which properties it exposes, and where children
//! may be attached (ordinary children, named slots, or generated slots).
//!
//! Field names serialize in camelCase so the catalogue JSON reads the same
//! as the data model it describes.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::ids::ComponentId;
use crate::instance::ComponentInstance;
use crate::predicate::ShowWhen;
use crate::value::PropValue;

/// Semantic type of a property, deciding how it is edited and validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SemanticType {
    String,
    Number,
    Boolean,
    Enum,
    Color,
    Spacing,
    Typography,
    Elevation,
    Function,
    Node,
    ComponentRef,
}

impl SemanticType {
    pub fn label(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Enum => "enum",
            Self::Color => "color",
            Self::Spacing => "spacing",
            Self::Typography => "typography",
            Self::Elevation => "elevation",
            Self::Function => "function",
            Self::Node => "node",
            Self::ComponentRef => "componentRef",
        }
    }
}

/// One property a component type exposes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDefinition {
    pub name: String,
    pub semantic_type: SemanticType,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<PropValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enum_options: Vec<String>,
    /// Value names an icon in the host's asset registry.
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_icon_reference: bool,
    /// Function property whose behaviour is described by an action note.
    #[serde(default, skip_serializing_if = "is_false")]
    pub accepts_action: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "ShowWhen::is_empty")]
    pub show_when: ShowWhen,
}

fn is_false(flag: &bool) -> bool {
    !*flag
}

impl PropertyDefinition {
    pub fn new(name: impl Into<String>, semantic_type: SemanticType) -> Self {
        Self {
            name: name.into(),
            semantic_type,
            required: false,
            default_value: None,
            enum_options: Vec::new(),
            is_icon_reference: false,
            accepts_action: false,
            description: None,
            show_when: ShowWhen::default(),
        }
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn with_default(mut self, value: impl Into<PropValue>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    #[must_use]
    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enum_options = options.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn icon(mut self) -> Self {
        self.is_icon_reference = true;
        self
    }

    #[must_use]
    pub fn shown_when(mut self, show_when: ShowWhen) -> Self {
        self.show_when = show_when;
        self
    }

    pub fn is_boolean(&self) -> bool {
        self.semantic_type == SemanticType::Boolean
    }
}

/// Which component types a slot accepts.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(
    from = "Option<BTreeSet<String>>",
    into = "Option<BTreeSet<String>>"
)]
pub enum AllowedTypes {
    #[default]
    Any,
    Only(BTreeSet<String>),
}

impl AllowedTypes {
    pub fn only<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Only(names.into_iter().map(Into::into).collect())
    }

    pub fn permits(&self, type_name: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Only(names) => names.contains(type_name),
        }
    }

    pub fn names(&self) -> Option<&BTreeSet<String>> {
        match self {
            Self::Any => None,
            Self::Only(names) => Some(names),
        }
    }
}

impl From<Option<BTreeSet<String>>> for AllowedTypes {
    fn from(names: Option<BTreeSet<String>>) -> Self {
        names.map_or(Self::Any, Self::Only)
    }
}

impl From<AllowedTypes> for Option<BTreeSet<String>> {
    fn from(allowed: AllowedTypes) -> Self {
        match allowed {
            AllowedTypes::Any => None,
            AllowedTypes::Only(names) => Some(names),
        }
    }
}

/// A named attachment point for structured children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotDefinition {
    pub name: String,
    pub display_label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub allowed_type_names: AllowedTypes,
    /// When set, inserting into this slot always creates this type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_add_type_name: Option<String>,
    #[serde(default, skip_serializing_if = "ShowWhen::is_empty")]
    pub show_when: ShowWhen,
}

impl SlotDefinition {
    pub fn new(name: impl Into<String>, display_label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_label: display_label.into(),
            description: None,
            allowed_type_names: AllowedTypes::Any,
            auto_add_type_name: None,
            show_when: ShowWhen::default(),
        }
    }
}

/// Slots generated from a numeric property, e.g. `column1..columnN`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicSlots {
    /// Number property holding the slot count.
    pub count_property: String,
    /// Slot name prefix; slot `n` is named `<prefix><n>`, counting from 1.
    pub prefix: String,
    /// Display label prefix used when no header is given.
    pub label_prefix: String,
    /// Comma-separated string property supplying per-slot labels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_property: Option<String>,
    #[serde(default)]
    pub allowed_type_names: AllowedTypes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_count: Option<usize>,
}

impl DynamicSlots {
    pub fn slot_name(&self, index: usize) -> String {
        format!("{}{}", self.prefix, index)
    }

    /// One-based index encoded in `slot_name`, if it belongs to this family.
    pub fn slot_index(&self, slot_name: &str) -> Option<usize> {
        let digits = slot_name.strip_prefix(&self.prefix)?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) || digits.starts_with('0')
        {
            return None;
        }
        digits.parse().ok()
    }

    /// Clamp a requested count to `[0, max_count]`.
    pub fn clamp_count(&self, count: usize) -> usize {
        self.max_count.map_or(count, |max| count.min(max))
    }
}

/// Declarative subtree used to pre-populate slots of a new instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentTemplate {
    pub type_name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, PropValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ComponentTemplate>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub slot_children: BTreeMap<String, Vec<ComponentTemplate>>,
}

impl ComponentTemplate {
    /// Build an instance subtree, drawing one id per node from `next_id`.
    pub fn instantiate<F>(&self, next_id: &mut F) -> ComponentInstance
    where
        F: FnMut() -> ComponentId,
    {
        let mut instance = ComponentInstance::new(next_id(), self.type_name.clone());
        instance.properties = self.properties.clone();
        instance.children = self
            .children
            .iter()
            .map(|child| child.instantiate(next_id))
            .collect();
        instance.slot_children = self
            .slot_children
            .iter()
            .map(|(slot, templates)| {
                let children = templates
                    .iter()
                    .map(|child| child.instantiate(next_id))
                    .collect();
                (slot.clone(), children)
            })
            .collect();
        instance
    }
}

/// Registry entry describing one kind of component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentTypeDefinition {
    pub type_name: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether ordinary (unnamed) children are permitted.
    #[serde(default)]
    pub accepts_children: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub slots: Vec<SlotDefinition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dynamic_slots: Option<DynamicSlots>,
    #[serde(default)]
    pub properties: Vec<PropertyDefinition>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub default_slot_children: BTreeMap<String, Vec<ComponentTemplate>>,
}

impl ComponentTypeDefinition {
    pub fn new(type_name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            category: category.into(),
            description: None,
            accepts_children: false,
            slots: Vec::new(),
            dynamic_slots: None,
            properties: Vec::new(),
            default_slot_children: BTreeMap::new(),
        }
    }

    pub fn property(&self, name: &str) -> Option<&PropertyDefinition> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn static_slot(&self, name: &str) -> Option<&SlotDefinition> {
        self.slots.iter().find(|s| s.name == name)
    }

    pub fn has_slots(&self) -> bool {
        !self.slots.is_empty() || self.dynamic_slots.is_some()
    }
}
