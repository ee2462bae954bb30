//! Effective values and conditional visibility for one instance.

use proto_model::{
    ComponentInstance, ComponentTypeDefinition, PropValue, PropertyDefinition, SemanticType,
    ShowWhen,
};
use proto_registry::ComponentRegistry;

use crate::error::Result;

/// Everything needed to resolve the properties of one instance.
///
/// Layout properties come from the parent's type and are looked up fresh
/// each time a scope is built, never stored on the child.
#[derive(Debug, Clone, Copy)]
pub struct PropertyScope<'a> {
    pub definition: &'a ComponentTypeDefinition,
    pub layout: &'a [PropertyDefinition],
    pub instance: &'a ComponentInstance,
}

impl<'a> PropertyScope<'a> {
    /// Build a scope for `instance` placed under a parent of `parent_type`.
    ///
    /// # Errors
    ///
    /// Fails if the instance's type is not registered.
    pub fn new(
        registry: &'a ComponentRegistry,
        instance: &'a ComponentInstance,
        parent_type: Option<&str>,
    ) -> Result<Self> {
        let definition = registry.require(&instance.type_name)?;
        let layout = parent_type.map_or(&[][..], |parent| registry.layout_properties_for(parent));
        Ok(Self {
            definition,
            layout,
            instance,
        })
    }

    /// Declared property, own properties first, then layout properties.
    pub fn definition_of(&self, name: &str) -> Option<&'a PropertyDefinition> {
        self.definition
            .property(name)
            .or_else(|| self.layout.iter().find(|p| p.name == name))
    }

    /// Explicit value if set, else the declared default.
    pub fn effective_value(&self, name: &str) -> Option<&'a PropValue> {
        self.instance.properties.get(name).or_else(|| {
            self.definition_of(name)
                .and_then(|def| def.default_value.as_ref())
        })
    }

    /// Effective value, or a type-appropriate empty value when unset.
    pub fn concrete_value(&self, name: &str) -> Option<PropValue> {
        let def = self.definition_of(name)?;
        Some(
            self.effective_value(name)
                .cloned()
                .unwrap_or_else(|| empty_value(def)),
        )
    }

    /// Evaluate a `showWhen` predicate against the current effective values.
    pub fn is_visible(&self, show_when: &ShowWhen) -> bool {
        show_when.evaluate(|name| self.effective_value(name))
    }

    /// Visible own properties, non-booleans in declaration order, then booleans.
    pub fn visible_properties(&self) -> Vec<&'a PropertyDefinition> {
        self.ordered_visible(&self.definition.properties)
    }

    /// Visible layout properties contributed by the parent, same ordering.
    pub fn visible_layout_properties(&self) -> Vec<&'a PropertyDefinition> {
        // Own declarations shadow overlay entries of the same name.
        let layout: Vec<&'a PropertyDefinition> = self
            .layout
            .iter()
            .filter(|p| self.definition.property(&p.name).is_none())
            .collect();
        self.ordered_visible(layout)
    }

    fn ordered_visible<I>(&self, properties: I) -> Vec<&'a PropertyDefinition>
    where
        I: IntoIterator<Item = &'a PropertyDefinition>,
    {
        let mut visible: Vec<&'a PropertyDefinition> = properties
            .into_iter()
            .filter(|p| self.is_visible(&p.show_when))
            .collect();
        // Stable, so declaration order survives within each group.
        visible.sort_by_key(|p| p.is_boolean());
        visible
    }
}

/// Placeholder value for an unset property with no default.
pub fn empty_value(def: &PropertyDefinition) -> PropValue {
    match def.semantic_type {
        SemanticType::Number => PropValue::Number(0.0),
        SemanticType::Boolean => PropValue::Bool(false),
        SemanticType::Enum
        | SemanticType::Spacing
        | SemanticType::Typography
        | SemanticType::Elevation => def
            .enum_options
            .first()
            .cloned()
            .map_or_else(|| PropValue::Text(String::new()), PropValue::Text),
        SemanticType::String
        | SemanticType::Color
        | SemanticType::Function
        | SemanticType::Node
        | SemanticType::ComponentRef => PropValue::Text(String::new()),
    }
}
