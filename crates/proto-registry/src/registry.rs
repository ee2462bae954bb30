//! The component metadata registry.
//!
//! Built once from a validated catalogue and read-only afterwards. Consumers
//! receive it by reference.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use proto_model::{ComponentTypeDefinition, PropertyDefinition};
use tracing::debug;

use crate::embedded::BUILTIN_CATALOGUE;
use crate::error::{RegistryError, Result};
use crate::loader::{self, Catalogue};

/// Immutable catalogue of component types.
#[derive(Debug, Clone)]
pub struct ComponentRegistry {
    categories: Vec<String>,
    types: Vec<ComponentTypeDefinition>,
    index: HashMap<String, usize>,
    layout_overlays: BTreeMap<String, Vec<PropertyDefinition>>,
}

impl ComponentRegistry {
    /// Load the catalogue compiled into the binary.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded catalogue fails to parse or validate.
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_CATALOGUE)
    }

    /// Load and validate a catalogue from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_catalogue(loader::parse(json)?)
    }

    /// Load and validate a catalogue file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let registry = Self::from_catalogue(loader::read(path)?)?;
        debug!(path = %path.display(), types = registry.len(), "loaded catalogue file");
        Ok(registry)
    }

    /// Validate a parsed catalogue and index it.
    pub fn from_catalogue(catalogue: Catalogue) -> Result<Self> {
        loader::validate(&catalogue)?;
        let index = catalogue
            .types
            .iter()
            .enumerate()
            .map(|(i, def)| (def.type_name.clone(), i))
            .collect();
        debug!(
            types = catalogue.types.len(),
            categories = catalogue.categories.len(),
            overlays = catalogue.layout_overlays.len(),
            "component registry ready"
        );
        Ok(Self {
            categories: catalogue.categories,
            types: catalogue.types,
            index,
            layout_overlays: catalogue.layout_overlays,
        })
    }

    /// Find a type by exact name.
    pub fn lookup(&self, type_name: &str) -> Option<&ComponentTypeDefinition> {
        self.index.get(type_name).map(|&i| &self.types[i])
    }

    /// Like [`lookup`](Self::lookup), but a miss is an error.
    ///
    /// Instances only ever name registered types, so a miss here means the
    /// tree is corrupt.
    pub fn require(&self, type_name: &str) -> Result<&ComponentTypeDefinition> {
        self.lookup(type_name)
            .ok_or_else(|| RegistryError::UnknownType(type_name.to_string()))
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.index.contains_key(type_name)
    }

    /// All types in catalogue order.
    pub fn types(&self) -> impl Iterator<Item = &ComponentTypeDefinition> {
        self.types.iter()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Categories in display order.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Types grouped by category, each group in catalogue order.
    ///
    /// Categories with no types are omitted. Use [`categories`](Self::categories)
    /// for display order.
    pub fn list_by_category(&self) -> BTreeMap<&str, Vec<&ComponentTypeDefinition>> {
        let mut grouped: BTreeMap<&str, Vec<&ComponentTypeDefinition>> = BTreeMap::new();
        for def in &self.types {
            grouped.entry(def.category.as_str()).or_default().push(def);
        }
        grouped
    }

    /// Extra properties a child receives from a parent of `parent_type`.
    pub fn layout_properties_for(&self, parent_type: &str) -> &[PropertyDefinition] {
        self.layout_overlays
            .get(parent_type)
            .map_or(&[], Vec::as_slice)
    }

    /// Find a property on a type or, failing that, in its parent's overlay.
    pub fn property_for<'a>(
        &'a self,
        def: &'a ComponentTypeDefinition,
        parent_type: Option<&str>,
        name: &str,
    ) -> Option<&'a PropertyDefinition> {
        def.property(name).or_else(|| {
            parent_type.and_then(|parent| {
                self.layout_properties_for(parent)
                    .iter()
                    .find(|p| p.name == name)
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_loads_every_category() {
        let registry = ComponentRegistry::builtin().unwrap();
        let grouped = registry.list_by_category();
        for category in registry.categories() {
            assert!(
                grouped.contains_key(category.as_str()),
                "category {category} has no types"
            );
        }
        assert_eq!(registry.categories()[0], "Layout");
        assert_eq!(registry.categories().last().unwrap(), "Test UI");
    }

    #[test]
    fn lookup_misses_return_none() {
        let registry = ComponentRegistry::builtin().unwrap();
        assert!(registry.lookup("Row").is_some());
        assert!(registry.lookup("row").is_none());
        assert!(matches!(
            registry.require("Marquee"),
            Err(RegistryError::UnknownType(name)) if name == "Marquee"
        ));
    }

    #[test]
    fn grouping_preserves_catalogue_order() {
        let registry = ComponentRegistry::builtin().unwrap();
        let layout: Vec<&str> = registry.list_by_category()["Layout"]
            .iter()
            .map(|d| d.type_name.as_str())
            .collect();
        insta::assert_debug_snapshot!(layout, @r#"
        [
            "Screen",
            "Row",
            "Column",
            "Grid",
            "Stack",
            "Spacer",
        ]
        "#);
    }

    #[test]
    fn overlays_are_keyed_by_parent_type() {
        let registry = ComponentRegistry::builtin().unwrap();
        let names: Vec<&str> = registry
            .layout_properties_for("Grid")
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["columnSpan", "rowSpan"]);
        assert!(registry.layout_properties_for("Button").is_empty());

        let button = registry.lookup("Button").unwrap();
        assert!(registry.property_for(button, Some("Row"), "grow").is_some());
        assert!(registry.property_for(button, None, "grow").is_none());
        assert!(registry.property_for(button, None, "label").is_some());
    }
}
