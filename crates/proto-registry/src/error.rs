//! Error types for catalogue loading and registry lookups.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or querying the component registry.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RegistryError {
    /// Catalogue file could not be read.
    #[error("Failed to read catalogue {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Catalogue JSON is malformed.
    #[error("Failed to parse catalogue: {0}")]
    Parse(#[from] serde_json::Error),

    /// Type name is not in the registry.
    #[error("Unknown component type '{0}'")]
    UnknownType(String),

    /// Two catalogue entries share a type name.
    #[error("Component type '{0}' is declared more than once")]
    DuplicateType(String),

    /// Type is filed under a category missing from the category list.
    #[error("Component type '{type_name}' uses undeclared category '{category}'")]
    UnknownCategory { type_name: String, category: String },

    /// Two properties (or two slots) on one type share a name.
    #[error("Component type '{type_name}' declares '{name}' more than once")]
    DuplicateMember { type_name: String, name: String },

    /// A `showWhen` key names no property the owner could ever see.
    #[error(
        "'{owner}' on '{type_name}' has a showWhen condition on unknown property '{property}'"
    )]
    DanglingCondition {
        type_name: String,
        owner: String,
        property: String,
    },

    /// A slot (or template) refers to a type that is not declared.
    #[error("'{context}' on '{type_name}' refers to unknown component type '{referenced}'")]
    UnknownReference {
        type_name: String,
        context: String,
        referenced: String,
    },

    /// The auto-added type would itself be rejected by the slot.
    #[error("Slot '{slot}' on '{type_name}' auto-adds '{auto_add}', which it does not allow")]
    AutoAddNotAllowed {
        type_name: String,
        slot: String,
        auto_add: String,
    },

    /// An enum default is not one of its options.
    #[error("Property '{property}' on '{type_name}' defaults to '{value}', which is not an option")]
    DefaultNotAnOption {
        type_name: String,
        property: String,
        value: String,
    },

    /// Dynamic slots are driven by a property that is missing or not numeric.
    #[error("Dynamic slots on '{type_name}' need a number property '{property}'")]
    InvalidSlotCount { type_name: String, property: String },

    /// A default slot child targets a slot the type does not declare.
    #[error("Default children for '{type_name}' target undeclared slot '{slot}'")]
    UnknownDefaultSlot { type_name: String, slot: String },

    /// A layout overlay is keyed by a type that does not exist.
    #[error("Layout overlay refers to unknown parent type '{0}'")]
    UnknownOverlayParent(String),
}

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
