//! Error types for property writes and value parsing.

use proto_registry::RegistryError;
use thiserror::Error;

/// Errors raised when a property value is rejected.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PropertyError {
    /// Neither the type nor the parent's layout overlay declares the property.
    #[error("'{type_name}' has no property '{property}'")]
    UnknownProperty { type_name: String, property: String },

    /// Value has the wrong kind for the property's semantic type.
    #[error("Property '{property}' expects a {expected} value, got {found}")]
    TypeMismatch {
        property: String,
        expected: &'static str,
        found: &'static str,
    },

    /// Value is not one of the declared options.
    #[error("'{value}' is not an option for '{property}' (expected one of: {})", .options.join(", "))]
    NotAnOption {
        property: String,
        value: String,
        options: Vec<String>,
    },

    /// User text could not be read as the property's type.
    #[error("Cannot read '{raw}' as a {expected} for '{property}'")]
    Unparseable {
        property: String,
        raw: String,
        expected: &'static str,
    },

    /// Action notes only attach to function properties that accept them.
    #[error("Property '{property}' on '{type_name}' does not accept an action")]
    NotAnAction { type_name: String, property: String },

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Result type for property operations.
pub type Result<T> = std::result::Result<T, PropertyError>;
