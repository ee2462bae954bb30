//! Component metadata registry.
//!
//! The registry is the sole source of truth for what a component type can
//! do: which properties it exposes, whether it takes ordinary children, and
//! which named slots it offers.
//!
//! # Example
//!
//! ```
//! use proto_registry::ComponentRegistry;
//!
//! let registry = ComponentRegistry::builtin().unwrap();
//! let card = registry.lookup("Card").unwrap();
//! assert!(card.static_slot("header").is_some());
//! ```

pub mod embedded;
pub mod error;
pub mod loader;
pub mod registry;

pub use error::{RegistryError, Result};
pub use loader::Catalogue;
pub use registry::ComponentRegistry;
