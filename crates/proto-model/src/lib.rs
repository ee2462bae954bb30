//! Component schema and instance model for the prototype studio.
//!
//! This crate holds the plain data types shared by every other crate:
//!
//! - [`ids`]: component and composition identifiers, plus id sources
//! - [`value`]: property values stored on instances
//! - [`predicate`]: `showWhen` conditional-visibility predicates
//! - [`schema`]: component type definitions (properties, slots, templates)
//! - [`instance`]: component instances forming the prototype tree
//!
//! Nothing here knows about the registry or the editing engine; those
//! live in `proto-registry` and `proto-tree`.

pub mod error;
pub mod ids;
pub mod instance;
pub mod predicate;
pub mod schema;
pub mod value;

pub use error::{ModelError, Result};
pub use ids::{ComponentId, CompositionId, IdSource, RandomIds, SequentialIds};
pub use instance::{ActionBinding, ComponentInstance, Preorder, SavedCompositionRef};
pub use predicate::{Condition, ShowWhen};
pub use schema::{
    AllowedTypes, ComponentTemplate, ComponentTypeDefinition, DynamicSlots, PropertyDefinition,
    SemanticType, SlotDefinition,
};
pub use value::PropValue;
