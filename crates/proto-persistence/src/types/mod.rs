//! Persisted data types.

mod document;
mod saved;

pub use document::{CURRENT_SCHEMA_VERSION, PrototypeDocument};
pub use saved::{CompositionUpdate, DEFAULT_DESCRIPTION, SavedComposition};
