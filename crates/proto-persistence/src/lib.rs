//! Persistent storage for the prototype studio.
//!
//! Two things are stored:
//!
//! - **Saved compositions**: reusable component subtrees kept in a
//!   [`CompositionLibrary`] on top of any [`KeyValueStore`]. Instantiating
//!   one hands back a copy with fresh ids whose root remembers the source
//!   and a structural hash, so [`is_unmodified`] can tell whether it was
//!   edited since.
//! - **Prototype documents**: a named component forest saved as JSON.
//!
//! # Features
//!
//! - **Atomic writes** (temp file + rename) for documents and file-backed buckets
//! - **Version check** on load; documents from newer versions are refused
//! - **Shallow structural hash**: root type, root properties, ordinary
//!   child count and slot names. Edits deeper down are not detected.
//!
//! # Example
//!
//! ```
//! use proto_model::{ComponentId, ComponentInstance, IdSource, RandomIds};
//! use proto_persistence::{CompositionLibrary, MemoryStore, is_unmodified};
//!
//! let card = ComponentInstance::new(ComponentId::new("c1").unwrap(), "Card");
//! let mut library = CompositionLibrary::new(MemoryStore::new());
//! let saved = library.save(&card, "Empty card", None).unwrap();
//!
//! let mut ids = RandomIds::new();
//! let copy = library
//!     .instantiate(&saved.id, &mut || ids.next_component_id())
//!     .unwrap()
//!     .unwrap();
//! assert_ne!(copy.id, card.id);
//! assert!(is_unmodified(&copy));
//! ```

mod error;
mod io;
mod library;
mod store;
mod types;

pub use error::{PersistenceError, Result};
pub use io::{is_unmodified, load_document, save_document, structural_hash, write_atomic};
pub use library::CompositionLibrary;
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use types::{
    CURRENT_SCHEMA_VERSION, CompositionUpdate, DEFAULT_DESCRIPTION, PrototypeDocument,
    SavedComposition,
};
