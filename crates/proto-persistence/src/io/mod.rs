//! File I/O and hashing.
//!
//! This module handles:
//! - Atomic writes (temp file + rename) for documents and library buckets
//! - Loading documents with version validation
//! - Structural hashing of saved-composition roots

mod hash;
mod load;
mod save;

pub use hash::{is_unmodified, structural_hash};
pub use load::load_document;
pub use save::{save_document, write_atomic};
