//! Component tree model and mutation engine.
//!
//! A [`ComponentTree`] is an ordered forest of
//! [`ComponentInstance`](proto_model::ComponentInstance)s. Every node holds
//! ordinary children and named slot lists. All structural edits go through
//! a [`TreeEditor`], which checks them against the registry and applies
//! them atomically:
//!
//! - insert at the top level, as a child, or into a slot
//! - delete a subtree
//! - duplicate a subtree with fresh ids
//! - move by drag and drop, before, after or inside a target
//!
//! # Example
//!
//! ```
//! use proto_registry::ComponentRegistry;
//! use proto_tree::{ComponentTree, DropPlacement, TreeEditor};
//!
//! let registry = ComponentRegistry::builtin().unwrap();
//! let mut editor = TreeEditor::new(&registry);
//! let mut tree = ComponentTree::new();
//!
//! let row = editor.insert_root(&mut tree, "Row").unwrap();
//! let column = editor.insert_root(&mut tree, "Column").unwrap();
//! editor
//!     .move_node(&mut tree, &column, &row, DropPlacement::Inside)
//!     .unwrap();
//! assert_eq!(tree.roots.len(), 1);
//! ```

pub mod dnd;
pub mod editor;
pub mod error;
pub mod forest;
pub mod outline;

pub use dnd::{DragSession, DropPlacement, DropTarget, UnknownPlacement};
pub use editor::TreeEditor;
pub use error::{Result, TreeError};
pub use forest::{ComponentTree, Container, Location};
pub use outline::{OutlineRow, node_label, outline, render_outline};
