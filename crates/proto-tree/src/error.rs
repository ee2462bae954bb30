//! Error types for tree mutations.

use proto_model::ComponentId;
use proto_props::PropertyError;
use thiserror::Error;

/// Reasons a tree mutation is rejected.
///
/// A rejected mutation leaves the tree exactly as it was.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TreeError {
    /// No instance with this id exists in the tree.
    #[error("Component {0} not found")]
    NotFound(ComponentId),

    /// The type name is not registered.
    #[error("Unknown component type '{0}'")]
    UnknownType(String),

    /// The parent's type does not take ordinary children.
    #[error("'{type_name}' ({parent}) does not accept children")]
    ChildrenNotAccepted {
        parent: ComponentId,
        type_name: String,
    },

    /// The parent's type has no slot by this name right now.
    #[error("'{type_name}' ({parent}) has no slot '{slot}'")]
    UnknownSlot {
        parent: ComponentId,
        type_name: String,
        slot: String,
    },

    /// The slot does not accept this type.
    #[error("Slot '{slot}' on {parent} does not allow '{type_name}'")]
    TypeNotAllowed {
        parent: ComponentId,
        slot: String,
        type_name: String,
    },

    /// Before/after drops must stay within one parent list.
    #[error("Cannot place {dragged} next to {target}: they have different parents")]
    CrossLevelReorder {
        dragged: ComponentId,
        target: ComponentId,
    },

    /// A node cannot be dropped into its own subtree.
    #[error("Cannot drop {dragged} onto its own descendant {target}")]
    DropIntoDescendant {
        dragged: ComponentId,
        target: ComponentId,
    },

    /// An inserted subtree reuses an id already in the tree.
    #[error("Component id {0} is already in use")]
    IdCollision(ComponentId),

    #[error(transparent)]
    Property(#[from] PropertyError),
}

/// Result type for tree operations.
pub type Result<T> = std::result::Result<T, TreeError>;
