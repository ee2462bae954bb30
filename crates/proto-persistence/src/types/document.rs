//! Prototype document, the file a host saves its working forest to.

use chrono::{DateTime, Utc};
use proto_tree::ComponentTree;
use serde::{Deserialize, Serialize};

/// Current document schema version.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// A named prototype and its component forest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrototypeDocument {
    /// Schema version (for future migrations).
    pub schema_version: u32,

    pub name: String,

    /// When the document was created.
    pub created_at: DateTime<Utc>,

    /// When the document was last saved.
    pub last_saved_at: DateTime<Utc>,

    #[serde(default)]
    pub components: ComponentTree,
}

impl PrototypeDocument {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            name: name.into(),
            created_at: now,
            last_saved_at: now,
            components: ComponentTree::new(),
        }
    }

    /// Update the last saved timestamp.
    pub fn touch(&mut self) {
        self.last_saved_at = Utc::now();
    }
}
