//! Saved compositions as stored in the library.

use chrono::{DateTime, Utc};
use proto_model::{ComponentInstance, CompositionId};
use serde::{Deserialize, Serialize};

/// Description used when none is given at save time.
pub const DEFAULT_DESCRIPTION: &str = "Custom saved component";

/// A reusable subtree captured from a prototype.
///
/// The snapshot keeps the ids it had when saved; instantiating it hands out
/// fresh ones and leaves the stored copy untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedComposition {
    pub id: CompositionId,
    #[serde(alias = "name")]
    pub display_name: String,
    #[serde(default = "default_description")]
    pub description: String,
    pub created_at: DateTime<Utc>,
    #[serde(alias = "component")]
    pub component_snapshot: ComponentInstance,
}

fn default_description() -> String {
    DEFAULT_DESCRIPTION.to_string()
}

/// Metadata edits for a saved composition. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompositionUpdate {
    pub display_name: Option<String>,
    pub description: Option<String>,
}

impl CompositionUpdate {
    pub fn is_empty(&self) -> bool {
        self.display_name.is_none() && self.description.is_none()
    }
}
