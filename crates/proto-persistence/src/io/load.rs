//! Document loading.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{PersistenceError, Result};
use crate::types::{CURRENT_SCHEMA_VERSION, PrototypeDocument};

/// Just enough of a document to check its version before a full parse.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VersionProbe {
    schema_version: u32,
}

/// Load a prototype document from a JSON file.
pub fn load_document(path: &Path) -> Result<PrototypeDocument> {
    let bytes = fs::read(path).map_err(|e| PersistenceError::Io {
        operation: "read",
        path: path.to_path_buf(),
        source: e,
    })?;

    parse_document_bytes(&bytes, path)
}

/// Parse document bytes and validate version and ids.
fn parse_document_bytes(bytes: &[u8], path: &Path) -> Result<PrototypeDocument> {
    let probe: VersionProbe =
        serde_json::from_slice(bytes).map_err(|e| PersistenceError::InvalidFormat {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    if probe.schema_version > CURRENT_SCHEMA_VERSION {
        return Err(PersistenceError::UnsupportedVersion {
            found: probe.schema_version,
            max_supported: CURRENT_SCHEMA_VERSION,
            path: path.to_path_buf(),
        });
    }

    let document: PrototypeDocument =
        serde_json::from_slice(bytes).map_err(PersistenceError::deserialization)?;

    if let Some(id) = document.components.duplicate_id() {
        return Err(PersistenceError::InvalidFormat {
            path: path.to_path_buf(),
            reason: format!("component id {id} appears more than once"),
        });
    }

    tracing::info!(
        components = document.components.len(),
        "Loaded prototype from {}",
        path.display()
    );
    Ok(document)
}
