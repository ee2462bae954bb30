//! Atomic file writes and document saving.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use crate::error::{PersistenceError, Result};
use crate::types::PrototypeDocument;

/// Write `bytes` to `path` through a temp file and a rename.
///
/// Readers see either the old contents or the new ones, never a mix.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let temp_path = path.with_extension("json.tmp");

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| PersistenceError::Io {
            operation: "create directory",
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let mut file = File::create(&temp_path).map_err(|e| PersistenceError::Io {
        operation: "create",
        path: temp_path.clone(),
        source: e,
    })?;

    file.write_all(bytes).map_err(|e| PersistenceError::Io {
        operation: "write",
        path: temp_path.clone(),
        source: e,
    })?;

    file.sync_all().map_err(|e| PersistenceError::Io {
        operation: "sync",
        path: temp_path.clone(),
        source: e,
    })?;

    fs::rename(&temp_path, path).map_err(|e| PersistenceError::AtomicWriteFailed {
        temp_path: temp_path.clone(),
        target_path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

/// Save a prototype document as pretty-printed JSON.
///
/// Updates `lastSavedAt` before writing.
pub fn save_document(document: &mut PrototypeDocument, path: &Path) -> Result<()> {
    document.touch();
    let bytes = serde_json::to_vec_pretty(document).map_err(PersistenceError::serialization)?;
    write_atomic(path, &bytes)?;
    tracing::info!(
        components = document.components.len(),
        "Saved prototype to {}",
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_save_document() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("flow.json");

        let mut document = PrototypeDocument::new("Checkout flow");
        save_document(&mut document, &path).unwrap();

        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"schemaVersion\": 1"));
        assert!(text.contains("\"name\": \"Checkout flow\""));
    }

    #[test]
    fn test_write_atomic_replaces_contents() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bucket.json");

        write_atomic(&path, b"[1]").unwrap();
        write_atomic(&path, b"[2]").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"[2]");
    }
}
