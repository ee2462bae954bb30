use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;

use super::KeyValueStore;
use crate::error::{PersistenceError, Result};
use crate::io::write_atomic;

/// A bucket kept in one JSON file, rewritten atomically on every change.
///
/// The file holds a single object mapping keys to values. A missing file
/// is an empty bucket.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, Value>,
}

impl FileStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                PersistenceError::InvalidFormat {
                    path: path.clone(),
                    reason: e.to_string(),
                }
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(PersistenceError::Io {
                    operation: "read",
                    path,
                    source: e,
                });
            }
        };
        tracing::debug!(entries = entries.len(), "Opened library bucket {}", path.display());
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist `next` and adopt it only once the write succeeded.
    fn commit(&mut self, next: BTreeMap<String, Value>) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(&next).map_err(PersistenceError::serialization)?;
        write_atomic(&self.path, &bytes)?;
        self.entries = next;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn put(&mut self, key: &str, value: Value) -> Result<()> {
        let mut next = self.entries.clone();
        next.insert(key.to_string(), value);
        self.commit(next)
    }

    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.entries.get(key).cloned())
    }

    fn delete(&mut self, key: &str) -> Result<bool> {
        if !self.entries.contains_key(key) {
            return Ok(false);
        }
        let mut next = self.entries.clone();
        next.remove(key);
        self.commit(next)?;
        Ok(true)
    }

    fn list_all(&self) -> Result<Vec<Value>> {
        Ok(self.entries.values().cloned().collect())
    }
}
