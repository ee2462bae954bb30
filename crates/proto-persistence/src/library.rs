//! The saved-composition library.

use chrono::Utc;
use proto_model::{ComponentId, ComponentInstance, CompositionId, SavedCompositionRef};
use tracing::{debug, info, warn};

use crate::error::{PersistenceError, Result};
use crate::io::structural_hash;
use crate::store::KeyValueStore;
use crate::types::{CompositionUpdate, DEFAULT_DESCRIPTION, SavedComposition};

/// Saved compositions kept in a [`KeyValueStore`], one entry per composition.
#[derive(Debug)]
pub struct CompositionLibrary<S> {
    store: S,
}

impl<S: KeyValueStore> CompositionLibrary<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// Snapshot `instance` and its whole subtree, ids included.
    ///
    /// A blank description falls back to the default one.
    pub fn save(
        &mut self,
        instance: &ComponentInstance,
        name: &str,
        description: Option<&str>,
    ) -> Result<SavedComposition> {
        let display_name = name.trim();
        if display_name.is_empty() {
            return Err(PersistenceError::BlankName);
        }
        let description = description
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .unwrap_or(DEFAULT_DESCRIPTION);

        let saved = SavedComposition {
            id: self.fresh_id()?,
            display_name: display_name.to_string(),
            description: description.to_string(),
            created_at: Utc::now(),
            component_snapshot: instance.clone(),
        };
        self.write(&saved)?;
        info!(
            id = %saved.id,
            root = %instance.id,
            nodes = instance.ids().count(),
            "Saved composition '{}'",
            saved.display_name
        );
        Ok(saved)
    }

    pub fn get(&self, id: &CompositionId) -> Result<Option<SavedComposition>> {
        self.store
            .get(id.as_str())?
            .map(|value| serde_json::from_value(value).map_err(PersistenceError::deserialization))
            .transpose()
    }

    /// Every readable saved composition, oldest first.
    ///
    /// Entries that no longer parse are skipped with a warning.
    pub fn list(&self) -> Result<Vec<SavedComposition>> {
        let mut saved: Vec<SavedComposition> = self
            .store
            .list_all()?
            .into_iter()
            .filter_map(|value| match serde_json::from_value(value) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable saved composition");
                    None
                }
            })
            .collect();
        saved.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(saved)
    }

    /// Returns whether a composition was removed.
    pub fn delete(&mut self, id: &CompositionId) -> Result<bool> {
        let removed = self.store.delete(id.as_str())?;
        debug!(%id, removed, "Deleted saved composition");
        Ok(removed)
    }

    /// Change name or description. `None` if `id` is unknown.
    pub fn update(
        &mut self,
        id: &CompositionId,
        update: CompositionUpdate,
    ) -> Result<Option<SavedComposition>> {
        let Some(mut saved) = self.get(id)? else {
            return Ok(None);
        };
        if let Some(name) = update.display_name {
            let name = name.trim();
            if name.is_empty() {
                return Err(PersistenceError::BlankName);
            }
            saved.display_name = name.to_string();
        }
        if let Some(description) = update.description {
            let description = description.trim();
            saved.description = if description.is_empty() {
                DEFAULT_DESCRIPTION.to_string()
            } else {
                description.to_string()
            };
        }
        self.write(&saved)?;
        debug!(%id, "Updated saved composition");
        Ok(Some(saved))
    }

    /// A fresh copy of the snapshot, every id replaced by `next_id`.
    ///
    /// The copy's root records where it came from and the snapshot's
    /// structural hash. `None` if `id` is unknown.
    pub fn instantiate<F>(&self, id: &CompositionId, next_id: &mut F) -> Result<Option<ComponentInstance>>
    where
        F: FnMut() -> ComponentId,
    {
        let Some(saved) = self.get(id)? else {
            debug!(%id, "No saved composition to instantiate");
            return Ok(None);
        };
        let snapshot = &saved.component_snapshot;
        let mut instance = snapshot.clone();
        instance.regenerate_ids(next_id);
        instance.saved_composition_ref = Some(SavedCompositionRef {
            source_id: saved.id.clone(),
            structural_hash: structural_hash(snapshot),
        });
        debug!(%id, root = %instance.id, "Instantiated saved composition");
        Ok(Some(instance))
    }

    fn write(&mut self, saved: &SavedComposition) -> Result<()> {
        let value = serde_json::to_value(saved).map_err(PersistenceError::serialization)?;
        self.store.put(saved.id.as_str(), value)
    }

    fn fresh_id(&self) -> Result<CompositionId> {
        loop {
            let id = CompositionId::generate();
            if self.store.get(id.as_str())?.is_none() {
                return Ok(id);
            }
        }
    }
}
