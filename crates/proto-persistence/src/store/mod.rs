//! Durable key-value bucket behind the composition library.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use serde_json::Value;

use crate::error::Result;

/// One logical bucket of JSON values keyed by string.
///
/// Each call is a complete request: a successful `put` or `delete` is
/// durable by the time it returns.
pub trait KeyValueStore {
    fn put(&mut self, key: &str, value: Value) -> Result<()>;

    fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Returns whether the key was present.
    fn delete(&mut self, key: &str) -> Result<bool>;

    fn list_all(&self) -> Result<Vec<Value>>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn put(&mut self, key: &str, value: Value) -> Result<()> {
        (**self).put(key, value)
    }

    fn get(&self, key: &str) -> Result<Option<Value>> {
        (**self).get(key)
    }

    fn delete(&mut self, key: &str) -> Result<bool> {
        (**self).delete(key)
    }

    fn list_all(&self) -> Result<Vec<Value>> {
        (**self).list_all()
    }
}
