//! String-keyed persistent storage abstraction.
//!
//! The vault does not talk to the filesystem directly; it goes through
//! [`PersistentStore`], injected once at construction. [`JsonFileStore`] is
//! the on-disk implementation; [`MemoryStore`] backs tests and embedders that
//! manage persistence themselves.

pub mod file;

pub use file::JsonFileStore;

use std::collections::HashMap;

use crate::error::Result;

/// A string-keyed key-value store with last-write-wins semantics.
///
/// No transactions across keys and no locking: the intended usage is a single
/// logical caller per store instance. `remove` of an absent key is a no-op.
pub trait PersistentStore {
    /// Return the value stored under `key`, or `None` if absent.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, overwriting any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Remove the value stored under `key`. Idempotent.
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Volatile in-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PersistentStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}
