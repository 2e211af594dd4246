//! In-memory key-value store.

use std::collections::{BTreeMap, BTreeSet};

use super::{KeyValueStore, StorageError};

/// Process-local store.
///
/// Writes to keys registered with [`MemoryStore::fail_writes_to`] are
/// rejected, which lets callers exercise partial-write handling.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
    read_only_keys: BTreeSet<String>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every subsequent `set` or `remove` of `key`.
    #[must_use]
    pub fn fail_writes_to(mut self, key: &str) -> Self {
        self.read_only_keys.insert(key.to_owned());
        self
    }

    /// Number of entries currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn check_writable(&self, key: &str) -> Result<(), StorageError> {
        if self.read_only_keys.contains(key) {
            return Err(StorageError::Unavailable(format!("write to {key} rejected")));
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check_writable(key)?;
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.check_writable(key)?;
        self.entries.remove(key);
        Ok(())
    }
}
