//! Unbounded in-memory store.

use crate::ByteStore;
use crate::error::{ErrorKind, Result};
use std::collections::HashMap;
use std::sync::RwLock;

/// Unbounded in-memory store.
///
/// Values are kept in a `HashMap` behind a [`RwLock`], so all trait methods
/// operate on `&self` without external synchronisation. Nothing is ever
/// evicted: use [`BoundedStore`](super::BoundedStore) when the number of
/// prefix buckets needs a ceiling.
///
/// # Examples
///
/// ```
/// use hashprefix_storage::backend::{ByteStore, MemoryStore};
///
/// let store = MemoryStore::with_entries([(b"ab".to_vec(), b"value".to_vec())]);
/// assert!(store.get(b"ab").unwrap().is_some());
/// ```
pub struct MemoryStore {
    name: String,
    entries: RwLock<HashMap<Vec<u8>, Vec<u8>>>,
}

impl MemoryStore {
    /// Create a store pre-populated with entries.
    pub fn with_entries(entries: impl IntoIterator<Item = (impl Into<Vec<u8>>, impl Into<Vec<u8>>)>) -> Self {
        Self {
            name: "memory".to_string(),
            entries: RwLock::new(entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect()),
        }
    }

    /// Change the name of the store.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.entries.read().map(|guard| guard.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
impl Default for MemoryStore {
    fn default() -> Self {
        let entries: [(Vec<u8>, Vec<u8>); 0] = [];
        Self::with_entries(entries)
    }
}

impl ByteStore for MemoryStore {
    fn name(&self) -> &str {
        &self.name
    }

    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let guard = self.entries.read().map_err(|_| ErrorKind::Unavailable("memory store lock poisoned".to_string()))?;
        Ok(guard.get(key).cloned())
    }

    fn set(&self, key: &[u8], value: &[u8]) -> Result<()> {
        let mut guard =
            self.entries.write().map_err(|_| ErrorKind::Unavailable("memory store lock poisoned".to_string()))?;
        guard.insert(key.to_vec(), value.to_vec());
        Ok(())
    }
}
