//! Capacity-limited in-memory store.

use crate::ByteStore;
use crate::error::{ErrorKind, Result};
use moka::sync::Cache;

/// In-memory store holding at most `capacity` keys.
///
/// Backed by a [`moka`] cache, which decides what to evict once the capacity
/// is reached. Evicting a prefix bucket only ever costs an extra upstream
/// round trip later, so the cache layer doesn't care which entries go first.
///
/// # Examples
///
/// ```
/// use hashprefix_storage::backend::{BoundedStore, ByteStore};
///
/// let store = BoundedStore::new(10_000).unwrap();
/// store.set(b"ab", b"value").unwrap();
/// assert_eq!(store.get(b"ab").unwrap().as_deref(), Some(&b"value"[..]));
/// ```
#[derive(Clone)]
pub struct BoundedStore {
    name: String,
    capacity: u64,
    cache: Cache<Vec<u8>, Vec<u8>>,
}

impl BoundedStore {
    /// Create a new bounded store.
    ///
    /// # Errors
    ///
    /// Returns [`Unavailable`](ErrorKind::Unavailable) if `capacity` is zero,
    /// as such a store could never hold anything.
    pub fn new(capacity: u64) -> Result<Self> {
        if capacity == 0 {
            exn::bail!(ErrorKind::Unavailable("bounded store capacity must be non-zero".to_string()));
        }
        Ok(Self {
            name: "bounded".to_string(),
            capacity,
            cache: Cache::new(capacity),
        })
    }

    /// Change the name of the store.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Approximate number of keys held. Evictions are applied lazily, so this
    /// can briefly exceed the capacity.
    pub fn entry_count(&self) -> u64 {
        self.cache.run_pending_tasks();
        self.cache.entry_count()
    }
}

impl ByteStore for BoundedStore {
    fn name(&self) -> &str {
        &self.name
    }

    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self.cache.get(key))
    }

    fn set(&self, key: &[u8], value: &[u8]) -> Result<()> {
        self.cache.insert(key.to_vec(), value.to_vec());
        Ok(())
    }
}
