//! In-memory store for testing.

use crate::ByteStore;
use crate::error::{ErrorKind, Result};
use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// In-memory store for testing.
///
/// Behaves like [`MemoryStore`](super::MemoryStore), but counts every call
/// and can be told to start failing reads or writes. Ideal for unit tests
/// that need to prove a caller degrades gracefully when its store misbehaves.
///
/// # Examples
///
/// ```
/// use hashprefix_storage::backend::{ByteStore, MockStore};
///
/// let store = MockStore::default();
/// store.set(b"ab", b"value").unwrap();
/// assert_eq!(store.sets(), 1);
///
/// store.fail_reads(true);
/// assert!(store.get(b"ab").is_err());
/// assert_eq!(store.gets(), 1);
/// ```
pub struct MockStore {
    name: String,
    storage: RwLock<HashMap<Vec<u8>, Vec<u8>>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    gets: AtomicUsize,
    sets: AtomicUsize,
}

impl MockStore {
    /// Create a mock store pre-populated with entries.
    pub fn with_entries(entries: impl IntoIterator<Item = (impl Into<Vec<u8>>, impl Into<Vec<u8>>)>) -> Self {
        Self {
            name: "mock".to_string(),
            storage: RwLock::new(entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect()),
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
            gets: AtomicUsize::new(0),
            sets: AtomicUsize::new(0),
        }
    }

    /// Change the name of the mock store.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Make every subsequent `get` fail (or succeed again).
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent `set` fail (or succeed again).
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of `get` calls made, including failed ones.
    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    /// Number of `set` calls made, including failed ones.
    pub fn sets(&self) -> usize {
        self.sets.load(Ordering::SeqCst)
    }

    /// Read a value without counting it or honouring `fail_reads`.
    ///
    /// Panics if the lock is poisoned; a panicking test should not pass.
    pub fn peek(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.storage.read().expect("mock store lock poisoned").get(key).cloned()
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.storage.read().expect("mock store lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
impl Default for MockStore {
    fn default() -> Self {
        let entries: [(Vec<u8>, Vec<u8>); 0] = [];
        Self::with_entries(entries)
    }
}

impl ByteStore for MockStore {
    fn name(&self) -> &str {
        &self.name
    }

    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            exn::bail!(ErrorKind::Unavailable("mock store configured to fail reads".to_string()));
        }
        Ok(self.peek(key))
    }

    fn set(&self, key: &[u8], value: &[u8]) -> Result<()> {
        self.sets.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            exn::bail!(ErrorKind::Unavailable("mock store configured to fail writes".to_string()));
        }
        self.storage.write().expect("mock store lock poisoned").insert(key.to_vec(), value.to_vec());
        Ok(())
    }
}
