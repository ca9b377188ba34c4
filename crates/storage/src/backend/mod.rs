//! Store backend trait and implementations.
//!
//! This module defines the `ByteStore` trait, which provides a unified
//! get/set interface across different backends (plain memory, bounded memory,
//! a directory on the local filesystem).
//!

mod bounded;
mod directory;
mod memory;
#[cfg(feature = "mock")]
mod mock;

pub use self::bounded::BoundedStore;
pub use self::directory::DirectoryStore;
pub use self::memory::MemoryStore;
#[cfg(feature = "mock")]
pub use self::mock::MockStore;
use crate::error::Result;

/// Unified interface for byte-keyed stores.
///
/// All operations are synchronous: stores are expected to be in-process and
/// low latency, and are called from the DNS hot path. Implementations must be
/// safe to call concurrently from many threads through `&self`.
///
/// A miss is `Ok(None)`, never an error. Callers of the cache layer treat a
/// failing `get` exactly like a miss and a failing `set` as best effort, so
/// backends should report genuine failures rather than papering over them.
///
/// # Examples
///
/// ```
/// use hashprefix_storage::backend::{ByteStore, MemoryStore};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemoryStore::default();
/// assert_eq!(store.get(b"ab")?, None);
/// store.set(b"ab", b"payload")?;
/// assert_eq!(store.get(b"ab")?.as_deref(), Some(&b"payload"[..]));
/// # Ok(())
/// # }
/// ```
pub trait ByteStore: Send + Sync {
    /// Name of the configured backend. Used for logging only.
    fn name(&self) -> &str;

    /// Fetch the value stored under `key`.
    ///
    /// Returns `Ok(None)` if nothing is stored under the key.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>>;

    /// Store `value` under `key`, overwriting unconditionally.
    ///
    /// # Notes
    /// - A value is either written whole or not at all; readers must never
    ///   observe a partially written value.
    fn set(&self, key: &[u8], value: &[u8]) -> Result<()>;
}
