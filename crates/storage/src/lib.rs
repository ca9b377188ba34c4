//! Byte-keyed stores for the hash-prefix cache.
//!
//! The cache layer only ever needs two operations from its store: fetch the
//! bytes under a key, and overwrite the bytes under a key. Ordering, TTLs and
//! eviction are left to whichever [`ByteStore`] is plugged in.

pub mod backend;
pub mod error;

pub use crate::backend::ByteStore;
use std::sync::Arc;

pub type StoreHandle = Arc<dyn ByteStore + Send + Sync>;
