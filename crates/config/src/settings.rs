use hashprefix_cache::PrefixCache;
use hashprefix_storage::{ByteStore, StoreHandle};
use hashprefix_storage::backend::{BoundedStore, DirectoryStore, MemoryStore};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{ErrorKind, Result};

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Name of the filtering service this cache fronts (e.g. `safe_browsing`,
    /// `parental`). Used in logs to tell several caches apart.
    pub service: String,
    pub cache: CacheConfig,
    pub store: StoreConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    /// Seconds a written record stays valid.
    pub ttl: u64,
    /// Maximum number of prefix buckets held by a bounded store.
    pub capacity: u64,
}

/// Which [`ByteStore`](hashprefix_storage::ByteStore) holds the records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StoreConfig {
    /// Unbounded, in process memory.
    Memory,
    /// In process memory, at most `cache.capacity` buckets.
    #[default]
    Bounded,
    /// One file per bucket under `path`, survives restarts.
    Directory { path: PathBuf },
}

// Defaults
fn default_service() -> String {
    "safe_browsing".to_string()
}
fn default_ttl() -> u64 {
    3600
}
fn default_capacity() -> u64 {
    10_000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: default_service(),
            cache: CacheConfig::default(),
            store: StoreConfig::default(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: default_ttl(),
            capacity: default_capacity(),
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl)
    }
}

impl StoreConfig {
    /// Open the configured store.
    pub fn open(&self, cache: &CacheConfig) -> Result<StoreHandle> {
        let handle: StoreHandle = match self {
            Self::Memory => Arc::new(MemoryStore::default()),
            Self::Bounded => Arc::new(BoundedStore::new(cache.capacity).map_err(|e| e.raise(ErrorKind::Storage))?),
            Self::Directory { path } => {
                Arc::new(DirectoryStore::new(path).map_err(|e| e.raise(ErrorKind::Storage))?)
            },
        };
        tracing::debug!(store = handle.name(), "opened cache store");
        Ok(handle)
    }
}

impl Config {
    /// Reject values that would load fine but can't work.
    pub fn validate(&self) -> Result<()> {
        if self.service.trim().is_empty() {
            exn::bail!(ErrorKind::Invalid("service name must not be empty".to_string()));
        }
        if self.cache.ttl == 0 {
            exn::bail!(ErrorKind::Invalid("cache.ttl must be at least one second".to_string()));
        }
        if self.cache.capacity == 0 {
            exn::bail!(ErrorKind::Invalid("cache.capacity must be non-zero".to_string()));
        }
        if let StoreConfig::Directory { path } = &self.store
            && !path.is_absolute()
        {
            exn::bail!(ErrorKind::Invalid(format!("store.path must be absolute, got {}", path.display())));
        }
        Ok(())
    }

    /// Build the prefix cache this configuration describes.
    pub fn prefix_cache(&self) -> Result<PrefixCache> {
        let store = self.store.open(&self.cache)?;
        Ok(PrefixCache::new(self.service.clone(), store, self.cache.ttl()))
    }
}
