use hashprefix_storage::StoreHandle;
use std::time::Duration;
use tracing::{debug, warn};

use crate::clock::UnixTime;
use crate::hash::{HostnameHash, Prefix};
use crate::record::CacheRecord;

/// Prefix-bucket cache in front of an upstream hash-prefix resolver.
///
/// Holds configuration only: every bit of state lives in the injected store,
/// so one instance can be shared by every worker handling DNS questions and
/// correctness under concurrency is whatever the store guarantees for
/// concurrent get/set. See [`lookup()`](Self::lookup) and
/// [`store()`](Self::store) for the two halves of the protocol.
#[derive(Clone)]
pub struct PrefixCache {
    service: String,
    store: StoreHandle,
    ttl: Duration,
}

impl PrefixCache {
    /// Create a new cache.
    ///
    /// # Arguments
    /// * `service` - Name of the filtering service, for logging
    /// * `store` - Where encoded records live
    /// * `ttl` - How long written records stay valid (whole seconds)
    pub fn new(service: impl Into<String>, store: StoreHandle, ttl: Duration) -> Self {
        Self {
            service: service.into(),
            store,
            ttl,
        }
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Fetch the record for `prefix`, if there is one that can be trusted at
    /// `now`.
    ///
    /// Store failures, malformed bytes and expired records all come back as
    /// `None`: the caller will ask upstream, which is always correct.
    pub(crate) fn fetch(&self, prefix: Prefix, now: UnixTime) -> Option<CacheRecord> {
        let data = match self.store.get(prefix.as_ref()) {
            Ok(Some(data)) => data,
            Ok(None) => return None,
            Err(err) => {
                warn!(service = %self.service, store = self.store.name(), %prefix, error = ?err, "cache read failed");
                return None;
            },
        };
        let record = match CacheRecord::decode(&data) {
            Ok(record) => record,
            Err(err) => {
                warn!(service = %self.service, %prefix, error = ?err, "discarding malformed cache record");
                return None;
            },
        };
        match record.is_expired(now) {
            true => None,
            false => Some(record),
        }
    }

    /// Write a record for `prefix` expiring one TTL after `now`.
    ///
    /// Best effort: a failed write only costs another upstream round trip.
    pub(crate) fn put(&self, prefix: Prefix, hashes: Vec<HostnameHash>, now: UnixTime) {
        let record = CacheRecord::new(now.saturating_add(self.ttl), hashes);
        match self.store.set(prefix.as_ref(), &record.encode()) {
            Ok(()) => debug!(
                service = %self.service,
                %prefix,
                hashes = record.hashes.len(),
                expiry = %record.expiry,
                "stored in cache"
            ),
            Err(err) => {
                warn!(service = %self.service, store = self.store.name(), %prefix, error = ?err, "cache write failed")
            },
        }
    }
}
