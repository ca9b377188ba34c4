//! The full lookup, upstream, store round trip for one batch of hashes.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::PrefixCache;
use crate::error::Result;
use crate::hash::{HostnameHash, Prefix, find_match};
use crate::lookup::Lookup;

/// Remote service resolving hash prefixes to the full hashes it lists.
///
/// Only prefixes ever cross this boundary, which is what keeps the queried
/// hostnames private. The transport (DNS TXT queries, HTTPS, ...) is up to
/// the implementation.
#[async_trait]
pub trait Upstream: Send + Sync {
    /// Name of the upstream, for logging.
    fn name(&self) -> &str;

    /// Return every listed full hash whose prefix is among `prefixes`.
    ///
    /// Returns [`Upstream`](crate::error::ErrorKind::Upstream) if no
    /// trustworthy answer could be obtained.
    async fn resolve(&self, prefixes: &[Prefix]) -> Result<Vec<HostnameHash>>;
}

pub type UpstreamHandle = Arc<dyn Upstream + Send + Sync>;

/// Decides whether a hostname is listed, going upstream only for what the
/// cache can't answer.
#[derive(Clone)]
pub struct Checker {
    cache: PrefixCache,
    upstream: UpstreamHandle,
}

impl Checker {
    pub fn new(cache: PrefixCache, upstream: UpstreamHandle) -> Self {
        Self { cache, upstream }
    }

    pub fn cache(&self) -> &PrefixCache {
        &self.cache
    }

    /// Returns `true` if any of the hostname's hash variants is listed.
    ///
    /// # Errors
    ///
    /// Returns [`Upstream`](crate::error::ErrorKind::Upstream) if the cache
    /// couldn't answer and neither could the upstream. The cache is left
    /// untouched in that case.
    #[instrument(skip_all, fields(service = %self.cache.service(), upstream = self.upstream.name(), hashes = hashes.len()))]
    pub async fn check(&self, hashes: &[HostnameHash]) -> Result<bool> {
        let pending = match self.cache.lookup(hashes) {
            Lookup::Blocked => return Ok(true),
            Lookup::Clean => return Ok(false),
            Lookup::Pending(pending) => pending,
        };

        let prefixes = distinct_prefixes(&pending);
        let confirmed = self.upstream.resolve(&prefixes).await?;
        debug!(prefixes = prefixes.len(), confirmed = confirmed.len(), "upstream answered");

        self.cache.store(&pending, &confirmed);
        Ok(find_match(hashes, &confirmed))
    }
}

/// Prefixes of `hashes` in first-seen order, without repeats.
fn distinct_prefixes(hashes: &[HostnameHash]) -> Vec<Prefix> {
    let mut seen = HashSet::new();
    hashes.iter().map(HostnameHash::prefix).filter(|prefix| seen.insert(*prefix)).collect()
}
