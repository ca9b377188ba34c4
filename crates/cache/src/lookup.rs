use std::ops::ControlFlow;
use tracing::{debug, instrument};

use crate::PrefixCache;
use crate::clock::UnixTime;
use crate::hash::{HostnameHash, find_match};

/// Outcome of checking a batch of candidate hashes against the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// A cached bucket holds one of the candidates' exact hashes. The whole
    /// batch is blocked.
    Blocked,
    /// Every candidate's bucket is cached and none of them matched. The whole
    /// batch is clean without asking upstream.
    Clean,
    /// These candidates (in input order) have no usable cached bucket and
    /// need upstream resolution. Nothing matched among the rest.
    Pending(Vec<HostnameHash>),
}
impl Lookup {
    /// `true` if the verdict was reached from cache alone.
    pub fn is_resolved(&self) -> bool {
        !matches!(self, Self::Pending(_))
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self, Self::Blocked)
    }

    /// Candidates still needing upstream resolution; empty once resolved.
    pub fn pending(&self) -> &[HostnameHash] {
        match self {
            Self::Pending(pending) => pending,
            Self::Blocked | Self::Clean => &[],
        }
    }

    pub fn into_pending(self) -> Vec<HostnameHash> {
        match self {
            Self::Pending(pending) => pending,
            Self::Blocked | Self::Clean => Vec::new(),
        }
    }
}

impl PrefixCache {
    /// Check a batch of candidate hashes against the cache.
    ///
    /// A batch is the set of hash variants of one hostname (the hostname
    /// itself, its parent domains, ...); any one of them being listed blocks
    /// the lot. So whenever a candidate's bucket is cached, *every* candidate
    /// in the batch is compared against it, not just the one that led there.
    ///
    /// # Examples
    ///
    /// ```
    /// use hashprefix_cache::{HostnameHash, Lookup, PrefixCache};
    /// use hashprefix_storage::backend::MemoryStore;
    /// use std::sync::Arc;
    /// use std::time::Duration;
    ///
    /// let cache = PrefixCache::new("example", Arc::new(MemoryStore::default()), Duration::from_secs(600));
    /// let hash = HostnameHash::new([7; 32]);
    /// // Nothing cached yet: everything must go upstream.
    /// assert_eq!(cache.lookup(&[hash]), Lookup::Pending(vec![hash]));
    ///
    /// cache.store(&[hash], &[hash]);
    /// assert_eq!(cache.lookup(&[hash]), Lookup::Blocked);
    /// ```
    pub fn lookup(&self, candidates: &[HostnameHash]) -> Lookup {
        self.lookup_at(candidates, UnixTime::now())
    }

    /// [`lookup()`](Self::lookup) with an explicit clock reading.
    #[instrument(level = "trace", skip_all, fields(service = %self.service(), candidates = candidates.len()))]
    pub fn lookup_at(&self, candidates: &[HostnameHash], now: UnixTime) -> Lookup {
        let flow = candidates.iter().try_fold(Vec::new(), |mut pending, candidate| {
            match self.fetch(candidate.prefix(), now) {
                None => {
                    pending.push(*candidate);
                    ControlFlow::Continue(pending)
                },
                Some(record) if find_match(candidates, &record.hashes) => ControlFlow::Break(()),
                // Bucket answered before and doesn't list anything from this
                // batch: known clean, no need to ask again.
                Some(_) => ControlFlow::Continue(pending),
            }
        });
        let lookup = match flow {
            ControlFlow::Break(()) => Lookup::Blocked,
            ControlFlow::Continue(pending) if pending.is_empty() => Lookup::Clean,
            ControlFlow::Continue(pending) => Lookup::Pending(pending),
        };
        debug!(
            service = %self.service(),
            resolved = lookup.is_resolved(),
            blocked = lookup.is_blocked(),
            pending = lookup.pending().len(),
            "cache lookup"
        );
        lookup
    }
}
