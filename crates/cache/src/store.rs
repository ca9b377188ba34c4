use std::collections::{HashMap, HashSet};
use tracing::instrument;

use crate::PrefixCache;
use crate::clock::UnixTime;
use crate::hash::{HostnameHash, Prefix};

impl PrefixCache {
    /// Merge an upstream answer back into the cache.
    ///
    /// # Arguments
    /// * `requested` - The [`Pending`](crate::Lookup::Pending) hashes whose
    ///   prefixes were sent upstream
    /// * `confirmed` - Full hashes upstream reported as listed, for any of
    ///   the prefixes asked about (possibly none)
    ///
    /// Confirmed hashes are grouped by prefix and written as positive
    /// records. Every requested prefix that got nothing back is written as a
    /// negative (empty) record, unless a valid record for it is already
    /// cached. Calling this twice with the same arguments leaves the cache as
    /// calling it once did, bar the refreshed expiry.
    pub fn store(&self, requested: &[HostnameHash], confirmed: &[HostnameHash]) {
        self.store_at(requested, confirmed, UnixTime::now())
    }

    /// [`store()`](Self::store) with an explicit clock reading.
    #[instrument(
        level = "trace",
        skip_all,
        fields(service = %self.service(), requested = requested.len(), confirmed = confirmed.len())
    )]
    pub fn store_at(&self, requested: &[HostnameHash], confirmed: &[HostnameHash], now: UnixTime) {
        let positive = group_by_prefix(confirmed);
        for (prefix, hashes) in &positive {
            self.put(*prefix, hashes.clone(), now);
        }

        let mut seen = HashSet::new();
        for prefix in requested.iter().map(HostnameHash::prefix) {
            if positive.contains_key(&prefix) || !seen.insert(prefix) {
                continue;
            }
            // Don't clobber what an earlier round already knows for sure.
            if self.fetch(prefix, now).is_none() {
                self.put(prefix, Vec::new(), now);
            }
        }
    }
}

/// Group hashes by prefix, keeping first-seen order inside each group and
/// dropping repeats.
fn group_by_prefix(hashes: &[HostnameHash]) -> HashMap<Prefix, Vec<HostnameHash>> {
    let mut groups: HashMap<Prefix, Vec<HostnameHash>> = HashMap::new();
    for hash in hashes {
        let group = groups.entry(hash.prefix()).or_default();
        if !group.contains(hash) {
            group.push(*hash);
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Lookup;
    use crate::hash::hash_with_prefix;
    use crate::record::CacheRecord;
    use hashprefix_storage::backend::MockStore;
    use std::sync::Arc;
    use std::time::Duration;

    const NOW: UnixTime = UnixTime::from_secs(1_700_000_000);
    const EXPIRY: UnixTime = UnixTime::from_secs(1_700_000_600);

    fn setup() -> (Arc<MockStore>, PrefixCache) {
        let store = Arc::new(MockStore::default());
        let cache = PrefixCache::new("test", store.clone(), Duration::from_secs(600));
        (store, cache)
    }

    fn stored(store: &MockStore, prefix: Prefix) -> Option<CacheRecord> {
        store.peek(prefix.as_ref()).map(|data| CacheRecord::decode(&data).unwrap())
    }

    #[test]
    fn test_group_by_prefix() {
        let a1 = hash_with_prefix([0xaa, 0x00], 1);
        let a2 = hash_with_prefix([0xaa, 0x00], 2);
        let b1 = hash_with_prefix([0xbb, 0x00], 1);
        let groups = group_by_prefix(&[a2, b1, a1, a2]);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[&a1.prefix()], vec![a2, a1]);
        assert_eq!(groups[&b1.prefix()], vec![b1]);
    }

    #[test]
    fn test_positive_and_negative_records() {
        let (store, cache) = setup();
        let h1 = hash_with_prefix([0xab, 0x00], 1);
        let h2 = hash_with_prefix([0xcd, 0x00], 2);
        cache.store_at(&[h1, h2], &[h1], NOW);

        assert_eq!(stored(&store, h1.prefix()), Some(CacheRecord::new(EXPIRY, vec![h1])));
        assert_eq!(stored(&store, h2.prefix()), Some(CacheRecord::empty(EXPIRY)));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_negative_never_overrides_positive() {
        let (store, cache) = setup();
        let listed = hash_with_prefix([0xab, 0x00], 1);
        let clean = hash_with_prefix([0xab, 0x00], 2);
        cache.store_at(&[clean, listed], &[listed], NOW);
        assert_eq!(stored(&store, listed.prefix()), Some(CacheRecord::new(EXPIRY, vec![listed])));
        assert_eq!(store.sets(), 1);
    }

    #[test]
    fn test_confirmed_outside_requested_is_stored() {
        let (store, cache) = setup();
        let requested = hash_with_prefix([0xab, 0x00], 1);
        let extra = hash_with_prefix([0xee, 0x00], 7);
        cache.store_at(&[requested], &[extra], NOW);
        assert_eq!(stored(&store, extra.prefix()), Some(CacheRecord::new(EXPIRY, vec![extra])));
        assert_eq!(stored(&store, requested.prefix()), Some(CacheRecord::empty(EXPIRY)));
    }

    #[test]
    fn test_duplicate_requested_prefix_written_once() {
        let (store, cache) = setup();
        let h1 = hash_with_prefix([0xab, 0x00], 1);
        let h2 = hash_with_prefix([0xab, 0x00], 2);
        cache.store_at(&[h1, h2, h1], &[], NOW);
        assert_eq!(store.sets(), 1);
        assert_eq!(stored(&store, h1.prefix()), Some(CacheRecord::empty(EXPIRY)));
    }

    #[test]
    fn test_existing_valid_record_kept() {
        let listed = hash_with_prefix([0xab, 0x00], 1);
        let earlier = CacheRecord::new(UnixTime::from_secs(1_700_000_100), vec![listed]);
        let store = Arc::new(MockStore::with_entries([(listed.prefix().as_ref().to_vec(), earlier.encode())]));
        let cache = PrefixCache::new("test", store.clone(), Duration::from_secs(600));

        cache.store_at(&[listed], &[], NOW);
        assert_eq!(stored(&store, listed.prefix()), Some(earlier));
        assert_eq!(store.sets(), 0);
    }

    #[test]
    fn test_expired_record_replaced_by_negative() {
        let listed = hash_with_prefix([0xab, 0x00], 1);
        let stale = CacheRecord::new(NOW, vec![listed]);
        let store = Arc::new(MockStore::with_entries([(listed.prefix().as_ref().to_vec(), stale.encode())]));
        let cache = PrefixCache::new("test", store.clone(), Duration::from_secs(600));

        cache.store_at(&[listed], &[], NOW);
        assert_eq!(stored(&store, listed.prefix()), Some(CacheRecord::empty(EXPIRY)));
    }

    #[test]
    fn test_malformed_record_replaced_by_negative() {
        let hash = hash_with_prefix([0xab, 0x00], 1);
        let store = Arc::new(MockStore::with_entries([(hash.prefix().as_ref().to_vec(), vec![1, 2, 3])]));
        let cache = PrefixCache::new("test", store.clone(), Duration::from_secs(600));
        cache.store_at(&[hash], &[], NOW);
        assert_eq!(stored(&store, hash.prefix()), Some(CacheRecord::empty(EXPIRY)));
    }

    #[test]
    fn test_idempotent() {
        let (store, cache) = setup();
        let h1 = hash_with_prefix([0xab, 0x00], 1);
        let h2 = hash_with_prefix([0xcd, 0x00], 2);
        let h3 = hash_with_prefix([0xab, 0x00], 3);
        cache.store_at(&[h1, h2, h3], &[h1, h3], NOW);
        let once: Vec<_> = [h1, h2].iter().map(|h| stored(&store, h.prefix())).collect();
        cache.store_at(&[h1, h2, h3], &[h1, h3], NOW);
        let twice: Vec<_> = [h1, h2].iter().map(|h| stored(&store, h.prefix())).collect();
        assert_eq!(once, twice);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_write_failures_do_not_panic() {
        let (store, cache) = setup();
        store.fail_writes(true);
        let h1 = hash_with_prefix([0xab, 0x00], 1);
        let h2 = hash_with_prefix([0xcd, 0x00], 2);
        cache.store_at(&[h1, h2], &[h1], NOW);
        assert!(store.is_empty());
        assert_eq!(cache.lookup_at(&[h1, h2], NOW), Lookup::Pending(vec![h1, h2]));
    }

    #[test]
    fn test_lookup_store_lookup() {
        let (_, cache) = setup();
        let h1 = hash_with_prefix([0xab, 0x00], 1);
        let h2 = hash_with_prefix([0xcd, 0x00], 2);

        let pending = cache.lookup_at(&[h1, h2], NOW);
        assert_eq!(pending, Lookup::Pending(vec![h1, h2]));

        // Upstream reports h1 as listed.
        cache.store_at(pending.pending(), &[h1], NOW);
        assert_eq!(cache.lookup_at(&[h1, h2], NOW), Lookup::Blocked);
        assert_eq!(cache.lookup_at(&[h2], NOW), Lookup::Clean);

        // Both buckets age out together.
        assert_eq!(cache.lookup_at(&[h2], EXPIRY), Lookup::Pending(vec![h2]));
    }
}
