//! Prefix-bucket cache for hash-prefix blocklist lookups.
//!
//! A filtering service wants to know whether a hostname is on a remote
//! blocklist without telling the remote which hostname it's asking about. It
//! hashes the hostname (and its variants), sends only a short prefix of each
//! hash upstream, and gets back every listed full hash sharing those
//! prefixes. The final exact comparison happens locally.
//!
//! This crate is the local half of that protocol: it remembers upstream
//! answers per prefix bucket so most questions never leave the process, and
//! does the exact-match confirmation that turns a prefix collision into a
//! verdict.
//!
//! # Architecture
//! - [`CacheRecord`]: the bytes stored per prefix bucket, an expiry plus the
//!   listed full hashes. No hashes means "asked, nothing listed".
//! - [`PrefixCache::lookup()`]: splits a batch into a verdict or the hashes
//!   still needing upstream resolution.
//! - [`PrefixCache::store()`]: writes an upstream answer back, including
//!   negative records for the clean buckets.
//! - [`Checker`]: lookup, upstream, store in one call against any
//!   [`Upstream`].
//!
//! The store itself is any [`ByteStore`](hashprefix_storage::ByteStore):
//! the cache only needs get and set.

mod checker;
mod clock;
pub mod error;
mod hash;
mod lookup;
mod prefix_cache;
mod record;
mod store;

pub use crate::checker::{Checker, Upstream, UpstreamHandle};
pub use crate::clock::UnixTime;
pub use crate::hash::{HASH_SIZE, HostnameHash, PREFIX_LEN, Prefix};
pub use crate::lookup::Lookup;
pub use crate::prefix_cache::PrefixCache;
pub use crate::record::CacheRecord;
