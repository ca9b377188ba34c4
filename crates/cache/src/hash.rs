//! Hostname hashes and the prefixes derived from them.

use std::fmt;

/// Size in bytes of a full hostname hash (a SHA-256 digest).
pub const HASH_SIZE: usize = 32;
/// Number of leading hash bytes sent upstream and used as the cache key.
///
/// Must match the prefix length of the upstream protocol.
pub const PREFIX_LEN: usize = 2;

/// Full-length digest of one hostname variant.
///
/// Produced elsewhere; here it's only ever compared for exact equality and
/// truncated into a [`Prefix`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HostnameHash([u8; HASH_SIZE]);
impl HostnameHash {
    pub const fn new(bytes: [u8; HASH_SIZE]) -> Self {
        Self(bytes)
    }

    /// The leading [`PREFIX_LEN`] bytes, which is all the upstream ever sees.
    pub fn prefix(&self) -> Prefix {
        let mut prefix = [0u8; PREFIX_LEN];
        prefix.copy_from_slice(&self.0[..PREFIX_LEN]);
        Prefix(prefix)
    }

    pub fn as_bytes(&self) -> &[u8; HASH_SIZE] {
        &self.0
    }
}
impl From<[u8; HASH_SIZE]> for HostnameHash {
    fn from(bytes: [u8; HASH_SIZE]) -> Self {
        Self(bytes)
    }
}
impl AsRef<[u8]> for HostnameHash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
impl fmt::Display for HostnameHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}
impl fmt::Debug for HostnameHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostnameHash({self})")
    }
}

/// Truncated leading bytes of a [`HostnameHash`], used as the store key.
///
/// Distinct hashes sharing a prefix is normal, not an error.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Prefix([u8; PREFIX_LEN]);
impl Prefix {
    pub const fn new(bytes: [u8; PREFIX_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; PREFIX_LEN] {
        &self.0
    }
}
impl AsRef<[u8]> for Prefix {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}
impl fmt::Debug for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Prefix({self})")
    }
}

/// Returns `true` if any candidate exactly equals any of the known hashes.
///
/// Both sides are tiny (a handful of hostname variants against a bucket of a
/// few hashes), so a nested scan beats building a set.
pub(crate) fn find_match(candidates: &[HostnameHash], known: &[HostnameHash]) -> bool {
    candidates.iter().any(|candidate| known.contains(candidate))
}

#[cfg(test)]
pub(crate) fn hash_with_prefix(prefix: [u8; PREFIX_LEN], fill: u8) -> HostnameHash {
    let mut bytes = [fill; HASH_SIZE];
    bytes[..PREFIX_LEN].copy_from_slice(&prefix);
    HostnameHash::new(bytes)
}
