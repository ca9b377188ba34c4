//! Byte layout of one cached prefix bucket.
//!
//! ```text
//! +----------------------+-----------------+-----------------+-----
//! | expiry (u64, BE, 8B) | hash #1 (32B)   | hash #2 (32B)   | ...
//! +----------------------+-----------------+-----------------+-----
//! ```
//!
//! No count field: the number of hashes is implied by the payload length.

use exn::OptionExt;

use crate::clock::UnixTime;
use crate::error::{ErrorKind, Result};
use crate::hash::{HASH_SIZE, HostnameHash};

/// Size of the expiry header.
const EXPIRY_SIZE: usize = 8;

/// Everything known about one prefix bucket until `expiry`.
///
/// An empty `hashes` is a negative entry: upstream was asked about this
/// prefix and had nothing for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheRecord {
    pub expiry: UnixTime,
    pub hashes: Vec<HostnameHash>,
}
impl CacheRecord {
    pub fn new(expiry: UnixTime, hashes: Vec<HostnameHash>) -> Self {
        Self { expiry, hashes }
    }

    /// A negative entry.
    pub fn empty(expiry: UnixTime) -> Self {
        Self::new(expiry, Vec::new())
    }

    /// Records are only trustworthy strictly before their expiry.
    pub fn is_expired(&self, now: UnixTime) -> bool {
        now >= self.expiry
    }

    pub fn is_negative(&self) -> bool {
        self.hashes.is_empty()
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(EXPIRY_SIZE + HASH_SIZE * self.hashes.len());
        data.extend_from_slice(&self.expiry.as_secs().to_be_bytes());
        for hash in &self.hashes {
            data.extend_from_slice(hash.as_bytes());
        }
        data
    }

    /// Decode a record from stored bytes.
    ///
    /// A trailing partial hash is dropped rather than rejected: it can't come
    /// out of [`encode()`](Self::encode), and a truncated value is still
    /// better used than thrown away.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedRecord`](ErrorKind::MalformedRecord) if `data` is
    /// too short to hold the expiry.
    pub fn decode(data: &[u8]) -> Result<Self> {
        let (expiry, rest) =
            data.split_first_chunk::<EXPIRY_SIZE>().ok_or_raise(|| ErrorKind::MalformedRecord(data.len()))?;
        let hashes = rest
            .chunks_exact(HASH_SIZE)
            .map(|chunk| {
                let mut bytes = [0u8; HASH_SIZE];
                bytes.copy_from_slice(chunk);
                HostnameHash::new(bytes)
            })
            .collect();
        Ok(Self {
            expiry: UnixTime::from_secs(u64::from_be_bytes(*expiry)),
            hashes,
        })
    }
}
