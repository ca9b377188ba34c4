//! Cache Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A cache error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for cache operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Stored bytes are too short to hold a record. Treat as a cache miss.
    #[display("malformed cache record: {_0} bytes")]
    MalformedRecord(#[error(not(source))] usize),
    /// The upstream resolver could not answer for the requested prefixes.
    #[display("upstream error: {_0}")]
    Upstream(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // A corrupt record stays corrupt until it's overwritten; upstream
        // failures are usually transient.
        matches!(self, Self::Upstream(_))
    }
}
