//! Config Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A configuration error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for configuration operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Explicitly requested config file doesn't exist.
    #[display("config file not found: {}", _0.display())]
    NotFound(#[error(not(source))] PathBuf),
    /// Config file extension isn't one we can parse.
    #[display("unsupported config format: {}", _0.display())]
    UnsupportedFormat(#[error(not(source))] PathBuf),
    /// Sources couldn't be read or merged into a [`Config`](crate::Config).
    #[display("could not load configuration: {_0}")]
    Load(#[error(not(source))] String),
    /// Configuration loaded but a value makes no sense.
    #[display("invalid configuration: {_0}")]
    Invalid(#[error(not(source))] String),
    /// The configured store couldn't be opened.
    #[display("could not open configured store")]
    Storage,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // Config is either right or it isn't; a store that failed to open
        // might be a transient filesystem hiccup.
        matches!(self, Self::Storage)
    }
}
