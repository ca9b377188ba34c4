//! Local filesystem store.
//!
//! Every key is stored as its own file inside a configured directory, named
//! after the lowercase hex encoding of the key. Survives restarts, which
//! spares a cold upstream burst after redeploying a resolver.

use crate::ByteStore;
use crate::error::{ErrorKind, Result};
use std::fs::{self, create_dir_all as sync_create_dir};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Local filesystem store.
///
/// # Examples
///
/// ```no_run
/// use hashprefix_storage::backend::DirectoryStore;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = DirectoryStore::new("/var/cache/hashprefix")?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct DirectoryStore {
    name: String,
    /// Root directory holding one file per key
    root: PathBuf,
}
impl DirectoryStore {
    /// Create a new directory store, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidPath`](ErrorKind::InvalidPath) if the path is not
    /// absolute or exists but is not a directory.
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_absolute() {
            exn::bail!(ErrorKind::InvalidPath(root));
        }
        if root.exists() {
            if !root.is_dir() {
                exn::bail!(ErrorKind::InvalidPath(root));
            }
        } else {
            sync_create_dir(&root).map_err(ErrorKind::Io)?;
        }
        Ok(Self {
            name: "directory".to_string(),
            root,
        })
    }

    /// Change the name of the store.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn key_path(&self, key: &[u8]) -> Result<PathBuf> {
        if key.is_empty() {
            exn::bail!(ErrorKind::InvalidKey("empty key".to_string()));
        }
        Ok(self.root.join(hex::encode(key)))
    }
}

impl ByteStore for DirectoryStore {
    fn name(&self) -> &str {
        &self.name
    }

    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let path = self.key_path(key)?;
        match fs::read(&path) {
            Ok(data) => Ok(Some(data)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(ErrorKind::Io(err).into()),
        }
    }

    fn set(&self, key: &[u8], value: &[u8]) -> Result<()> {
        let path = self.key_path(key)?;
        // Write next to the target and rename over it, so readers only ever
        // see the old value or the complete new one.
        let mut file = NamedTempFile::new_in(&self.root).map_err(ErrorKind::Io)?;
        file.write_all(value).map_err(ErrorKind::Io)?;
        file.persist(&path).map_err(|e| ErrorKind::Io(e.error))?;
        tracing::trace!(store = %self.name, path = %path.display(), bytes = value.len(), "persisted value");
        Ok(())
    }
}
