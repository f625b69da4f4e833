//! Key-value storage backends.
//!
//! The engine persists three small JSON documents. Where they live is up to
//! the host: [`FileStorage`] keeps one file per key in a data directory,
//! [`MemoryStorage`] keeps them in memory (tests, or hosts that bridge to
//! their own storage).

use std::cell::RefCell;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;

use super::error::{PersistenceError, Result};

/// Flat string key-value storage.
///
/// Methods take `&self`: stores are shared between the round and score
/// controllers on one thread, and implementations manage their own
/// mutability.
pub trait Storage {
    /// Read a value. Absent keys are `Ok(None)`.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Create or replace a value.
    fn write(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a value. Deleting an absent key succeeds.
    fn remove(&self, key: &str) -> Result<()>;

    /// Is a value stored under `key`?
    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.read(key)?.is_some())
    }
}

/// In-memory storage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RefCell<FxHashMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }

    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.entries.borrow().contains_key(key))
    }
}

/// One `<key>.json` file per key under a root directory.
///
/// Writes go to a temporary file first and are renamed into place, so a
/// crash mid-write leaves the previous record intact.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Use `root` as the data directory, creating it if needed.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|e| PersistenceError::io(&root.display().to_string(), e))?;
        log::debug!("File storage at {}", root.display());
        Ok(Self { root })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File backing `key`.
    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PersistenceError::io(key, e)),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        let tmp = self.root.join(format!("{key}.json.tmp"));
        std::fs::write(&tmp, value).map_err(|e| PersistenceError::io(key, e))?;
        std::fs::rename(&tmp, &path).map_err(|e| PersistenceError::io(key, e))
    }

    fn remove(&self, key: &str) -> Result<()> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PersistenceError::io(key, e)),
        }
    }

    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.path_for(key).is_file())
    }
}
