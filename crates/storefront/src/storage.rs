//! Key-value storage capability backing the cart and theme.
//!
//! The original store was ambient browser-local storage; here it is an
//! injected [`Storage`] capability so components receive it explicitly and
//! tests can run against memory.
//!
//! # Single-writer assumption
//!
//! One process owns the backing store. There is no locking across
//! processes, so two storefront instances pointed at the same file would
//! race exactly like two tabs against one storage key. Within the process,
//! callers share storage behind a mutex (see [`SharedStorage`]).

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use thiserror::Error;

/// Well-known storage keys.
pub mod keys {
    /// JSON-encoded sequence of cart entries; absence means an empty cart.
    pub const CART: &str = "cart";

    /// Current theme, `"dark"` or `"light"`.
    pub const THEME: &str = "theme";
}

/// Error opening file-backed storage.
#[derive(Debug, Error)]
pub enum StorageOpenError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{path} does not contain a JSON object of strings: {source}")]
    Decode {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// String key-value storage.
///
/// All operations are infallible by contract: persistence failures are an
/// implementation concern (logged, not surfaced), so cart operations never
/// fail.
pub trait Storage: Send {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any existing value.
    fn set(&mut self, key: &str, value: String);

    /// Remove the value stored under `key`, if any.
    fn remove(&mut self, key: &str);
}

/// Storage shared across components within the process.
pub type SharedStorage = Arc<Mutex<dyn Storage>>;

/// Wrap a storage implementation for sharing.
pub fn shared(storage: impl Storage + 'static) -> SharedStorage {
    Arc::new(Mutex::new(storage))
}

/// Ephemeral in-memory storage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// File-backed storage: a JSON object of strings, written through on every
/// mutation.
///
/// A write failure keeps the in-memory value and logs the error; the next
/// successful write persists the full current state.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: HashMap<String, String>,
}

impl FileStorage {
    /// Open storage at `path`, loading any existing contents.
    ///
    /// A missing file is an empty store.
    ///
    /// # Errors
    ///
    /// Returns [`StorageOpenError`] when the file exists but cannot be read
    /// or does not decode to an object of strings.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageOpenError> {
        let path = path.as_ref().to_path_buf();
        let entries = match std::fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).map_err(|source| {
                StorageOpenError::Decode {
                    path: path.clone(),
                    source,
                }
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(source) => {
                return Err(StorageOpenError::Read {
                    path: path.clone(),
                    source,
                });
            }
        };
        Ok(Self { path, entries })
    }

    fn persist(&self) {
        let encoded = match serde_json::to_string_pretty(&self.entries) {
            Ok(encoded) => encoded,
            Err(e) => {
                tracing::error!("Failed to encode storage contents: {e}");
                return;
            }
        };
        if let Err(e) = std::fs::write(&self.path, encoded) {
            tracing::error!("Failed to write storage file {}: {e}", self.path.display());
        }
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
        self.persist();
    }

    fn remove(&mut self, key: &str) {
        if self.entries.remove(key).is_some() {
            self.persist();
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_roundtrip() {
        let mut storage = MemoryStorage::new();
        assert_eq!(storage.get(keys::CART), None);

        storage.set(keys::CART, "[]".to_string());
        assert_eq!(storage.get(keys::CART), Some("[]".to_string()));

        storage.remove(keys::CART);
        assert_eq!(storage.get(keys::CART), None);
    }

    #[test]
    fn test_file_storage_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path().join("storage.json")).unwrap();
        assert_eq!(storage.get(keys::THEME), None);
    }

    #[test]
    fn test_file_storage_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");

        let mut storage = FileStorage::open(&path).unwrap();
        storage.set(keys::THEME, "dark".to_string());
        storage.set(keys::CART, r#"[{"id":1,"price":"10"}]"#.to_string());
        drop(storage);

        let reopened = FileStorage::open(&path).unwrap();
        assert_eq!(reopened.get(keys::THEME), Some("dark".to_string()));
        assert_eq!(
            reopened.get(keys::CART),
            Some(r#"[{"id":1,"price":"10"}]"#.to_string())
        );
    }

    #[test]
    fn test_file_storage_remove_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");

        let mut storage = FileStorage::open(&path).unwrap();
        storage.set(keys::THEME, "dark".to_string());
        storage.remove(keys::THEME);
        drop(storage);

        let reopened = FileStorage::open(&path).unwrap();
        assert_eq!(reopened.get(keys::THEME), None);
    }

    #[test]
    fn test_file_storage_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "not json").unwrap();

        let err = FileStorage::open(&path).unwrap_err();
        assert!(matches!(err, StorageOpenError::Decode { .. }));
    }
}
