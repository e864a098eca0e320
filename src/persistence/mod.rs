//! Key/value persistence
//!
//! The game keeps very little across sessions: the best score and the
//! settings blob. Both go through [`KeyValueStore`] so the controller never
//! touches a concrete backend.
//!
//! Backends:
//! - [`MemoryStore`] for tests and as a fallback
//! - [`FileStore`] (native) keeps one JSON object on disk
//! - [`LocalStore`] (wasm) wraps the browser's LocalStorage

use std::collections::BTreeMap;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage backend unavailable")]
    Unavailable,
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// String key/value storage
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Stored integer, or 0 when missing, unreadable, or not a number
    fn get_int(&self, key: &str) -> u64 {
        match self.get(key) {
            Ok(Some(raw)) => raw.trim().parse().unwrap_or_else(|_| {
                log::warn!("Ignoring non-numeric value for {key}: {raw:?}");
                0
            }),
            Ok(None) => 0,
            Err(e) => {
                log::warn!("Failed to read {key}: {e}");
                0
            }
        }
    }

    fn set_int(&mut self, key: &str, value: u64) -> Result<(), StorageError> {
        self.set(key, &value.to_string())
    }
}

/// In-memory store. Can be made read-only to simulate a blocked backend.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
    read_only: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read_only() -> Self {
        Self {
            entries: BTreeMap::new(),
            read_only: true,
        }
    }

    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.read_only {
            return Err(StorageError::Unavailable);
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;

#[cfg(not(target_arch = "wasm32"))]
mod file {
    use std::collections::BTreeMap;
    use std::fs;
    use std::path::{Path, PathBuf};

    use super::{KeyValueStore, StorageError};

    /// All entries in one pretty-printed JSON object, rewritten on every set
    #[derive(Debug)]
    pub struct FileStore {
        path: PathBuf,
        entries: BTreeMap<String, String>,
    }

    impl FileStore {
        /// Open (or lazily create) the store at `path`. A corrupt file is
        /// treated as empty and overwritten on the next write.
        pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
            let path = path.as_ref().to_path_buf();
            let entries = match fs::read_to_string(&path) {
                Ok(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
                    log::warn!("Discarding corrupt store {}: {}", path.display(), e);
                    BTreeMap::new()
                }),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
                Err(e) => return Err(e.into()),
            };
            log::info!("Opened store {} ({} entries)", path.display(), entries.len());
            Ok(Self { path, entries })
        }

        pub fn path(&self) -> &Path {
            &self.path
        }
    }

    impl KeyValueStore for FileStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            Ok(self.entries.get(key).cloned())
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            self.entries.insert(key.to_string(), value.to_string());
            let json = serde_json::to_string_pretty(&self.entries)?;
            if let Some(dir) = self.path.parent() {
                fs::create_dir_all(dir)?;
            }
            fs::write(&self.path, json)?;
            Ok(())
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use local::LocalStore;

#[cfg(target_arch = "wasm32")]
mod local {
    use super::{KeyValueStore, StorageError};

    /// Browser LocalStorage. Private browsing modes may refuse access, in
    /// which case every call reports `Unavailable`.
    pub struct LocalStore {
        storage: Option<web_sys::Storage>,
    }

    impl LocalStore {
        pub fn new() -> Self {
            let storage = web_sys::window()
                .and_then(|w| w.local_storage().ok())
                .flatten();
            if storage.is_none() {
                log::warn!("LocalStorage unavailable - nothing will persist");
            }
            Self { storage }
        }
    }

    impl Default for LocalStore {
        fn default() -> Self {
            Self::new()
        }
    }

    impl KeyValueStore for LocalStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            let storage = self.storage.as_ref().ok_or(StorageError::Unavailable)?;
            storage.get_item(key).map_err(|_| StorageError::Unavailable)
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            let storage = self.storage.as_ref().ok_or(StorageError::Unavailable)?;
            storage
                .set_item(key, value)
                .map_err(|_| StorageError::Unavailable)
        }
    }
}
