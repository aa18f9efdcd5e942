//! src/storage/kv_store.rs
//! ============================================================================
//! # Durable key-value storage
//!
//! A tiny local-storage analogue: string keys mapped to string values, kept
//! in one JSON document. Saves are atomic (write temp file, then rename) so a
//! crash mid-write leaves the previous document intact.

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::error::AppError;

/// Synchronous string key-value store.
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>, AppError>;

    fn set(&mut self, key: &str, value: String) -> Result<(), AppError>;
}

/// JSON-document store on disk.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    temp_path: PathBuf,
    entries: IndexMap<String, String>,
}

impl FileStore {
    /// Opens the store at `path`. A missing file is an empty store; an
    /// unreadable or corrupt one is logged and treated as empty too.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let path: PathBuf = path.into();
        let temp_path = path.with_extension("tmp");

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let entries = Self::read_document(&path);
        debug!(
            "Opened store {} with {} key(s)",
            path.display(),
            entries.len()
        );

        Ok(Self {
            path,
            temp_path,
            entries,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(path: &Path) -> IndexMap<String, String> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return IndexMap::new(),
            Err(e) => {
                warn!("Store {} unreadable, starting empty: {}", path.display(), e);
                return IndexMap::new();
            }
        };

        serde_json::from_str(&text).unwrap_or_else(|e| {
            warn!("Store {} corrupt, starting empty: {}", path.display(), e);
            IndexMap::new()
        })
    }

    fn write_document(&self) -> Result<(), AppError> {
        let json = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.temp_path, json)?;
        fs::rename(&self.temp_path, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), AppError> {
        let previous = self.entries.insert(key.to_string(), value);

        if let Err(e) = self.write_document() {
            // keep memory identical to what is on disk
            match previous {
                Some(old) => self.entries.insert(key.to_string(), old),
                None => self.entries.shift_remove(key),
            };
            return Err(AppError::storage(key, e.to_string()));
        }

        Ok(())
    }
}

/// In-memory store. Clones share the same backing map, so a clone acts as a
/// second handle onto the same "disk".
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
    read_only: bool,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A handle whose writes fail, for exercising write-error paths.
    #[must_use]
    pub fn read_only(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
            read_only: true,
        }
    }

    pub fn insert_raw(&self, key: &str, value: &str) {
        self.lock().insert(key.to_string(), value.to_string());
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), AppError> {
        if self.read_only {
            return Err(AppError::storage(key, "store is read-only"));
        }
        self.lock().insert(key.to_string(), value);
        Ok(())
    }
}
