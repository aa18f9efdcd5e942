//! src/storage/favorites_store.rs
//! ============================================================================
//! # Favorites persistence adapter
//!
//! Reads and writes the favorites set under one fixed key as a JSON list of
//! numeric ids. Reads fail open: anything absent or unparseable is an empty
//! set.

use tracing::{debug, warn};

use crate::{error::AppError, model::favorites::FavoritesSet, storage::kv_store::KeyValueStore};

pub struct FavoritesStore {
    store: Box<dyn KeyValueStore>,
    key: String,
}

impl FavoritesStore {
    pub fn new(store: Box<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Reads the persisted set, or an empty one if absent or corrupt.
    #[must_use]
    pub fn load(&self) -> FavoritesSet {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No favorites stored under '{}'", self.key);
                return FavoritesSet::new();
            }
            Err(e) => {
                warn!("Reading favorites failed, starting empty: {}", e);
                return FavoritesSet::new();
            }
        };

        match serde_json::from_str::<FavoritesSet>(&raw) {
            Ok(set) => {
                debug!("Loaded {} favorite(s)", set.len());
                set
            }
            Err(e) => {
                warn!("Stored favorites under '{}' unparseable, starting empty: {}", self.key, e);
                FavoritesSet::new()
            }
        }
    }

    /// Writes the full set under the key.
    pub fn save(&mut self, favorites: &FavoritesSet) -> Result<(), AppError> {
        let json = serde_json::to_string(favorites)?;
        self.store.set(&self.key, json)
    }
}
