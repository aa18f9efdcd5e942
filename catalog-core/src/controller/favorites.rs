//! src/controller/favorites.rs
//! ============================================================================
//! # Favorites Controller
//!
//! Toggles membership and writes the whole set through to durable storage on
//! every change.

use tracing::{info, warn};

use crate::{
    error::AppError,
    model::{catalog_item::ItemId, favorites::FavoritesSet},
    storage::favorites_store::FavoritesStore,
};

pub struct FavoritesController {
    favorites: FavoritesSet,
    store: FavoritesStore,
}

impl FavoritesController {
    /// Loads the persisted set; absent or corrupt data starts empty.
    #[must_use]
    pub fn new(store: FavoritesStore) -> Self {
        let favorites = store.load();
        info!(
            "Favorites initialized from '{}': {} item(s)",
            store.key(),
            favorites.len()
        );
        Self { favorites, store }
    }

    #[must_use]
    pub const fn favorites(&self) -> &FavoritesSet {
        &self.favorites
    }

    #[must_use]
    pub fn contains(&self, id: ItemId) -> bool {
        self.favorites.contains(id)
    }

    /// Flips `id` and persists the full set. Returns the new membership.
    ///
    /// On a failed write the in-memory change is kept and the error returned.
    pub fn toggle(&mut self, id: ItemId) -> Result<bool, AppError> {
        let now_favorite = self.favorites.toggle(id);

        if let Err(e) = self.store.save(&self.favorites) {
            warn!("Persisting favorites after toggling {} failed: {}", id, e);
            return Err(e);
        }

        Ok(now_favorite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::kv_store::{FileStore, MemoryStore};

    fn controller(backing: &MemoryStore) -> FavoritesController {
        FavoritesController::new(FavoritesStore::new(Box::new(backing.clone()), "kidz-favs"))
    }

    #[test]
    fn test_toggle_then_reload_from_storage() {
        let backing = MemoryStore::new();
        let mut favs = controller(&backing);

        assert!(favs.toggle(ItemId(2)).unwrap());
        assert!(favs.contains(ItemId(2)));

        let reloaded = controller(&backing);
        assert_eq!(reloaded.favorites().iter().collect::<Vec<_>>(), vec![ItemId(2)]);
    }

    #[test]
    fn test_double_toggle_restores_persisted_state() {
        let backing = MemoryStore::new();
        backing.insert_raw("kidz-favs", "[4,8]");
        let mut favs = controller(&backing);
        let before = favs.favorites().clone();

        favs.toggle(ItemId(8)).unwrap();
        favs.toggle(ItemId(8)).unwrap();
        assert_eq!(favs.favorites().len(), before.len());
        assert!(favs.favorites().iter().all(|id| before.contains(id)));
        assert_eq!(controller(&backing).favorites().len(), 2);
    }

    #[test]
    fn test_write_failure_keeps_memory_and_reports() {
        let backing = MemoryStore::new();
        let mut favs = FavoritesController::new(FavoritesStore::new(
            Box::new(backing.read_only()),
            "kidz-favs",
        ));

        let err = favs.toggle(ItemId(1)).unwrap_err();
        assert!(matches!(err, AppError::Storage { .. }));
        assert!(favs.contains(ItemId(1)));
        assert!(controller(&backing).favorites().is_empty());
    }

    #[test]
    fn test_file_backed_write_through() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let mut favs = FavoritesController::new(FavoritesStore::new(
            Box::new(FileStore::open(&path).unwrap()),
            "kidz-favs",
        ));
        favs.toggle(ItemId(2)).unwrap();
        favs.toggle(ItemId(5)).unwrap();

        let reloaded = FavoritesController::new(FavoritesStore::new(
            Box::new(FileStore::open(&path).unwrap()),
            "kidz-favs",
        ));
        assert_eq!(
            reloaded.favorites().iter().collect::<Vec<_>>(),
            vec![ItemId(2), ItemId(5)]
        );
    }
}
