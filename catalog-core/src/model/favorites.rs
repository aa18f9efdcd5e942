//! src/model/favorites.rs
//! ============================================================================
//! # `FavoritesSet`: ordered set of favorite item ids
//!
//! Insertion order is kept so the persisted list reads in the order the user
//! added items.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::model::catalog_item::ItemId;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FavoritesSet {
    ids: IndexSet<ItemId>,
}

impl FavoritesSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, id: ItemId) -> bool {
        self.ids.contains(&id)
    }

    /// Flips membership. Returns `true` when `id` is now a favorite.
    pub fn toggle(&mut self, id: ItemId) -> bool {
        if self.ids.shift_remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.ids.iter().copied()
    }
}

impl FromIterator<ItemId> for FavoritesSet {
    fn from_iter<I: IntoIterator<Item = ItemId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_toggle_restores_membership() {
        let mut favs: FavoritesSet = [ItemId(3), ItemId(7)].into_iter().collect();
        let before = favs.clone();

        assert!(favs.toggle(ItemId(5)));
        assert!(!favs.toggle(ItemId(5)));
        assert_eq!(favs, before);

        assert!(!favs.toggle(ItemId(3)));
        assert!(favs.toggle(ItemId(3)));
        assert!(favs.contains(ItemId(3)));
    }

    #[test]
    fn test_serializes_as_id_list_in_insertion_order() {
        let mut favs = FavoritesSet::new();
        favs.toggle(ItemId(9));
        favs.toggle(ItemId(2));
        favs.toggle(ItemId(4));
        favs.toggle(ItemId(2));

        assert_eq!(serde_json::to_string(&favs).unwrap(), "[9,4]");
        let back: FavoritesSet = serde_json::from_str("[9,4]").unwrap();
        assert_eq!(back, favs);
    }
}
