//! src/model/view_state.rs
//! ============================================================================
//! # `ViewState`: raw catalog, fetch lifecycle and selection
//!
//! The fetch settles exactly once. Its continuation is the only writer of
//! the raw catalog and of the load state.

use std::sync::Arc;

use tracing::warn;

use crate::model::catalog_item::{CatalogItem, ItemId};

/// Lifecycle of the startup fetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Loading,
    Ready,
    /// Terminal for the session; there is no retry.
    Failed,
}

#[derive(Debug, Clone, Default)]
pub struct ViewState {
    raw_catalog: Arc<[CatalogItem]>,
    load: LoadState,
    selected: Option<CatalogItem>,
}

impl ViewState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn raw_catalog(&self) -> &[CatalogItem] {
        &self.raw_catalog
    }

    #[must_use]
    pub const fn load_state(&self) -> LoadState {
        self.load
    }

    #[must_use]
    pub fn loading(&self) -> bool {
        self.load == LoadState::Loading
    }

    #[must_use]
    pub fn error(&self) -> bool {
        self.load == LoadState::Failed
    }

    /// Applies a fetch outcome. Returns `false` if the fetch had already
    /// settled, in which case nothing changes.
    pub fn settle(&mut self, outcome: Option<Vec<CatalogItem>>) -> bool {
        if self.load != LoadState::Loading {
            warn!("Ignoring catalog settlement in state {:?}", self.load);
            return false;
        }

        match outcome {
            Some(items) => {
                self.raw_catalog = items.into();
                self.load = LoadState::Ready;
            }
            None => {
                self.raw_catalog = Arc::from(Vec::new());
                self.load = LoadState::Failed;
            }
        }
        true
    }

    #[must_use]
    pub fn find(&self, id: ItemId) -> Option<&CatalogItem> {
        self.raw_catalog.iter().find(|item| item.id == id)
    }

    #[must_use]
    pub const fn selected(&self) -> Option<&CatalogItem> {
        self.selected.as_ref()
    }

    /// Selects `id`, replacing any previous selection.
    pub fn open(&mut self, id: ItemId) -> bool {
        match self.find(id).cloned() {
            Some(item) => {
                self.selected = Some(item);
                true
            }
            None => false,
        }
    }

    pub fn close(&mut self) {
        self.selected = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::catalog_item::item;

    #[test]
    fn test_loading_until_first_settlement() {
        let mut view = ViewState::new();
        assert!(view.loading());
        assert!(!view.error());

        assert!(view.settle(Some(vec![item(1, "Zoo Trip", 20.0, 0.0, "outdoor")])));
        assert!(!view.loading());
        assert!(!view.error());
        assert_eq!(view.raw_catalog().len(), 1);

        assert!(!view.settle(None));
        assert_eq!(view.load_state(), LoadState::Ready);
        assert_eq!(view.raw_catalog().len(), 1);
    }

    #[test]
    fn test_failure_is_terminal_and_empty() {
        let mut view = ViewState::new();
        assert!(view.settle(None));
        assert!(view.error());
        assert!(!view.loading());
        assert!(view.raw_catalog().is_empty());

        assert!(!view.settle(Some(vec![item(1, "Zoo Trip", 20.0, 0.0, "outdoor")])));
        assert!(view.error());
        assert!(view.raw_catalog().is_empty());
    }

    #[test]
    fn test_single_selection_slot() {
        let mut view = ViewState::new();
        view.settle(Some(vec![
            item(1, "Zoo Trip", 20.0, 0.0, "outdoor"),
            item(2, "Art Class", 10.0, 4.5, "indoor"),
        ]));

        assert!(view.open(ItemId(1)));
        assert!(view.open(ItemId(2)));
        assert_eq!(view.selected().map(|i| i.id), Some(ItemId(2)));

        assert!(!view.open(ItemId(99)));
        assert_eq!(view.selected().map(|i| i.id), Some(ItemId(2)));

        view.close();
        assert!(view.selected().is_none());
    }
}
