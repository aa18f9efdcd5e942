//! src/controller/engine.rs
//! ============================================================================
//! # `CatalogEngine`: owner of all catalog browsing state
//!
//! Every field has one writer and every mutation goes through an entry point
//! on this type. The main loop owns the engine and calls it one event at a
//! time; spawned tasks only ever report back through [`TaskResult`].
//!
//! Derived state (visible list, categories, empty-result flag) is computed on
//! read and memoized by input value.

use std::{fmt, sync::Arc};

use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

use crate::{
    controller::{event_loop::TaskResult, favorites::FavoritesController},
    error::AppError,
    model::{
        catalog_item::{CatalogItem, ItemId},
        favorites::FavoritesSet,
        filter_state::{CategoryFilter, FilterState, SortKey},
        pipeline::{VisibleList, derive_categories},
        query_sync::{self, NavigableLocation},
        view_state::{LoadState, ViewState},
    },
    storage::favorites_store::FavoritesStore,
    util::debounce::{DebounceConfig, Debouncer, Settled},
};

/// Acknowledgement of a booking confirmation. Nothing is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingAck {
    pub id: ItemId,
    pub title: String,
}

impl fmt::Display for BookingAck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Booking \"{}\" confirmed", self.title)
    }
}

pub struct CatalogEngine {
    view: ViewState,
    catalog_generation: u64,
    categories: Vec<String>,

    /// `search_text` here is the debounced value.
    filter: FilterState,
    raw_search: String,
    debouncer: Debouncer<String, TaskResult>,

    visible: VisibleList,
    favorites: FavoritesController,
    location: Option<Box<dyn NavigableLocation>>,
}

impl CatalogEngine {
    /// Builds the engine in `Loading`. With a location, the filter state is
    /// seeded from its query; otherwise defaults apply.
    pub fn new(
        debounce: DebounceConfig,
        favorites: FavoritesStore,
        location: Option<Box<dyn NavigableLocation>>,
        task_tx: UnboundedSender<TaskResult>,
    ) -> Self {
        let filter = location
            .as_ref()
            .map(|loc| query_sync::decode(&loc.query_string()))
            .unwrap_or_default();

        info!(
            "Catalog engine starting: search={:?} category={} sort={} query_sync={}",
            filter.search_text,
            filter.category,
            filter.sort,
            location.is_some()
        );

        let mut engine = Self {
            view: ViewState::new(),
            catalog_generation: 0,
            categories: derive_categories(&[]),
            raw_search: filter.search_text.clone(),
            filter,
            debouncer: Debouncer::new(debounce, task_tx),
            visible: VisibleList::new(),
            favorites: FavoritesController::new(favorites),
            location,
        };
        engine.sync_location();
        engine
    }

    /// Routes a background task result to its handler.
    pub fn on_task(&mut self, result: TaskResult) {
        match result {
            TaskResult::CatalogLoaded(outcome) => self.on_catalog_loaded(outcome),
            TaskResult::SearchSettled(settled) => {
                self.on_search_settled(settled);
            }
        }
    }

    /// Continuation of the startup fetch. Only the first settlement counts.
    pub fn on_catalog_loaded(&mut self, outcome: Result<Vec<CatalogItem>, AppError>) {
        let outcome = match outcome {
            Ok(items) => Some(items),
            Err(e) => {
                warn!("Catalog unavailable: {}", e);
                None
            }
        };

        if !self.view.settle(outcome) {
            return;
        }

        self.catalog_generation += 1;
        self.categories = derive_categories(self.view.raw_catalog());

        if self.view.load_state() == LoadState::Ready {
            // a seeded category the catalog doesn't carry falls back to "all"
            let known = match &self.filter.category {
                CategoryFilter::All => true,
                CategoryFilter::Only(category) => self.categories.contains(category),
            };
            if !known {
                info!("Category '{}' not in catalog, showing all", self.filter.category);
                self.filter.category = CategoryFilter::All;
                self.sync_location();
            }
            info!(
                "Catalog ready: {} item(s), {} categor(ies)",
                self.view.raw_catalog().len(),
                self.categories.len() - 1
            );
        }
    }

    // ---- search ---------------------------------------------------------

    /// Replaces the raw search input and restarts the debounce delay.
    pub fn set_search_input(&mut self, text: impl Into<String>) {
        self.raw_search = text.into();
        self.debouncer.submit(self.raw_search.clone());
    }

    pub fn push_search_char(&mut self, c: char) {
        let mut text = std::mem::take(&mut self.raw_search);
        text.push(c);
        self.set_search_input(text);
    }

    pub fn pop_search_char(&mut self) {
        let mut text = std::mem::take(&mut self.raw_search);
        text.pop();
        self.set_search_input(text);
    }

    /// Delivers the pending search value without waiting out the delay.
    pub fn flush_search(&mut self) {
        self.debouncer.flush();
    }

    /// Drops unsettled edits: the raw input reverts to the applied search.
    pub fn cancel_search(&mut self) {
        self.debouncer.cancel();
        if self.raw_search != self.filter.search_text {
            debug!("Search edit discarded: {:?}", self.raw_search);
            self.raw_search.clone_from(&self.filter.search_text);
        }
    }

    /// Applies a settled search value. Returns `false` for stale deliveries.
    pub fn on_search_settled(&mut self, settled: Settled<String>) -> bool {
        if !self.debouncer.acknowledge(settled.generation) {
            return false;
        }

        if self.filter.search_text != settled.value {
            debug!("Search settled: {:?}", settled.value);
            self.filter.search_text = settled.value;
            self.sync_location();
        }
        true
    }

    #[must_use]
    pub fn raw_search(&self) -> &str {
        &self.raw_search
    }

    /// The debounced search text the visible list is filtered by.
    #[must_use]
    pub fn search_text(&self) -> &str {
        &self.filter.search_text
    }

    #[must_use]
    pub fn search_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    // ---- category / sort ------------------------------------------------

    pub fn set_category(&mut self, category: CategoryFilter) {
        if self.filter.category != category {
            debug!("Category -> {}", category);
            self.filter.category = category;
            self.sync_location();
        }
    }

    /// Steps through the derived category list, wrapping at either end.
    pub fn cycle_category(&mut self, forward: bool) {
        let len = self.categories.len();
        let current = self
            .categories
            .iter()
            .position(|c| *c == self.filter.category.as_value())
            .unwrap_or(0);

        let next = if forward {
            (current + 1) % len
        } else {
            (current + len - 1) % len
        };

        let category = CategoryFilter::from_value(&self.categories[next]);
        self.set_category(category);
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        if self.filter.sort != sort {
            debug!("Sort -> {}", sort);
            self.filter.sort = sort;
            self.sync_location();
        }
    }

    pub fn cycle_sort(&mut self) {
        self.set_sort(self.filter.sort.cycle());
    }

    #[must_use]
    pub const fn filter(&self) -> &FilterState {
        &self.filter
    }

    // ---- favorites ------------------------------------------------------

    /// Flips favorite membership and persists it. On a storage failure the
    /// new membership still holds in memory and the error is returned.
    pub fn toggle_favorite(&mut self, id: ItemId) -> Result<bool, AppError> {
        self.favorites.toggle(id)
    }

    #[must_use]
    pub fn is_favorite(&self, id: ItemId) -> bool {
        self.favorites.contains(id)
    }

    #[must_use]
    pub const fn favorites(&self) -> &FavoritesSet {
        self.favorites.favorites()
    }

    // ---- selection ------------------------------------------------------

    pub fn open(&mut self, id: ItemId) -> bool {
        let opened = self.view.open(id);
        if !opened {
            debug!("Open ignored, unknown item {}", id);
        }
        opened
    }

    pub fn close(&mut self) {
        self.view.close();
    }

    #[must_use]
    pub const fn selected(&self) -> Option<&CatalogItem> {
        self.view.selected()
    }

    #[must_use]
    pub fn confirm_booking(&self) -> Option<BookingAck> {
        let item = self.view.selected()?;
        info!("Booking confirmed for item {}", item.id);
        Some(BookingAck {
            id: item.id,
            title: item.title.clone(),
        })
    }

    // ---- derived state --------------------------------------------------

    /// The filtered and sorted subset of the raw catalog.
    pub fn visible(&mut self) -> Arc<[CatalogItem]> {
        self.visible.get(
            self.view.raw_catalog(),
            self.catalog_generation,
            &self.filter.search_text,
            &self.filter.category,
            self.filter.sort,
        )
    }

    /// `true` when the catalog is ready but nothing survives the filters.
    pub fn is_empty_result(&mut self) -> bool {
        self.view.load_state() == LoadState::Ready && self.visible().is_empty()
    }

    #[must_use]
    pub const fn recompute_count(&self) -> u64 {
        self.visible.recompute_count()
    }

    /// `"all"` followed by the distinct categories of the raw catalog.
    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    #[must_use]
    pub fn raw_catalog(&self) -> &[CatalogItem] {
        self.view.raw_catalog()
    }

    #[must_use]
    pub fn loading(&self) -> bool {
        self.view.loading()
    }

    #[must_use]
    pub fn error(&self) -> bool {
        self.view.error()
    }

    /// Current location query, or `None` when query sync is off.
    #[must_use]
    pub fn location_query(&self) -> Option<String> {
        self.location.as_ref().map(|loc| loc.query_string())
    }

    fn sync_location(&mut self) {
        let Some(location) = self.location.as_mut() else {
            return;
        };

        let query = query_sync::encode(&self.filter);
        if query != location.query_string() {
            debug!("Location query -> {:?}", query);
            location.replace_query(&query);
        }
    }
}
