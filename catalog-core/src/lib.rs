pub mod error;

pub mod config;

pub mod controller {
    pub mod actions;
    pub use actions::{Action, KeyContext, KeyMap};

    pub mod action_dispatcher;
    pub use action_dispatcher::ActionDispatcher;

    pub mod engine;
    pub use engine::{BookingAck, CatalogEngine};

    pub mod event_loop;
    pub use event_loop::{EventLoop, MetricsSnap, TaskResult};

    pub mod favorites;
    pub use favorites::FavoritesController;
}

pub mod model {
    pub mod catalog_item;
    pub use catalog_item::{CatalogItem, ItemId, RatingLabel};

    pub mod favorites;
    pub use favorites::FavoritesSet;

    pub mod filter_state;
    pub use filter_state::{ALL_CATEGORIES, CategoryFilter, FilterState, SortKey};

    pub mod pipeline;
    pub use pipeline::{VisibleList, derive_categories, derive_visible};

    pub mod query_sync;
    pub use query_sync::{InMemoryLocation, NavigableLocation};

    pub mod ui_state;
    pub use ui_state::{Notification, NotificationLevel, UIMode, UIState};

    pub mod view_state;
    pub use view_state::{LoadState, ViewState};
}

pub mod view {
    pub mod icons;

    pub mod theme;

    pub mod ui;

    pub mod components {
        pub mod catalog_table;
        pub use catalog_table::CatalogTable;
        pub mod detail_overlay;
        pub use detail_overlay::DetailOverlay;
        pub mod error_overlay;
        pub use error_overlay::ErrorOverlay;
        pub mod loading_overlay;
        pub use loading_overlay::LoadingOverlay;
        pub mod notification_overlay;
        pub use notification_overlay::NotificationLine;
        pub mod search_bar;
        pub use search_bar::SearchBar;
        pub mod status_bar;
        pub use status_bar::{StatusBar, StatusLine};
    }
}

pub mod operators {
    pub mod catalog_client;
    pub use catalog_client::{CatalogSource, HttpCatalogSource, spawn_catalog_fetch};
}

pub mod storage {
    pub mod favorites_store;
    pub use favorites_store::FavoritesStore;

    pub mod kv_store;
    pub use kv_store::{FileStore, KeyValueStore, MemoryStore};
}

pub mod logging;
pub use logging::Logger;

pub mod util {
    pub mod debounce;
}

pub use error::AppError;

pub use controller::engine::CatalogEngine;
