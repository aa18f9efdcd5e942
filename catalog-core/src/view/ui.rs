//! src/view/ui.rs
//! ============================================================
//! Frame renderer. Reads engine and UI state and never mutates
//! either, apart from the engine's memoized visible list.

use std::time::{Duration, Instant};

use ratatui::prelude::*;
use tracing::{instrument, trace};

use crate::{
    controller::engine::CatalogEngine,
    model::ui_state::UIState,
    view::components::{
        catalog_table::CatalogTable,
        detail_overlay::DetailOverlay,
        error_overlay::ErrorOverlay,
        loading_overlay::LoadingOverlay,
        notification_overlay::NotificationLine,
        search_bar::SearchBar,
        status_bar::{StatusBar, StatusLine},
    },
};

pub struct UIRenderer {
    cache: LayoutCache,
    stats: RenderStats,
}

#[derive(Default)]
struct LayoutCache {
    screen: Rect,
    areas: [Rect; 4],
    hit: u64,
    miss: u64,
}

#[derive(Default)]
pub struct RenderStats {
    pub frames: u64,
    pub slow: u64,
    pub total: Duration,
}

impl Default for UIRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl UIRenderer {
    pub fn new() -> Self {
        Self {
            cache: LayoutCache::default(),
            stats: RenderStats::default(),
        }
    }

    #[instrument(level = "trace", skip_all)]
    pub fn render(&mut self, f: &mut Frame<'_>, engine: &mut CatalogEngine, ui: &UIState) {
        let start = Instant::now();
        let [search, content, notice, status] = self.layout(f.area());

        SearchBar::new(engine.raw_search(), ui.mode, engine.search_pending()).render(f, search);

        let visible = engine.visible();
        if engine.loading() {
            LoadingOverlay::new().render(f, ui.frame_count(), content);
        } else if engine.error() {
            ErrorOverlay::new("The catalog could not be loaded.").render(f, content);
        } else {
            let title = format!(" Catalog ({}) ", engine.filter().category);
            if engine.is_empty_result() {
                CatalogTable::new().render_empty(f, engine.search_text(), &title, content);
            } else {
                CatalogTable::new().render(f, &visible, engine.favorites(), ui, &title, content);
            }
        }

        if let Some(notification) = &ui.notification {
            NotificationLine::new().render(f, notification, notice);
        }

        let status_line = StatusLine {
            mode: ui.mode,
            visible: visible.len(),
            total: engine.raw_catalog().len(),
            favorites: engine.favorites().len(),
            filter: engine.filter(),
            location_query: engine.location_query(),
        };
        StatusBar::new().render(f, &status_line, status);

        if let Some(item) = engine.selected() {
            let area = Self::centered(f.area(), 70, 60);
            DetailOverlay::new(item, engine.is_favorite(item.id)).render(f, area);
        }

        let elapsed = start.elapsed();
        self.stats.total += elapsed;
        if elapsed.as_millis() > 16 {
            self.stats.slow += 1;
        }
        self.stats.frames += 1;
        trace!(frame = self.stats.frames, ?elapsed, "Frame rendered");
    }

    #[must_use]
    pub const fn stats(&self) -> &RenderStats {
        &self.stats
    }

    fn layout(&mut self, screen: Rect) -> [Rect; 4] {
        if self.cache.screen == screen && self.cache.miss > 0 {
            self.cache.hit += 1;
            return self.cache.areas;
        }

        self.cache.screen = screen;
        self.cache.miss += 1;
        self.cache.areas = Layout::vertical([
            Constraint::Length(3),
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(screen);
        self.cache.areas
    }

    fn centered(r: Rect, w_pct: u16, h_pct: u16) -> Rect {
        let scale = |len: u16, pct: u16| {
            let scaled = u32::from(len) * u32::from(pct.min(100)) / 100;
            u16::try_from(scaled).unwrap_or(len).min(len)
        };
        let w = scale(r.width, w_pct);
        let h = scale(r.height, h_pct);
        Rect {
            x: r.x + (r.width - w) / 2,
            y: r.y + (r.height - h) / 2,
            width: w,
            height: h,
        }
    }
}

impl RenderStats {
    pub fn fps(&self) -> f64 {
        if self.frames > 0 && !self.total.is_zero() {
            self.frames as f64 / self.total.as_secs_f64()
        } else {
            0.0
        }
    }
}
