//! ActionDispatcher: applies `Action`s to the engine and the UI state.
//!
//! Catalog state changes go through `CatalogEngine` entry points; cursor,
//! mode and notifications live in `UIState`. The dispatcher is the only
//! place the two meet.

use tracing::{debug, info};

use crate::{
    controller::{actions::Action, engine::CatalogEngine},
    model::ui_state::UIState,
};

/// Screen rows not available to table rows: search bar, table borders and
/// header, notification line, status bar.
pub const CHROME_ROWS: u16 = 9;

#[derive(Debug, Default)]
pub struct ActionDispatcher {
    dispatched: u64,
}

impl ActionDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one action. Returns `false` if the application should
    /// terminate.
    pub fn dispatch(&mut self, engine: &mut CatalogEngine, ui: &mut UIState, action: Action) -> bool {
        if action != Action::NoOp && action != Action::Tick {
            self.dispatched += 1;
            debug!("Dispatching {:?}", action);
        }

        match action {
            Action::Quit => {
                info!("Quit requested after {} action(s)", self.dispatched);
                return false;
            }

            Action::NoOp => {}

            Action::Tick => {
                ui.update_notification();
            }

            Action::Resize(_, rows) => {
                ui.set_viewport_height(usize::from(rows.saturating_sub(CHROME_ROWS)));
            }

            Action::MoveSelectionUp => ui.move_up(engine.visible().len()),
            Action::MoveSelectionDown => ui.move_down(engine.visible().len()),
            Action::PageUp => ui.page_up(engine.visible().len()),
            Action::PageDown => ui.page_down(engine.visible().len()),

            Action::EnterSearch => ui.enter_search(),

            Action::ExitSearch { apply } => {
                if apply {
                    engine.flush_search();
                } else {
                    engine.cancel_search();
                }
                ui.exit_search();
            }

            Action::SearchInput(c) => {
                engine.push_search_char(c);
                ui.request_redraw();
            }

            Action::SearchBackspace => {
                engine.pop_search_char();
                ui.request_redraw();
            }

            Action::CycleCategory { forward } => {
                engine.cycle_category(forward);
                Self::reset_cursor(ui);
            }

            Action::CycleSort => {
                engine.cycle_sort();
                Self::reset_cursor(ui);
            }

            Action::ToggleFavorite => {
                let Some(id) = engine.visible().get(ui.cursor).map(|item| item.id) else {
                    ui.show_warning("No item to favorite");
                    return true;
                };

                match engine.toggle_favorite(id) {
                    Ok(true) => ui.show_success("Added to favorites"),
                    Ok(false) => ui.show_info("Removed from favorites"),
                    Err(e) => ui.show_error(format!("Favorites not saved: {e}")),
                }
                ui.request_redraw();
            }

            Action::OpenSelected => {
                let id = engine.visible().get(ui.cursor).map(|item| item.id);
                if let Some(id) = id
                    && engine.open(id)
                {
                    ui.request_redraw();
                }
            }

            Action::ConfirmBooking => {
                if let Some(ack) = engine.confirm_booking() {
                    ui.show_success(ack.to_string());
                    engine.close();
                    ui.request_redraw();
                }
            }

            Action::CloseDetail => {
                engine.close();
                ui.request_redraw();
            }
        }

        true
    }

    /// Called after a task result changed engine state.
    pub fn after_task(engine: &mut CatalogEngine, ui: &mut UIState) {
        let len = engine.visible().len();
        ui.clamp_cursor(len);
        ui.request_redraw();
    }

    #[must_use]
    pub const fn dispatched(&self) -> u64 {
        self.dispatched
    }

    fn reset_cursor(ui: &mut UIState) {
        ui.cursor = 0;
        ui.offset = 0;
        ui.request_redraw();
    }
}
