//! src/controller/actions.rs
//! ============================================================================
//! # Actions: everything the browser can be asked to do
//!
//! Terminal events are translated into `Action`s by the [`KeyMap`]; the
//! dispatcher applies them. Background results arrive separately as
//! `TaskResult`s.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::trace;

use crate::model::ui_state::UIMode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Close the detail overlay.
    CloseDetail,

    /// Confirm booking of the item shown in the detail overlay.
    ConfirmBooking,

    /// Step through the category list.
    CycleCategory { forward: bool },

    /// Step through the sort options.
    CycleSort,

    /// Enter search mode.
    EnterSearch,

    /// Leave search mode. With `apply`, the pending search is delivered at once.
    ExitSearch { apply: bool },

    MoveSelectionDown,

    MoveSelectionUp,

    /// Event consumed, nothing to do.
    NoOp,

    /// Open the detail overlay for the cursor item.
    OpenSelected,

    PageDown,

    PageUp,

    Quit,

    /// A terminal resize event.
    Resize(u16, u16),

    SearchBackspace,

    SearchInput(char),

    /// Periodic tick for notification expiry.
    Tick,

    /// Toggle favorite on the cursor item.
    ToggleFavorite,
}

/// Where keystrokes are routed, most specific first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyContext {
    Detail,
    Search,
    Browse,
}

impl KeyContext {
    #[must_use]
    pub const fn resolve(mode: UIMode, detail_open: bool) -> Self {
        if detail_open {
            Self::Detail
        } else {
            match mode {
                UIMode::Search => Self::Search,
                UIMode::Browse => Self::Browse,
            }
        }
    }
}

/// Key bindings per context.
pub struct KeyMap {
    browse: HashMap<KeyEvent, Action>,
    detail: HashMap<KeyEvent, Action>,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyMap {
    pub fn new() -> Self {
        let mut browse = HashMap::with_capacity(16);
        let mut detail = HashMap::with_capacity(4);

        browse.insert(key('q'), Action::Quit);
        browse.insert(ctrl('c'), Action::Quit);
        browse.insert(key('/'), Action::EnterSearch);
        browse.insert(code(KeyCode::Up), Action::MoveSelectionUp);
        browse.insert(code(KeyCode::Down), Action::MoveSelectionDown);
        browse.insert(key('k'), Action::MoveSelectionUp);
        browse.insert(key('j'), Action::MoveSelectionDown);
        browse.insert(code(KeyCode::PageUp), Action::PageUp);
        browse.insert(code(KeyCode::PageDown), Action::PageDown);
        browse.insert(key('c'), Action::CycleCategory { forward: true });
        browse.insert(shift('C'), Action::CycleCategory { forward: false });
        browse.insert(key('s'), Action::CycleSort);
        browse.insert(key('f'), Action::ToggleFavorite);
        browse.insert(code(KeyCode::Enter), Action::OpenSelected);

        detail.insert(key('b'), Action::ConfirmBooking);
        detail.insert(code(KeyCode::Esc), Action::CloseDetail);
        detail.insert(key('q'), Action::CloseDetail);
        detail.insert(ctrl('c'), Action::Quit);

        Self { browse, detail }
    }

    /// Maps a key press in `context` to an action.
    #[must_use]
    pub fn translate(&self, context: KeyContext, event: KeyEvent) -> Action {
        if event.kind == KeyEventKind::Release {
            return Action::NoOp;
        }

        let event = normalize(event);
        let action = match context {
            KeyContext::Detail => self.detail.get(&event).cloned(),
            KeyContext::Browse => self.browse.get(&event).cloned(),
            KeyContext::Search => Some(search_action(event)),
        }
        .unwrap_or(Action::NoOp);

        trace!("{:?} {:?} -> {:?}", context, event.code, action);
        action
    }
}

fn search_action(event: KeyEvent) -> Action {
    match (event.code, event.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,
        (KeyCode::Enter, _) => Action::ExitSearch { apply: true },
        (KeyCode::Esc, _) => Action::ExitSearch { apply: false },
        (KeyCode::Backspace, _) => Action::SearchBackspace,
        (KeyCode::Up, _) => Action::MoveSelectionUp,
        (KeyCode::Down, _) => Action::MoveSelectionDown,
        (KeyCode::Char(c), m) if !m.contains(KeyModifiers::CONTROL) => Action::SearchInput(c),
        _ => Action::NoOp,
    }
}

/// Drops state bits and the kind so lookups match the bindings above.
fn normalize(event: KeyEvent) -> KeyEvent {
    let modifiers = match event.code {
        // terminals disagree on whether an uppercase char carries SHIFT
        KeyCode::Char(c) if c.is_ascii_uppercase() => KeyModifiers::SHIFT,
        _ => event.modifiers,
    };
    KeyEvent::new(event.code, modifiers)
}

fn key(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
}

fn shift(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::SHIFT)
}

fn ctrl(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
}

fn code(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}
