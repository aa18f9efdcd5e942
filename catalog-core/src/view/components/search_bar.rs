//! src/view/components/search_bar.rs
//!
//! Shows the raw search input. While the debounce is pending the text may run
//! ahead of the list below; a marker says so.

use crate::{
    model::ui_state::UIMode,
    view::{icons, theme},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

pub struct SearchBar<'a> {
    raw_search: &'a str,
    mode: UIMode,
    pending: bool,
}

impl<'a> SearchBar<'a> {
    pub fn new(raw_search: &'a str, mode: UIMode, pending: bool) -> Self {
        Self {
            raw_search,
            mode,
            pending,
        }
    }

    pub fn render(&self, frame: &mut Frame<'_>, area: Rect) {
        let editing = self.mode == UIMode::Search;

        let mut spans = vec![Span::styled(
            format!("{} ", icons::SEARCH_ICON),
            Style::default().fg(theme::CYAN),
        )];

        if self.raw_search.is_empty() && !editing {
            spans.push(Span::styled("Press / to search by title", theme::hint_style()));
        } else {
            spans.push(Span::styled(self.raw_search, Style::default().fg(theme::FOREGROUND)));
        }

        if editing {
            spans.push(Span::styled("█", Style::default().fg(theme::PINK)));
        }
        if self.pending {
            spans.push(Span::styled(format!(" {}", icons::PENDING_ICON), theme::hint_style()));
        }

        let border = if editing {
            theme::focused_border_style()
        } else {
            theme::border_style()
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Search ")
            .border_style(border)
            .style(theme::base_style());

        frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
    }
}
