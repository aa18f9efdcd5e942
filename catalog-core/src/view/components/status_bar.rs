//! src/view/components/status_bar.rs
//!
//! Mode, item counts and favorites on the left; the active category, sort and
//! location query on the right.

use crate::{
    model::{filter_state::FilterState, ui_state::UIMode},
    view::theme,
};
use ratatui::{
    prelude::*,
    widgets::{Paragraph, Widget},
};

/// Values shown in the status bar, gathered by the renderer.
pub struct StatusLine<'a> {
    pub mode: UIMode,
    pub visible: usize,
    pub total: usize,
    pub favorites: usize,
    pub filter: &'a FilterState,
    pub location_query: Option<String>,
}

pub struct StatusBar;

impl StatusBar {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame<'_>, status: &StatusLine<'_>, area: Rect) {
        let mode_str = match status.mode {
            UIMode::Browse => "Browse",
            UIMode::Search => "Search",
        };

        let left_text = format!(
            " {} | {}/{} items | ♥ {}",
            mode_str, status.visible, status.total, status.favorites
        );

        let mut right_text = format!(
            "Category: {} | Sort: {} ",
            status.filter.category,
            status.filter.sort.label()
        );
        if let Some(query) = &status.location_query {
            let shown = if query.is_empty() { "(none)" } else { query.as_str() };
            right_text = format!("{shown} | {right_text}");
        }

        let layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(area);

        let style = Style::default().fg(theme::FOREGROUND).bg(theme::CURRENT_LINE);

        Paragraph::new(left_text)
            .style(style)
            .alignment(Alignment::Left)
            .render(layout[0], frame.buffer_mut());

        Paragraph::new(right_text)
            .style(style)
            .alignment(Alignment::Right)
            .render(layout[1], frame.buffer_mut());
    }
}

impl Default for StatusBar {
    fn default() -> Self {
        Self::new()
    }
}
