//! src/view/components/loading_overlay.rs
//!
//! Full-area placeholder while the startup fetch is in flight.

use crate::view::theme;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

const SPINNER: [&str; 4] = ["◐", "◓", "◑", "◒"];

pub struct LoadingOverlay;

impl LoadingOverlay {
    pub fn new() -> Self {
        Self
    }

    /// `frame_count` drives the spinner.
    pub fn render(&self, frame: &mut Frame<'_>, frame_count: u64, area: Rect) {
        let spinner = SPINNER[(frame_count % SPINNER.len() as u64) as usize];

        let chrome = Block::default()
            .title(" Loading ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::PURPLE))
            .style(theme::base_style());

        let text = Text::from(vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("{spinner} Fetching catalog"),
                Style::default()
                    .fg(theme::YELLOW)
                    .add_modifier(Modifier::BOLD),
            )),
        ]);

        frame.render_widget(
            Paragraph::new(text)
                .block(chrome)
                .alignment(Alignment::Center),
            area,
        );
    }
}

impl Default for LoadingOverlay {
    fn default() -> Self {
        Self::new()
    }
}
