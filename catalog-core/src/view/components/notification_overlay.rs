//! src/view/components/notification_overlay.rs
use crate::model::ui_state::{Notification, NotificationLevel};
use crate::view::theme;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
};
use tracing::trace;

pub struct NotificationLine;

impl NotificationLine {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame<'_>, notification: &Notification, area: Rect) {
        trace!(level = ?notification.level, "Rendering notification");

        let icon = match notification.level {
            NotificationLevel::Info => "ℹ",
            NotificationLevel::Success => "✓",
            NotificationLevel::Warning => "⚠",
            NotificationLevel::Error => "✕",
        };
        let color = theme::notification_color(notification.level);

        let line = Line::from(vec![
            Span::styled(
                format!(" {icon} "),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(notification.message.as_str(), Style::default().fg(color)),
        ]);

        frame.render_widget(Clear, area);
        frame.render_widget(Paragraph::new(line).style(theme::base_style()), area);
    }
}

impl Default for NotificationLine {
    fn default() -> Self {
        Self::new()
    }
}
