//! src/view/components/detail_overlay.rs
//!
//! Modal detail view for the selected item.

use crate::{
    model::catalog_item::{CatalogItem, RatingLabel},
    view::{icons, theme},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

pub struct DetailOverlay<'a> {
    item: &'a CatalogItem,
    favorite: bool,
}

impl<'a> DetailOverlay<'a> {
    pub fn new(item: &'a CatalogItem, favorite: bool) -> Self {
        Self { item, favorite }
    }

    pub fn render(&self, frame: &mut Frame<'_>, area: Rect) {
        frame.render_widget(Clear, area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", self.item.title))
            .title_style(Style::default().fg(theme::PURPLE).bold())
            .border_style(theme::focused_border_style())
            .style(theme::base_style());

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [body, footer] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(inner);

        let rating = match self.item.rating_label() {
            RatingLabel::Rated(r) => Span::styled(
                format!("{} {r:.1} / 5", icons::RATING_ICON),
                theme::rating_style(),
            ),
            unrated @ RatingLabel::Unrated => Span::styled(unrated.to_string(), theme::unrated_style()),
        };

        let favorite = if self.favorite {
            Span::styled(format!("{} favorite", icons::FAVORITE_ICON), theme::favorite_style())
        } else {
            Span::styled("not a favorite", theme::hint_style())
        };

        let label = |s: &'static str| Span::styled(s, theme::header_style());

        let lines = vec![
            Line::from(Span::raw(self.item.description.as_str())),
            Line::from(""),
            Line::from(vec![
                label("Category  "),
                Span::styled(self.item.category.as_str(), Style::default().fg(theme::CYAN)),
            ]),
            Line::from(vec![
                label("Price     "),
                Span::styled(format!("${:.2}", self.item.price), theme::price_style()),
            ]),
            Line::from(vec![label("Rating    "), rating]),
            Line::from(vec![label("Status    "), favorite]),
            Line::from(vec![
                label("Image     "),
                Span::styled(self.item.thumbnail.as_str(), theme::hint_style()),
            ]),
        ];

        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), body);
        frame.render_widget(
            Paragraph::new("b book • Esc close")
                .style(theme::hint_style())
                .alignment(Alignment::Center),
            footer,
        );
    }
}
