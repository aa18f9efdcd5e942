//! src/view/components/catalog_table.rs

use crate::{
    model::{
        catalog_item::{CatalogItem, RatingLabel},
        favorites::FavoritesSet,
        ui_state::UIState,
    },
    view::{icons, theme},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, HighlightSpacing, Paragraph, Row, Table, TableState, Wrap},
};

pub struct CatalogTable;

impl CatalogTable {
    pub fn new() -> Self {
        Self
    }

    pub fn render(
        &self,
        frame: &mut Frame<'_>,
        items: &[CatalogItem],
        favorites: &FavoritesSet,
        ui_state: &UIState,
        title: &str,
        area: Rect,
    ) {
        let header = Row::new(vec!["", "Title", "Category", "Price", "Rating"])
            .style(theme::header_style())
            .bottom_margin(1);

        let rows: Vec<Row> = items
            .iter()
            .map(|item| {
                let mark = if favorites.contains(item.id) {
                    Cell::from(icons::FAVORITE_ICON).style(theme::favorite_style())
                } else {
                    Cell::from(icons::NOT_FAVORITE_ICON).style(theme::hint_style())
                };

                let rating = match item.rating_label() {
                    RatingLabel::Rated(r) => {
                        Cell::from(format!("{} {r:.1}", icons::RATING_ICON)).style(theme::rating_style())
                    }
                    unrated @ RatingLabel::Unrated => {
                        Cell::from(unrated.to_string()).style(theme::unrated_style())
                    }
                };

                Row::new(vec![
                    mark,
                    Cell::from(item.title.as_str()),
                    Cell::from(item.category.as_str()).style(Style::default().fg(theme::CYAN)),
                    Cell::from(format!("${:.2}", item.price)).style(theme::price_style()),
                    rating,
                ])
            })
            .collect();

        let widths = [
            Constraint::Length(2),
            Constraint::Fill(1),
            Constraint::Length(18),
            Constraint::Length(10),
            Constraint::Length(9),
        ];

        let mut table_state = TableState::default()
            .with_offset(ui_state.offset)
            .with_selected(Some(ui_state.cursor));

        let table = Table::new(rows, widths)
            .header(header)
            .block(Self::block(title))
            .row_highlight_style(theme::highlight_style())
            .highlight_symbol("▶ ")
            .highlight_spacing(HighlightSpacing::Always);

        frame.render_stateful_widget(table, area, &mut table_state);
    }

    /// Shown instead of the table when nothing survives the filters.
    pub fn render_empty(&self, frame: &mut Frame<'_>, search_text: &str, title: &str, area: Rect) {
        let message = if search_text.is_empty() {
            "No items in this category.".to_string()
        } else {
            format!("No matches for \"{search_text}\".")
        };

        let text = Text::from(vec![
            Line::from(""),
            Line::from(Span::styled(message, Style::default().fg(theme::YELLOW))),
            Line::from(Span::styled(
                "Press / to edit the search, c to change category.",
                theme::hint_style(),
            )),
        ]);

        frame.render_widget(
            Paragraph::new(text)
                .block(Self::block(title))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            area,
        );
    }

    fn block(title: &str) -> Block<'_> {
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .title_style(Style::default().fg(theme::PURPLE).bold())
            .border_style(theme::border_style())
            .style(theme::base_style())
    }
}

impl Default for CatalogTable {
    fn default() -> Self {
        Self::new()
    }
}
