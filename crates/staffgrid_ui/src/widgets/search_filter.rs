use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::{filter::SearchField, widgets::text_input::TextInput};

/// Search box shown above a table while it is being typed into
#[derive(Debug, Clone, Default)]
pub struct SearchFilter {
    input: TextInput,
    pub is_active: bool,
}

impl SearchFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start editing, seeded with the table's current query.
    pub fn activate(&mut self, current: &str) {
        self.is_active = true;
        self.input.set_text(current);
    }

    /// Stop editing; the query stays applied.
    pub const fn deactivate(&mut self) {
        self.is_active = false;
    }

    pub fn add_char(&mut self, ch: char) {
        self.input.add_char(ch);
    }

    pub fn delete_char(&mut self) {
        self.input.delete_char();
    }

    pub const fn move_cursor_left(&mut self) {
        self.input.move_cursor_left();
    }

    pub fn move_cursor_right(&mut self) {
        self.input.move_cursor_right();
    }

    pub const fn move_cursor_to_start(&mut self) {
        self.input.move_cursor_to_start();
    }

    pub fn move_cursor_to_end(&mut self) {
        self.input.move_cursor_to_end();
    }

    pub fn clear(&mut self) {
        self.input.clear();
    }

    #[must_use]
    pub fn get_filter_query(&self) -> &str {
        self.input.text().trim()
    }

    /// Widget drawing the box with the labels of the searched fields.
    #[must_use]
    pub fn view<'a>(&'a self, fields: &'a [SearchField]) -> SearchFilterView<'a> {
        SearchFilterView {
            input: &self.input,
            fields,
        }
    }
}

pub struct SearchFilterView<'a> {
    input: &'a TextInput,
    fields: &'a [SearchField],
}

impl Widget for SearchFilterView<'_> {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let labels = self
            .fields
            .iter()
            .map(|f| f.label.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let title = if labels.is_empty() {
            " Search (Enter to apply, Esc to clear) ".to_string()
        } else {
            format!(" Search {labels} (Enter to apply, Esc to clear) ")
        };
        let block = Block::new()
            .borders(Borders::ALL)
            .title(title)
            .title_alignment(ratatui::layout::Alignment::Left);

        let inner_area = block.inner(area);
        Widget::render(block, area, buf);

        let (before, after) = self.input.split_at_cursor();
        let line = Line::from(vec![
            Span::raw(before),
            Span::styled("█", Style::default().fg(Color::White)),
            Span::raw(after),
        ]);
        Paragraph::new(line)
            .style(Style::default().fg(Color::White))
            .render(inner_area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activate_seeds_current_query() {
        let mut search = SearchFilter::new();
        search.activate("ann");
        search.add_char(' ');
        assert_eq!(search.get_filter_query(), "ann");
        search.add_char('b');
        assert_eq!(search.get_filter_query(), "ann b");

        search.deactivate();
        assert!(!search.is_active);
        assert_eq!(search.get_filter_query(), "ann b");
    }
}
