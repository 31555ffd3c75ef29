use ratatui::{
    prelude::{Buffer, Rect, Widget},
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

use crate::pagination::PageLabel;

/// Footer line under a table: page buttons, page size and counts.
#[derive(Clone, Debug, Default)]
pub struct Pager {
    pub labels: Vec<PageLabel>,
    /// 1-based
    pub current_page: usize,
    pub page_size: usize,
    pub total_rows: usize,
    pub selected: usize,
    pub pending: usize,
}

impl Pager {
    /// Text of the pager without styling.
    #[must_use]
    pub fn plain(&self) -> String {
        self.spans()
            .iter()
            .map(|span| span.content.as_ref())
            .collect()
    }

    fn spans(&self) -> Vec<Span<'static>> {
        let mut spans = vec![Span::raw(" ‹ ")];
        for label in &self.labels {
            let style = match label {
                PageLabel::Page(n) if *n == self.current_page => Style::default()
                    .fg(Color::White)
                    .bg(Color::Blue)
                    .add_modifier(Modifier::BOLD),
                PageLabel::Page(_) => Style::default().fg(Color::Gray),
                PageLabel::Ellipsis => Style::default().fg(Color::DarkGray),
            };
            spans.push(Span::styled(format!(" {label} "), style));
        }
        spans.push(Span::raw(" › "));

        let dim = Style::default().fg(Color::DarkGray);
        spans.push(Span::styled(format!(" {}/page ", self.page_size), dim));
        spans.push(Span::styled(format!(" {} rows ", self.total_rows), dim));
        if self.selected > 0 {
            spans.push(Span::styled(
                format!(" {} selected ", self.selected),
                Style::default().fg(Color::Yellow),
            ));
        }
        if self.pending > 0 {
            spans.push(Span::styled(
                format!(" {} deleting ", self.pending),
                Style::default().fg(Color::Red),
            ));
        }
        spans
    }
}

impl Widget for Pager {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        Line::from(self.spans()).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::page_labels;

    #[test]
    fn test_plain_text_lists_pages_and_counts() {
        let pager = Pager {
            labels: page_labels(9, 20),
            current_page: 10,
            page_size: 10,
            total_rows: 195,
            selected: 2,
            pending: 0,
        };
        let text = pager.plain();
        assert!(text.contains(" 1  …  8  9  10  11  12  …  20 "));
        assert!(text.contains("10/page"));
        assert!(text.contains("195 rows"));
        assert!(text.contains("2 selected"));
        assert!(!text.contains("deleting"));
    }
}
