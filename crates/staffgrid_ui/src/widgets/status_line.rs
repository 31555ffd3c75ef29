use ratatui::{
    prelude::*,
    style::Style,
    widgets::{Paragraph, Widget},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StatusKind {
    #[default]
    Info,
    Error,
}

/// A simple status line widget that displays a message at the bottom of the screen
#[derive(Clone, Debug, Default)]
pub struct StatusLine {
    message: String,
    kind: StatusKind,
}

impl StatusLine {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            message: String::new(),
            kind: StatusKind::Info,
        }
    }

    /// Set an informational message
    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = message.into();
        self.kind = StatusKind::Info;
    }

    /// Set an error message, drawn in red
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.message = message.into();
        self.kind = StatusKind::Error;
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub const fn kind(&self) -> StatusKind {
        self.kind
    }

    pub fn clear(&mut self) {
        self.message.clear();
        self.kind = StatusKind::Info;
    }
}

impl Widget for &StatusLine {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let style = match self.kind {
            StatusKind::Info => Style::default(),
            StatusKind::Error => Style::default().fg(Color::Red),
        };
        Paragraph::new(self.message.as_str())
            .style(style)
            .wrap(ratatui::widgets::Wrap { trim: true })
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_resets_on_next_message() {
        let mut status = StatusLine::new();
        status.set_error("delete failed");
        assert_eq!(status.kind(), StatusKind::Error);
        status.set_message("3 rows deleted");
        assert_eq!(status.kind(), StatusKind::Info);
        status.clear();
        assert!(status.message().is_empty());
    }
}
