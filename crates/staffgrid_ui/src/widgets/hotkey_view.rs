use ratatui::{
    prelude::{Buffer, Rect, Widget},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use super::hotkey::Hotkey;

/// Hotkeys laid out as `<key> description` pairs, wrapping as needed
pub struct HotkeyView<'a> {
    pub hotkeys: &'a [Hotkey<'a>],
}

impl Widget for HotkeyView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let key_style = Style::default().fg(Color::Cyan);
        let spans: Vec<Span> = self
            .hotkeys
            .iter()
            .flat_map(|hotkey| {
                [
                    Span::styled(format!("<{hotkey}>"), key_style),
                    Span::raw(format!(" {}  ", hotkey.description)),
                ]
            })
            .collect();

        Paragraph::new(Line::from(spans))
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}
