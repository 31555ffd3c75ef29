use ratatui::{
    prelude::{Buffer, Rect, Widget},
    style::{Color, Style},
    text::{Line, Span},
};

/// A centred row of buttons; `selected` is out of range when none is focused
pub struct Buttons<'a> {
    pub buttons: Vec<&'a str>,
    pub selected: usize,
}

impl Widget for Buttons<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let spans: Vec<Span> = self
            .buttons
            .iter()
            .enumerate()
            .flat_map(|(i, button)| {
                let background = if i == self.selected { Color::Blue } else { Color::DarkGray };
                [
                    Span::styled(
                        format!(" {button} "),
                        Style::default().fg(Color::White).bg(background),
                    ),
                    Span::raw(" "),
                ]
            })
            .collect();
        Line::from(spans).centered().render(area, buf);
    }
}
