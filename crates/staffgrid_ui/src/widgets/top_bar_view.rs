use crossterm::event::KeyCode;
use ratatui::{
    prelude::{Alignment, Buffer, Constraint, Layout, Rect, Widget},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::{hotkey::Hotkey, hotkey_view::HotkeyView};

pub const TABLE_HOTKEYS: [Hotkey; 12] = [
    Hotkey {
        keycode: KeyCode::Char('/'),
        description: "Search",
    },
    Hotkey {
        keycode: KeyCode::Char('f'),
        description: "Filter",
    },
    Hotkey {
        keycode: KeyCode::Char('s'),
        description: "Sort",
    },
    Hotkey {
        keycode: KeyCode::Char('c'),
        description: "Columns",
    },
    Hotkey {
        keycode: KeyCode::Char(' '),
        description: "Select",
    },
    Hotkey {
        keycode: KeyCode::Char('a'),
        description: "Select page",
    },
    Hotkey {
        keycode: KeyCode::Char('D'),
        description: "Delete",
    },
    Hotkey {
        keycode: KeyCode::Char('E'),
        description: "Set status",
    },
    Hotkey {
        keycode: KeyCode::Char('n'),
        description: "Next page",
    },
    Hotkey {
        keycode: KeyCode::Char('p'),
        description: "Prev page",
    },
    Hotkey {
        keycode: KeyCode::Char('g'),
        description: "Go to page",
    },
    Hotkey {
        keycode: KeyCode::Char('q'),
        description: "Quit",
    },
];

/// One entry of the tab strip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabLabel {
    pub title: String,
    pub count: usize,
}

pub struct TopBarView<'a> {
    pub tabs: &'a [TabLabel],
    pub active_tab: usize,
    pub hotkeys: &'a [Hotkey<'a>],
    pub app_name: &'a str,
}

impl Widget for TopBarView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [tabs_area, hotkeys_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Fill(1)]).areas(area);
        let [strip_area, name_area] =
            Layout::horizontal([Constraint::Fill(1), Constraint::Length(20)])
                .spacing(1)
                .areas(tabs_area);

        let spans: Vec<Span> = self
            .tabs
            .iter()
            .enumerate()
            .flat_map(|(i, tab)| {
                let style = if i == self.active_tab {
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Cyan)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::Gray)
                };
                [
                    Span::styled(format!(" {} {} ({}) ", i + 1, tab.title, tab.count), style),
                    Span::raw(" "),
                ]
            })
            .collect();

        Line::from(spans).render(strip_area, buf);
        Paragraph::new(self.app_name.trim_start())
            .alignment(Alignment::Right)
            .render(name_area, buf);
        HotkeyView {
            hotkeys: self.hotkeys,
        }
        .render(hotkeys_area, buf);
    }
}
