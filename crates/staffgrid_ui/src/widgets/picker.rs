use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    prelude::{Alignment, Buffer, Rect, Widget},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, StatefulWidget},
};

use crate::widgets::modal::centered;

/// What a picker was opened for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PickerKind {
    /// Choose which filter to set.
    FilterKey,
    /// Choose a value for the filter with this key.
    FilterValue(String),
    /// Show or hide columns.
    Columns,
    /// Choose a status for the selected rows.
    Status,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PickerItem {
    pub value: String,
    pub label: String,
    /// `Some` for checkbox entries.
    pub checked: Option<bool>,
}

impl PickerItem {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            checked: None,
        }
    }

    pub fn checkbox(value: impl Into<String>, label: impl Into<String>, checked: bool) -> Self {
        Self {
            checked: Some(checked),
            ..Self::new(value, label)
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PickerAction {
    None,
    /// Enter on an item.
    Choose(String),
    /// Space on a checkbox item; carries its new state.
    Toggle(String, bool),
    Close,
}

/// A list of choices shown over the table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Picker {
    pub kind: PickerKind,
    pub title: String,
    pub items: Vec<PickerItem>,
    pub is_open: bool,
    cursor: usize,
}

impl Picker {
    #[must_use]
    pub fn new(kind: PickerKind, title: impl Into<String>, items: Vec<PickerItem>) -> Self {
        Self {
            kind,
            title: title.into(),
            items,
            is_open: true,
            cursor: 0,
        }
    }

    /// Starts the cursor on the item holding `value`.
    #[must_use]
    pub fn with_cursor_on(mut self, value: &str) -> Self {
        if let Some(index) = self.items.iter().position(|i| i.value == value) {
            self.cursor = index;
        }
        self
    }

    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    pub const fn close(&mut self) {
        self.is_open = false;
    }

    pub fn handle_key_events(&mut self, key: KeyEvent) -> PickerAction {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q')) => {
                self.close();
                PickerAction::Close
            }
            (_, KeyCode::Down | KeyCode::Char('j')) => {
                if self.cursor + 1 < self.items.len() {
                    self.cursor += 1;
                }
                PickerAction::None
            }
            (_, KeyCode::Up | KeyCode::Char('k')) => {
                self.cursor = self.cursor.saturating_sub(1);
                PickerAction::None
            }
            (_, KeyCode::Char(' ')) => {
                let Some(item) = self.items.get_mut(self.cursor) else {
                    return PickerAction::None;
                };
                match item.checked {
                    Some(checked) => {
                        item.checked = Some(!checked);
                        PickerAction::Toggle(item.value.clone(), !checked)
                    }
                    None => PickerAction::None,
                }
            }
            (_, KeyCode::Enter) => match self.items.get(self.cursor) {
                Some(item) if item.checked.is_none() => {
                    let value = item.value.clone();
                    self.close();
                    PickerAction::Choose(value)
                }
                Some(_) | None => PickerAction::None,
            },
            _ => PickerAction::None,
        }
    }
}

impl Widget for &Picker {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if !self.is_open {
            return;
        }

        let longest = self
            .items
            .iter()
            .map(|i| i.label.chars().count())
            .chain(std::iter::once(self.title.chars().count()))
            .max()
            .unwrap_or(0);
        let width = u16::try_from(longest + 10).unwrap_or(u16::MAX).max(30);
        let height = u16::try_from(self.items.len() + 2).unwrap_or(u16::MAX).min(20);
        let modal_area = centered(area, width, height);

        let block = Block::default()
            .title(self.title.as_str())
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Blue))
            .style(Style::default().bg(Color::Black));

        let items: Vec<ListItem> = self
            .items
            .iter()
            .map(|item| {
                let text = match item.checked {
                    Some(true) => format!("[x] {}", item.label),
                    Some(false) => format!("[ ] {}", item.label),
                    None => item.label.clone(),
                };
                ListItem::new(Line::from(text))
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");

        let mut state = ListState::default().with_selected(Some(self.cursor));
        Clear.render(modal_area, buf);
        StatefulWidget::render(list, modal_area, buf, &mut state);
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_choose_closes_picker() {
        let mut picker = Picker::new(
            PickerKind::FilterValue("department".into()),
            "Department",
            vec![PickerItem::new("all", "All"), PickerItem::new("HR", "Human Resources")],
        );
        assert_eq!(picker.handle_key_events(key(KeyCode::Down)), PickerAction::None);
        assert_eq!(
            picker.handle_key_events(key(KeyCode::Enter)),
            PickerAction::Choose("HR".into())
        );
        assert!(!picker.is_open);
    }

    #[test]
    fn test_checkbox_items_toggle_and_stay_open() {
        let mut picker = Picker::new(
            PickerKind::Columns,
            "Columns",
            vec![PickerItem::checkbox("email", "Email", true)],
        );
        assert_eq!(
            picker.handle_key_events(key(KeyCode::Char(' '))),
            PickerAction::Toggle("email".into(), false)
        );
        assert_eq!(picker.items.first().and_then(|i| i.checked), Some(false));
        assert_eq!(picker.handle_key_events(key(KeyCode::Enter)), PickerAction::None);
        assert!(picker.is_open);
    }

    #[test]
    fn test_cursor_starts_on_current_value() {
        let picker = Picker::new(
            PickerKind::Status,
            "Status",
            vec![PickerItem::new("Active", "Active"), PickerItem::new("Inactive", "Inactive")],
        )
        .with_cursor_on("Inactive");
        assert_eq!(picker.cursor(), 1);
    }
}
