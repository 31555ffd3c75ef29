use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    prelude::{Alignment, Buffer, Constraint, Layout, Rect, Widget},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::{
    pagination::jump_candidates,
    widgets::{modal::centered, text_input::TextInput},
};

const VISIBLE_CANDIDATES: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JumpAction {
    None,
    /// Jump to this 0-based page index.
    Jump(usize),
    Cancel,
}

/// Jump-to-page prompt opened from the pager's ellipsis.
///
/// Typing digits narrows the page list to numbers containing them.
#[derive(Clone, Debug)]
pub struct JumpToPage {
    input: TextInput,
    total_pages: usize,
    cursor: usize,
    pub is_open: bool,
}

impl JumpToPage {
    #[must_use]
    pub fn new(total_pages: usize) -> Self {
        Self {
            input: TextInput::new(),
            total_pages,
            cursor: 0,
            is_open: true,
        }
    }

    #[must_use]
    pub fn query(&self) -> &str {
        self.input.text()
    }

    /// 1-based page numbers matching the typed digits.
    #[must_use]
    pub fn candidates(&self) -> Vec<usize> {
        jump_candidates(self.input.text(), self.total_pages)
    }

    /// Highlighted page number.
    #[must_use]
    pub fn current(&self) -> Option<usize> {
        self.candidates().get(self.cursor).copied()
    }

    pub fn handle_key_events(&mut self, key: KeyEvent) -> JumpAction {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc) => {
                self.is_open = false;
                JumpAction::Cancel
            }
            (_, KeyCode::Char(c)) if c.is_ascii_digit() => {
                self.input.add_char(c);
                self.cursor = 0;
                JumpAction::None
            }
            (_, KeyCode::Backspace) => {
                self.input.delete_char();
                self.cursor = 0;
                JumpAction::None
            }
            (_, KeyCode::Down | KeyCode::Right | KeyCode::Tab) => {
                if self.cursor + 1 < self.candidates().len() {
                    self.cursor += 1;
                }
                JumpAction::None
            }
            (_, KeyCode::Up | KeyCode::Left | KeyCode::BackTab) => {
                self.cursor = self.cursor.saturating_sub(1);
                JumpAction::None
            }
            (_, KeyCode::Enter) => match self.current() {
                Some(page) => {
                    self.is_open = false;
                    JumpAction::Jump(page - 1)
                }
                None => JumpAction::None,
            },
            _ => JumpAction::None,
        }
    }
}

impl Widget for &JumpToPage {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if !self.is_open {
            return;
        }

        let modal_area = centered(area, 40, 6);
        let block = Block::default()
            .title(format!("Jump to page (1-{})", self.total_pages))
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Blue))
            .style(Style::default().bg(Color::Black));
        let inner = block.inner(modal_area);
        Clear.render(modal_area, buf);
        block.render(modal_area, buf);

        let [input_area, _, list_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(inner);

        Paragraph::new(Line::from(vec![
            Span::raw("Page: "),
            Span::styled(self.query(), Style::default().fg(Color::Yellow)),
            Span::styled("█", Style::default().fg(Color::White)),
        ]))
        .render(input_area, buf);

        let candidates = self.candidates();
        let start = self.cursor.saturating_sub(VISIBLE_CANDIDATES - 1);
        let mut spans: Vec<Span> = candidates
            .iter()
            .enumerate()
            .skip(start)
            .take(VISIBLE_CANDIDATES)
            .map(|(i, page)| {
                let style = if i == self.cursor {
                    Style::default().fg(Color::White).bg(Color::Blue)
                } else {
                    Style::default().fg(Color::Gray)
                };
                Span::styled(format!(" {page} "), style)
            })
            .collect();
        if candidates.is_empty() {
            spans.push(Span::styled("no such page", Style::default().fg(Color::Red)));
        }
        Line::from(spans).render(list_area, buf);
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;

    use super::*;

    fn press(jump: &mut JumpToPage, code: KeyCode) -> JumpAction {
        jump.handle_key_events(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_typed_digits_narrow_candidates() {
        let mut jump = JumpToPage::new(20);
        assert_eq!(jump.candidates().len(), 20);

        press(&mut jump, KeyCode::Char('1'));
        press(&mut jump, KeyCode::Char('x'));
        assert_eq!(jump.query(), "1");
        assert_eq!(jump.candidates(), vec![1, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19]);

        press(&mut jump, KeyCode::Down);
        assert_eq!(press(&mut jump, KeyCode::Enter), JumpAction::Jump(9));
        assert!(!jump.is_open);
    }

    #[test]
    fn test_enter_without_match_does_nothing() {
        let mut jump = JumpToPage::new(5);
        press(&mut jump, KeyCode::Char('9'));
        assert_eq!(press(&mut jump, KeyCode::Enter), JumpAction::None);
        assert!(jump.is_open);
        assert_eq!(press(&mut jump, KeyCode::Esc), JumpAction::Cancel);
    }
}
