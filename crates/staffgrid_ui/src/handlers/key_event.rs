use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::widgets::search_filter::SearchFilter;

/// Outcome of a key press in the search box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchInput {
    /// The key was not for the search box.
    Ignored,
    /// The query text changed.
    Changed,
    /// Cursor movement only.
    Moved,
    /// Enter: keep the query and leave the box.
    Applied,
    /// Esc: drop the query and leave the box.
    Cleared,
}

/// Macro to generate text input key handling logic
macro_rules! handle_text_input {
    ($key:expr, $widget:expr, $on_enter:block, $on_esc:block) => {{
        match ($key.modifiers, $key.code) {
            (_, KeyCode::Enter) => $on_enter,
            (_, KeyCode::Esc) => $on_esc,
            (KeyModifiers::CONTROL, KeyCode::Char('a')) => {
                $widget.move_cursor_to_start();
                SearchInput::Moved
            }
            (KeyModifiers::CONTROL, KeyCode::Char('e')) => {
                $widget.move_cursor_to_end();
                SearchInput::Moved
            }
            (KeyModifiers::CONTROL, KeyCode::Char('u')) => {
                $widget.clear();
                SearchInput::Changed
            }
            (_, KeyCode::Char(ch)) if !ch.is_control() => {
                $widget.add_char(ch);
                SearchInput::Changed
            }
            (_, KeyCode::Backspace) => {
                $widget.delete_char();
                SearchInput::Changed
            }
            (_, KeyCode::Left) => {
                $widget.move_cursor_left();
                SearchInput::Moved
            }
            (_, KeyCode::Right) => {
                $widget.move_cursor_right();
                SearchInput::Moved
            }
            (_, KeyCode::Home) => {
                $widget.move_cursor_to_start();
                SearchInput::Moved
            }
            (_, KeyCode::End) => {
                $widget.move_cursor_to_end();
                SearchInput::Moved
            }
            _ => SearchInput::Ignored,
        }
    }};
}

/// Handles search filter key events
///
/// The caller applies [`SearchFilter::get_filter_query`] to its table on
/// [`SearchInput::Changed`], so the table narrows while typing.
pub fn handle_search_filter_input(
    key: KeyEvent,
    search_filter: &mut SearchFilter,
) -> SearchInput {
    handle_text_input!(
        key,
        search_filter,
        {
            search_filter.deactivate();
            SearchInput::Applied
        },
        {
            search_filter.clear();
            search_filter.deactivate();
            SearchInput::Cleared
        }
    )
}
