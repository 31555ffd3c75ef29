use crossterm::event::KeyCode;
use log::debug;
use staffgrid_db::TableData;

use crate::widgets::table::DataTable;

/// Helper for table navigation operations
pub struct TableNavigationHandler;

impl TableNavigationHandler {
    /// Moves the cursor, the page or the page size of `table`.
    ///
    /// Returns whether the key was a navigation key.
    pub fn navigate_table<T: TableData + Clone>(
        table: &mut DataTable<T>,
        key: KeyCode,
    ) -> bool {
        match key {
            KeyCode::Char('j') | KeyCode::Down => table.next_row(),
            KeyCode::Char('k') | KeyCode::Up => table.previous_row(),
            KeyCode::Char('h' | 'b') | KeyCode::Left => table.previous_column(),
            KeyCode::Char('l' | 'w') | KeyCode::Right => table.next_column(),
            KeyCode::Char('0') => table.view.column_cursor = 0,
            KeyCode::Char('$') => {
                table.view.column_cursor =
                    table.visible_columns().len().saturating_sub(1);
            }
            KeyCode::Home => table.first_row(),
            KeyCode::Char('G') | KeyCode::End => table.last_row(),
            KeyCode::Char('n') | KeyCode::PageDown => table.next_page(),
            KeyCode::Char('p') | KeyCode::PageUp => table.previous_page(),
            KeyCode::Char('+' | '=') => {
                table.cycle_page_size(true);
                debug!("{} page size {}", T::title(), table.page_size());
            }
            KeyCode::Char('-') => {
                table.cycle_page_size(false);
                debug!("{} page size {}", T::title(), table.page_size());
            }
            _ => return false,
        }
        true
    }
}
