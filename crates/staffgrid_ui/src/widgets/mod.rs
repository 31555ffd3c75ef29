pub mod buttons;
pub mod hotkey;
pub mod hotkey_view;
pub mod jump;
pub mod modal;
pub mod pager;
pub mod picker;
pub mod search_filter;
pub mod status_line;
pub mod table;
pub mod text_input;
pub mod top_bar_view;

pub use status_line::StatusLine;
pub use table::{DataTable, TableOptions};
