//! Headless data table for homogeneous records (search, filters, sorting,
//! pagination, selection, column visibility and bulk actions) and the
//! ratatui widgets that draw it.

pub mod bulk;
pub mod column;
pub mod filter;
pub mod handlers;
pub mod pagination;
pub mod sorting;
pub mod view_state;
pub mod visibility;
pub mod widgets;

pub use bulk::{PendingRemoval, RemovalTicket};
pub use column::ColumnDef;
pub use filter::{ALL, ComparisonMode, FilterConfig, FilterOption, SearchField};
pub use handlers::TableNavigationHandler;
pub use view_state::{PageReset, SortDirection, SortKey};
pub use widgets::*;
