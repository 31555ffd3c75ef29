//! Interactive table state: search, filters, sorting, pagination, selection
//! and the transient highlight.
//!
//! Every mutation replaces the slice it touches; there is no history.

use std::{
    collections::{BTreeMap, BTreeSet},
    time::{Duration, Instant},
};

use crate::pagination::{DEFAULT_PAGE_SIZE, is_allowed_page_size};

/// How long a newly created row stays highlighted.
pub const HIGHLIGHT_DURATION: Duration = Duration::from_secs(10);

/// Filter cleared whenever the upstream reset key changes value.
pub const DEPENDENT_FILTER_KEY: &str = "employeeId";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    #[must_use]
    pub const fn flip(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    #[must_use]
    pub const fn indicator(self) -> &'static str {
        match self {
            Self::Ascending => "▲",
            Self::Descending => "▼",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortKey {
    pub column_id: String,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn new(column_id: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            column_id: column_id.into(),
            direction,
        }
    }
}

/// What happens to the page index when search or filters change.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PageReset {
    /// Keep the page index; it is clamped to the page count on read.
    #[default]
    Keep,
    /// Go back to the first page.
    FirstPage,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    pub page_index: usize,
    pub page_size: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    /// Change the page size, keeping the first row of the current page in
    /// view. Sizes outside the allow-list are rejected.
    pub fn set_page_size(&mut self, page_size: usize) -> bool {
        if !is_allowed_page_size(page_size) {
            return false;
        }
        let top_row = self.page_index * self.page_size;
        self.page_size = page_size;
        self.page_index = top_row / page_size;
        true
    }
}

/// Detects value changes of the upstream key of a cascading filter.
///
/// The first observed value is only remembered.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResetTrigger {
    last: Option<String>,
}

impl ResetTrigger {
    /// Records `value`; returns whether dependent filters must be cleared.
    pub fn observe(&mut self, value: &str) -> bool {
        let changed = self.last.as_deref().is_some_and(|last| last != value);
        self.last = Some(value.to_string());
        changed
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Highlight {
    id: String,
    since: Instant,
}

#[derive(Clone, Debug, Default)]
pub struct ViewState {
    pub search: String,
    pub active_filters: BTreeMap<String, String>,
    pub sorting: Vec<SortKey>,
    pub pagination: Pagination,
    pub row_selection: BTreeSet<String>,
    pub page_reset: PageReset,
    highlight: Option<Highlight>,
}

impl ViewState {
    #[must_use]
    pub fn with_page_reset(page_reset: PageReset) -> Self {
        Self {
            page_reset,
            ..Self::default()
        }
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search = text.into();
        self.after_filter_change();
    }

    pub fn set_filter(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.active_filters.insert(key.into(), value.into());
        self.after_filter_change();
    }

    pub fn clear_filter(&mut self, key: &str) -> bool {
        let removed = self.active_filters.remove(key).is_some();
        if removed {
            self.after_filter_change();
        }
        removed
    }

    pub fn clear_filters(&mut self) {
        self.active_filters.clear();
        self.after_filter_change();
    }

    #[must_use]
    pub fn filter_value(&self, key: &str) -> Option<&str> {
        self.active_filters.get(key).map(String::as_str)
    }

    const fn after_filter_change(&mut self) {
        if matches!(self.page_reset, PageReset::FirstPage) {
            self.pagination.page_index = 0;
        }
    }

    /// Current sort, if a column has been sorted.
    #[must_use]
    pub fn sort(&self) -> Option<&SortKey> {
        self.sorting.first()
    }

    pub fn set_sort(&mut self, column_id: impl Into<String>, direction: SortDirection) {
        self.sorting = vec![SortKey::new(column_id, direction)];
    }

    /// Ascending for a newly sorted column, flipped for the sorted one.
    pub fn toggle_sort(&mut self, column_id: &str) -> SortKey {
        let direction = match self.sorting.first() {
            Some(key) if key.column_id == column_id => key.direction.flip(),
            Some(_) | None => SortDirection::Ascending,
        };
        let key = SortKey::new(column_id, direction);
        self.sorting = vec![key.clone()];
        key
    }

    pub const fn set_page(&mut self, page_index: usize) {
        self.pagination.page_index = page_index;
    }

    pub fn set_page_size(&mut self, page_size: usize) -> bool {
        self.pagination.set_page_size(page_size)
    }

    pub fn select(&mut self, id: impl Into<String>) {
        self.row_selection.insert(id.into());
    }

    pub fn deselect(&mut self, id: &str) {
        self.row_selection.remove(id);
    }

    pub fn toggle_selected(&mut self, id: &str) {
        if !self.row_selection.remove(id) {
            self.row_selection.insert(id.to_string());
        }
    }

    #[must_use]
    pub fn is_selected(&self, id: &str) -> bool {
        self.row_selection.contains(id)
    }

    pub fn clear_selection(&mut self) {
        self.row_selection.clear();
    }

    pub fn highlight(&mut self, id: impl Into<String>, now: Instant) {
        self.highlight = Some(Highlight {
            id: id.into(),
            since: now,
        });
    }

    /// Highlighted row id while it is still within [`HIGHLIGHT_DURATION`].
    #[must_use]
    pub fn highlighted_id(&self, now: Instant) -> Option<&str> {
        self.highlight
            .as_ref()
            .filter(|h| now.saturating_duration_since(h.since) < HIGHLIGHT_DURATION)
            .map(|h| h.id.as_str())
    }

    /// Drops an expired highlight; returns whether one was dropped.
    pub fn tick(&mut self, now: Instant) -> bool {
        let expired = self.highlight.is_some() && self.highlighted_id(now).is_none();
        if expired {
            self.highlight = None;
        }
        expired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_cycles_without_returning_to_unsorted() {
        let mut state = ViewState::default();
        assert!(state.sort().is_none());

        assert_eq!(state.toggle_sort("name").direction, SortDirection::Ascending);
        assert_eq!(state.toggle_sort("name").direction, SortDirection::Descending);
        assert_eq!(state.toggle_sort("name").direction, SortDirection::Ascending);

        let key = state.toggle_sort("salary");
        assert_eq!(key, SortKey::new("salary", SortDirection::Ascending));
        assert_eq!(state.sorting.len(), 1);
    }

    #[test]
    fn test_page_size_change_keeps_top_row() {
        let mut pagination = Pagination {
            page_index: 3,
            page_size: 10,
        };
        assert!(pagination.set_page_size(20));
        assert_eq!(pagination.page_index, 1);

        assert!(!pagination.set_page_size(7));
        assert_eq!(pagination.page_size, 20);
    }

    #[test]
    fn test_search_keeps_page_unless_reset_requested() {
        let mut state = ViewState::default();
        state.set_page(3);
        state.set_search("an");
        assert_eq!(state.pagination.page_index, 3);

        state.page_reset = PageReset::FirstPage;
        state.set_filter("dept", "HR");
        assert_eq!(state.pagination.page_index, 0);
    }

    #[test]
    fn test_with_page_reset_starts_on_first_page() {
        let mut state = ViewState::with_page_reset(PageReset::FirstPage);
        assert_eq!(state.pagination.page_index, 0);
        assert!(state.highlighted_id(Instant::now()).is_none());
        state.set_page(2);
        state.set_search("x");
        assert_eq!(state.pagination.page_index, 0);
    }

    #[test]
    fn test_reset_trigger_ignores_first_value() {
        let mut trigger = ResetTrigger::default();
        assert!(!trigger.observe("dept-1"));
        assert!(!trigger.observe("dept-1"));
        assert!(trigger.observe("dept-2"));
    }

    #[test]
    fn test_highlight_expires_after_window() {
        let mut state = ViewState::default();
        let start = Instant::now();
        state.highlight("row-9", start);

        assert_eq!(state.highlighted_id(start + Duration::from_secs(9)), Some("row-9"));
        assert!(!state.tick(start + Duration::from_secs(9)));
        assert_eq!(state.highlighted_id(start + HIGHLIGHT_DURATION), None);
        assert!(state.tick(start + HIGHLIGHT_DURATION));
        assert!(!state.tick(start + HIGHLIGHT_DURATION));
    }

    #[test]
    fn test_selection_toggle() {
        let mut state = ViewState::default();
        state.toggle_selected("a");
        state.select("b");
        assert!(state.is_selected("a"));
        state.toggle_selected("a");
        state.deselect("b");
        assert!(state.row_selection.is_empty());
    }
}
