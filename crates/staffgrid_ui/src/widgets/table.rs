use std::{sync::Arc, time::Instant};

use log::{debug, warn};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{
        Block, BorderType, Cell, HighlightSpacing, Row, StatefulWidget, Table,
        TableState, Widget,
    },
};
use staffgrid_db::{PreferenceStore, TableData};
use unicode_width::UnicodeWidthStr;

use crate::{
    bulk::{OrderedRows, PendingRemoval, RemovalTicket, Removals},
    column::ColumnDef,
    filter::{FilterConfig, FilterOption, Predicate, SearchField},
    pagination::{
        DEFAULT_PAGE_SIZE, PAGE_SIZES, clamp_page_index, page_bounds,
        page_count, page_labels,
    },
    sorting::sort_rows,
    view_state::{
        DEPENDENT_FILTER_KEY, PageReset, ResetTrigger, SortDirection, SortKey,
        ViewState,
    },
    visibility::ColumnVisibility,
    widgets::pager::Pager,
};

const MAX_COLUMN_WIDTH: u16 = 32;
const CHECKBOX_WIDTH: u16 = 3;

pub type MultiDeleteFn = Box<dyn FnMut(RemovalTicket, Vec<String>) + Send>;
pub type BulkEditFn<T> = Box<dyn FnMut(Vec<T>) + Send>;
pub type FilterChangeFn = Box<dyn FnMut(&str, &str) + Send>;

/// Construction-time configuration of a [`DataTable`].
pub struct TableOptions<T> {
    /// Enables column-visibility persistence under a key derived from it.
    pub table_id: Option<String>,
    pub search_fields: Vec<SearchField>,
    pub filters: Vec<FilterConfig>,
    /// Upstream filter whose value changes clear the `employeeId` filter.
    pub reset_filter_key: Option<String>,
    /// Row to highlight once the table is built.
    pub new_item_id: Option<String>,
    pub default_sort: Option<SortKey>,
    pub page_size: usize,
    pub page_reset: PageReset,
    pub preferences: Option<Arc<dyn PreferenceStore>>,
    pub on_multi_delete: Option<MultiDeleteFn>,
    pub on_bulk_edit: Option<BulkEditFn<T>>,
    pub on_filter_change: Option<FilterChangeFn>,
}

impl<T> Default for TableOptions<T> {
    fn default() -> Self {
        Self {
            table_id: None,
            search_fields: Vec::new(),
            filters: Vec::new(),
            reset_filter_key: None,
            new_item_id: None,
            default_sort: None,
            page_size: DEFAULT_PAGE_SIZE,
            page_reset: PageReset::default(),
            preferences: None,
            on_multi_delete: None,
            on_bulk_edit: None,
            on_filter_change: None,
        }
    }
}

impl<T> TableOptions<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn table_id(mut self, table_id: impl Into<String>) -> Self {
        self.table_id = Some(table_id.into());
        self
    }

    #[must_use]
    pub fn search_fields(mut self, fields: Vec<SearchField>) -> Self {
        self.search_fields = fields;
        self
    }

    #[must_use]
    pub fn filters(mut self, filters: Vec<FilterConfig>) -> Self {
        self.filters = filters;
        self
    }

    #[must_use]
    pub fn reset_filter_key(mut self, key: impl Into<String>) -> Self {
        self.reset_filter_key = Some(key.into());
        self
    }

    #[must_use]
    pub fn new_item_id(mut self, id: impl Into<String>) -> Self {
        self.new_item_id = Some(id.into());
        self
    }

    #[must_use]
    pub fn default_sort(mut self, column_id: impl Into<String>, direction: SortDirection) -> Self {
        self.default_sort = Some(SortKey::new(column_id, direction));
        self
    }

    #[must_use]
    pub const fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    #[must_use]
    pub const fn page_reset(mut self, page_reset: PageReset) -> Self {
        self.page_reset = page_reset;
        self
    }

    #[must_use]
    pub fn preferences(mut self, store: Arc<dyn PreferenceStore>) -> Self {
        self.preferences = Some(store);
        self
    }

    #[must_use]
    pub fn on_multi_delete(
        mut self,
        f: impl FnMut(RemovalTicket, Vec<String>) + Send + 'static,
    ) -> Self {
        self.on_multi_delete = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn on_bulk_edit(mut self, f: impl FnMut(Vec<T>) + Send + 'static) -> Self {
        self.on_bulk_edit = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn on_filter_change(mut self, f: impl FnMut(&str, &str) + Send + 'static) -> Self {
        self.on_filter_change = Some(Box::new(f));
        self
    }
}

/// Cursor state of the rendered table (row within the page, focused column)
#[derive(Clone, Debug, Default)]
pub struct TableViewState {
    pub state: TableState,
    pub column_cursor: usize,
}

/// Headless table model plus its terminal rendering.
///
/// Rows shown at any time are `sort(filter(rows))` sliced to the current
/// page, recomputed from the full row set on every read.
pub struct DataTable<T: TableData + Clone> {
    rows: OrderedRows<T>,
    columns: Vec<ColumnDef<T>>,
    options: TableOptions<T>,
    state: ViewState,
    visibility: ColumnVisibility,
    removals: Removals<T>,
    reset_trigger: ResetTrigger,
    removal_error: Option<String>,
    pub view: TableViewState,
}

impl<T: TableData + Clone> DataTable<T> {
    #[must_use]
    pub fn new(rows: Vec<T>, columns: Vec<ColumnDef<T>>, options: TableOptions<T>) -> Self {
        let mut state = ViewState::with_page_reset(options.page_reset);
        if !state.set_page_size(options.page_size) {
            warn!(
                "page size {} is not one of {PAGE_SIZES:?}, using {DEFAULT_PAGE_SIZE}",
                options.page_size
            );
        }
        if let Some(sort) = &options.default_sort {
            state.set_sort(sort.column_id.clone(), sort.direction);
        }
        if let Some(id) = &options.new_item_id {
            state.highlight(id.clone(), Instant::now());
        }

        let visibility =
            ColumnVisibility::mount(options.table_id.clone(), options.preferences.clone());

        Self {
            rows: OrderedRows::from(rows),
            columns,
            options,
            state,
            visibility,
            removals: Removals::default(),
            reset_trigger: ResetTrigger::default(),
            removal_error: None,
            view: TableViewState {
                state: TableState::default().with_selected(0),
                column_cursor: 0,
            },
        }
    }

    #[must_use]
    pub fn title() -> &'static str {
        T::title()
    }

    /// Every row, pending removals excluded, in insertion order.
    #[must_use]
    pub fn rows(&self) -> &[T] {
        self.rows.as_slice()
    }

    #[must_use]
    pub fn columns(&self) -> &[ColumnDef<T>] {
        &self.columns
    }

    #[must_use]
    pub const fn view_state(&self) -> &ViewState {
        &self.state
    }

    #[must_use]
    pub fn table_id(&self) -> Option<&str> {
        self.visibility.table_id()
    }

    #[must_use]
    pub fn filters(&self) -> &[FilterConfig] {
        &self.options.filters
    }

    #[must_use]
    pub fn search_fields(&self) -> &[SearchField] {
        &self.options.search_fields
    }

    /// Rows passing search and filters, in sort order.
    #[must_use]
    pub fn processed_rows(&self) -> Vec<&T> {
        let predicate = Predicate {
            columns: &self.columns,
            search: &self.state.search,
            search_fields: &self.options.search_fields,
            active_filters: &self.state.active_filters,
            filters: &self.options.filters,
        };
        let mut rows: Vec<&T> =
            self.rows.iter().filter(|row| predicate.matches(row)).collect();
        if let Some(key) = self.state.sort() {
            sort_rows(&mut rows, &self.columns, key);
        }
        rows
    }

    #[must_use]
    pub fn total_pages(&self) -> usize {
        self.page_position(self.processed_rows().len()).1
    }

    /// Stored page index clamped to the pages that currently exist.
    #[must_use]
    pub fn effective_page_index(&self) -> usize {
        self.page_position(self.processed_rows().len()).0
    }

    /// Rows on the current page.
    #[must_use]
    pub fn page_rows(&self) -> Vec<&T> {
        self.slice_page(self.processed_rows())
    }

    /// Clamped page index and page count for `row_count` processed rows.
    fn page_position(&self, row_count: usize) -> (usize, usize) {
        let total = page_count(row_count, self.state.pagination.page_size);
        (clamp_page_index(self.state.pagination.page_index, total), total)
    }

    fn slice_page<'a>(&self, rows: Vec<&'a T>) -> Vec<&'a T> {
        let (page_index, _) = self.page_position(rows.len());
        let (start, end) = page_bounds(page_index, self.state.pagination.page_size, rows.len());
        rows.into_iter().skip(start).take(end - start).collect()
    }

    // Search and filters

    #[must_use]
    pub fn search(&self) -> &str {
        &self.state.search
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.state.set_search(text);
        self.view.state.select(Some(0));
    }

    #[must_use]
    pub fn filter_value(&self, key: &str) -> Option<&str> {
        self.state.filter_value(key)
    }

    /// Sets one filter, runs the cascading reset and notifies the host.
    pub fn set_filter(&mut self, key: &str, value: &str) {
        debug!("{} filter {key} = {value}", T::title());
        self.state.set_filter(key, value);

        if self.options.reset_filter_key.as_deref() == Some(key) {
            self.observe_reset_value(value);
        }
        if let Some(callback) = self.options.on_filter_change.as_mut() {
            callback(key, value);
        }
        self.view.state.select(Some(0));
    }

    /// Feeds a value of the reset key owned outside the table.
    pub fn sync_reset_value(&mut self, value: &str) {
        if self.options.reset_filter_key.is_some() {
            self.observe_reset_value(value);
        }
    }

    fn observe_reset_value(&mut self, value: &str) {
        if self.reset_trigger.observe(value)
            && self.state.clear_filter(DEPENDENT_FILTER_KEY)
        {
            debug!("{} cleared {DEPENDENT_FILTER_KEY} filter", T::title());
        }
    }

    pub fn clear_filter(&mut self, key: &str) -> bool {
        self.state.clear_filter(key)
    }

    pub fn clear_filters(&mut self) {
        self.state.clear_filters();
        self.view.state.select(Some(0));
    }

    /// Replaces the options of one filter; used for dependent dropdowns.
    pub fn set_filter_options(&mut self, key: &str, options: Vec<FilterOption>) {
        if let Some(filter) = self.options.filters.iter_mut().find(|f| f.key == key) {
            filter.options = options;
        }
    }

    // Sorting

    #[must_use]
    pub fn sorting(&self) -> Option<&SortKey> {
        self.state.sort()
    }

    /// Sorts by `column_id`, flipping the direction if it is already sorted.
    /// Unknown and non-sortable columns are ignored.
    pub fn toggle_sort(&mut self, column_id: &str) -> Option<SortKey> {
        if !self.is_sortable(column_id) {
            return None;
        }
        Some(self.state.toggle_sort(column_id))
    }

    pub fn set_sort(&mut self, column_id: &str, direction: SortDirection) -> bool {
        if !self.is_sortable(column_id) {
            return false;
        }
        self.state.set_sort(column_id, direction);
        true
    }

    fn is_sortable(&self, column_id: &str) -> bool {
        self.columns
            .iter()
            .any(|c| c.id == column_id && c.can_sort())
    }

    // Pagination

    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.state.pagination.page_size
    }

    pub fn set_page(&mut self, page_index: usize) {
        self.state.set_page(clamp_page_index(page_index, self.total_pages()));
        self.view.state.select(Some(0));
    }

    pub fn next_page(&mut self) {
        self.set_page(self.effective_page_index().saturating_add(1));
    }

    pub fn previous_page(&mut self) {
        self.set_page(self.effective_page_index().saturating_sub(1));
    }

    /// Starts the stored index from the clamped one so the top row of the
    /// page on screen stays in view.
    pub fn set_page_size(&mut self, page_size: usize) -> bool {
        let current = self.effective_page_index();
        self.state.set_page(current);
        self.state.set_page_size(page_size)
    }

    /// Moves to the next or previous allowed page size.
    pub fn cycle_page_size(&mut self, larger: bool) {
        let current = self.page_size();
        let next = if larger {
            PAGE_SIZES.iter().copied().find(|size| *size > current)
        } else {
            PAGE_SIZES.iter().rev().copied().find(|size| *size < current)
        };
        if let Some(size) = next {
            self.set_page_size(size);
        }
    }

    // Selection

    pub fn select(&mut self, id: impl Into<String>) {
        self.state.select(id);
    }

    pub fn deselect(&mut self, id: &str) {
        self.state.deselect(id);
    }

    pub fn toggle_selected(&mut self, id: &str) {
        self.state.toggle_selected(id);
    }

    #[must_use]
    pub fn is_selected(&self, id: &str) -> bool {
        self.state.is_selected(id)
    }

    pub fn clear_selection(&mut self) {
        self.state.clear_selection();
    }

    /// Selects every row on the page, or deselects them if all are selected.
    pub fn toggle_page_selection(&mut self) {
        let ids: Vec<String> = self.page_rows().iter().map(|r| r.id()).collect();
        if ids.iter().all(|id| self.state.is_selected(id)) {
            for id in &ids {
                self.state.deselect(id);
            }
        } else {
            for id in ids {
                self.state.select(id);
            }
        }
    }

    #[must_use]
    pub fn selection_count(&self) -> usize {
        self.state.row_selection.len()
    }

    /// Selected rows that still exist, in insertion order.
    #[must_use]
    pub fn selected_rows(&self) -> Vec<&T> {
        self.rows
            .iter()
            .filter(|row| self.state.is_selected(&row.id()))
            .collect()
    }

    // Column visibility

    #[must_use]
    pub fn is_column_visible(&self, column_id: &str) -> bool {
        self.visibility.is_visible(column_id)
    }

    /// Shows or hides a hideable column and persists the change.
    pub fn toggle_column_visibility(&mut self, column_id: &str, visible: bool) -> bool {
        let hideable = self
            .columns
            .iter()
            .any(|c| c.id == column_id && c.hideable);
        if !hideable {
            return false;
        }
        self.visibility.set(column_id, visible);
        let count = self.visible_columns().len();
        self.view.column_cursor = self.view.column_cursor.min(count.saturating_sub(1));
        true
    }

    #[must_use]
    pub fn visible_columns(&self) -> Vec<&ColumnDef<T>> {
        self.columns
            .iter()
            .filter(|c| self.visibility.is_visible(&c.id))
            .collect()
    }

    /// Switches the table identity used for visibility persistence.
    pub fn remount(&mut self, table_id: Option<String>) {
        self.visibility.remount(table_id);
    }

    // Bulk actions

    /// Takes the selected rows out of the table and hands their ids to the
    /// host. The rows stay in a shadow list until [`Self::resolve_removal`].
    pub fn delete_selected(&mut self) -> Option<PendingRemoval<T>> {
        let selection = std::mem::take(&mut self.state.row_selection);
        let removal = self
            .removals
            .take(&mut self.rows, |row| selection.contains(&row.id()))?;

        let ids: Vec<String> = removal.rows().map(TableData::id).collect();
        debug!(
            "{} removal {} pending for {} rows",
            T::title(),
            removal.ticket,
            ids.len()
        );
        if let Some(callback) = self.options.on_multi_delete.as_mut() {
            callback(removal.ticket, ids);
        }
        Some(removal)
    }

    /// Finishes a pending removal. On failure the rows come back where they
    /// were and the message is kept for display.
    pub fn resolve_removal(&mut self, ticket: RemovalTicket, outcome: Result<(), String>) -> bool {
        match outcome {
            Ok(()) => {
                let committed = self.removals.commit(ticket).is_some();
                if committed {
                    debug!("{} removal {ticket} committed", T::title());
                }
                committed
            }
            Err(message) => {
                let Some(count) = self.removals.restore(ticket, &mut self.rows) else {
                    return false;
                };
                warn!("{} removal {ticket} failed, restored {count} rows: {message}", T::title());
                self.removal_error = Some(message);
                true
            }
        }
    }

    #[must_use]
    pub fn pending_removals(&self) -> usize {
        self.removals.pending_count()
    }

    #[must_use]
    pub fn removal_error(&self) -> Option<&str> {
        self.removal_error.as_deref()
    }

    pub const fn take_removal_error(&mut self) -> Option<String> {
        self.removal_error.take()
    }

    /// Hands the selected rows to the host's bulk-edit callback.
    pub fn bulk_edit_selected(&mut self) -> usize {
        let rows: Vec<T> = self.selected_rows().into_iter().cloned().collect();
        let count = rows.len();
        if count == 0 {
            return 0;
        }
        if let Some(callback) = self.options.on_bulk_edit.as_mut() {
            callback(rows);
        }
        count
    }

    /// Replaces rows with updated copies, matched by id. Unknown ids are
    /// ignored.
    pub fn replace_rows(&mut self, updated: Vec<T>) -> usize {
        let mut replaced = 0;
        for row in updated {
            let id = row.id();
            if let Some(slot) = self.rows.iter_mut().find(|r| r.id() == id) {
                *slot = row;
                replaced += 1;
            }
        }
        replaced
    }

    /// Appends a row and highlights it.
    pub fn push_row(&mut self, row: T, now: Instant) {
        self.state.highlight(row.id(), now);
        self.rows.push(row);
    }

    #[must_use]
    pub fn highlighted_id(&self, now: Instant) -> Option<&str> {
        self.state.highlighted_id(now)
    }

    /// Expires the highlight; returns whether a redraw is needed.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.state.tick(now)
    }

    // Cursor

    #[must_use]
    pub fn cursor_row(&self) -> Option<T> {
        let index = self.view.state.selected()?;
        self.page_rows().get(index).map(|row| (*row).clone())
    }

    pub fn next_row(&mut self) {
        let count = self.page_rows().len();
        if count == 0 {
            return;
        }
        let index = self.view.state.selected().map_or(0, |i| (i + 1) % count);
        self.view.state.select(Some(index));
    }

    pub fn previous_row(&mut self) {
        let count = self.page_rows().len();
        if count == 0 {
            return;
        }
        let index = self
            .view
            .state
            .selected()
            .map_or(0, |i| if i == 0 { count - 1 } else { i - 1 });
        self.view.state.select(Some(index));
    }

    pub fn first_row(&mut self) {
        self.view.state.select(Some(0));
    }

    pub fn last_row(&mut self) {
        let count = self.page_rows().len();
        self.view.state.select(Some(count.saturating_sub(1)));
    }

    pub fn next_column(&mut self) {
        let count = self.visible_columns().len();
        if self.view.column_cursor + 1 < count {
            self.view.column_cursor += 1;
        }
    }

    pub const fn previous_column(&mut self) {
        self.view.column_cursor = self.view.column_cursor.saturating_sub(1);
    }

    #[must_use]
    pub fn focused_column(&self) -> Option<&ColumnDef<T>> {
        self.visible_columns().get(self.view.column_cursor).copied()
    }

    /// Toggles the row under the cursor in the selection.
    pub fn toggle_cursor_selection(&mut self) {
        if let Some(row) = self.cursor_row() {
            self.state.toggle_selected(&row.id());
        }
    }

    pub fn sort_focused_column(&mut self) -> Option<SortKey> {
        let id = self.focused_column()?.id.clone();
        self.toggle_sort(&id)
    }

    // Rendering

    /// Renders the page, the header and the pager footer.
    pub fn render(&mut self, area: Rect, buf: &mut Buffer, now: Instant) {
        let [table_area, footer_area] =
            Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(area);

        let processed = self.processed_rows();
        let total_rows = processed.len();
        let (page_index, total_pages) = self.page_position(total_rows);
        let page_rows = self.slice_page(processed);
        let columns = self.visible_columns();
        let highlighted = self.state.highlighted_id(now);
        let sort = self.state.sort();

        let (
            cursor_row_style,
            cursor_col_style,
            cursor_cell_style,
            highlight_symbol,
            highlight_spacing,
        ) = create_table_styles();

        let header = std::iter::once(Cell::from(" "))
            .chain(columns.iter().map(|column| {
                let indicator = sort
                    .filter(|key| key.column_id == column.id)
                    .map_or("", |key| key.direction.indicator());
                Cell::from(format!("{}{indicator}", column.header))
            }))
            .collect::<Row>()
            .style(Style::default().add_modifier(Modifier::BOLD))
            .height(1);

        let rows: Vec<Row> = page_rows
            .iter()
            .map(|row| {
                let id = row.id();
                let selected = self.state.is_selected(&id);
                let checkbox = if selected { "[x]" } else { "[ ]" };
                let mut style = Style::default();
                if selected {
                    style = style.add_modifier(Modifier::BOLD);
                }
                if highlighted == Some(id.as_str()) {
                    style = style.fg(Color::Black).bg(Color::Green);
                }
                std::iter::once(Cell::from(checkbox))
                    .chain(columns.iter().map(|c| Cell::from(c.render_cell(row))))
                    .collect::<Row>()
                    .style(style)
                    .height(1)
            })
            .collect();

        let constraints: Vec<Constraint> = std::iter::once(Constraint::Length(CHECKBOX_WIDTH))
            .chain(columns.iter().map(|column| {
                Constraint::Length(column_width(column, &page_rows, sort))
            }))
            .collect();

        let table = Table::new(rows, constraints)
            .header(header)
            .block(Block::bordered().border_type(BorderType::Rounded))
            .row_highlight_style(cursor_row_style)
            .column_highlight_style(cursor_col_style)
            .cell_highlight_style(cursor_cell_style)
            .highlight_symbol(highlight_symbol)
            .highlight_spacing(highlight_spacing);

        let pager = Pager {
            labels: page_labels(page_index, total_pages),
            current_page: page_index + 1,
            page_size: self.page_size(),
            total_rows,
            selected: self.selection_count(),
            pending: self.removals.pending_count(),
        };

        let row_count = page_rows.len();
        let column_cursor = self.view.column_cursor;
        if row_count == 0 {
            self.view.state.select(None);
        } else {
            let index = self.view.state.selected().unwrap_or(0).min(row_count - 1);
            self.view.state.select(Some(index));
        }
        self.view.state.select_column(Some(column_cursor + 1));

        StatefulWidget::render(table, table_area, buf, &mut self.view.state);
        pager.render(footer_area, buf);

        if row_count == 0 {
            let empty = Line::from(Span::styled(
                "No matching records",
                Style::default().fg(Color::DarkGray),
            ));
            let inner = Rect {
                x: table_area.x + 2,
                y: table_area.y + 2,
                width: table_area.width.saturating_sub(4),
                height: 1,
            };
            if inner.y < table_area.bottom() {
                empty.render(inner, buf);
            }
        }
    }
}

fn column_width<T: TableData>(column: &ColumnDef<T>, rows: &[&T], sort: Option<&SortKey>) -> u16 {
    if let Some(width) = column.width {
        return width;
    }
    let indicator = u16::from(sort.is_some_and(|key| key.column_id == column.id));
    let header =
        to_u16(UnicodeWidthStr::width(column.header.as_str())).saturating_add(indicator);
    rows.iter()
        .map(|row| {
            column
                .render_cell(row)
                .lines()
                .map(|line| to_u16(UnicodeWidthStr::width(line)))
                .max()
                .unwrap_or(0)
        })
        .fold(header, u16::max)
        .min(MAX_COLUMN_WIDTH)
        .saturating_add(1)
}

fn to_u16(width: usize) -> u16 {
    u16::try_from(width).unwrap_or(u16::MAX)
}

// Helper function to create table styles
fn create_table_styles() -> (Style, Style, Style, Text<'static>, HighlightSpacing) {
    let cursor_row_style = Style::default()
        .add_modifier(Modifier::REVERSED | Modifier::BOLD)
        .fg(Color::Black)
        .bg(Color::Yellow);
    let cursor_col_style = Style::default().fg(Color::Cyan);
    let cursor_cell_style = Style::default()
        .add_modifier(Modifier::REVERSED)
        .fg(Color::Magenta);
    let bar: &'static str = " █ ";
    let highlight_symbol = Text::from(vec![bar.into()]);
    (
        cursor_row_style,
        cursor_col_style,
        cursor_cell_style,
        highlight_symbol,
        HighlightSpacing::Always,
    )
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{Arc, Mutex},
        time::Duration,
    };

    use pretty_assertions::assert_eq;
    use ratatui::{Terminal, backend::TestBackend};
    use serde_json::json;
    use staffgrid_db::{JsonRow, MemoryPreferenceStore};

    use super::*;
    use crate::filter::ALL;

    fn people() -> Vec<JsonRow> {
        vec![
            JsonRow::new(json!({ "id": 1, "name": "Ann", "dept": "HR", "salary": 300 })),
            JsonRow::new(json!({ "id": 2, "name": "Ben", "dept": "IT", "salary": 1000 })),
            JsonRow::new(json!({ "id": 3, "name": "Cid", "dept": "HR", "salary": 50 })),
        ]
    }

    fn columns() -> Vec<ColumnDef<JsonRow>> {
        vec![
            ColumnDef::field("name", "Name").not_hideable(),
            ColumnDef::field("dept", "Dept"),
            ColumnDef::field("salary", "Salary"),
            ColumnDef::display("actions", "", |_| "…".to_string()),
        ]
    }

    fn numbered(count: usize) -> Vec<JsonRow> {
        (1..=count)
            .map(|i| JsonRow::new(json!({ "id": i, "name": format!("row {i}") })))
            .collect()
    }

    fn ids(rows: &[&JsonRow]) -> Vec<String> {
        rows.iter().map(|r| r.id()).collect()
    }

    #[test]
    fn test_search_then_filter() {
        let mut table = DataTable::new(
            people(),
            columns(),
            TableOptions::new().search_fields(vec![SearchField::new("name", "Name")]),
        );
        table.set_search("an");
        assert_eq!(ids(&table.processed_rows()), vec!["1"]);

        table.set_filter("dept", "HR");
        assert_eq!(ids(&table.processed_rows()), vec!["1"]);

        table.set_filter("dept", ALL);
        table.set_search("");
        assert_eq!(table.processed_rows().len(), 3);
    }

    #[test]
    fn test_sort_uses_numeric_order_and_ignores_display_columns() {
        let mut table = DataTable::new(people(), columns(), TableOptions::new());
        assert_eq!(
            table.toggle_sort("salary"),
            Some(SortKey::new("salary", SortDirection::Ascending))
        );
        assert_eq!(ids(&table.processed_rows()), vec!["3", "1", "2"]);

        table.toggle_sort("salary");
        assert_eq!(ids(&table.processed_rows()), vec!["2", "1", "3"]);

        assert_eq!(table.toggle_sort("actions"), None);
        assert_eq!(table.sorting().map(|k| k.column_id.as_str()), Some("salary"));
    }

    #[test]
    fn test_default_sort_applies_on_construction() {
        let table = DataTable::new(
            people(),
            columns(),
            TableOptions::new().default_sort("name", SortDirection::Descending),
        );
        assert_eq!(ids(&table.processed_rows()), vec!["3", "2", "1"]);
    }

    #[test]
    fn test_paging_and_clamping() {
        let mut table = DataTable::new(numbered(23), columns(), TableOptions::new());
        assert_eq!(table.total_pages(), 3);

        table.set_page(2);
        assert_eq!(table.page_rows().len(), 3);
        table.next_page();
        assert_eq!(table.effective_page_index(), 2);
        table.previous_page();
        assert_eq!(table.effective_page_index(), 1);

        let mut table = DataTable::new(
            numbered(23),
            columns(),
            TableOptions::new()
                .search_fields(vec![SearchField::new("name", "Name")])
                .page_size(5),
        );
        table.set_page(4);
        table.set_search("row 1");
        // 11 matches over 3 pages; the stored index 4 is clamped on read.
        assert_eq!(table.view_state().pagination.page_index, 4);
        assert_eq!(table.effective_page_index(), 2);
        assert_eq!(ids(&table.page_rows()), vec!["19"]);
    }

    #[test]
    fn test_page_size_change_keeps_top_row_in_view() {
        let mut table = DataTable::new(numbered(60), columns(), TableOptions::new());
        table.set_page(3);
        assert_eq!(table.page_rows().first().map(|r| r.id()).as_deref(), Some("31"));

        assert!(table.set_page_size(20));
        assert_eq!(table.effective_page_index(), 1);
        assert!(ids(&table.page_rows()).contains(&"31".to_string()));

        assert!(!table.set_page_size(15));
        table.cycle_page_size(true);
        assert_eq!(table.page_size(), 50);
        table.cycle_page_size(true);
        assert_eq!(table.page_size(), 50);
    }

    #[test]
    fn test_invalid_initial_page_size_falls_back() {
        let table = DataTable::new(numbered(3), columns(), TableOptions::new().page_size(7));
        assert_eq!(table.page_size(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_page_reset_option() {
        let mut table = DataTable::new(
            numbered(30),
            columns(),
            TableOptions::new().page_reset(PageReset::FirstPage),
        );
        table.set_page(2);
        table.set_filter("dept", ALL);
        assert_eq!(table.effective_page_index(), 0);
    }

    #[test]
    fn test_cascading_reset_clears_dependent_filter() {
        let changes = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&changes);
        let mut table = DataTable::new(
            people(),
            columns(),
            TableOptions::new()
                .reset_filter_key("department")
                .on_filter_change(move |key, value| {
                    seen.lock().unwrap().push(format!("{key}={value}"));
                }),
        );

        table.set_filter("employeeId", "E-1");
        table.set_filter("department", "dept-1");
        assert_eq!(table.filter_value("employeeId"), Some("E-1"));

        table.set_filter("department", "dept-1");
        assert_eq!(table.filter_value("employeeId"), Some("E-1"));

        table.set_filter("department", "dept-2");
        assert_eq!(table.filter_value("employeeId"), None);

        assert_eq!(
            *changes.lock().unwrap(),
            vec!["employeeId=E-1", "department=dept-1", "department=dept-1", "department=dept-2"]
        );
    }

    #[test]
    fn test_sync_reset_value_counts_as_first_observation() {
        let mut table = DataTable::new(
            people(),
            columns(),
            TableOptions::new().reset_filter_key("department"),
        );
        table.sync_reset_value("dept-1");
        table.set_filter("employeeId", "E-1");
        table.sync_reset_value("dept-1");
        assert_eq!(table.filter_value("employeeId"), Some("E-1"));
        table.sync_reset_value("dept-2");
        assert_eq!(table.filter_value("employeeId"), None);
    }

    #[test]
    fn test_set_filter_options_replaces_dropdown() {
        let mut table = DataTable::new(
            people(),
            columns(),
            TableOptions::new().filters(vec![FilterConfig::new("employeeId", "Employee", vec![])]),
        );
        table.set_filter_options("employeeId", vec![FilterOption::new("E-1", "Ann")]);
        assert_eq!(table.filters().first().map(|f| f.options.len()), Some(1));
    }

    #[test]
    fn test_delete_removes_rows_and_clears_selection() {
        let deleted = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&deleted);
        let mut table = DataTable::new(
            numbered(5),
            columns(),
            TableOptions::new().on_multi_delete(move |ticket, ids| {
                sink.lock().unwrap().push((ticket, ids));
            }),
        );
        table.select("1");
        table.select("3");
        table.select("5");

        let removal = table.delete_selected().unwrap();
        assert_eq!(ids(&table.processed_rows()), vec!["2", "4"]);
        assert_eq!(table.selection_count(), 0);
        assert_eq!(table.pending_removals(), 3);
        assert_eq!(
            *deleted.lock().unwrap(),
            vec![(removal.ticket, vec!["1".to_string(), "3".to_string(), "5".to_string()])]
        );

        assert!(table.resolve_removal(removal.ticket, Err("locked".to_string())));
        assert_eq!(table.processed_rows().len(), 5);
        assert_eq!(table.take_removal_error().as_deref(), Some("locked"));
        assert_eq!(table.pending_removals(), 0);
    }

    #[test]
    fn test_committed_removal_cannot_be_restored() {
        let mut table = DataTable::new(numbered(3), columns(), TableOptions::new());
        table.select("2");
        let removal = table.delete_selected().unwrap();
        assert!(table.resolve_removal(removal.ticket, Ok(())));
        assert!(!table.resolve_removal(removal.ticket, Err("late".to_string())));
        assert_eq!(table.rows().len(), 2);
        assert!(table.removal_error().is_none());
    }

    #[test]
    fn test_overlapping_failed_deletes_keep_insertion_order() {
        let mut table = DataTable::new(numbered(4), columns(), TableOptions::new());
        table.select("2");
        let first = table.delete_selected().unwrap();
        table.select("3");
        let second = table.delete_selected().unwrap();
        assert_eq!(ids(&table.processed_rows()), vec!["1", "4"]);

        assert!(table.resolve_removal(first.ticket, Err("busy".to_string())));
        assert!(table.resolve_removal(second.ticket, Err("busy".to_string())));
        assert_eq!(ids(&table.processed_rows()), vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn test_delete_without_selection_does_nothing() {
        let mut table = DataTable::new(numbered(3), columns(), TableOptions::new());
        assert!(table.delete_selected().is_none());
        assert_eq!(table.rows().len(), 3);
    }

    #[test]
    fn test_bulk_edit_and_replace_rows() {
        let edited = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&edited);
        let mut table = DataTable::new(
            people(),
            columns(),
            TableOptions::new().on_bulk_edit(move |rows: Vec<JsonRow>| {
                sink.lock().unwrap().extend(rows.iter().map(TableData::id));
            }),
        );
        table.select("3");
        table.select("1");
        assert_eq!(table.bulk_edit_selected(), 2);
        assert_eq!(*edited.lock().unwrap(), vec!["1", "3"]);
        assert_eq!(table.selection_count(), 2);

        let replaced = table.replace_rows(vec![
            JsonRow::new(json!({ "id": 1, "name": "Ann", "dept": "Finance" })),
            JsonRow::new(json!({ "id": 99, "name": "Nobody" })),
        ]);
        assert_eq!(replaced, 1);
        assert_eq!(
            table.rows().first().and_then(|r| r.field("dept")).as_deref(),
            Some("Finance")
        );
    }

    #[test]
    fn test_toggle_page_selection() {
        let mut table = DataTable::new(numbered(12), columns(), TableOptions::new().page_size(5));
        table.toggle_page_selection();
        assert_eq!(table.selection_count(), 5);
        table.next_page();
        table.toggle_page_selection();
        assert_eq!(table.selection_count(), 10);
        table.toggle_page_selection();
        assert_eq!(table.selection_count(), 5);
    }

    #[test]
    fn test_selection_survives_filtering() {
        let mut table = DataTable::new(people(), columns(), TableOptions::new());
        table.select("2");
        table.set_filter("dept", "HR");
        assert!(table.is_selected("2"));
        assert!(table.selected_rows().iter().any(|r| r.id() == "2"));
    }

    #[test]
    fn test_column_visibility_is_persisted_per_table() {
        let store = Arc::new(MemoryPreferenceStore::new());
        let options = || {
            TableOptions::new()
                .table_id("people")
                .preferences(store.clone())
        };
        let mut table = DataTable::new(people(), columns(), options());
        assert!(!table.toggle_column_visibility("name", false));
        assert!(table.toggle_column_visibility("dept", false));
        assert_eq!(table.visible_columns().len(), 3);

        let remounted = DataTable::new(people(), columns(), options());
        assert!(!remounted.is_column_visible("dept"));
        assert!(remounted.is_column_visible("name"));
    }

    #[test]
    fn test_push_row_highlights_for_ten_seconds() {
        let mut table = DataTable::new(people(), columns(), TableOptions::new());
        let now = Instant::now();
        table.push_row(JsonRow::new(json!({ "id": 4, "name": "Dee" })), now);
        assert_eq!(table.highlighted_id(now), Some("4"));
        assert!(!table.tick(now + Duration::from_secs(5)));
        assert!(table.tick(now + Duration::from_secs(10)));
        assert_eq!(table.highlighted_id(now + Duration::from_secs(10)), None);
    }

    #[test]
    fn test_new_item_id_is_highlighted() {
        let table = DataTable::new(people(), columns(), TableOptions::new().new_item_id("2"));
        assert_eq!(table.highlighted_id(Instant::now()), Some("2"));
    }

    #[test]
    fn test_cursor_navigation_and_focused_sort() {
        let mut table = DataTable::new(people(), columns(), TableOptions::new());
        table.next_row();
        assert_eq!(table.cursor_row().map(|r| r.id()).as_deref(), Some("2"));
        table.previous_row();
        table.previous_row();
        assert_eq!(table.cursor_row().map(|r| r.id()).as_deref(), Some("3"));

        table.toggle_cursor_selection();
        assert!(table.is_selected("3"));

        table.next_column();
        assert_eq!(table.focused_column().map(|c| c.id.as_str()), Some("dept"));
        assert_eq!(
            table.sort_focused_column(),
            Some(SortKey::new("dept", SortDirection::Ascending))
        );
    }

    #[test]
    fn test_render_shows_headers_and_pager() {
        let mut table = DataTable::new(people(), columns(), TableOptions::new());
        table.toggle_sort("name");
        table.select("1");
        let mut terminal = Terminal::new(TestBackend::new(80, 10)).unwrap();
        terminal
            .draw(|frame| table.render(frame.area(), frame.buffer_mut(), Instant::now()))
            .unwrap();

        let content: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect();
        assert!(content.contains("Name▲"));
        assert!(content.contains("[x]"));
        assert!(content.contains("Ann"));
        assert!(content.contains("1 selected"));
    }

    #[test]
    fn test_render_clamps_page_after_search_shrinks_rows() {
        let mut table = DataTable::new(
            numbered(25),
            columns(),
            TableOptions::new().search_fields(vec![SearchField::new("name", "Name")]),
        );
        table.set_page(2);
        table.set_search("row 1");
        let mut terminal = Terminal::new(TestBackend::new(80, 16)).unwrap();
        terminal
            .draw(|frame| table.render(frame.area(), frame.buffer_mut(), Instant::now()))
            .unwrap();

        let content: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect();
        assert!(content.contains("11 rows"));
        assert!(content.contains("row 19"));
        assert!(!content.contains("row 10"));
        assert_eq!(table.effective_page_index(), 1);
    }
}
