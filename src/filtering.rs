use std::time::Instant;

use crossterm::event::KeyCode;
use ratatui::{buffer::Buffer, layout::Rect};
use staffgrid_db::{Employee, Record, TableData};
use staffgrid_ui::{
    ALL, DataTable, RemovalTicket, SearchField, SortKey, TableNavigationHandler,
    handlers::{MenuOutcome, apply_menu_event, column_picker, filter_key_picker},
    widgets::{modal::ModalEvent, picker::Picker},
};

use crate::{app::App, app_state::Tab, tables::employee_filter_options};

/// Object-safe view of a record table, so the app can drive whichever tab
/// is active without knowing its row type.
pub trait TableControls {
    fn search(&self) -> &str;
    fn set_search(&mut self, query: &str);
    fn search_fields(&self) -> &[SearchField];
    fn navigate(&mut self, key: KeyCode) -> bool;
    fn sort_focused_column(&mut self) -> Option<SortKey>;
    fn filter_menu(&self) -> Picker;
    fn column_menu(&self) -> Picker;
    fn apply_menu_event(&mut self, event: &ModalEvent) -> MenuOutcome;
    fn toggle_cursor_selection(&mut self);
    fn toggle_page_selection(&mut self);
    fn selection_count(&self) -> usize;
    /// Starts a bulk delete; returns how many rows left the table.
    fn delete_selected(&mut self) -> usize;
    fn resolve_removal(&mut self, ticket: RemovalTicket, outcome: Result<(), String>) -> bool;
    fn take_removal_error(&mut self) -> Option<String>;
    fn bulk_edit_selected(&mut self) -> usize;
    /// Sets `status` on the rows with these ids.
    fn apply_status(&mut self, ids: &[String], status: &str) -> usize;
    fn statuses(&self) -> &'static [&'static str];
    fn total_pages(&self) -> usize;
    fn set_page(&mut self, page_index: usize);
    /// Rows passing search and filters.
    fn visible_count(&self) -> usize;
    fn tick(&mut self, now: Instant) -> bool;
    fn render(&mut self, area: Rect, buf: &mut Buffer, now: Instant);
}

impl<T: Record> TableControls for DataTable<T> {
    fn search(&self) -> &str {
        Self::search(self)
    }

    fn set_search(&mut self, query: &str) {
        Self::set_search(self, query);
    }

    fn search_fields(&self) -> &[SearchField] {
        Self::search_fields(self)
    }

    fn navigate(&mut self, key: KeyCode) -> bool {
        TableNavigationHandler::navigate_table(self, key)
    }

    fn sort_focused_column(&mut self) -> Option<SortKey> {
        Self::sort_focused_column(self)
    }

    fn filter_menu(&self) -> Picker {
        filter_key_picker(self)
    }

    fn column_menu(&self) -> Picker {
        column_picker(self)
    }

    fn apply_menu_event(&mut self, event: &ModalEvent) -> MenuOutcome {
        apply_menu_event(self, event)
    }

    fn toggle_cursor_selection(&mut self) {
        Self::toggle_cursor_selection(self);
    }

    fn toggle_page_selection(&mut self) {
        Self::toggle_page_selection(self);
    }

    fn selection_count(&self) -> usize {
        Self::selection_count(self)
    }

    fn delete_selected(&mut self) -> usize {
        Self::delete_selected(self).map_or(0, |removal| removal.len())
    }

    fn resolve_removal(&mut self, ticket: RemovalTicket, outcome: Result<(), String>) -> bool {
        Self::resolve_removal(self, ticket, outcome)
    }

    fn take_removal_error(&mut self) -> Option<String> {
        Self::take_removal_error(self)
    }

    fn bulk_edit_selected(&mut self) -> usize {
        Self::bulk_edit_selected(self)
    }

    fn apply_status(&mut self, ids: &[String], status: &str) -> usize {
        let updated: Vec<T> = self
            .rows()
            .iter()
            .filter(|row| ids.contains(&row.id()))
            .cloned()
            .map(|mut row| {
                row.set_status(status);
                row
            })
            .collect();
        self.replace_rows(updated)
    }

    fn statuses(&self) -> &'static [&'static str] {
        T::statuses()
    }

    fn total_pages(&self) -> usize {
        Self::total_pages(self)
    }

    fn set_page(&mut self, page_index: usize) {
        Self::set_page(self, page_index);
    }

    fn visible_count(&self) -> usize {
        self.processed_rows().len()
    }

    fn tick(&mut self, now: Instant) -> bool {
        Self::tick(self, now)
    }

    fn render(&mut self, area: Rect, buf: &mut Buffer, now: Instant) {
        Self::render(self, area, buf, now);
    }
}

impl App {
    /// The table on the active tab
    pub fn active_table(&mut self) -> &mut dyn TableControls {
        self.table_mut(self.active_tab)
    }

    pub fn table_mut(&mut self, tab: Tab) -> &mut dyn TableControls {
        match tab {
            Tab::Employees => &mut self.employees,
            Tab::Leave => &mut self.leave,
            Tab::Loans => &mut self.loans,
            Tab::Payroll => &mut self.payroll,
        }
    }

    pub fn table(&self, tab: Tab) -> &dyn TableControls {
        match tab {
            Tab::Employees => &self.employees,
            Tab::Leave => &self.leave,
            Tab::Loans => &self.loans,
            Tab::Payroll => &self.payroll,
        }
    }

    /// Apply the current search filter to the active table
    pub fn apply_filter(&mut self) {
        let query = self.search_filter.get_filter_query().to_string();
        self.active_table().set_search(&query);
    }

    /// Clear the search of the active table
    pub fn clear_filter(&mut self) {
        self.active_table().set_search("");
    }

    /// Narrows the sub-department and employee filters to the current
    /// department and sub-department.
    pub fn refresh_employee_filters(&mut self, changed_key: &str) {
        if changed_key != "department" && changed_key != "subDepartment" {
            return;
        }

        let department = self.employees.filter_value("department").map(str::to_string);
        let sub_department = self.employees.filter_value("subDepartment").map(str::to_string);
        let (subs, people) = employee_filter_options(
            self.employees.rows(),
            department.as_deref(),
            sub_department.as_deref(),
        );

        if let Some(sub) = sub_department.as_deref()
            && sub != ALL
            && !subs.iter().any(|o| o.value == sub)
        {
            self.employees.clear_filter("subDepartment");
        }
        self.employees.set_filter_options("subDepartment", subs);
        self.employees.set_filter_options("employeeId", people);
    }
}

/// Highest `EMP-nnn` code in use plus one.
#[must_use]
pub fn next_employee_code(employees: &[Employee]) -> String {
    let next = employees
        .iter()
        .filter_map(|e| e.employee_code.strip_prefix("EMP-")?.parse::<u32>().ok())
        .max()
        .unwrap_or(0)
        + 1;
    format!("EMP-{next:03}")
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;
    use staffgrid_db::{LeaveRequest, MemoryPreferenceStore, RecordStore, seed};
    use staffgrid_ui::{TableOptions, widgets::picker::PickerKind};
    use tokio::sync::mpsc;

    use super::*;
    use crate::{config::Settings, services::RecordService, tables};

    #[test]
    fn test_apply_status_replaces_matching_rows() {
        let leave = seed::leave_requests(&seed::employees());
        let ids: Vec<String> = leave.iter().take(2).map(TableData::id).collect();
        let mut table = DataTable::new(leave, Vec::new(), TableOptions::new());

        let controls: &mut dyn TableControls = &mut table;
        assert_eq!(controls.apply_status(&ids, "Rejected"), 2);
        assert_eq!(controls.statuses(), LeaveRequest::statuses());
        assert!(
            table
                .rows()
                .iter()
                .filter(|r| ids.contains(&r.id))
                .all(|r| r.status == "Rejected")
        );
    }

    #[test]
    fn test_filter_menu_through_trait_object() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::open(dir.path().join("records.db")).unwrap();
        let (tx, _rx) = mpsc::unbounded_channel();
        let ctx = tables::TableContext {
            settings: Settings::default(),
            preferences: Arc::new(MemoryPreferenceStore::new()),
            service: RecordService::new(store),
            tx,
        };
        let mut table = tables::loans(seed::loans(&seed::employees()), &ctx);
        let before = table.processed_rows().len();

        let controls: &mut dyn TableControls = &mut table;
        let picked = ModalEvent::Picked {
            kind: PickerKind::FilterValue("department".into()),
            value: "Finance".into(),
        };
        assert_eq!(controls.apply_menu_event(&picked), MenuOutcome::Applied);
        assert!(controls.visible_count() < before);
        assert_eq!(controls.filter_menu().items.len(), 2);
    }

    #[test]
    fn test_next_employee_code() {
        assert_eq!(next_employee_code(&seed::employees()), "EMP-017");
        assert_eq!(next_employee_code(&[]), "EMP-001");
    }
}
