use std::time::Instant;

use color_eyre::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::{debug, warn};
use staffgrid_db::seed::{DEPARTMENTS, DESIGNATIONS};
use staffgrid_ui::{
    handlers::{MenuOutcome, SearchInput, handle_search_filter_input},
    widgets::{
        modal::{FormModal, ModalEvent, ModalField},
        picker::{Picker, PickerItem, PickerKind},
    },
};

use crate::{
    app::{App, TICK_RATE},
    app_state::{AppMessage, Tab},
    filtering::next_employee_code,
    services::NewEmployee,
};

impl App {
    /// Waits up to one tick for a terminal event and handles it.
    pub fn handle_crossterm_events(&mut self) -> Result<()> {
        if !event::poll(TICK_RATE)? {
            return Ok(());
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
            Event::Key(_) => {} // Ignore non-press key events
            Event::FocusGained
            | Event::FocusLost
            | Event::Mouse(_)
            | Event::Paste(_)
            | Event::Resize(_, _) => {}
        }
        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    pub fn on_key_event(&mut self, key: KeyEvent) {
        if self.search_filter.is_active {
            match handle_search_filter_input(key, &mut self.search_filter) {
                SearchInput::Changed => self.apply_filter(),
                SearchInput::Cleared => self.clear_filter(),
                SearchInput::Applied | SearchInput::Moved | SearchInput::Ignored => {}
            }
            return;
        }

        if self.modal_manager.is_any_modal_open() {
            let event = self.modal_manager.handle_key_events(key);
            self.handle_modal_event(event);
            return;
        }

        match (key.modifiers, key.code) {
            (_, KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c' | 'C')) => self.quit(),
            (_, KeyCode::Tab) => self.switch_tab(self.active_tab.next()),
            (_, KeyCode::BackTab) => self.switch_tab(self.active_tab.previous()),
            (_, KeyCode::Char(c @ '1'..='4')) => {
                let tab = c
                    .to_digit(10)
                    .and_then(|d| usize::try_from(d).ok())
                    .and_then(|d| d.checked_sub(1))
                    .and_then(Tab::from_index);
                if let Some(tab) = tab {
                    self.switch_tab(tab);
                }
            }
            (_, KeyCode::Char('/')) => {
                let current = self.active_table().search().to_string();
                self.search_filter.activate(&current);
            }
            (_, KeyCode::Esc) => {
                self.search_filter.clear();
                self.clear_filter();
            }
            (_, KeyCode::Char('f')) => {
                let picker = self.active_table().filter_menu();
                if picker.items.is_empty() {
                    self.status_line.set_message("This table has no filters");
                } else {
                    self.modal_manager.open_picker(picker);
                }
            }
            (_, KeyCode::Char('c')) => {
                let picker = self.active_table().column_menu();
                self.modal_manager.open_picker(picker);
            }
            (_, KeyCode::Char('s')) => {
                if self.active_table().sort_focused_column().is_none() {
                    self.status_line.set_message("This column cannot be sorted");
                }
            }
            (_, KeyCode::Char(' ')) => self.active_table().toggle_cursor_selection(),
            (_, KeyCode::Char('a')) => self.active_table().toggle_page_selection(),
            (_, KeyCode::Char('D')) => {
                let count = self.active_table().selection_count();
                if count == 0 {
                    self.status_line.set_message("Select rows with space first");
                } else {
                    self.modal_manager.open_confirmation(
                        "Delete",
                        format!("Delete {count} selected row(s)?\n\nThis cannot be undone."),
                    );
                }
            }
            (_, KeyCode::Char('E')) => {
                if self.active_table().bulk_edit_selected() == 0 {
                    self.status_line.set_message("Select rows with space first");
                }
            }
            (_, KeyCode::Char('N')) => {
                if self.active_tab == Tab::Employees {
                    self.modal_manager.open_form(new_employee_form());
                } else {
                    self.status_line.set_message("New records can be added on the Employees tab");
                }
            }
            (_, KeyCode::Char('g')) => {
                let pages = self.active_table().total_pages();
                self.modal_manager.open_jump(pages);
            }
            (_, code) => {
                self.active_table().navigate(code);
            }
        }
    }

    /// Acts on what the open modal reported.
    pub fn handle_modal_event(&mut self, event: ModalEvent) {
        match event {
            ModalEvent::None => {}
            ModalEvent::Closed => self.pending_edit = None,
            ModalEvent::Confirmed => self.delete_selected(),
            ModalEvent::FormSaved => self.submit_new_employee(),
            ModalEvent::Jump(page) => self.active_table().set_page(page),
            ModalEvent::Picked {
                kind: PickerKind::Status,
                value,
            } => self.update_selected_status(value),
            event @ (ModalEvent::Picked { .. } | ModalEvent::Toggled { .. }) => {
                match self.active_table().apply_menu_event(&event) {
                    MenuOutcome::Open(picker) => self.modal_manager.open_picker(picker),
                    MenuOutcome::Applied | MenuOutcome::Unhandled => {}
                }
            }
        }
    }

    fn delete_selected(&mut self) {
        let count = self.active_table().delete_selected();
        self.status_line.set_message(format!("Deleting {count} row(s)..."));
    }

    fn update_selected_status(&mut self, status: String) {
        let Some((tab, ids)) = self.pending_edit.take() else {
            return;
        };
        let kind = tab.record_kind();
        let service = self.service.clone();
        let tx = self.tx.clone();
        self.status_line
            .set_message(format!("Setting {} row(s) to {status}...", ids.len()));

        tokio::spawn(async move {
            let result = service
                .update_status(kind, ids.clone(), status.clone())
                .await
                .map_err(|e| e.to_string());
            let message = AppMessage::StatusUpdated {
                tab,
                ids,
                status,
                result,
            };
            if tx.send(message).is_err() {
                debug!("event loop closed before the status update finished");
            }
        });
    }

    fn submit_new_employee(&mut self) {
        let Some(form) = self.modal_manager.form() else {
            return;
        };
        let value = |label: &str| form.value(label).unwrap_or_default().to_string();
        let draft = NewEmployee {
            name: value("Name"),
            email: value("Email"),
            department: value("Department"),
            sub_department: value("Sub-department"),
            designation: value("Designation"),
            basic_salary: value("Basic salary"),
        };

        match draft.into_employee(next_employee_code(self.employees.rows())) {
            Ok(employee) => {
                self.modal_manager.close_active_modal();
                let service = self.service.clone();
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let result = service.create(employee).await.map_err(|e| e.to_string());
                    if tx.send(AppMessage::EmployeeCreated(result)).is_err() {
                        debug!("event loop closed before the new employee was saved");
                    }
                });
            }
            Err(e) => {
                if let Some(form) = self.modal_manager.form_mut() {
                    form.error = Some(e.to_string());
                }
            }
        }
    }

    /// Applies one message from a table callback or a store task.
    pub fn on_message(&mut self, message: AppMessage) {
        match message {
            AppMessage::FilterChanged { tab, key, value } => {
                debug!("{} filter {key} changed to {value}", tab.title());
                if tab == Tab::Employees {
                    self.refresh_employee_filters(&key);
                }
            }
            AppMessage::BulkEditRequested { tab, ids } => {
                let statuses = self.table(tab).statuses();
                let picker = Picker::new(
                    PickerKind::Status,
                    format!("Set status of {} row(s)", ids.len()),
                    statuses.iter().map(|s| PickerItem::new(*s, *s)).collect(),
                );
                self.pending_edit = Some((tab, ids));
                self.modal_manager.open_picker(picker);
            }
            AppMessage::Removed { tab, ticket, result } => {
                let outcome = result.as_ref().map(|_| ()).map_err(Clone::clone);
                let table = self.table_mut(tab);
                if !table.resolve_removal(ticket, outcome) {
                    warn!("removal {ticket} on {} was already resolved", tab.title());
                    return;
                }
                match result {
                    Ok(count) => self.status_line.set_message(format!("Deleted {count} row(s)")),
                    Err(_) => {
                        let message = table.take_removal_error().unwrap_or_default();
                        self.status_line
                            .set_error(format!("Delete failed, rows restored: {message}"));
                    }
                }
            }
            AppMessage::StatusUpdated {
                tab,
                ids,
                status,
                result,
            } => match result {
                Ok(count) => {
                    self.table_mut(tab).apply_status(&ids, &status);
                    self.status_line
                        .set_message(format!("Set {count} row(s) to {status}"));
                }
                Err(e) => {
                    warn!("status update on {} failed: {e}", tab.title());
                    self.status_line.set_error(format!("Status update failed: {e}"));
                }
            },
            AppMessage::EmployeeCreated(result) => match result {
                Ok(employee) => {
                    self.status_line
                        .set_message(format!("Added {} ({})", employee.name, employee.employee_code));
                    self.employees.push_row(employee, Instant::now());
                    self.refresh_employee_filters("department");
                }
                Err(e) => {
                    warn!("creating employee failed: {e}");
                    self.status_line.set_error(format!("Could not add employee: {e}"));
                }
            },
        }
    }
}

fn new_employee_form() -> FormModal {
    let departments = DEPARTMENTS.iter().map(|(name, _)| (*name).to_string()).collect();
    let sub_departments = DEPARTMENTS
        .iter()
        .flat_map(|(_, subs)| subs.iter().map(|s| (*s).to_string()))
        .collect();
    FormModal::new(
        "New employee",
        vec![
            ModalField::text("Name"),
            ModalField::text("Email"),
            ModalField::choice("Department", departments),
            ModalField::choice("Sub-department", sub_departments),
            ModalField::choice(
                "Designation",
                DESIGNATIONS.iter().map(|d| (*d).to_string()).collect(),
            ),
            ModalField::text("Basic salary"),
        ],
    )
}
