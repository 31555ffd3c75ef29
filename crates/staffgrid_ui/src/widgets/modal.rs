use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    prelude::{Alignment, Buffer, Constraint, Layout, Rect, Widget},
    style::{Color, Style},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::widgets::{
    buttons::Buttons,
    jump::{JumpAction, JumpToPage},
    picker::{Picker, PickerAction, PickerKind},
    text_input::TextInput,
};

/// Rectangle of `width` x `height` centred in `area`, clipped to it.
#[must_use]
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;
    Rect::new(x, y, width, height)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalAction {
    None,
    Save,
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Cycled with Left/Right.
    Choice(Vec<String>),
}

#[derive(Debug, Clone)]
pub struct ModalField {
    pub label: &'static str,
    pub input: TextInput,
    pub kind: FieldKind,
}

impl ModalField {
    #[must_use]
    pub fn text(label: &'static str) -> Self {
        Self {
            label,
            input: TextInput::new(),
            kind: FieldKind::Text,
        }
    }

    /// A field limited to `choices`, starting on the first one.
    #[must_use]
    pub fn choice(label: &'static str, choices: Vec<String>) -> Self {
        let first = choices.first().cloned().unwrap_or_default();
        Self {
            label,
            input: TextInput::with_text(first),
            kind: FieldKind::Choice(choices),
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.input.set_text(value);
        self
    }

    #[must_use]
    pub fn value(&self) -> &str {
        self.input.text().trim()
    }

    fn cycle(&mut self, forward: bool) {
        let FieldKind::Choice(choices) = &self.kind else {
            return;
        };
        if choices.is_empty() {
            return;
        }
        let current = choices
            .iter()
            .position(|c| c == self.input.text())
            .unwrap_or(0);
        let next = if forward {
            (current + 1) % choices.len()
        } else {
            (current + choices.len() - 1) % choices.len()
        };
        if let Some(choice) = choices.get(next) {
            let choice = choice.clone();
            self.input.set_text(choice);
        }
    }
}

/// A form of labelled fields with Save and Cancel buttons.
///
/// The cursor walks the fields and then the two buttons.
#[derive(Debug, Clone)]
pub struct FormModal {
    pub title: String,
    pub fields: Vec<ModalField>,
    pub current_field: usize,
    pub is_open: bool,
    /// Shown under the fields, e.g. a validation message from the host.
    pub error: Option<String>,
}

impl FormModal {
    #[must_use]
    pub fn new(title: impl Into<String>, fields: Vec<ModalField>) -> Self {
        Self {
            title: title.into(),
            fields,
            current_field: 0,
            is_open: true,
            error: None,
        }
    }

    pub const fn close(&mut self) {
        self.is_open = false;
    }

    #[must_use]
    pub fn value(&self, label: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.label == label)
            .map(ModalField::value)
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.fields.iter().all(|f| !f.value().is_empty())
    }

    const fn total_items(&self) -> usize {
        self.fields.len() + 2
    }

    /// Index of the focused button, if the cursor is past the fields.
    #[must_use]
    pub fn is_on_button(&self) -> Option<usize> {
        self.current_field.checked_sub(self.fields.len())
    }

    pub const fn next_field(&mut self) {
        if self.current_field + 1 < self.total_items() {
            self.current_field += 1;
        }
    }

    pub const fn prev_field(&mut self) {
        self.current_field = self.current_field.saturating_sub(1);
    }

    fn focused(&mut self) -> Option<&mut ModalField> {
        self.fields.get_mut(self.current_field)
    }

    fn submit(&mut self) -> ModalAction {
        if self.is_valid() {
            ModalAction::Save
        } else {
            self.error = Some("Every field is required".to_string());
            ModalAction::None
        }
    }

    pub fn handle_key_events(&mut self, key: KeyEvent) -> ModalAction {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc) => {
                self.close();
                ModalAction::Cancel
            }
            (_, KeyCode::BackTab | KeyCode::Up) => {
                self.prev_field();
                ModalAction::None
            }
            (_, KeyCode::Tab | KeyCode::Down) => {
                self.next_field();
                ModalAction::None
            }
            (_, KeyCode::Enter) => match self.is_on_button() {
                Some(1) => {
                    self.close();
                    ModalAction::Cancel
                }
                Some(_) | None => self.submit(),
            },
            (_, KeyCode::Left) => {
                match self.is_on_button() {
                    Some(_) => self.current_field = self.fields.len(),
                    None => {
                        if let Some(field) = self.focused() {
                            field.cycle(false);
                        }
                    }
                }
                ModalAction::None
            }
            (_, KeyCode::Right) => {
                match self.is_on_button() {
                    Some(_) => self.current_field = self.fields.len() + 1,
                    None => {
                        if let Some(field) = self.focused() {
                            field.cycle(true);
                        }
                    }
                }
                ModalAction::None
            }
            (_, KeyCode::Char(c)) => {
                if let Some(field) = self.focused()
                    && field.kind == FieldKind::Text
                {
                    field.input.add_char(c);
                }
                ModalAction::None
            }
            (_, KeyCode::Backspace) => {
                if let Some(field) = self.focused()
                    && field.kind == FieldKind::Text
                {
                    field.input.delete_char();
                }
                ModalAction::None
            }
            _ => ModalAction::None,
        }
    }
}

impl Widget for &FormModal {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if !self.is_open {
            return;
        }

        let rows = u16::try_from(self.fields.len()).unwrap_or(u16::MAX);
        let modal_area = centered(area, 56, rows.saturating_add(6));

        let block = Block::default()
            .title(self.title.as_str())
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Blue))
            .style(Style::default().bg(Color::Black));
        Clear.render(modal_area, buf);
        block.render(modal_area, buf);

        let [fields_area, error_area, buttons_area] = Layout::vertical([
            Constraint::Min(rows),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .margin(1)
        .areas(modal_area);

        let field_areas = Layout::vertical(self.fields.iter().map(|_| Constraint::Length(1)))
            .split(fields_area);
        for (i, (field, field_area)) in self.fields.iter().zip(field_areas.iter()).enumerate() {
            let value = match field.kind {
                FieldKind::Text => field.input.text().to_string(),
                FieldKind::Choice(_) => format!("‹ {} ›", field.input.text()),
            };
            let style = if i == self.current_field {
                Style::default().fg(Color::Yellow).bg(Color::DarkGray)
            } else {
                Style::default().fg(Color::White)
            };
            Paragraph::new(format!("{:<14} {value}", format!("{}:", field.label)))
                .style(style)
                .render(*field_area, buf);
        }

        if let Some(error) = &self.error {
            Paragraph::new(error.as_str())
                .style(Style::default().fg(Color::Red))
                .alignment(Alignment::Center)
                .render(error_area, buf);
        }

        Buttons {
            buttons: vec!["Save", "Cancel"],
            selected: self.is_on_button().unwrap_or(usize::MAX),
        }
        .render(buttons_area, buf);
    }
}

#[derive(Default, Debug, Clone)]
pub struct ConfirmationModal {
    pub is_open: bool,
    pub selected_button: usize,
    pub title: String,
    pub message: String,
}

impl ConfirmationModal {
    #[must_use]
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            is_open: true,
            selected_button: 0,
            title: title.into(),
            message: message.into(),
        }
    }

    pub const fn close(&mut self) {
        self.is_open = false;
    }

    pub const fn toggle_button(&mut self) {
        self.selected_button = (self.selected_button + 1) % 2;
    }

    #[must_use]
    pub const fn confirm(&self) -> bool {
        self.selected_button == 0
    }

    /// Enter answers with the selected button, `y`/`n` answer directly.
    pub fn handle_key_events(&mut self, key: KeyEvent) -> ModalAction {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('n')) => {
                self.close();
                ModalAction::Cancel
            }
            (_, KeyCode::Char('y')) => {
                self.close();
                ModalAction::Save
            }
            (_, KeyCode::Enter) => {
                self.close();
                if self.confirm() {
                    ModalAction::Save
                } else {
                    ModalAction::Cancel
                }
            }
            (_, KeyCode::Left | KeyCode::Right | KeyCode::Tab) => {
                self.toggle_button();
                ModalAction::None
            }
            _ => ModalAction::None,
        }
    }
}

impl Widget for &ConfirmationModal {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if !self.is_open {
            return;
        }

        let modal_area = centered(area, 50, 8);
        let block = Block::default()
            .title(self.title.as_str())
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red))
            .style(Style::default().bg(Color::Black));
        Clear.render(modal_area, buf);
        block.render(modal_area, buf);

        let [message_area, buttons_area] =
            Layout::vertical([Constraint::Length(3), Constraint::Length(1)])
                .margin(1)
                .areas(modal_area);

        Paragraph::new(self.message.as_str())
            .style(Style::default().fg(Color::White))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(message_area, buf);

        Buttons {
            buttons: vec!["Yes", "No"],
            selected: self.selected_button,
        }
        .render(buttons_area, buf);
    }
}

/// Outcome of a key press routed to the open modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalEvent {
    None,
    Closed,
    Confirmed,
    FormSaved,
    Picked { kind: PickerKind, value: String },
    Toggled { kind: PickerKind, value: String, checked: bool },
    Jump(usize),
}

#[derive(Debug, Clone)]
enum ActiveModal {
    Form(FormModal),
    Confirmation(ConfirmationModal),
    Picker(Picker),
    Jump(JumpToPage),
}

/// Holds the single modal shown over the tables, if any
#[derive(Default, Debug)]
pub struct ModalManager {
    active: Option<ActiveModal>,
}

impl ModalManager {
    #[must_use]
    pub const fn new() -> Self {
        Self { active: None }
    }

    #[must_use]
    pub const fn is_any_modal_open(&self) -> bool {
        self.active.is_some()
    }

    pub fn open_form(&mut self, form: FormModal) {
        self.active = Some(ActiveModal::Form(form));
    }

    pub fn open_confirmation(&mut self, title: impl Into<String>, message: impl Into<String>) {
        self.active = Some(ActiveModal::Confirmation(ConfirmationModal::new(title, message)));
    }

    pub fn open_picker(&mut self, picker: Picker) {
        self.active = Some(ActiveModal::Picker(picker));
    }

    pub fn open_jump(&mut self, total_pages: usize) {
        self.active = Some(ActiveModal::Jump(JumpToPage::new(total_pages)));
    }

    pub fn close_active_modal(&mut self) {
        self.active = None;
    }

    /// The open form, e.g. to read its values after [`ModalEvent::FormSaved`].
    #[must_use]
    pub const fn form(&self) -> Option<&FormModal> {
        match &self.active {
            Some(ActiveModal::Form(form)) => Some(form),
            Some(ActiveModal::Confirmation(_) | ActiveModal::Picker(_) | ActiveModal::Jump(_))
            | None => None,
        }
    }

    pub const fn form_mut(&mut self) -> Option<&mut FormModal> {
        match &mut self.active {
            Some(ActiveModal::Form(form)) => Some(form),
            Some(ActiveModal::Confirmation(_) | ActiveModal::Picker(_) | ActiveModal::Jump(_))
            | None => None,
        }
    }

    /// Routes a key to the open modal and drops it once it closes.
    ///
    /// A saved form stays open so the host can read or reject its values.
    pub fn handle_key_events(&mut self, key: KeyEvent) -> ModalEvent {
        let Some(active) = self.active.as_mut() else {
            return ModalEvent::None;
        };

        let (event, open) = match active {
            ActiveModal::Form(form) => {
                let event = match form.handle_key_events(key) {
                    ModalAction::Save => ModalEvent::FormSaved,
                    ModalAction::Cancel => ModalEvent::Closed,
                    ModalAction::None => ModalEvent::None,
                };
                (event, form.is_open)
            }
            ActiveModal::Confirmation(modal) => {
                let event = match modal.handle_key_events(key) {
                    ModalAction::Save => ModalEvent::Confirmed,
                    ModalAction::Cancel => ModalEvent::Closed,
                    ModalAction::None => ModalEvent::None,
                };
                (event, modal.is_open)
            }
            ActiveModal::Picker(picker) => {
                let event = match picker.handle_key_events(key) {
                    PickerAction::Choose(value) => ModalEvent::Picked {
                        kind: picker.kind.clone(),
                        value,
                    },
                    PickerAction::Toggle(value, checked) => ModalEvent::Toggled {
                        kind: picker.kind.clone(),
                        value,
                        checked,
                    },
                    PickerAction::Close => ModalEvent::Closed,
                    PickerAction::None => ModalEvent::None,
                };
                (event, picker.is_open)
            }
            ActiveModal::Jump(jump) => {
                let event = match jump.handle_key_events(key) {
                    JumpAction::Jump(page) => ModalEvent::Jump(page),
                    JumpAction::Cancel => ModalEvent::Closed,
                    JumpAction::None => ModalEvent::None,
                };
                (event, jump.is_open)
            }
        };

        if !open {
            self.active = None;
        }
        event
    }
}

impl Widget for &ModalManager {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match &self.active {
            Some(ActiveModal::Form(form)) => form.render(area, buf),
            Some(ActiveModal::Confirmation(modal)) => modal.render(area, buf),
            Some(ActiveModal::Picker(picker)) => picker.render(area, buf),
            Some(ActiveModal::Jump(jump)) => jump.render(area, buf),
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;

    use super::*;
    use crate::widgets::picker::PickerItem;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(form: &mut FormModal, text: &str) {
        for c in text.chars() {
            form.handle_key_events(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_form_requires_every_field() {
        let mut form = FormModal::new(
            "New Employee",
            vec![
                ModalField::text("Name"),
                ModalField::choice("Department", vec!["HR".into(), "IT".into()]),
            ],
        );
        assert_eq!(form.handle_key_events(key(KeyCode::Enter)), ModalAction::None);
        assert!(form.error.is_some());

        type_text(&mut form, "Dee");
        form.handle_key_events(key(KeyCode::Down));
        form.handle_key_events(key(KeyCode::Right));
        type_text(&mut form, "ignored");
        assert_eq!(form.value("Department"), Some("IT"));
        assert_eq!(form.handle_key_events(key(KeyCode::Enter)), ModalAction::Save);
        assert_eq!(form.value("Name"), Some("Dee"));
    }

    #[test]
    fn test_form_cancel_button() {
        let mut form = FormModal::new("Form", vec![ModalField::text("Name")]);
        form.handle_key_events(key(KeyCode::Tab));
        form.handle_key_events(key(KeyCode::Tab));
        assert_eq!(form.is_on_button(), Some(1));
        assert_eq!(form.handle_key_events(key(KeyCode::Enter)), ModalAction::Cancel);
        assert!(!form.is_open);
    }

    #[test]
    fn test_confirmation_answers() {
        let mut modal = ConfirmationModal::new("Delete", "Delete 3 rows?");
        modal.handle_key_events(key(KeyCode::Right));
        assert_eq!(modal.handle_key_events(key(KeyCode::Enter)), ModalAction::Cancel);

        let mut modal = ConfirmationModal::new("Delete", "Delete 3 rows?");
        assert_eq!(modal.handle_key_events(key(KeyCode::Char('y'))), ModalAction::Save);
        assert!(!modal.is_open);
    }

    #[test]
    fn test_manager_routes_and_drops_closed_modals() {
        let mut manager = ModalManager::new();
        assert_eq!(manager.handle_key_events(key(KeyCode::Enter)), ModalEvent::None);

        manager.open_confirmation("Delete", "Delete?");
        assert_eq!(manager.handle_key_events(key(KeyCode::Enter)), ModalEvent::Confirmed);
        assert!(!manager.is_any_modal_open());

        manager.open_picker(Picker::new(
            PickerKind::Status,
            "Status",
            vec![PickerItem::new("Active", "Active")],
        ));
        assert_eq!(
            manager.handle_key_events(key(KeyCode::Enter)),
            ModalEvent::Picked {
                kind: PickerKind::Status,
                value: "Active".into()
            }
        );
        assert!(!manager.is_any_modal_open());

        manager.open_jump(3);
        manager.handle_key_events(key(KeyCode::Char('3')));
        assert_eq!(manager.handle_key_events(key(KeyCode::Enter)), ModalEvent::Jump(2));
    }

    #[test]
    fn test_saved_form_stays_open_for_host() {
        let mut manager = ModalManager::new();
        manager.open_form(FormModal::new(
            "Form",
            vec![ModalField::text("Name").with_value("Ann")],
        ));
        assert_eq!(manager.handle_key_events(key(KeyCode::Enter)), ModalEvent::FormSaved);
        assert_eq!(manager.form().and_then(|f| f.value("Name")), Some("Ann"));
        manager.close_active_modal();
        assert!(manager.form().is_none());
    }

    #[test]
    fn test_centered_is_clipped() {
        let area = Rect::new(0, 0, 20, 10);
        assert_eq!(centered(area, 10, 4), Rect::new(5, 3, 10, 4));
        assert_eq!(centered(area, 40, 40), area);
    }
}
