//! Filter and column menus: pickers built from a table and the events they
//! feed back into it.

use staffgrid_db::TableData;

use crate::{
    filter::ALL,
    widgets::{
        modal::ModalEvent,
        picker::{Picker, PickerItem, PickerKind},
        table::DataTable,
    },
};

/// Lists the table's filters with their current values.
#[must_use]
pub fn filter_key_picker<T: TableData + Clone>(table: &DataTable<T>) -> Picker {
    let items = table
        .filters()
        .iter()
        .map(|filter| {
            let current = table.filter_value(&filter.key).unwrap_or(ALL);
            PickerItem::new(
                filter.key.clone(),
                format!("{}: {}", filter.label, filter.label_for(current)),
            )
        })
        .collect();
    Picker::new(PickerKind::FilterKey, "Filters", items)
}

/// Lists the options of one filter, led by "All".
#[must_use]
pub fn filter_value_picker<T: TableData + Clone>(
    table: &DataTable<T>,
    key: &str,
) -> Option<Picker> {
    let filter = table.filters().iter().find(|f| f.key == key)?;
    let items = std::iter::once(PickerItem::new(ALL, "All"))
        .chain(
            filter
                .options
                .iter()
                .map(|o| PickerItem::new(o.value.clone(), o.label.clone())),
        )
        .collect();
    let current = table.filter_value(key).unwrap_or(ALL);
    Some(
        Picker::new(
            PickerKind::FilterValue(key.to_string()),
            filter.label.clone(),
            items,
        )
        .with_cursor_on(current),
    )
}

/// Checkbox list of the hideable columns.
#[must_use]
pub fn column_picker<T: TableData + Clone>(table: &DataTable<T>) -> Picker {
    let items = table
        .columns()
        .iter()
        .filter(|c| c.hideable)
        .map(|c| {
            let label = if c.header.is_empty() { c.id.clone() } else { c.header.clone() };
            PickerItem::checkbox(c.id.clone(), label, table.is_column_visible(&c.id))
        })
        .collect();
    Picker::new(PickerKind::Columns, "Columns", items)
}

/// What the host should do after a menu event was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuOutcome {
    /// Not a filter or column menu event.
    Unhandled,
    Applied,
    /// Open this picker next.
    Open(Picker),
}

/// Applies a filter or column menu event to `table`.
pub fn apply_menu_event<T: TableData + Clone>(
    table: &mut DataTable<T>,
    event: &ModalEvent,
) -> MenuOutcome {
    match event {
        ModalEvent::Picked {
            kind: PickerKind::FilterKey,
            value,
        } => filter_value_picker(table, value)
            .map_or(MenuOutcome::Applied, MenuOutcome::Open),
        ModalEvent::Picked {
            kind: PickerKind::FilterValue(key),
            value,
        } => {
            table.set_filter(key, value);
            MenuOutcome::Applied
        }
        ModalEvent::Toggled {
            kind: PickerKind::Columns,
            value,
            checked,
        } => {
            table.toggle_column_visibility(value, *checked);
            MenuOutcome::Applied
        }
        _ => MenuOutcome::Unhandled,
    }
}
