//! Per-column show/hide state, optionally persisted per table identity.

use std::{collections::BTreeMap, sync::Arc};

use log::{debug, warn};
use serde_json::Value;
use staffgrid_db::PreferenceStore;

const KEY_PREFIX: &str = "table-column-visibility-";

/// Preference key under which a table's column visibility is stored.
#[must_use]
pub fn storage_key(table_id: &str) -> String {
    format!("{KEY_PREFIX}{table_id}")
}

/// Column visibility map. Columns absent from the map are visible.
///
/// With a table id and a store, every change after mounting writes the
/// whole map back under [`storage_key`]. Mounting itself only reads.
pub struct ColumnVisibility {
    columns: BTreeMap<String, bool>,
    table_id: Option<String>,
    store: Option<Arc<dyn PreferenceStore>>,
}

impl std::fmt::Debug for ColumnVisibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColumnVisibility")
            .field("columns", &self.columns)
            .field("table_id", &self.table_id)
            .field("persisted", &self.store.is_some())
            .finish()
    }
}

impl ColumnVisibility {
    /// Session-only visibility that is never persisted.
    #[must_use]
    pub const fn session() -> Self {
        Self {
            columns: BTreeMap::new(),
            table_id: None,
            store: None,
        }
    }

    /// Visibility for `table_id`, loaded from `store`.
    ///
    /// Missing, unreadable or malformed preferences leave every column
    /// visible.
    #[must_use]
    pub fn mount(
        table_id: Option<String>,
        store: Option<Arc<dyn PreferenceStore>>,
    ) -> Self {
        let mut visibility = Self {
            columns: BTreeMap::new(),
            table_id: None,
            store,
        };
        visibility.remount(table_id);
        visibility
    }

    /// Switch to another table identity and load its stored state.
    ///
    /// The in-memory map is replaced before anything can be written, so the
    /// previous table's state never lands under the new key.
    pub fn remount(&mut self, table_id: Option<String>) {
        self.columns = match (&table_id, &self.store) {
            (Some(id), Some(store)) => load(store.as_ref(), id),
            (Some(_) | None, None) | (None, Some(_)) => BTreeMap::new(),
        };
        self.table_id = table_id;
    }

    #[must_use]
    pub fn table_id(&self) -> Option<&str> {
        self.table_id.as_deref()
    }

    #[must_use]
    pub fn is_visible(&self, column_id: &str) -> bool {
        self.columns.get(column_id).copied().unwrap_or(true)
    }

    #[must_use]
    pub const fn as_map(&self) -> &BTreeMap<String, bool> {
        &self.columns
    }

    /// Set one column's visibility and persist the whole map.
    pub fn set(&mut self, column_id: &str, visible: bool) {
        self.columns.insert(column_id.to_string(), visible);
        self.persist();
    }

    fn persist(&self) {
        let (Some(id), Some(store)) = (&self.table_id, &self.store) else {
            return;
        };

        let key = storage_key(id);
        let value = Value::Object(
            self.columns
                .iter()
                .map(|(column, visible)| (column.clone(), Value::Bool(*visible)))
                .collect(),
        );
        match store.set(&key, value) {
            Ok(()) => debug!("saved column visibility under {key}"),
            Err(err) => warn!("failed to save column visibility under {key}: {err}"),
        }
    }
}

fn load(store: &dyn PreferenceStore, table_id: &str) -> BTreeMap<String, bool> {
    let key = storage_key(table_id);
    match store.get(&key) {
        Ok(Some(Value::Object(map))) => map
            .into_iter()
            .filter_map(|(column, visible)| visible.as_bool().map(|v| (column, v)))
            .collect(),
        Ok(None) => BTreeMap::new(),
        Ok(Some(other)) => {
            warn!("ignoring malformed column visibility under {key}: {other}");
            BTreeMap::new()
        }
        Err(err) => {
            warn!("failed to load column visibility under {key}: {err}");
            BTreeMap::new()
        }
    }
}
