pub mod error;
pub mod paths;
pub mod preferences;
pub mod records;
pub mod seed;
pub mod sqlite;

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

pub use error::StoreError;
pub use preferences::{MemoryPreferenceStore, PreferenceStore};
pub use records::{Employee, LeaveRequest, Loan, PayrollEntry};
pub use sqlite::{RecordStore, SqlitePreferenceStore};

/// A record that can be shown as one line of a table.
///
/// `field` must be total: unknown keys and missing values resolve to `None`,
/// never to a panic.
pub trait TableData {
    fn title() -> &'static str;
    fn id(&self) -> String;
    fn field(&self, key: &str) -> Option<String>;
}

/// A record kind that is persisted in the record store.
pub trait Record:
    TableData + Serialize + DeserializeOwned + Clone + Send + 'static
{
    /// Discriminator used as the `kind` column of the record store.
    const KIND: &'static str;

    /// Status values the kind moves between, in display order.
    fn statuses() -> &'static [&'static str];

    fn status(&self) -> &str;

    fn set_status(&mut self, status: &str);
}

/// A schemaless row backed by a JSON object.
///
/// Fields are addressed with dotted paths (`manager.name`, `items.0.code`).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct JsonRow(pub Value);

impl JsonRow {
    #[must_use]
    pub const fn new(value: Value) -> Self {
        Self(value)
    }
}

impl TableData for JsonRow {
    fn title() -> &'static str {
        "Rows"
    }

    fn id(&self) -> String {
        self.field("id").unwrap_or_default()
    }

    fn field(&self, key: &str) -> Option<String> {
        lookup_path(&self.0, key).and_then(value_to_string)
    }
}

/// Walks a dotted path through objects and arrays.
#[must_use]
pub fn lookup_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return None;
    }

    path.split('.').try_fold(value, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => {
            segment.parse::<usize>().ok().and_then(|i| items.get(i))
        }
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {
            None
        }
    })
}

/// String form of a JSON value; `null` has none.
#[must_use]
pub fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_json_row_resolves_nested_paths() {
        let row = JsonRow::new(json!({
            "id": 7,
            "manager": { "name": "Ann" },
            "items": [{ "code": "A1" }],
        }));

        assert_eq!(row.id(), "7");
        assert_eq!(row.field("manager.name").as_deref(), Some("Ann"));
        assert_eq!(row.field("items.0.code").as_deref(), Some("A1"));
    }

    #[test]
    fn test_json_row_missing_paths_are_none() {
        let row = JsonRow::new(json!({ "id": "x", "name": null }));

        assert_eq!(row.field("name"), None);
        assert_eq!(row.field("manager.name"), None);
        assert_eq!(row.field("id.deeper"), None);
        assert_eq!(row.field("items.nope"), None);
        assert_eq!(row.field(""), None);
    }
}
