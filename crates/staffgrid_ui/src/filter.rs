//! Search and column-filter predicate.
//!
//! A row is visible when it matches the free-text search on at least one
//! configured field *and* every active filter.

use std::collections::BTreeMap;

use staffgrid_db::TableData;

use crate::column::ColumnDef;

/// Filter value meaning "no constraint".
pub const ALL: &str = "all";

/// A field searched by the free-text query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchField {
    pub accessor_key: String,
    pub label: String,
}

impl SearchField {
    pub fn new(accessor_key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            accessor_key: accessor_key.into(),
            label: label.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterOption {
    pub value: String,
    pub label: String,
}

impl FilterOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// How a filter value is compared with a row value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComparisonMode {
    /// Case-sensitive equality; for opaque identifiers.
    Exact,
    /// Case-insensitive equality; for labels.
    CaseInsensitive,
}

impl ComparisonMode {
    /// Mode inferred from the spelling of a filter key.
    ///
    /// Keys that look like identifiers compare exactly. This is a substring
    /// test on the name, so keys such as `validIdentity` also count as
    /// identifiers; set [`FilterConfig::comparison`] to override.
    #[must_use]
    pub fn infer(key: &str) -> Self {
        if key == "id" || key == "employeeId" || key.contains("Id") {
            Self::Exact
        } else {
            Self::CaseInsensitive
        }
    }

    #[must_use]
    pub fn matches(self, row_value: &str, filter_value: &str) -> bool {
        match self {
            Self::Exact => row_value == filter_value,
            Self::CaseInsensitive => {
                row_value.to_lowercase() == filter_value.to_lowercase()
            }
        }
    }
}

/// One filter control: a key and the values it can take.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterConfig {
    pub key: String,
    pub label: String,
    pub options: Vec<FilterOption>,
    pub comparison: Option<ComparisonMode>,
}

impl FilterConfig {
    pub fn new(
        key: impl Into<String>,
        label: impl Into<String>,
        options: Vec<FilterOption>,
    ) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            options,
            comparison: None,
        }
    }

    #[must_use]
    pub const fn comparison(mut self, mode: ComparisonMode) -> Self {
        self.comparison = Some(mode);
        self
    }

    #[must_use]
    pub fn mode(&self) -> ComparisonMode {
        self.comparison.unwrap_or_else(|| ComparisonMode::infer(&self.key))
    }

    /// Label of the option holding `value`, or the value itself.
    #[must_use]
    pub fn label_for<'a>(&'a self, value: &'a str) -> &'a str {
        if value == ALL {
            return "All";
        }
        self.options
            .iter()
            .find(|o| o.value == value)
            .map_or(value, |o| o.label.as_str())
    }
}

/// Reads `key` off a row: through the column answering to it first, then
/// straight from the row.
pub fn resolve_value<T: TableData>(
    row: &T,
    columns: &[ColumnDef<T>],
    key: &str,
) -> Option<String> {
    columns
        .iter()
        .find(|c| c.answers_to(key))
        .and_then(|c| c.value(row))
        .or_else(|| row.field(key))
}

/// Everything the visibility test needs, borrowed from the table.
pub struct Predicate<'a, T> {
    pub columns: &'a [ColumnDef<T>],
    pub search: &'a str,
    pub search_fields: &'a [SearchField],
    pub active_filters: &'a BTreeMap<String, String>,
    pub filters: &'a [FilterConfig],
}

impl<T: TableData> Predicate<'_, T> {
    #[must_use]
    pub fn matches(&self, row: &T) -> bool {
        self.matches_search(row) && self.matches_filters(row)
    }

    /// OR across search fields.
    #[must_use]
    pub fn matches_search(&self, row: &T) -> bool {
        if self.search.is_empty() || self.search_fields.is_empty() {
            return true;
        }

        let needle = self.search.to_lowercase();
        self.search_fields.iter().any(|field| {
            resolve_value(row, self.columns, &field.accessor_key)
                .unwrap_or_default()
                .to_lowercase()
                .contains(&needle)
        })
    }

    /// AND across active filter keys.
    #[must_use]
    pub fn matches_filters(&self, row: &T) -> bool {
        self.active_filters.iter().all(|(key, value)| {
            if value.is_empty() || value == ALL {
                return true;
            }

            let row_value = resolve_value(row, self.columns, key)
                .unwrap_or_default();
            let row_value = row_value.trim();
            let filter_value = value.trim();
            if row_value.is_empty() && filter_value.is_empty() {
                return true;
            }

            self.mode_for(key).matches(row_value, filter_value)
        })
    }

    fn mode_for(&self, key: &str) -> ComparisonMode {
        self.filters
            .iter()
            .find(|f| f.key == key)
            .map_or_else(|| ComparisonMode::infer(key), FilterConfig::mode)
    }
}
