use std::{cmp::Ordering, str::FromStr};

use rust_decimal::Decimal;
use staffgrid_db::TableData;

use crate::{
    column::ColumnDef,
    view_state::{SortDirection, SortKey},
};

/// Orders two cell values.
///
/// Values that both parse as decimals compare numerically, everything else
/// compares case-insensitively as text.
#[must_use]
pub fn compare_values(a: &str, b: &str) -> Ordering {
    match (parse_number(a), parse_number(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_) | None, None) | (None, Some(_)) => a
            .to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b)),
    }
}

fn parse_number(value: &str) -> Option<Decimal> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed).ok()
}

/// Stable sort of `rows` by the column named in `key`.
///
/// Rows without a value go last in either direction. Unknown or
/// non-sortable columns leave the order untouched.
pub fn sort_rows<T: TableData>(rows: &mut [&T], columns: &[ColumnDef<T>], key: &SortKey) {
    let Some(column) = columns
        .iter()
        .find(|c| c.id == key.column_id && c.can_sort())
    else {
        return;
    };

    let mut keyed: Vec<(Option<String>, &T)> =
        rows.iter().map(|row| (column.value(row), *row)).collect();
    keyed.sort_by(|(a, _), (b, _)| match (a, b) {
        (Some(a), Some(b)) => {
            let ordering = compare_values(a, b);
            match key.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    for (slot, (_, row)) in rows.iter_mut().zip(keyed) {
        *slot = row;
    }
}
