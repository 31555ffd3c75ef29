use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;
use serde_json::json;
use staffgrid_db::{JsonRow, MemoryPreferenceStore, PreferenceStore, TableData};
use staffgrid_ui::{
    ALL, ColumnDef, DataTable, FilterConfig, FilterOption, PageReset, RemovalTicket, SearchField,
    TableOptions,
};

fn people() -> Vec<JsonRow> {
    vec![
        JsonRow::new(json!({ "id": 1, "name": "Ann", "dept": "HR" })),
        JsonRow::new(json!({ "id": 2, "name": "Ben", "dept": "IT" })),
        JsonRow::new(json!({ "id": 3, "name": "Cid", "dept": "HR" })),
    ]
}

fn columns() -> Vec<ColumnDef<JsonRow>> {
    vec![
        ColumnDef::field("name", "Name").not_hideable(),
        ColumnDef::field("dept", "Dept"),
    ]
}

fn dept_filter() -> FilterConfig {
    FilterConfig::new(
        "dept",
        "Department",
        vec![FilterOption::new("HR", "HR"), FilterOption::new("IT", "IT")],
    )
}

fn visible_ids(table: &DataTable<JsonRow>) -> Vec<String> {
    table.page_rows().iter().map(|r| r.id()).collect()
}

#[test]
fn test_search_and_filter_narrow_together() {
    let mut table = DataTable::new(
        people(),
        columns(),
        TableOptions::new()
            .search_fields(vec![SearchField::new("name", "Name")])
            .filters(vec![dept_filter()]),
    );

    table.set_search("an");
    assert_eq!(visible_ids(&table), vec!["1"]);

    table.set_filter("dept", "HR");
    assert_eq!(visible_ids(&table), vec!["1"]);

    table.set_search("");
    assert_eq!(visible_ids(&table), vec!["1", "3"]);

    table.set_filter("dept", ALL);
    assert_eq!(visible_ids(&table), vec!["1", "2", "3"]);
}

#[test]
fn test_column_visibility_survives_a_new_table() {
    let store: Arc<dyn PreferenceStore> = Arc::new(MemoryPreferenceStore::new());

    let mut first = DataTable::new(
        people(),
        columns(),
        TableOptions::new()
            .table_id("employees")
            .preferences(Arc::clone(&store)),
    );
    assert!(first.toggle_column_visibility("dept", false));
    assert!(!first.toggle_column_visibility("name", false));

    let second = DataTable::new(
        people(),
        columns(),
        TableOptions::new()
            .table_id("employees")
            .preferences(Arc::clone(&store)),
    );
    assert!(!second.is_column_visible("dept"));
    assert!(second.is_column_visible("name"));

    let other = DataTable::new(
        people(),
        columns(),
        TableOptions::new()
            .table_id("loans")
            .preferences(Arc::clone(&store)),
    );
    assert!(other.is_column_visible("dept"));
}

#[test]
fn test_changing_department_clears_employee_filter() {
    let changes = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&changes);
    let mut table = DataTable::new(
        vec![
            JsonRow::new(json!({ "id": "a", "department": "HR", "employeeId": "e1" })),
            JsonRow::new(json!({ "id": "b", "department": "IT", "employeeId": "e2" })),
        ],
        vec![ColumnDef::field("department", "Department")],
        TableOptions::new()
            .filters(vec![
                FilterConfig::new("department", "Department", vec![]),
                FilterConfig::new("employeeId", "Employee", vec![]),
            ])
            .reset_filter_key("department")
            .on_filter_change(move |key, value| {
                if let Ok(mut changes) = seen.lock() {
                    changes.push(format!("{key}={value}"));
                }
            }),
    );

    table.set_filter("department", "HR");
    table.set_filter("employeeId", "e1");
    assert_eq!(visible_ids(&table), vec!["a"]);

    table.set_filter("department", "HR");
    assert_eq!(table.filter_value("employeeId"), Some("e1"));

    table.set_filter("department", "IT");
    assert_eq!(table.filter_value("employeeId"), None);
    assert_eq!(visible_ids(&table), vec!["b"]);

    let changes = changes.lock().map(|c| c.clone()).unwrap_or_default();
    assert_eq!(
        changes,
        vec!["department=HR", "employeeId=e1", "department=HR", "department=IT"]
    );
}

#[test]
fn test_failed_delete_restores_rows() {
    let requested: Arc<Mutex<Vec<(RemovalTicket, Vec<String>)>>> = Arc::default();
    let sink = Arc::clone(&requested);
    let mut table = DataTable::new(
        people(),
        columns(),
        TableOptions::new().on_multi_delete(move |ticket, ids| {
            if let Ok(mut requested) = sink.lock() {
                requested.push((ticket, ids));
            }
        }),
    );

    table.select("1");
    table.select("3");
    let removal = table.delete_selected().expect("rows were selected");
    assert_eq!(removal.len(), 2);
    assert_eq!(visible_ids(&table), vec!["2"]);
    assert_eq!(table.selection_count(), 0);

    let calls = requested.lock().map(|r| r.clone()).unwrap_or_default();
    assert_eq!(calls, vec![(removal.ticket, vec!["1".to_string(), "3".to_string()])]);

    assert!(table.resolve_removal(removal.ticket, Err("database is locked".into())));
    assert_eq!(visible_ids(&table), vec!["1", "2", "3"]);
    assert_eq!(table.take_removal_error().as_deref(), Some("database is locked"));
    assert_eq!(table.pending_removals(), 0);
}

#[test]
fn test_successful_delete_is_final() {
    let mut table = DataTable::new(people(), columns(), TableOptions::new());
    table.select("2");
    let removal = table.delete_selected().expect("row was selected");

    assert!(table.resolve_removal(removal.ticket, Ok(())));
    assert!(!table.resolve_removal(removal.ticket, Err("late".into())));
    assert_eq!(visible_ids(&table), vec!["1", "3"]);
    assert!(table.delete_selected().is_none());
}

#[test]
fn test_page_reset_choice() {
    let rows: Vec<JsonRow> = (1..=12)
        .map(|i| JsonRow::new(json!({ "id": i, "name": format!("n{i}"), "dept": "HR" })))
        .collect();

    let mut keep = DataTable::new(
        rows.clone(),
        columns(),
        TableOptions::new().page_size(5).filters(vec![dept_filter()]),
    );
    keep.set_page(2);
    keep.set_filter("dept", "HR");
    assert_eq!(keep.effective_page_index(), 2);

    let mut reset = DataTable::new(
        rows,
        columns(),
        TableOptions::new()
            .page_size(5)
            .filters(vec![dept_filter()])
            .page_reset(PageReset::FirstPage),
    );
    reset.set_page(2);
    reset.set_filter("dept", "HR");
    assert_eq!(reset.effective_page_index(), 0);
}

#[test]
fn test_invalid_page_size_falls_back() {
    let table = DataTable::new(people(), columns(), TableOptions::new().page_size(7));
    assert_eq!(table.page_size(), 10);
}
