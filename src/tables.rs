//! Column, search and filter definitions of the four record tables.

use std::{collections::BTreeSet, sync::Arc};

use log::debug;
use rust_decimal::Decimal;
use staffgrid_db::{
    Employee, LeaveRequest, Loan, PayrollEntry, PreferenceStore, Record, TableData,
    seed::DEPARTMENTS,
};
use staffgrid_ui::{
    ALL, ColumnDef, DataTable, FilterConfig, FilterOption, SearchField, SortDirection,
    TableOptions,
};
use tokio::sync::mpsc::UnboundedSender;

use crate::{
    app_state::{AppMessage, Tab},
    config::Settings,
    services::RecordService,
};

/// Everything table callbacks need to reach the store and the event loop.
#[derive(Clone)]
pub struct TableContext {
    pub settings: Settings,
    pub preferences: Arc<dyn PreferenceStore>,
    pub service: RecordService,
    pub tx: UnboundedSender<AppMessage>,
}

fn money(value: Decimal) -> String {
    format!("{value:.2}")
}

fn status_filter<T: Record>() -> FilterConfig {
    FilterConfig::new(
        "status",
        "Status",
        T::statuses()
            .iter()
            .map(|s| FilterOption::new(*s, *s))
            .collect(),
    )
}

fn department_filter() -> FilterConfig {
    FilterConfig::new(
        "department",
        "Department",
        DEPARTMENTS
            .iter()
            .map(|(name, _)| FilterOption::new(*name, *name))
            .collect(),
    )
}

/// Distinct values of `key` across `rows`, as options.
fn distinct_options<T: TableData>(rows: &[T], key: &str) -> Vec<FilterOption> {
    rows.iter()
        .filter_map(|row| row.field(key))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(|value| FilterOption::new(value.clone(), value))
        .collect()
}

/// Options shared by every tab: identity, paging and the store callbacks.
fn base_options<T: Record>(tab: Tab, ctx: &TableContext) -> TableOptions<T> {
    let service = ctx.service.clone();
    let delete_tx = ctx.tx.clone();
    let edit_tx = ctx.tx.clone();

    TableOptions::new()
        .table_id(format!("{}-table", T::KIND))
        .page_size(ctx.settings.default_page_size)
        .page_reset(ctx.settings.page_reset())
        .preferences(Arc::clone(&ctx.preferences))
        .on_multi_delete(move |ticket, ids| {
            let service = service.clone();
            let tx = delete_tx.clone();
            tokio::spawn(async move {
                let result = service
                    .delete(T::KIND, ids)
                    .await
                    .map_err(|e| e.to_string());
                if tx.send(AppMessage::Removed { tab, ticket, result }).is_err() {
                    debug!("event loop closed before removal {ticket} finished");
                }
            });
        })
        .on_bulk_edit(move |rows: Vec<T>| {
            let ids = rows.iter().map(TableData::id).collect();
            if edit_tx.send(AppMessage::BulkEditRequested { tab, ids }).is_err() {
                debug!("event loop closed before bulk edit was requested");
            }
        })
}

pub fn employees(rows: Vec<Employee>, ctx: &TableContext) -> DataTable<Employee> {
    let filter_tx = ctx.tx.clone();
    let (sub_departments, people) = employee_filter_options(&rows, None, None);
    let options = base_options(Tab::Employees, ctx)
        .search_fields(vec![
            SearchField::new("name", "name"),
            SearchField::new("email", "email"),
            SearchField::new("employeeCode", "code"),
        ])
        .filters(vec![
            department_filter(),
            FilterConfig::new("subDepartment", "Sub-department", sub_departments),
            FilterConfig::new("employeeId", "Employee", people),
            status_filter::<Employee>(),
        ])
        .reset_filter_key("department")
        .default_sort("name", SortDirection::Ascending)
        .on_filter_change(move |key, value| {
            let message = AppMessage::FilterChanged {
                tab: Tab::Employees,
                key: key.to_string(),
                value: value.to_string(),
            };
            if filter_tx.send(message).is_err() {
                debug!("event loop closed before {key} filter change was seen");
            }
        });

    let columns = vec![
        ColumnDef::field("employeeCode", "Code").not_hideable().width(8),
        ColumnDef::field("name", "Name").not_hideable(),
        ColumnDef::field("email", "Email"),
        ColumnDef::field("department", "Department"),
        ColumnDef::field("subDepartment", "Sub-department"),
        ColumnDef::field("designation", "Designation"),
        ColumnDef::field("status", "Status"),
        ColumnDef::field("joinDate", "Joined").width(10),
        ColumnDef::field("basicSalary", "Basic").cell(|e: &Employee| money(e.basic_salary)),
    ];

    DataTable::new(rows, columns, options)
}

/// Sub-department and employee options narrowed by the upstream selections.
///
/// `None` and [`ALL`] both leave a level unconstrained.
#[must_use]
pub fn employee_filter_options(
    rows: &[Employee],
    department: Option<&str>,
    sub_department: Option<&str>,
) -> (Vec<FilterOption>, Vec<FilterOption>) {
    fn chosen(value: Option<&str>) -> Option<&str> {
        value.filter(|v| !v.is_empty() && *v != ALL)
    }
    let department = chosen(department);
    let sub_department = chosen(sub_department);

    let in_department: Vec<Employee> = rows
        .iter()
        .filter(|e| department.is_none_or(|d| e.department == d))
        .cloned()
        .collect();
    let subs = distinct_options(&in_department, "subDepartment");

    let people = in_department
        .iter()
        .filter(|e| sub_department.is_none_or(|s| e.sub_department.as_deref() == Some(s)))
        .map(|e| FilterOption::new(e.id.clone(), e.name.clone()))
        .collect();

    (subs, people)
}

pub fn leave(rows: Vec<LeaveRequest>, ctx: &TableContext) -> DataTable<LeaveRequest> {
    let leave_types = distinct_options(&rows, "leaveType");
    let options = base_options(Tab::Leave, ctx)
        .search_fields(vec![
            SearchField::new("employeeName", "employee"),
            SearchField::new("leaveType", "type"),
        ])
        .filters(vec![
            department_filter(),
            FilterConfig::new("leaveType", "Type", leave_types),
            status_filter::<LeaveRequest>(),
        ])
        .default_sort("startDate", SortDirection::Descending);

    let columns = vec![
        ColumnDef::field("employeeName", "Employee").not_hideable(),
        ColumnDef::field("department", "Department"),
        ColumnDef::field("leaveType", "Type"),
        ColumnDef::field("startDate", "From").width(10),
        ColumnDef::field("endDate", "To").width(10),
        ColumnDef::field("days", "Days").width(4),
        ColumnDef::field("status", "Status"),
    ];

    DataTable::new(rows, columns, options)
}

pub fn loans(rows: Vec<Loan>, ctx: &TableContext) -> DataTable<Loan> {
    let options = base_options(Tab::Loans, ctx)
        .search_fields(vec![SearchField::new("employeeName", "employee")])
        .filters(vec![department_filter(), status_filter::<Loan>()])
        .default_sort("remaining", SortDirection::Descending);

    let columns = vec![
        ColumnDef::field("employeeName", "Employee").not_hideable(),
        ColumnDef::field("department", "Department"),
        ColumnDef::field("amount", "Amount").cell(|l: &Loan| money(l.amount)),
        ColumnDef::field("installment", "Installment").cell(|l: &Loan| money(l.installment)),
        ColumnDef::field("paid", "Paid").cell(|l: &Loan| money(l.paid)),
        ColumnDef::field("remaining", "Remaining").cell(|l: &Loan| money(l.remaining())),
        ColumnDef::computed("repaid", "Repaid %", |l: &Loan| {
            (!l.amount.is_zero())
                .then(|| (l.paid * Decimal::ONE_HUNDRED / l.amount).round_dp(0).to_string())
        })
        .width(8),
        ColumnDef::field("status", "Status"),
    ];

    DataTable::new(rows, columns, options)
}

pub fn payroll(rows: Vec<PayrollEntry>, ctx: &TableContext) -> DataTable<PayrollEntry> {
    let months = distinct_options(&rows, "month");
    let options = base_options(Tab::Payroll, ctx)
        .search_fields(vec![SearchField::new("employeeName", "employee")])
        .filters(vec![
            department_filter(),
            FilterConfig::new("month", "Month", months),
            status_filter::<PayrollEntry>(),
        ])
        .default_sort("employeeName", SortDirection::Ascending);

    let amount = |id: &'static str, header: &'static str| {
        ColumnDef::field(id, header).cell(move |p: &PayrollEntry| {
            p.field(id)
                .and_then(|v| v.parse::<Decimal>().ok())
                .map(money)
                .unwrap_or_default()
        })
    };

    let columns = vec![
        ColumnDef::field("employeeName", "Employee").not_hideable(),
        ColumnDef::field("department", "Department"),
        ColumnDef::field("month", "Month").width(7),
        amount("basic", "Basic"),
        amount("allowances", "Allowances"),
        amount("overtime", "Overtime"),
        amount("bonus", "Bonus"),
        amount("deductions", "Deductions"),
        amount("tax", "Tax"),
        amount("netPay", "Net pay").not_hideable(),
        ColumnDef::field("status", "Status"),
    ];

    DataTable::new(rows, columns, options)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use staffgrid_db::{MemoryPreferenceStore, RecordStore, seed};
    use tokio::sync::mpsc;

    use super::*;

    fn context(dir: &tempfile::TempDir) -> (TableContext, mpsc::UnboundedReceiver<AppMessage>) {
        let store = RecordStore::open(dir.path().join("records.db")).unwrap();
        let (tx, rx) = mpsc::unbounded_channel();
        let ctx = TableContext {
            settings: Settings::default(),
            preferences: Arc::new(MemoryPreferenceStore::new()),
            service: RecordService::new(store),
            tx,
        };
        (ctx, rx)
    }

    #[test]
    fn test_callbacks_report_to_event_loop() {
        let dir = tempfile::tempdir().unwrap();
        let (ctx, mut rx) = context(&dir);
        let mut table = employees(seed::employees(), &ctx);

        table.set_filter("department", "Finance");
        let Ok(AppMessage::FilterChanged { tab, key, value }) = rx.try_recv() else {
            panic!("expected a filter change");
        };
        assert_eq!((tab, key.as_str(), value.as_str()), (Tab::Employees, "department", "Finance"));

        let id = table.rows().first().map(TableData::id).unwrap();
        table.select(&id);
        assert_eq!(table.bulk_edit_selected(), 1);
        let Ok(AppMessage::BulkEditRequested { ids, .. }) = rx.try_recv() else {
            panic!("expected a bulk edit request");
        };
        assert_eq!(ids, vec![id]);
    }

    #[test]
    fn test_callbacks_survive_closed_event_loop() {
        let dir = tempfile::tempdir().unwrap();
        let (ctx, rx) = context(&dir);
        drop(rx);
        let mut table = employees(seed::employees(), &ctx);

        table.set_filter("department", "Sales");
        let id = table.rows().first().map(TableData::id).unwrap();
        table.select(&id);
        assert_eq!(table.bulk_edit_selected(), 1);
        assert_eq!(table.filter_value("department"), Some("Sales"));
    }

    #[test]
    fn test_blank_selections_leave_levels_open() {
        let employees = seed::employees();
        let (subs, people) = employee_filter_options(&employees, Some(""), Some(ALL));
        assert_eq!(subs.len(), 8);
        assert_eq!(people.len(), employees.len());
    }

    #[test]
    fn test_employee_options_follow_department() {
        let employees = seed::employees();
        let (all_subs, everyone) = employee_filter_options(&employees, Some(ALL), None);
        assert_eq!(all_subs.len(), 8);
        assert_eq!(everyone.len(), employees.len());

        let (subs, people) = employee_filter_options(&employees, Some("Finance"), None);
        let sub_values: Vec<&str> = subs.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(sub_values, vec!["Accounts", "Payroll"]);
        assert!(
            people
                .iter()
                .all(|o| employees.iter().any(|e| e.id == o.value && e.department == "Finance"))
        );

        let (_, payroll_people) =
            employee_filter_options(&employees, Some("Finance"), Some("Payroll"));
        assert!(payroll_people.len() < people.len());
        assert!(!payroll_people.is_empty());
    }

    #[test]
    fn test_distinct_options_are_sorted_and_unique() {
        let leave = seed::leave_requests(&seed::employees());
        let types: Vec<String> = distinct_options(&leave, "leaveType")
            .into_iter()
            .map(|o| o.value)
            .collect();
        assert_eq!(types, vec!["Annual", "Sick", "Unpaid"]);
    }
}
