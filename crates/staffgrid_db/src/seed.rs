//! Deterministic sample data used to populate an empty record store.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::records::{Employee, LeaveRequest, Loan, PayrollEntry};

/// (department, sub-departments)
pub const DEPARTMENTS: [(&str, [&str; 2]); 4] = [
    ("Human Resources", ["Recruitment", "Benefits"]),
    ("Finance", ["Payroll", "Accounts"]),
    ("Engineering", ["Platform", "Mobile"]),
    ("Sales", ["Inside Sales", "Field Sales"]),
];

const NAMES: [&str; 16] = [
    "Alice Smith",
    "Bob Johnson",
    "Charlie Brown",
    "Diana Prince",
    "Ethan Hunt",
    "Fiona Gallagher",
    "George Bailey",
    "Hannah Abbott",
    "Ian Malcolm",
    "Julia Child",
    "Kevin Flynn",
    "Laura Palmer",
    "Michael Scott",
    "Nina Simone",
    "Oscar Wilde",
    "Pam Beesly",
];

pub const DESIGNATIONS: [&str; 4] = ["Associate", "Specialist", "Lead", "Manager"];

const LEAVE_TYPES: [&str; 3] = ["Annual", "Sick", "Unpaid"];

fn seeded_id(namespace: u128, index: usize) -> String {
    Uuid::from_u128((namespace << 64) | index as u128).to_string()
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

#[must_use]
pub fn employees() -> Vec<Employee> {
    NAMES
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let (department, subs) =
                DEPARTMENTS.get(i % DEPARTMENTS.len()).copied().unwrap_or((
                    "Unassigned",
                    ["", ""],
                ));
            let sub_department =
                subs.get((i / DEPARTMENTS.len()) % 2).map(ToString::to_string);
            let status = match i % 7 {
                5 => "On Leave",
                6 => "Inactive",
                _ => "Active",
            };
            let email = format!(
                "{}@example.com",
                name.to_lowercase().replace(' ', ".")
            );
            let salary_steps = i64::try_from(i % 5).unwrap_or_default();

            Employee {
                id: seeded_id(1, i),
                employee_code: format!("EMP-{:03}", i + 1),
                name: (*name).to_string(),
                email,
                department: department.to_string(),
                sub_department,
                designation: DESIGNATIONS
                    .get(i % DESIGNATIONS.len())
                    .copied()
                    .unwrap_or_default()
                    .to_string(),
                status: status.to_string(),
                join_date: date(2019 + (i % 6) as i32, 1 + (i % 12) as u32, 1),
                basic_salary: Decimal::new(300_000 + salary_steps * 45_000, 2),
            }
        })
        .collect()
}

#[must_use]
pub fn leave_requests(employees: &[Employee]) -> Vec<LeaveRequest> {
    employees
        .iter()
        .enumerate()
        .flat_map(|(i, employee)| {
            (0..2).map(move |n| {
                let index = i * 2 + n;
                let start = date(2026, 1 + (index % 9) as u32, 3)
                    .checked_add_days(Days::new((index % 5) as u64))
                    .unwrap_or_default();
                let end = start
                    .checked_add_days(Days::new((index % 4) as u64))
                    .unwrap_or(start);
                let status = match index % 3 {
                    0 => "Approved",
                    1 => "Pending",
                    _ => "Rejected",
                };
                LeaveRequest {
                    id: seeded_id(2, index),
                    employee_id: employee.id.clone(),
                    employee_name: employee.name.clone(),
                    department: employee.department.clone(),
                    leave_type: LEAVE_TYPES
                        .get(index % LEAVE_TYPES.len())
                        .copied()
                        .unwrap_or_default()
                        .to_string(),
                    start_date: start,
                    end_date: end,
                    status: status.to_string(),
                }
            })
        })
        .collect()
}

#[must_use]
pub fn loans(employees: &[Employee]) -> Vec<Loan> {
    employees
        .iter()
        .enumerate()
        .filter(|(i, _)| i % 3 == 0)
        .map(|(i, employee)| {
            let steps = i64::try_from(i).unwrap_or_default();
            let amount = Decimal::new(500_000 + steps * 25_000, 2);
            let installment = Decimal::new(25_000, 2);
            let paid = installment * Decimal::from(steps % 6);
            let status = if paid >= amount { "Settled" } else { "Active" };
            Loan {
                id: seeded_id(3, i),
                employee_id: employee.id.clone(),
                employee_name: employee.name.clone(),
                department: employee.department.clone(),
                amount,
                installment,
                paid,
                status: status.to_string(),
            }
        })
        .collect()
}

#[must_use]
pub fn payroll(employees: &[Employee], month: &str) -> Vec<PayrollEntry> {
    employees
        .iter()
        .enumerate()
        .map(|(i, employee)| {
            let steps = i64::try_from(i % 4).unwrap_or_default();
            let basic = employee.basic_salary;
            let tax = (basic * Decimal::new(12, 2)).round_dp(2);
            PayrollEntry {
                id: seeded_id(4, i),
                employee_id: employee.id.clone(),
                employee_name: employee.name.clone(),
                department: employee.department.clone(),
                month: month.to_string(),
                basic,
                allowances: Decimal::new(20_000 + steps * 5_000, 2),
                overtime: Decimal::new(steps * 3_750, 2),
                bonus: if i % 5 == 0 {
                    Decimal::new(50_000, 2)
                } else {
                    Decimal::ZERO
                },
                deductions: Decimal::new(2_500 * steps, 2),
                tax,
                status: "Draft".to_string(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::TableData;

    #[test]
    fn test_seeded_ids_are_unique_and_stable() {
        let first = employees();
        let second = employees();
        assert_eq!(first, second);

        let ids: HashSet<_> = first.iter().map(TableData::id).collect();
        assert_eq!(ids.len(), first.len());
    }

    #[test]
    fn test_dependent_records_reference_employees() {
        let staff = employees();
        let ids: HashSet<_> = staff.iter().map(|e| e.id.clone()).collect();

        assert!(leave_requests(&staff).iter().all(|l| ids.contains(&l.employee_id)));
        assert!(loans(&staff).iter().all(|l| ids.contains(&l.employee_id)));
        assert_eq!(payroll(&staff, "2026-09").len(), staff.len());
    }
}
