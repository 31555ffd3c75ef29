//! HR record kinds shown by the application.
//!
//! Field keys follow the camelCase names the records are serialized with,
//! so a filter or search key can address both the typed field and the
//! stored JSON payload.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Record, TableData};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: String,
    pub employee_code: String,
    pub name: String,
    pub email: String,
    pub department: String,
    #[serde(default)]
    pub sub_department: Option<String>,
    pub designation: String,
    pub status: String,
    pub join_date: NaiveDate,
    pub basic_salary: Decimal,
}

impl TableData for Employee {
    fn title() -> &'static str {
        "Employees"
    }

    fn id(&self) -> String {
        self.id.clone()
    }

    fn field(&self, key: &str) -> Option<String> {
        match key {
            "id" | "employeeId" => Some(self.id.clone()),
            "employeeCode" => Some(self.employee_code.clone()),
            "name" => Some(self.name.clone()),
            "email" => Some(self.email.clone()),
            "department" => Some(self.department.clone()),
            "subDepartment" => self.sub_department.clone(),
            "designation" => Some(self.designation.clone()),
            "status" => Some(self.status.clone()),
            "joinDate" => Some(self.join_date.to_string()),
            "basicSalary" => Some(self.basic_salary.to_string()),
            _ => None,
        }
    }
}

impl Record for Employee {
    const KIND: &'static str = "employee";

    fn statuses() -> &'static [&'static str] {
        &["Active", "On Leave", "Inactive"]
    }

    fn status(&self) -> &str {
        &self.status
    }

    fn set_status(&mut self, status: &str) {
        status.clone_into(&mut self.status);
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequest {
    pub id: String,
    pub employee_id: String,
    pub employee_name: String,
    pub department: String,
    pub leave_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: String,
}

impl LeaveRequest {
    /// Calendar days covered, both ends inclusive.
    #[must_use]
    pub fn days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}

impl TableData for LeaveRequest {
    fn title() -> &'static str {
        "Leave Requests"
    }

    fn id(&self) -> String {
        self.id.clone()
    }

    fn field(&self, key: &str) -> Option<String> {
        match key {
            "id" => Some(self.id.clone()),
            "employeeId" => Some(self.employee_id.clone()),
            "employeeName" => Some(self.employee_name.clone()),
            "department" => Some(self.department.clone()),
            "leaveType" => Some(self.leave_type.clone()),
            "startDate" => Some(self.start_date.to_string()),
            "endDate" => Some(self.end_date.to_string()),
            "days" => Some(self.days().to_string()),
            "status" => Some(self.status.clone()),
            _ => None,
        }
    }
}

impl Record for LeaveRequest {
    const KIND: &'static str = "leave";

    fn statuses() -> &'static [&'static str] {
        &["Pending", "Approved", "Rejected"]
    }

    fn status(&self) -> &str {
        &self.status
    }

    fn set_status(&mut self, status: &str) {
        status.clone_into(&mut self.status);
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
    pub id: String,
    pub employee_id: String,
    pub employee_name: String,
    pub department: String,
    pub amount: Decimal,
    pub installment: Decimal,
    pub paid: Decimal,
    pub status: String,
}

impl Loan {
    #[must_use]
    pub fn remaining(&self) -> Decimal {
        (self.amount - self.paid).max(Decimal::ZERO)
    }
}

impl TableData for Loan {
    fn title() -> &'static str {
        "Loans"
    }

    fn id(&self) -> String {
        self.id.clone()
    }

    fn field(&self, key: &str) -> Option<String> {
        match key {
            "id" => Some(self.id.clone()),
            "employeeId" => Some(self.employee_id.clone()),
            "employeeName" => Some(self.employee_name.clone()),
            "department" => Some(self.department.clone()),
            "amount" => Some(self.amount.to_string()),
            "installment" => Some(self.installment.to_string()),
            "paid" => Some(self.paid.to_string()),
            "remaining" => Some(self.remaining().to_string()),
            "status" => Some(self.status.clone()),
            _ => None,
        }
    }
}

impl Record for Loan {
    const KIND: &'static str = "loan";

    fn statuses() -> &'static [&'static str] {
        &["Active", "Settled", "Defaulted"]
    }

    fn status(&self) -> &str {
        &self.status
    }

    fn set_status(&mut self, status: &str) {
        status.clone_into(&mut self.status);
    }
}

/// One employee's payroll line for a month.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollEntry {
    pub id: String,
    pub employee_id: String,
    pub employee_name: String,
    pub department: String,
    /// `YYYY-MM`
    pub month: String,
    pub basic: Decimal,
    pub allowances: Decimal,
    pub overtime: Decimal,
    pub bonus: Decimal,
    pub deductions: Decimal,
    pub tax: Decimal,
    pub status: String,
}

impl PayrollEntry {
    #[must_use]
    pub fn gross(&self) -> Decimal {
        self.basic + self.allowances + self.overtime + self.bonus
    }

    #[must_use]
    pub fn net_pay(&self) -> Decimal {
        self.gross() - self.deductions - self.tax
    }
}

impl TableData for PayrollEntry {
    fn title() -> &'static str {
        "Payroll"
    }

    fn id(&self) -> String {
        self.id.clone()
    }

    fn field(&self, key: &str) -> Option<String> {
        match key {
            "id" => Some(self.id.clone()),
            "employeeId" => Some(self.employee_id.clone()),
            "employeeName" => Some(self.employee_name.clone()),
            "department" => Some(self.department.clone()),
            "month" => Some(self.month.clone()),
            "basic" => Some(self.basic.to_string()),
            "allowances" => Some(self.allowances.to_string()),
            "overtime" => Some(self.overtime.to_string()),
            "bonus" => Some(self.bonus.to_string()),
            "deductions" => Some(self.deductions.to_string()),
            "tax" => Some(self.tax.to_string()),
            "gross" => Some(self.gross().to_string()),
            "netPay" => Some(self.net_pay().to_string()),
            "status" => Some(self.status.clone()),
            _ => None,
        }
    }
}

impl Record for PayrollEntry {
    const KIND: &'static str = "payroll";

    fn statuses() -> &'static [&'static str] {
        &["Draft", "Confirmed", "Paid"]
    }

    fn status(&self) -> &str {
        &self.status
    }

    fn set_status(&mut self, status: &str) {
        status.clone_into(&mut self.status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_net_pay_sums_earnings_and_subtracts_withholdings() {
        let entry = PayrollEntry {
            basic: Decimal::new(400_000, 2),
            allowances: Decimal::new(50_000, 2),
            overtime: Decimal::new(12_550, 2),
            bonus: Decimal::new(10_000, 2),
            deductions: Decimal::new(7_500, 2),
            tax: Decimal::new(45_000, 2),
            ..PayrollEntry::default()
        };

        assert_eq!(entry.gross(), Decimal::new(472_550, 2));
        assert_eq!(entry.net_pay(), Decimal::new(420_050, 2));
        assert_eq!(entry.field("netPay").as_deref(), Some("4200.50"));
    }

    #[test]
    fn test_unknown_fields_resolve_to_none() {
        let employee = Employee::default();
        assert_eq!(employee.field("salaryBand"), None);
        assert_eq!(employee.field("subDepartment"), None);
    }

    #[test]
    fn test_leave_days_are_inclusive() {
        let leave = LeaveRequest {
            start_date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 3, 4).unwrap(),
            ..LeaveRequest::default()
        };
        assert_eq!(leave.days(), 3);
    }

    #[test]
    fn test_records_serialize_camel_case() {
        let loan = Loan {
            employee_id: "e-1".to_string(),
            ..Loan::default()
        };
        let json = serde_json::to_value(&loan).unwrap();
        assert_eq!(json["employeeId"], "e-1");
    }
}
