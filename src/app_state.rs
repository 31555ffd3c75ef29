use staffgrid_db::{Employee, LeaveRequest, Loan, PayrollEntry, Record};
use staffgrid_ui::RemovalTicket;

/// Which record table is on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Employees,
    Leave,
    Loans,
    Payroll,
}

impl Tab {
    pub const ALL: [Self; 4] = [Self::Employees, Self::Leave, Self::Loans, Self::Payroll];

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Employees => "Employees",
            Self::Leave => "Leave",
            Self::Loans => "Loans",
            Self::Payroll => "Payroll",
        }
    }

    /// Kind under which the tab's records are stored.
    #[must_use]
    pub const fn record_kind(self) -> &'static str {
        match self {
            Self::Employees => Employee::KIND,
            Self::Leave => LeaveRequest::KIND,
            Self::Loans => Loan::KIND,
            Self::Payroll => PayrollEntry::KIND,
        }
    }

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Employees => 0,
            Self::Leave => 1,
            Self::Loans => 2,
            Self::Payroll => 3,
        }
    }

    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Employees => Self::Leave,
            Self::Leave => Self::Loans,
            Self::Loans => Self::Payroll,
            Self::Payroll => Self::Employees,
        }
    }

    #[must_use]
    pub const fn previous(self) -> Self {
        match self {
            Self::Employees => Self::Payroll,
            Self::Leave => Self::Employees,
            Self::Loans => Self::Leave,
            Self::Payroll => Self::Loans,
        }
    }
}

/// Sent to the event loop by table callbacks and background store tasks.
#[derive(Debug)]
pub enum AppMessage {
    /// A filter changed on a table.
    FilterChanged { tab: Tab, key: String, value: String },
    /// A table asked for a status change on these rows.
    BulkEditRequested { tab: Tab, ids: Vec<String> },
    /// A bulk delete finished in the store.
    Removed {
        tab: Tab,
        ticket: RemovalTicket,
        result: Result<usize, String>,
    },
    /// A bulk status change finished in the store.
    StatusUpdated {
        tab: Tab,
        ids: Vec<String>,
        status: String,
        result: Result<usize, String>,
    },
    /// A new employee was written to the store.
    EmployeeCreated(Result<Employee, String>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_cycle_and_index() {
        for tab in Tab::ALL {
            assert_eq!(Tab::from_index(tab.index()), Some(tab));
            assert_eq!(tab.next().previous(), tab);
        }
        assert_eq!(Tab::Payroll.next(), Tab::Employees);
        assert_eq!(Tab::from_index(4), None);
    }
}
