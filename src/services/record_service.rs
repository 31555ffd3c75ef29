use std::str::FromStr;

use chrono::Local;
use rust_decimal::Decimal;
use staffgrid_db::{Employee, Record, RecordStore};
use tokio::task::spawn_blocking;
use uuid::Uuid;

use crate::errors::AppError;

/// Runs record store work on the blocking pool
#[derive(Clone, Debug)]
pub struct RecordService {
    store: RecordStore,
}

impl RecordService {
    pub const fn new(store: RecordStore) -> Self {
        Self { store }
    }

    /// Load every record of one kind
    pub async fn load<T: Record>(&self) -> Result<Vec<T>, AppError> {
        let store = self.store.clone();
        Ok(spawn_blocking(move || store.load::<T>()).await??)
    }

    /// Delete records by id, returning how many were removed
    pub async fn delete(&self, kind: &'static str, ids: Vec<String>) -> Result<usize, AppError> {
        let store = self.store.clone();
        Ok(spawn_blocking(move || store.delete(kind, &ids)).await??)
    }

    /// Set the status of records by id, returning how many changed
    pub async fn update_status(
        &self,
        kind: &'static str,
        ids: Vec<String>,
        status: String,
    ) -> Result<usize, AppError> {
        let store = self.store.clone();
        Ok(spawn_blocking(move || store.update_status(kind, &ids, &status)).await??)
    }

    /// Store a new record and hand it back
    pub async fn create<T: Record>(&self, record: T) -> Result<T, AppError> {
        let store = self.store.clone();
        Ok(spawn_blocking(move || store.save(&record).map(|()| record)).await??)
    }
}

/// Values entered in the new-employee form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewEmployee {
    pub name: String,
    pub email: String,
    pub department: String,
    pub sub_department: String,
    pub designation: String,
    pub basic_salary: String,
}

impl NewEmployee {
    /// Validate the form and build the record with a fresh id
    pub fn into_employee(self, employee_code: String) -> Result<Employee, AppError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(AppError::Invalid("Name is required".to_string()));
        }
        let email = self.email.trim();
        if !email.contains('@') {
            return Err(AppError::Invalid("Email must contain '@'".to_string()));
        }
        if self.department.trim().is_empty() {
            return Err(AppError::Invalid("Department is required".to_string()));
        }
        let basic_salary = Decimal::from_str(self.basic_salary.trim())
            .ok()
            .filter(|salary| salary.is_sign_positive())
            .ok_or_else(|| AppError::Invalid("Basic salary must be a positive amount".to_string()))?;
        let sub_department = Some(self.sub_department.trim().to_string())
            .filter(|sub| !sub.is_empty());

        Ok(Employee {
            id: Uuid::new_v4().to_string(),
            employee_code,
            name: name.to_string(),
            email: email.to_string(),
            department: self.department.trim().to_string(),
            sub_department,
            designation: self.designation.trim().to_string(),
            status: "Active".to_string(),
            join_date: Local::now().date_naive(),
            basic_salary,
        })
    }
}
