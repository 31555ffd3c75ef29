use std::{
    fs,
    path::{Path, PathBuf},
};

use log::debug;
use rusqlite::{Connection as SqliteConnection, OptionalExtension, params};
use rusqlite_migration::{M, Migrations};
use serde_json::Value;

use crate::{PreferenceStore, Record, StoreError, seed};

/// Initialize the database with migrations.
///
/// `records` holds every record kind as a JSON payload keyed by
/// `(kind, id)`; `preferences` holds view preferences as JSON text.
///
/// # Errors
///
/// This function will return an error if the database cannot be opened or if migrations fail.
pub fn init_db(path: &Path) -> Result<(), StoreError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let mut conn = SqliteConnection::open(path)?;

    let migrations = Migrations::new(vec![
        M::up(
            "CREATE TABLE IF NOT EXISTS records (
                kind TEXT NOT NULL,
                id TEXT NOT NULL,
                payload TEXT NOT NULL,
                PRIMARY KEY (kind, id)
            );",
        )
        .down("DROP TABLE records"),
        M::up(
            "CREATE TABLE IF NOT EXISTS preferences (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )
        .down("DROP TABLE preferences"),
    ]);

    migrations.to_latest(&mut conn)?;

    Ok(())
}

/// Record storage for every HR record kind.
///
/// Each operation opens its own connection so the store can be cloned into
/// blocking tasks.
#[derive(Clone, Debug)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    /// Open (and migrate) the store at `path`.
    ///
    /// # Errors
    ///
    /// This function will return an error if the database cannot be opened or if migrations fail.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        init_db(&path)?;
        Ok(Self { path })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connection(&self) -> Result<SqliteConnection, StoreError> {
        Ok(SqliteConnection::open(&self.path)?)
    }

    /// All records of one kind in insertion order.
    ///
    /// # Errors
    ///
    /// This function will return an error if the query fails or a payload cannot be decoded.
    pub fn load<T: Record>(&self) -> Result<Vec<T>, StoreError> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(
            "SELECT payload FROM records WHERE kind = ? ORDER BY rowid",
        )?;
        let payloads = stmt
            .query_map(params![T::KIND], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        payloads
            .iter()
            .map(|payload| Ok(serde_json::from_str(payload)?))
            .collect()
    }

    /// Insert or replace one record.
    ///
    /// # Errors
    ///
    /// This function will return an error if the record cannot be encoded or written.
    pub fn save<T: Record>(&self, record: &T) -> Result<(), StoreError> {
        self.save_all(std::slice::from_ref(record))
    }

    /// Insert or replace records in one transaction.
    ///
    /// # Errors
    ///
    /// This function will return an error if a record cannot be encoded or written.
    pub fn save_all<T: Record>(&self, records: &[T]) -> Result<(), StoreError> {
        let mut conn = self.connection()?;
        let tx = conn.transaction()?;
        for record in records {
            let payload = serde_json::to_string(record)?;
            tx.execute(
                "INSERT INTO records (kind, id, payload) VALUES (?1, ?2, ?3)
                 ON CONFLICT(kind, id) DO UPDATE SET payload = excluded.payload",
                params![T::KIND, record.id(), payload],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Delete records of one kind by id, returning how many were removed.
    ///
    /// # Errors
    ///
    /// This function will return an error if the database cannot be opened or if the query fails.
    pub fn delete(&self, kind: &str, ids: &[String]) -> Result<usize, StoreError> {
        let mut conn = self.connection()?;
        let tx = conn.transaction()?;
        let mut removed = 0;
        for id in ids {
            removed += tx.execute(
                "DELETE FROM records WHERE kind = ?1 AND id = ?2",
                params![kind, id],
            )?;
        }
        tx.commit()?;
        debug!("deleted {removed} {kind} record(s)");
        Ok(removed)
    }

    /// Set the `status` of records of one kind, returning how many changed.
    ///
    /// # Errors
    ///
    /// This function will return an error if the database cannot be opened or if the query fails.
    pub fn update_status(
        &self,
        kind: &str,
        ids: &[String],
        status: &str,
    ) -> Result<usize, StoreError> {
        let mut conn = self.connection()?;
        let tx = conn.transaction()?;
        let mut updated = 0;
        for id in ids {
            updated += tx.execute(
                "UPDATE records SET payload = json_set(payload, '$.status', ?1)
                 WHERE kind = ?2 AND id = ?3",
                params![status, kind, id],
            )?;
        }
        tx.commit()?;
        debug!("set status '{status}' on {updated} {kind} record(s)");
        Ok(updated)
    }

    /// Number of records stored across all kinds.
    ///
    /// # Errors
    ///
    /// This function will return an error if the database cannot be opened or if the query fails.
    pub fn count(&self) -> Result<usize, StoreError> {
        let conn = self.connection()?;
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM records", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    /// Populate an empty store with the sample data set.
    ///
    /// Returns whether anything was written.
    ///
    /// # Errors
    ///
    /// This function will return an error if the store cannot be read or written.
    pub fn seed_if_empty(&self, payroll_month: &str) -> Result<bool, StoreError> {
        if self.count()? > 0 {
            return Ok(false);
        }

        let employees = seed::employees();
        self.save_all(&employees)?;
        self.save_all(&seed::leave_requests(&employees))?;
        self.save_all(&seed::loans(&employees))?;
        self.save_all(&seed::payroll(&employees, payroll_month))?;
        debug!("seeded record store at {}", self.path.display());
        Ok(true)
    }
}

/// Preference store persisted in the `preferences` table.
#[derive(Clone, Debug)]
pub struct SqlitePreferenceStore {
    path: PathBuf,
}

impl SqlitePreferenceStore {
    /// Open (and migrate) the store at `path`.
    ///
    /// # Errors
    ///
    /// This function will return an error if the database cannot be opened or if migrations fail.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        init_db(&path)?;
        Ok(Self { path })
    }
}

impl PreferenceStore for SqlitePreferenceStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let conn = SqliteConnection::open(&self.path)?;
        let stored: Option<String> = conn
            .query_row(
                "SELECT value FROM preferences WHERE key = ?",
                params![key],
                |row| row.get(0),
            )
            .optional()?;

        stored
            .map(|text| serde_json::from_str(&text))
            .transpose()
            .map_err(StoreError::from)
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let conn = SqliteConnection::open(&self.path)?;
        conn.execute(
            "INSERT INTO preferences (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value.to_string()],
        )?;
        Ok(())
    }
}
