use thiserror::Error;

/// Errors raised by the record and preference stores.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("migration error: {0}")]
    Migration(#[from] rusqlite_migration::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not determine a home directory")]
    NoHomeDirectory,
    #[error("preference store lock poisoned")]
    LockPoisoned,
}
