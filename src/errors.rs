use staffgrid_db::StoreError;
use thiserror::Error;

/// Application-specific errors
#[derive(Debug, Error)]
pub enum AppError {
    /// Record or preference store failure
    #[error(transparent)]
    Store(#[from] StoreError),
    /// Settings file could not be parsed
    #[error("invalid settings: {0}")]
    Settings(#[from] serde_json::Error),
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// A blocking store task panicked or was cancelled
    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
    /// Rejected user input
    #[error("{0}")]
    Invalid(String),
}
