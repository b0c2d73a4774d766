// Central Error Type for the Application

use thiserror::Error;

/// Application-level error type.
///
/// Each variant is a distinct, machine-readable kind so the API layer can
/// map it to a stable error code; nothing here is silently swallowed.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Domain error: {0}")]
    Domain(#[from] crate::domain::DomainError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Nothing to transfer: {0}")]
    NoOp(String),

    /// Allocator race detected and retries exhausted. Rare; indicates the
    /// numbering serialization guarantee failed, so callers should treat
    /// this as alerting rather than a normal user-facing error.
    #[error("Duplicate queue number: {0}")]
    DuplicateNumber(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

// From implementations for infra crates (to avoid circular dependency)
impl From<String> for AppError {
    fn from(err: String) -> Self {
        AppError::Database(err)
    }
}

// Note: sqlx::Error conversion is handled in infra-sqlite
// by classifying into AppError::Database / AppError::DuplicateNumber
