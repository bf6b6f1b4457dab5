//! Record store error types.

use std::time::Duration;
use thiserror::Error;

/// Failures surfaced by a record store implementation
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database transport or query error
    #[error("Database error: {0}")]
    Database(sqlx::Error),

    /// A uniqueness constraint rejected the write
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    /// Operation exceeded its deadline
    #[error("Store operation timed out after {0:?}")]
    Timeout(Duration),
}

impl StoreError {
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, StoreError::UniqueViolation(_))
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            if db_err.is_unique_violation() {
                let constraint = db_err
                    .constraint()
                    .map(str::to_string)
                    .unwrap_or_else(|| db_err.message().to_string());
                return StoreError::UniqueViolation(constraint);
            }
        }
        StoreError::Database(err)
    }
}

/// Result type for record store operations
pub type StoreResult<T> = Result<T, StoreError>;
