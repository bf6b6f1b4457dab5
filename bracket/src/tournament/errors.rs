//! Tournament error types.

use thiserror::Error;

use super::models::{FixtureId, TournamentId};
use crate::db::StoreError;
use crate::errors::ErrorKind;

/// Tournament, roster and result errors
#[derive(Debug, Error)]
pub enum TournamentError {
    #[error("Tournament not found: {0}")]
    NotFound(TournamentId),

    #[error("Fixture not found: {0}")]
    FixtureNotFound(FixtureId),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Tournament is full: capacity {capacity}")]
    CapacityExceeded { capacity: i32 },

    #[error("Team already registered for this tournament")]
    AlreadyRegistered,

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl TournamentError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TournamentError::NotFound(_) | TournamentError::FixtureNotFound(_) => {
                ErrorKind::NotFound
            }
            TournamentError::Forbidden(_) => ErrorKind::Forbidden,
            TournamentError::CapacityExceeded { .. } => ErrorKind::CapacityExceeded,
            TournamentError::AlreadyRegistered => ErrorKind::AlreadyRegistered,
            TournamentError::Validation(_) => ErrorKind::ValidationError,
            TournamentError::Store(_) => ErrorKind::StoreError,
        }
    }

    /// Get a client-safe error message that doesn't leak store internals
    pub fn client_message(&self) -> String {
        match self {
            TournamentError::Store(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type for tournament operations
pub type TournamentResult<T> = Result<T, TournamentError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_store_errors_are_sanitized() {
        let err = TournamentError::from(StoreError::Timeout(Duration::from_secs(5)));
        assert_eq!(err.kind(), ErrorKind::StoreError);
        assert_eq!(err.client_message(), "Internal server error");
    }

    #[test]
    fn test_rejections_keep_their_message() {
        let err = TournamentError::CapacityExceeded { capacity: 2 };
        assert_eq!(err.kind(), ErrorKind::CapacityExceeded);
        assert!(err.client_message().contains("capacity 2"));
    }
}
