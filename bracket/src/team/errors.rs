//! Team error types.

use thiserror::Error;

use super::models::TeamId;
use crate::db::StoreError;
use crate::errors::ErrorKind;

/// Team and membership errors
#[derive(Debug, Error)]
pub enum TeamError {
    #[error("Team not found: {0}")]
    NotFound(TeamId),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Invitee email does not belong to any account
    #[error("No such user")]
    UserNotFound,

    #[error("User is already a member of this team")]
    AlreadyMember,

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl TeamError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TeamError::NotFound(_) | TeamError::UserNotFound => ErrorKind::NotFound,
            TeamError::Forbidden(_) => ErrorKind::Forbidden,
            TeamError::AlreadyMember => ErrorKind::AlreadyMember,
            TeamError::Validation(_) => ErrorKind::ValidationError,
            TeamError::Store(_) => ErrorKind::StoreError,
        }
    }

    /// Get a client-safe error message that doesn't leak store internals
    pub fn client_message(&self) -> String {
        match self {
            TeamError::Store(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type for team operations
pub type TeamResult<T> = Result<T, TeamError>;
