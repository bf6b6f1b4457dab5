//! Authentication error types.

use thiserror::Error;

use crate::db::StoreError;
use crate::errors::ErrorKind;

/// Authentication errors
#[derive(Debug, Error)]
pub enum AuthError {
    /// Store error
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Password hashing failed
    #[error("Password hashing failed")]
    HashingFailed,

    /// Unknown email or wrong password
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Email already registered
    #[error("Email already registered")]
    EmailTaken,

    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    #[error("Invalid display name: {0}")]
    InvalidDisplayName(String),

    /// Password too weak
    #[error("Password too weak: {0}")]
    WeakPassword(String),

    /// JWT token error
    #[error("JWT error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    /// Session expired
    #[error("Session expired")]
    SessionExpired,

    /// Invalid refresh token
    #[error("Invalid refresh token")]
    InvalidRefreshToken,
}

impl AuthError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Store(_) => ErrorKind::StoreError,
            AuthError::HashingFailed => ErrorKind::Internal,
            AuthError::EmailTaken => ErrorKind::Conflict,
            AuthError::InvalidEmail(_)
            | AuthError::InvalidDisplayName(_)
            | AuthError::WeakPassword(_) => ErrorKind::ValidationError,
            AuthError::InvalidCredentials
            | AuthError::JwtError(_)
            | AuthError::SessionExpired
            | AuthError::InvalidRefreshToken => ErrorKind::Unauthorized,
        }
    }

    /// Get a client-safe error message that doesn't leak sensitive information
    ///
    /// Store and JWT errors are sanitized to prevent information disclosure
    /// about the internal system structure.
    pub fn client_message(&self) -> String {
        match self {
            AuthError::Store(_) | AuthError::HashingFailed => "Internal server error".to_string(),
            AuthError::JwtError(_) => "Authentication failed".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;
