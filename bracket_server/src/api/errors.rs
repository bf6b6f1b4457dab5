//! JSON error responses.
//!
//! Every rejection leaves the API as `{"kind": "...", "error": "..."}` with a
//! status derived from its [`ErrorKind`].

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bracket::{
    ErrorKind, auth::AuthError, team::TeamError, tournament::TournamentError,
};
use serde::{Deserialize, Serialize};

/// Error body returned by every endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub kind: ErrorKind,
    pub error: String,
}

/// Rejection carried out of a handler
#[derive(Debug)]
pub struct ApiError {
    pub kind: ErrorKind,
    pub message: String,
}

impl ApiError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ValidationError, message)
    }

    pub fn unauthorized() -> Self {
        Self::new(ErrorKind::Unauthorized, "Authentication required")
    }

    pub fn status(&self) -> StatusCode {
        status_for(self.kind)
    }
}

/// HTTP status for an error kind
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Forbidden => StatusCode::FORBIDDEN,
        ErrorKind::AlreadyRegistered
        | ErrorKind::AlreadyMember
        | ErrorKind::CapacityExceeded
        | ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::ValidationError => StatusCode::BAD_REQUEST,
        ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorKind::StoreError | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (
            status,
            Json(ErrorResponse {
                kind: self.kind,
                error: self.message,
            }),
        )
            .into_response()
    }
}

impl From<TournamentError> for ApiError {
    fn from(err: TournamentError) -> Self {
        if matches!(err, TournamentError::Store(_)) {
            tracing::error!(error = %err, "Tournament operation failed");
        }
        Self::new(err.kind(), err.client_message())
    }
}

impl From<TeamError> for ApiError {
    fn from(err: TeamError) -> Self {
        if matches!(err, TeamError::Store(_)) {
            tracing::error!(error = %err, "Team operation failed");
        }
        Self::new(err.kind(), err.client_message())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        if matches!(err, AuthError::Store(_) | AuthError::HashingFailed) {
            tracing::error!(error = %err, "Auth operation failed");
        }
        Self::new(err.kind(), err.client_message())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

/// Form value that may arrive as a JSON number or a string
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NumericInput {
    Number(i64),
    Text(String),
}

impl NumericInput {
    /// Raw text as the user typed it
    pub fn as_text(&self) -> String {
        match self {
            NumericInput::Number(n) => n.to_string(),
            NumericInput::Text(s) => s.clone(),
        }
    }

    /// Whole number that fits a stored score
    pub fn to_i32(&self, field: &str) -> Result<i32, ApiError> {
        let value = match self {
            NumericInput::Number(n) => Some(*n),
            NumericInput::Text(s) => s.trim().parse::<i64>().ok(),
        };
        value
            .and_then(|v| i32::try_from(v).ok())
            .ok_or_else(|| ApiError::validation(format!("{field} must be a whole number")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_for(ErrorKind::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_for(ErrorKind::Forbidden), StatusCode::FORBIDDEN);
        assert_eq!(status_for(ErrorKind::CapacityExceeded), StatusCode::CONFLICT);
        assert_eq!(status_for(ErrorKind::AlreadyRegistered), StatusCode::CONFLICT);
        assert_eq!(status_for(ErrorKind::ValidationError), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_for(ErrorKind::StoreError),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_numeric_input_from_json() {
        let n: NumericInput = serde_json::from_str("8").unwrap();
        let s: NumericInput = serde_json::from_str("\" 8 \"").unwrap();
        assert_eq!(n.as_text(), "8");
        assert_eq!(s.to_i32("score").unwrap(), 8);
        assert!(serde_json::from_str::<NumericInput>("2.5").is_err());
    }

    #[test]
    fn test_numeric_input_rejects_garbage() {
        assert!(NumericInput::Text("five".to_string()).to_i32("score").is_err());
        assert!(NumericInput::Number(i64::MAX).to_i32("score").is_err());
        assert_eq!(NumericInput::Number(-3).to_i32("score").unwrap(), -3);
    }

    #[test]
    fn test_store_error_message_is_sanitized() {
        let err = ApiError::from(TournamentError::Store(bracket::db::StoreError::UniqueViolation(
            "tournaments_pkey".to_string(),
        )));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "Internal server error");
    }
}
