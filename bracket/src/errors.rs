//! Rejection kinds shared by every manager.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Structured kind attached to every rejection reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Tournament, team, fixture or user absent
    NotFound,
    /// Actor is not the owner or captain
    Forbidden,
    /// Team already on the tournament roster
    AlreadyRegistered,
    /// User already on the team
    AlreadyMember,
    /// Tournament roster is full
    CapacityExceeded,
    /// Malformed input
    ValidationError,
    /// Missing or rejected credentials
    Unauthorized,
    /// Unique value already taken (e.g. email)
    Conflict,
    /// Record store transport or transaction failure
    StoreError,
    /// Failure inside the library that is not the caller's fault
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::AlreadyRegistered => "already_registered",
            ErrorKind::AlreadyMember => "already_member",
            ErrorKind::CapacityExceeded => "capacity_exceeded",
            ErrorKind::ValidationError => "validation_error",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::Conflict => "conflict",
            ErrorKind::StoreError => "store_error",
            ErrorKind::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
