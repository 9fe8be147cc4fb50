//! The error taxonomy shared by every box office service.
//!
//! Each variant corresponds to exactly one HTTP status in the web layer, so a
//! caller can tell auth failure, not-found, conflict and validation failure
//! apart by status code alone.

use thiserror::Error;

/// Errors returned by box office services.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Request is malformed: a required field is missing, empty or out of range.
    #[error("{0}")]
    Validation(String),

    /// Credentials did not match any stored user verbatim.
    #[error("denied")]
    Unauthorized,

    /// The addressed record (or set of records) does not exist.
    #[error("{0}")]
    NotFound(String),

    /// A record with the same identity already exists.
    #[error("{0}")]
    Conflict(String),

    /// Well-formed, authenticated request that violates a domain constraint.
    #[error("{0}")]
    BusinessRule(String),

    /// Reading, parsing or writing a collection failed.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl DomainError {
    /// Create a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a not-found error for one record, e.g. `"Event Concert not found"`.
    #[must_use]
    pub fn not_found(resource: &str, key: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("{resource} {key} not found"))
    }

    /// Create a conflict error.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    /// Create a business-rule violation.
    #[must_use]
    pub fn business_rule(message: impl Into<String>) -> Self {
        Self::BusinessRule(message.into())
    }

    /// Create a storage error.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Stable machine-readable code for this error kind.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "BAD_REQUEST",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::BusinessRule(_) => "BUSINESS_RULE_VIOLATION",
            Self::Storage(_) => "INTERNAL_SERVER_ERROR",
        }
    }
}

/// Result type alias for box office services.
pub type Result<T> = std::result::Result<T, DomainError>;
