//! Domain error types
//!
//! Validation failures raised when constructing domain values. Storage and
//! remote errors live with their respective ports.

use thiserror::Error;

/// Errors that can occur in domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Invalid record identifier
    #[error("Invalid record id: {0}")]
    InvalidRecordId(String),

    /// Invalid user identifier
    #[error("Invalid user id: {0}")]
    InvalidUserId(String),

    /// Invalid collection name
    #[error("Invalid collection name: {0}")]
    InvalidCollection(String),

    /// Invalid pagination cursor
    #[error("Invalid page cursor: {0}")]
    InvalidCursor(String),

    /// Generic validation failure
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}
