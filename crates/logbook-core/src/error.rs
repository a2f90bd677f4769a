//! Error types for collection rules.

use thiserror::Error;

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// A create body failed its required-field check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// One or more required fields are falsy. Carries the client-facing message.
    #[error("{0}")]
    MissingRequired(String),
}

/// Errors raised while building collection definitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Table name is not a plain SQL identifier.
    #[error("invalid table name: {0:?}")]
    InvalidTableName(String),
}
