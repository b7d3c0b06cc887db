//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic input failures. Storage faults belong to
/// the infrastructure layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A customer namespace contained something other than `[A-Za-z0-9]`.
    #[error("invalid namespace: {0}")]
    InvalidNamespace(String),

    /// A value failed validation (e.g. empty item name, negative price).
    #[error("validation failed: {0}")]
    Validation(String),
}

impl DomainError {
    pub fn invalid_namespace(msg: impl Into<String>) -> Self {
        Self::InvalidNamespace(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
