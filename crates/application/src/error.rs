//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error (validation, normalization)
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The transactional store failed (connectivity, constraint, timeout)
    #[error("Store error: {0}")]
    Store(String),

    /// Request rejected before reaching the store
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
