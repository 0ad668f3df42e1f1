//! Domain-specific error types and error handling.

use thiserror::Error;

use crate::domain::entities::token::RefreshTokenId;

/// Core domain errors raised by the token store
///
/// "Not found" is never an error here: lookups return `Ok(None)` and deletes
/// of absent records succeed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The persistence backend failed (connectivity, constraint violation,
    /// serialization). Propagated as-is, never retried.
    #[error("Storage error: {message}")]
    Storage { message: String },

    /// A lookup with a singular result matched more than one record
    #[error("Expected {expected} result but found {actual}")]
    NonUniqueResult { expected: usize, actual: usize },

    /// An explicit identifier outside the range the store assigns from
    #[error("Invalid refresh token id {id}: identifiers start at 1")]
    InvalidIdentifier { id: RefreshTokenId },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    /// Build a storage error naming the failed operation
    pub fn storage(operation: &str, cause: impl std::fmt::Display) -> Self {
        DomainError::Storage {
            message: format!("Failed to {}: {}", operation, cause),
        }
    }

    /// Check if the error came from the persistence backend
    pub fn is_storage(&self) -> bool {
        matches!(self, DomainError::Storage { .. })
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
