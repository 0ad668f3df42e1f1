//! Refresh token entity persisted by the token store.

use serde::{Deserialize, Serialize};

use crate::errors::{DomainError, DomainResult};

/// Identifier type assigned to refresh tokens by the persistence layer
pub type RefreshTokenId = i32;

/// Smallest identifier a record may carry
pub const MIN_REFRESH_TOKEN_ID: RefreshTokenId = 1;

/// Refresh token record
///
/// The token value is opaque to the store. It is a secondary lookup key and
/// is not required to be unique.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RefreshToken {
    /// Identifier, `None` until the record has been saved
    pub id: Option<RefreshTokenId>,

    /// Token value
    pub token: String,
}

impl RefreshToken {
    /// Creates a refresh token that has not been persisted yet
    ///
    /// # Arguments
    ///
    /// * `token` - The token value
    ///
    /// # Returns
    ///
    /// A new `RefreshToken` with no identifier
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            id: None,
            token: token.into(),
        }
    }

    /// Creates a refresh token with a known identifier
    pub fn with_id(id: RefreshTokenId, token: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            token: token.into(),
        }
    }

    /// Checks if the record has never been saved
    ///
    /// # Returns
    ///
    /// `true` if no identifier has been assigned, `false` otherwise
    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// Rejects an explicit identifier below [`MIN_REFRESH_TOKEN_ID`]
    ///
    /// MySQL treats an explicit `0` as a request for a generated id, so
    /// non-positive identifiers cannot round-trip through every backend.
    pub fn check_id(&self) -> DomainResult<()> {
        match self.id {
            Some(id) if id < MIN_REFRESH_TOKEN_ID => Err(DomainError::InvalidIdentifier { id }),
            _ => Ok(()),
        }
    }

    /// Checks if the token value equals `token` exactly
    pub fn matches(&self, token: &str) -> bool {
        self.token == token
    }
}
