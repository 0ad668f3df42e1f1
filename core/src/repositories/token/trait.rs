//! Token repository trait defining the interface for refresh token persistence.

use async_trait::async_trait;

use crate::domain::entities::token::{RefreshToken, RefreshTokenId};
use crate::errors::DomainResult;

/// Repository trait for RefreshToken entity persistence operations
///
/// This trait is the whole contract of the token store: the generic CRUD
/// operations keyed by [`RefreshTokenId`] plus a lookup by token value.
/// Implementations own the storage backend; callers only see this trait.
///
/// Absence is a value, not an error. `find_by_id` and `find_by_token` return
/// `Ok(None)` when nothing matches, and every delete is idempotent.
/// Backend failures surface as `DomainError::Storage` without retry.
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Save a refresh token
    ///
    /// A token without an identifier is inserted and receives one from the
    /// backend. A token with an identifier replaces the stored record with
    /// that identifier, or is inserted under it if no such record exists.
    ///
    /// # Arguments
    /// * `token` - The RefreshToken entity to persist
    ///
    /// Identifiers start at 1. The MySQL backend stores at most 512
    /// characters per token value; longer values fail with
    /// `DomainError::Storage`.
    ///
    /// # Returns
    /// * `Ok(RefreshToken)` - The persisted token, `id` always populated
    /// * `Err(DomainError::InvalidIdentifier)` - Explicit `id` below 1
    /// * `Err(DomainError)` - Backend failure
    ///
    /// # Example
    /// ```no_run
    /// # use ts_core::repositories::TokenRepository;
    /// # use ts_core::domain::entities::token::RefreshToken;
    /// # async fn example(repo: &impl TokenRepository) -> Result<(), Box<dyn std::error::Error>> {
    /// let saved = repo.save(RefreshToken::new("opaque-token-value")).await?;
    /// println!("Token saved with ID: {:?}", saved.id);
    /// # Ok(())
    /// # }
    /// ```
    async fn save(&self, token: RefreshToken) -> DomainResult<RefreshToken>;

    /// Save several refresh tokens, returning them in input order
    async fn save_all(&self, tokens: Vec<RefreshToken>) -> DomainResult<Vec<RefreshToken>> {
        let mut saved = Vec::with_capacity(tokens.len());
        for token in tokens {
            saved.push(self.save(token).await?);
        }
        Ok(saved)
    }

    /// Find a refresh token by its ID
    ///
    /// # Arguments
    /// * `id` - The identifier of the refresh token
    ///
    /// # Returns
    /// * `Ok(Some(RefreshToken))` - Token found
    /// * `Ok(None)` - No token found with given ID
    /// * `Err(DomainError)` - Database error occurred
    async fn find_by_id(&self, id: RefreshTokenId) -> DomainResult<Option<RefreshToken>>;

    /// Check whether a refresh token with the given ID exists
    async fn exists_by_id(&self, id: RefreshTokenId) -> DomainResult<bool> {
        Ok(self.find_by_id(id).await?.is_some())
    }

    /// Find all refresh tokens, ordered by ascending ID
    async fn find_all(&self) -> DomainResult<Vec<RefreshToken>>;

    /// Find the refresh tokens whose IDs are listed
    ///
    /// Unknown IDs are skipped and duplicates collapse. The result is
    /// ordered by ascending ID.
    async fn find_all_by_id(&self, ids: &[RefreshTokenId]) -> DomainResult<Vec<RefreshToken>> {
        let mut unique = ids.to_vec();
        unique.sort_unstable();
        unique.dedup();

        let mut found = Vec::with_capacity(unique.len());
        for id in unique {
            if let Some(token) = self.find_by_id(id).await? {
                found.push(token);
            }
        }
        Ok(found)
    }

    /// Count stored refresh tokens
    async fn count(&self) -> DomainResult<usize>;

    /// Delete a refresh token by its ID
    ///
    /// Deleting an ID that is not stored succeeds without effect.
    ///
    /// # Example
    /// ```no_run
    /// # use ts_core::repositories::TokenRepository;
    /// # async fn example(repo: &impl TokenRepository) -> Result<(), Box<dyn std::error::Error>> {
    /// repo.delete_by_id(7).await?;
    /// assert!(repo.find_by_id(7).await?.is_none());
    /// # Ok(())
    /// # }
    /// ```
    async fn delete_by_id(&self, id: RefreshTokenId) -> DomainResult<()>;

    /// Delete the given refresh token
    ///
    /// A token that was never saved has nothing to delete.
    async fn delete(&self, token: &RefreshToken) -> DomainResult<()> {
        match token.id {
            Some(id) => self.delete_by_id(id).await,
            None => Ok(()),
        }
    }

    /// Delete every listed ID, ignoring unknown ones
    async fn delete_all_by_id(&self, ids: &[RefreshTokenId]) -> DomainResult<()> {
        for &id in ids {
            self.delete_by_id(id).await?;
        }
        Ok(())
    }

    /// Delete all refresh tokens
    async fn delete_all(&self) -> DomainResult<()>;

    /// Find a refresh token by its exact token value
    ///
    /// Matching is exact and case-sensitive. Token values are not required
    /// to be unique, but this lookup has a single result: when several
    /// records share the value it fails with `DomainError::NonUniqueResult`.
    ///
    /// # Arguments
    /// * `token` - The token value to search for
    ///
    /// # Returns
    /// * `Ok(Some(RefreshToken))` - Token found
    /// * `Ok(None)` - No token carries this value
    /// * `Err(DomainError)` - Backend failure or non-unique match
    ///
    /// # Example
    /// ```no_run
    /// # use ts_core::repositories::TokenRepository;
    /// # async fn example(repo: &impl TokenRepository) -> Result<(), Box<dyn std::error::Error>> {
    /// match repo.find_by_token("opaque-token-value").await? {
    ///     Some(token) => println!("Token belongs to record {:?}", token.id),
    ///     None => println!("Token not found"),
    /// }
    /// # Ok(())
    /// # }
    /// ```
    async fn find_by_token(&self, token: &str) -> DomainResult<Option<RefreshToken>>;
}
