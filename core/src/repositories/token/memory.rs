//! In-memory implementation of TokenRepository
//!
//! Keeps records in a `BTreeMap` behind a `tokio` read-write lock, so results
//! come back in identifier order. A second map from token value to
//! identifiers serves `find_by_token`. Identifiers are assigned from a
//! counter starting at 1 that always stays above every stored identifier.

use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::entities::token::{RefreshToken, RefreshTokenId};
use crate::errors::{DomainError, DomainResult};

use super::r#trait::TokenRepository;

/// In-memory token repository
///
/// Clones share the same underlying storage.
#[derive(Clone)]
pub struct InMemoryTokenRepository {
    state: Arc<RwLock<MemoryState>>,
}

struct MemoryState {
    tokens: BTreeMap<RefreshTokenId, RefreshToken>,
    by_value: HashMap<String, BTreeSet<RefreshTokenId>>,
    next_id: i64,
}

impl MemoryState {
    /// Give `token` its identifier, advancing the staged counter
    fn identify(
        next_id: &mut i64,
        mut token: RefreshToken,
    ) -> DomainResult<(RefreshTokenId, RefreshToken)> {
        token.check_id()?;
        let id = match token.id {
            Some(id) => id,
            None => RefreshTokenId::try_from(*next_id).map_err(|_| DomainError::Internal {
                message: "Refresh token identifier space exhausted".to_string(),
            })?,
        };
        *next_id = (*next_id).max(i64::from(id) + 1);
        token.id = Some(id);
        Ok((id, token))
    }

    fn store(&mut self, token: RefreshToken) -> DomainResult<RefreshToken> {
        let mut next_id = self.next_id;
        let (id, token) = Self::identify(&mut next_id, token)?;

        self.next_id = next_id;
        self.insert(id, token.clone());
        Ok(token)
    }

    /// Store a batch, all or nothing
    ///
    /// Every record is identified before the first one is written.
    fn store_all(&mut self, tokens: Vec<RefreshToken>) -> DomainResult<Vec<RefreshToken>> {
        let mut next_id = self.next_id;
        let staged = tokens
            .into_iter()
            .map(|token| Self::identify(&mut next_id, token))
            .collect::<DomainResult<Vec<_>>>()?;

        self.next_id = next_id;
        Ok(staged
            .into_iter()
            .map(|(id, token)| {
                self.insert(id, token.clone());
                token
            })
            .collect())
    }

    fn insert(&mut self, id: RefreshTokenId, token: RefreshToken) {
        self.remove(id);
        self.by_value.entry(token.token.clone()).or_default().insert(id);
        self.tokens.insert(id, token);
    }

    fn remove(&mut self, id: RefreshTokenId) -> bool {
        match self.tokens.remove(&id) {
            Some(previous) => {
                self.unindex(id, &previous.token);
                true
            }
            None => false,
        }
    }

    fn unindex(&mut self, id: RefreshTokenId, value: &str) {
        if let Some(ids) = self.by_value.get_mut(value) {
            ids.remove(&id);
            if ids.is_empty() {
                self.by_value.remove(value);
            }
        }
    }
}

impl InMemoryTokenRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(MemoryState {
                tokens: BTreeMap::new(),
                by_value: HashMap::new(),
                next_id: 1,
            })),
        }
    }
}

impl Default for InMemoryTokenRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenRepository for InMemoryTokenRepository {
    async fn save(&self, token: RefreshToken) -> DomainResult<RefreshToken> {
        let mut state = self.state.write().await;
        let saved = state.store(token)?;
        debug!(id = ?saved.id, "Saved refresh token");
        Ok(saved)
    }

    async fn save_all(&self, tokens: Vec<RefreshToken>) -> DomainResult<Vec<RefreshToken>> {
        let mut state = self.state.write().await;
        let saved = state.store_all(tokens)?;
        debug!(count = saved.len(), "Saved refresh tokens");
        Ok(saved)
    }

    async fn find_by_id(&self, id: RefreshTokenId) -> DomainResult<Option<RefreshToken>> {
        let state = self.state.read().await;
        Ok(state.tokens.get(&id).cloned())
    }

    async fn exists_by_id(&self, id: RefreshTokenId) -> DomainResult<bool> {
        let state = self.state.read().await;
        Ok(state.tokens.contains_key(&id))
    }

    async fn find_all(&self) -> DomainResult<Vec<RefreshToken>> {
        let state = self.state.read().await;
        Ok(state.tokens.values().cloned().collect())
    }

    async fn count(&self) -> DomainResult<usize> {
        let state = self.state.read().await;
        Ok(state.tokens.len())
    }

    async fn delete_by_id(&self, id: RefreshTokenId) -> DomainResult<()> {
        let mut state = self.state.write().await;
        if state.remove(id) {
            debug!(id, "Deleted refresh token");
        }
        Ok(())
    }

    async fn delete_all_by_id(&self, ids: &[RefreshTokenId]) -> DomainResult<()> {
        let mut state = self.state.write().await;
        for id in ids {
            state.remove(*id);
        }
        Ok(())
    }

    async fn delete_all(&self) -> DomainResult<()> {
        let mut state = self.state.write().await;
        let removed = state.tokens.len();
        state.tokens.clear();
        state.by_value.clear();
        debug!(removed, "Deleted all refresh tokens");
        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> DomainResult<Option<RefreshToken>> {
        let state = self.state.read().await;
        let Some(ids) = state.by_value.get(token) else {
            return Ok(None);
        };

        if ids.len() > 1 {
            return Err(DomainError::NonUniqueResult {
                expected: 1,
                actual: ids.len(),
            });
        }

        Ok(ids.iter().next().and_then(|id| state.tokens.get(id)).cloned())
    }
}
