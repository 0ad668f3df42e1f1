//! Tests for the provided methods of TokenRepository
//!
//! `MinimalRepository` implements only the required methods, so every call
//! below goes through the trait's default bodies.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::domain::entities::token::{RefreshToken, RefreshTokenId};
use crate::errors::{DomainError, DomainResult};
use crate::repositories::token::{InMemoryTokenRepository, TokenRepository};

#[derive(Default)]
struct MinimalRepository {
    inner: InMemoryTokenRepository,
    lookups: AtomicUsize,
    fail_saves_after: Option<usize>,
    saves: AtomicUsize,
}

#[async_trait]
impl TokenRepository for MinimalRepository {
    async fn save(&self, token: RefreshToken) -> DomainResult<RefreshToken> {
        let attempt = self.saves.fetch_add(1, Ordering::SeqCst);
        if self.fail_saves_after.is_some_and(|limit| attempt >= limit) {
            return Err(DomainError::storage("save refresh token", "disk full"));
        }
        self.inner.save(token).await
    }

    async fn find_by_id(&self, id: RefreshTokenId) -> DomainResult<Option<RefreshToken>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.find_by_id(id).await
    }

    async fn find_all(&self) -> DomainResult<Vec<RefreshToken>> {
        self.inner.find_all().await
    }

    async fn count(&self) -> DomainResult<usize> {
        self.inner.count().await
    }

    async fn delete_by_id(&self, id: RefreshTokenId) -> DomainResult<()> {
        self.inner.delete_by_id(id).await
    }

    async fn delete_all(&self) -> DomainResult<()> {
        self.inner.delete_all().await
    }

    async fn find_by_token(&self, token: &str) -> DomainResult<Option<RefreshToken>> {
        self.inner.find_by_token(token).await
    }
}

#[tokio::test]
async fn test_default_exists_by_id() {
    let repo = MinimalRepository::default();
    repo.save(RefreshToken::new("a")).await.unwrap();

    assert!(repo.exists_by_id(1).await.unwrap());
    assert!(!repo.exists_by_id(2).await.unwrap());
}

#[tokio::test]
async fn test_default_find_all_by_id_deduplicates() {
    let repo = MinimalRepository::default();
    repo.save_all(vec![RefreshToken::new("a"), RefreshToken::new("b")])
        .await
        .unwrap();

    let found = repo.find_all_by_id(&[2, 2, 7, 1]).await.unwrap();
    let ids: Vec<_> = found.iter().map(|t| t.id.unwrap()).collect();

    assert_eq!(ids, vec![1, 2]);
    assert_eq!(repo.lookups.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_default_delete_and_delete_all_by_id() {
    let repo = MinimalRepository::default();
    let saved = repo
        .save_all(vec![
            RefreshToken::new("a"),
            RefreshToken::new("b"),
            RefreshToken::new("c"),
        ])
        .await
        .unwrap();

    repo.delete(&RefreshToken::new("unsaved")).await.unwrap();
    assert_eq!(repo.count().await.unwrap(), 3);

    repo.delete(&saved[0]).await.unwrap();
    repo.delete_all_by_id(&[2, 50]).await.unwrap();

    let remaining = repo.find_all().await.unwrap();
    assert_eq!(remaining, vec![saved[2].clone()]);
}

#[tokio::test]
async fn test_default_save_all_stops_at_first_failure() {
    let repo = MinimalRepository {
        fail_saves_after: Some(2),
        ..Default::default()
    };

    let err = repo
        .save_all(vec![
            RefreshToken::new("a"),
            RefreshToken::new("b"),
            RefreshToken::new("c"),
            RefreshToken::new("d"),
        ])
        .await
        .unwrap_err();

    assert!(err.is_storage());
    assert_eq!(repo.saves.load(Ordering::SeqCst), 3);
    assert_eq!(repo.count().await.unwrap(), 2);
}
