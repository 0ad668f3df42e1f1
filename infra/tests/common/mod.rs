//! Behaviour every TokenRepository implementation must show
//!
//! The checks assume an empty store and leave it empty.

use ts_core::domain::entities::token::RefreshToken;
use ts_core::errors::DomainError;
use ts_core::repositories::TokenRepository;

pub async fn assert_token_store_contract(repo: &dyn TokenRepository) {
    // Empty store
    assert!(repo.find_all().await.unwrap().is_empty());
    assert_eq!(repo.count().await.unwrap(), 0);
    assert!(repo.find_by_token("tok-A").await.unwrap().is_none());

    // Insert assigns an identifier
    let saved = repo.save(RefreshToken::new("tok-A")).await.unwrap();
    let id = saved.id.expect("saved token has an id");
    assert_eq!(saved.token, "tok-A");
    assert_eq!(repo.find_by_id(id).await.unwrap(), Some(saved.clone()));
    assert!(repo.exists_by_id(id).await.unwrap());

    // Lookup by token value is exact
    assert_eq!(repo.find_by_token("tok-A").await.unwrap(), Some(saved.clone()));
    assert!(repo.find_by_token("tok-B").await.unwrap().is_none());
    assert!(repo.find_by_token("TOK-A").await.unwrap().is_none());
    assert!(repo.find_by_token("tok-A ").await.unwrap().is_none());

    // Saving an identified record updates it
    let updated = repo
        .save(RefreshToken::with_id(id, "tok-A-rotated"))
        .await
        .unwrap();
    assert_eq!(updated.id, Some(id));
    assert_eq!(repo.count().await.unwrap(), 1);
    assert!(repo.find_by_token("tok-A").await.unwrap().is_none());
    assert_eq!(repo.find_by_token("tok-A-rotated").await.unwrap(), Some(updated.clone()));

    // Saving under an unknown identifier inserts it
    let explicit_id = id + 100;
    let explicit = repo
        .save(RefreshToken::with_id(explicit_id, "explicit"))
        .await
        .unwrap();
    assert_eq!(repo.find_by_id(explicit_id).await.unwrap(), Some(explicit.clone()));

    // Identifiers below 1 are refused rather than remapped
    let err = repo
        .save(RefreshToken::with_id(0, "zero"))
        .await
        .unwrap_err();
    assert_eq!(err, DomainError::InvalidIdentifier { id: 0 });
    assert!(repo.find_by_token("zero").await.unwrap().is_none());
    assert_eq!(repo.count().await.unwrap(), 2);

    // Duplicate values are stored, but the singular lookup refuses them
    let batch = repo
        .save_all(vec![RefreshToken::new("dup"), RefreshToken::new("dup")])
        .await
        .unwrap();
    assert_eq!(batch.len(), 2);
    assert!(batch.iter().all(|t| t.id.is_some() && t.token == "dup"));
    let err = repo.find_by_token("dup").await.unwrap_err();
    assert_eq!(err, DomainError::NonUniqueResult { expected: 1, actual: 2 });
    assert_eq!(repo.count().await.unwrap(), 4);

    // Ordering and multi-id lookups
    let all_ids: Vec<_> = repo
        .find_all()
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.id.unwrap())
        .collect();
    let mut sorted = all_ids.clone();
    sorted.sort_unstable();
    assert_eq!(all_ids, sorted);
    assert_eq!(all_ids.len(), 4);

    let subset = repo
        .find_all_by_id(&[explicit_id, id, -5])
        .await
        .unwrap();
    assert_eq!(subset, vec![updated.clone(), explicit.clone()]);
    assert!(repo.find_all_by_id(&[]).await.unwrap().is_empty());

    // Deletes are idempotent
    repo.delete_by_id(id).await.unwrap();
    repo.delete_by_id(id).await.unwrap();
    assert!(repo.find_by_id(id).await.unwrap().is_none());
    assert!(!repo.exists_by_id(id).await.unwrap());

    repo.delete(&RefreshToken::new("explicit")).await.unwrap();
    assert!(repo.exists_by_id(explicit_id).await.unwrap());
    repo.delete(&explicit).await.unwrap();
    assert!(!repo.exists_by_id(explicit_id).await.unwrap());

    let dup_ids: Vec<_> = batch.iter().map(|t| t.id.unwrap()).collect();
    repo.delete_all_by_id(&dup_ids[..1]).await.unwrap();
    assert_eq!(repo.find_by_token("dup").await.unwrap(), Some(batch[1].clone()));

    repo.save(RefreshToken::new("last")).await.unwrap();
    repo.delete_all().await.unwrap();
    assert!(repo.find_all().await.unwrap().is_empty());
    assert_eq!(repo.count().await.unwrap(), 0);
}
