//! MySQL implementation of the TokenRepository trait.
//!
//! This module provides the concrete implementation of refresh token persistence
//! using MySQL database with SQLx. Rows are mapped by hand so the core crate
//! stays free of database types.

use async_trait::async_trait;
use sqlx::{MySql, MySqlConnection, MySqlPool, QueryBuilder, Row};
use tracing::{debug, error};

use ts_core::domain::entities::token::{RefreshToken, RefreshTokenId};
use ts_core::errors::{DomainError, DomainResult};
use ts_core::repositories::TokenRepository;

/// Upper bound on bind parameters per `IN (...)` statement
const MAX_IN_LIST: usize = 1000;

/// MySQL implementation of TokenRepository
pub struct MySqlTokenRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlTokenRepository {
    /// Create a new MySQL token repository
    ///
    /// # Arguments
    /// * `pool` - MySQL connection pool from SQLx
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert database row to RefreshToken entity
    fn row_to_token(row: &sqlx::mysql::MySqlRow) -> DomainResult<RefreshToken> {
        let id: RefreshTokenId = row.try_get("id").map_err(|e| DomainError::Internal {
            message: format!("Failed to get id: {}", e),
        })?;

        let token: String = row.try_get("token").map_err(|e| DomainError::Internal {
            message: format!("Failed to get token: {}", e),
        })?;

        Ok(RefreshToken::with_id(id, token))
    }

    fn rows_to_tokens(rows: &[sqlx::mysql::MySqlRow]) -> DomainResult<Vec<RefreshToken>> {
        rows.iter().map(Self::row_to_token).collect()
    }

    /// Insert or upsert a single token on the given connection
    async fn save_with(
        conn: &mut MySqlConnection,
        token: RefreshToken,
    ) -> DomainResult<RefreshToken> {
        match token.id {
            None => {
                let result = sqlx::query("INSERT INTO refresh_tokens (token) VALUES (?)")
                    .bind(&token.token)
                    .execute(&mut *conn)
                    .await
                    .map_err(|e| storage_error("insert refresh token", e))?;

                let id = RefreshTokenId::try_from(result.last_insert_id()).map_err(|_| {
                    DomainError::Internal {
                        message: format!(
                            "Generated id {} exceeds the identifier range",
                            result.last_insert_id()
                        ),
                    }
                })?;

                debug!(id, "Inserted refresh token");
                Ok(RefreshToken {
                    id: Some(id),
                    ..token
                })
            }
            Some(id) => {
                let query = r#"
                    INSERT INTO refresh_tokens (id, token) VALUES (?, ?)
                    ON DUPLICATE KEY UPDATE token = VALUES(token)
                "#;

                sqlx::query(query)
                    .bind(id)
                    .bind(&token.token)
                    .execute(&mut *conn)
                    .await
                    .map_err(|e| storage_error("save refresh token", e))?;

                debug!(id, "Saved refresh token");
                Ok(token)
            }
        }
    }

    async fn acquire(&self) -> DomainResult<sqlx::pool::PoolConnection<MySql>> {
        self.pool
            .acquire()
            .await
            .map_err(|e| storage_error("acquire database connection", e))
    }
}

fn storage_error(operation: &str, e: sqlx::Error) -> DomainError {
    error!("Failed to {}: {}", operation, e);
    DomainError::storage(operation, e)
}

/// Sorted, deduplicated copy of `ids`
fn unique_ids(ids: &[RefreshTokenId]) -> Vec<RefreshTokenId> {
    let mut unique = ids.to_vec();
    unique.sort_unstable();
    unique.dedup();
    unique
}

/// Build `<prefix> (?, ?, ...)<suffix>` for one chunk of ids
fn in_list_query<'a>(
    prefix: &str,
    ids: &'a [RefreshTokenId],
    suffix: &str,
) -> QueryBuilder<'a, MySql> {
    let mut builder = QueryBuilder::new(prefix);
    builder.push(" (");
    let mut separated = builder.separated(", ");
    for id in ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(")");
    builder.push(suffix);
    builder
}

#[async_trait]
impl TokenRepository for MySqlTokenRepository {
    async fn save(&self, token: RefreshToken) -> DomainResult<RefreshToken> {
        // An explicit 0 would make AUTO_INCREMENT generate a different id
        token.check_id()?;

        let mut conn = self.acquire().await?;
        Self::save_with(&mut conn, token).await
    }

    async fn save_all(&self, tokens: Vec<RefreshToken>) -> DomainResult<Vec<RefreshToken>> {
        if tokens.is_empty() {
            return Ok(Vec::new());
        }
        for token in &tokens {
            token.check_id()?;
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| storage_error("begin transaction", e))?;

        let mut saved = Vec::with_capacity(tokens.len());
        for token in tokens {
            saved.push(Self::save_with(&mut tx, token).await?);
        }

        tx.commit()
            .await
            .map_err(|e| storage_error("commit refresh tokens", e))?;

        debug!(count = saved.len(), "Saved refresh tokens");
        Ok(saved)
    }

    async fn find_by_id(&self, id: RefreshTokenId) -> DomainResult<Option<RefreshToken>> {
        let query = r#"
            SELECT id, token
            FROM refresh_tokens
            WHERE id = ?
            LIMIT 1
        "#;

        let result = sqlx::query(query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage_error("find token by id", e))?;

        match result {
            Some(row) => Ok(Some(Self::row_to_token(&row)?)),
            None => Ok(None),
        }
    }

    async fn exists_by_id(&self, id: RefreshTokenId) -> DomainResult<bool> {
        let result = sqlx::query("SELECT 1 FROM refresh_tokens WHERE id = ? LIMIT 1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage_error("check token existence", e))?;

        Ok(result.is_some())
    }

    async fn find_all(&self) -> DomainResult<Vec<RefreshToken>> {
        let rows = sqlx::query("SELECT id, token FROM refresh_tokens ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| storage_error("find all tokens", e))?;

        Self::rows_to_tokens(&rows)
    }

    async fn find_all_by_id(&self, ids: &[RefreshTokenId]) -> DomainResult<Vec<RefreshToken>> {
        let ids = unique_ids(ids);
        let mut tokens = Vec::with_capacity(ids.len());

        for chunk in ids.chunks(MAX_IN_LIST) {
            let rows = in_list_query("SELECT id, token FROM refresh_tokens WHERE id IN", chunk, " ORDER BY id")
                .build()
                .fetch_all(&self.pool)
                .await
                .map_err(|e| storage_error("find tokens by id", e))?;

            tokens.extend(Self::rows_to_tokens(&rows)?);
        }

        Ok(tokens)
    }

    async fn count(&self) -> DomainResult<usize> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM refresh_tokens")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| storage_error("count tokens", e))?;

        let count: i64 = row.try_get("count").map_err(|e| DomainError::Internal {
            message: format!("Failed to get count: {}", e),
        })?;

        usize::try_from(count).map_err(|_| DomainError::Internal {
            message: format!("Invalid token count: {}", count),
        })
    }

    async fn delete_by_id(&self, id: RefreshTokenId) -> DomainResult<()> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| storage_error("delete token", e))?;

        debug!(id, deleted = result.rows_affected(), "Deleted refresh token");
        Ok(())
    }

    async fn delete_all_by_id(&self, ids: &[RefreshTokenId]) -> DomainResult<()> {
        let ids = unique_ids(ids);

        for chunk in ids.chunks(MAX_IN_LIST) {
            let result = in_list_query("DELETE FROM refresh_tokens WHERE id IN", chunk, "")
                .build()
                .execute(&self.pool)
                .await
                .map_err(|e| storage_error("delete tokens by id", e))?;

            debug!(deleted = result.rows_affected(), "Deleted refresh tokens");
        }

        Ok(())
    }

    async fn delete_all(&self) -> DomainResult<()> {
        let result = sqlx::query("DELETE FROM refresh_tokens")
            .execute(&self.pool)
            .await
            .map_err(|e| storage_error("delete all tokens", e))?;

        debug!(deleted = result.rows_affected(), "Deleted all refresh tokens");
        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> DomainResult<Option<RefreshToken>> {
        let query = r#"
            SELECT id, token
            FROM refresh_tokens
            WHERE token = ?
            ORDER BY id
        "#;

        let rows = sqlx::query(query)
            .bind(token)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| storage_error("find refresh token", e))?;

        // Collations may pad or fold; only byte-equal values count
        let mut matches = Self::rows_to_tokens(&rows)?
            .into_iter()
            .filter(|t| t.matches(token));

        let first = matches.next();
        let extra = matches.count();
        if extra > 0 {
            return Err(DomainError::NonUniqueResult {
                expected: 1,
                actual: extra + 1,
            });
        }

        Ok(first)
    }
}
