//! MySQL-specific database implementations
//!
//! This module contains the MySQL implementation of the token repository
//! trait using SQLx, and the schema it expects.

pub mod token_repository_impl;

pub use token_repository_impl::MySqlTokenRepository;

/// Schema for the `refresh_tokens` table
///
/// `token` is indexed for lookups but not unique, and holds at most 512
/// characters. The binary collation keeps comparisons case-sensitive.
pub const CREATE_REFRESH_TOKENS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS refresh_tokens (
        id    INT NOT NULL AUTO_INCREMENT,
        token VARCHAR(512) CHARACTER SET utf8mb4 COLLATE utf8mb4_bin NOT NULL,
        PRIMARY KEY (id),
        INDEX idx_refresh_tokens_token (token)
    )
"#;
