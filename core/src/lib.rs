//! # Token Store Core
//!
//! Domain layer for the refresh token store.
//! This crate contains the `RefreshToken` entity, the `TokenRepository`
//! contract, an in-memory repository implementation and the error types
//! shared by every storage backend.

pub mod domain;
pub mod errors;
pub mod repositories;

// Re-export commonly used types for convenience
pub use domain::entities::{RefreshToken, RefreshTokenId};
pub use errors::{DomainError, DomainResult};
pub use repositories::{InMemoryTokenRepository, TokenRepository};
