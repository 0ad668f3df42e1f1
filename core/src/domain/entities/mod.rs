//! Domain entities representing core business objects.

pub mod token;

// Re-export commonly used types
pub use token::{RefreshToken, RefreshTokenId, MIN_REFRESH_TOKEN_ID};
