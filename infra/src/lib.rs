//! # Infrastructure Layer
//!
//! This crate implements the infrastructure layer of the token store,
//! following Clean Architecture principles. It provides the MySQL
//! implementation of the `TokenRepository` contract defined in `ts_core`.
//!
//! ## Architecture
//!
//! The infrastructure layer contains:
//! - **Database**: connection pool, schema bootstrap and the MySQL token repository
//! - **Logging**: tracing subscriber setup driven by configuration
//!
//! ## Features
//!
//! - `mysql`: Enable MySQL database support (default)

use std::sync::Arc;

use ts_core::repositories::TokenRepository;

// Re-export core types for convenience
pub use ts_core::errors::*;

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

/// Tracing subscriber initialization
pub mod logging;

/// Configuration module for infrastructure services
pub mod config {
    //! Configuration for infrastructure services
    //!
    //! Re-exports the shared configuration types so callers of this crate
    //! need not depend on `ts_shared` directly.

    pub use ts_shared::config::*;
}

pub use logging::init_tracing;

/// Infrastructure service container
#[cfg(feature = "mysql")]
#[derive(Clone)]
pub struct InfrastructureServices {
    /// Configuration the services were built from
    pub config: config::AppConfig,
    /// Shared database connection pool
    pub pool: database::DatabasePool,
    /// Token store backed by the pool
    pub token_repository: Arc<dyn TokenRepository>,
}

/// Initialize infrastructure services from layered configuration
///
/// This function:
/// - Loads `.env` files and the layered `AppConfig`
/// - Creates the database connection pool
/// - Creates the refresh token schema if missing
/// - Builds the MySQL token repository
#[cfg(feature = "mysql")]
pub async fn initialize() -> Result<InfrastructureServices, InfrastructureError> {
    let config = config::AppConfig::load()?;
    initialize_with(config).await
}

/// Initialize infrastructure services from an explicit configuration
#[cfg(feature = "mysql")]
pub async fn initialize_with(
    config: config::AppConfig,
) -> Result<InfrastructureServices, InfrastructureError> {
    tracing::info!(
        environment = %config.environment,
        "Initializing infrastructure services..."
    );

    let pool = database::DatabasePool::new(config.database.clone()).await?;
    pool.run_migrations().await?;

    let token_repository: Arc<dyn TokenRepository> = Arc::new(
        database::MySqlTokenRepository::new(pool.get_pool().clone()),
    );

    tracing::info!("Infrastructure services initialized successfully");

    Ok(InfrastructureServices {
        config,
        pool,
        token_repository,
    })
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration could not be loaded
    #[error(transparent)]
    Settings(#[from] config::ConfigError),

    /// Tracing subscriber setup error
    #[error("Logging error: {0}")]
    Logging(String),

    /// Error raised by a repository operation
    #[error(transparent)]
    Domain(#[from] DomainError),
}
