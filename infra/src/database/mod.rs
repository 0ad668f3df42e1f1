//! Database module - MySQL implementations using SQLx
//!
//! This module provides database access layer implementations including:
//! - Connection pool management
//! - Schema bootstrap
//! - The MySQL token repository

pub mod connection;
pub mod mysql;


// Re-export commonly used types
pub use connection::{DatabasePool, PoolStatistics};
pub use mysql::MySqlTokenRepository;
