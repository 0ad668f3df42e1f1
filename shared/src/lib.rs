//! Shared configuration types for the token store workspace
//!
//! This crate provides configuration used across all server modules:
//! - Database connection settings
//! - Environment detection
//! - Logging presets
//! - Layered configuration loading

pub mod config;

// Re-export commonly used items at crate root
pub use config::{AppConfig, ConfigError, DatabaseConfig, Environment, LogFormat, LoggingConfig};
