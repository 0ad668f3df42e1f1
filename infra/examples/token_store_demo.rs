//! Example demonstrating the refresh token store
//!
//! Uses MySQL when `DATABASE_URL` is set, the in-memory store otherwise.
//!
//! Run with: cargo run --example token_store_demo

use std::sync::Arc;

use ts_core::domain::entities::token::RefreshToken;
use ts_core::repositories::{InMemoryTokenRepository, TokenRepository};
use ts_infra::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    ts_infra::init_tracing(&config.logging)?;

    let repo: Arc<dyn TokenRepository> = if std::env::var("DATABASE_URL").is_ok() {
        println!("Using MySQL store at {}", config.database.url);
        ts_infra::initialize_with(config).await?.token_repository
    } else {
        println!("DATABASE_URL not set, using in-memory store");
        Arc::new(InMemoryTokenRepository::new())
    };

    println!("\n=== Saving tokens ===");
    let first = repo.save(RefreshToken::new("demo-token-1")).await?;
    let second = repo.save(RefreshToken::new("demo-token-2")).await?;
    println!("Saved ids {:?} and {:?}", first.id, second.id);

    println!("\n=== Looking up by token value ===");
    match repo.find_by_token("demo-token-1").await? {
        Some(token) => println!("Found record {:?}", token.id),
        None => println!("Not found"),
    }
    println!("Unknown token present: {}", repo.find_by_token("missing").await?.is_some());

    println!("\n=== Deleting ===");
    if let Some(id) = first.id {
        repo.delete_by_id(id).await?;
        println!("Record {} present after delete: {}", id, repo.exists_by_id(id).await?);
    }

    println!("Remaining records: {}", repo.count().await?);
    repo.delete_all().await?;

    Ok(())
}
