// subtreerestore/src/store/mod.rs
pub mod assignments;
pub mod content;
pub mod trash;
pub mod tree;

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Creates the connection pool used for the whole run. The tool is strictly
/// sequential, so one connection is all it ever needs.
pub async fn connect_pool(database_url: &str) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(1)
        .connect(database_url)
        .await
        .context("Failed to connect to PostgreSQL")
}
