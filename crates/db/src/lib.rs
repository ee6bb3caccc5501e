//! Postgres persistence for the scheduling engine: pool construction,
//! schema bootstrap, and per-entity repository modules of free functions.

pub mod models;
pub mod repositories;
pub mod schema;

pub mod mock;

use eyre::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};

pub type DbPool = Pool<Postgres>;

const DEFAULT_MAX_CONNECTIONS: u32 = 5;

pub async fn create_pool(database_url: &str) -> Result<DbPool> {
    create_pool_with_size(database_url, DEFAULT_MAX_CONNECTIONS).await
}

/// Pool with an explicit connection cap, for batch jobs that want a
/// smaller footprint than the serving default.
pub async fn create_pool_with_size(database_url: &str, max_connections: u32) -> Result<DbPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    Ok(pool)
}
