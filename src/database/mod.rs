// src/database/mod.rs
mod postgres;
#[cfg(test)]
pub mod memory;

use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use uuid::Uuid;

use crate::error::AppError;

pub use postgres::PgStore;

/// A stored document family (clients, receipts, admin receipts).
pub trait Entity: Send + Sync + Sized + 'static {
    /// Content written by create/update, without identity or timestamps.
    type Draft: Send + 'static;
    /// Search criteria understood by `Repository::search`.
    type Filter: Send + Sync + 'static;
    /// Human-readable name used in error messages.
    const LABEL: &'static str;
}

/// CRUD + search over one entity family.
///
/// `find`/`update` return `None` and `delete` returns `false` when the record
/// does not exist; `Err` is reserved for storage failures.
#[async_trait]
pub trait Repository<E: Entity>: Send + Sync {
    async fn create(&self, draft: E::Draft) -> Result<E, AppError>;
    async fn find(&self, id: Uuid) -> Result<Option<E>, AppError>;
    /// Most recently updated first.
    async fn search(&self, filter: &E::Filter) -> Result<Vec<E>, AppError>;
    async fn update(&self, id: Uuid, draft: E::Draft) -> Result<Option<E>, AppError>;
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}

pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    tracing::info!(max_connections, "Connecting to PostgreSQL");
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(30))
        .idle_timeout(Duration::from_secs(600))
        .connect(database_url)
        .await?;
    tracing::info!("PostgreSQL connection pool established");
    Ok(pool)
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    tracing::info!("Running database migrations");
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("Database migrations completed");
    Ok(())
}
