//! PostgreSQL persistence layer for the learnhub platform.
//!
//! Exposes pool construction, a health check, embedded migrations, the
//! [`models`] structs, and the [`repositories`] that own all SQL.

pub mod models;
pub mod repositories;

use sqlx::postgres::PgPoolOptions;

/// Convenience alias used across the workspace.
pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Verify the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply all embedded migrations.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("Database migrations are up to date");
    Ok(())
}
