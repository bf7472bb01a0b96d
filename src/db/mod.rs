//! Database layer for the notes API.
//!
//! Provides SQLite connection pooling and query modules
//! for all domain entities.

mod categories;
mod notes;
mod pool;
mod profiles;
mod users;

// Re-export all query modules
pub use categories::*;
pub use notes::*;
pub use pool::{create_pool_with_config, database_file, health_check, PoolConfig};
pub use profiles::*;
pub use users::*;

use crate::Result;
use tracing::info;

/// Type alias for the SQLite connection pool.
pub type DbPool = sqlx::SqlitePool;

/// Initialize the database connection pool with default settings.
pub async fn init_pool(url: &str) -> Result<DbPool> {
    init_pool_with(url, PoolConfig::default()).await
}

/// Initialize the database connection pool.
///
/// Creates parent directories of file-backed databases if needed.
pub async fn init_pool_with(url: &str, config: PoolConfig) -> Result<DbPool> {
    let pool = create_pool_with_config(url, config).await?;

    info!("Database pool initialized: {}", url);

    Ok(pool)
}

/// Initialize the database schema.
///
/// Applies the complete schema from schema.sql. Uses IF NOT EXISTS
/// clauses so it's safe to run multiple times.
pub async fn initialize_schema(pool: &DbPool) -> Result<()> {
    let schema = include_str!("../../schema.sql");

    info!("Initializing database schema");

    // Split by semicolons and execute each statement
    for statement in schema.split(';') {
        // Strip comment lines, keeping only actual SQL
        let clean_stmt: String = statement
            .lines()
            .filter(|line| !line.trim().starts_with("--"))
            .collect::<Vec<_>>()
            .join("\n");
        let clean_stmt = clean_stmt.trim();
        if clean_stmt.is_empty() {
            continue;
        }
        sqlx::query(clean_stmt).execute(pool).await?;
    }

    info!("Database schema initialized successfully");

    Ok(())
}

/// Whether a sqlx error is a UNIQUE constraint failure.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

/// Whether a sqlx error is a FOREIGN KEY constraint failure.
pub(crate) fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation())
}
