//! User database queries.
//!
//! A user owns notes and at most one profile. Deleting a user removes
//! everything it owns in a single transaction.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tracing::debug;

use super::{is_unique_violation, DbPool};

// ============================================================================
// User Types
// ============================================================================

/// User record from the database.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
}

/// Input for creating a new user.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,
}

fn map_username_conflict(err: sqlx::Error, username: &str) -> Error {
    if is_unique_violation(&err) {
        Error::AlreadyExists(format!("Username {} is already taken!", username))
    } else {
        Error::Database(err)
    }
}

// ============================================================================
// User Queries
// ============================================================================

/// Create a new user.
pub async fn create_user(pool: &DbPool, input: CreateUser) -> Result<User> {
    sqlx::query_as::<_, User>("INSERT INTO users (username) VALUES (?) RETURNING *")
        .bind(&input.username)
        .fetch_one(pool)
        .await
        .map_err(|e| map_username_conflict(e, &input.username))
}

/// Create a user with a fixed id unless that id is already taken.
///
/// Returns the user stored under `id` afterwards.
pub async fn ensure_user(pool: &DbPool, id: i64, username: &str) -> Result<User> {
    let inserted = sqlx::query("INSERT INTO users (id, username) VALUES (?, ?) ON CONFLICT(id) DO NOTHING")
        .bind(id)
        .bind(username)
        .execute(pool)
        .await
        .map_err(|e| map_username_conflict(e, username))?;

    if inserted.rows_affected() > 0 {
        debug!(user_id = id, username, "Created user");
    }

    get_user(pool, id).await
}

/// Get a user by ID.
pub async fn get_user(pool: &DbPool, id: i64) -> Result<User> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Error::not_found("User", id))
}

/// List all users.
pub async fn list_users(pool: &DbPool) -> Result<Vec<User>> {
    sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY id")
        .fetch_all(pool)
        .await
        .map_err(Error::Database)
}

/// Delete a user together with its profile and notes.
///
/// The dependent rows are removed explicitly inside the same transaction
/// as the user, so nothing is left behind even if the connection was
/// opened without foreign key enforcement.
pub async fn delete_user(pool: &DbPool, id: i64) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        "DELETE FROM notes_categories WHERE note_id IN (SELECT id FROM notes WHERE user_id = ?)",
    )
    .bind(id)
    .execute(&mut *tx)
    .await?;

    let notes = sqlx::query("DELETE FROM notes WHERE user_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM profiles WHERE user_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    if result.rows_affected() == 0 {
        // Dropping the transaction rolls back the dependent deletes
        return Err(Error::not_found("User", id));
    }

    tx.commit().await?;

    debug!(
        user_id = id,
        notes_removed = notes.rows_affected(),
        "Deleted user"
    );

    Ok(())
}
