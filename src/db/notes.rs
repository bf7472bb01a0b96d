//! Note database queries.
//!
//! Notes are read joined with their owner so the username is always at
//! hand for serialization. Timestamps are written by the application, not
//! by SQLite defaults, so both columns of a new note carry the same instant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tracing::debug;

use crate::{Error, Result};

use super::{is_foreign_key_violation, DbPool};

/// Longest accepted note body, in characters.
pub const NOTE_BODY_MAX_CHARS: usize = 200;

const SELECT_NOTES: &str = r#"
    SELECT n.id, n.body, n.user_id, u.username, n.created_at, n.updated_at
    FROM notes n
    LEFT JOIN users u ON u.id = n.user_id
"#;

// ============================================================================
// Note Types
// ============================================================================

/// Note record from the database, joined with its owner's username.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,
    pub body: String,
    pub user_id: Option<i64>,
    pub username: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a note.
#[derive(Debug, Clone)]
pub struct CreateNote {
    pub body: String,
    pub user_id: Option<i64>,
}

/// Search filter: substring of the body plus an inclusive creation window.
#[derive(Debug, Clone)]
pub struct NoteSearch {
    pub term: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

// ============================================================================
// Note Queries
// ============================================================================

/// Create a new note with both timestamps set to now.
pub async fn create_note(pool: &DbPool, input: CreateNote) -> Result<Note> {
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO notes (body, user_id, created_at, updated_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(&input.body)
    .bind(input.user_id)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .map_err(|e| match input.user_id {
        Some(user_id) if is_foreign_key_violation(&e) => Error::not_found("User", user_id),
        _ => Error::Database(e),
    })?;

    let id = result.last_insert_rowid();
    debug!(note_id = id, user_id = ?input.user_id, "Created note");

    get_note(pool, id).await
}

/// Get a note by ID.
pub async fn get_note(pool: &DbPool, id: i64) -> Result<Note> {
    sqlx::query_as::<_, Note>(&format!("{} WHERE n.id = ?", SELECT_NOTES))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Error::not_found("Note", id))
}

/// List all notes ordered by id.
pub async fn list_notes(pool: &DbPool) -> Result<Vec<Note>> {
    sqlx::query_as::<_, Note>(&format!("{} ORDER BY n.id", SELECT_NOTES))
        .fetch_all(pool)
        .await
        .map_err(Error::Database)
}

/// List the notes owned by a user ordered by id.
pub async fn list_notes_by_user(pool: &DbPool, user_id: i64) -> Result<Vec<Note>> {
    sqlx::query_as::<_, Note>(&format!("{} WHERE n.user_id = ? ORDER BY n.id", SELECT_NOTES))
        .bind(user_id)
        .fetch_all(pool)
        .await
        .map_err(Error::Database)
}

/// Replace the body of a note and refresh `updated_at`.
///
/// `updated_at` never moves backwards, even if the clock does.
pub async fn update_note(pool: &DbPool, id: i64, body: &str) -> Result<Note> {
    let result = sqlx::query(
        r#"
        UPDATE notes
        SET body = ?, updated_at = MAX(updated_at, ?)
        WHERE id = ?
        "#,
    )
    .bind(body)
    .bind(Utc::now())
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(Error::not_found("Note", id));
    }

    get_note(pool, id).await
}

/// Delete a note. Its category associations are removed by cascade.
pub async fn delete_note(pool: &DbPool, id: i64) -> Result<()> {
    let result = sqlx::query("DELETE FROM notes WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::not_found("Note", id));
    }

    Ok(())
}

/// Delete every note owned by a user. Returns how many were removed.
pub async fn delete_notes_by_user(pool: &DbPool, user_id: i64) -> Result<u64> {
    let result = sqlx::query("DELETE FROM notes WHERE user_id = ?")
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// Case-insensitive substring search over note bodies, limited to notes
/// created within `[start, end]`.
///
/// SQLite's `LIKE` only folds ASCII, so the window is selected in SQL and
/// the term is matched on Unicode-lowercased bodies.
pub async fn search_notes(pool: &DbPool, search: &NoteSearch) -> Result<Vec<Note>> {
    let candidates = sqlx::query_as::<_, Note>(&format!(
        "{} WHERE n.created_at BETWEEN ? AND ? ORDER BY n.id",
        SELECT_NOTES
    ))
    .bind(search.start)
    .bind(search.end)
    .fetch_all(pool)
    .await?;

    let term = search.term.to_lowercase();

    Ok(candidates
        .into_iter()
        .filter(|note| note.body.to_lowercase().contains(&term))
        .collect())
}
