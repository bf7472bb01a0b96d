//! Category database queries and note/category associations.

use std::collections::HashMap;

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{is_unique_violation, DbPool};

const MAX_BATCH: usize = 500;

/// Category record from the database.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// Association row joined with its category.
#[derive(Debug, FromRow)]
struct NoteCategoryRow {
    note_id: i64,
    id: i64,
    name: String,
}

fn map_name_conflict(err: sqlx::Error, name: &str) -> Error {
    if is_unique_violation(&err) {
        Error::AlreadyExists(format!("Category {} already exists!", name))
    } else {
        Error::Database(err)
    }
}

// ============================================================================
// Category Queries
// ============================================================================

/// Create a new category.
pub async fn create_category(pool: &DbPool, name: &str) -> Result<Category> {
    sqlx::query_as::<_, Category>("INSERT INTO categories (name) VALUES (?) RETURNING *")
        .bind(name)
        .fetch_one(pool)
        .await
        .map_err(|e| map_name_conflict(e, name))
}

/// Get a category by ID.
pub async fn get_category(pool: &DbPool, id: i64) -> Result<Category> {
    sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Error::not_found("Category", id))
}

/// List all categories ordered by name.
pub async fn list_categories(pool: &DbPool) -> Result<Vec<Category>> {
    sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY name")
        .fetch_all(pool)
        .await
        .map_err(Error::Database)
}

/// Rename a category.
pub async fn update_category(pool: &DbPool, id: i64, name: &str) -> Result<Category> {
    sqlx::query_as::<_, Category>("UPDATE categories SET name = ? WHERE id = ? RETURNING *")
        .bind(name)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| map_name_conflict(e, name))?
        .ok_or_else(|| Error::not_found("Category", id))
}

/// Delete a category. Its association rows go with it; notes are untouched.
pub async fn delete_category(pool: &DbPool, id: i64) -> Result<()> {
    let result = sqlx::query("DELETE FROM categories WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::not_found("Category", id));
    }

    Ok(())
}

// ============================================================================
// Association Queries
// ============================================================================

/// Associate a category with a note.
///
/// Returns `true` if a new association row was written, `false` if the
/// category does not exist or the pair was already associated.
pub async fn attach_category(pool: &DbPool, note_id: i64, category_id: i64) -> Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT OR IGNORE INTO notes_categories (note_id, category_id)
        SELECT ?, id FROM categories WHERE id = ?
        "#,
    )
    .bind(note_id)
    .bind(category_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Categories of a single note ordered by name.
pub async fn list_note_categories(pool: &DbPool, note_id: i64) -> Result<Vec<Category>> {
    sqlx::query_as::<_, Category>(
        r#"
        SELECT c.id, c.name
        FROM categories c
        JOIN notes_categories nc ON nc.category_id = c.id
        WHERE nc.note_id = ?
        ORDER BY c.name
        "#,
    )
    .bind(note_id)
    .fetch_all(pool)
    .await
    .map_err(Error::Database)
}

/// Categories for a batch of notes, keyed by note id.
///
/// Notes without categories are absent from the map.
pub async fn categories_for_notes(
    pool: &DbPool,
    note_ids: &[i64],
) -> Result<HashMap<i64, Vec<Category>>> {
    let mut by_note: HashMap<i64, Vec<Category>> = HashMap::new();
    if note_ids.is_empty() {
        return Ok(by_note);
    }

    // Stay well below SQLite's bound-parameter limit
    for chunk in note_ids.chunks(MAX_BATCH) {
        let placeholders = vec!["?"; chunk.len()].join(", ");
        let sql = format!(
            r#"
            SELECT nc.note_id, c.id, c.name
            FROM notes_categories nc
            JOIN categories c ON c.id = nc.category_id
            WHERE nc.note_id IN ({})
            ORDER BY c.name
            "#,
            placeholders
        );

        let mut query = sqlx::query_as::<_, NoteCategoryRow>(&sql);
        for id in chunk {
            query = query.bind(*id);
        }

        for row in query.fetch_all(pool).await? {
            by_note.entry(row.note_id).or_default().push(Category {
                id: row.id,
                name: row.name,
            });
        }
    }

    Ok(by_note)
}

/// Number of association rows for a note. Used by tests and diagnostics.
pub async fn count_note_categories(pool: &DbPool, note_id: i64) -> Result<i64> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM notes_categories WHERE note_id = ?")
        .bind(note_id)
        .fetch_one(pool)
        .await?;
    Ok(count)
}
