//! Note transport models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::{Category, Note};

/// Serialized note, including its owner's username and categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteResponse {
    pub id: i64,
    pub body: String,
    pub user_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub username: Option<String>,
    pub categories: Vec<Category>,
}

impl NoteResponse {
    pub fn from_note(note: Note, categories: Vec<Category>) -> Self {
        Self {
            id: note.id,
            body: note.body,
            user_id: note.user_id,
            created_at: note.created_at,
            updated_at: note.updated_at,
            username: note.username,
            categories,
        }
    }
}

/// Response of the search endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub search: String,
    pub results: Vec<NoteResponse>,
}
