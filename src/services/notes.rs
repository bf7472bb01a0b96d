//! Note service.
//!
//! Owns the note lifecycle and category attachment. Category ids that do
//! not resolve to an existing category are skipped without error; the
//! skip is logged at debug level.

use serde::Deserialize;
use tracing::{debug, info};

use crate::db::{self, CreateNote, DbPool, Note, NoteSearch, NOTE_BODY_MAX_CHARS};
use crate::models::NoteResponse;
use crate::Result;

use super::required_text;

/// Client input for creating or updating a note.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NoteInput {
    pub body: Option<String>,
    /// Category ids to associate with the note. Additive on update.
    pub categories: Option<Vec<i64>>,
}

/// Service for managing notes.
#[derive(Clone)]
pub struct NoteService {
    db: DbPool,
}

impl NoteService {
    /// Create a new note service.
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    /// All notes, serialized.
    pub async fn list(&self) -> Result<Vec<NoteResponse>> {
        let notes = db::list_notes(&self.db).await?;
        hydrate(&self.db, notes).await
    }

    /// A single note, serialized.
    pub async fn get(&self, id: i64) -> Result<NoteResponse> {
        let note = db::get_note(&self.db, id).await?;
        self.serialize(note).await
    }

    /// Create a note owned by `owner`.
    pub async fn create(&self, owner: Option<i64>, input: NoteInput) -> Result<NoteResponse> {
        let body = required_text(input.body, "Body", "Body is required!", NOTE_BODY_MAX_CHARS)?;

        let note = db::create_note(&self.db, CreateNote { body, user_id: owner }).await?;
        info!(note_id = note.id, user_id = ?owner, "Note created");

        let categories = input.categories.unwrap_or_default();
        self.attach_categories(note.id, &categories).await?;

        self.serialize(note).await
    }

    /// Replace a note's body and add any supplied categories.
    pub async fn update(&self, id: i64, input: NoteInput) -> Result<NoteResponse> {
        let body = required_text(input.body, "Body", "Body is required!", NOTE_BODY_MAX_CHARS)?;

        let note = db::update_note(&self.db, id, &body).await?;

        let categories = input.categories.unwrap_or_default();
        self.attach_categories(id, &categories).await?;

        info!(note_id = id, "Note updated");
        self.serialize(note).await
    }

    /// Delete a note.
    pub async fn delete(&self, id: i64) -> Result<()> {
        db::delete_note(&self.db, id).await?;
        info!(note_id = id, "Note deleted");
        Ok(())
    }

    /// Delete every note owned by a user.
    pub async fn delete_owned_by(&self, user_id: i64) -> Result<u64> {
        let removed = db::delete_notes_by_user(&self.db, user_id).await?;
        info!(user_id, removed, "Deleted notes of user");
        Ok(removed)
    }

    /// Search notes by body substring within a creation window.
    pub async fn search(&self, search: &NoteSearch) -> Result<Vec<NoteResponse>> {
        let notes = db::search_notes(&self.db, search).await?;
        debug!(term = %search.term, hits = notes.len(), "Note search");
        hydrate(&self.db, notes).await
    }

    /// Associate categories with a note, skipping unknown ids and
    /// associations that already exist.
    async fn attach_categories(&self, note_id: i64, category_ids: &[i64]) -> Result<()> {
        for &category_id in category_ids {
            if !db::attach_category(&self.db, note_id, category_id).await? {
                debug!(note_id, category_id, "Category unknown or already attached");
            }
        }
        Ok(())
    }

    async fn serialize(&self, note: Note) -> Result<NoteResponse> {
        let categories = db::list_note_categories(&self.db, note.id).await?;
        Ok(NoteResponse::from_note(note, categories))
    }
}

/// Serialize a batch of notes with one category query.
pub(crate) async fn hydrate(pool: &DbPool, notes: Vec<Note>) -> Result<Vec<NoteResponse>> {
    let ids: Vec<i64> = notes.iter().map(|n| n.id).collect();
    let mut categories = db::categories_for_notes(pool, &ids).await?;

    Ok(notes
        .into_iter()
        .map(|note| {
            let cats = categories.remove(&note.id).unwrap_or_default();
            NoteResponse::from_note(note, cats)
        })
        .collect())
}
