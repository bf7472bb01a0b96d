//! Notes Routes
//!
//! Routes:
//! - GET /api/notes - List all notes
//! - POST /api/notes - Create a note owned by the principal
//! - DELETE /api/notes - Delete every note owned by the principal
//! - GET /api/notes/search - Search notes by body and creation time
//! - GET /api/notes/:id - Get a note
//! - PUT /api/notes/:id - Update a note
//! - DELETE /api/notes/:id - Delete a note

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use axum_extra::extract::WithRejection;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;

use crate::db::NoteSearch;
use crate::middleware::Principal;
use crate::models::{NoteResponse, SearchResponse, SuccessResponse};
use crate::services::NoteInput;
use super::parse_id;
use crate::{AppState, Error, Result};

/// Build note routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/notes",
            get(list_notes).post(create_note).delete(delete_own_notes),
        )
        .route("/notes/search", get(search_notes))
        .route(
            "/notes/:id",
            get(read_note).put(update_note).delete(delete_note),
        )
}

// ============================================================================
// Request Types
// ============================================================================

/// Query parameters of the search endpoint.
#[derive(Debug, Deserialize, Default)]
pub struct SearchParams {
    /// Search term
    pub s: Option<String>,
    /// Lower bound of `created_at` (inclusive)
    pub start: Option<String>,
    /// Upper bound of `created_at` (inclusive)
    pub end: Option<String>,
}

/// Parse a timestamp bound.
///
/// Accepts RFC3339, `YYYY-MM-DD HH:MM:SS` and `YYYY-MM-DD` (all UTC).
fn parse_timestamp(name: &str, value: Option<&str>) -> Result<DateTime<Utc>> {
    let value = value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::Validation(format!("Parameter {} is required!", name)))?;

    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc()))
        .or_else(|_| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .map(|d| d.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc())
        })
        .map_err(|_| Error::Validation(format!("Parameter {} is not a valid timestamp!", name)))
}

impl SearchParams {
    fn into_search(self) -> Result<NoteSearch> {
        let term = self
            .s
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| Error::Validation("Please, insert words to search".to_string()))?;

        Ok(NoteSearch {
            term,
            start: parse_timestamp("start", self.start.as_deref())?,
            end: parse_timestamp("end", self.end.as_deref())?,
        })
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// List all notes.
///
/// GET /api/notes
async fn list_notes(State(state): State<AppState>) -> Result<Json<Vec<NoteResponse>>> {
    Ok(Json(state.notes.list().await?))
}

/// Get a note.
///
/// GET /api/notes/:id
async fn read_note(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<String>, Error>,
) -> Result<Json<NoteResponse>> {
    let id = parse_id("Note", &id)?;
    Ok(Json(state.notes.get(id).await?))
}

/// Create a note owned by the principal.
///
/// POST /api/notes
async fn create_note(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    WithRejection(Json(input), _): WithRejection<Json<NoteInput>, Error>,
) -> Result<(StatusCode, Json<NoteResponse>)> {
    let note = state.notes.create(Some(principal.user_id), input).await?;
    Ok((StatusCode::CREATED, Json(note)))
}

/// Update a note.
///
/// PUT /api/notes/:id
async fn update_note(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<String>, Error>,
    WithRejection(Json(input), _): WithRejection<Json<NoteInput>, Error>,
) -> Result<Json<NoteResponse>> {
    let id = parse_id("Note", &id)?;
    Ok(Json(state.notes.update(id, input).await?))
}

/// Delete a note.
///
/// DELETE /api/notes/:id
async fn delete_note(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<String>, Error>,
) -> Result<Json<SuccessResponse>> {
    let id = parse_id("Note", &id)?;
    state.notes.delete(id).await?;
    Ok(Json(SuccessResponse::new("Note deleted!")))
}

/// Delete every note owned by the principal.
///
/// DELETE /api/notes
async fn delete_own_notes(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<SuccessResponse>> {
    state.notes.delete_owned_by(principal.user_id).await?;
    Ok(Json(SuccessResponse::new("Note deleted!")))
}

/// Search notes.
///
/// GET /api/notes/search?s=term&start=ts&end=ts
///
/// A date-only bound means midnight UTC of that day, so `end=2024-05-01`
/// excludes notes created later on May 1st. Pass `end=2024-05-02` (or a
/// full timestamp) to include the whole day.
async fn search_notes(
    State(state): State<AppState>,
    WithRejection(Query(params), _): WithRejection<Query<SearchParams>, Error>,
) -> Result<Json<SearchResponse>> {
    let search = params.into_search()?;
    let results = state.notes.search(&search).await?;

    Ok(Json(SearchResponse {
        search: search.term,
        results,
    }))
}
