//! User transport models.

use serde::{Deserialize, Serialize};

use super::NoteResponse;

/// Serialized user with its profile biography and owned notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    /// Empty when the user has no profile.
    pub biography: String,
    pub notes: Vec<NoteResponse>,
}
