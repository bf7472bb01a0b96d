//! Transport representations.
//!
//! These are the JSON shapes returned by the API, assembled from one or
//! more storage rows.

mod note;
mod user;

pub use note::*;
pub use user::*;

pub use crate::db::{Category, Profile};

use serde::Serialize;

/// `{"success": ...}` body returned by delete endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct SuccessResponse {
    pub success: String,
}

impl SuccessResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: message.into(),
        }
    }
}
