//! API Routes for the notes API
//!
//! This module combines all API routes into a single router.

mod categories;
mod notes;
pub mod status;
mod users;

use std::num::IntErrorKind;

use axum::Router;

use crate::middleware::resolve_principal;
use crate::{AppState, Error, Result};

/// Build the complete API router.
///
/// Route structure:
/// - /, /health/ready - Health checks
/// - /api/notes/* - Note CRUD and search
/// - /api/users, /api/user/* - Users and profiles
/// - /api/categories/* - Category CRUD
pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Health and status endpoints
        .merge(status::routes())
        // Resource routes, all acting on behalf of a principal
        .nest("/api", api_routes(state))
}

fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(notes::routes())
        .merge(users::routes())
        .merge(categories::routes())
        .layer(axum::middleware::from_fn_with_state(state, resolve_principal))
}

/// Parse the numeric id segment of a resource path.
///
/// An integer too large for `i64` cannot name a stored row, so it is
/// reported as not found. Anything else that is not an integer is a 400.
pub(crate) fn parse_id(kind: &str, raw: &str) -> Result<i64> {
    raw.parse::<i64>().map_err(|err| match err.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => Error::not_found(kind, raw),
        _ => Error::Validation(format!("Invalid {} id: {}", kind.to_lowercase(), raw)),
    })
}
