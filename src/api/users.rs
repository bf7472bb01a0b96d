//! Users Routes
//!
//! Routes:
//! - POST /api/users - Create a user with its profile
//! - GET /api/user/:id - Get a user with biography and notes
//! - DELETE /api/user/:id - Delete a user, its profile and notes
//! - GET /api/user/:id/profile - Get a user's profile
//! - PUT /api/user/:id/profile - Update (or create) a user's profile

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::WithRejection;

use crate::db::ProfileFields;
use crate::models::{Profile, SuccessResponse, UserResponse};
use crate::services::NewUser;
use super::parse_id;
use crate::{AppState, Error, Result};

/// Build user routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(create_user))
        .route("/user/:id", get(read_user).delete(delete_user))
        .route("/user/:id/profile", get(read_profile).put(update_profile))
}

/// Create a user.
///
/// POST /api/users
async fn create_user(
    State(state): State<AppState>,
    WithRejection(Json(input), _): WithRejection<Json<NewUser>, Error>,
) -> Result<(StatusCode, Json<UserResponse>)> {
    let user = state.users.create(input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Get a user.
///
/// GET /api/user/:id
async fn read_user(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<String>, Error>,
) -> Result<Json<UserResponse>> {
    let id = parse_id("User", &id)?;
    Ok(Json(state.users.get(id).await?))
}

/// Delete a user together with everything it owns.
///
/// DELETE /api/user/:id
async fn delete_user(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<String>, Error>,
) -> Result<Json<SuccessResponse>> {
    let id = parse_id("User", &id)?;
    state.users.delete(id).await?;
    Ok(Json(SuccessResponse::new("User deleted!")))
}

/// Get a user's profile.
///
/// GET /api/user/:id/profile
async fn read_profile(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<String>, Error>,
) -> Result<Json<Profile>> {
    let id = parse_id("User", &id)?;
    Ok(Json(state.users.profile(id).await?))
}

/// Update a user's profile. Omitted fields keep their value.
///
/// PUT /api/user/:id/profile
async fn update_profile(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<String>, Error>,
    WithRejection(Json(fields), _): WithRejection<Json<ProfileFields>, Error>,
) -> Result<Json<Profile>> {
    let id = parse_id("User", &id)?;
    Ok(Json(state.users.update_profile(id, fields).await?))
}
