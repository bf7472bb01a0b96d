//! Categories Routes
//!
//! Routes:
//! - GET /api/categories - List categories
//! - POST /api/categories - Create a category
//! - GET /api/categories/:id - Get a category
//! - PUT /api/categories/:id - Rename a category
//! - DELETE /api/categories/:id - Delete a category

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;

use crate::models::{Category, SuccessResponse};
use super::parse_id;
use crate::{AppState, Error, Result};

/// Build category routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/:id",
            get(read_category).put(rename_category).delete(delete_category),
        )
}

/// Request body for creating or renaming a category.
#[derive(Debug, Deserialize)]
pub struct CategoryRequest {
    pub name: Option<String>,
}

async fn list_categories(State(state): State<AppState>) -> Result<Json<Vec<Category>>> {
    Ok(Json(state.categories.list().await?))
}

async fn read_category(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<String>, Error>,
) -> Result<Json<Category>> {
    let id = parse_id("Category", &id)?;
    Ok(Json(state.categories.get(id).await?))
}

async fn create_category(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<CategoryRequest>, Error>,
) -> Result<(StatusCode, Json<Category>)> {
    let category = state.categories.create(req.name).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

async fn rename_category(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<String>, Error>,
    WithRejection(Json(req), _): WithRejection<Json<CategoryRequest>, Error>,
) -> Result<Json<Category>> {
    let id = parse_id("Category", &id)?;
    Ok(Json(state.categories.rename(id, req.name).await?))
}

async fn delete_category(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<String>, Error>,
) -> Result<Json<SuccessResponse>> {
    let id = parse_id("Category", &id)?;
    state.categories.delete(id).await?;
    Ok(Json(SuccessResponse::new("Category deleted!")))
}
