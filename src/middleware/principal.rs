//! Principal resolution middleware.
//!
//! Every `/api` request acts on behalf of one user. The caller names it
//! with the `X-User-Id` header; requests without the header fall back to
//! the configured default user. No credential is checked.

use axum::{
    body::Body,
    extract::{Request, State},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};

use crate::{error::Error, AppState};

/// Header carrying the acting user's id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// User context injected into request extensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Principal {
    pub user_id: i64,
}

/// Middleware that resolves the acting user and injects `Principal`.
///
/// # Errors
///
/// Returns 400 Bad Request if `X-User-Id` is present but is not an integer.
///
/// # Example
///
/// ```rust,ignore
/// use axum::{Router, middleware};
/// use notes_api::middleware::resolve_principal;
///
/// let app = Router::new()
///     .route("/api/notes", post(create_note))
///     .layer(middleware::from_fn_with_state(state.clone(), resolve_principal));
/// ```
pub async fn resolve_principal(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Error> {
    let user_id = match req.headers().get(USER_ID_HEADER) {
        Some(value) => parse_user_id(value)?,
        None => state.default_user_id,
    };

    req.extensions_mut().insert(Principal { user_id });
    Ok(next.run(req).await)
}

fn parse_user_id(value: &HeaderValue) -> Result<i64, Error> {
    value
        .to_str()
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .ok_or_else(|| Error::Validation("Invalid X-User-Id header!".to_string()))
}
