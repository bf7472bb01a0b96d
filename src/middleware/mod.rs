//! Middleware for the notes API.
//!
//! - `principal` - resolves the user a request acts on behalf of

mod principal;

pub use principal::{resolve_principal, Principal, USER_ID_HEADER};
