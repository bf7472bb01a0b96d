//! Profile database queries.
//!
//! Profiles hold the social/biographical fields of exactly one user.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{is_foreign_key_violation, is_unique_violation, CreateUser, DbPool, User};

/// Profile record from the database.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Profile {
    pub id: i64,
    pub biography: String,
    pub facebook: String,
    pub twitter: String,
    pub instagram: String,
    #[serde(skip_serializing, default)]
    pub user_id: i64,
}

/// Profile fields supplied by a client. `None` keeps the stored value
/// (or the empty default for a new profile).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileFields {
    pub biography: Option<String>,
    pub facebook: Option<String>,
    pub twitter: Option<String>,
    pub instagram: Option<String>,
}

/// Create a user and its profile atomically.
pub async fn create_user_with_profile(
    pool: &DbPool,
    input: CreateUser,
    fields: ProfileFields,
) -> Result<(User, Profile)> {
    let mut tx = pool.begin().await?;

    let user = sqlx::query_as::<_, User>("INSERT INTO users (username) VALUES (?) RETURNING *")
        .bind(&input.username)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                Error::AlreadyExists(format!("Username {} is already taken!", input.username))
            } else {
                Error::Database(e)
            }
        })?;

    let profile = sqlx::query_as::<_, Profile>(
        r#"
        INSERT INTO profiles (user_id, biography, facebook, twitter, instagram)
        VALUES (?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(user.id)
    .bind(fields.biography.unwrap_or_default())
    .bind(fields.facebook.unwrap_or_default())
    .bind(fields.twitter.unwrap_or_default())
    .bind(fields.instagram.unwrap_or_default())
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok((user, profile))
}

/// Get a profile by ID.
pub async fn get_profile(pool: &DbPool, id: i64) -> Result<Profile> {
    sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Error::not_found("Profile", id))
}

/// Get the profile owned by a user, if any.
pub async fn get_profile_by_user(pool: &DbPool, user_id: i64) -> Result<Option<Profile>> {
    sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE user_id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await
        .map_err(Error::Database)
}

/// Create or update the profile of a user.
///
/// Only the supplied fields are written; a missing profile is created
/// with empty defaults for the rest.
pub async fn upsert_profile(pool: &DbPool, user_id: i64, fields: ProfileFields) -> Result<Profile> {
    sqlx::query_as::<_, Profile>(
        r#"
        INSERT INTO profiles (user_id, biography, facebook, twitter, instagram)
        VALUES (?, COALESCE(?, ''), COALESCE(?, ''), COALESCE(?, ''), COALESCE(?, ''))
        ON CONFLICT(user_id) DO UPDATE SET
            biography = COALESCE(?, biography),
            facebook = COALESCE(?, facebook),
            twitter = COALESCE(?, twitter),
            instagram = COALESCE(?, instagram)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(&fields.biography)
    .bind(&fields.facebook)
    .bind(&fields.twitter)
    .bind(&fields.instagram)
    .bind(&fields.biography)
    .bind(&fields.facebook)
    .bind(&fields.twitter)
    .bind(&fields.instagram)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if is_foreign_key_violation(&e) {
            Error::not_found("User", user_id)
        } else {
            Error::Database(e)
        }
    })
}
