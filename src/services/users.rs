//! User service: accounts, their profile and the user serialization.

use serde::Deserialize;
use tracing::info;

use crate::db::{self, CreateUser, DbPool, Profile, ProfileFields};
use crate::models::UserResponse;
use crate::{Error, Result};

use super::notes::hydrate;
use super::{check_length, required_text};

const USERNAME_MAX_CHARS: usize = 100;
const PROFILE_FIELD_MAX_CHARS: usize = 200;

/// Client input for creating a user.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewUser {
    pub username: Option<String>,
    #[serde(flatten)]
    pub profile: ProfileFields,
}

/// Service for managing users and profiles.
#[derive(Clone)]
pub struct UserService {
    db: DbPool,
}

impl UserService {
    /// Create a new user service.
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    /// Create a user together with its profile.
    pub async fn create(&self, input: NewUser) -> Result<UserResponse> {
        let username = required_text(
            input.username,
            "Username",
            "Username is required!",
            USERNAME_MAX_CHARS,
        )?;
        validate_profile(&input.profile)?;

        let (user, profile) =
            db::create_user_with_profile(&self.db, CreateUser { username }, input.profile).await?;
        info!(user_id = user.id, username = %user.username, "User created");

        Ok(UserResponse {
            id: user.id,
            username: user.username,
            biography: profile.biography,
            notes: Vec::new(),
        })
    }

    /// A user with its biography and notes.
    pub async fn get(&self, id: i64) -> Result<UserResponse> {
        let user = db::get_user(&self.db, id).await?;
        let biography = db::get_profile_by_user(&self.db, id)
            .await?
            .map(|p| p.biography)
            .unwrap_or_default();
        let notes = db::list_notes_by_user(&self.db, id).await?;

        Ok(UserResponse {
            id: user.id,
            username: user.username,
            biography,
            notes: hydrate(&self.db, notes).await?,
        })
    }

    /// Delete a user, its profile and all of its notes.
    pub async fn delete(&self, id: i64) -> Result<()> {
        db::delete_user(&self.db, id).await?;
        info!(user_id = id, "User deleted");
        Ok(())
    }

    /// The profile of a user.
    pub async fn profile(&self, user_id: i64) -> Result<Profile> {
        db::get_user(&self.db, user_id).await?;
        db::get_profile_by_user(&self.db, user_id)
            .await?
            .ok_or_else(|| {
                Error::NotFound(format!("Profile for user with id {} not found!", user_id))
            })
    }

    /// Update the supplied profile fields, creating the profile if needed.
    pub async fn update_profile(&self, user_id: i64, fields: ProfileFields) -> Result<Profile> {
        validate_profile(&fields)?;
        let profile = db::upsert_profile(&self.db, user_id, fields).await?;
        info!(user_id, profile_id = profile.id, "Profile updated");
        Ok(profile)
    }
}

fn validate_profile(fields: &ProfileFields) -> Result<()> {
    let named = [
        ("Biography", &fields.biography),
        ("Facebook", &fields.facebook),
        ("Twitter", &fields.twitter),
        ("Instagram", &fields.instagram),
    ];
    for (field, value) in named {
        if let Some(value) = value {
            check_length(value, field, PROFILE_FIELD_MAX_CHARS)?;
        }
    }
    Ok(())
}
