//! Application state for the notes API.
//!
//! Contains the shared state that is passed to all handlers.

use tracing::{info, warn};

use crate::config::Config;
use crate::db::{self, DbPool, PoolConfig};
use crate::services::{CategoryService, NoteService, UserService};
use crate::Result;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: DbPool,
    /// Note management service.
    pub notes: NoteService,
    /// User and profile management service.
    pub users: UserService,
    /// Category management service.
    pub categories: CategoryService,
    /// User id assumed for requests that do not name one.
    pub default_user_id: i64,
}

impl AppState {
    /// Open the database described by `config`, apply the schema and make
    /// sure the default user exists.
    pub async fn new(config: &Config) -> Result<Self> {
        let pool_config = PoolConfig::with_max_connections(config.database.max_connections);
        let db = db::init_pool_with(&config.database.url, pool_config).await?;

        db::initialize_schema(&db).await?;

        let principal = &config.principal;
        match db::ensure_user(&db, principal.default_user_id, &principal.default_username).await {
            Ok(user) => info!(user_id = user.id, username = %user.username, "Default user ready"),
            Err(err) => warn!(
                user_id = principal.default_user_id,
                error = %err,
                "Default user unavailable; requests without X-User-Id cannot create notes"
            ),
        }

        Ok(Self::from_pool(db, principal.default_user_id))
    }

    /// Build the state around an already initialized pool.
    pub fn from_pool(db: DbPool, default_user_id: i64) -> Self {
        Self {
            notes: NoteService::new(db.clone()),
            users: UserService::new(db.clone()),
            categories: CategoryService::new(db.clone()),
            db,
            default_user_id,
        }
    }

    /// Close the pool, waiting for in-flight connections to be returned.
    pub async fn close(&self) {
        self.db.close().await;
        info!("Database pool closed");
    }
}
