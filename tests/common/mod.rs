//! Common test utilities and helpers.

#![allow(dead_code)]

use axum::Router;
use axum_test::TestServer;
use notes_api::db::{self, DbPool};
use notes_api::{api, AppState};

/// User id that requests without `X-User-Id` act as.
pub const DEFAULT_USER_ID: i64 = 1;
pub const DEFAULT_USERNAME: &str = "tester";

/// Set up a fresh in-memory database with the schema applied.
pub async fn setup_test_db() -> DbPool {
    let pool = db::init_pool_with(":memory:", db::PoolConfig::test())
        .await
        .expect("Failed to init pool");
    db::initialize_schema(&pool)
        .await
        .expect("Failed to initialize schema");
    pool
}

/// Create a user and return its id.
pub async fn create_test_user(pool: &DbPool, username: &str) -> i64 {
    db::create_user(
        pool,
        db::CreateUser {
            username: username.to_string(),
        },
    )
    .await
    .expect("Failed to create test user")
    .id
}

/// Build a test server over a fresh database that already contains the
/// default user.
pub async fn build_test_app() -> (TestServer, DbPool) {
    let pool = setup_test_db().await;
    db::ensure_user(&pool, DEFAULT_USER_ID, DEFAULT_USERNAME)
        .await
        .expect("Failed to create default user");

    let state = AppState::from_pool(pool.clone(), DEFAULT_USER_ID);

    let app = Router::new()
        .merge(api::routes(state.clone()))
        .with_state(state);

    let server = TestServer::new(app).expect("Failed to create test server");

    (server, pool)
}
