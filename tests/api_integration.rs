//! API Integration Tests
//!
//! Tests the REST API endpoints using axum-test over an in-memory
//! SQLite database.

mod common;

use axum::body::Bytes;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use chrono::{SecondsFormat, Utc};
use common::{build_test_app, create_test_user, DEFAULT_USERNAME, DEFAULT_USER_ID};
use notes_api::db;
use rstest::rstest;
use serde_json::{json, Value};

fn user_header() -> HeaderName {
    HeaderName::from_static("x-user-id")
}

fn user_id_value(id: i64) -> HeaderValue {
    HeaderValue::from_str(&id.to_string()).unwrap()
}

/// Create a note as the default user and return its JSON.
async fn create_note(server: &TestServer, body: &str) -> Value {
    let response = server.post("/api/notes").json(&json!({ "body": body })).await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Value>()
}

async fn create_category(server: &TestServer, name: &str) -> i64 {
    let response = server
        .post("/api/categories")
        .json(&json!({ "name": name }))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Value>()["id"].as_i64().unwrap()
}

// ============================================================================
// Health Endpoint Tests
// ============================================================================

#[tokio::test]
async fn test_health_check_returns_ok() {
    let (server, _pool) = build_test_app().await;

    let response = server.get("/").await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!({ "status": "OK" }));
}

#[tokio::test]
async fn test_readiness_check_reports_database() {
    let (server, _pool) = build_test_app().await;

    let response = server.get("/health/ready").await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["database"], "up");
}

// ============================================================================
// Note Endpoint Tests
// ============================================================================

#[tokio::test]
async fn test_list_notes_empty() {
    let (server, _pool) = build_test_app().await;

    let response = server.get("/api/notes").await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!([]));
}

#[tokio::test]
async fn test_create_note_serializes_owner_and_timestamps() {
    let (server, _pool) = build_test_app().await;

    let note = create_note(&server, "This is my note").await;

    assert_eq!(note["body"], "This is my note");
    assert_eq!(note["user_id"], DEFAULT_USER_ID);
    assert_eq!(note["username"], DEFAULT_USERNAME);
    assert_eq!(note["categories"], json!([]));
    assert_eq!(note["created_at"], note["updated_at"]);

    let read = server.get(&format!("/api/notes/{}", note["id"])).await;
    read.assert_status_ok();
    assert_eq!(read.json::<Value>(), note);
}

#[rstest]
#[case::missing(json!({}))]
#[case::null(json!({ "body": null }))]
#[case::empty(json!({ "body": "" }))]
#[case::blank(json!({ "body": "   " }))]
#[tokio::test]
async fn test_create_note_requires_body(#[case] payload: Value) {
    let (server, pool) = build_test_app().await;

    let response = server.post("/api/notes").json(&payload).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>(), json!({ "msg": "Body is required!" }));
    assert!(db::list_notes(&pool).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_note_rejects_long_body() {
    let (server, pool) = build_test_app().await;

    let response = server
        .post("/api/notes")
        .json(&json!({ "body": "x".repeat(201) }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(db::list_notes(&pool).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_note_rejects_malformed_json() {
    let (server, _pool) = build_test_app().await;

    let response = server
        .post("/api/notes")
        .content_type("application/json")
        .bytes(Bytes::from_static(b"{\"body\": "))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>()["msg"].is_string());
}

#[tokio::test]
async fn test_create_note_for_unknown_principal() {
    let (server, _pool) = build_test_app().await;

    let response = server
        .post("/api/notes")
        .add_header(user_header(), user_id_value(99))
        .json(&json!({ "body": "Nobody owns me" }))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(
        response.json::<Value>(),
        json!({ "msg": "User with id 99 not found!" })
    );
}

#[tokio::test]
async fn test_invalid_principal_header() {
    let (server, _pool) = build_test_app().await;

    let response = server
        .get("/api/notes")
        .add_header(user_header(), HeaderValue::from_static("not-a-number"))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>(),
        json!({ "msg": "Invalid X-User-Id header!" })
    );
}

#[tokio::test]
async fn test_read_note_not_found() {
    let (server, _pool) = build_test_app().await;

    let response = server.get("/api/notes/999").await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(
        response.json::<Value>(),
        json!({ "msg": "Note with id 999 not found!" })
    );
}

#[rstest]
#[case::note("/api/notes/99999999999999999999", "Note")]
#[case::user("/api/user/99999999999999999999", "User")]
#[case::profile("/api/user/99999999999999999999/profile", "User")]
#[case::category("/api/categories/99999999999999999999", "Category")]
#[tokio::test]
async fn test_out_of_range_id_is_not_found(#[case] path: &str, #[case] kind: &str) {
    let (server, _pool) = build_test_app().await;

    let response = server.get(path).await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(
        response.json::<Value>(),
        json!({ "msg": format!("{} with id 99999999999999999999 not found!", kind) })
    );
}

#[tokio::test]
async fn test_non_numeric_id_is_rejected() {
    let (server, _pool) = build_test_app().await;

    let response = server.get("/api/notes/abc").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>(),
        json!({ "msg": "Invalid note id: abc" })
    );
}

#[tokio::test]
async fn test_update_note() {
    let (server, _pool) = build_test_app().await;
    let note = create_note(&server, "Before").await;

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let response = server
        .put(&format!("/api/notes/{}", note["id"]))
        .json(&json!({ "body": "After" }))
        .await;

    response.assert_status_ok();
    let updated = response.json::<Value>();
    assert_eq!(updated["body"], "After");
    assert_eq!(updated["created_at"], note["created_at"]);
    assert_ne!(updated["updated_at"], note["updated_at"]);
}

#[tokio::test]
async fn test_update_note_validates_before_lookup() {
    let (server, _pool) = build_test_app().await;

    let missing_body = server.put("/api/notes/999").json(&json!({})).await;
    missing_body.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        missing_body.json::<Value>(),
        json!({ "msg": "Body is required!" })
    );

    let missing_note = server
        .put("/api/notes/999")
        .json(&json!({ "body": "text" }))
        .await;
    missing_note.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_note() {
    let (server, _pool) = build_test_app().await;
    let note = create_note(&server, "Short lived").await;
    let uri = format!("/api/notes/{}", note["id"]);

    let response = server.delete(&uri).await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!({ "success": "Note deleted!" }));

    server.get(&uri).await.assert_status(StatusCode::NOT_FOUND);
    server.delete(&uri).await.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_all_notes_of_principal() {
    let (server, pool) = build_test_app().await;
    let other = create_test_user(&pool, "other").await;

    create_note(&server, "mine 1").await;
    create_note(&server, "mine 2").await;
    let theirs = server
        .post("/api/notes")
        .add_header(user_header(), user_id_value(other))
        .json(&json!({ "body": "theirs" }))
        .await;
    theirs.assert_status(StatusCode::CREATED);
    assert_eq!(theirs.json::<Value>()["username"], "other");

    let response = server.delete("/api/notes").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!({ "success": "Note deleted!" }));

    let remaining = server.get("/api/notes").await.json::<Value>();
    let remaining = remaining.as_array().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0]["body"], "theirs");
}

// ============================================================================
// Search Endpoint Tests
// ============================================================================

#[tokio::test]
async fn test_search_returns_all_matching_notes() {
    let (server, _pool) = build_test_app().await;

    let start = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);
    for i in 1..=11 {
        create_note(&server, &format!("This is my note {}", i)).await;
    }
    create_note(&server, "Unrelated").await;
    let end = (Utc::now() + chrono::Duration::seconds(1)).to_rfc3339_opts(SecondsFormat::Secs, true);

    let response = server
        .get("/api/notes/search")
        .add_query_param("s", "note")
        .add_query_param("start", &start)
        .add_query_param("end", &end)
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["search"], "note");

    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 11);
    for (i, note) in results.iter().enumerate() {
        assert_eq!(note["body"], format!("This is my note {}", i + 1));
        assert_eq!(note["username"], DEFAULT_USERNAME);
    }
}

#[tokio::test]
async fn test_search_without_term() {
    let (server, _pool) = build_test_app().await;

    let response = server
        .get("/api/notes/search")
        .add_query_param("start", "2024-01-01")
        .add_query_param("end", "2024-12-31")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>(),
        json!({ "msg": "Please, insert words to search" })
    );
}

#[tokio::test]
async fn test_search_requires_range() {
    let (server, _pool) = build_test_app().await;

    let response = server
        .get("/api/notes/search")
        .add_query_param("s", "note")
        .add_query_param("start", "2024-01-01")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>(),
        json!({ "msg": "Parameter end is required!" })
    );
}

// ============================================================================
// Category Endpoint Tests
// ============================================================================

#[tokio::test]
async fn test_note_category_attachment() {
    let (server, pool) = build_test_app().await;
    let work = create_category(&server, "work").await;

    // Duplicate and unknown ids are tolerated
    let response = server
        .post("/api/notes")
        .json(&json!({ "body": "Quarterly report", "categories": [work, work, 999] }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let note = response.json::<Value>();
    assert_eq!(note["categories"], json!([{ "id": work, "name": "work" }]));

    let note_id = note["id"].as_i64().unwrap();
    assert_eq!(db::count_note_categories(&pool, note_id).await.unwrap(), 1);

    // Update adds without removing
    let urgent = create_category(&server, "urgent").await;
    let updated = server
        .put(&format!("/api/notes/{}", note_id))
        .json(&json!({ "body": "Quarterly report v2", "categories": [urgent] }))
        .await;
    updated.assert_status_ok();
    assert_eq!(
        updated.json::<Value>()["categories"],
        json!([{ "id": urgent, "name": "urgent" }, { "id": work, "name": "work" }])
    );

    // Deleting the note keeps the categories
    server
        .delete(&format!("/api/notes/{}", note_id))
        .await
        .assert_status_ok();
    let categories = server.get("/api/categories").await.json::<Value>();
    assert_eq!(categories.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_category_crud() {
    let (server, _pool) = build_test_app().await;

    let id = create_category(&server, "ideas").await;

    let duplicate = server
        .post("/api/categories")
        .json(&json!({ "name": "ideas" }))
        .await;
    duplicate.assert_status(StatusCode::CONFLICT);

    let missing_name = server.post("/api/categories").json(&json!({})).await;
    missing_name.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        missing_name.json::<Value>(),
        json!({ "msg": "Name is required!" })
    );

    let renamed = server
        .put(&format!("/api/categories/{}", id))
        .json(&json!({ "name": "someday" }))
        .await;
    renamed.assert_status_ok();
    assert_eq!(renamed.json::<Value>(), json!({ "id": id, "name": "someday" }));

    let deleted = server.delete(&format!("/api/categories/{}", id)).await;
    deleted.assert_status_ok();
    assert_eq!(
        deleted.json::<Value>(),
        json!({ "success": "Category deleted!" })
    );

    server
        .get(&format!("/api/categories/{}", id))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

// ============================================================================
// User Endpoint Tests
// ============================================================================

#[tokio::test]
async fn test_read_user_with_notes() {
    let (server, _pool) = build_test_app().await;
    create_note(&server, "first").await;
    create_note(&server, "second").await;

    let response = server.get(&format!("/api/user/{}", DEFAULT_USER_ID)).await;

    response.assert_status_ok();
    let user = response.json::<Value>();
    assert_eq!(user["id"], DEFAULT_USER_ID);
    assert_eq!(user["username"], DEFAULT_USERNAME);
    // The default user was created without a profile
    assert_eq!(user["biography"], "");
    let notes = user["notes"].as_array().unwrap();
    assert_eq!(notes.len(), 2);
    assert_eq!(notes[0]["username"], DEFAULT_USERNAME);
}

#[tokio::test]
async fn test_read_user_not_found() {
    let (server, _pool) = build_test_app().await;

    let response = server.get("/api/user/404").await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(
        response.json::<Value>(),
        json!({ "msg": "User with id 404 not found!" })
    );
}

#[tokio::test]
async fn test_create_user_with_profile() {
    let (server, _pool) = build_test_app().await;

    let response = server
        .post("/api/users")
        .json(&json!({ "username": "grace", "biography": "Compiler person" }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let user = response.json::<Value>();
    assert_eq!(user["username"], "grace");
    assert_eq!(user["biography"], "Compiler person");
    assert_eq!(user["notes"], json!([]));

    let profile = server
        .get(&format!("/api/user/{}/profile", user["id"]))
        .await;
    profile.assert_status_ok();
    let profile = profile.json::<Value>();
    assert_eq!(profile["biography"], "Compiler person");
    assert_eq!(profile["instagram"], "");
    assert!(profile.get("user_id").is_none());

    let duplicate = server
        .post("/api/users")
        .json(&json!({ "username": "grace" }))
        .await;
    duplicate.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_create_user_requires_username() {
    let (server, _pool) = build_test_app().await;

    let response = server.post("/api/users").json(&json!({ "username": "" })).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>(),
        json!({ "msg": "Username is required!" })
    );
}

#[tokio::test]
async fn test_update_profile_creates_missing_profile() {
    let (server, _pool) = build_test_app().await;
    let uri = format!("/api/user/{}/profile", DEFAULT_USER_ID);

    server.get(&uri).await.assert_status(StatusCode::NOT_FOUND);

    let response = server
        .put(&uri)
        .json(&json!({ "twitter": "@tester" }))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["twitter"], "@tester");

    let user = server
        .get(&format!("/api/user/{}", DEFAULT_USER_ID))
        .await
        .json::<Value>();
    assert_eq!(user["biography"], "");
}

#[tokio::test]
async fn test_delete_user_cascades() {
    let (server, _pool) = build_test_app().await;

    let user = server
        .post("/api/users")
        .json(&json!({ "username": "heidi" }))
        .await
        .json::<Value>();
    let user_id = user["id"].as_i64().unwrap();

    let note = server
        .post("/api/notes")
        .add_header(user_header(), user_id_value(user_id))
        .json(&json!({ "body": "heidi's note" }))
        .await;
    note.assert_status(StatusCode::CREATED);
    let note_id = note.json::<Value>()["id"].clone();

    let response = server.delete(&format!("/api/user/{}", user_id)).await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!({ "success": "User deleted!" }));

    server
        .get(&format!("/api/user/{}", user_id))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    server
        .get(&format!("/api/notes/{}", note_id))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    server
        .get(&format!("/api/user/{}/profile", user_id))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
