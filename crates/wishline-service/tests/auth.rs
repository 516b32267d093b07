//! Registration, login, and session integration tests.

mod common;

use common::TestHarness;
use serde_json::json;

// ============================================================================
// Registration
// ============================================================================

#[tokio::test]
async fn register_returns_user_and_token() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/auth/register")
        .json(&json!({
            "name": "Ada",
            "email": "ada@example.com",
            "password": "hunter2hunter2",
        }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["user"]["name"], "Ada");
    assert_eq!(body["user"]["email"], "ada@example.com");
    assert_eq!(body["user"]["is_creator"], false);
    assert!(body["token"].as_str().is_some());
    // Hashes never leave the service.
    assert!(body["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn register_duplicate_email_conflicts() {
    let harness = TestHarness::new();
    harness.register_user("Ada", "ada@example.com").await;

    let response = harness
        .server
        .post("/auth/register")
        .json(&json!({
            "name": "Imposter",
            "email": "ada@example.com",
            "password": "hunter2hunter2",
        }))
        .await;

    response.assert_status(axum::http::StatusCode::CONFLICT);
}

#[tokio::test]
async fn register_short_password_rejected() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/auth/register")
        .json(&json!({
            "name": "Ada",
            "email": "ada@example.com",
            "password": "short",
        }))
        .await;

    response.assert_status(axum::http::StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn register_bad_email_rejected() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/auth/register")
        .json(&json!({
            "name": "Ada",
            "email": "not-an-email",
            "password": "hunter2hunter2",
        }))
        .await;

    response.assert_status(axum::http::StatusCode::UNPROCESSABLE_ENTITY);
}

// ============================================================================
// Login
// ============================================================================

#[tokio::test]
async fn login_with_correct_password_succeeds() {
    let harness = TestHarness::new();
    harness.register_user("Ada", "ada@example.com").await;

    let response = harness
        .server
        .post("/auth/login")
        .json(&json!({
            "email": "ada@example.com",
            "password": "correct horse battery staple",
        }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert!(body["token"].as_str().is_some());
}

#[tokio::test]
async fn login_with_wrong_password_fails() {
    let harness = TestHarness::new();
    harness.register_user("Ada", "ada@example.com").await;

    let response = harness
        .server
        .post("/auth/login")
        .json(&json!({
            "email": "ada@example.com",
            "password": "wrong password entirely",
        }))
        .await;

    response.assert_status_unauthorized();
}

#[tokio::test]
async fn login_unknown_email_fails() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/auth/login")
        .json(&json!({
            "email": "nobody@example.com",
            "password": "correct horse battery staple",
        }))
        .await;

    response.assert_status_unauthorized();
}

// ============================================================================
// Session
// ============================================================================

#[tokio::test]
async fn current_user_returns_profile() {
    let harness = TestHarness::new();
    let (user_id, auth) = harness.register_user("Ada", "ada@example.com").await;

    let response = harness
        .server
        .get("/auth/user")
        .add_header("authorization", auth)
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["user"]["id"], user_id);
}

#[tokio::test]
async fn current_user_without_token_fails() {
    let harness = TestHarness::new();

    let response = harness.server.get("/auth/user").await;

    response.assert_status_unauthorized();
}

#[tokio::test]
async fn garbage_token_rejected() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .get("/auth/user")
        .add_header("authorization", "Bearer not.a.jwt")
        .await;

    response.assert_status_unauthorized();
}
