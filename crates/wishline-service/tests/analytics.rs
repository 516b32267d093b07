//! Engagement analytics and dashboard integration tests.

mod common;

use axum::http::StatusCode;
use common::TestHarness;
use serde_json::json;

async fn create_greeting(harness: &TestHarness, auth: &str) -> String {
    let response = harness
        .server
        .post("/v1/greetings")
        .add_header("authorization", auth.to_string())
        .json(&json!({
            "title": "Tracked",
            "greeting_type": "video",
            "occasion_type": "birthday",
            "content_type": "personal",
            "content_data": {},
        }))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    body["greeting"]["id"].as_str().unwrap().to_string()
}

// ============================================================================
// Counters
// ============================================================================

#[tokio::test]
async fn greeting_creation_seeds_zeroed_analytics() {
    let harness = TestHarness::new();
    let (_, auth) = harness.register_creator("Cleo", "cleo@example.com").await;
    let id = create_greeting(&harness, &auth).await;

    let response = harness
        .server
        .get(&format!("/v1/greetings/{id}/analytics"))
        .add_header("authorization", auth)
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["analytics"]["views_count"], 0);
    assert_eq!(body["analytics"]["shares_count"], 0);
    assert_eq!(body["analytics"]["likes_count"], 0);
}

#[tokio::test]
async fn view_increments_touch_only_views() {
    let harness = TestHarness::new();
    let (_, auth) = harness.register_creator("Cleo", "cleo@example.com").await;
    let id = create_greeting(&harness, &auth).await;

    for _ in 0..2 {
        harness
            .server
            .post(&format!("/v1/greetings/{id}/analytics/views"))
            .add_header("authorization", auth.clone())
            .await
            .assert_status_ok();
    }

    let response = harness
        .server
        .get(&format!("/v1/greetings/{id}/analytics"))
        .add_header("authorization", auth)
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["analytics"]["views_count"], 2);
    assert_eq!(body["analytics"]["shares_count"], 0);
    assert_eq!(body["analytics"]["likes_count"], 0);
}

#[tokio::test]
async fn shares_and_likes_have_their_own_counters() {
    let harness = TestHarness::new();
    let (_, auth) = harness.register_creator("Cleo", "cleo@example.com").await;
    let id = create_greeting(&harness, &auth).await;

    harness
        .server
        .post(&format!("/v1/greetings/{id}/analytics/shares"))
        .add_header("authorization", auth.clone())
        .await
        .assert_status_ok();
    let response = harness
        .server
        .post(&format!("/v1/greetings/{id}/analytics/likes"))
        .add_header("authorization", auth.clone())
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["analytics"]["views_count"], 0);
    assert_eq!(body["analytics"]["shares_count"], 1);
    assert_eq!(body["analytics"]["likes_count"], 1);
}

#[tokio::test]
async fn increment_on_unknown_greeting_not_found() {
    let harness = TestHarness::new();
    let (_, auth) = harness.register_user("Ada", "ada@example.com").await;

    let response = harness
        .server
        .post(&format!(
            "/v1/greetings/{}/analytics/views",
            ulid::Ulid::new()
        ))
        .add_header("authorization", auth)
        .await;

    response.assert_status_not_found();
}

// ============================================================================
// Engagement payload
// ============================================================================

#[tokio::test]
async fn creator_replaces_engagement_payload() {
    let harness = TestHarness::new();
    let (_, auth) = harness.register_creator("Cleo", "cleo@example.com").await;
    let id = create_greeting(&harness, &auth).await;

    let response = harness
        .server
        .put(&format!("/v1/greetings/{id}/analytics/engagement"))
        .add_header("authorization", auth)
        .json(&json!({ "engagement_data": { "watch_seconds": 42 } }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "Engagement data updated");
    assert_eq!(body["analytics"]["engagement_data"]["watch_seconds"], 42);
}

#[tokio::test]
async fn non_creator_cannot_replace_engagement_payload() {
    let harness = TestHarness::new();
    let (_, auth) = harness.register_creator("Cleo", "cleo@example.com").await;
    let (_, eve_auth) = harness.register_user("Eve", "eve@example.com").await;
    let id = create_greeting(&harness, &auth).await;

    let response = harness
        .server
        .put(&format!("/v1/greetings/{id}/analytics/engagement"))
        .add_header("authorization", eve_auth)
        .json(&json!({ "engagement_data": {} }))
        .await;

    response.assert_status_forbidden();
}

// ============================================================================
// Dashboard
// ============================================================================

#[tokio::test]
async fn creator_dashboard_aggregates_engagement() {
    let harness = TestHarness::new();
    let (_, auth) = harness.register_creator("Cleo", "cleo@example.com").await;
    let id = create_greeting(&harness, &auth).await;

    harness
        .server
        .post(&format!("/v1/greetings/{id}/analytics/views"))
        .add_header("authorization", auth.clone())
        .await
        .assert_status_ok();

    let response = harness
        .server
        .get("/v1/analytics/dashboard")
        .add_header("authorization", auth)
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["role"], "creator");
    assert_eq!(body["total_greetings"], 1);
    assert_eq!(body["engagement"]["views"], 1);
    assert_eq!(body["top_greetings"][0]["id"], id);
}

#[tokio::test]
async fn celebrant_dashboard_counts_received_greetings() {
    let harness = TestHarness::new();
    let (_, creator_auth) = harness.register_creator("Cleo", "cleo@example.com").await;
    let (bob_id, bob_auth) = harness.register_user("Bob", "bob@example.com").await;
    let id = create_greeting(&harness, &creator_auth).await;

    harness
        .server
        .post(&format!("/v1/greetings/{id}/recipients"))
        .add_header("authorization", creator_auth)
        .json(&json!({ "recipient_id": bob_id }))
        .await
        .assert_status_ok();

    let response = harness
        .server
        .get("/v1/analytics/dashboard")
        .add_header("authorization", bob_auth)
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["role"], "celebrant");
    assert_eq!(body["greetings_received"], 1);
}

#[tokio::test]
async fn dashboard_rejects_unknown_period() {
    let harness = TestHarness::new();
    let (_, auth) = harness.register_user("Ada", "ada@example.com").await;

    let response = harness
        .server
        .get("/v1/analytics/dashboard?period=decade")
        .add_header("authorization", auth)
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

// ============================================================================
// Platform totals
// ============================================================================

#[tokio::test]
async fn platform_totals_require_admin_key() {
    let harness = TestHarness::new();
    let (_, auth) = harness.register_user("Ada", "ada@example.com").await;

    let response = harness
        .server
        .get("/v1/analytics/platform")
        .add_header("authorization", auth)
        .await;

    response.assert_status_unauthorized();
}

#[tokio::test]
async fn platform_totals_count_users_and_greetings() {
    let harness = TestHarness::new();
    let (_, auth) = harness.register_creator("Cleo", "cleo@example.com").await;
    harness.register_user("Ada", "ada@example.com").await;
    create_greeting(&harness, &auth).await;

    let response = harness
        .server
        .get("/v1/analytics/platform")
        .add_header("x-admin-key", harness.admin_api_key.clone())
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["platform"]["total_users"], 2);
    assert_eq!(body["platform"]["total_creators"], 1);
    assert_eq!(body["platform"]["total_greetings"], 1);
    assert_eq!(body["platform"]["total_views"], 0);
}
