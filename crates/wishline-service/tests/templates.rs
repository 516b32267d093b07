//! Template catalog integration tests.

mod common;

use common::TestHarness;
use serde_json::json;

async fn create_template(
    harness: &TestHarness,
    auth: &str,
    name: &str,
    category: &str,
) -> serde_json::Value {
    let response = harness
        .server
        .post("/v1/templates")
        .add_header("authorization", auth.to_string())
        .json(&json!({
            "name": name,
            "category": category,
            "content_structure": { "slots": ["intro", "message"] },
        }))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "Template created");
    body["template"].clone()
}

// ============================================================================
// Creation and ownership
// ============================================================================

#[tokio::test]
async fn creator_publishes_template() {
    let harness = TestHarness::new();
    let (creator_id, auth) = harness.register_creator("Cleo", "cleo@example.com").await;

    let body = create_template(&harness, &auth, "Confetti", "birthday").await;

    assert_eq!(body["name"], "Confetti");
    assert_eq!(body["category"], "birthday");
    assert_eq!(body["creator_id"], creator_id);
    assert_eq!(body["usage_count"], 0);
}

#[tokio::test]
async fn plain_user_cannot_publish() {
    let harness = TestHarness::new();
    let (_, auth) = harness.register_user("Paul", "paul@example.com").await;

    let response = harness
        .server
        .post("/v1/templates")
        .add_header("authorization", auth)
        .json(&json!({
            "name": "Nope",
            "category": "birthday",
            "content_structure": {},
        }))
        .await;

    response.assert_status_forbidden();
}

#[tokio::test]
async fn only_the_author_edits_or_deletes() {
    let harness = TestHarness::new();
    let (_, auth) = harness.register_creator("Cleo", "cleo@example.com").await;
    let (_, other_auth) = harness.register_creator("Carl", "carl@example.com").await;
    let template = create_template(&harness, &auth, "Confetti", "birthday").await;
    let id = template["id"].as_str().unwrap();

    harness
        .server
        .put(&format!("/v1/templates/{id}"))
        .add_header("authorization", other_auth.clone())
        .json(&json!({ "name": "Hijacked" }))
        .await
        .assert_status_forbidden();

    harness
        .server
        .delete(&format!("/v1/templates/{id}"))
        .add_header("authorization", other_auth)
        .await
        .assert_status_forbidden();
}

// ============================================================================
// Categories
// ============================================================================

#[tokio::test]
async fn category_is_normalized_and_browsable() {
    let harness = TestHarness::new();
    let (_, auth) = harness.register_creator("Cleo", "cleo@example.com").await;

    let body = create_template(&harness, &auth, "Caps", "  BIRTHDAY ").await;
    assert_eq!(body["category"], "birthday");

    let response = harness
        .server
        .get("/v1/templates/category/birthday")
        .add_header("authorization", auth)
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["templates"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn recategorizing_moves_the_template() {
    let harness = TestHarness::new();
    let (_, auth) = harness.register_creator("Cleo", "cleo@example.com").await;
    let template = create_template(&harness, &auth, "Mover", "birthday").await;
    let id = template["id"].as_str().unwrap();

    harness
        .server
        .put(&format!("/v1/templates/{id}"))
        .add_header("authorization", auth.clone())
        .json(&json!({ "category": "holiday" }))
        .await
        .assert_status_ok();

    let response = harness
        .server
        .get("/v1/templates/category/birthday")
        .add_header("authorization", auth.clone())
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["templates"].as_array().unwrap().len(), 0);

    let response = harness
        .server
        .get("/v1/templates/category/holiday")
        .add_header("authorization", auth)
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["templates"].as_array().unwrap().len(), 1);
}

// ============================================================================
// Usage and recommendations
// ============================================================================

#[tokio::test]
async fn using_a_template_bumps_its_count() {
    let harness = TestHarness::new();
    let (_, auth) = harness.register_creator("Cleo", "cleo@example.com").await;
    let template = create_template(&harness, &auth, "Popular", "birthday").await;
    let id = template["id"].as_str().unwrap();

    let response = harness
        .server
        .post(&format!("/v1/templates/{id}/use"))
        .add_header("authorization", auth)
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["template"]["usage_count"], 1);
}

#[tokio::test]
async fn premium_template_requires_verified_creator() {
    let harness = TestHarness::new();
    let (_, auth) = harness.register_creator("Cleo", "cleo@example.com").await;
    let (_, fan_auth) = harness.register_user("Fan", "fan@example.com").await;

    let response = harness
        .server
        .post("/v1/templates")
        .add_header("authorization", auth)
        .json(&json!({
            "name": "Gold",
            "category": "birthday",
            "content_structure": {},
            "is_premium": true,
        }))
        .await;
    response.assert_status_ok();
    let template: serde_json::Value = response.json();
    let id = template["template"]["id"].as_str().unwrap();

    let response = harness
        .server
        .post(&format!("/v1/templates/{id}/use"))
        .add_header("authorization", fan_auth)
        .await;

    response.assert_status_forbidden();
}

#[tokio::test]
async fn recommended_ranks_by_usage() {
    let harness = TestHarness::new();
    let (_, auth) = harness.register_creator("Cleo", "cleo@example.com").await;
    create_template(&harness, &auth, "Quiet", "birthday").await;
    let busy = create_template(&harness, &auth, "Busy", "holiday").await;
    let busy_id = busy["id"].as_str().unwrap();

    for _ in 0..3 {
        harness
            .server
            .post(&format!("/v1/templates/{busy_id}/use"))
            .add_header("authorization", auth.clone())
            .await
            .assert_status_ok();
    }

    let response = harness
        .server
        .get("/v1/templates/recommended")
        .add_header("authorization", auth)
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let templates = body["templates"].as_array().unwrap();
    assert!(templates.len() >= 2);
    assert_eq!(templates[0]["id"], busy["id"]);
    assert_eq!(templates[0]["usage_count"], 3);
}
