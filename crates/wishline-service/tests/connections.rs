//! Connection lifecycle integration tests.

mod common;

use axum::http::StatusCode;
use common::TestHarness;
use serde_json::json;

async fn send_request(
    harness: &TestHarness,
    auth: &str,
    receiver_id: &str,
) -> serde_json::Value {
    let response = harness
        .server
        .post("/v1/connections")
        .add_header("authorization", auth.to_string())
        .json(&json!({ "receiver_id": receiver_id }))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "Connection request sent");
    body["connection"].clone()
}

// ============================================================================
// Requests
// ============================================================================

#[tokio::test]
async fn request_starts_pending() {
    let harness = TestHarness::new();
    let (_, ada_auth) = harness.register_user("Ada", "ada@example.com").await;
    let (bob_id, _) = harness.register_user("Bob", "bob@example.com").await;

    let body = send_request(&harness, &ada_auth, &bob_id).await;

    assert_eq!(body["status"], "pending");
    assert!(body["connected_at"].is_null());
    assert!(!body["id"].as_str().unwrap_or_default().is_empty());
}

#[tokio::test]
async fn self_request_rejected() {
    let harness = TestHarness::new();
    let (ada_id, ada_auth) = harness.register_user("Ada", "ada@example.com").await;

    let response = harness
        .server
        .post("/v1/connections")
        .add_header("authorization", ada_auth)
        .json(&json!({ "receiver_id": ada_id }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn duplicate_request_conflicts_in_either_direction() {
    let harness = TestHarness::new();
    let (ada_id, ada_auth) = harness.register_user("Ada", "ada@example.com").await;
    let (bob_id, bob_auth) = harness.register_user("Bob", "bob@example.com").await;

    send_request(&harness, &ada_auth, &bob_id).await;

    // Same direction again.
    let response = harness
        .server
        .post("/v1/connections")
        .add_header("authorization", ada_auth)
        .json(&json!({ "receiver_id": bob_id }))
        .await;
    response.assert_status(StatusCode::CONFLICT);

    // Reverse direction.
    let response = harness
        .server
        .post("/v1/connections")
        .add_header("authorization", bob_auth)
        .json(&json!({ "receiver_id": ada_id }))
        .await;
    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn request_to_unknown_user_not_found() {
    let harness = TestHarness::new();
    let (_, ada_auth) = harness.register_user("Ada", "ada@example.com").await;

    let response = harness
        .server
        .post("/v1/connections")
        .add_header("authorization", ada_auth)
        .json(&json!({ "receiver_id": uuid::Uuid::new_v4().to_string() }))
        .await;

    response.assert_status_not_found();
}

// ============================================================================
// Accept / Decline
// ============================================================================

#[tokio::test]
async fn receiver_accepts_and_connected_at_is_set() {
    let harness = TestHarness::new();
    let (_, ada_auth) = harness.register_user("Ada", "ada@example.com").await;
    let (bob_id, bob_auth) = harness.register_user("Bob", "bob@example.com").await;

    let conn = send_request(&harness, &ada_auth, &bob_id).await;
    let conn_id = conn["id"].as_str().unwrap();

    let response = harness
        .server
        .post(&format!("/v1/connections/{conn_id}/accept"))
        .add_header("authorization", bob_auth)
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "Connection request accepted");
    assert_eq!(body["connection"]["status"], "accepted");
    assert!(body["connection"]["connected_at"].as_str().is_some());
}

#[tokio::test]
async fn requester_cannot_accept_own_request() {
    let harness = TestHarness::new();
    let (_, ada_auth) = harness.register_user("Ada", "ada@example.com").await;
    let (bob_id, _) = harness.register_user("Bob", "bob@example.com").await;

    let conn = send_request(&harness, &ada_auth, &bob_id).await;
    let conn_id = conn["id"].as_str().unwrap();

    let response = harness
        .server
        .post(&format!("/v1/connections/{conn_id}/accept"))
        .add_header("authorization", ada_auth.clone())
        .await;
    response.assert_status_forbidden();

    // Unchanged.
    let response = harness
        .server
        .get(&format!("/v1/connections/{conn_id}"))
        .add_header("authorization", ada_auth)
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["connection"]["status"], "pending");
}

#[tokio::test]
async fn accept_after_decline_conflicts() {
    let harness = TestHarness::new();
    let (_, ada_auth) = harness.register_user("Ada", "ada@example.com").await;
    let (bob_id, bob_auth) = harness.register_user("Bob", "bob@example.com").await;

    let conn = send_request(&harness, &ada_auth, &bob_id).await;
    let conn_id = conn["id"].as_str().unwrap();

    harness
        .server
        .post(&format!("/v1/connections/{conn_id}/decline"))
        .add_header("authorization", bob_auth.clone())
        .await
        .assert_status_ok();

    let response = harness
        .server
        .post(&format!("/v1/connections/{conn_id}/accept"))
        .add_header("authorization", bob_auth)
        .await;
    response.assert_status(StatusCode::CONFLICT);
}

// ============================================================================
// Block / Unblock
// ============================================================================

#[tokio::test]
async fn either_party_can_block_and_unblock() {
    let harness = TestHarness::new();
    let (_, ada_auth) = harness.register_user("Ada", "ada@example.com").await;
    let (bob_id, bob_auth) = harness.register_user("Bob", "bob@example.com").await;

    let conn = send_request(&harness, &ada_auth, &bob_id).await;
    let conn_id = conn["id"].as_str().unwrap();

    harness
        .server
        .post(&format!("/v1/connections/{conn_id}/accept"))
        .add_header("authorization", bob_auth.clone())
        .await
        .assert_status_ok();

    let response = harness
        .server
        .post(&format!("/v1/connections/{conn_id}/block"))
        .add_header("authorization", ada_auth.clone())
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "Connection blocked");
    assert_eq!(body["connection"]["status"], "blocked");

    // Lifting the block lands the edge back on accepted.
    let response = harness
        .server
        .post(&format!("/v1/connections/{conn_id}/unblock"))
        .add_header("authorization", ada_auth)
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["connection"]["status"], "accepted");
}

#[tokio::test]
async fn unblock_of_unblocked_connection_conflicts() {
    let harness = TestHarness::new();
    let (_, ada_auth) = harness.register_user("Ada", "ada@example.com").await;
    let (bob_id, _) = harness.register_user("Bob", "bob@example.com").await;

    let conn = send_request(&harness, &ada_auth, &bob_id).await;
    let conn_id = conn["id"].as_str().unwrap();

    let response = harness
        .server
        .post(&format!("/v1/connections/{conn_id}/unblock"))
        .add_header("authorization", ada_auth)
        .await;

    response.assert_status(StatusCode::CONFLICT);
}

// ============================================================================
// Listing and visibility
// ============================================================================

#[tokio::test]
async fn outsider_cannot_see_connection() {
    let harness = TestHarness::new();
    let (_, ada_auth) = harness.register_user("Ada", "ada@example.com").await;
    let (bob_id, _) = harness.register_user("Bob", "bob@example.com").await;
    let (_, eve_auth) = harness.register_user("Eve", "eve@example.com").await;

    let conn = send_request(&harness, &ada_auth, &bob_id).await;
    let conn_id = conn["id"].as_str().unwrap();

    let response = harness
        .server
        .get(&format!("/v1/connections/{conn_id}"))
        .add_header("authorization", eve_auth)
        .await;

    response.assert_status_forbidden();
}

#[tokio::test]
async fn friends_lists_only_accepted() {
    let harness = TestHarness::new();
    let (_, ada_auth) = harness.register_user("Ada", "ada@example.com").await;
    let (bob_id, bob_auth) = harness.register_user("Bob", "bob@example.com").await;
    let (carol_id, _) = harness.register_user("Carol", "carol@example.com").await;

    let conn = send_request(&harness, &ada_auth, &bob_id).await;
    let conn_id = conn["id"].as_str().unwrap();
    harness
        .server
        .post(&format!("/v1/connections/{conn_id}/accept"))
        .add_header("authorization", bob_auth)
        .await
        .assert_status_ok();

    // A pending request does not make a friend.
    send_request(&harness, &ada_auth, &carol_id).await;

    let response = harness
        .server
        .get("/v1/connections/friends")
        .add_header("authorization", ada_auth)
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let friends = body["friends"].as_array().unwrap();
    assert_eq!(friends.len(), 1);
    assert_eq!(friends[0]["user_id"], bob_id);
    assert_eq!(friends[0]["name"], "Bob");
}

#[tokio::test]
async fn pending_lists_only_incoming_requests() {
    let harness = TestHarness::new();
    let (_, ada_auth) = harness.register_user("Ada", "ada@example.com").await;
    let (bob_id, bob_auth) = harness.register_user("Bob", "bob@example.com").await;

    send_request(&harness, &ada_auth, &bob_id).await;

    // The requester has no incoming requests.
    let response = harness
        .server
        .get("/v1/connections/pending")
        .add_header("authorization", ada_auth)
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["connections"].as_array().unwrap().len(), 0);

    // The receiver sees it.
    let response = harness
        .server
        .get("/v1/connections/pending")
        .add_header("authorization", bob_auth)
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["connections"].as_array().unwrap().len(), 1);
}
