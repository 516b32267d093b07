//! User, creator profile, and media integration tests.

mod common;

use axum::http::StatusCode;
use common::TestHarness;
use serde_json::json;

// ============================================================================
// Users
// ============================================================================

#[tokio::test]
async fn user_edits_own_record() {
    let harness = TestHarness::new();
    let (user_id, auth) = harness.register_user("Ada", "ada@example.com").await;

    let response = harness
        .server
        .put(&format!("/v1/users/{user_id}"))
        .add_header("authorization", auth)
        .json(&json!({ "name": "Ada L.", "timezone": "Europe/London" }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "Account updated");
    assert_eq!(body["user"]["name"], "Ada L.");
    assert_eq!(body["user"]["timezone"], "Europe/London");
}

#[tokio::test]
async fn user_cannot_edit_someone_else() {
    let harness = TestHarness::new();
    let (ada_id, _) = harness.register_user("Ada", "ada@example.com").await;
    let (_, eve_auth) = harness.register_user("Eve", "eve@example.com").await;

    let response = harness
        .server
        .put(&format!("/v1/users/{ada_id}"))
        .add_header("authorization", eve_auth)
        .json(&json!({ "name": "Pwned" }))
        .await;

    response.assert_status_forbidden();
}

#[tokio::test]
async fn email_change_to_taken_address_conflicts() {
    let harness = TestHarness::new();
    harness.register_user("Ada", "ada@example.com").await;
    let (bob_id, bob_auth) = harness.register_user("Bob", "bob@example.com").await;

    let response = harness
        .server
        .put(&format!("/v1/users/{bob_id}"))
        .add_header("authorization", bob_auth)
        .json(&json!({ "email": "ada@example.com" }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn deleted_user_is_gone_and_can_reregister() {
    let harness = TestHarness::new();
    let (user_id, auth) = harness.register_user("Ada", "ada@example.com").await;

    harness
        .server
        .delete(&format!("/v1/users/{user_id}"))
        .add_header("authorization", auth.clone())
        .await
        .assert_status_ok();

    harness
        .server
        .get("/auth/user")
        .add_header("authorization", auth)
        .await
        .assert_status_not_found();

    // The email index entry went with the user.
    harness.register_user("Ada II", "ada@example.com").await;
}

// ============================================================================
// Roles
// ============================================================================

#[tokio::test]
async fn upgrade_is_idempotent_and_sets_creator_role() {
    let harness = TestHarness::new();
    let (_, auth) = harness.register_user("Ada", "ada@example.com").await;

    for _ in 0..2 {
        let response = harness
            .server
            .post("/v1/users/me/upgrade-to-creator")
            .add_header("authorization", auth.clone())
            .await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["user"]["is_creator"], true);
        assert_eq!(body["user"]["current_role"], "creator");
    }
}

#[tokio::test]
async fn non_creator_cannot_switch_to_creator_role() {
    let harness = TestHarness::new();
    let (_, auth) = harness.register_user("Ada", "ada@example.com").await;

    let response = harness
        .server
        .post("/v1/users/me/switch-role")
        .add_header("authorization", auth)
        .json(&json!({ "role": "creator" }))
        .await;

    response.assert_status_forbidden();
}

// ============================================================================
// Creator profiles
// ============================================================================

#[tokio::test]
async fn upgrade_seeds_a_profile() {
    let harness = TestHarness::new();
    let (creator_id, auth) = harness.register_creator("Cleo", "cleo@example.com").await;

    let response = harness
        .server
        .get(&format!("/v1/creator-profiles/{creator_id}"))
        .add_header("authorization", auth)
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["profile"]["verification_status"], "pending");
    assert_eq!(body["profile"]["rating"], 0.0);
}

#[tokio::test]
async fn second_profile_for_same_user_conflicts() {
    let harness = TestHarness::new();
    let (_, auth) = harness.register_creator("Cleo", "cleo@example.com").await;

    let response = harness
        .server
        .post("/v1/creator-profiles")
        .add_header("authorization", auth)
        .json(&json!({ "bio": "again" }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn owner_updates_profile_others_cannot() {
    let harness = TestHarness::new();
    let (creator_id, auth) = harness.register_creator("Cleo", "cleo@example.com").await;
    let (_, eve_auth) = harness.register_user("Eve", "eve@example.com").await;

    let response = harness
        .server
        .put(&format!("/v1/creator-profiles/{creator_id}"))
        .add_header("authorization", auth)
        .json(&json!({ "bio": "Greetings artisan", "specialties": ["birthday"] }))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "Profile updated");
    assert_eq!(body["profile"]["bio"], "Greetings artisan");

    harness
        .server
        .put(&format!("/v1/creator-profiles/{creator_id}"))
        .add_header("authorization", eve_auth)
        .json(&json!({ "bio": "defaced" }))
        .await
        .assert_status_forbidden();
}

#[tokio::test]
async fn admin_verification_mirrors_to_the_user() {
    let harness = TestHarness::new();
    let (creator_id, auth) = harness.register_creator("Cleo", "cleo@example.com").await;

    let response = harness
        .server
        .post(&format!("/v1/creator-profiles/{creator_id}/verify"))
        .add_header("x-admin-key", harness.admin_api_key.clone())
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["profile"]["verification_status"], "approved");

    let response = harness
        .server
        .get("/auth/user")
        .add_header("authorization", auth)
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["user"]["is_verified_creator"], true);
}

#[tokio::test]
async fn verification_rejects_without_admin_key() {
    let harness = TestHarness::new();
    let (creator_id, auth) = harness.register_creator("Cleo", "cleo@example.com").await;

    let response = harness
        .server
        .post(&format!("/v1/creator-profiles/{creator_id}/verify"))
        .add_header("authorization", auth.clone())
        .await;
    response.assert_status_unauthorized();

    let response = harness
        .server
        .post(&format!("/v1/creator-profiles/{creator_id}/verify"))
        .add_header("x-admin-key", "wrong-key")
        .await;
    response.assert_status_unauthorized();
}

// ============================================================================
// Media
// ============================================================================

#[tokio::test]
async fn media_registration_and_owner_listing() {
    let harness = TestHarness::new();
    let (_, auth) = harness.register_user("Ada", "ada@example.com").await;

    let response = harness
        .server
        .post("/v1/media")
        .add_header("authorization", auth.clone())
        .json(&json!({
            "filename": "a1b2.mp4",
            "original_name": "party.mp4",
            "mime_type": "video/mp4",
            "size_bytes": 1_048_576,
            "file_path": "/uploads/a1b2.mp4",
            "media_type": "video",
            "duration_seconds": 12,
        }))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "Media registered");
    let media = &body["media"];
    assert_eq!(media["media_type"], "video");
    assert_eq!(media["duration_seconds"], 12);

    let response = harness
        .server
        .get("/v1/media")
        .add_header("authorization", auth)
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["media"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn media_is_private_to_its_owner() {
    let harness = TestHarness::new();
    let (_, auth) = harness.register_user("Ada", "ada@example.com").await;
    let (_, eve_auth) = harness.register_user("Eve", "eve@example.com").await;

    let response = harness
        .server
        .post("/v1/media")
        .add_header("authorization", auth)
        .json(&json!({
            "filename": "pic.png",
            "original_name": "pic.png",
            "mime_type": "image/png",
            "size_bytes": 2048,
            "file_path": "/uploads/pic.png",
            "media_type": "image",
        }))
        .await;
    let body: serde_json::Value = response.json();
    let id = body["media"]["id"].as_str().unwrap();

    harness
        .server
        .get(&format!("/v1/media/{id}"))
        .add_header("authorization", eve_auth.clone())
        .await
        .assert_status_forbidden();

    harness
        .server
        .delete(&format!("/v1/media/{id}"))
        .add_header("authorization", eve_auth)
        .await
        .assert_status_forbidden();
}
