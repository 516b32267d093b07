//! Common test utilities for wishline integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::Arc;

use axum::Router;
use axum_test::TestServer;
use tempfile::TempDir;

use wishline_core::UserId;
use wishline_service::{create_router, issue_token, AppState, ServiceConfig};
use wishline_store::RocksStore;

const TEST_JWT_SECRET: &str = "wishline-test-secret";
const TEST_ADMIN_KEY: &str = "test-admin-key";

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// Temporary directory for the database (kept alive for test duration).
    pub _temp_dir: TempDir,
    /// The admin API key for moderation requests.
    pub admin_api_key: String,
}

impl TestHarness {
    /// Create a new test harness with a fresh database.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = RocksStore::open(temp_dir.path()).expect("Failed to open store");

        let config = ServiceConfig {
            listen_addr: "127.0.0.1:0".into(),
            data_dir: temp_dir.path().to_string_lossy().to_string(),
            jwt_secret: TEST_JWT_SECRET.into(),
            token_ttl_seconds: 3600,
            admin_api_key: Some(TEST_ADMIN_KEY.into()),
            cors_origins: vec!["*".into()],
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 30,
        };

        let state = AppState::new(Arc::new(store), config);
        let router: Router = create_router(state);

        let server = TestServer::new(router).expect("Failed to create test server");

        Self {
            server,
            _temp_dir: temp_dir,
            admin_api_key: TEST_ADMIN_KEY.into(),
        }
    }

    /// Register a user and return `(user_id, bearer header value)`.
    pub async fn register_user(&self, name: &str, email: &str) -> (String, String) {
        let response = self
            .server
            .post("/auth/register")
            .json(&serde_json::json!({
                "name": name,
                "email": email,
                "password": "correct horse battery staple",
            }))
            .await;
        response.assert_status_ok();

        let body: serde_json::Value = response.json();
        let user_id = body["user"]["id"].as_str().expect("user id").to_string();
        let token = body["token"].as_str().expect("token").to_string();
        (user_id, format!("Bearer {token}"))
    }

    /// Register a user and upgrade them to a creator.
    pub async fn register_creator(&self, name: &str, email: &str) -> (String, String) {
        let (user_id, auth) = self.register_user(name, email).await;

        self.server
            .post("/v1/users/me/upgrade-to-creator")
            .add_header("authorization", auth.clone())
            .await
            .assert_status_ok();

        (user_id, auth)
    }

    /// Mint a bearer header for an arbitrary user ID without registering.
    pub fn auth_header_for(&self, user_id: &UserId) -> String {
        let token = issue_token(user_id, TEST_JWT_SECRET, 3600).expect("Failed to sign token");
        format!("Bearer {token}")
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
