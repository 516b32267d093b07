//! Registration, login, and session handlers.

use std::sync::Arc;

use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use wishline_core::User;
use wishline_store::Store;

use super::users::UserResponse;
use crate::auth::{issue_token, AuthUser};
use crate::error::ApiError;
use crate::state::AppState;

/// Registration request.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Plaintext password (hashed before storage).
    pub password: String,
}

/// Login request.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Email address.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

/// Response carrying the user and a freshly minted session token.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    /// Result description.
    pub message: String,
    /// The authenticated user.
    pub user: UserResponse,
    /// Bearer token for subsequent requests.
    pub token: String,
}

/// Register a new account.
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RegisterRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let name = body.name.trim();
    if name.is_empty() {
        return Err(ApiError::Validation("name must not be empty".into()));
    }
    let email = body.email.trim().to_lowercase();
    if !email.contains('@') {
        return Err(ApiError::Validation("invalid email address".into()));
    }
    if body.password.len() < 8 {
        return Err(ApiError::Validation(
            "password must be at least 8 characters".into(),
        ));
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(body.password.as_bytes(), &salt)
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .to_string();

    let user = User::new(name.to_string(), email, password_hash);
    state.store.create_user(&user)?;

    let token = issue_token(
        &user.id,
        &state.config.jwt_secret,
        state.config.token_ttl_seconds,
    )
    .map_err(|e| ApiError::Internal(e.to_string()))?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok(Json(SessionResponse {
        message: "Registration successful".into(),
        user: UserResponse::from(&user),
        token,
    }))
}

/// Log in with email and password.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    // Same error for unknown email and wrong password.
    let user = state
        .store
        .get_user_by_email(&body.email)?
        .ok_or(ApiError::Unauthorized)?;

    let parsed_hash =
        PasswordHash::new(&user.password_hash).map_err(|e| ApiError::Internal(e.to_string()))?;

    Argon2::default()
        .verify_password(body.password.as_bytes(), &parsed_hash)
        .map_err(|_| ApiError::Unauthorized)?;

    let token = issue_token(
        &user.id,
        &state.config.jwt_secret,
        state.config.token_ttl_seconds,
    )
    .map_err(|e| ApiError::Internal(e.to_string()))?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(SessionResponse {
        message: "Login successful".into(),
        user: UserResponse::from(&user),
        token,
    }))
}

/// Get the authenticated user's account.
pub async fn current_user(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user = state
        .store
        .get_user(&auth.user_id)?
        .ok_or_else(|| ApiError::NotFound("user not found".into()))?;

    Ok(Json(serde_json::json!({ "user": UserResponse::from(&user) })))
}

/// Log out.
///
/// Tokens are stateless; the client discards its copy. The endpoint exists
/// so clients have a uniform session lifecycle.
pub async fn logout(auth: AuthUser) -> Json<serde_json::Value> {
    tracing::debug!(user_id = %auth.user_id, "User logged out");
    Json(serde_json::json!({ "message": "Logged out" }))
}
