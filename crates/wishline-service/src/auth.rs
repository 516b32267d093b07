//! Authentication middleware and extractors.
//!
//! This module provides:
//! - `issue_token` / `verify_token` - HS256 session tokens minted at
//!   register/login
//! - `AuthUser` - End-user authentication via Bearer JWT
//! - `AdminAuth` - Moderation endpoints via admin API key

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use wishline_core::UserId;

use crate::error::ApiError;
use crate::state::AppState;

/// JWT claims carried by session tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject (user ID).
    pub sub: String,
    /// Expiration time (unix seconds).
    pub exp: i64,
    /// Issued at (unix seconds).
    pub iat: i64,
}

/// Mint a session token for a user.
///
/// # Errors
///
/// Returns an error if signing fails.
pub fn issue_token(
    user_id: &UserId,
    secret: &str,
    ttl_seconds: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let claims = JwtClaims {
        sub: user_id.to_string(),
        exp: now + ttl_seconds,
        iat: now,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Verify a session token, returning the authenticated user ID.
///
/// # Errors
///
/// Returns `ApiError::Unauthorized` for expired, malformed, or
/// wrongly-signed tokens.
pub fn verify_token(token: &str, secret: &str) -> Result<UserId, ApiError> {
    let data = decode::<JwtClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| ApiError::Unauthorized)?;

    data.claims
        .sub
        .parse::<UserId>()
        .map_err(|_| ApiError::Unauthorized)
}

/// An authenticated user extracted from a Bearer JWT.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user ID.
    pub user_id: UserId,
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        state: &'life1 Arc<AppState>,
    ) -> ::core::pin::Pin<
        Box<
            dyn ::core::future::Future<Output = Result<Self, Self::Rejection>>
                + ::core::marker::Send
                + 'async_trait,
        >,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let auth_header = parts
                .headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .ok_or(ApiError::Unauthorized)?;

            let token = auth_header
                .strip_prefix("Bearer ")
                .ok_or(ApiError::Unauthorized)?;

            let user_id = verify_token(token, &state.config.jwt_secret)?;

            Ok(AuthUser { user_id })
        })
    }
}

/// Admin authentication via API key.
///
/// Used for moderation endpoints (creator verification, platform
/// analytics).
#[derive(Debug, Clone)]
pub struct AdminAuth;

impl FromRequestParts<Arc<AppState>> for AdminAuth {
    type Rejection = ApiError;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        state: &'life1 Arc<AppState>,
    ) -> ::core::pin::Pin<
        Box<
            dyn ::core::future::Future<Output = Result<Self, Self::Rejection>>
                + ::core::marker::Send
                + 'async_trait,
        >,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let api_key = parts
                .headers
                .get("x-admin-key")
                .and_then(|v| v.to_str().ok())
                .ok_or(ApiError::Unauthorized)?;

            let expected_key = state
                .config
                .admin_api_key
                .as_ref()
                .ok_or(ApiError::Unauthorized)?;

            if api_key != expected_key {
                return Err(ApiError::Unauthorized);
            }

            Ok(AdminAuth)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_roundtrip() {
        let user_id = UserId::generate();
        let token = issue_token(&user_id, "secret", 3600).unwrap();
        let verified = verify_token(&token, "secret").unwrap();
        assert_eq!(verified, user_id);
    }

    #[test]
    fn wrong_secret_rejected() {
        let user_id = UserId::generate();
        let token = issue_token(&user_id, "secret", 3600).unwrap();
        assert!(verify_token(&token, "other").is_err());
    }

    #[test]
    fn expired_token_rejected() {
        let user_id = UserId::generate();
        let token = issue_token(&user_id, "secret", -3600).unwrap();
        assert!(verify_token(&token, "secret").is_err());
    }
}
