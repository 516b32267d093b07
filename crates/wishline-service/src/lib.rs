//! Wishline HTTP API Service.
//!
//! This crate provides the HTTP API for the wishline platform, including:
//!
//! - Registration, login, and session tokens
//! - User accounts and creator profiles
//! - Greetings, recipients, and lifecycle tracking
//! - Templates and media metadata
//! - Connections (friend requests), reviews, and engagement analytics
//!
//! # Authentication
//!
//! The service supports two authentication methods:
//!
//! 1. **Bearer JWT tokens** - Issued at register/login, HS256-signed
//! 2. **Admin API key** - For moderation endpoints (creator verification,
//!    platform analytics)

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are noisy for Axum handler functions
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result
#![allow(clippy::unused_async)] // Some handlers need async for consistency

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use auth::{issue_token, AdminAuth, AuthUser};
pub use config::ServiceConfig;
pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
