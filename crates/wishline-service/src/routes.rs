//! Router configuration.
//!
//! This module sets up the Axum router with all routes and middleware.

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    analytics, auth, connections, greetings, health, media, profiles, reviews, templates, users,
};
use crate::state::AppState;

/// Create the service router with all routes and middleware.
///
/// # Routes
///
/// ## Public
/// - `GET /health` - Health check
/// - `POST /auth/register` - Register and receive a session token
/// - `POST /auth/login` - Log in and receive a session token
///
/// ## Authenticated (Bearer JWT)
/// - `/auth/user`, `/auth/logout`
/// - `/v1/users/...` - Accounts, role switching, creator upgrade
/// - `/v1/creator-profiles/...` - Profiles, stats
/// - `/v1/greetings/...` - Greetings, recipients, lifecycle, analytics
/// - `/v1/templates/...` - Templates, categories, usage
/// - `/v1/media/...` - Media metadata
/// - `/v1/connections/...` - Friend requests, blocking
/// - `/v1/reviews/...` - Reviews and rating aggregates
/// - `/v1/analytics/dashboard` - Per-user dashboard
///
/// ## Admin (x-admin-key)
/// - `POST /v1/creator-profiles/{user_id}/verify|reject`
/// - `GET /v1/analytics/platform`
#[allow(clippy::too_many_lines)]
pub fn create_router(state: AppState) -> Router {
    // Extract config values before moving state
    let cors_origins = state.config.cors_origins.clone();
    let max_body_bytes = state.config.max_body_bytes;
    let request_timeout_seconds = state.config.request_timeout_seconds;

    // Build CORS layer
    let cors = build_cors_layer(&cors_origins);

    let state = Arc::new(state);

    Router::new()
        // Health (public)
        .route("/health", get(health::health))
        // Auth
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/user", get(auth::current_user))
        .route("/auth/logout", post(auth::logout))
        // Users
        .route("/v1/users", get(users::list_users))
        .route("/v1/users/:id", get(users::get_user))
        .route("/v1/users/:id", put(users::update_user))
        .route("/v1/users/:id", delete(users::delete_user))
        .route(
            "/v1/users/me/upgrade-to-creator",
            post(users::upgrade_to_creator),
        )
        .route("/v1/users/me/switch-role", post(users::switch_role))
        .route("/v1/users/:id/reviews", get(reviews::list_for_user))
        .route("/v1/users/:id/review-stats", get(reviews::stats_for_user))
        // Creator profiles
        .route("/v1/creator-profiles", get(profiles::list_profiles))
        .route("/v1/creator-profiles", post(profiles::create_profile))
        .route("/v1/creator-profiles/:user_id", get(profiles::get_profile))
        .route(
            "/v1/creator-profiles/:user_id",
            put(profiles::update_profile),
        )
        .route(
            "/v1/creator-profiles/:user_id",
            delete(profiles::delete_profile),
        )
        .route(
            "/v1/creator-profiles/:user_id/verify",
            post(profiles::verify_profile),
        )
        .route(
            "/v1/creator-profiles/:user_id/reject",
            post(profiles::reject_profile),
        )
        .route(
            "/v1/creator-profiles/:user_id/stats",
            get(profiles::profile_stats),
        )
        // Greetings
        .route("/v1/greetings", get(greetings::list_greetings))
        .route("/v1/greetings", post(greetings::create_greeting))
        .route("/v1/greetings/:id", get(greetings::get_greeting))
        .route("/v1/greetings/:id", put(greetings::update_greeting))
        .route("/v1/greetings/:id", delete(greetings::delete_greeting))
        .route("/v1/greetings/:id/schedule", post(greetings::schedule))
        .route("/v1/greetings/:id/send", post(greetings::send))
        .route("/v1/greetings/:id/recipients", post(greetings::add_recipient))
        .route("/v1/greetings/:id/delivered", post(greetings::mark_delivered))
        .route("/v1/greetings/:id/viewed", post(greetings::mark_viewed))
        // Per-greeting analytics
        .route("/v1/greetings/:id/analytics", get(analytics::get_analytics))
        .route(
            "/v1/greetings/:id/analytics/views",
            post(analytics::increment_views),
        )
        .route(
            "/v1/greetings/:id/analytics/shares",
            post(analytics::increment_shares),
        )
        .route(
            "/v1/greetings/:id/analytics/likes",
            post(analytics::increment_likes),
        )
        .route(
            "/v1/greetings/:id/analytics/engagement",
            put(analytics::update_engagement),
        )
        // Templates
        .route("/v1/templates", get(templates::list_templates))
        .route("/v1/templates", post(templates::create_template))
        .route(
            "/v1/templates/recommended",
            get(templates::recommended_templates),
        )
        .route(
            "/v1/templates/category/:category",
            get(templates::list_by_category),
        )
        .route("/v1/templates/:id", get(templates::get_template))
        .route("/v1/templates/:id", put(templates::update_template))
        .route("/v1/templates/:id", delete(templates::delete_template))
        .route("/v1/templates/:id/use", post(templates::use_template))
        // Media
        .route("/v1/media", get(media::list_media))
        .route("/v1/media", post(media::register_media))
        .route("/v1/media/:id", get(media::get_media))
        .route("/v1/media/:id", delete(media::delete_media))
        // Connections
        .route("/v1/connections", get(connections::list_connections))
        .route("/v1/connections", post(connections::send_request))
        .route("/v1/connections/friends", get(connections::list_friends))
        .route("/v1/connections/pending", get(connections::list_pending))
        .route("/v1/connections/:id", get(connections::get_connection))
        .route("/v1/connections/:id", delete(connections::delete_connection))
        .route("/v1/connections/:id/accept", post(connections::accept))
        .route("/v1/connections/:id/decline", post(connections::decline))
        .route("/v1/connections/:id/block", post(connections::block))
        .route("/v1/connections/:id/unblock", post(connections::unblock))
        // Reviews
        .route("/v1/reviews", get(reviews::list_my_reviews))
        .route("/v1/reviews", post(reviews::create_review))
        .route("/v1/reviews/top-rated", get(reviews::top_rated))
        .route("/v1/reviews/:id", get(reviews::get_review))
        .route("/v1/reviews/:id", put(reviews::update_review))
        .route("/v1/reviews/:id", delete(reviews::delete_review))
        // Analytics
        .route("/v1/analytics/dashboard", get(analytics::dashboard))
        .route("/v1/analytics/platform", get(analytics::platform))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            request_timeout_seconds,
        )))
        .with_state(state)
}

/// Build the CORS layer from configured origins.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
