//! Engagement analytics handlers.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use wishline_core::{EngagementMetric, GreetingAnalytics, GreetingId, Role};
use wishline_store::Store;

use super::parse_id;
use crate::auth::{AdminAuth, AuthUser};
use crate::error::ApiError;
use crate::state::AppState;

/// Public view of a greeting's analytics row.
#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    /// The greeting.
    pub greeting_id: String,
    /// View count.
    pub views_count: u64,
    /// Share count.
    pub shares_count: u64,
    /// Like count.
    pub likes_count: u64,
    /// Free-form engagement payload.
    pub engagement_data: serde_json::Value,
    /// Last update timestamp.
    pub updated_at: String,
}

impl From<&GreetingAnalytics> for AnalyticsResponse {
    fn from(analytics: &GreetingAnalytics) -> Self {
        Self {
            greeting_id: analytics.greeting_id.to_string(),
            views_count: analytics.views_count,
            shares_count: analytics.shares_count,
            likes_count: analytics.likes_count,
            engagement_data: analytics.engagement_data.clone(),
            updated_at: analytics.updated_at.to_rfc3339(),
        }
    }
}

/// Engagement payload replacement request.
#[derive(Debug, Deserialize)]
pub struct EngagementRequest {
    /// The new payload.
    pub engagement_data: serde_json::Value,
}

/// Dashboard query parameters.
#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    /// Reporting window. Defaults to "month".
    pub period: Option<String>,
}

const DASHBOARD_PERIODS: [&str; 4] = ["week", "month", "quarter", "year"];

/// Fetch a greeting's analytics. Creator or recipient only.
pub async fn get_analytics(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let greeting_id: GreetingId = parse_id(&id, "greeting")?;
    let greeting = state
        .store
        .get_greeting(&greeting_id)?
        .ok_or_else(|| ApiError::NotFound(format!("greeting not found: {id}")))?;

    if greeting.creator_id != auth.user_id
        && state
            .store
            .get_recipient(&greeting_id, &auth.user_id)?
            .is_none()
    {
        return Err(ApiError::Forbidden(
            "Only the creator or a recipient may view analytics".into(),
        ));
    }

    let analytics = state
        .store
        .get_analytics(&greeting_id)?
        .ok_or_else(|| ApiError::NotFound(format!("greeting not found: {id}")))?;

    Ok(Json(serde_json::json!({ "analytics": AnalyticsResponse::from(&analytics) })))
}

fn increment(
    state: &AppState,
    id: &str,
    metric: EngagementMetric,
) -> Result<Json<serde_json::Value>, ApiError> {
    let greeting_id: GreetingId = parse_id(id, "greeting")?;
    let analytics = state.store.increment_engagement(&greeting_id, metric)?;
    Ok(Json(serde_json::json!({
        "message": "Engagement recorded",
        "analytics": AnalyticsResponse::from(&analytics),
    })))
}

/// Record a view.
pub async fn increment_views(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    increment(&state, &id, EngagementMetric::Views)
}

/// Record a share.
pub async fn increment_shares(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    increment(&state, &id, EngagementMetric::Shares)
}

/// Record a like.
pub async fn increment_likes(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    increment(&state, &id, EngagementMetric::Likes)
}

/// Replace a greeting's engagement payload. Creator only.
pub async fn update_engagement(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(body): Json<EngagementRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let greeting_id: GreetingId = parse_id(&id, "greeting")?;
    let greeting = state
        .store
        .get_greeting(&greeting_id)?
        .ok_or_else(|| ApiError::NotFound(format!("greeting not found: {id}")))?;

    if greeting.creator_id != auth.user_id {
        return Err(ApiError::Forbidden(
            "Only the creator may update engagement data".into(),
        ));
    }

    let analytics = state
        .store
        .set_engagement_data(&greeting_id, body.engagement_data)?;
    Ok(Json(serde_json::json!({
        "message": "Engagement data updated",
        "analytics": AnalyticsResponse::from(&analytics),
    })))
}

/// Per-user dashboard. The shape depends on the caller's active role.
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let period = query.period.unwrap_or_else(|| "month".to_string());
    if !DASHBOARD_PERIODS.contains(&period.as_str()) {
        return Err(ApiError::Validation(format!(
            "period must be one of week, month, quarter, year; got {period}"
        )));
    }

    let user = state
        .store
        .get_user(&auth.user_id)?
        .ok_or_else(|| ApiError::NotFound("user not found".into()))?;

    if user.current_role == Role::Creator {
        let (_, greeting_count) = state
            .store
            .list_greetings_by_creator(&auth.user_id, 0, 0)?;
        let engagement = state.store.engagement_totals_for_creator(&auth.user_id)?;
        let reviews = state.store.rating_stats(&auth.user_id)?;
        let top = state.store.top_greetings_by_views(&auth.user_id, 5)?;
        let top: Vec<serde_json::Value> = top
            .iter()
            .map(|(greeting, analytics)| {
                serde_json::json!({
                    "id": greeting.id.to_string(),
                    "title": greeting.title,
                    "status": greeting.status,
                    "views_count": analytics.views_count,
                    "shares_count": analytics.shares_count,
                    "likes_count": analytics.likes_count,
                })
            })
            .collect();

        return Ok(Json(serde_json::json!({
            "role": Role::Creator,
            "period": period,
            "total_greetings": greeting_count,
            "engagement": engagement,
            "reviews": reviews,
            "top_greetings": top,
        })));
    }

    let received = state.store.count_received_greetings(&auth.user_id)?;
    let (connections, connection_count) =
        state
            .store
            .list_connections_for_user(&auth.user_id, usize::MAX, 0)?;
    let friend_count = connections
        .iter()
        .filter(|conn| conn.status == wishline_core::ConnectionStatus::Accepted)
        .count();

    Ok(Json(serde_json::json!({
        "role": Role::Celebrant,
        "period": period,
        "greetings_received": received,
        "total_connections": connection_count,
        "friends": friend_count,
    })))
}

/// Platform-wide totals. Admin key required.
pub async fn platform(
    State(state): State<Arc<AppState>>,
    _admin: AdminAuth,
) -> Result<Json<serde_json::Value>, ApiError> {
    let counts = state.store.platform_counts()?;
    Ok(Json(serde_json::json!({ "platform": counts })))
}
