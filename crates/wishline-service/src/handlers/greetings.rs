//! Greeting handlers: authoring, lifecycle, and recipients.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use wishline_core::{
    ContentType, Greeting, GreetingId, GreetingRecipient, GreetingStatus, GreetingType,
    OccasionType, TemplateId, UserId,
};
use wishline_store::Store;

use super::{parse_id, PageMeta, PageQuery};
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Public view of a greeting.
#[derive(Debug, Serialize)]
pub struct GreetingResponse {
    /// Greeting ID.
    pub id: String,
    /// Authoring creator.
    pub creator_id: String,
    /// Title.
    pub title: String,
    /// Description.
    pub description: Option<String>,
    /// Content medium.
    pub greeting_type: GreetingType,
    /// Occasion.
    pub occasion_type: OccasionType,
    /// How the content was produced.
    pub content_type: ContentType,
    /// Content payload.
    pub content_data: serde_json::Value,
    /// Template used, if any.
    pub template_id: Option<String>,
    /// Theme payload.
    pub theme_settings: Option<serde_json::Value>,
    /// Whether delivery is scheduled.
    pub is_scheduled: bool,
    /// Scheduled delivery time.
    pub scheduled_at: Option<DateTime<Utc>>,
    /// Lifecycle status.
    pub status: GreetingStatus,
    /// Created timestamp.
    pub created_at: String,
}

impl From<&Greeting> for GreetingResponse {
    fn from(greeting: &Greeting) -> Self {
        Self {
            id: greeting.id.to_string(),
            creator_id: greeting.creator_id.to_string(),
            title: greeting.title.clone(),
            description: greeting.description.clone(),
            greeting_type: greeting.greeting_type,
            occasion_type: greeting.occasion_type,
            content_type: greeting.content_type,
            content_data: greeting.content_data.clone(),
            template_id: greeting.template_id.map(|id| id.to_string()),
            theme_settings: greeting.theme_settings.clone(),
            is_scheduled: greeting.is_scheduled,
            scheduled_at: greeting.scheduled_at,
            status: greeting.status,
            created_at: greeting.created_at.to_rfc3339(),
        }
    }
}

/// List response.
#[derive(Debug, Serialize)]
pub struct GreetingListResponse {
    /// Greetings on this page.
    pub greetings: Vec<GreetingResponse>,
    /// Pagination metadata.
    pub pagination: PageMeta,
}

/// Creation request.
#[derive(Debug, Deserialize)]
pub struct CreateGreetingRequest {
    /// Title.
    pub title: String,
    /// Description.
    pub description: Option<String>,
    /// Content medium.
    pub greeting_type: GreetingType,
    /// Occasion.
    pub occasion_type: OccasionType,
    /// How the content was produced.
    pub content_type: ContentType,
    /// Content payload.
    pub content_data: serde_json::Value,
    /// Template ID, when template-based.
    pub template_id: Option<String>,
    /// Theme payload.
    pub theme_settings: Option<serde_json::Value>,
}

/// Update request. Content fields only; lifecycle moves via dedicated
/// endpoints.
#[derive(Debug, Deserialize)]
pub struct UpdateGreetingRequest {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New content payload.
    pub content_data: Option<serde_json::Value>,
    /// New theme payload.
    pub theme_settings: Option<serde_json::Value>,
}

/// Scheduling request.
#[derive(Debug, Deserialize)]
pub struct ScheduleRequest {
    /// When the greeting should be sent.
    pub scheduled_at: DateTime<Utc>,
}

/// Recipient attach request.
#[derive(Debug, Deserialize)]
pub struct AddRecipientRequest {
    /// The receiving user.
    pub recipient_id: String,
}

fn load_greeting(state: &AppState, id: &str) -> Result<Greeting, ApiError> {
    let greeting_id: GreetingId = parse_id(id, "greeting")?;
    state
        .store
        .get_greeting(&greeting_id)?
        .ok_or_else(|| ApiError::NotFound(format!("greeting not found: {id}")))
}

fn require_author(greeting: &Greeting, auth: &AuthUser) -> Result<(), ApiError> {
    if greeting.creator_id == auth.user_id {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "Only the greeting's creator may do this".into(),
        ))
    }
}

/// List the authenticated creator's greetings.
pub async fn list_greetings(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Query(page): Query<PageQuery>,
) -> Result<Json<GreetingListResponse>, ApiError> {
    let (greetings, total) =
        state
            .store
            .list_greetings_by_creator(&auth.user_id, page.limit(), page.offset())?;

    Ok(Json(GreetingListResponse {
        greetings: greetings.iter().map(GreetingResponse::from).collect(),
        pagination: PageMeta::new(total, page),
    }))
}

/// Create a draft greeting.
pub async fn create_greeting(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<CreateGreetingRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user = state
        .store
        .get_user(&auth.user_id)?
        .ok_or_else(|| ApiError::NotFound("user not found".into()))?;

    if !user.can_create_greetings() {
        return Err(ApiError::Forbidden(
            "Only creators acting in the creator role may author greetings".into(),
        ));
    }

    let title = body.title.trim().to_string();
    if title.is_empty() {
        return Err(ApiError::Validation("title must not be empty".into()));
    }

    let mut greeting = Greeting::new(
        auth.user_id,
        title,
        body.greeting_type,
        body.occasion_type,
        body.content_type,
        body.content_data,
    );
    greeting.description = body.description;
    greeting.theme_settings = body.theme_settings;

    if let Some(template_id) = body.template_id {
        let template_id: TemplateId = parse_id(&template_id, "template")?;
        if state.store.get_template(&template_id)?.is_none() {
            return Err(ApiError::NotFound(format!(
                "template not found: {template_id}"
            )));
        }
        greeting.template_id = Some(template_id);
    }

    state.store.create_greeting(&greeting)?;

    tracing::info!(greeting_id = %greeting.id, creator_id = %auth.user_id, "Greeting created");
    Ok(Json(serde_json::json!({
        "message": "Greeting created",
        "greeting": GreetingResponse::from(&greeting),
    })))
}

/// Get a greeting. Visible to its creator and its recipients.
pub async fn get_greeting(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let greeting = load_greeting(&state, &id)?;

    if greeting.creator_id != auth.user_id
        && state
            .store
            .get_recipient(&greeting.id, &auth.user_id)?
            .is_none()
    {
        return Err(ApiError::Forbidden(
            "Only the creator and recipients may view this greeting".into(),
        ));
    }

    Ok(Json(serde_json::json!({
        "greeting": GreetingResponse::from(&greeting),
    })))
}

/// Update a greeting's content. Creator only.
pub async fn update_greeting(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(body): Json<UpdateGreetingRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut greeting = load_greeting(&state, &id)?;
    require_author(&greeting, &auth)?;

    if let Some(title) = body.title {
        let title = title.trim().to_string();
        if title.is_empty() {
            return Err(ApiError::Validation("title must not be empty".into()));
        }
        greeting.title = title;
    }
    if let Some(description) = body.description {
        greeting.description = Some(description);
    }
    if let Some(content_data) = body.content_data {
        greeting.content_data = content_data;
    }
    if let Some(theme_settings) = body.theme_settings {
        greeting.theme_settings = Some(theme_settings);
    }
    greeting.updated_at = Utc::now();

    state.store.update_greeting(&greeting)?;
    Ok(Json(serde_json::json!({
        "message": "Greeting updated",
        "greeting": GreetingResponse::from(&greeting),
    })))
}

/// Delete a greeting with its recipients and analytics. Creator only.
pub async fn delete_greeting(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let greeting = load_greeting(&state, &id)?;
    require_author(&greeting, &auth)?;

    state.store.delete_greeting(&greeting.id)?;

    tracing::info!(greeting_id = %greeting.id, "Greeting deleted");
    Ok(Json(serde_json::json!({ "message": "Greeting deleted" })))
}

/// Schedule a draft for later delivery. Creator only.
pub async fn schedule(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(body): Json<ScheduleRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut greeting = load_greeting(&state, &id)?;
    require_author(&greeting, &auth)?;

    greeting.schedule(body.scheduled_at)?;
    state.store.update_greeting(&greeting)?;

    Ok(Json(serde_json::json!({
        "message": "Greeting scheduled",
        "greeting": GreetingResponse::from(&greeting),
    })))
}

/// Send a greeting now. Creator only. Stamps `sent_at` on every recipient.
pub async fn send(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut greeting = load_greeting(&state, &id)?;
    require_author(&greeting, &auth)?;

    greeting.mark_sent()?;
    state.store.update_greeting(&greeting)?;

    let now = Utc::now();
    for mut recipient in state.store.list_recipients(&greeting.id)? {
        if recipient.sent_at.is_none() {
            recipient.sent_at = Some(now);
            state.store.update_recipient(&recipient)?;
        }
    }

    tracing::info!(greeting_id = %greeting.id, "Greeting sent");
    Ok(Json(serde_json::json!({
        "message": "Greeting sent",
        "greeting": GreetingResponse::from(&greeting),
    })))
}

/// Attach a recipient. Creator only.
pub async fn add_recipient(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(body): Json<AddRecipientRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let greeting = load_greeting(&state, &id)?;
    require_author(&greeting, &auth)?;

    let recipient_id: UserId = parse_id(&body.recipient_id, "user")?;
    if state.store.get_user(&recipient_id)?.is_none() {
        return Err(ApiError::NotFound(format!("user not found: {recipient_id}")));
    }

    let recipient = GreetingRecipient::new(greeting.id, recipient_id);
    state.store.add_recipient(&recipient)?;

    Ok(Json(serde_json::json!({
        "message": "Recipient added",
        "greeting_id": greeting.id.to_string(),
        "recipient_id": recipient_id.to_string(),
    })))
}

/// Mark a greeting delivered to the authenticated recipient.
///
/// Idempotent per the lifecycle rules; re-marking succeeds without change.
pub async fn mark_delivered(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    advance_for_recipient(&state, &auth, &id, GreetingStatus::Delivered)
}

/// Mark a greeting viewed by the authenticated recipient.
pub async fn mark_viewed(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    advance_for_recipient(&state, &auth, &id, GreetingStatus::Viewed)
}

fn advance_for_recipient(
    state: &AppState,
    auth: &AuthUser,
    id: &str,
    to: GreetingStatus,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut greeting = load_greeting(state, id)?;

    let mut recipient = state
        .store
        .get_recipient(&greeting.id, &auth.user_id)?
        .ok_or_else(|| {
            ApiError::Forbidden("Only a recipient may report delivery or viewing".into())
        })?;

    greeting.transition(to)?;
    state.store.update_greeting(&greeting)?;

    let now = Utc::now();
    match to {
        GreetingStatus::Delivered => {
            if recipient.delivered_at.is_none() {
                recipient.delivered_at = Some(now);
                state.store.update_recipient(&recipient)?;
            }
        }
        GreetingStatus::Viewed => {
            if recipient.viewed_at.is_none() {
                recipient.viewed_at = Some(now);
                state.store.update_recipient(&recipient)?;
            }
        }
        _ => {}
    }

    let message = match to {
        GreetingStatus::Viewed => "Greeting viewed",
        _ => "Greeting delivered",
    };
    Ok(Json(serde_json::json!({
        "message": message,
        "greeting": GreetingResponse::from(&greeting),
    })))
}
