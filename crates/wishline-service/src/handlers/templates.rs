//! Template handlers.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use wishline_core::{Template, TemplateId};
use wishline_store::Store;

use super::{parse_id, PageMeta, PageQuery};
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Public view of a template.
#[derive(Debug, Serialize)]
pub struct TemplateResponse {
    /// Template ID.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Category.
    pub category: String,
    /// Structure payload.
    pub content_structure: serde_json::Value,
    /// Preview image.
    pub preview_image: Option<String>,
    /// Whether verified-creator access is required.
    pub is_premium: bool,
    /// Authoring creator, if user-made.
    pub creator_id: Option<String>,
    /// Greetings that used this template.
    pub usage_count: u64,
    /// Aggregate rating.
    pub rating: f64,
    /// Created timestamp.
    pub created_at: String,
}

impl From<&Template> for TemplateResponse {
    fn from(template: &Template) -> Self {
        Self {
            id: template.id.to_string(),
            name: template.name.clone(),
            description: template.description.clone(),
            category: template.category.clone(),
            content_structure: template.content_structure.clone(),
            preview_image: template.preview_image.clone(),
            is_premium: template.is_premium,
            creator_id: template.creator_id.map(|id| id.to_string()),
            usage_count: template.usage_count,
            rating: template.rating,
            created_at: template.created_at.to_rfc3339(),
        }
    }
}

/// List response.
#[derive(Debug, Serialize)]
pub struct TemplateListResponse {
    /// Templates on this page.
    pub templates: Vec<TemplateResponse>,
    /// Pagination metadata.
    pub pagination: PageMeta,
}

/// Creation request.
#[derive(Debug, Deserialize)]
pub struct CreateTemplateRequest {
    /// Display name.
    pub name: String,
    /// Category, e.g. "birthday".
    pub category: String,
    /// Structure payload.
    pub content_structure: serde_json::Value,
    /// Description.
    pub description: Option<String>,
    /// Preview image.
    pub preview_image: Option<String>,
    /// Whether verified-creator access is required.
    #[serde(default)]
    pub is_premium: bool,
}

/// Update request.
#[derive(Debug, Deserialize)]
pub struct UpdateTemplateRequest {
    /// New name.
    pub name: Option<String>,
    /// New category.
    pub category: Option<String>,
    /// New structure payload.
    pub content_structure: Option<serde_json::Value>,
    /// New description.
    pub description: Option<String>,
    /// New preview image.
    pub preview_image: Option<String>,
    /// New premium flag.
    pub is_premium: Option<bool>,
}

fn normalize_category(raw: &str) -> Result<String, ApiError> {
    let category = raw.trim().to_lowercase();
    if category.is_empty() {
        return Err(ApiError::Validation("category must not be empty".into()));
    }
    Ok(category)
}

/// List templates, newest first.
pub async fn list_templates(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Query(page): Query<PageQuery>,
) -> Result<Json<TemplateListResponse>, ApiError> {
    let (templates, total) = state.store.list_templates(page.limit(), page.offset())?;

    Ok(Json(TemplateListResponse {
        templates: templates.iter().map(TemplateResponse::from).collect(),
        pagination: PageMeta::new(total, page),
    }))
}

/// Create a template. Creators only.
pub async fn create_template(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<CreateTemplateRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user = state
        .store
        .get_user(&auth.user_id)?
        .ok_or_else(|| ApiError::NotFound("user not found".into()))?;

    if !user.is_creator {
        return Err(ApiError::Forbidden("Only creators may publish templates".into()));
    }

    let name = body.name.trim().to_string();
    if name.is_empty() {
        return Err(ApiError::Validation("name must not be empty".into()));
    }
    let category = normalize_category(&body.category)?;

    let mut template = Template::new(name, category, body.content_structure);
    template.description = body.description;
    template.preview_image = body.preview_image;
    template.is_premium = body.is_premium;
    template.creator_id = Some(auth.user_id);

    state.store.create_template(&template)?;

    tracing::info!(template_id = %template.id, creator_id = %auth.user_id, "Template created");
    Ok(Json(serde_json::json!({
        "message": "Template created",
        "template": TemplateResponse::from(&template),
    })))
}

/// Get a template by ID.
pub async fn get_template(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let template_id: TemplateId = parse_id(&id, "template")?;
    let template = state
        .store
        .get_template(&template_id)?
        .ok_or_else(|| ApiError::NotFound(format!("template not found: {id}")))?;

    Ok(Json(serde_json::json!({ "template": TemplateResponse::from(&template) })))
}

/// Update a template. Authoring creator only.
pub async fn update_template(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(body): Json<UpdateTemplateRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let template_id: TemplateId = parse_id(&id, "template")?;
    let mut template = state
        .store
        .get_template(&template_id)?
        .ok_or_else(|| ApiError::NotFound(format!("template not found: {id}")))?;

    if template.creator_id != Some(auth.user_id) {
        return Err(ApiError::Forbidden(
            "Only the template's creator may edit it".into(),
        ));
    }

    if let Some(name) = body.name {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(ApiError::Validation("name must not be empty".into()));
        }
        template.name = name;
    }
    if let Some(category) = body.category {
        template.category = normalize_category(&category)?;
    }
    if let Some(structure) = body.content_structure {
        template.content_structure = structure;
    }
    if let Some(description) = body.description {
        template.description = Some(description);
    }
    if let Some(preview) = body.preview_image {
        template.preview_image = Some(preview);
    }
    if let Some(premium) = body.is_premium {
        template.is_premium = premium;
    }
    template.updated_at = chrono::Utc::now();

    state.store.update_template(&template)?;
    Ok(Json(serde_json::json!({
        "message": "Template updated",
        "template": TemplateResponse::from(&template),
    })))
}

/// Delete a template. Authoring creator only.
pub async fn delete_template(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let template_id: TemplateId = parse_id(&id, "template")?;
    let template = state
        .store
        .get_template(&template_id)?
        .ok_or_else(|| ApiError::NotFound(format!("template not found: {id}")))?;

    if template.creator_id != Some(auth.user_id) {
        return Err(ApiError::Forbidden(
            "Only the template's creator may delete it".into(),
        ));
    }

    state.store.delete_template(&template_id)?;
    Ok(Json(serde_json::json!({ "message": "Template deleted" })))
}

/// Templates in a category.
pub async fn list_by_category(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Path(category): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let category = normalize_category(&category)?;
    let templates = state.store.list_templates_by_category(&category)?;
    let templates: Vec<TemplateResponse> = templates.iter().map(TemplateResponse::from).collect();

    Ok(Json(serde_json::json!({
        "category": category,
        "templates": templates,
    })))
}

/// Recommended templates: the most used across the platform.
pub async fn recommended_templates(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Query(page): Query<PageQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let templates = state.store.popular_templates(page.limit())?;
    let templates: Vec<TemplateResponse> = templates.iter().map(TemplateResponse::from).collect();

    Ok(Json(serde_json::json!({ "templates": templates })))
}

/// Record a usage of a template.
///
/// Premium templates require verified-creator access.
pub async fn use_template(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let template_id: TemplateId = parse_id(&id, "template")?;
    let template = state
        .store
        .get_template(&template_id)?
        .ok_or_else(|| ApiError::NotFound(format!("template not found: {id}")))?;

    if template.is_premium {
        let user = state
            .store
            .get_user(&auth.user_id)?
            .ok_or_else(|| ApiError::NotFound("user not found".into()))?;
        if !user.is_verified_creator {
            return Err(ApiError::Forbidden(
                "Premium templates require a verified creator account".into(),
            ));
        }
    }

    let template = state.store.increment_template_usage(&template_id)?;
    Ok(Json(serde_json::json!({
        "message": "Template usage recorded",
        "template": TemplateResponse::from(&template),
    })))
}
