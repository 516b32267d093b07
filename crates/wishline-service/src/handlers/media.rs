//! Media asset handlers.
//!
//! Binary upload and storage backends live outside this service. These
//! endpoints only track asset metadata and ownership.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use wishline_core::{Media, MediaId, MediaType};
use wishline_store::Store;

use super::{parse_id, PageMeta, PageQuery};
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Public view of a media asset.
#[derive(Debug, Serialize)]
pub struct MediaResponse {
    /// Media ID.
    pub id: String,
    /// Owning user.
    pub user_id: String,
    /// Stored filename.
    pub filename: String,
    /// Filename as uploaded.
    pub original_name: String,
    /// MIME type.
    pub mime_type: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Storage path.
    pub file_path: String,
    /// Thumbnail path, if any.
    pub thumbnail_path: Option<String>,
    /// Asset kind.
    pub media_type: MediaType,
    /// Duration in seconds for audio/video.
    pub duration_seconds: Option<u32>,
    /// Extra metadata.
    pub metadata: Option<serde_json::Value>,
    /// Registered timestamp.
    pub created_at: String,
}

impl From<&Media> for MediaResponse {
    fn from(media: &Media) -> Self {
        Self {
            id: media.id.to_string(),
            user_id: media.user_id.to_string(),
            filename: media.filename.clone(),
            original_name: media.original_name.clone(),
            mime_type: media.mime_type.clone(),
            size_bytes: media.size_bytes,
            file_path: media.file_path.clone(),
            thumbnail_path: media.thumbnail_path.clone(),
            media_type: media.media_type,
            duration_seconds: media.duration_seconds,
            metadata: media.metadata.clone(),
            created_at: media.created_at.to_rfc3339(),
        }
    }
}

/// List response.
#[derive(Debug, Serialize)]
pub struct MediaListResponse {
    /// Assets on this page.
    pub media: Vec<MediaResponse>,
    /// Pagination metadata.
    pub pagination: PageMeta,
}

/// Registration request.
#[derive(Debug, Deserialize)]
pub struct RegisterMediaRequest {
    /// Stored filename.
    pub filename: String,
    /// Filename as uploaded.
    pub original_name: String,
    /// MIME type.
    pub mime_type: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Storage path.
    pub file_path: String,
    /// Asset kind.
    pub media_type: MediaType,
    /// Thumbnail path, if any.
    pub thumbnail_path: Option<String>,
    /// Duration in seconds for audio/video.
    pub duration_seconds: Option<u32>,
    /// Extra metadata.
    pub metadata: Option<serde_json::Value>,
}

/// List the caller's media assets, newest first.
pub async fn list_media(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Query(page): Query<PageQuery>,
) -> Result<Json<MediaListResponse>, ApiError> {
    let (media, total) = state
        .store
        .list_media_by_user(&auth.user_id, page.limit(), page.offset())?;

    Ok(Json(MediaListResponse {
        media: media.iter().map(MediaResponse::from).collect(),
        pagination: PageMeta::new(total, page),
    }))
}

/// Register a media asset owned by the caller.
pub async fn register_media(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<RegisterMediaRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if body.filename.trim().is_empty() {
        return Err(ApiError::Validation("filename must not be empty".into()));
    }
    if body.file_path.trim().is_empty() {
        return Err(ApiError::Validation("file_path must not be empty".into()));
    }

    let mut media = Media::new(
        auth.user_id,
        body.filename,
        body.original_name,
        body.mime_type,
        body.size_bytes,
        body.file_path,
        body.media_type,
    );
    media.thumbnail_path = body.thumbnail_path;
    media.duration_seconds = body.duration_seconds;
    media.metadata = body.metadata;

    state.store.create_media(&media)?;

    tracing::info!(media_id = %media.id, user_id = %auth.user_id, "Media registered");
    Ok(Json(serde_json::json!({
        "message": "Media registered",
        "media": MediaResponse::from(&media),
    })))
}

/// Get a media asset. Owner only.
pub async fn get_media(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let media_id: MediaId = parse_id(&id, "media")?;
    let media = state
        .store
        .get_media(&media_id)?
        .ok_or_else(|| ApiError::NotFound(format!("media not found: {id}")))?;

    if media.user_id != auth.user_id {
        return Err(ApiError::Forbidden("Media belongs to another user".into()));
    }

    Ok(Json(serde_json::json!({ "media": MediaResponse::from(&media) })))
}

/// Delete a media asset. Owner only.
pub async fn delete_media(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let media_id: MediaId = parse_id(&id, "media")?;
    let media = state
        .store
        .get_media(&media_id)?
        .ok_or_else(|| ApiError::NotFound(format!("media not found: {id}")))?;

    if media.user_id != auth.user_id {
        return Err(ApiError::Forbidden("Media belongs to another user".into()));
    }

    state.store.delete_media(&media_id)?;
    Ok(Json(serde_json::json!({ "message": "Media deleted" })))
}
