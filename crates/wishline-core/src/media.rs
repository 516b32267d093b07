//! Media metadata types.
//!
//! Only metadata is tracked here; byte storage lives outside this system.
//! Thumbnail generation is intentionally not implemented.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{MediaId, UserId};

/// The kind of media asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    /// Still image.
    Image,

    /// Video clip.
    Video,

    /// Audio clip.
    Audio,
}

/// Metadata for an uploaded media asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Media {
    /// The media ID.
    pub id: MediaId,

    /// Owning user.
    pub user_id: UserId,

    /// Stored filename.
    pub filename: String,

    /// Filename as uploaded by the user.
    pub original_name: String,

    /// MIME type, e.g. "video/mp4".
    pub mime_type: String,

    /// File size in bytes.
    pub size_bytes: u64,

    /// Storage path of the file.
    pub file_path: String,

    /// Storage path of the thumbnail, if one exists.
    pub thumbnail_path: Option<String>,

    /// Asset kind.
    pub media_type: MediaType,

    /// Duration in seconds for audio/video.
    pub duration_seconds: Option<u32>,

    /// Extra metadata (dimensions, codec, etc.).
    pub metadata: Option<serde_json::Value>,

    /// When the asset was registered.
    pub created_at: DateTime<Utc>,
}

impl Media {
    /// Register a new media asset.
    #[must_use]
    pub fn new(
        user_id: UserId,
        filename: String,
        original_name: String,
        mime_type: String,
        size_bytes: u64,
        file_path: String,
        media_type: MediaType,
    ) -> Self {
        Self {
            id: MediaId::generate(),
            user_id,
            filename,
            original_name,
            mime_type,
            size_bytes,
            file_path,
            thumbnail_path: None,
            media_type,
            duration_seconds: None,
            metadata: None,
            created_at: Utc::now(),
        }
    }
}
