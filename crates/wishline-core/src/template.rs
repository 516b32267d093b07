//! Greeting template types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{TemplateId, UserId};

/// A reusable greeting template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Template {
    /// The template ID.
    pub id: TemplateId,

    /// Display name.
    pub name: String,

    /// Description.
    pub description: Option<String>,

    /// Category, e.g. "birthday" or "holiday".
    pub category: String,

    /// Structure payload consumed by the composer (slots, ordering).
    pub content_structure: serde_json::Value,

    /// Preview image URL or path.
    pub preview_image: Option<String>,

    /// Whether the template requires verified-creator access.
    pub is_premium: bool,

    /// Authoring creator, if user-made (platform templates have none).
    pub creator_id: Option<UserId>,

    /// How many greetings have used this template.
    pub usage_count: u64,

    /// Aggregate template rating.
    pub rating: f64,

    /// When the template was created.
    pub created_at: DateTime<Utc>,

    /// When the template was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Template {
    /// Create a new template with zero usage.
    #[must_use]
    pub fn new(name: String, category: String, content_structure: serde_json::Value) -> Self {
        let now = Utc::now();
        Self {
            id: TemplateId::generate(),
            name,
            description: None,
            category,
            content_structure,
            preview_image: None,
            is_premium: false,
            creator_id: None,
            usage_count: 0,
            rating: 0.0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Record a usage of this template.
    pub fn increment_usage(&mut self) {
        self.usage_count += 1;
        self.updated_at = Utc::now();
    }
}
