//! API handlers.

pub mod analytics;
pub mod auth;
pub mod connections;
pub mod greetings;
pub mod health;
pub mod media;
pub mod profiles;
pub mod reviews;
pub mod templates;
pub mod users;

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Pagination query parameters.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageQuery {
    /// Maximum items per page (default 20, capped at 100).
    pub limit: Option<usize>,
    /// Items to skip.
    pub offset: Option<usize>,
}

impl PageQuery {
    /// Effective limit, defaulted and capped.
    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(20).min(100)
    }

    /// Effective offset.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset.unwrap_or(0)
    }
}

/// Pagination metadata attached to list responses.
#[derive(Debug, Serialize)]
pub struct PageMeta {
    /// Total matching items.
    pub total: usize,
    /// Items per page.
    pub limit: usize,
    /// Items skipped.
    pub offset: usize,
}

impl PageMeta {
    #[must_use]
    fn new(total: usize, query: PageQuery) -> Self {
        Self {
            total,
            limit: query.limit(),
            offset: query.offset(),
        }
    }
}

/// Parse a path segment into a typed identifier.
fn parse_id<T: std::str::FromStr>(raw: &str, what: &str) -> Result<T, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest(format!("invalid {what} id: {raw}")))
}
