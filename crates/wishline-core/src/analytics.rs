//! Per-greeting engagement analytics.
//!
//! Counters are pure: incremented in place, never recomputed from an event
//! log (there is none). `engagement_data` is a schema-less payload written
//! wholesale on update, not merged field by field.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::GreetingId;

/// Which engagement counter to bump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngagementMetric {
    /// View counter.
    Views,

    /// Share counter.
    Shares,

    /// Like counter.
    Likes,
}

/// Engagement counters for a single greeting (1:1 with the greeting).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GreetingAnalytics {
    /// The greeting.
    pub greeting_id: GreetingId,

    /// Total views.
    pub views_count: u64,

    /// Total shares.
    pub shares_count: u64,

    /// Total likes.
    pub likes_count: u64,

    /// Auxiliary engagement facts (device mix, peak time, geography).
    /// Replaced wholesale on each update.
    pub engagement_data: serde_json::Value,

    /// When the counters were created.
    pub created_at: DateTime<Utc>,

    /// When the counters were last touched.
    pub updated_at: DateTime<Utc>,
}

impl GreetingAnalytics {
    /// Create zeroed counters for a greeting.
    #[must_use]
    pub fn new(greeting_id: GreetingId) -> Self {
        let now = Utc::now();
        Self {
            greeting_id,
            views_count: 0,
            shares_count: 0,
            likes_count: 0,
            engagement_data: serde_json::Value::Null,
            created_at: now,
            updated_at: now,
        }
    }

    /// Bump one counter by 1.
    pub fn increment(&mut self, metric: EngagementMetric) {
        match metric {
            EngagementMetric::Views => self.views_count += 1,
            EngagementMetric::Shares => self.shares_count += 1,
            EngagementMetric::Likes => self.likes_count += 1,
        }
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_start_at_zero() {
        let analytics = GreetingAnalytics::new(GreetingId::generate());
        assert_eq!(analytics.views_count, 0);
        assert_eq!(analytics.shares_count, 0);
        assert_eq!(analytics.likes_count, 0);
    }

    #[test]
    fn increment_touches_only_one_counter() {
        let mut analytics = GreetingAnalytics::new(GreetingId::generate());
        analytics.increment(EngagementMetric::Views);
        analytics.increment(EngagementMetric::Views);
        assert_eq!(analytics.views_count, 2);
        assert_eq!(analytics.shares_count, 0);
        assert_eq!(analytics.likes_count, 0);
        analytics.increment(EngagementMetric::Likes);
        assert_eq!(analytics.likes_count, 1);
    }
}
