//! Database schema definitions and column families.
//!
//! This module defines the column families used in `RocksDB` storage.

/// Column family names for the `RocksDB` database.
pub mod cf {
    /// User records, keyed by `user_id`.
    pub const USERS: &str = "users";

    /// Index: `email` -> `user_id` (16 bytes). Enforces email uniqueness.
    pub const USERS_BY_EMAIL: &str = "users_by_email";

    /// Creator profiles, keyed by `user_id` (the relationship is 1:1).
    pub const PROFILES: &str = "profiles";

    /// Connection records, keyed by `connection_id` (ULID).
    pub const CONNECTIONS: &str = "connections";

    /// Index: connections by participant, keyed by `user_id || connection_id`.
    /// Each connection has two entries, one per participant. Value is empty.
    pub const CONNECTIONS_BY_USER: &str = "connections_by_user";

    /// Index: `min(user_a, user_b) || max(user_a, user_b)` -> `connection_id`.
    /// One entry per unordered user pair; this is the symmetric-uniqueness
    /// invariant made physical.
    pub const CONNECTION_PAIRS: &str = "connection_pairs";

    /// Review records, keyed by `review_id` (ULID).
    pub const REVIEWS: &str = "reviews";

    /// Index: reviews received, keyed by `reviewee_id || review_id`.
    pub const REVIEWS_BY_REVIEWEE: &str = "reviews_by_reviewee";

    /// Index: reviews written, keyed by `reviewer_id || review_id`.
    pub const REVIEWS_BY_REVIEWER: &str = "reviews_by_reviewer";

    /// Index: `reviewer_id || reviewee_id` -> `review_id`. One review per
    /// (reviewer, reviewee) pair.
    pub const REVIEW_PAIRS: &str = "review_pairs";

    /// Greeting records, keyed by `greeting_id` (ULID).
    pub const GREETINGS: &str = "greetings";

    /// Index: greetings by author, keyed by `creator_id || greeting_id`.
    pub const GREETINGS_BY_CREATOR: &str = "greetings_by_creator";

    /// Recipient rows, keyed by `greeting_id || recipient_id`.
    pub const GREETING_RECIPIENTS: &str = "greeting_recipients";

    /// Index: greetings received, keyed by `recipient_id || greeting_id`.
    pub const RECIPIENTS_BY_USER: &str = "recipients_by_user";

    /// Engagement counters, keyed by `greeting_id` (1:1 with greetings).
    pub const GREETING_ANALYTICS: &str = "greeting_analytics";

    /// Template records, keyed by `template_id` (ULID).
    pub const TEMPLATES: &str = "templates";

    /// Index: templates by category, keyed by `category || 0x00 || template_id`.
    pub const TEMPLATES_BY_CATEGORY: &str = "templates_by_category";

    /// Media metadata records, keyed by `media_id` (ULID).
    pub const MEDIA: &str = "media";

    /// Index: media by owner, keyed by `user_id || media_id`.
    pub const MEDIA_BY_USER: &str = "media_by_user";
}

/// Returns all column family names for database initialization.
#[must_use]
pub fn all_column_families() -> Vec<&'static str> {
    vec![
        cf::USERS,
        cf::USERS_BY_EMAIL,
        cf::PROFILES,
        cf::CONNECTIONS,
        cf::CONNECTIONS_BY_USER,
        cf::CONNECTION_PAIRS,
        cf::REVIEWS,
        cf::REVIEWS_BY_REVIEWEE,
        cf::REVIEWS_BY_REVIEWER,
        cf::REVIEW_PAIRS,
        cf::GREETINGS,
        cf::GREETINGS_BY_CREATOR,
        cf::GREETING_RECIPIENTS,
        cf::RECIPIENTS_BY_USER,
        cf::GREETING_ANALYTICS,
        cf::TEMPLATES,
        cf::TEMPLATES_BY_CATEGORY,
        cf::MEDIA,
        cf::MEDIA_BY_USER,
    ]
}
