//! `RocksDB` storage layer for wishline.
//!
//! This crate provides persistent storage for users, creator profiles,
//! connections, reviews, greetings, templates, media metadata, and
//! engagement analytics using `RocksDB` with column families for primary
//! records and secondary indexes.
//!
//! # Invariants owned by this layer
//!
//! Multi-step mutations are written as single `WriteBatch` units, so
//! readers never observe these broken:
//!
//! - at most one connection per unordered user pair (`connection_pairs`
//!   reservation written with the row);
//! - at most one review per (reviewer, reviewee) pair (`review_pairs`);
//! - `CreatorProfile.rating` always equals the rounded mean of the
//!   creator's reviews (recomputed and written in the same batch as any
//!   review mutation);
//! - at most one user per email (`users_by_email`).
//!
//! # Example
//!
//! ```no_run
//! use wishline_store::{RocksStore, Store};
//! use wishline_core::User;
//!
//! let store = RocksStore::open("/tmp/wishline-db").unwrap();
//!
//! let user = User::new("Ada".into(), "ada@example.com".into(), "hash".into());
//! store.create_user(&user).unwrap();
//!
//! let retrieved = store.get_user(&user.id).unwrap();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod keys;
pub mod rocks;
pub mod schema;

pub use error::{Result, StoreError};
pub use rocks::RocksStore;

use serde::{Deserialize, Serialize};

use wishline_core::{
    Connection, ConnectionId, CreatorProfile, EngagementMetric, Greeting, GreetingAnalytics,
    GreetingId, GreetingRecipient, Media, MediaId, RatingStats, Review, ReviewId, Template,
    TemplateId, User, UserId, VerificationStatus,
};

/// Platform-wide record counts for the admin analytics surface.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlatformCounts {
    /// Registered users.
    pub total_users: u64,
    /// Users that upgraded to creators.
    pub total_creators: u64,
    /// All greetings.
    pub total_greetings: u64,
    /// All templates.
    pub total_templates: u64,
    /// All reviews.
    pub total_reviews: u64,
    /// All connections (any status).
    pub total_connections: u64,
    /// Views summed over every greeting.
    pub total_views: u64,
    /// Shares summed over every greeting.
    pub total_shares: u64,
    /// Likes summed over every greeting.
    pub total_likes: u64,
}

/// Engagement counters summed over one creator's greetings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngagementTotals {
    /// Total views.
    pub views: u64,
    /// Total shares.
    pub shares: u64,
    /// Total likes.
    pub likes: u64,
}

/// The storage trait defining all database operations.
///
/// This trait abstracts the storage layer, allowing for different
/// implementations. List operations return `(items, total)` so callers can
/// paginate; items are ordered newest first.
pub trait Store: Send + Sync {
    // =========================================================================
    // User Operations
    // =========================================================================

    /// Insert a new user, reserving the email.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::DuplicateEmail` if the email is taken.
    fn create_user(&self, user: &User) -> Result<()>;

    /// Update an existing user, moving the email reservation if it changed.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if the user doesn't exist.
    /// - `StoreError::DuplicateEmail` if the new email is taken.
    fn update_user(&self, user: &User) -> Result<()>;

    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_user(&self, user_id: &UserId) -> Result<Option<User>>;

    /// Look up a user by email (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Delete a user, their email reservation, and their creator profile.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the user doesn't exist.
    fn delete_user(&self, user_id: &UserId) -> Result<()>;

    /// List users, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_users(&self, limit: usize, offset: usize) -> Result<(Vec<User>, usize)>;

    // =========================================================================
    // Creator Profile Operations
    // =========================================================================

    /// Insert or update a creator profile (keyed by user ID).
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_profile(&self, profile: &CreatorProfile) -> Result<()>;

    /// Get a creator profile by the owning user's ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_profile(&self, user_id: &UserId) -> Result<Option<CreatorProfile>>;

    /// Delete a creator profile.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the profile doesn't exist.
    fn delete_profile(&self, user_id: &UserId) -> Result<()>;

    /// List creator profiles.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_profiles(&self, limit: usize, offset: usize) -> Result<(Vec<CreatorProfile>, usize)>;

    /// Set the verification status on a profile.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the profile doesn't exist.
    fn set_verification(&self, user_id: &UserId, status: VerificationStatus) -> Result<CreatorProfile>;

    /// Approved creators with at least one review, best rated first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn top_rated_creators(&self, limit: usize) -> Result<Vec<CreatorProfile>>;

    // =========================================================================
    // Connection Operations
    // =========================================================================

    /// Insert a new connection, reserving the unordered user pair in the
    /// same batch. This is the atomic check-then-create for the symmetric
    /// uniqueness invariant.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::DuplicateConnection` if any connection already
    /// exists between the pair, in either direction.
    fn create_connection(&self, connection: &Connection) -> Result<()>;

    /// Get a connection by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_connection(&self, connection_id: &ConnectionId) -> Result<Option<Connection>>;

    /// Write back a mutated connection (status transitions only; the
    /// participants never change).
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the connection doesn't exist.
    fn update_connection(&self, connection: &Connection) -> Result<()>;

    /// Delete a connection and release the pair reservation.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the connection doesn't exist.
    fn delete_connection(&self, connection_id: &ConnectionId) -> Result<()>;

    /// The connection between two users, in either direction, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_connection_between(&self, user_a: &UserId, user_b: &UserId)
        -> Result<Option<Connection>>;

    /// All connections a user participates in, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_connections_for_user(
        &self,
        user_id: &UserId,
        limit: usize,
        offset: usize,
    ) -> Result<(Vec<Connection>, usize)>;

    // =========================================================================
    // Review Operations
    // =========================================================================

    /// Insert a new review. Reserves the (reviewer, reviewee) pair and
    /// writes the reviewee's recomputed profile rating in the same batch.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::DuplicateReview` if the reviewer already
    /// reviewed this creator.
    fn create_review(&self, review: &Review) -> Result<()>;

    /// Get a review by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_review(&self, review_id: &ReviewId) -> Result<Option<Review>>;

    /// Write back a mutated review and the recomputed profile rating in
    /// one batch.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the review doesn't exist.
    fn update_review(&self, review: &Review) -> Result<()>;

    /// Delete a review, release the pair, and write the recomputed profile
    /// rating in one batch.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the review doesn't exist.
    fn delete_review(&self, review_id: &ReviewId) -> Result<()>;

    /// Reviews received by a creator, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_reviews_for_reviewee(
        &self,
        reviewee_id: &UserId,
        limit: usize,
        offset: usize,
    ) -> Result<(Vec<Review>, usize)>;

    /// Reviews written by a user, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_reviews_by_reviewer(
        &self,
        reviewer_id: &UserId,
        limit: usize,
        offset: usize,
    ) -> Result<(Vec<Review>, usize)>;

    /// Aggregated review statistics for a creator.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn rating_stats(&self, reviewee_id: &UserId) -> Result<RatingStats>;

    // =========================================================================
    // Greeting Operations
    // =========================================================================

    /// Insert a new greeting. Also creates the zeroed analytics row and
    /// bumps the author's `total_greetings_created` in the same batch.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn create_greeting(&self, greeting: &Greeting) -> Result<()>;

    /// Get a greeting by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_greeting(&self, greeting_id: &GreetingId) -> Result<Option<Greeting>>;

    /// Write back a mutated greeting.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the greeting doesn't exist.
    fn update_greeting(&self, greeting: &Greeting) -> Result<()>;

    /// Delete a greeting with its analytics row and recipient rows.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the greeting doesn't exist.
    fn delete_greeting(&self, greeting_id: &GreetingId) -> Result<()>;

    /// Greetings authored by a creator, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_greetings_by_creator(
        &self,
        creator_id: &UserId,
        limit: usize,
        offset: usize,
    ) -> Result<(Vec<Greeting>, usize)>;

    /// Attach a recipient to a greeting.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::DuplicateRecipient` if already attached.
    fn add_recipient(&self, recipient: &GreetingRecipient) -> Result<()>;

    /// Get one recipient row.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_recipient(
        &self,
        greeting_id: &GreetingId,
        recipient_id: &UserId,
    ) -> Result<Option<GreetingRecipient>>;

    /// Write back a mutated recipient row.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the row doesn't exist.
    fn update_recipient(&self, recipient: &GreetingRecipient) -> Result<()>;

    /// All recipients of a greeting.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_recipients(&self, greeting_id: &GreetingId) -> Result<Vec<GreetingRecipient>>;

    /// Number of greetings a user has received.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn count_received_greetings(&self, recipient_id: &UserId) -> Result<u64>;

    // =========================================================================
    // Analytics Operations
    // =========================================================================

    /// Get the engagement counters for a greeting.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_analytics(&self, greeting_id: &GreetingId) -> Result<Option<GreetingAnalytics>>;

    /// Atomically bump one engagement counter by 1, returning the updated
    /// row.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the greeting has no analytics row.
    fn increment_engagement(
        &self,
        greeting_id: &GreetingId,
        metric: EngagementMetric,
    ) -> Result<GreetingAnalytics>;

    /// Replace the free-form engagement payload wholesale.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the greeting has no analytics row.
    fn set_engagement_data(
        &self,
        greeting_id: &GreetingId,
        data: serde_json::Value,
    ) -> Result<GreetingAnalytics>;

    /// Engagement counters summed over a creator's greetings.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn engagement_totals_for_creator(&self, creator_id: &UserId) -> Result<EngagementTotals>;

    /// A creator's greetings with their analytics, most viewed first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn top_greetings_by_views(
        &self,
        creator_id: &UserId,
        limit: usize,
    ) -> Result<Vec<(Greeting, GreetingAnalytics)>>;

    // =========================================================================
    // Template Operations
    // =========================================================================

    /// Insert a new template.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn create_template(&self, template: &Template) -> Result<()>;

    /// Get a template by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_template(&self, template_id: &TemplateId) -> Result<Option<Template>>;

    /// Write back a mutated template, moving its category index entry if
    /// the category changed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the template doesn't exist.
    fn update_template(&self, template: &Template) -> Result<()>;

    /// Delete a template and its category index entry.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the template doesn't exist.
    fn delete_template(&self, template_id: &TemplateId) -> Result<()>;

    /// List templates, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_templates(&self, limit: usize, offset: usize) -> Result<(Vec<Template>, usize)>;

    /// Templates in a category, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_templates_by_category(&self, category: &str) -> Result<Vec<Template>>;

    /// Atomically bump a template's usage counter, returning the updated
    /// record.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the template doesn't exist.
    fn increment_template_usage(&self, template_id: &TemplateId) -> Result<Template>;

    /// Most used templates first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn popular_templates(&self, limit: usize) -> Result<Vec<Template>>;

    // =========================================================================
    // Media Operations
    // =========================================================================

    /// Register a media asset.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn create_media(&self, media: &Media) -> Result<()>;

    /// Get a media record by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_media(&self, media_id: &MediaId) -> Result<Option<Media>>;

    /// Delete a media record.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the record doesn't exist.
    fn delete_media(&self, media_id: &MediaId) -> Result<()>;

    /// Media owned by a user, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_media_by_user(
        &self,
        user_id: &UserId,
        limit: usize,
        offset: usize,
    ) -> Result<(Vec<Media>, usize)>;

    // =========================================================================
    // Platform Operations
    // =========================================================================

    /// Record counts and engagement totals across the whole platform.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn platform_counts(&self) -> Result<PlatformCounts>;
}
