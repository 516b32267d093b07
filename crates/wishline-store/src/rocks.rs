//! `RocksDB` storage implementation.
//!
//! This module provides the `RocksStore` implementation of the `Store` trait.
//!
//! Multi-record mutations are staged into a `WriteBatch` and committed in
//! one write. Check-then-act sequences (pair reservations, counter bumps,
//! rating recomputes) additionally serialize on `write_lock` so no two
//! writers can both pass the same check.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, Direction, IteratorMode,
    MultiThreaded, Options, WriteBatch,
};

use wishline_core::{
    average_rating, Connection, ConnectionId, CreatorProfile, EngagementMetric, Greeting,
    GreetingAnalytics, GreetingId, GreetingRecipient, Media, MediaId, RatingStats, Review,
    ReviewId, Template, TemplateId, User, UserId, VerificationStatus,
};

use crate::error::{Result, StoreError};
use crate::keys;
use crate::schema::{all_column_families, cf};
use crate::{EngagementTotals, PlatformCounts, Store};

/// RocksDB-backed storage implementation.
pub struct RocksStore {
    db: Arc<DBWithThreadMode<MultiThreaded>>,
    /// Serializes check-then-act write sequences. `RocksDB` batches are
    /// atomic but not isolated; without this two writers could both pass a
    /// uniqueness check before either commits.
    write_lock: Mutex<()>,
}

impl RocksStore {
    /// Open or create a `RocksDB` database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors: Vec<_> = all_column_families()
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect();

        let db = DBWithThreadMode::open_cf_descriptors(&opts, path.as_ref(), cf_descriptors)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        tracing::debug!(path = %path.as_ref().display(), "opened database");

        Ok(Self {
            db: Arc::new(db),
            write_lock: Mutex::new(()),
        })
    }

    /// Get a column family handle.
    fn cf(&self, name: &str) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Database(format!("column family not found: {name}")))
    }

    /// Acquire the writer lock.
    fn lock(&self) -> Result<MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|_| StoreError::Database("write lock poisoned".into()))
    }

    /// Serialize a value using CBOR.
    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize a value from CBOR.
    fn deserialize<T: serde::de::DeserializeOwned>(data: &[u8]) -> Result<T> {
        ciborium::from_reader(data).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    fn write(&self, batch: WriteBatch) -> Result<()> {
        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    /// Collect the 16-byte ID suffixes under a prefix in an index column
    /// family, newest first (index keys end in a ULID, so forward iteration
    /// order is chronological).
    fn index_ids(&self, cf_name: &str, prefix: &[u8]) -> Result<Vec<[u8; 16]>> {
        let cf = self.cf(cf_name)?;
        let iter = self
            .db
            .iterator_cf(&cf, IteratorMode::From(prefix, Direction::Forward));

        let mut ids = Vec::new();
        for item in iter {
            let (key, _) = item.map_err(|e| StoreError::Database(e.to_string()))?;
            if !key.starts_with(prefix) {
                break;
            }
            ids.push(keys::extract_id_suffix(&key));
        }

        ids.reverse();
        Ok(ids)
    }

    /// Deserialize every value in a column family.
    fn scan_all<T: serde::de::DeserializeOwned>(&self, cf_name: &str) -> Result<Vec<T>> {
        let cf = self.cf(cf_name)?;
        let mut items = Vec::new();
        for item in self.db.iterator_cf(&cf, IteratorMode::Start) {
            let (_, value) = item.map_err(|e| StoreError::Database(e.to_string()))?;
            items.push(Self::deserialize(&value)?);
        }
        Ok(items)
    }

    fn count_cf(&self, cf_name: &str) -> Result<u64> {
        let cf = self.cf(cf_name)?;
        let mut count = 0u64;
        for item in self.db.iterator_cf(&cf, IteratorMode::Start) {
            item.map_err(|e| StoreError::Database(e.to_string()))?;
            count += 1;
        }
        Ok(count)
    }

    /// All reviews received by a creator.
    fn reviewee_reviews(&self, reviewee_id: &UserId) -> Result<Vec<Review>> {
        let prefix = keys::owner_prefix(reviewee_id);
        let ids = self.index_ids(cf::REVIEWS_BY_REVIEWEE, &prefix)?;

        let mut reviews = Vec::with_capacity(ids.len());
        for id_bytes in ids {
            let review_id = ReviewId::from_bytes(id_bytes)
                .map_err(|e| StoreError::Serialization(e.to_string()))?;
            if let Some(review) = self.get_review(&review_id)? {
                reviews.push(review);
            }
        }
        Ok(reviews)
    }

    /// Stage the reviewee's recomputed profile rating into the batch.
    ///
    /// Non-creator reviewees have no profile row; nothing is staged then.
    fn stage_profile_rating(
        &self,
        batch: &mut WriteBatch,
        reviewee_id: &UserId,
        ratings: &[u8],
    ) -> Result<()> {
        if let Some(mut profile) = self.get_profile(reviewee_id)? {
            profile.rating = average_rating(ratings);
            profile.updated_at = chrono::Utc::now();

            let cf_profiles = self.cf(cf::PROFILES)?;
            batch.put_cf(
                &cf_profiles,
                keys::user_key(reviewee_id),
                Self::serialize(&profile)?,
            );
        }
        Ok(())
    }
}

fn paginate<T>(mut items: Vec<T>, limit: usize, offset: usize) -> (Vec<T>, usize) {
    let total = items.len();
    let items = if offset >= total {
        Vec::new()
    } else {
        items.drain(offset..).take(limit).collect()
    };
    (items, total)
}

impl Store for RocksStore {
    // =========================================================================
    // User Operations
    // =========================================================================

    fn create_user(&self, user: &User) -> Result<()> {
        let _guard = self.lock()?;

        let cf_users = self.cf(cf::USERS)?;
        let cf_emails = self.cf(cf::USERS_BY_EMAIL)?;
        let email_key = keys::email_key(&user.email);

        let taken = self
            .db
            .get_cf(&cf_emails, &email_key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .is_some();
        if taken {
            return Err(StoreError::DuplicateEmail {
                email: user.email.clone(),
            });
        }

        let mut batch = WriteBatch::default();
        batch.put_cf(&cf_users, keys::user_key(&user.id), Self::serialize(user)?);
        batch.put_cf(&cf_emails, &email_key, user.id.as_bytes());

        self.write(batch)
    }

    fn update_user(&self, user: &User) -> Result<()> {
        let _guard = self.lock()?;

        let existing = self
            .get_user(&user.id)?
            .ok_or_else(|| StoreError::not_found("user", user.id))?;

        let cf_users = self.cf(cf::USERS)?;
        let cf_emails = self.cf(cf::USERS_BY_EMAIL)?;

        let old_email_key = keys::email_key(&existing.email);
        let new_email_key = keys::email_key(&user.email);

        let mut batch = WriteBatch::default();

        if new_email_key != old_email_key {
            let taken = self
                .db
                .get_cf(&cf_emails, &new_email_key)
                .map_err(|e| StoreError::Database(e.to_string()))?
                .is_some();
            if taken {
                return Err(StoreError::DuplicateEmail {
                    email: user.email.clone(),
                });
            }
            batch.delete_cf(&cf_emails, &old_email_key);
            batch.put_cf(&cf_emails, &new_email_key, user.id.as_bytes());
        }

        batch.put_cf(&cf_users, keys::user_key(&user.id), Self::serialize(user)?);
        self.write(batch)
    }

    fn get_user(&self, user_id: &UserId) -> Result<Option<User>> {
        let cf = self.cf(cf::USERS)?;
        self.db
            .get_cf(&cf, keys::user_key(user_id))
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let cf_emails = self.cf(cf::USERS_BY_EMAIL)?;
        let Some(id_bytes) = self
            .db
            .get_cf(&cf_emails, keys::email_key(email))
            .map_err(|e| StoreError::Database(e.to_string()))?
        else {
            return Ok(None);
        };

        let cf_users = self.cf(cf::USERS)?;
        self.db
            .get_cf(&cf_users, &id_bytes)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn delete_user(&self, user_id: &UserId) -> Result<()> {
        let _guard = self.lock()?;

        let user = self
            .get_user(user_id)?
            .ok_or_else(|| StoreError::not_found("user", user_id))?;

        let cf_users = self.cf(cf::USERS)?;
        let cf_emails = self.cf(cf::USERS_BY_EMAIL)?;
        let cf_profiles = self.cf(cf::PROFILES)?;

        let mut batch = WriteBatch::default();
        batch.delete_cf(&cf_users, keys::user_key(user_id));
        batch.delete_cf(&cf_emails, keys::email_key(&user.email));
        batch.delete_cf(&cf_profiles, keys::user_key(user_id));

        self.write(batch)
    }

    fn list_users(&self, limit: usize, offset: usize) -> Result<(Vec<User>, usize)> {
        // User keys are UUIDs, so the column family has no useful order;
        // sort by registration time.
        let mut users: Vec<User> = self.scan_all(cf::USERS)?;
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(paginate(users, limit, offset))
    }

    // =========================================================================
    // Creator Profile Operations
    // =========================================================================

    fn put_profile(&self, profile: &CreatorProfile) -> Result<()> {
        let cf = self.cf(cf::PROFILES)?;
        self.db
            .put_cf(
                &cf,
                keys::user_key(&profile.user_id),
                Self::serialize(profile)?,
            )
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    fn get_profile(&self, user_id: &UserId) -> Result<Option<CreatorProfile>> {
        let cf = self.cf(cf::PROFILES)?;
        self.db
            .get_cf(&cf, keys::user_key(user_id))
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn delete_profile(&self, user_id: &UserId) -> Result<()> {
        let cf = self.cf(cf::PROFILES)?;

        if self.get_profile(user_id)?.is_none() {
            return Err(StoreError::not_found("profile", user_id));
        }

        self.db
            .delete_cf(&cf, keys::user_key(user_id))
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    fn list_profiles(&self, limit: usize, offset: usize) -> Result<(Vec<CreatorProfile>, usize)> {
        let mut profiles: Vec<CreatorProfile> = self.scan_all(cf::PROFILES)?;
        profiles.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(paginate(profiles, limit, offset))
    }

    fn set_verification(
        &self,
        user_id: &UserId,
        status: VerificationStatus,
    ) -> Result<CreatorProfile> {
        let _guard = self.lock()?;

        let mut profile = self
            .get_profile(user_id)?
            .ok_or_else(|| StoreError::not_found("profile", user_id))?;

        profile.verification_status = status;
        profile.updated_at = chrono::Utc::now();

        let cf_profiles = self.cf(cf::PROFILES)?;
        let mut batch = WriteBatch::default();
        batch.put_cf(
            &cf_profiles,
            keys::user_key(user_id),
            Self::serialize(&profile)?,
        );

        // The verified flag on the user record mirrors the profile status.
        if let Some(mut user) = self.get_user(user_id)? {
            user.is_verified_creator = status == VerificationStatus::Approved;
            user.updated_at = chrono::Utc::now();

            let cf_users = self.cf(cf::USERS)?;
            batch.put_cf(&cf_users, keys::user_key(user_id), Self::serialize(&user)?);
        }

        self.write(batch)?;
        Ok(profile)
    }

    fn top_rated_creators(&self, limit: usize) -> Result<Vec<CreatorProfile>> {
        let mut profiles: Vec<CreatorProfile> = self
            .scan_all::<CreatorProfile>(cf::PROFILES)?
            .into_iter()
            .filter(|p| p.is_approved() && p.rating > 0.0)
            .collect();

        profiles.sort_by(|a, b| {
            b.rating
                .partial_cmp(&a.rating)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        profiles.truncate(limit);
        Ok(profiles)
    }

    // =========================================================================
    // Connection Operations
    // =========================================================================

    fn create_connection(&self, connection: &Connection) -> Result<()> {
        let _guard = self.lock()?;

        let cf_connections = self.cf(cf::CONNECTIONS)?;
        let cf_by_user = self.cf(cf::CONNECTIONS_BY_USER)?;
        let cf_pairs = self.cf(cf::CONNECTION_PAIRS)?;

        // The pair key is symmetric, so this also catches a request in the
        // opposite direction.
        let pair_key = keys::connection_pair_key(&connection.requester_id, &connection.receiver_id);
        let taken = self
            .db
            .get_cf(&cf_pairs, &pair_key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .is_some();
        if taken {
            return Err(StoreError::DuplicateConnection {
                user_a: connection.requester_id.to_string(),
                user_b: connection.receiver_id.to_string(),
            });
        }

        let mut batch = WriteBatch::default();
        batch.put_cf(
            &cf_connections,
            keys::connection_key(&connection.id),
            Self::serialize(connection)?,
        );
        batch.put_cf(
            &cf_by_user,
            keys::user_connection_key(&connection.requester_id, &connection.id),
            [],
        );
        batch.put_cf(
            &cf_by_user,
            keys::user_connection_key(&connection.receiver_id, &connection.id),
            [],
        );
        batch.put_cf(&cf_pairs, &pair_key, connection.id.to_bytes());

        self.write(batch)
    }

    fn get_connection(&self, connection_id: &ConnectionId) -> Result<Option<Connection>> {
        let cf = self.cf(cf::CONNECTIONS)?;
        self.db
            .get_cf(&cf, keys::connection_key(connection_id))
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn update_connection(&self, connection: &Connection) -> Result<()> {
        let cf = self.cf(cf::CONNECTIONS)?;

        if self.get_connection(&connection.id)?.is_none() {
            return Err(StoreError::not_found("connection", connection.id));
        }

        self.db
            .put_cf(
                &cf,
                keys::connection_key(&connection.id),
                Self::serialize(connection)?,
            )
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    fn delete_connection(&self, connection_id: &ConnectionId) -> Result<()> {
        let _guard = self.lock()?;

        let connection = self
            .get_connection(connection_id)?
            .ok_or_else(|| StoreError::not_found("connection", connection_id))?;

        let cf_connections = self.cf(cf::CONNECTIONS)?;
        let cf_by_user = self.cf(cf::CONNECTIONS_BY_USER)?;
        let cf_pairs = self.cf(cf::CONNECTION_PAIRS)?;

        let mut batch = WriteBatch::default();
        batch.delete_cf(&cf_connections, keys::connection_key(connection_id));
        batch.delete_cf(
            &cf_by_user,
            keys::user_connection_key(&connection.requester_id, connection_id),
        );
        batch.delete_cf(
            &cf_by_user,
            keys::user_connection_key(&connection.receiver_id, connection_id),
        );
        batch.delete_cf(
            &cf_pairs,
            keys::connection_pair_key(&connection.requester_id, &connection.receiver_id),
        );

        self.write(batch)
    }

    fn get_connection_between(
        &self,
        user_a: &UserId,
        user_b: &UserId,
    ) -> Result<Option<Connection>> {
        let cf_pairs = self.cf(cf::CONNECTION_PAIRS)?;
        let Some(id_bytes) = self
            .db
            .get_cf(&cf_pairs, keys::connection_pair_key(user_a, user_b))
            .map_err(|e| StoreError::Database(e.to_string()))?
        else {
            return Ok(None);
        };

        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(&id_bytes);
        let connection_id = ConnectionId::from_bytes(bytes)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.get_connection(&connection_id)
    }

    fn list_connections_for_user(
        &self,
        user_id: &UserId,
        limit: usize,
        offset: usize,
    ) -> Result<(Vec<Connection>, usize)> {
        let prefix = keys::owner_prefix(user_id);
        let ids = self.index_ids(cf::CONNECTIONS_BY_USER, &prefix)?;
        let total = ids.len();

        let mut connections = Vec::new();
        for id_bytes in ids.into_iter().skip(offset).take(limit) {
            let connection_id = ConnectionId::from_bytes(id_bytes)
                .map_err(|e| StoreError::Serialization(e.to_string()))?;
            if let Some(connection) = self.get_connection(&connection_id)? {
                connections.push(connection);
            }
        }

        Ok((connections, total))
    }

    // =========================================================================
    // Review Operations
    // =========================================================================

    fn create_review(&self, review: &Review) -> Result<()> {
        let _guard = self.lock()?;

        let cf_reviews = self.cf(cf::REVIEWS)?;
        let cf_by_reviewee = self.cf(cf::REVIEWS_BY_REVIEWEE)?;
        let cf_by_reviewer = self.cf(cf::REVIEWS_BY_REVIEWER)?;
        let cf_pairs = self.cf(cf::REVIEW_PAIRS)?;

        let pair_key = keys::review_pair_key(&review.reviewer_id, &review.reviewee_id);
        let taken = self
            .db
            .get_cf(&cf_pairs, &pair_key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .is_some();
        if taken {
            return Err(StoreError::DuplicateReview {
                reviewer: review.reviewer_id.to_string(),
                reviewee: review.reviewee_id.to_string(),
            });
        }

        // Recompute the reviewee's rating over existing reviews plus this
        // one, and commit it in the same batch as the review itself.
        let mut ratings: Vec<u8> = self
            .reviewee_reviews(&review.reviewee_id)?
            .iter()
            .map(|r| r.rating)
            .collect();
        ratings.push(review.rating);

        let mut batch = WriteBatch::default();
        batch.put_cf(
            &cf_reviews,
            keys::review_key(&review.id),
            Self::serialize(review)?,
        );
        batch.put_cf(
            &cf_by_reviewee,
            keys::user_review_key(&review.reviewee_id, &review.id),
            [],
        );
        batch.put_cf(
            &cf_by_reviewer,
            keys::user_review_key(&review.reviewer_id, &review.id),
            [],
        );
        batch.put_cf(&cf_pairs, &pair_key, review.id.to_bytes());

        self.stage_profile_rating(&mut batch, &review.reviewee_id, &ratings)?;
        self.write(batch)
    }

    fn get_review(&self, review_id: &ReviewId) -> Result<Option<Review>> {
        let cf = self.cf(cf::REVIEWS)?;
        self.db
            .get_cf(&cf, keys::review_key(review_id))
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn update_review(&self, review: &Review) -> Result<()> {
        let _guard = self.lock()?;

        if self.get_review(&review.id)?.is_none() {
            return Err(StoreError::not_found("review", review.id));
        }

        // Reviewer and reviewee are immutable, so only the rating changes
        // the aggregate. Substitute the new rating for the stored one.
        let ratings: Vec<u8> = self
            .reviewee_reviews(&review.reviewee_id)?
            .iter()
            .map(|r| if r.id == review.id { review.rating } else { r.rating })
            .collect();

        let cf_reviews = self.cf(cf::REVIEWS)?;
        let mut batch = WriteBatch::default();
        batch.put_cf(
            &cf_reviews,
            keys::review_key(&review.id),
            Self::serialize(review)?,
        );

        self.stage_profile_rating(&mut batch, &review.reviewee_id, &ratings)?;
        self.write(batch)
    }

    fn delete_review(&self, review_id: &ReviewId) -> Result<()> {
        let _guard = self.lock()?;

        let review = self
            .get_review(review_id)?
            .ok_or_else(|| StoreError::not_found("review", review_id))?;

        let ratings: Vec<u8> = self
            .reviewee_reviews(&review.reviewee_id)?
            .iter()
            .filter(|r| r.id != review.id)
            .map(|r| r.rating)
            .collect();

        let cf_reviews = self.cf(cf::REVIEWS)?;
        let cf_by_reviewee = self.cf(cf::REVIEWS_BY_REVIEWEE)?;
        let cf_by_reviewer = self.cf(cf::REVIEWS_BY_REVIEWER)?;
        let cf_pairs = self.cf(cf::REVIEW_PAIRS)?;

        let mut batch = WriteBatch::default();
        batch.delete_cf(&cf_reviews, keys::review_key(review_id));
        batch.delete_cf(
            &cf_by_reviewee,
            keys::user_review_key(&review.reviewee_id, review_id),
        );
        batch.delete_cf(
            &cf_by_reviewer,
            keys::user_review_key(&review.reviewer_id, review_id),
        );
        batch.delete_cf(
            &cf_pairs,
            keys::review_pair_key(&review.reviewer_id, &review.reviewee_id),
        );

        self.stage_profile_rating(&mut batch, &review.reviewee_id, &ratings)?;
        self.write(batch)
    }

    fn list_reviews_for_reviewee(
        &self,
        reviewee_id: &UserId,
        limit: usize,
        offset: usize,
    ) -> Result<(Vec<Review>, usize)> {
        let reviews = self.reviewee_reviews(reviewee_id)?;
        Ok(paginate(reviews, limit, offset))
    }

    fn list_reviews_by_reviewer(
        &self,
        reviewer_id: &UserId,
        limit: usize,
        offset: usize,
    ) -> Result<(Vec<Review>, usize)> {
        let prefix = keys::owner_prefix(reviewer_id);
        let ids = self.index_ids(cf::REVIEWS_BY_REVIEWER, &prefix)?;
        let total = ids.len();

        let mut reviews = Vec::new();
        for id_bytes in ids.into_iter().skip(offset).take(limit) {
            let review_id = ReviewId::from_bytes(id_bytes)
                .map_err(|e| StoreError::Serialization(e.to_string()))?;
            if let Some(review) = self.get_review(&review_id)? {
                reviews.push(review);
            }
        }

        Ok((reviews, total))
    }

    fn rating_stats(&self, reviewee_id: &UserId) -> Result<RatingStats> {
        let ratings: Vec<u8> = self
            .reviewee_reviews(reviewee_id)?
            .iter()
            .map(|r| r.rating)
            .collect();

        if ratings.is_empty() {
            Ok(RatingStats::empty())
        } else {
            Ok(RatingStats::from_ratings(&ratings))
        }
    }

    // =========================================================================
    // Greeting Operations
    // =========================================================================

    fn create_greeting(&self, greeting: &Greeting) -> Result<()> {
        let _guard = self.lock()?;

        let cf_greetings = self.cf(cf::GREETINGS)?;
        let cf_by_creator = self.cf(cf::GREETINGS_BY_CREATOR)?;
        let cf_analytics = self.cf(cf::GREETING_ANALYTICS)?;

        let analytics = GreetingAnalytics::new(greeting.id);

        let mut batch = WriteBatch::default();
        batch.put_cf(
            &cf_greetings,
            keys::greeting_key(&greeting.id),
            Self::serialize(greeting)?,
        );
        batch.put_cf(
            &cf_by_creator,
            keys::creator_greeting_key(&greeting.creator_id, &greeting.id),
            [],
        );
        batch.put_cf(
            &cf_analytics,
            keys::greeting_key(&greeting.id),
            Self::serialize(&analytics)?,
        );

        // Authoring also bumps the creator's lifetime counter.
        if let Some(mut profile) = self.get_profile(&greeting.creator_id)? {
            profile.total_greetings_created += 1;
            profile.updated_at = chrono::Utc::now();

            let cf_profiles = self.cf(cf::PROFILES)?;
            batch.put_cf(
                &cf_profiles,
                keys::user_key(&greeting.creator_id),
                Self::serialize(&profile)?,
            );
        }

        self.write(batch)
    }

    fn get_greeting(&self, greeting_id: &GreetingId) -> Result<Option<Greeting>> {
        let cf = self.cf(cf::GREETINGS)?;
        self.db
            .get_cf(&cf, keys::greeting_key(greeting_id))
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn update_greeting(&self, greeting: &Greeting) -> Result<()> {
        let cf = self.cf(cf::GREETINGS)?;

        if self.get_greeting(&greeting.id)?.is_none() {
            return Err(StoreError::not_found("greeting", greeting.id));
        }

        self.db
            .put_cf(
                &cf,
                keys::greeting_key(&greeting.id),
                Self::serialize(greeting)?,
            )
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    fn delete_greeting(&self, greeting_id: &GreetingId) -> Result<()> {
        let _guard = self.lock()?;

        let greeting = self
            .get_greeting(greeting_id)?
            .ok_or_else(|| StoreError::not_found("greeting", greeting_id))?;

        let cf_greetings = self.cf(cf::GREETINGS)?;
        let cf_by_creator = self.cf(cf::GREETINGS_BY_CREATOR)?;
        let cf_analytics = self.cf(cf::GREETING_ANALYTICS)?;
        let cf_recipients = self.cf(cf::GREETING_RECIPIENTS)?;
        let cf_by_recipient = self.cf(cf::RECIPIENTS_BY_USER)?;

        let mut batch = WriteBatch::default();
        batch.delete_cf(&cf_greetings, keys::greeting_key(greeting_id));
        batch.delete_cf(
            &cf_by_creator,
            keys::creator_greeting_key(&greeting.creator_id, greeting_id),
        );
        batch.delete_cf(&cf_analytics, keys::greeting_key(greeting_id));

        // Drop every recipient row along with its user-side index mirror.
        for recipient in self.list_recipients(greeting_id)? {
            batch.delete_cf(
                &cf_recipients,
                keys::recipient_key(greeting_id, &recipient.recipient_id),
            );
            batch.delete_cf(
                &cf_by_recipient,
                keys::user_recipient_key(&recipient.recipient_id, greeting_id),
            );
        }

        self.write(batch)
    }

    fn list_greetings_by_creator(
        &self,
        creator_id: &UserId,
        limit: usize,
        offset: usize,
    ) -> Result<(Vec<Greeting>, usize)> {
        let prefix = keys::owner_prefix(creator_id);
        let ids = self.index_ids(cf::GREETINGS_BY_CREATOR, &prefix)?;
        let total = ids.len();

        let mut greetings = Vec::new();
        for id_bytes in ids.into_iter().skip(offset).take(limit) {
            let greeting_id = GreetingId::from_bytes(id_bytes)
                .map_err(|e| StoreError::Serialization(e.to_string()))?;
            if let Some(greeting) = self.get_greeting(&greeting_id)? {
                greetings.push(greeting);
            }
        }

        Ok((greetings, total))
    }

    fn add_recipient(&self, recipient: &GreetingRecipient) -> Result<()> {
        let _guard = self.lock()?;

        let key = keys::recipient_key(&recipient.greeting_id, &recipient.recipient_id);
        if self
            .get_recipient(&recipient.greeting_id, &recipient.recipient_id)?
            .is_some()
        {
            return Err(StoreError::DuplicateRecipient {
                greeting: recipient.greeting_id.to_string(),
                recipient: recipient.recipient_id.to_string(),
            });
        }

        let cf_recipients = self.cf(cf::GREETING_RECIPIENTS)?;
        let cf_by_recipient = self.cf(cf::RECIPIENTS_BY_USER)?;

        let mut batch = WriteBatch::default();
        batch.put_cf(&cf_recipients, &key, Self::serialize(recipient)?);
        batch.put_cf(
            &cf_by_recipient,
            keys::user_recipient_key(&recipient.recipient_id, &recipient.greeting_id),
            [],
        );

        self.write(batch)
    }

    fn get_recipient(
        &self,
        greeting_id: &GreetingId,
        recipient_id: &UserId,
    ) -> Result<Option<GreetingRecipient>> {
        let cf = self.cf(cf::GREETING_RECIPIENTS)?;
        self.db
            .get_cf(&cf, keys::recipient_key(greeting_id, recipient_id))
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn update_recipient(&self, recipient: &GreetingRecipient) -> Result<()> {
        let cf = self.cf(cf::GREETING_RECIPIENTS)?;

        if self
            .get_recipient(&recipient.greeting_id, &recipient.recipient_id)?
            .is_none()
        {
            return Err(StoreError::not_found("recipient", recipient.recipient_id));
        }

        self.db
            .put_cf(
                &cf,
                keys::recipient_key(&recipient.greeting_id, &recipient.recipient_id),
                Self::serialize(recipient)?,
            )
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    fn list_recipients(&self, greeting_id: &GreetingId) -> Result<Vec<GreetingRecipient>> {
        let cf = self.cf(cf::GREETING_RECIPIENTS)?;
        let prefix = greeting_id.to_bytes();

        let iter = self
            .db
            .iterator_cf(&cf, IteratorMode::From(&prefix, Direction::Forward));

        let mut recipients = Vec::new();
        for item in iter {
            let (key, value) = item.map_err(|e| StoreError::Database(e.to_string()))?;
            if !key.starts_with(&prefix) {
                break;
            }
            recipients.push(Self::deserialize(&value)?);
        }

        Ok(recipients)
    }

    fn count_received_greetings(&self, recipient_id: &UserId) -> Result<u64> {
        let prefix = keys::owner_prefix(recipient_id);
        let ids = self.index_ids(cf::RECIPIENTS_BY_USER, &prefix)?;
        Ok(ids.len() as u64)
    }

    // =========================================================================
    // Analytics Operations
    // =========================================================================

    fn get_analytics(&self, greeting_id: &GreetingId) -> Result<Option<GreetingAnalytics>> {
        let cf = self.cf(cf::GREETING_ANALYTICS)?;
        self.db
            .get_cf(&cf, keys::greeting_key(greeting_id))
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn increment_engagement(
        &self,
        greeting_id: &GreetingId,
        metric: EngagementMetric,
    ) -> Result<GreetingAnalytics> {
        let _guard = self.lock()?;

        let mut analytics = self
            .get_analytics(greeting_id)?
            .ok_or_else(|| StoreError::not_found("analytics", greeting_id))?;

        analytics.increment(metric);

        let cf = self.cf(cf::GREETING_ANALYTICS)?;
        self.db
            .put_cf(
                &cf,
                keys::greeting_key(greeting_id),
                Self::serialize(&analytics)?,
            )
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(analytics)
    }

    fn set_engagement_data(
        &self,
        greeting_id: &GreetingId,
        data: serde_json::Value,
    ) -> Result<GreetingAnalytics> {
        let _guard = self.lock()?;

        let mut analytics = self
            .get_analytics(greeting_id)?
            .ok_or_else(|| StoreError::not_found("analytics", greeting_id))?;

        analytics.engagement_data = data;
        analytics.updated_at = chrono::Utc::now();

        let cf = self.cf(cf::GREETING_ANALYTICS)?;
        self.db
            .put_cf(
                &cf,
                keys::greeting_key(greeting_id),
                Self::serialize(&analytics)?,
            )
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(analytics)
    }

    fn engagement_totals_for_creator(&self, creator_id: &UserId) -> Result<EngagementTotals> {
        let prefix = keys::owner_prefix(creator_id);
        let ids = self.index_ids(cf::GREETINGS_BY_CREATOR, &prefix)?;

        let mut totals = EngagementTotals::default();
        for id_bytes in ids {
            let greeting_id = GreetingId::from_bytes(id_bytes)
                .map_err(|e| StoreError::Serialization(e.to_string()))?;
            if let Some(analytics) = self.get_analytics(&greeting_id)? {
                totals.views += analytics.views_count;
                totals.shares += analytics.shares_count;
                totals.likes += analytics.likes_count;
            }
        }

        Ok(totals)
    }

    fn top_greetings_by_views(
        &self,
        creator_id: &UserId,
        limit: usize,
    ) -> Result<Vec<(Greeting, GreetingAnalytics)>> {
        let prefix = keys::owner_prefix(creator_id);
        let ids = self.index_ids(cf::GREETINGS_BY_CREATOR, &prefix)?;

        let mut entries = Vec::new();
        for id_bytes in ids {
            let greeting_id = GreetingId::from_bytes(id_bytes)
                .map_err(|e| StoreError::Serialization(e.to_string()))?;
            if let (Some(greeting), Some(analytics)) = (
                self.get_greeting(&greeting_id)?,
                self.get_analytics(&greeting_id)?,
            ) {
                entries.push((greeting, analytics));
            }
        }

        entries.sort_by(|a, b| b.1.views_count.cmp(&a.1.views_count));
        entries.truncate(limit);
        Ok(entries)
    }

    // =========================================================================
    // Template Operations
    // =========================================================================

    fn create_template(&self, template: &Template) -> Result<()> {
        let cf_templates = self.cf(cf::TEMPLATES)?;
        let cf_by_category = self.cf(cf::TEMPLATES_BY_CATEGORY)?;

        let mut batch = WriteBatch::default();
        batch.put_cf(
            &cf_templates,
            keys::template_key(&template.id),
            Self::serialize(template)?,
        );
        batch.put_cf(
            &cf_by_category,
            keys::category_template_key(&template.category, &template.id),
            [],
        );

        self.write(batch)
    }

    fn get_template(&self, template_id: &TemplateId) -> Result<Option<Template>> {
        let cf = self.cf(cf::TEMPLATES)?;
        self.db
            .get_cf(&cf, keys::template_key(template_id))
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn update_template(&self, template: &Template) -> Result<()> {
        let _guard = self.lock()?;

        let existing = self
            .get_template(&template.id)?
            .ok_or_else(|| StoreError::not_found("template", template.id))?;

        let cf_templates = self.cf(cf::TEMPLATES)?;
        let cf_by_category = self.cf(cf::TEMPLATES_BY_CATEGORY)?;

        let mut batch = WriteBatch::default();
        if existing.category != template.category {
            batch.delete_cf(
                &cf_by_category,
                keys::category_template_key(&existing.category, &template.id),
            );
            batch.put_cf(
                &cf_by_category,
                keys::category_template_key(&template.category, &template.id),
                [],
            );
        }
        batch.put_cf(
            &cf_templates,
            keys::template_key(&template.id),
            Self::serialize(template)?,
        );

        self.write(batch)
    }

    fn delete_template(&self, template_id: &TemplateId) -> Result<()> {
        let _guard = self.lock()?;

        let template = self
            .get_template(template_id)?
            .ok_or_else(|| StoreError::not_found("template", template_id))?;

        let cf_templates = self.cf(cf::TEMPLATES)?;
        let cf_by_category = self.cf(cf::TEMPLATES_BY_CATEGORY)?;

        let mut batch = WriteBatch::default();
        batch.delete_cf(&cf_templates, keys::template_key(template_id));
        batch.delete_cf(
            &cf_by_category,
            keys::category_template_key(&template.category, template_id),
        );

        self.write(batch)
    }

    fn list_templates(&self, limit: usize, offset: usize) -> Result<(Vec<Template>, usize)> {
        // Template keys are ULIDs, so the column family itself iterates in
        // creation order; reverse for newest first.
        let mut templates: Vec<Template> = self.scan_all(cf::TEMPLATES)?;
        templates.reverse();
        Ok(paginate(templates, limit, offset))
    }

    fn list_templates_by_category(&self, category: &str) -> Result<Vec<Template>> {
        let prefix = keys::category_prefix(category);
        let cf_by_category = self.cf(cf::TEMPLATES_BY_CATEGORY)?;

        let iter = self
            .db
            .iterator_cf(&cf_by_category, IteratorMode::From(&prefix, Direction::Forward));

        let mut ids = Vec::new();
        for item in iter {
            let (key, _) = item.map_err(|e| StoreError::Database(e.to_string()))?;
            if !key.starts_with(&prefix) {
                break;
            }
            let mut bytes = [0u8; 16];
            bytes.copy_from_slice(&key[key.len() - 16..]);
            ids.push(bytes);
        }
        ids.reverse();

        let mut templates = Vec::new();
        for id_bytes in ids {
            let template_id = TemplateId::from_bytes(id_bytes)
                .map_err(|e| StoreError::Serialization(e.to_string()))?;
            if let Some(template) = self.get_template(&template_id)? {
                templates.push(template);
            }
        }

        Ok(templates)
    }

    fn increment_template_usage(&self, template_id: &TemplateId) -> Result<Template> {
        let _guard = self.lock()?;

        let mut template = self
            .get_template(template_id)?
            .ok_or_else(|| StoreError::not_found("template", template_id))?;

        template.increment_usage();

        let cf = self.cf(cf::TEMPLATES)?;
        self.db
            .put_cf(
                &cf,
                keys::template_key(template_id),
                Self::serialize(&template)?,
            )
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(template)
    }

    fn popular_templates(&self, limit: usize) -> Result<Vec<Template>> {
        let mut templates: Vec<Template> = self.scan_all(cf::TEMPLATES)?;
        templates.sort_by(|a, b| b.usage_count.cmp(&a.usage_count));
        templates.truncate(limit);
        Ok(templates)
    }

    // =========================================================================
    // Media Operations
    // =========================================================================

    fn create_media(&self, media: &Media) -> Result<()> {
        let cf_media = self.cf(cf::MEDIA)?;
        let cf_by_user = self.cf(cf::MEDIA_BY_USER)?;

        let mut batch = WriteBatch::default();
        batch.put_cf(
            &cf_media,
            keys::media_key(&media.id),
            Self::serialize(media)?,
        );
        batch.put_cf(
            &cf_by_user,
            keys::user_media_key(&media.user_id, &media.id),
            [],
        );

        self.write(batch)
    }

    fn get_media(&self, media_id: &MediaId) -> Result<Option<Media>> {
        let cf = self.cf(cf::MEDIA)?;
        self.db
            .get_cf(&cf, keys::media_key(media_id))
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn delete_media(&self, media_id: &MediaId) -> Result<()> {
        let _guard = self.lock()?;

        let media = self
            .get_media(media_id)?
            .ok_or_else(|| StoreError::not_found("media", media_id))?;

        let cf_media = self.cf(cf::MEDIA)?;
        let cf_by_user = self.cf(cf::MEDIA_BY_USER)?;

        let mut batch = WriteBatch::default();
        batch.delete_cf(&cf_media, keys::media_key(media_id));
        batch.delete_cf(&cf_by_user, keys::user_media_key(&media.user_id, media_id));

        self.write(batch)
    }

    fn list_media_by_user(
        &self,
        user_id: &UserId,
        limit: usize,
        offset: usize,
    ) -> Result<(Vec<Media>, usize)> {
        let prefix = keys::owner_prefix(user_id);
        let ids = self.index_ids(cf::MEDIA_BY_USER, &prefix)?;
        let total = ids.len();

        let mut media = Vec::new();
        for id_bytes in ids.into_iter().skip(offset).take(limit) {
            let media_id = MediaId::from_bytes(id_bytes)
                .map_err(|e| StoreError::Serialization(e.to_string()))?;
            if let Some(item) = self.get_media(&media_id)? {
                media.push(item);
            }
        }

        Ok((media, total))
    }

    // =========================================================================
    // Platform Operations
    // =========================================================================

    fn platform_counts(&self) -> Result<PlatformCounts> {
        let users: Vec<User> = self.scan_all(cf::USERS)?;
        let total_users = users.len() as u64;
        let total_creators = users.iter().filter(|u| u.is_creator).count() as u64;

        let mut counts = PlatformCounts {
            total_users,
            total_creators,
            total_greetings: self.count_cf(cf::GREETINGS)?,
            total_templates: self.count_cf(cf::TEMPLATES)?,
            total_reviews: self.count_cf(cf::REVIEWS)?,
            total_connections: self.count_cf(cf::CONNECTIONS)?,
            ..PlatformCounts::default()
        };

        for analytics in self.scan_all::<GreetingAnalytics>(cf::GREETING_ANALYTICS)? {
            counts.total_views += analytics.views_count;
            counts.total_shares += analytics.shares_count;
            counts.total_likes += analytics.likes_count;
        }

        Ok(counts)
    }
}
