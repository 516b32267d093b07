//! Key encoding utilities for `RocksDB`.
//!
//! Primary keys are the raw 16 bytes of the entity ID. Index keys are
//! `owner_id (16 bytes) || entity_id (16 bytes)`; since entity IDs are
//! ULIDs, an index scan under one owner yields chronological order.

use wishline_core::{
    ConnectionId, GreetingId, MediaId, ReviewId, TemplateId, UserId,
};

/// Create a user key from a user ID.
#[must_use]
pub fn user_key(user_id: &UserId) -> Vec<u8> {
    user_id.as_bytes().to_vec()
}

/// Create an email index key. Emails are compared case-insensitively.
#[must_use]
pub fn email_key(email: &str) -> Vec<u8> {
    email.trim().to_lowercase().into_bytes()
}

/// Create a connection key from a connection ID.
#[must_use]
pub fn connection_key(connection_id: &ConnectionId) -> Vec<u8> {
    connection_id.to_bytes().to_vec()
}

/// Create a user-connection index key: `user_id || connection_id`.
#[must_use]
pub fn user_connection_key(user_id: &UserId, connection_id: &ConnectionId) -> Vec<u8> {
    compound_key(user_id.as_bytes(), &connection_id.to_bytes())
}

/// Create the symmetric pair key for two users: the smaller ID first, so
/// both directions of a request map to the same key.
#[must_use]
pub fn connection_pair_key(user_a: &UserId, user_b: &UserId) -> Vec<u8> {
    let (lo, hi) = if user_a.as_bytes() <= user_b.as_bytes() {
        (user_a, user_b)
    } else {
        (user_b, user_a)
    };
    compound_key(lo.as_bytes(), hi.as_bytes())
}

/// Create a review key from a review ID.
#[must_use]
pub fn review_key(review_id: &ReviewId) -> Vec<u8> {
    review_id.to_bytes().to_vec()
}

/// Create a user-review index key: `user_id || review_id`.
#[must_use]
pub fn user_review_key(user_id: &UserId, review_id: &ReviewId) -> Vec<u8> {
    compound_key(user_id.as_bytes(), &review_id.to_bytes())
}

/// Create the directed review pair key: `reviewer_id || reviewee_id`.
#[must_use]
pub fn review_pair_key(reviewer_id: &UserId, reviewee_id: &UserId) -> Vec<u8> {
    compound_key(reviewer_id.as_bytes(), reviewee_id.as_bytes())
}

/// Create a greeting key from a greeting ID.
#[must_use]
pub fn greeting_key(greeting_id: &GreetingId) -> Vec<u8> {
    greeting_id.to_bytes().to_vec()
}

/// Create a creator-greeting index key: `creator_id || greeting_id`.
#[must_use]
pub fn creator_greeting_key(creator_id: &UserId, greeting_id: &GreetingId) -> Vec<u8> {
    compound_key(creator_id.as_bytes(), &greeting_id.to_bytes())
}

/// Create a recipient row key: `greeting_id || recipient_id`.
#[must_use]
pub fn recipient_key(greeting_id: &GreetingId, recipient_id: &UserId) -> Vec<u8> {
    compound_key(&greeting_id.to_bytes(), recipient_id.as_bytes())
}

/// Create a user-received-greeting index key: `recipient_id || greeting_id`.
#[must_use]
pub fn user_recipient_key(recipient_id: &UserId, greeting_id: &GreetingId) -> Vec<u8> {
    compound_key(recipient_id.as_bytes(), &greeting_id.to_bytes())
}

/// Create a template key from a template ID.
#[must_use]
pub fn template_key(template_id: &TemplateId) -> Vec<u8> {
    template_id.to_bytes().to_vec()
}

/// Create a category-template index key: `category || 0x00 || template_id`.
///
/// Categories are variable length, so a zero byte separates them from the
/// fixed-width ID suffix.
#[must_use]
pub fn category_template_key(category: &str, template_id: &TemplateId) -> Vec<u8> {
    let mut key = category_prefix(category);
    key.extend_from_slice(&template_id.to_bytes());
    key
}

/// Create the scan prefix for a template category.
#[must_use]
pub fn category_prefix(category: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(category.len() + 1);
    key.extend_from_slice(category.trim().to_lowercase().as_bytes());
    key.push(0);
    key
}

/// Create a media key from a media ID.
#[must_use]
pub fn media_key(media_id: &MediaId) -> Vec<u8> {
    media_id.to_bytes().to_vec()
}

/// Create a user-media index key: `user_id || media_id`.
#[must_use]
pub fn user_media_key(user_id: &UserId, media_id: &MediaId) -> Vec<u8> {
    compound_key(user_id.as_bytes(), &media_id.to_bytes())
}

/// Create a 16-byte prefix for iterating an owner's index entries.
#[must_use]
pub fn owner_prefix(user_id: &UserId) -> Vec<u8> {
    user_id.as_bytes().to_vec()
}

/// Extract the trailing 16 ID bytes from a 32-byte index key.
///
/// # Panics
///
/// Panics if the key is not at least 32 bytes.
#[must_use]
pub fn extract_id_suffix(key: &[u8]) -> [u8; 16] {
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&key[16..32]);
    bytes
}

fn compound_key(prefix: &[u8], suffix: &[u8]) -> Vec<u8> {
    let mut key = Vec::with_capacity(prefix.len() + suffix.len());
    key.extend_from_slice(prefix);
    key.extend_from_slice(suffix);
    key
}
