//! Error types for wishline storage.

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(String),

    /// Serialization/deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Record not found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity kind, e.g. "greeting".
        entity: &'static str,
        /// The identifier that was not found.
        id: String,
    },

    /// A connection already exists between the user pair (either direction).
    #[error("connection already exists between {user_a} and {user_b}")]
    DuplicateConnection {
        /// One participant.
        user_a: String,
        /// The other participant.
        user_b: String,
    },

    /// The reviewer already reviewed this creator.
    #[error("review already exists from {reviewer} for {reviewee}")]
    DuplicateReview {
        /// The reviewer.
        reviewer: String,
        /// The reviewee.
        reviewee: String,
    },

    /// A user with this email already exists.
    #[error("email already registered: {email}")]
    DuplicateEmail {
        /// The conflicting email.
        email: String,
    },

    /// The recipient is already attached to the greeting.
    #[error("recipient {recipient} already attached to greeting {greeting}")]
    DuplicateRecipient {
        /// The greeting.
        greeting: String,
        /// The recipient.
        recipient: String,
    },
}

impl StoreError {
    /// Shorthand for a typed not-found error.
    #[must_use]
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}
