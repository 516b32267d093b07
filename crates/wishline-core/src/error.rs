//! Error types for wishline domain operations.

use crate::connection::ConnectionStatus;
use crate::greeting::GreetingStatus;
use crate::ids::IdError;

/// Result type for domain operations.
pub type Result<T> = std::result::Result<T, DomainError>;

/// Errors that can occur when constructing or transitioning domain entities.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// A user attempted to connect with themselves.
    #[error("cannot create a connection to yourself")]
    SelfConnection,

    /// A user attempted to review themselves.
    #[error("cannot review yourself")]
    SelfReview,

    /// A rating outside the 1-5 range.
    #[error("rating must be between 1 and 5, got {0}")]
    RatingOutOfRange(u8),

    /// An invalid connection status transition.
    #[error("invalid connection transition from {from:?} to {to:?}")]
    InvalidConnectionTransition {
        /// The current status.
        from: ConnectionStatus,
        /// The target status.
        to: ConnectionStatus,
    },

    /// The acting user is not the receiver of the connection request.
    #[error("only the receiver can act on a pending connection request")]
    NotReceiver,

    /// The acting user is not a participant in the connection.
    #[error("user is not a participant in this connection")]
    NotParticipant,

    /// A greeting status regression (the lifecycle is monotonic once sent).
    #[error("invalid greeting transition from {from:?} to {to:?}")]
    InvalidGreetingTransition {
        /// The current status.
        from: GreetingStatus,
        /// The target status.
        to: GreetingStatus,
    },

    /// Invalid identifier.
    #[error("invalid identifier: {0}")]
    InvalidId(#[from] IdError),
}
