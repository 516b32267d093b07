//! Core types and utilities for wishline.
//!
//! This crate provides the foundational types for the greeting marketplace:
//!
//! - **Identifiers**: `UserId`, `ConnectionId`, `ReviewId`, `GreetingId`,
//!   `TemplateId`, `MediaId`
//! - **Users**: `User`, `Role`
//! - **Profiles**: `CreatorProfile`, `VerificationStatus`, `PricingTier`
//! - **Connections**: `Connection`, `ConnectionStatus` (the friend-request
//!   state machine)
//! - **Reviews**: `Review`, `RatingStats` and the rating-aggregation math
//! - **Greetings**: `Greeting`, `GreetingStatus` (monotonic lifecycle),
//!   `GreetingRecipient`
//! - **Templates / Media / Analytics**: `Template`, `Media`,
//!   `GreetingAnalytics`
//!
//! Everything here is pure data and state-machine logic; persistence and
//! HTTP concerns live in `wishline-store` and `wishline-service`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod analytics;
pub mod connection;
pub mod error;
pub mod greeting;
pub mod ids;
pub mod media;
pub mod profile;
pub mod review;
pub mod template;
pub mod user;

pub use analytics::{EngagementMetric, GreetingAnalytics};
pub use connection::{Connection, ConnectionStatus};
pub use error::{DomainError, Result};
pub use greeting::{
    ContentType, Greeting, GreetingRecipient, GreetingStatus, GreetingType, OccasionType,
};
pub use ids::{
    ConnectionId, GreetingId, IdError, MediaId, ReviewId, TemplateId, UserId,
};
pub use media::{Media, MediaType};
pub use profile::{CreatorProfile, PricingTier, VerificationStatus};
pub use review::{average_rating, validate_rating, RatingStats, Review, MAX_RATING, MIN_RATING};
pub use template::Template;
pub use user::{Role, User};
