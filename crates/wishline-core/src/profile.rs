//! Creator profile types.
//!
//! A creator profile is 1:1 with a user and is keyed by the user ID in
//! storage. The `rating` field is derived: it always equals the rounded
//! mean of the reviews received by the creator and is recomputed by the
//! storage layer on every review mutation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::UserId;

/// Verification state of a creator profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    /// Awaiting review.
    Pending,

    /// Verified by an admin.
    Approved,

    /// Rejected by an admin.
    Rejected,
}

/// Pricing tier a creator offers greetings under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingTier {
    /// No charge.
    Free,

    /// Entry pricing.
    Basic,

    /// Premium pricing.
    Premium,

    /// Custom enterprise pricing.
    Enterprise,
}

/// A creator's public profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatorProfile {
    /// The owning user's ID (also the storage key).
    pub user_id: UserId,

    /// Short biography.
    pub bio: Option<String>,

    /// Occasion specialties, e.g. `["birthday", "anniversary"]`.
    pub specialties: Vec<String>,

    /// Portfolio URL, if any.
    pub portfolio_url: Option<String>,

    /// Years of experience.
    pub experience_years: u32,

    /// Pricing tier.
    pub pricing_tier: PricingTier,

    /// Derived mean rating over received reviews, rounded to 2 decimals.
    /// 0.0 when the creator has no reviews.
    pub rating: f64,

    /// Number of greetings this creator has authored.
    pub total_greetings_created: u64,

    /// Verification state.
    pub verification_status: VerificationStatus,

    /// Social links as a free-form JSON object.
    pub social_links: Option<serde_json::Value>,

    /// Whether the creator is currently accepting work.
    pub availability_status: bool,

    /// When the profile was created.
    pub created_at: DateTime<Utc>,

    /// When the profile was last updated.
    pub updated_at: DateTime<Utc>,
}

impl CreatorProfile {
    /// Create a fresh, unverified profile for a user.
    #[must_use]
    pub fn new(user_id: UserId) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            bio: None,
            specialties: Vec::new(),
            portfolio_url: None,
            experience_years: 0,
            pricing_tier: PricingTier::Free,
            rating: 0.0,
            total_greetings_created: 0,
            verification_status: VerificationStatus::Pending,
            social_links: None,
            availability_status: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether this profile has been approved by an admin.
    #[must_use]
    pub fn is_approved(&self) -> bool {
        self.verification_status == VerificationStatus::Approved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_profile_defaults() {
        let profile = CreatorProfile::new(UserId::generate());
        assert_eq!(profile.verification_status, VerificationStatus::Pending);
        assert_eq!(profile.pricing_tier, PricingTier::Free);
        assert_eq!(profile.rating, 0.0);
        assert_eq!(profile.total_greetings_created, 0);
        assert!(profile.availability_status);
        assert!(!profile.is_approved());
    }
}
