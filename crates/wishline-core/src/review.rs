//! Review types and rating aggregation math.
//!
//! Ratings are 1-5 integers. A creator's profile rating is the arithmetic
//! mean over all their received reviews, rounded to 2 decimals, recomputed
//! in full on every review mutation. [`average_rating`] and [`RatingStats`]
//! hold that math so storage and handlers share one definition.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, Result};
use crate::{GreetingId, ReviewId, UserId};

/// Minimum allowed rating.
pub const MIN_RATING: u8 = 1;

/// Maximum allowed rating.
pub const MAX_RATING: u8 = 5;

/// A review from one user about a creator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    /// The review ID.
    pub id: ReviewId,

    /// Who wrote the review.
    pub reviewer_id: UserId,

    /// The creator being reviewed.
    pub reviewee_id: UserId,

    /// The greeting the review refers to, if any.
    pub greeting_id: Option<GreetingId>,

    /// Star rating, 1-5.
    pub rating: u8,

    /// Free-text comment.
    pub comment: Option<String>,

    /// Whether the reviewer's identity is hidden.
    pub is_anonymous: bool,

    /// When the review was created.
    pub created_at: DateTime<Utc>,

    /// When the review was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Review {
    /// Create a new review.
    ///
    /// # Errors
    ///
    /// - `DomainError::SelfReview` if reviewer and reviewee match.
    /// - `DomainError::RatingOutOfRange` if the rating is not 1-5.
    pub fn new(reviewer_id: UserId, reviewee_id: UserId, rating: u8) -> Result<Self> {
        if reviewer_id == reviewee_id {
            return Err(DomainError::SelfReview);
        }
        validate_rating(rating)?;
        let now = Utc::now();
        Ok(Self {
            id: ReviewId::generate(),
            reviewer_id,
            reviewee_id,
            greeting_id: None,
            rating,
            comment: None,
            is_anonymous: false,
            created_at: now,
            updated_at: now,
        })
    }

    /// Change the rating, revalidating the range.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::RatingOutOfRange` if the rating is not 1-5.
    pub fn set_rating(&mut self, rating: u8) -> Result<()> {
        validate_rating(rating)?;
        self.rating = rating;
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// Validate a rating value.
///
/// # Errors
///
/// Returns `DomainError::RatingOutOfRange` if the rating is not 1-5.
pub fn validate_rating(rating: u8) -> Result<()> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(DomainError::RatingOutOfRange(rating));
    }
    Ok(())
}

/// Arithmetic mean of the ratings, rounded to 2 decimal places.
///
/// Returns 0.0 for an empty slice (a creator with no reviews has rating 0,
/// not null).
#[must_use]
pub fn average_rating(ratings: &[u8]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let mean = ratings.iter().map(|r| f64::from(*r)).sum::<f64>() / ratings.len() as f64;
    (mean * 100.0).round() / 100.0
}

/// Aggregated review statistics for a creator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingStats {
    /// Total number of reviews.
    pub total_reviews: u64,

    /// Mean rating rounded to 2 decimals; 0.0 with no reviews.
    pub average_rating: f64,

    /// Count of reviews per star, index 0 = 1 star .. index 4 = 5 stars.
    pub rating_distribution: [u64; 5],
}

impl RatingStats {
    /// Compute stats from a set of ratings.
    #[must_use]
    pub fn from_ratings(ratings: &[u8]) -> Self {
        let mut distribution = [0u64; 5];
        for rating in ratings {
            if (MIN_RATING..=MAX_RATING).contains(rating) {
                distribution[usize::from(rating - 1)] += 1;
            }
        }
        Self {
            total_reviews: ratings.len() as u64,
            average_rating: average_rating(ratings),
            rating_distribution: distribution,
        }
    }

    /// Stats for a creator with no reviews.
    #[must_use]
    pub fn empty() -> Self {
        Self::from_ratings(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn self_review_rejected() {
        let user = UserId::generate();
        assert!(matches!(
            Review::new(user, user, 5),
            Err(DomainError::SelfReview)
        ));
    }

    #[test]
    fn rating_bounds_enforced() {
        let reviewer = UserId::generate();
        let reviewee = UserId::generate();
        assert!(matches!(
            Review::new(reviewer, reviewee, 0),
            Err(DomainError::RatingOutOfRange(0))
        ));
        assert!(matches!(
            Review::new(reviewer, reviewee, 6),
            Err(DomainError::RatingOutOfRange(6))
        ));
        assert!(Review::new(reviewer, reviewee, 1).is_ok());
        assert!(Review::new(reviewer, reviewee, 5).is_ok());
    }

    #[test]
    fn average_of_nothing_is_zero() {
        assert_eq!(average_rating(&[]), 0.0);
    }

    #[test]
    fn average_rounds_to_two_decimals() {
        // 5 then 3 -> 4.00, the scenario from the product requirements
        assert_eq!(average_rating(&[5]), 5.0);
        assert_eq!(average_rating(&[5, 3]), 4.0);
        // 1, 2, 2 -> 1.666... -> 1.67
        assert_eq!(average_rating(&[1, 2, 2]), 1.67);
        // 4, 4, 5 -> 4.333... -> 4.33
        assert_eq!(average_rating(&[4, 4, 5]), 4.33);
    }

    #[test]
    fn stats_distribution() {
        let stats = RatingStats::from_ratings(&[5, 5, 4, 1]);
        assert_eq!(stats.total_reviews, 4);
        assert_eq!(stats.average_rating, 3.75);
        assert_eq!(stats.rating_distribution, [1, 0, 0, 1, 2]);
    }

    #[test]
    fn empty_stats() {
        let stats = RatingStats::empty();
        assert_eq!(stats.total_reviews, 0);
        assert_eq!(stats.average_rating, 0.0);
        assert_eq!(stats.rating_distribution, [0; 5]);
    }
}
