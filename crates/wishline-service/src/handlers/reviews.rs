//! Review handlers and rating aggregates.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use wishline_core::{GreetingId, Review, ReviewId, UserId};
use wishline_store::Store;

use super::profiles::ProfileResponse;
use super::{parse_id, PageMeta, PageQuery};
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Public view of a review.
#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    /// Review ID.
    pub id: String,
    /// Who wrote it; withheld for anonymous reviews.
    pub reviewer_id: Option<String>,
    /// The creator being reviewed.
    pub reviewee_id: String,
    /// The greeting it refers to, if any.
    pub greeting_id: Option<String>,
    /// Star rating, 1-5.
    pub rating: u8,
    /// Free-text comment.
    pub comment: Option<String>,
    /// Whether the reviewer's identity is hidden.
    pub is_anonymous: bool,
    /// Created timestamp.
    pub created_at: String,
}

impl From<&Review> for ReviewResponse {
    fn from(review: &Review) -> Self {
        Self {
            id: review.id.to_string(),
            reviewer_id: if review.is_anonymous {
                None
            } else {
                Some(review.reviewer_id.to_string())
            },
            reviewee_id: review.reviewee_id.to_string(),
            greeting_id: review.greeting_id.map(|id| id.to_string()),
            rating: review.rating,
            comment: review.comment.clone(),
            is_anonymous: review.is_anonymous,
            created_at: review.created_at.to_rfc3339(),
        }
    }
}

/// List response.
#[derive(Debug, Serialize)]
pub struct ReviewListResponse {
    /// Reviews on this page.
    pub reviews: Vec<ReviewResponse>,
    /// Pagination metadata.
    pub pagination: PageMeta,
}

/// Creation request.
#[derive(Debug, Deserialize)]
pub struct CreateReviewRequest {
    /// The creator being reviewed.
    pub reviewee_id: String,
    /// Star rating, 1-5.
    pub rating: u8,
    /// Free-text comment.
    pub comment: Option<String>,
    /// The greeting the review refers to, if any.
    pub greeting_id: Option<String>,
    /// Hide the reviewer's identity.
    #[serde(default)]
    pub is_anonymous: bool,
}

/// Update request.
#[derive(Debug, Deserialize)]
pub struct UpdateReviewRequest {
    /// New rating.
    pub rating: Option<u8>,
    /// New comment.
    pub comment: Option<String>,
}

/// List reviews written by the authenticated user.
pub async fn list_my_reviews(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Query(page): Query<PageQuery>,
) -> Result<Json<ReviewListResponse>, ApiError> {
    let (reviews, total) =
        state
            .store
            .list_reviews_by_reviewer(&auth.user_id, page.limit(), page.offset())?;

    Ok(Json(ReviewListResponse {
        reviews: reviews.iter().map(ReviewResponse::from).collect(),
        pagination: PageMeta::new(total, page),
    }))
}

/// Create a review for a creator.
pub async fn create_review(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<CreateReviewRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let reviewee_id: UserId = parse_id(&body.reviewee_id, "user")?;
    let reviewee = state
        .store
        .get_user(&reviewee_id)?
        .ok_or_else(|| ApiError::NotFound(format!("user not found: {reviewee_id}")))?;

    if !reviewee.is_creator {
        return Err(ApiError::Validation(
            "reviews can only be written for creators".into(),
        ));
    }

    let mut review = Review::new(auth.user_id, reviewee_id, body.rating)?;
    review.comment = body.comment;
    review.is_anonymous = body.is_anonymous;

    if let Some(greeting_id) = body.greeting_id {
        let greeting_id: GreetingId = parse_id(&greeting_id, "greeting")?;
        if state.store.get_greeting(&greeting_id)?.is_none() {
            return Err(ApiError::NotFound(format!(
                "greeting not found: {greeting_id}"
            )));
        }
        review.greeting_id = Some(greeting_id);
    }

    // Duplicate (reviewer, reviewee) pairs are rejected by the store; the
    // reviewee's profile rating is recomputed in the same write.
    state.store.create_review(&review)?;

    tracing::info!(review_id = %review.id, reviewee_id = %reviewee_id, "Review created");
    Ok(Json(serde_json::json!({
        "message": "Review created",
        "review": ReviewResponse::from(&review),
    })))
}

/// Get a review by ID.
pub async fn get_review(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let review_id: ReviewId = parse_id(&id, "review")?;
    let review = state
        .store
        .get_review(&review_id)?
        .ok_or_else(|| ApiError::NotFound(format!("review not found: {id}")))?;

    Ok(Json(serde_json::json!({ "review": ReviewResponse::from(&review) })))
}

/// Update a review. Reviewer only.
pub async fn update_review(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(body): Json<UpdateReviewRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let review_id: ReviewId = parse_id(&id, "review")?;
    let mut review = state
        .store
        .get_review(&review_id)?
        .ok_or_else(|| ApiError::NotFound(format!("review not found: {id}")))?;

    if review.reviewer_id != auth.user_id {
        return Err(ApiError::Forbidden("You may only edit your own reviews".into()));
    }

    if let Some(rating) = body.rating {
        review.set_rating(rating)?;
    }
    if let Some(comment) = body.comment {
        review.comment = Some(comment);
    }
    review.updated_at = chrono::Utc::now();

    state.store.update_review(&review)?;
    Ok(Json(serde_json::json!({
        "message": "Review updated",
        "review": ReviewResponse::from(&review),
    })))
}

/// Delete a review. Reviewer only.
pub async fn delete_review(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let review_id: ReviewId = parse_id(&id, "review")?;
    let review = state
        .store
        .get_review(&review_id)?
        .ok_or_else(|| ApiError::NotFound(format!("review not found: {id}")))?;

    if review.reviewer_id != auth.user_id {
        return Err(ApiError::Forbidden("You may only delete your own reviews".into()));
    }

    state.store.delete_review(&review_id)?;
    Ok(Json(serde_json::json!({ "message": "Review deleted" })))
}

/// Reviews received by a user (as reviewee).
pub async fn list_for_user(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Path(id): Path<String>,
    Query(page): Query<PageQuery>,
) -> Result<Json<ReviewListResponse>, ApiError> {
    let user_id: UserId = parse_id(&id, "user")?;
    let (reviews, total) =
        state
            .store
            .list_reviews_for_reviewee(&user_id, page.limit(), page.offset())?;

    Ok(Json(ReviewListResponse {
        reviews: reviews.iter().map(ReviewResponse::from).collect(),
        pagination: PageMeta::new(total, page),
    }))
}

/// Aggregated rating statistics for a user (as reviewee).
pub async fn stats_for_user(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user_id: UserId = parse_id(&id, "user")?;
    let stats = state.store.rating_stats(&user_id)?;
    Ok(Json(serde_json::json!({ "stats": stats })))
}

/// Best-rated approved creators.
pub async fn top_rated(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Query(page): Query<PageQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let creators = state.store.top_rated_creators(page.limit())?;
    let creators: Vec<ProfileResponse> = creators.iter().map(ProfileResponse::from).collect();
    Ok(Json(serde_json::json!({ "creators": creators })))
}
