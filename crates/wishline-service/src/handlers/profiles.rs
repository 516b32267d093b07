//! Creator profile handlers.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use wishline_core::{CreatorProfile, PricingTier, RatingStats, UserId, VerificationStatus};
use wishline_store::{EngagementTotals, Store};

use super::{parse_id, PageMeta, PageQuery};
use crate::auth::{AdminAuth, AuthUser};
use crate::error::ApiError;
use crate::state::AppState;

/// Public view of a creator profile.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    /// Owning user ID.
    pub user_id: String,
    /// Biography.
    pub bio: Option<String>,
    /// Occasion specialties.
    pub specialties: Vec<String>,
    /// Portfolio URL.
    pub portfolio_url: Option<String>,
    /// Years of experience.
    pub experience_years: u32,
    /// Pricing tier.
    pub pricing_tier: PricingTier,
    /// Derived mean rating (2 decimals).
    pub rating: f64,
    /// Greetings authored.
    pub total_greetings_created: u64,
    /// Verification state.
    pub verification_status: VerificationStatus,
    /// Social links payload.
    pub social_links: Option<serde_json::Value>,
    /// Whether the creator is accepting work.
    pub availability_status: bool,
    /// Created timestamp.
    pub created_at: String,
}

impl From<&CreatorProfile> for ProfileResponse {
    fn from(profile: &CreatorProfile) -> Self {
        Self {
            user_id: profile.user_id.to_string(),
            bio: profile.bio.clone(),
            specialties: profile.specialties.clone(),
            portfolio_url: profile.portfolio_url.clone(),
            experience_years: profile.experience_years,
            pricing_tier: profile.pricing_tier,
            rating: profile.rating,
            total_greetings_created: profile.total_greetings_created,
            verification_status: profile.verification_status,
            social_links: profile.social_links.clone(),
            availability_status: profile.availability_status,
            created_at: profile.created_at.to_rfc3339(),
        }
    }
}

/// List response.
#[derive(Debug, Serialize)]
pub struct ProfileListResponse {
    /// Profiles on this page.
    pub profiles: Vec<ProfileResponse>,
    /// Pagination metadata.
    pub pagination: PageMeta,
}

/// Create/update request. All fields optional on update.
#[derive(Debug, Deserialize)]
pub struct ProfileRequest {
    /// Biography.
    pub bio: Option<String>,
    /// Occasion specialties.
    pub specialties: Option<Vec<String>>,
    /// Portfolio URL.
    pub portfolio_url: Option<String>,
    /// Years of experience.
    pub experience_years: Option<u32>,
    /// Pricing tier.
    pub pricing_tier: Option<PricingTier>,
    /// Social links payload.
    pub social_links: Option<serde_json::Value>,
    /// Whether the creator is accepting work.
    pub availability_status: Option<bool>,
}

/// Aggregated creator statistics.
#[derive(Debug, Serialize)]
pub struct ProfileStatsResponse {
    /// The profile.
    pub profile: ProfileResponse,
    /// Review aggregates.
    pub reviews: RatingStats,
    /// Engagement totals over the creator's greetings.
    pub engagement: EngagementTotals,
}

fn apply_request(profile: &mut CreatorProfile, body: ProfileRequest) {
    if let Some(bio) = body.bio {
        profile.bio = Some(bio);
    }
    if let Some(specialties) = body.specialties {
        profile.specialties = specialties;
    }
    if let Some(url) = body.portfolio_url {
        profile.portfolio_url = Some(url);
    }
    if let Some(years) = body.experience_years {
        profile.experience_years = years;
    }
    if let Some(tier) = body.pricing_tier {
        profile.pricing_tier = tier;
    }
    if let Some(links) = body.social_links {
        profile.social_links = Some(links);
    }
    if let Some(available) = body.availability_status {
        profile.availability_status = available;
    }
    profile.updated_at = chrono::Utc::now();
}

/// List creator profiles.
pub async fn list_profiles(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Query(page): Query<PageQuery>,
) -> Result<Json<ProfileListResponse>, ApiError> {
    let (profiles, total) = state.store.list_profiles(page.limit(), page.offset())?;

    Ok(Json(ProfileListResponse {
        profiles: profiles.iter().map(ProfileResponse::from).collect(),
        pagination: PageMeta::new(total, page),
    }))
}

/// Create the authenticated creator's profile.
pub async fn create_profile(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<ProfileRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user = state
        .store
        .get_user(&auth.user_id)?
        .ok_or_else(|| ApiError::NotFound("user not found".into()))?;

    if !user.is_creator {
        return Err(ApiError::Forbidden(
            "Upgrade to creator before creating a profile".into(),
        ));
    }
    if state.store.get_profile(&auth.user_id)?.is_some() {
        return Err(ApiError::Conflict("Profile already exists".into()));
    }

    let mut profile = CreatorProfile::new(auth.user_id);
    apply_request(&mut profile, body);
    state.store.put_profile(&profile)?;

    tracing::info!(user_id = %auth.user_id, "Creator profile created");
    Ok(Json(serde_json::json!({
        "message": "Profile created",
        "profile": ProfileResponse::from(&profile),
    })))
}

/// Get a creator profile.
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Path(user_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user_id: UserId = parse_id(&user_id, "user")?;
    let profile = state
        .store
        .get_profile(&user_id)?
        .ok_or_else(|| ApiError::NotFound(format!("profile not found: {user_id}")))?;

    Ok(Json(serde_json::json!({ "profile": ProfileResponse::from(&profile) })))
}

/// Update a creator profile. Owner only.
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(user_id): Path<String>,
    Json(body): Json<ProfileRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user_id: UserId = parse_id(&user_id, "user")?;
    if user_id != auth.user_id {
        return Err(ApiError::Forbidden("You may only update your own profile".into()));
    }

    let mut profile = state
        .store
        .get_profile(&user_id)?
        .ok_or_else(|| ApiError::NotFound(format!("profile not found: {user_id}")))?;

    apply_request(&mut profile, body);
    state.store.put_profile(&profile)?;

    Ok(Json(serde_json::json!({
        "message": "Profile updated",
        "profile": ProfileResponse::from(&profile),
    })))
}

/// Delete a creator profile. Owner only.
pub async fn delete_profile(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(user_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user_id: UserId = parse_id(&user_id, "user")?;
    if user_id != auth.user_id {
        return Err(ApiError::Forbidden("You may only delete your own profile".into()));
    }

    state.store.delete_profile(&user_id)?;
    Ok(Json(serde_json::json!({ "message": "Profile deleted" })))
}

/// Approve a creator's verification. Admin only.
pub async fn verify_profile(
    State(state): State<Arc<AppState>>,
    _admin: AdminAuth,
    Path(user_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user_id: UserId = parse_id(&user_id, "user")?;
    let profile = state
        .store
        .set_verification(&user_id, VerificationStatus::Approved)?;

    tracing::info!(user_id = %user_id, "Creator verified");
    Ok(Json(serde_json::json!({
        "message": "Creator verified",
        "profile": ProfileResponse::from(&profile),
    })))
}

/// Reject a creator's verification. Admin only.
pub async fn reject_profile(
    State(state): State<Arc<AppState>>,
    _admin: AdminAuth,
    Path(user_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user_id: UserId = parse_id(&user_id, "user")?;
    let profile = state
        .store
        .set_verification(&user_id, VerificationStatus::Rejected)?;

    tracing::info!(user_id = %user_id, "Creator verification rejected");
    Ok(Json(serde_json::json!({
        "message": "Creator verification rejected",
        "profile": ProfileResponse::from(&profile),
    })))
}

/// Aggregated statistics for a creator.
pub async fn profile_stats(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Path(user_id): Path<String>,
) -> Result<Json<ProfileStatsResponse>, ApiError> {
    let user_id: UserId = parse_id(&user_id, "user")?;
    let profile = state
        .store
        .get_profile(&user_id)?
        .ok_or_else(|| ApiError::NotFound(format!("profile not found: {user_id}")))?;

    let reviews = state.store.rating_stats(&user_id)?;
    let engagement = state.store.engagement_totals_for_creator(&user_id)?;

    Ok(Json(ProfileStatsResponse {
        profile: ProfileResponse::from(&profile),
        reviews,
        engagement,
    }))
}
