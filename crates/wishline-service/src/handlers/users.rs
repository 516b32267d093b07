//! User account handlers.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use wishline_core::{CreatorProfile, Role, User, UserId};
use wishline_store::Store;

use super::{parse_id, PageMeta, PageQuery};
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Public view of a user. The password hash never leaves the store layer.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    /// User ID.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Phone number, if set.
    pub phone: Option<String>,
    /// Avatar URL, if set.
    pub avatar: Option<String>,
    /// IANA timezone.
    pub timezone: String,
    /// Date of birth, if set.
    pub date_of_birth: Option<NaiveDate>,
    /// Whether the user has upgraded to a creator.
    pub is_creator: bool,
    /// Whether the creator has passed verification.
    pub is_verified_creator: bool,
    /// Role the user is currently acting under.
    pub current_role: Role,
    /// Created timestamp.
    pub created_at: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            avatar: user.avatar.clone(),
            timezone: user.timezone.clone(),
            date_of_birth: user.date_of_birth,
            is_creator: user.is_creator,
            is_verified_creator: user.is_verified_creator,
            current_role: user.current_role,
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

/// List response.
#[derive(Debug, Serialize)]
pub struct UserListResponse {
    /// Users on this page.
    pub users: Vec<UserResponse>,
    /// Pagination metadata.
    pub pagination: PageMeta,
}

/// Update request. All fields optional; present fields are applied.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    /// New display name.
    pub name: Option<String>,
    /// New email (must remain unique).
    pub email: Option<String>,
    /// New phone number.
    pub phone: Option<String>,
    /// New avatar URL.
    pub avatar: Option<String>,
    /// New timezone.
    pub timezone: Option<String>,
    /// New date of birth.
    pub date_of_birth: Option<NaiveDate>,
}

/// Role switch request.
#[derive(Debug, Deserialize)]
pub struct SwitchRoleRequest {
    /// The role to act under.
    pub role: Role,
}

/// List users.
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Query(page): Query<PageQuery>,
) -> Result<Json<UserListResponse>, ApiError> {
    let (users, total) = state.store.list_users(page.limit(), page.offset())?;

    Ok(Json(UserListResponse {
        users: users.iter().map(UserResponse::from).collect(),
        pagination: PageMeta::new(total, page),
    }))
}

/// Get a user by ID.
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user_id: UserId = parse_id(&id, "user")?;
    let user = state
        .store
        .get_user(&user_id)?
        .ok_or_else(|| ApiError::NotFound(format!("user not found: {id}")))?;

    Ok(Json(serde_json::json!({ "user": UserResponse::from(&user) })))
}

/// Update a user. Only the account owner may update it.
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(body): Json<UpdateUserRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user_id: UserId = parse_id(&id, "user")?;
    if user_id != auth.user_id {
        return Err(ApiError::Forbidden("You may only update your own account".into()));
    }

    let mut user = state
        .store
        .get_user(&user_id)?
        .ok_or_else(|| ApiError::NotFound(format!("user not found: {id}")))?;

    if let Some(name) = body.name {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(ApiError::Validation("name must not be empty".into()));
        }
        user.name = name;
    }
    if let Some(email) = body.email {
        let email = email.trim().to_lowercase();
        if !email.contains('@') {
            return Err(ApiError::Validation("invalid email address".into()));
        }
        user.email = email;
    }
    if let Some(phone) = body.phone {
        user.phone = Some(phone);
    }
    if let Some(avatar) = body.avatar {
        user.avatar = Some(avatar);
    }
    if let Some(timezone) = body.timezone {
        user.timezone = timezone;
    }
    if let Some(date_of_birth) = body.date_of_birth {
        user.date_of_birth = Some(date_of_birth);
    }
    user.updated_at = chrono::Utc::now();

    state.store.update_user(&user)?;

    Ok(Json(serde_json::json!({
        "message": "Account updated",
        "user": UserResponse::from(&user),
    })))
}

/// Delete a user account. Only the account owner may delete it.
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user_id: UserId = parse_id(&id, "user")?;
    if user_id != auth.user_id {
        return Err(ApiError::Forbidden("You may only delete your own account".into()));
    }

    state.store.delete_user(&user_id)?;

    tracing::info!(user_id = %user_id, "User deleted");
    Ok(Json(serde_json::json!({ "message": "Account deleted" })))
}

/// Upgrade the authenticated user to a creator.
///
/// Idempotent; also seeds an unverified creator profile on first upgrade.
pub async fn upgrade_to_creator(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut user = state
        .store
        .get_user(&auth.user_id)?
        .ok_or_else(|| ApiError::NotFound("user not found".into()))?;

    user.upgrade_to_creator();
    state.store.update_user(&user)?;

    if state.store.get_profile(&auth.user_id)?.is_none() {
        state
            .store
            .put_profile(&CreatorProfile::new(auth.user_id))?;
    }

    tracing::info!(user_id = %auth.user_id, "User upgraded to creator");
    Ok(Json(serde_json::json!({
        "message": "Upgraded to creator",
        "user": UserResponse::from(&user),
    })))
}

/// Switch the authenticated user's active role.
pub async fn switch_role(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<SwitchRoleRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut user = state
        .store
        .get_user(&auth.user_id)?
        .ok_or_else(|| ApiError::NotFound("user not found".into()))?;

    if body.role == Role::Creator && !user.is_creator {
        return Err(ApiError::Forbidden(
            "Upgrade to creator before switching to the creator role".into(),
        ));
    }

    user.switch_role(body.role);
    user.updated_at = chrono::Utc::now();
    state.store.update_user(&user)?;

    Ok(Json(serde_json::json!({
        "message": "Role switched",
        "user": UserResponse::from(&user),
    })))
}
