//! User types for wishline.
//!
//! Users carry a dual role: every account starts as a celebrant (someone who
//! orders and receives greetings) and may upgrade to a creator. The active
//! role is switchable without losing creator status.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::UserId;

/// The role a user is currently acting under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Orders and receives greetings.
    Celebrant,

    /// Produces greetings and templates.
    Creator,
}

/// A platform user.
///
/// The password hash is stored alongside the record; API-facing
/// representations live in the service crate and never expose it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// The user ID.
    pub id: UserId,

    /// Display name.
    pub name: String,

    /// Email address (unique across users).
    pub email: String,

    /// Argon2 password hash.
    pub password_hash: String,

    /// Phone number, if provided.
    pub phone: Option<String>,

    /// Avatar URL or path, if set.
    pub avatar: Option<String>,

    /// IANA timezone name (defaults to "UTC").
    pub timezone: String,

    /// Date of birth, if provided.
    pub date_of_birth: Option<NaiveDate>,

    /// Whether the user has upgraded to a creator.
    pub is_creator: bool,

    /// Whether the creator has passed verification.
    pub is_verified_creator: bool,

    /// The role the user is currently acting under.
    pub current_role: Role,

    /// When the user upgraded to a creator, if ever.
    pub creator_upgraded_at: Option<DateTime<Utc>>,

    /// When the user registered.
    pub created_at: DateTime<Utc>,

    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new celebrant user.
    #[must_use]
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::generate(),
            name,
            email,
            password_hash,
            phone: None,
            avatar: None,
            timezone: "UTC".to_string(),
            date_of_birth: None,
            is_creator: false,
            is_verified_creator: false,
            current_role: Role::Celebrant,
            creator_upgraded_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether this user may author greetings right now.
    ///
    /// Requires both creator status and the creator role being active.
    #[must_use]
    pub fn can_create_greetings(&self) -> bool {
        self.is_creator && self.current_role == Role::Creator
    }

    /// Switch the active role.
    ///
    /// Switching to `Role::Creator` has no effect for non-creators.
    pub fn switch_role(&mut self, role: Role) {
        if role == Role::Creator && !self.is_creator {
            return;
        }
        self.current_role = role;
        self.updated_at = Utc::now();
    }

    /// Upgrade this user to a creator and activate the creator role.
    ///
    /// Idempotent: upgrading an existing creator keeps the original
    /// `creator_upgraded_at`.
    pub fn upgrade_to_creator(&mut self) {
        if !self.is_creator {
            self.is_creator = true;
            self.creator_upgraded_at = Some(Utc::now());
        }
        self.current_role = Role::Creator;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> User {
        User::new(
            "Ada".into(),
            "ada@example.com".into(),
            "hash".into(),
        )
    }

    #[test]
    fn new_user_is_celebrant() {
        let user = test_user();
        assert!(!user.is_creator);
        assert_eq!(user.current_role, Role::Celebrant);
        assert!(!user.can_create_greetings());
    }

    #[test]
    fn upgrade_enables_greeting_creation() {
        let mut user = test_user();
        user.upgrade_to_creator();
        assert!(user.is_creator);
        assert_eq!(user.current_role, Role::Creator);
        assert!(user.creator_upgraded_at.is_some());
        assert!(user.can_create_greetings());
    }

    #[test]
    fn upgrade_is_idempotent() {
        let mut user = test_user();
        user.upgrade_to_creator();
        let first = user.creator_upgraded_at;
        user.upgrade_to_creator();
        assert_eq!(user.creator_upgraded_at, first);
    }

    #[test]
    fn celebrant_cannot_switch_to_creator_role() {
        let mut user = test_user();
        user.switch_role(Role::Creator);
        assert_eq!(user.current_role, Role::Celebrant);
    }

    #[test]
    fn creator_can_switch_roles_both_ways() {
        let mut user = test_user();
        user.upgrade_to_creator();
        user.switch_role(Role::Celebrant);
        assert_eq!(user.current_role, Role::Celebrant);
        assert!(!user.can_create_greetings());
        user.switch_role(Role::Creator);
        assert!(user.can_create_greetings());
    }
}
