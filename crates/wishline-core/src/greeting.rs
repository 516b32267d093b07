//! Greeting types and lifecycle.
//!
//! The greeting status is a strictly monotonic lifecycle:
//!
//! ```text
//! draft -> scheduled -> sent -> delivered -> viewed
//!       \______________/
//! ```
//!
//! `scheduled` may be skipped (a draft can be sent directly), and once a
//! greeting is sent there is no regression. Delivered/viewed are driven by
//! recipient-facing events, so re-applying the current status is an
//! idempotent no-op rather than an error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, Result};
use crate::{GreetingId, TemplateId, UserId};

/// The content medium of a greeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GreetingType {
    /// Video greeting.
    Video,

    /// Audio greeting.
    Audio,

    /// Text greeting.
    Text,

    /// Combination of media.
    Mixed,
}

/// The occasion a greeting celebrates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OccasionType {
    /// Birthday.
    Birthday,

    /// Anniversary.
    Anniversary,

    /// Holiday.
    Holiday,

    /// Graduation.
    Graduation,

    /// Anything else.
    Custom,
}

/// How the greeting content was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    /// Authored from scratch.
    Personal,

    /// Based on a template.
    TemplateBased,

    /// AI generated.
    AiGenerated,
}

/// Lifecycle status of a greeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GreetingStatus {
    /// Being composed.
    Draft,

    /// Scheduled for later sending.
    Scheduled,

    /// Sent to recipients.
    Sent,

    /// Delivered to at least the first recipient.
    Delivered,

    /// Viewed by at least the first recipient.
    Viewed,
}

/// A greeting authored by a creator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Greeting {
    /// The greeting ID.
    pub id: GreetingId,

    /// The authoring creator's user ID.
    pub creator_id: UserId,

    /// Title.
    pub title: String,

    /// Description.
    pub description: Option<String>,

    /// Content medium.
    pub greeting_type: GreetingType,

    /// Occasion.
    pub occasion_type: OccasionType,

    /// How the content was produced.
    pub content_type: ContentType,

    /// Content payload (text, file references, segments).
    pub content_data: serde_json::Value,

    /// Template used, if template-based.
    pub template_id: Option<TemplateId>,

    /// Theme payload.
    pub theme_settings: Option<serde_json::Value>,

    /// Whether the greeting is scheduled for later delivery.
    pub is_scheduled: bool,

    /// When the greeting should be sent, if scheduled.
    pub scheduled_at: Option<DateTime<Utc>>,

    /// Lifecycle status.
    pub status: GreetingStatus,

    /// Whether multiple creators collaborate on it.
    pub is_collaborative: bool,

    /// When the greeting was created.
    pub created_at: DateTime<Utc>,

    /// When the greeting was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Greeting {
    /// Create a new draft greeting.
    #[must_use]
    pub fn new(
        creator_id: UserId,
        title: String,
        greeting_type: GreetingType,
        occasion_type: OccasionType,
        content_type: ContentType,
        content_data: serde_json::Value,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: GreetingId::generate(),
            creator_id,
            title,
            description: None,
            greeting_type,
            occasion_type,
            content_type,
            content_data,
            template_id: None,
            theme_settings: None,
            is_scheduled: false,
            scheduled_at: None,
            status: GreetingStatus::Draft,
            is_collaborative: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Move to a new lifecycle status.
    ///
    /// Re-applying the current status succeeds without change (external
    /// delivery/view events may arrive more than once). Regressions and
    /// skips other than `draft -> sent` are rejected.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidGreetingTransition` on a disallowed
    /// move; the greeting is left unchanged.
    pub fn transition(&mut self, to: GreetingStatus) -> Result<()> {
        if to == self.status {
            return Ok(());
        }
        let allowed = matches!(
            (self.status, to),
            (GreetingStatus::Draft, GreetingStatus::Scheduled)
                | (
                    GreetingStatus::Draft | GreetingStatus::Scheduled,
                    GreetingStatus::Sent
                )
                | (GreetingStatus::Sent, GreetingStatus::Delivered)
                | (GreetingStatus::Delivered, GreetingStatus::Viewed)
        );
        if !allowed {
            return Err(DomainError::InvalidGreetingTransition {
                from: self.status,
                to,
            });
        }
        self.status = to;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Schedule the greeting for later sending.
    ///
    /// # Errors
    ///
    /// Returns an error unless the greeting is a draft (or already
    /// scheduled, in which case the time is updated).
    pub fn schedule(&mut self, at: DateTime<Utc>) -> Result<()> {
        self.transition(GreetingStatus::Scheduled)?;
        self.is_scheduled = true;
        self.scheduled_at = Some(at);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Mark the greeting sent.
    ///
    /// # Errors
    ///
    /// Returns an error if the greeting is past `Sent`.
    pub fn mark_sent(&mut self) -> Result<()> {
        self.transition(GreetingStatus::Sent)
    }

    /// Mark the greeting delivered (recipient-facing event).
    ///
    /// # Errors
    ///
    /// Returns an error unless the greeting is sent or already delivered.
    pub fn mark_delivered(&mut self) -> Result<()> {
        self.transition(GreetingStatus::Delivered)
    }

    /// Mark the greeting viewed (recipient-facing event).
    ///
    /// # Errors
    ///
    /// Returns an error unless the greeting is delivered or already viewed.
    pub fn mark_viewed(&mut self) -> Result<()> {
        self.transition(GreetingStatus::Viewed)
    }
}

/// A recipient attached to a greeting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GreetingRecipient {
    /// The greeting.
    pub greeting_id: GreetingId,

    /// The receiving user.
    pub recipient_id: UserId,

    /// When the greeting was sent to this recipient.
    pub sent_at: Option<DateTime<Utc>>,

    /// When it was delivered to this recipient.
    pub delivered_at: Option<DateTime<Utc>>,

    /// When this recipient viewed it.
    pub viewed_at: Option<DateTime<Utc>>,

    /// Whether the recipient sent a thank-you.
    pub is_thanked: bool,

    /// Thank-you message, if any.
    pub thank_you_message: Option<String>,

    /// When the recipient was attached.
    pub created_at: DateTime<Utc>,
}

impl GreetingRecipient {
    /// Attach a recipient to a greeting.
    #[must_use]
    pub fn new(greeting_id: GreetingId, recipient_id: UserId) -> Self {
        Self {
            greeting_id,
            recipient_id,
            sent_at: None,
            delivered_at: None,
            viewed_at: None,
            is_thanked: false,
            thank_you_message: None,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn draft() -> Greeting {
        Greeting::new(
            UserId::generate(),
            "Happy birthday!".into(),
            GreetingType::Text,
            OccasionType::Birthday,
            ContentType::Personal,
            json!({"text": "have a great one"}),
        )
    }

    #[test]
    fn new_greeting_is_draft() {
        let greeting = draft();
        assert_eq!(greeting.status, GreetingStatus::Draft);
        assert!(!greeting.is_scheduled);
    }

    #[test]
    fn full_lifecycle() {
        let mut greeting = draft();
        greeting.schedule(Utc::now()).unwrap();
        assert_eq!(greeting.status, GreetingStatus::Scheduled);
        assert!(greeting.is_scheduled);
        assert!(greeting.scheduled_at.is_some());
        greeting.mark_sent().unwrap();
        greeting.mark_delivered().unwrap();
        greeting.mark_viewed().unwrap();
        assert_eq!(greeting.status, GreetingStatus::Viewed);
    }

    #[test]
    fn draft_can_be_sent_directly() {
        let mut greeting = draft();
        greeting.mark_sent().unwrap();
        assert_eq!(greeting.status, GreetingStatus::Sent);
    }

    #[test]
    fn no_regression_once_sent() {
        let mut greeting = draft();
        greeting.mark_sent().unwrap();
        assert!(matches!(
            greeting.transition(GreetingStatus::Draft),
            Err(DomainError::InvalidGreetingTransition { .. })
        ));
        assert!(greeting.schedule(Utc::now()).is_err());
        assert_eq!(greeting.status, GreetingStatus::Sent);
    }

    #[test]
    fn no_skipping_to_viewed() {
        let mut greeting = draft();
        greeting.mark_sent().unwrap();
        assert!(greeting.mark_viewed().is_err());
        assert_eq!(greeting.status, GreetingStatus::Sent);
    }

    #[test]
    fn reapplying_status_is_idempotent() {
        let mut greeting = draft();
        greeting.mark_sent().unwrap();
        greeting.mark_delivered().unwrap();
        // External delivery events may be replayed
        greeting.mark_delivered().unwrap();
        assert_eq!(greeting.status, GreetingStatus::Delivered);
        greeting.mark_viewed().unwrap();
        greeting.mark_viewed().unwrap();
        assert_eq!(greeting.status, GreetingStatus::Viewed);
    }
}
