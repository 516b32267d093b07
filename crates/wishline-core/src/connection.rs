//! Connection (friend request) types and state machine.
//!
//! A connection is a directed edge from a requester to a receiver, but
//! uniqueness is symmetric: at most one edge may exist per unordered user
//! pair regardless of who asked. The storage layer enforces the pair
//! invariant; this module enforces the transition rules.
//!
//! Transitions: `pending -> accepted` and `pending -> declined` (receiver
//! only), any non-declined state `-> blocked` (either participant), and
//! `blocked -> accepted` (unblock). `declined` is terminal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, Result};
use crate::{ConnectionId, UserId};

/// Status of a connection edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    /// Request sent, awaiting the receiver.
    Pending,

    /// Both parties are connected.
    Accepted,

    /// Receiver declined; terminal.
    Declined,

    /// One party blocked the other; reversible only to `Accepted`.
    Blocked,
}

/// A connection between two users.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    /// The connection ID.
    pub id: ConnectionId,

    /// The user who sent the request.
    pub requester_id: UserId,

    /// The user who received the request.
    pub receiver_id: UserId,

    /// Current status.
    pub status: ConnectionStatus,

    /// When the request was accepted, if it was.
    pub connected_at: Option<DateTime<Utc>>,

    /// Who blocked the connection, while blocked.
    pub blocked_by: Option<UserId>,

    /// When the connection was blocked, while blocked.
    pub blocked_at: Option<DateTime<Utc>>,

    /// When the request was created.
    pub created_at: DateTime<Utc>,

    /// When the connection was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Connection {
    /// Create a new pending connection request.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SelfConnection` if requester and receiver are
    /// the same user.
    pub fn new(requester_id: UserId, receiver_id: UserId) -> Result<Self> {
        if requester_id == receiver_id {
            return Err(DomainError::SelfConnection);
        }
        let now = Utc::now();
        Ok(Self {
            id: ConnectionId::generate(),
            requester_id,
            receiver_id,
            status: ConnectionStatus::Pending,
            connected_at: None,
            blocked_by: None,
            blocked_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Whether the given user is one of the two participants.
    #[must_use]
    pub fn is_participant(&self, user_id: UserId) -> bool {
        self.requester_id == user_id || self.receiver_id == user_id
    }

    /// The participant that is not `user_id`.
    ///
    /// Returns `None` when `user_id` is not a participant.
    #[must_use]
    pub fn other_party(&self, user_id: UserId) -> Option<UserId> {
        if self.requester_id == user_id {
            Some(self.receiver_id)
        } else if self.receiver_id == user_id {
            Some(self.requester_id)
        } else {
            None
        }
    }

    /// Accept a pending request.
    ///
    /// # Errors
    ///
    /// - `DomainError::NotReceiver` if `actor` is not the receiver.
    /// - `DomainError::InvalidConnectionTransition` if the request is not
    ///   pending. The connection is left unchanged on error.
    pub fn accept(&mut self, actor: UserId) -> Result<()> {
        if actor != self.receiver_id {
            return Err(DomainError::NotReceiver);
        }
        if self.status != ConnectionStatus::Pending {
            return Err(DomainError::InvalidConnectionTransition {
                from: self.status,
                to: ConnectionStatus::Accepted,
            });
        }
        self.status = ConnectionStatus::Accepted;
        self.connected_at = Some(Utc::now());
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Decline a pending request. Terminal.
    ///
    /// # Errors
    ///
    /// Same rules as [`Connection::accept`].
    pub fn decline(&mut self, actor: UserId) -> Result<()> {
        if actor != self.receiver_id {
            return Err(DomainError::NotReceiver);
        }
        if self.status != ConnectionStatus::Pending {
            return Err(DomainError::InvalidConnectionTransition {
                from: self.status,
                to: ConnectionStatus::Declined,
            });
        }
        self.status = ConnectionStatus::Declined;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Block the connection. Either participant may block; blocking an
    /// already-blocked edge re-records the blocker and timestamp.
    ///
    /// # Errors
    ///
    /// - `DomainError::NotParticipant` if `actor` is not a participant.
    /// - `DomainError::InvalidConnectionTransition` if the edge was
    ///   declined (declined is terminal).
    pub fn block(&mut self, actor: UserId) -> Result<()> {
        if !self.is_participant(actor) {
            return Err(DomainError::NotParticipant);
        }
        if self.status == ConnectionStatus::Declined {
            return Err(DomainError::InvalidConnectionTransition {
                from: self.status,
                to: ConnectionStatus::Blocked,
            });
        }
        self.status = ConnectionStatus::Blocked;
        self.blocked_by = Some(actor);
        self.blocked_at = Some(Utc::now());
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Unblock the connection, restoring it to `Accepted` and clearing the
    /// blocker fields. There is no path back to `Pending`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidConnectionTransition` if the edge is
    /// not currently blocked.
    pub fn unblock(&mut self) -> Result<()> {
        if self.status != ConnectionStatus::Blocked {
            return Err(DomainError::InvalidConnectionTransition {
                from: self.status,
                to: ConnectionStatus::Accepted,
            });
        }
        self.status = ConnectionStatus::Accepted;
        self.blocked_by = None;
        self.blocked_at = None;
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending_connection() -> (Connection, UserId, UserId) {
        let requester = UserId::generate();
        let receiver = UserId::generate();
        let conn = Connection::new(requester, receiver).unwrap();
        (conn, requester, receiver)
    }

    #[test]
    fn self_connection_rejected() {
        let user = UserId::generate();
        assert!(matches!(
            Connection::new(user, user),
            Err(DomainError::SelfConnection)
        ));
    }

    #[test]
    fn new_connection_is_pending() {
        let (conn, _, _) = pending_connection();
        assert_eq!(conn.status, ConnectionStatus::Pending);
        assert!(conn.connected_at.is_none());
    }

    #[test]
    fn receiver_accepts_pending() {
        let (mut conn, _, receiver) = pending_connection();
        conn.accept(receiver).unwrap();
        assert_eq!(conn.status, ConnectionStatus::Accepted);
        assert!(conn.connected_at.is_some());
    }

    #[test]
    fn requester_cannot_accept() {
        let (mut conn, requester, _) = pending_connection();
        assert_eq!(conn.accept(requester), Err(DomainError::NotReceiver));
        assert_eq!(conn.status, ConnectionStatus::Pending);
    }

    #[test]
    fn accept_requires_pending() {
        let (mut conn, _, receiver) = pending_connection();
        conn.accept(receiver).unwrap();
        let connected_at = conn.connected_at;
        assert!(matches!(
            conn.accept(receiver),
            Err(DomainError::InvalidConnectionTransition { .. })
        ));
        // No state change on the failed attempt
        assert_eq!(conn.connected_at, connected_at);
    }

    #[test]
    fn receiver_declines_pending() {
        let (mut conn, _, receiver) = pending_connection();
        conn.decline(receiver).unwrap();
        assert_eq!(conn.status, ConnectionStatus::Declined);
    }

    #[test]
    fn declined_is_terminal() {
        let (mut conn, requester, receiver) = pending_connection();
        conn.decline(receiver).unwrap();
        assert!(conn.accept(receiver).is_err());
        assert!(conn.block(requester).is_err());
        assert!(conn.unblock().is_err());
    }

    #[test]
    fn either_participant_can_block() {
        let (mut conn, requester, receiver) = pending_connection();
        conn.accept(receiver).unwrap();
        conn.block(requester).unwrap();
        assert_eq!(conn.status, ConnectionStatus::Blocked);
        assert_eq!(conn.blocked_by, Some(requester));
        assert!(conn.blocked_at.is_some());
    }

    #[test]
    fn outsider_cannot_block() {
        let (mut conn, _, receiver) = pending_connection();
        conn.accept(receiver).unwrap();
        assert_eq!(
            conn.block(UserId::generate()),
            Err(DomainError::NotParticipant)
        );
    }

    #[test]
    fn block_already_blocked_is_effective_noop() {
        let (mut conn, requester, receiver) = pending_connection();
        conn.accept(receiver).unwrap();
        conn.block(requester).unwrap();
        conn.block(receiver).unwrap();
        assert_eq!(conn.status, ConnectionStatus::Blocked);
        assert_eq!(conn.blocked_by, Some(receiver));
    }

    #[test]
    fn unblock_restores_accepted() {
        let (mut conn, requester, receiver) = pending_connection();
        conn.accept(receiver).unwrap();
        conn.block(requester).unwrap();
        conn.unblock().unwrap();
        assert_eq!(conn.status, ConnectionStatus::Accepted);
        assert!(conn.blocked_by.is_none());
        assert!(conn.blocked_at.is_none());
    }

    #[test]
    fn unblock_requires_blocked() {
        let (mut conn, _, receiver) = pending_connection();
        conn.accept(receiver).unwrap();
        assert!(matches!(
            conn.unblock(),
            Err(DomainError::InvalidConnectionTransition { .. })
        ));
    }

    #[test]
    fn other_party_lookup() {
        let (conn, requester, receiver) = pending_connection();
        assert_eq!(conn.other_party(requester), Some(receiver));
        assert_eq!(conn.other_party(receiver), Some(requester));
        assert_eq!(conn.other_party(UserId::generate()), None);
    }
}
