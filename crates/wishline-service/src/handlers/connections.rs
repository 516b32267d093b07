//! Connection (friend request) handlers.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use wishline_core::{Connection, ConnectionId, ConnectionStatus, UserId};
use wishline_store::Store;

use super::{parse_id, PageMeta, PageQuery};
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Public view of a connection.
#[derive(Debug, Serialize)]
pub struct ConnectionResponse {
    /// Connection ID.
    pub id: String,
    /// Who sent the request.
    pub requester_id: String,
    /// Who received it.
    pub receiver_id: String,
    /// Current status.
    pub status: ConnectionStatus,
    /// When the request was accepted, if it was.
    pub connected_at: Option<DateTime<Utc>>,
    /// Who blocked the connection, while blocked.
    pub blocked_by: Option<String>,
    /// Created timestamp.
    pub created_at: String,
}

impl From<&Connection> for ConnectionResponse {
    fn from(connection: &Connection) -> Self {
        Self {
            id: connection.id.to_string(),
            requester_id: connection.requester_id.to_string(),
            receiver_id: connection.receiver_id.to_string(),
            status: connection.status,
            connected_at: connection.connected_at,
            blocked_by: connection.blocked_by.map(|id| id.to_string()),
            created_at: connection.created_at.to_rfc3339(),
        }
    }
}

/// List response.
#[derive(Debug, Serialize)]
pub struct ConnectionListResponse {
    /// Connections on this page.
    pub connections: Vec<ConnectionResponse>,
    /// Pagination metadata.
    pub pagination: PageMeta,
}

/// A friend entry: the other party of an accepted connection.
#[derive(Debug, Serialize)]
pub struct FriendResponse {
    /// The friend's user ID.
    pub user_id: String,
    /// The friend's display name.
    pub name: String,
    /// The friend's avatar, if set.
    pub avatar: Option<String>,
    /// The connection the friendship lives on.
    pub connection_id: String,
    /// When the connection was accepted.
    pub connected_at: Option<DateTime<Utc>>,
}

/// Connection request body.
#[derive(Debug, Deserialize)]
pub struct SendRequest {
    /// The user to connect with.
    pub receiver_id: String,
}

fn load_for_participant(
    state: &AppState,
    auth: &AuthUser,
    id: &str,
) -> Result<Connection, ApiError> {
    let connection_id: ConnectionId = parse_id(id, "connection")?;
    let connection = state
        .store
        .get_connection(&connection_id)?
        .ok_or_else(|| ApiError::NotFound(format!("connection not found: {id}")))?;

    if !connection.is_participant(auth.user_id) {
        return Err(ApiError::Forbidden(
            "Only a participant may access this connection".into(),
        ));
    }

    Ok(connection)
}

/// List the authenticated user's connections (any status).
pub async fn list_connections(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Query(page): Query<PageQuery>,
) -> Result<Json<ConnectionListResponse>, ApiError> {
    let (connections, total) =
        state
            .store
            .list_connections_for_user(&auth.user_id, page.limit(), page.offset())?;

    Ok(Json(ConnectionListResponse {
        connections: connections.iter().map(ConnectionResponse::from).collect(),
        pagination: PageMeta::new(total, page),
    }))
}

/// Send a connection request.
pub async fn send_request(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<SendRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let receiver_id: UserId = parse_id(&body.receiver_id, "user")?;
    if state.store.get_user(&receiver_id)?.is_none() {
        return Err(ApiError::NotFound(format!("user not found: {receiver_id}")));
    }

    let connection = Connection::new(auth.user_id, receiver_id)?;
    // The store rejects a second edge for the pair, in either direction.
    state.store.create_connection(&connection)?;

    tracing::info!(
        connection_id = %connection.id,
        requester_id = %auth.user_id,
        receiver_id = %receiver_id,
        "Connection request sent"
    );
    Ok(Json(serde_json::json!({
        "message": "Connection request sent",
        "connection": ConnectionResponse::from(&connection),
    })))
}

/// Get one connection. Participants only.
pub async fn get_connection(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let connection = load_for_participant(&state, &auth, &id)?;
    Ok(Json(serde_json::json!({
        "connection": ConnectionResponse::from(&connection),
    })))
}

/// Remove a connection. Participants only.
pub async fn delete_connection(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let connection = load_for_participant(&state, &auth, &id)?;
    state.store.delete_connection(&connection.id)?;

    Ok(Json(serde_json::json!({ "message": "Connection removed" })))
}

/// Accept a pending request. Receiver only.
pub async fn accept(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut connection = load_for_participant(&state, &auth, &id)?;
    connection.accept(auth.user_id)?;
    state.store.update_connection(&connection)?;

    tracing::info!(connection_id = %connection.id, "Connection accepted");
    Ok(Json(serde_json::json!({
        "message": "Connection request accepted",
        "connection": ConnectionResponse::from(&connection),
    })))
}

/// Decline a pending request. Receiver only.
pub async fn decline(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut connection = load_for_participant(&state, &auth, &id)?;
    connection.decline(auth.user_id)?;
    state.store.update_connection(&connection)?;

    Ok(Json(serde_json::json!({
        "message": "Connection request declined",
        "connection": ConnectionResponse::from(&connection),
    })))
}

/// Block the other party. Either participant.
pub async fn block(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut connection = load_for_participant(&state, &auth, &id)?;
    connection.block(auth.user_id)?;
    state.store.update_connection(&connection)?;

    tracing::info!(connection_id = %connection.id, blocked_by = %auth.user_id, "Connection blocked");
    Ok(Json(serde_json::json!({
        "message": "Connection blocked",
        "connection": ConnectionResponse::from(&connection),
    })))
}

/// Unblock, restoring the accepted state. Rejected when not blocked.
pub async fn unblock(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut connection = load_for_participant(&state, &auth, &id)?;
    connection.unblock()?;
    state.store.update_connection(&connection)?;

    Ok(Json(serde_json::json!({
        "message": "Connection unblocked",
        "connection": ConnectionResponse::from(&connection),
    })))
}

/// List accepted connections as friend entries.
pub async fn list_friends(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let (connections, _) = state
        .store
        .list_connections_for_user(&auth.user_id, usize::MAX, 0)?;

    let mut friends = Vec::new();
    for connection in connections
        .iter()
        .filter(|c| c.status == ConnectionStatus::Accepted)
    {
        let Some(other_id) = connection.other_party(auth.user_id) else {
            continue;
        };
        if let Some(other) = state.store.get_user(&other_id)? {
            friends.push(FriendResponse {
                user_id: other.id.to_string(),
                name: other.name,
                avatar: other.avatar,
                connection_id: connection.id.to_string(),
                connected_at: connection.connected_at,
            });
        }
    }

    Ok(Json(serde_json::json!({ "friends": friends })))
}

/// List pending requests awaiting the authenticated user's answer.
pub async fn list_pending(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let (connections, _) = state
        .store
        .list_connections_for_user(&auth.user_id, usize::MAX, 0)?;

    let pending: Vec<ConnectionResponse> = connections
        .iter()
        .filter(|c| c.status == ConnectionStatus::Pending && c.receiver_id == auth.user_id)
        .map(ConnectionResponse::from)
        .collect();

    Ok(Json(serde_json::json!({ "connections": pending })))
}
