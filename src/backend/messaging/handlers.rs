//! Messaging HTTP Handlers
//!
//! History, search and deletion of community messages. Sending happens over
//! the WebSocket relay.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::backend::communities::require_member;
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::middleware::AuthUser;
use crate::backend::realtime::broadcast::broadcast_to_target;
use crate::backend::server::state::AppState;
use crate::shared::event::{DeletedNotice, RoomTarget};
use crate::shared::messaging::{
    DeleteMessageResponse, ListMessagesParams, ListMessagesResponse, SearchMessagesParams,
};
use crate::shared::{Message, ServerEvent};
use super::db;

/// Paginated history or reconnect backfill
/// (GET /api/communities/{id}/messages?limit&before_seq&after_seq)
///
/// Messages are always returned in ascending `seq` order.
pub async fn list_messages(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(community_id): Path<Uuid>,
    Query(params): Query<ListMessagesParams>,
) -> BackendResult<Json<ListMessagesResponse>> {
    require_member(&state, community_id, user.user_id).await?;

    let (messages, has_more) = db::list_messages(
        &state.db,
        community_id,
        params.limit,
        params.before_seq,
        params.after_seq,
    )
    .await?;

    Ok(Json(ListMessagesResponse { messages, has_more }))
}

/// Text search within a community (GET /api/communities/{id}/messages/search?q&limit)
pub async fn search_messages(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(community_id): Path<Uuid>,
    Query(params): Query<SearchMessagesParams>,
) -> BackendResult<Json<Vec<Message>>> {
    let query = params.q.trim();
    if query.is_empty() {
        return Err(BackendError::bad_request("Search query is required"));
    }
    require_member(&state, community_id, user.user_id).await?;

    let messages = db::search_messages(&state.db, community_id, query, params.limit).await?;
    Ok(Json(messages))
}

/// Delete a message (DELETE /api/messages/{id})
///
/// Only the sender may delete. Sessions in the message's room receive
/// `message_deleted`.
///
/// # Errors
///
/// * `404 Not Found` - No such message
/// * `403 Forbidden` - The caller did not send it
pub async fn delete_message(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(message_id): Path<Uuid>,
) -> BackendResult<Json<DeleteMessageResponse>> {
    let message = db::get_message(&state.db, message_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Message not found"))?;

    if message.sender.id != user.user_id {
        tracing::warn!("[Messaging] {} tried to delete message {} of another user", user.username, message_id);
        return Err(BackendError::forbidden("You can only delete your own messages"));
    }

    if !db::delete_message(&state.db, message_id).await? {
        return Err(BackendError::not_found("Message not found"));
    }

    let target = RoomTarget {
        community_id: message.community_id,
        channel_id: message.channel_id,
    };
    broadcast_to_target(
        &state.rooms,
        target,
        ServerEvent::MessageDeleted(DeletedNotice {
            message_id,
            community_id: message.community_id,
            channel_id: message.channel_id,
        }),
    );
    tracing::info!("[Messaging] {} deleted message {}", user.username, message_id);

    Ok(Json(DeleteMessageResponse {
        success: true,
        message_id,
    }))
}
