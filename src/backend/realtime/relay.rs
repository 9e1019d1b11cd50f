//! Message relay
//!
//! Accepts a chat message from one session, persists it together with the
//! unread increments, then fans it out to the target room and sends each
//! incremented recipient an unread digest on their personal room.

use thiserror::Error;

use crate::backend::communities::db::is_member;
use crate::backend::messaging::db::{get_message, insert_message_with_unread, NewMessage};
use crate::backend::realtime::broadcast::{broadcast_event, broadcast_to_target};
use crate::backend::realtime::rooms::Room;
use crate::backend::realtime::session::SessionContext;
use crate::backend::server::state::AppState;
use crate::backend::unread::db::PREVIEW_LEN;
use crate::shared::event::{RoomTarget, SendMessagePayload, UnreadUpdate};
use crate::shared::{Message, ServerEvent, SharedError};

/// Longest accepted message body, in characters
pub const MAX_CONTENT_CHARS: usize = 4000;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error(transparent)]
    Invalid(#[from] SharedError),

    #[error("not a member of community")]
    NotMember,

    #[error("persistence failed: {0}")]
    Persistence(#[from] sqlx::Error),
}

impl RelayError {
    /// Text sent back to the sending session
    pub fn client_message(&self) -> String {
        match self {
            RelayError::Invalid(err) => err.user_message(),
            RelayError::NotMember => "You must join this community before sending messages".to_string(),
            RelayError::Persistence(_) => "Failed to send message".to_string(),
        }
    }
}

/// A send request that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidSend {
    pub target: RoomTarget,
    pub content: String,
    pub image: Option<String>,
    pub is_image: bool,
    pub client_id: Option<String>,
}

/// Check a raw `send_message` payload
///
/// A community id is required; blank ids count as missing. Text messages need non-blank content; image
/// messages may carry their payload in `image` alone.
pub fn validate_send(payload: SendMessagePayload) -> Result<ValidSend, SharedError> {
    let target = payload
        .room_ref()
        .resolve()?
        .ok_or_else(|| SharedError::validation("communityId", "communityId is required"))?;

    let content = payload.content.trim().to_string();
    let image = payload
        .image
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty());

    if payload.is_image {
        if content.is_empty() && image.is_none() {
            return Err(SharedError::validation("image", "Image message needs an image URL"));
        }
    } else if content.is_empty() {
        return Err(SharedError::validation("content", "Message content cannot be empty"));
    }

    if content.chars().count() > MAX_CONTENT_CHARS {
        return Err(SharedError::validation("content", "Message content is too long"));
    }

    Ok(ValidSend {
        target,
        content,
        image: if payload.is_image { image } else { None },
        is_image: payload.is_image,
        client_id: payload.client_id.filter(|id| !id.is_empty()),
    })
}

/// Persist and fan out one message
///
/// Returns the stored message. Nothing is broadcast unless the insert
/// transaction committed.
pub async fn relay_message(
    state: &AppState,
    ctx: &SessionContext,
    payload: SendMessagePayload,
) -> Result<Message, RelayError> {
    let send = validate_send(payload)?;
    let community_id = send.target.community_id;

    if !is_member(&state.db, community_id, ctx.user_id).await? {
        tracing::warn!("[Relay] {} is not a member of {}", ctx.username, community_id);
        return Err(RelayError::NotMember);
    }

    let viewers = state.presence.viewers(send.target);
    let new_message = NewMessage {
        community_id,
        channel_id: send.target.channel_id,
        sender_id: ctx.user_id,
        content: &send.content,
        image: send.image.as_deref(),
        is_image: send.is_image,
        client_id: send.client_id.as_deref(),
    };

    let inserted = insert_message_with_unread(&state.db, &new_message, &viewers)
        .await
        .map_err(|e| {
            tracing::error!("[Relay] Failed to persist message from {}: {:?}", ctx.username, e);
            RelayError::Persistence(e)
        })?;

    let message = get_message(&state.db, inserted.id)
        .await?
        .ok_or(RelayError::Persistence(sqlx::Error::RowNotFound))?;

    let delivered = broadcast_to_target(&state.rooms, send.target, ServerEvent::NewMessage(message.clone()));
    tracing::info!(
        "[Relay] Message {} (seq {}) in {} delivered to {} sessions",
        message.id,
        message.seq,
        community_id,
        delivered
    );

    let summary = message.summary(PREVIEW_LEN);
    for (user_id, unread_count) in inserted.incremented {
        broadcast_event(
            &state.rooms,
            Room::User(user_id),
            None,
            ServerEvent::UnreadLastMessageUpdate(UnreadUpdate {
                community_id,
                unread_count,
                last_message: summary.clone(),
            }),
        );
    }

    Ok(message)
}
