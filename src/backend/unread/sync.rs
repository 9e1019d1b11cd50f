//! Live side of unread counters
//!
//! Marking a community read is reachable from both HTTP and the socket; both
//! paths end here so the reset and the `messages_read` broadcast stay together.

use uuid::Uuid;

use crate::backend::realtime::broadcast::broadcast_event;
use crate::backend::realtime::rooms::Room;
use crate::backend::server::state::AppState;
use crate::backend::unread::db;
use crate::shared::event::ReadReceipt;
use crate::shared::messaging::UnreadEntry;
use crate::shared::ServerEvent;

/// Reset the user's count for a community and tell the community room
pub async fn mark_read_and_notify(
    state: &AppState,
    user_id: Uuid,
    community_id: Uuid,
) -> Result<UnreadEntry, sqlx::Error> {
    let entry = db::mark_read(&state.db, user_id, community_id).await?;

    broadcast_event(
        &state.rooms,
        Room::Community(community_id),
        None,
        ServerEvent::MessagesRead(ReadReceipt { user_id, community_id }),
    );
    tracing::debug!("[Unread] {} marked {} read", user_id, community_id);

    Ok(entry)
}
