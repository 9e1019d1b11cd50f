/**
 * WebSocket Event Dispatch
 *
 * Routes each decoded client frame to its handler and turns the outcome into
 * the events sent back to the calling session only.
 *
 * # Replies
 *
 * - Frames carrying an `ack` id always get an `ack` event back, with the new
 *   message id on success or the error text on failure.
 * - Frames without an `ack` id only get a reply when they fail, as a bare
 *   `error` event.
 *
 * Everything other sessions see goes through the room registry instead.
 */

use std::sync::Arc;
use std::time::Instant;

use uuid::Uuid;

use crate::backend::communities::db::is_member;
use crate::backend::realtime::broadcast::broadcast_event;
use crate::backend::realtime::relay::relay_message;
use crate::backend::realtime::rooms::Room;
use crate::backend::realtime::session::{SessionContext, SessionRooms};
use crate::backend::server::state::AppState;
use crate::backend::unread::sync::mark_read_and_notify;
use crate::shared::event::{RoomRef, TypingNotice, TypingPayload};
use crate::shared::{ClientEvent, ClientFrame, ServerEvent};

/// Ok carries the id of a created message, if any
type Outcome = Result<Option<Uuid>, String>;

/// Handle one client frame
pub async fn dispatch(
    state: &AppState,
    ctx: &Arc<SessionContext>,
    rooms: &mut SessionRooms,
    frame: ClientFrame,
) -> Vec<ServerEvent> {
    let name = frame.event.name();
    tracing::trace!("[Realtime] {} sent {}", ctx.username, name);

    let outcome = match frame.event {
        ClientEvent::JoinCommunity(room) => handle_join(ctx, rooms, room),
        ClientEvent::LeaveCommunity(room) => handle_leave(state, ctx, rooms, room),
        ClientEvent::SendMessage(payload) => match relay_message(state, ctx, payload).await {
            Ok(message) => Ok(Some(message.id)),
            Err(e) => Err(e.client_message()),
        },
        ClientEvent::Typing(payload) => handle_typing(state, ctx, rooms, payload),
        ClientEvent::MarkMessagesRead(room) => handle_mark_read(state, ctx, room).await,
    };

    if let Err(message) = &outcome {
        tracing::debug!("[Realtime] {} from {} failed: {}", name, ctx.username, message);
    }
    reply(frame.ack, outcome).into_iter().collect()
}

/// Events answering a frame with the given outcome
pub fn reply(ack: Option<u64>, outcome: Outcome) -> Option<ServerEvent> {
    match (ack, outcome) {
        (Some(ack), Ok(message_id)) => Some(ServerEvent::ack(ack, message_id, None)),
        (Some(ack), Err(error)) => Some(ServerEvent::ack(ack, None, Some(error))),
        (None, Ok(_)) => None,
        (None, Err(error)) => Some(ServerEvent::error(error)),
    }
}

fn resolve_room(room: Option<RoomRef>) -> Result<Option<Room>, String> {
    match room {
        Some(room) => room
            .resolve()
            .map(|target| target.map(Room::from))
            .map_err(|e| e.user_message()),
        None => Ok(None),
    }
}

fn handle_join(ctx: &SessionContext, rooms: &mut SessionRooms, room: Option<RoomRef>) -> Outcome {
    if let Some(room) = resolve_room(room)? {
        if rooms.join(room) {
            tracing::info!("[Realtime] {} joined {:?}", ctx.username, room);
        }
    }
    Ok(None)
}

fn handle_leave(
    state: &AppState,
    ctx: &SessionContext,
    rooms: &mut SessionRooms,
    room: Option<RoomRef>,
) -> Outcome {
    let Some(room) = resolve_room(room)? else {
        return Ok(None);
    };
    if rooms.leave(room) {
        tracing::info!("[Realtime] {} left {:?}", ctx.username, room);
        if state.typing.stop(ctx.user_id, room) {
            broadcast_typing(state, ctx, room, false);
        }
    }
    Ok(None)
}

/// Typing updates are only accepted for rooms this session has joined
fn handle_typing(state: &AppState, ctx: &SessionContext, rooms: &SessionRooms, payload: TypingPayload) -> Outcome {
    let Some(room) = resolve_room(Some(payload.room_ref()))? else {
        return Ok(None);
    };
    if !rooms.contains(room) {
        return Err("Join the room before sending typing updates".to_string());
    }

    let changed = if payload.is_typing {
        state.typing.start(ctx, room, Instant::now())
    } else {
        state.typing.stop(ctx.user_id, room)
    };
    if changed {
        broadcast_typing(state, ctx, room, payload.is_typing);
    }
    Ok(None)
}

fn broadcast_typing(state: &AppState, ctx: &SessionContext, room: Room, is_typing: bool) {
    let Some(target) = room.target() else {
        return;
    };
    broadcast_event(
        &state.rooms,
        room,
        Some(ctx.session_id),
        ServerEvent::UserTyping(TypingNotice {
            user_id: ctx.user_id,
            username: ctx.username.clone(),
            is_typing,
            community_id: target.community_id,
            channel_id: target.channel_id,
        }),
    );
}

async fn handle_mark_read(state: &AppState, ctx: &SessionContext, room: Option<RoomRef>) -> Outcome {
    let Some(room) = resolve_room(room)? else {
        return Ok(None);
    };
    let Some(community_id) = room.community_id() else {
        return Ok(None);
    };

    let member = is_member(&state.db, community_id, ctx.user_id).await.map_err(|e| {
        tracing::error!("[Realtime] Membership lookup failed: {:?}", e);
        "Failed to mark messages read".to_string()
    })?;
    if !member {
        return Err("You are not a member of this community".to_string());
    }

    mark_read_and_notify(state, ctx.user_id, community_id)
        .await
        .map(|_| None)
        .map_err(|e| {
            tracing::error!("[Realtime] Failed to mark {} read for {}: {:?}", community_id, ctx.username, e);
            "Failed to mark messages read".to_string()
        })
}
