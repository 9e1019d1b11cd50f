//! Per-connection session state
//!
//! `SessionContext` is fixed at connect time from the verified token and
//! shared read-only with every handler. `SessionRooms` owns the session's
//! room subscriptions; dropping it releases all of them.

use std::sync::Arc;

use futures_util::StreamExt;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamMap;
use uuid::Uuid;

use crate::backend::middleware::AuthenticatedUser;
use crate::backend::realtime::presence::Presence;
use crate::backend::realtime::rooms::{Envelope, Room, RoomRegistry};

/// Identity of one WebSocket connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub session_id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub avatar: Option<String>,
}

impl SessionContext {
    pub fn new(user: AuthenticatedUser) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            user_id: user.user_id,
            username: user.username,
            avatar: user.avatar,
        }
    }
}

/// Room subscriptions held by one session
pub struct SessionRooms {
    ctx: Arc<SessionContext>,
    registry: RoomRegistry,
    presence: Presence,
    streams: StreamMap<Room, BroadcastStream<Envelope>>,
}

impl SessionRooms {
    pub fn new(ctx: Arc<SessionContext>, registry: RoomRegistry, presence: Presence) -> Self {
        Self {
            ctx,
            registry,
            presence,
            streams: StreamMap::new(),
        }
    }

    /// Subscribe to a room. Returns `false` if already subscribed.
    pub fn join(&mut self, room: Room) -> bool {
        if self.streams.contains_key(&room) {
            return false;
        }
        let receiver = self.registry.subscribe(room);
        self.streams.insert(room, BroadcastStream::new(receiver));
        if room.community_id().is_some() {
            self.presence.enter(room, self.ctx.user_id);
        }
        true
    }

    /// Unsubscribe from a room. Returns `false` if it was not joined.
    pub fn leave(&mut self, room: Room) -> bool {
        if self.streams.remove(&room).is_none() {
            return false;
        }
        if room.community_id().is_some() {
            self.presence.exit(room, self.ctx.user_id);
        }
        true
    }

    pub fn contains(&self, room: Room) -> bool {
        self.streams.contains_key(&room)
    }

    pub fn rooms(&self) -> Vec<Room> {
        self.streams.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.streams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    /// Next event from any joined room
    ///
    /// Resolves to `None` immediately when no room is joined.
    pub async fn next(&mut self) -> Option<(Room, Result<Envelope, BroadcastStreamRecvError>)> {
        self.streams.next().await
    }
}

impl Drop for SessionRooms {
    fn drop(&mut self) {
        for room in self.streams.keys() {
            if room.community_id().is_some() {
                self.presence.exit(*room, self.ctx.user_id);
            }
        }
    }
}
