//! Typing flags with server-side expiry
//!
//! Each active flag is keyed by (user, room) and carries a deadline. A
//! client that stops sending `typing` events without an explicit stop has
//! its flag expired by the sweeper task, which broadcasts the stop for it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use uuid::Uuid;

use crate::backend::realtime::rooms::Room;
use crate::backend::realtime::session::SessionContext;
use crate::shared::event::TypingNotice;
use crate::shared::ServerEvent;

#[derive(Debug, Clone)]
struct TypingFlag {
    session_id: Uuid,
    username: String,
    deadline: Instant,
}

/// A flag removed by expiry or disconnect; the room needs a stop event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClearedFlag {
    pub user_id: Uuid,
    pub username: String,
    pub room: Room,
}

impl ClearedFlag {
    /// The `isTyping=false` event to broadcast, if the room is a community room
    pub fn stop_event(&self) -> Option<ServerEvent> {
        let target = self.room.target()?;
        Some(ServerEvent::UserTyping(TypingNotice {
            user_id: self.user_id,
            username: self.username.clone(),
            is_typing: false,
            community_id: target.community_id,
            channel_id: target.channel_id,
        }))
    }
}

#[derive(Clone)]
pub struct TypingTracker {
    flags: Arc<Mutex<HashMap<(Uuid, Room), TypingFlag>>>,
    ttl: Duration,
}

impl TypingTracker {
    pub fn new(ttl: Duration) -> Self {
        Self {
            flags: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<(Uuid, Room), TypingFlag>> {
        self.flags.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Set or refresh a flag. Returns `true` if the user was not already typing.
    pub fn start(&self, ctx: &SessionContext, room: Room, now: Instant) -> bool {
        let flag = TypingFlag {
            session_id: ctx.session_id,
            username: ctx.username.clone(),
            deadline: now + self.ttl,
        };
        self.lock().insert((ctx.user_id, room), flag).is_none()
    }

    /// Clear a flag. Returns `true` if one was set.
    pub fn stop(&self, user_id: Uuid, room: Room) -> bool {
        self.lock().remove(&(user_id, room)).is_some()
    }

    pub fn is_typing(&self, user_id: Uuid, room: Room) -> bool {
        self.lock().contains_key(&(user_id, room))
    }

    /// Remove every flag whose deadline has passed
    pub fn expire(&self, now: Instant) -> Vec<ClearedFlag> {
        self.drain_where(|flag| flag.deadline <= now)
    }

    /// Remove every flag set by a session
    pub fn clear_session(&self, session_id: Uuid) -> Vec<ClearedFlag> {
        self.drain_where(|flag| flag.session_id == session_id)
    }

    fn drain_where(&self, mut predicate: impl FnMut(&TypingFlag) -> bool) -> Vec<ClearedFlag> {
        let mut flags = self.lock();
        let mut cleared = Vec::new();
        flags.retain(|(user_id, room), flag| {
            if predicate(flag) {
                cleared.push(ClearedFlag {
                    user_id: *user_id,
                    username: flag.username.clone(),
                    room: *room,
                });
                false
            } else {
                true
            }
        });
        cleared
    }
}
