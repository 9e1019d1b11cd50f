/**
 * Room Registry
 *
 * Per-room broadcast channels. A room is a community, a channel inside a
 * community, or a single user's personal room (used for unread digests).
 *
 * Channels are created lazily on first subscribe and pruned by a periodic
 * task once they have no receivers. Publishing to a room nobody has
 * subscribed to is a no-op.
 */

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::broadcast;
use uuid::Uuid;

use crate::shared::event::RoomTarget;
use crate::shared::ServerEvent;

/// Room identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Room {
    Community(Uuid),
    Channel(Uuid, Uuid),
    User(Uuid),
}

impl Room {
    /// Community this room belongs to; `None` for personal rooms
    pub fn community_id(&self) -> Option<Uuid> {
        match self {
            Room::Community(community) | Room::Channel(community, _) => Some(*community),
            Room::User(_) => None,
        }
    }

    pub fn target(&self) -> Option<RoomTarget> {
        match self {
            Room::Community(community) => Some(RoomTarget::community(*community)),
            Room::Channel(community, channel) => Some(RoomTarget::channel(*community, *channel)),
            Room::User(_) => None,
        }
    }
}

impl From<RoomTarget> for Room {
    fn from(target: RoomTarget) -> Self {
        match target.channel_id {
            Some(channel) => Room::Channel(target.community_id, channel),
            None => Room::Community(target.community_id),
        }
    }
}

/// What travels over a room channel
///
/// `origin` names the session that caused the event when that session must
/// not receive it (typing indicators). `mirror_of` is set on the community
/// room copy of a channel event; sessions holding that channel room get the
/// channel copy instead.
#[derive(Debug, Clone)]
pub struct Envelope {
    pub origin: Option<Uuid>,
    pub mirror_of: Option<Room>,
    pub event: ServerEvent,
}

impl Envelope {
    pub fn to_all(event: ServerEvent) -> Self {
        Self { origin: None, mirror_of: None, event }
    }

    pub fn excluding(session_id: Uuid, event: ServerEvent) -> Self {
        Self { origin: Some(session_id), mirror_of: None, event }
    }

    pub fn mirror(channel: Room, event: ServerEvent) -> Self {
        Self { origin: None, mirror_of: Some(channel), event }
    }
}

/// Broadcast state for rooms
#[derive(Clone)]
pub struct RoomRegistry {
    channels: Arc<Mutex<HashMap<Room, broadcast::Sender<Envelope>>>>,
    capacity: usize,
}

impl RoomRegistry {
    pub fn new(capacity: usize) -> Self {
        Self {
            channels: Arc::new(Mutex::new(HashMap::new())),
            capacity: capacity.max(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Room, broadcast::Sender<Envelope>>> {
        self.channels.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Get or create the room's channel and subscribe to it
    pub fn subscribe(&self, room: Room) -> broadcast::Receiver<Envelope> {
        let mut channels = self.lock();
        channels
            .entry(room)
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe()
    }

    /// Send to every receiver of the room, returning how many there were
    pub fn publish(&self, room: Room, envelope: Envelope) -> usize {
        let sender = self.lock().get(&room).cloned();
        match sender {
            Some(sender) => sender.send(envelope).unwrap_or(0),
            None => 0,
        }
    }

    /// Drop channels without receivers, returning how many were removed
    pub fn cleanup_inactive_channels(&self) -> usize {
        let mut channels = self.lock();
        let before = channels.len();
        channels.retain(|_, sender| sender.receiver_count() > 0);
        before - channels.len()
    }

    pub fn subscriber_count(&self, room: Room) -> usize {
        self.lock()
            .get(&room)
            .map(|sender| sender.receiver_count())
            .unwrap_or(0)
    }

    pub fn room_count(&self) -> usize {
        self.lock().len()
    }
}
