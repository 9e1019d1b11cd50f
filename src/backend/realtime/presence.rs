//! Room viewers
//!
//! Counts, per room and user, how many of the user's sessions hold that
//! room. A message sent to a community room is seen by viewers of that room;
//! a message sent to a channel is seen by viewers of the channel and of the
//! community room. Those users do not accumulate unread messages for it.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use uuid::Uuid;

use crate::backend::realtime::rooms::Room;
use crate::shared::event::RoomTarget;

#[derive(Clone, Default)]
pub struct Presence {
    viewers: Arc<Mutex<HashMap<Room, HashMap<Uuid, usize>>>>,
}

impl Presence {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Room, HashMap<Uuid, usize>>> {
        self.viewers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn enter(&self, room: Room, user_id: Uuid) {
        *self.lock().entry(room).or_default().entry(user_id).or_insert(0) += 1;
    }

    pub fn exit(&self, room: Room, user_id: Uuid) {
        let mut viewers = self.lock();
        if let Some(users) = viewers.get_mut(&room) {
            if let Some(count) = users.get_mut(&user_id) {
                *count = count.saturating_sub(1);
                if *count == 0 {
                    users.remove(&user_id);
                }
            }
            if users.is_empty() {
                viewers.remove(&room);
            }
        }
    }

    pub fn is_viewing(&self, room: Room, user_id: Uuid) -> bool {
        self.lock()
            .get(&room)
            .is_some_and(|users| users.contains_key(&user_id))
    }

    /// Snapshot of users who receive messages sent to `target` live
    pub fn viewers(&self, target: RoomTarget) -> HashSet<Uuid> {
        let viewers = self.lock();
        let mut rooms = vec![Room::Community(target.community_id)];
        if target.channel_id.is_some() {
            rooms.push(Room::from(target));
        }
        rooms
            .iter()
            .filter_map(|room| viewers.get(room))
            .flat_map(|users| users.keys().copied())
            .collect()
    }
}
