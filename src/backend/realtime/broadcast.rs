/**
 * Real-time Event Broadcasting
 *
 * Helpers for publishing server events into rooms. Every broadcast in the
 * server goes through `broadcast_event`, so delivery counts are logged in
 * one place.
 *
 * Events are broadcast using `tokio::sync::broadcast`, which provides
 * a multi-producer, multi-consumer channel per room. All subscribers receive
 * a copy of each event.
 */

use uuid::Uuid;

use crate::backend::realtime::rooms::{Envelope, Room, RoomRegistry};
use crate::shared::event::RoomTarget;
use crate::shared::ServerEvent;

/// Broadcast an event to every session in a room
///
/// # Arguments
///
/// * `registry` - The room registry
/// * `room` - Destination room
/// * `skip_session` - Session that must not receive its own event
/// * `event` - The event to broadcast
///
/// # Returns
///
/// Number of subscribers that received the event (0 if no subscribers)
pub fn broadcast_event(
    registry: &RoomRegistry,
    room: Room,
    skip_session: Option<Uuid>,
    event: ServerEvent,
) -> usize {
    let name = event.name();
    let envelope = Envelope {
        origin: skip_session,
        mirror_of: None,
        event,
    };
    publish_logged(registry, room, name, envelope)
}

/// Broadcast a message-level event to everyone who sees `target`
///
/// Community events go to the community room. Channel events go to the
/// channel room and are mirrored into the community room. A session holding
/// both rooms receives one copy.
pub fn broadcast_to_target(registry: &RoomRegistry, target: RoomTarget, event: ServerEvent) -> usize {
    let name = event.name();
    let community = Room::Community(target.community_id);
    match target.channel_id {
        None => publish_logged(registry, community, name, Envelope::to_all(event)),
        Some(_) => {
            let channel = Room::from(target);
            let mirrored = publish_logged(registry, community, name, Envelope::mirror(channel, event.clone()));
            mirrored + publish_logged(registry, channel, name, Envelope::to_all(event))
        }
    }
}

fn publish_logged(registry: &RoomRegistry, room: Room, name: &str, envelope: Envelope) -> usize {
    let subscriber_count = registry.publish(room, envelope);
    if subscriber_count > 0 {
        tracing::debug!("[Realtime] {} broadcast to {} subscribers of {:?}", name, subscriber_count, room);
    } else {
        tracing::trace!("[Realtime] No subscribers for {} in {:?}", name, room);
    }
    subscriber_count
}
