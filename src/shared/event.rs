/**
 * Real-time Event Protocol
 *
 * This module defines the events exchanged over the `/ws` WebSocket.
 * Every frame is a JSON text frame shaped as
 * `{ "event": <name>, "data": <payload>, "ack": <optional id> }`.
 *
 * Client events accept both the community-keyed names (`join_community`,
 * `send_message`, ...) and the channel-keyed aliases (`joinChannel`,
 * `sendMessage`, ...). Both resolve to the same handlers.
 *
 * When a client attaches an `ack` id, the server answers that frame with an
 * `ack` event carrying the same id (and an error, if the operation failed)
 * instead of a bare `error` event.
 */
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::shared::error::SharedError;
use crate::shared::messaging::{Message, MessageSummary};

/// A resolved room: a community, optionally narrowed to one channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomTarget {
    pub community_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<Uuid>,
}

impl RoomTarget {
    pub fn community(community_id: Uuid) -> Self {
        Self { community_id, channel_id: None }
    }

    pub fn channel(community_id: Uuid, channel_id: Uuid) -> Self {
        Self { community_id, channel_id: Some(channel_id) }
    }
}

/// Room reference as sent by clients
///
/// Either a bare community id string or an object with `communityId` and an
/// optional `channelId`. Empty identifiers resolve to `None`, which handlers
/// treat as a silent no-op.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoomRef {
    Id(String),
    Target {
        #[serde(rename = "communityId", alias = "community_id", default)]
        community_id: Option<String>,
        #[serde(rename = "channelId", alias = "channel_id", default, skip_serializing_if = "Option::is_none")]
        channel_id: Option<String>,
    },
}

impl RoomRef {
    /// Resolve to a typed room target
    ///
    /// Returns `Ok(None)` when the community identifier is missing or empty,
    /// and a validation error when an identifier is present but not a UUID.
    pub fn resolve(&self) -> Result<Option<RoomTarget>, SharedError> {
        let (community, channel) = match self {
            RoomRef::Id(id) => (Some(id.as_str()), None),
            RoomRef::Target { community_id, channel_id } => {
                (community_id.as_deref(), channel_id.as_deref())
            }
        };

        let community = match community.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => parse_id("communityId", raw)?,
            None => return Ok(None),
        };
        let channel = match channel.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => Some(parse_id("channelId", raw)?),
            None => None,
        };

        Ok(Some(RoomTarget { community_id: community, channel_id: channel }))
    }
}

impl From<RoomTarget> for RoomRef {
    fn from(target: RoomTarget) -> Self {
        RoomRef::Target {
            community_id: Some(target.community_id.to_string()),
            channel_id: target.channel_id.map(|id| id.to_string()),
        }
    }
}

fn parse_id(field: &str, raw: &str) -> Result<Uuid, SharedError> {
    Uuid::parse_str(raw).map_err(|_| SharedError::validation(field, format!("'{raw}' is not a valid id")))
}

/// Payload of `send_message`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessagePayload {
    #[serde(default)]
    pub community_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub is_image: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
}

/// Payload of `typing`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingPayload {
    #[serde(default)]
    pub community_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    #[serde(default)]
    pub is_typing: bool,
}

impl SendMessagePayload {
    pub fn room_ref(&self) -> RoomRef {
        RoomRef::Target {
            community_id: self.community_id.clone(),
            channel_id: self.channel_id.clone(),
        }
    }
}

impl TypingPayload {
    pub fn room_ref(&self) -> RoomRef {
        RoomRef::Target {
            community_id: self.community_id.clone(),
            channel_id: self.channel_id.clone(),
        }
    }
}

/// Events sent from a client to the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    #[serde(alias = "joinChannel")]
    JoinCommunity(Option<RoomRef>),
    #[serde(alias = "leaveChannel")]
    LeaveCommunity(Option<RoomRef>),
    #[serde(alias = "sendMessage")]
    SendMessage(SendMessagePayload),
    Typing(TypingPayload),
    #[serde(alias = "markMessagesRead")]
    MarkMessagesRead(Option<RoomRef>),
}

impl ClientEvent {
    /// Event name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            ClientEvent::JoinCommunity(_) => "join_community",
            ClientEvent::LeaveCommunity(_) => "leave_community",
            ClientEvent::SendMessage(_) => "send_message",
            ClientEvent::Typing(_) => "typing",
            ClientEvent::MarkMessagesRead(_) => "mark_messages_read",
        }
    }
}

/// A client frame that could not be decoded
///
/// Keeps the frame's `ack` id when one could be read, so the failure can
/// still be answered with an `ack`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{error}")]
pub struct FrameError {
    pub ack: Option<u64>,
    pub error: SharedError,
}

impl FrameError {
    fn new(ack: Option<u64>, message: impl Into<String>) -> Self {
        Self { ack, error: SharedError::protocol(message) }
    }
}

/// A client event plus its optional acknowledgement id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientFrame {
    pub event: ClientEvent,
    pub ack: Option<u64>,
}

impl ClientFrame {
    pub fn new(event: ClientEvent) -> Self {
        Self { event, ack: None }
    }

    pub fn with_ack(mut self, ack: u64) -> Self {
        self.ack = Some(ack);
        self
    }

    /// Decode a text frame received from a client
    ///
    /// The `ack` id is read before the event body, so a frame with a valid
    /// ack and a malformed body fails with that ack attached. Error text
    /// names the event but never the deserializer's detail.
    pub fn decode(text: &str) -> Result<Self, FrameError> {
        let mut value: serde_json::Value =
            serde_json::from_str(text).map_err(|_| FrameError::new(None, "Frame is not valid JSON"))?;
        let serde_json::Value::Object(map) = &mut value else {
            return Err(FrameError::new(None, "Frame must be a JSON object"));
        };
        let ack = map.remove("ack").and_then(|v| v.as_u64());
        let name = match map.get("event").and_then(|v| v.as_str()) {
            Some(name) => name.to_string(),
            None => return Err(FrameError::new(ack, "Frame has no event name")),
        };
        let event = serde_json::from_value(value)
            .map_err(|_| FrameError::new(ack, format!("Malformed or unknown event '{name}'")))?;
        Ok(Self { event, ack })
    }

    /// Encode as a text frame
    pub fn encode(&self) -> Result<String, SharedError> {
        let mut value = serde_json::to_value(&self.event)?;
        if let (Some(ack), serde_json::Value::Object(map)) = (self.ack, &mut value) {
            map.insert("ack".to_string(), ack.into());
        }
        Ok(serde_json::to_string(&value)?)
    }
}

/// Typing indicator relayed to the other sessions of a room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingNotice {
    pub user_id: Uuid,
    pub username: String,
    pub is_typing: bool,
    pub community_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<Uuid>,
}

/// Sent to a recipient's personal room when their unread count changes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnreadUpdate {
    pub community_id: Uuid,
    pub unread_count: u32,
    pub last_message: MessageSummary,
}

/// A user marked a community read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadReceipt {
    pub user_id: Uuid,
    pub community_id: Uuid,
}

/// A message was removed by its sender
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedNotice {
    pub message_id: Uuid,
    pub community_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<Uuid>,
}

/// Error reported to the session that triggered it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorNotice {
    pub message: String,
}

/// Answer to a client frame that carried an `ack` id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AckNotice {
    pub ack: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Events sent from the server to a client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    NewMessage(Message),
    #[serde(rename = "userTyping")]
    UserTyping(TypingNotice),
    UnreadLastMessageUpdate(UnreadUpdate),
    MessagesRead(ReadReceipt),
    MessageDeleted(DeletedNotice),
    Error(ErrorNotice),
    Ack(AckNotice),
}

impl ServerEvent {
    pub fn error(message: impl Into<String>) -> Self {
        ServerEvent::Error(ErrorNotice { message: message.into() })
    }

    pub fn ack(ack: u64, message_id: Option<Uuid>, error: Option<String>) -> Self {
        ServerEvent::Ack(AckNotice { ack, message_id, error })
    }

    /// Event name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::NewMessage(_) => "new_message",
            ServerEvent::UserTyping(_) => "userTyping",
            ServerEvent::UnreadLastMessageUpdate(_) => "unread_last_message_update",
            ServerEvent::MessagesRead(_) => "messages_read",
            ServerEvent::MessageDeleted(_) => "message_deleted",
            ServerEvent::Error(_) => "error",
            ServerEvent::Ack(_) => "ack",
        }
    }

    pub fn encode(&self) -> Result<String, SharedError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn decode(text: &str) -> Result<Self, SharedError> {
        serde_json::from_str(text).map_err(|e| SharedError::protocol(format!("malformed server event: {e}")))
    }
}
