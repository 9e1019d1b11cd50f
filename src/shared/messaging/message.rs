//! Community Message Data Structure
//!
//! Represents a persisted chat message inside a community (optionally scoped
//! to one of its channels), as delivered to clients over HTTP and WebSocket.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Public profile fields of the user who sent a message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SenderProfile {
    pub id: Uuid,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// A message with its sender profile populated
///
/// Messages are immutable once created. The only mutation the system
/// supports is deletion by the original sender.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Unique message ID
    pub id: Uuid,
    /// Message text (may be empty for image-only messages)
    pub content: String,
    /// Hosted image URL for image messages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Whether this message carries an image
    #[serde(default)]
    pub is_image: bool,
    /// Who sent the message
    pub sender: SenderProfile,
    /// Community the message belongs to
    pub community_id: Uuid,
    /// Channel inside the community, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<Uuid>,
    /// Idempotency key generated by the sending client, echoed back verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    /// Per-community sequence number, strictly increasing in send order
    pub seq: u64,
    /// When the server accepted the message
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Get a preview of the message (first N characters)
    ///
    /// Image messages without text preview as `"[image]"`.
    pub fn preview(&self, max_len: usize) -> String {
        if self.content.is_empty() && self.is_image {
            return "[image]".to_string();
        }
        if self.content.chars().count() <= max_len {
            self.content.clone()
        } else {
            let mut preview: String = self.content.chars().take(max_len.saturating_sub(3)).collect();
            preview.push_str("...");
            preview
        }
    }

    /// Build the short summary used by inbox digests
    pub fn summary(&self, preview_len: usize) -> MessageSummary {
        MessageSummary {
            id: self.id,
            preview: self.preview(preview_len),
            sender_id: self.sender.id,
            sender_username: self.sender.username.clone(),
            is_image: self.is_image,
            timestamp: self.timestamp,
        }
    }
}

/// Condensed view of a message for inbox rows and unread digests
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MessageSummary {
    pub id: Uuid,
    pub preview: String,
    pub sender_id: Uuid,
    pub sender_username: String,
    #[serde(default)]
    pub is_image: bool,
    pub timestamp: DateTime<Utc>,
}

/// Query parameters for listing messages of a community
///
/// `before_seq` pages backwards through history; `after_seq` is the
/// reconnect backfill cursor. When both are absent the newest page is returned.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListMessagesParams {
    pub limit: Option<u32>,
    pub before_seq: Option<u64>,
    pub after_seq: Option<u64>,
}

/// Response for listing messages, always in ascending `seq` order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMessagesResponse {
    pub messages: Vec<Message>,
    pub has_more: bool,
}

/// Query parameters for searching messages by text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchMessagesParams {
    pub q: String,
    pub limit: Option<u32>,
}

/// Response after deleting a message
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteMessageResponse {
    pub success: bool,
    pub message_id: Uuid,
}
