//! Unread Counters and Inbox Digest
//!
//! Types shared by the server read paths and the client store for
//! per-community unread counts, plus the inbox ordering both sides use.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::message::MessageSummary;

/// Unread state of one community from one user's perspective
///
/// A community with no entry has zero unread messages.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UnreadEntry {
    pub community_id: Uuid,
    pub count: u32,
    /// Last time the user marked this community read
    #[serde(default)]
    pub last_read: Option<DateTime<Utc>>,
    /// Last time the counter changed
    pub updated_at: DateTime<Utc>,
}

/// Per-community breakdown plus the aggregate total
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UnreadSummary {
    pub total: u64,
    pub communities: Vec<UnreadEntry>,
}

impl UnreadSummary {
    /// Build a summary from entries, summing their counts
    pub fn from_entries(communities: Vec<UnreadEntry>) -> Self {
        let total = communities.iter().map(|e| u64::from(e.count)).sum();
        Self { total, communities }
    }
}

/// Aggregate unread count only
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UnreadTotal {
    pub total: u64,
}

/// One row of the "communities with last message" inbox
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InboxEntry {
    pub community_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub last_message: Option<MessageSummary>,
    pub unread_count: u32,
    pub message_count: u64,
}

impl InboxEntry {
    /// Timestamp of the most recent message, if any
    pub fn last_activity(&self) -> Option<DateTime<Utc>> {
        self.last_message.as_ref().map(|m| m.timestamp)
    }
}

/// Inbox ordering: unread count desc, last message time desc, total messages desc
///
/// Communities without any message sort after those with one when the unread
/// counts tie.
pub fn compare_inbox_entries(a: &InboxEntry, b: &InboxEntry) -> Ordering {
    b.unread_count
        .cmp(&a.unread_count)
        .then_with(|| b.last_activity().cmp(&a.last_activity()))
        .then_with(|| b.message_count.cmp(&a.message_count))
}

/// Sort an inbox in place
pub fn sort_inbox(entries: &mut [InboxEntry]) {
    entries.sort_by(compare_inbox_entries);
}

/// Response after marking a community read over HTTP
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkReadResponse {
    pub community_id: Uuid,
    pub count: u32,
}
