//! Messaging Module
//!
//! This module contains the data structures for community messaging:
//!
//! - `Message` - A persisted message with its sender profile
//! - `Community` - A community users join and chat in
//! - `UnreadEntry` / `InboxEntry` - Unread counters and the inbox digest
//!
//! # Usage
//!
//! ```rust
//! use wanderhub::shared::messaging::{Message, Community, InboxEntry, sort_inbox};
//! ```

pub mod community;
pub mod message;
pub mod unread;

// Re-export all types
pub use community::{Community, CreateCommunityRequest, JoinCommunityResponse, ListCommunitiesResponse};
pub use message::{
    DeleteMessageResponse, ListMessagesParams, ListMessagesResponse, Message, MessageSummary,
    SearchMessagesParams, SenderProfile,
};
pub use unread::{
    compare_inbox_entries, sort_inbox, InboxEntry, MarkReadResponse, UnreadEntry, UnreadSummary,
    UnreadTotal,
};
