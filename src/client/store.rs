//! # Client Chat Store
//!
//! Pure client state: per-community timelines, the inbox and typing
//! indicators. Nothing here does I/O; the realtime client feeds server events
//! in and sends the frames the store hands out.
//!
//! ## Optimistic sends
//!
//! `begin_send` inserts a placeholder with a negative temporary id and a fresh
//! `clientId`. The server echoes that `clientId` on the confirmed
//! `new_message`, which replaces the placeholder in place. A failed `ack`
//! removes it.
//!
//! ## Gaps
//!
//! Each community tracks the highest confirmed `seq`. A confirmed message
//! that skips ahead is reported as a [`SeqGap`]; the caller fetches the
//! missing range with `after_seq` and merges it through `apply_backfill`.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::shared::event::{
    AckNotice, DeletedNotice, ReadReceipt, RoomTarget, SendMessagePayload, TypingNotice, UnreadUpdate,
};
use crate::shared::messaging::{sort_inbox, SenderProfile};
use crate::shared::{ClientEvent, ClientFrame, InboxEntry, Message, MessageSummary, ServerEvent};

/// Preview length for locally built inbox summaries
const PREVIEW_LEN: usize = 80;

/// Identity of a timeline entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryId {
    /// Negative id of a placeholder not yet confirmed
    Temp(i64),
    /// Server-assigned id
    Server(Uuid),
}

/// One row in a community timeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEntry {
    pub id: EntryId,
    pub client_id: Option<String>,
    pub content: String,
    pub image: Option<String>,
    pub is_image: bool,
    pub sender: SenderProfile,
    pub community_id: Uuid,
    pub channel_id: Option<Uuid>,
    /// `None` while pending
    pub seq: Option<u64>,
    pub timestamp: DateTime<Utc>,
}

impl ChatEntry {
    pub fn is_pending(&self) -> bool {
        matches!(self.id, EntryId::Temp(_))
    }

    fn confirmed(message: Message) -> Self {
        Self {
            id: EntryId::Server(message.id),
            client_id: message.client_id,
            content: message.content,
            image: message.image,
            is_image: message.is_image,
            sender: message.sender,
            community_id: message.community_id,
            channel_id: message.channel_id,
            seq: Some(message.seq),
            timestamp: message.timestamp,
        }
    }

    fn summary(&self) -> MessageSummary {
        let preview = if self.content.is_empty() && self.is_image {
            "[image]".to_string()
        } else if self.content.chars().count() <= PREVIEW_LEN {
            self.content.clone()
        } else {
            let mut preview: String = self.content.chars().take(PREVIEW_LEN - 3).collect();
            preview.push_str("...");
            preview
        };
        MessageSummary {
            id: match self.id {
                EntryId::Server(id) => id,
                EntryId::Temp(_) => Uuid::nil(),
            },
            preview,
            sender_id: self.sender.id,
            sender_username: self.sender.username.clone(),
            is_image: self.is_image,
            timestamp: self.timestamp,
        }
    }
}

/// A send the caller must put on the wire
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSend {
    pub temp_id: i64,
    pub client_id: String,
    pub frame: ClientFrame,
}

/// What `apply_new_message` did with a confirmed message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyKind {
    /// Replaced the local placeholder with the same `clientId`
    Reconciled,
    /// Added as a new entry
    Appended,
    /// Already present
    Duplicate,
}

/// Confirmed messages between `after` and `received` are missing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeqGap {
    pub community_id: Uuid,
    pub after: u64,
    pub received: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplyOutcome {
    pub kind: ApplyKind,
    pub gap: Option<SeqGap>,
}

/// Client-side chat state for one signed-in user
#[derive(Debug)]
pub struct ChatStore {
    me: SenderProfile,
    next_temp_id: i64,
    next_ack: u64,
    pending_acks: HashMap<u64, String>,
    timelines: HashMap<Uuid, Vec<ChatEntry>>,
    last_seq: HashMap<Uuid, u64>,
    joined: Vec<RoomTarget>,
    active: Option<Uuid>,
    inbox: Vec<InboxEntry>,
    typing: HashMap<(Uuid, Uuid), String>,
}

impl ChatStore {
    pub fn new(me: SenderProfile) -> Self {
        Self {
            me,
            next_temp_id: -1,
            next_ack: 1,
            pending_acks: HashMap::new(),
            timelines: HashMap::new(),
            last_seq: HashMap::new(),
            joined: Vec::new(),
            active: None,
            inbox: Vec::new(),
            typing: HashMap::new(),
        }
    }

    pub fn me(&self) -> &SenderProfile {
        &self.me
    }

    pub fn messages(&self, community_id: Uuid) -> &[ChatEntry] {
        self.timelines.get(&community_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn inbox(&self) -> &[InboxEntry] {
        &self.inbox
    }

    pub fn active_community(&self) -> Option<Uuid> {
        self.active
    }

    /// Replace the inbox with a fresh server digest
    pub fn set_inbox(&mut self, mut entries: Vec<InboxEntry>) {
        if let Some(active) = self.active {
            if let Some(entry) = entries.iter_mut().find(|e| e.community_id == active) {
                entry.unread_count = 0;
            }
        }
        sort_inbox(&mut entries);
        self.inbox = entries;
    }

    pub fn unread_count(&self, community_id: Uuid) -> u32 {
        self.inbox
            .iter()
            .find(|e| e.community_id == community_id)
            .map(|e| e.unread_count)
            .unwrap_or(0)
    }

    pub fn total_unread(&self) -> u64 {
        self.inbox.iter().map(|e| u64::from(e.unread_count)).sum()
    }

    /// Insert an optimistic placeholder and build the frame that sends it
    pub fn begin_send(
        &mut self,
        target: RoomTarget,
        content: impl Into<String>,
        image: Option<String>,
    ) -> PendingSend {
        let temp_id = self.next_temp_id;
        self.next_temp_id -= 1;
        let ack = self.next_ack;
        self.next_ack += 1;

        let client_id = Uuid::new_v4().to_string();
        let content = content.into();
        let is_image = image.is_some();

        let entry = ChatEntry {
            id: EntryId::Temp(temp_id),
            client_id: Some(client_id.clone()),
            content: content.clone(),
            image: image.clone(),
            is_image,
            sender: self.me.clone(),
            community_id: target.community_id,
            channel_id: target.channel_id,
            seq: None,
            timestamp: Utc::now(),
        };
        let summary = entry.summary();
        self.timelines.entry(target.community_id).or_default().push(entry);
        self.pending_acks.insert(ack, client_id.clone());
        self.bump_inbox(target.community_id, summary, false);

        let frame = ClientFrame::new(ClientEvent::SendMessage(SendMessagePayload {
            community_id: Some(target.community_id.to_string()),
            channel_id: target.channel_id.map(|id| id.to_string()),
            content,
            is_image,
            image,
            client_id: Some(client_id.clone()),
        }))
        .with_ack(ack);

        PendingSend { temp_id, client_id, frame }
    }

    /// Remove a placeholder whose send failed. Returns `false` if none matched.
    pub fn fail_send(&mut self, client_id: &str) -> bool {
        self.pending_acks.retain(|_, pending| pending != client_id);
        let mut removed = false;
        for timeline in self.timelines.values_mut() {
            let before = timeline.len();
            timeline.retain(|e| !(e.is_pending() && e.client_id.as_deref() == Some(client_id)));
            removed |= timeline.len() != before;
        }
        removed
    }

    /// Merge a confirmed message from `new_message`
    pub fn apply_new_message(&mut self, message: Message) -> ApplyOutcome {
        let community_id = message.community_id;
        let gap = self.advance_seq(community_id, message.seq);
        let from_me = message.sender.id == self.me.id;
        let entry = ChatEntry::confirmed(message);
        let summary = entry.summary();

        let kind = self.merge_entry(entry);
        if kind != ApplyKind::Duplicate {
            let count_unread = kind == ApplyKind::Appended && !from_me && self.active != Some(community_id);
            self.bump_inbox(community_id, summary, count_unread);
            if let Some(entry) = self.inbox.iter_mut().find(|e| e.community_id == community_id) {
                entry.message_count += 1;
            }
            sort_inbox(&mut self.inbox);
        }

        ApplyOutcome { kind, gap }
    }

    /// Merge fetched history, deduplicating by id. Returns how many entries changed.
    pub fn apply_backfill(&mut self, community_id: Uuid, messages: Vec<Message>) -> usize {
        let mut changed = 0;
        for message in messages.into_iter().filter(|m| m.community_id == community_id) {
            let seq = message.seq;
            if self.merge_entry(ChatEntry::confirmed(message)) != ApplyKind::Duplicate {
                changed += 1;
            }
            let last = self.last_seq.entry(community_id).or_insert(0);
            *last = (*last).max(seq);
        }
        changed
    }

    /// Make a community the one on screen and clear its local unread count
    pub fn open_community(&mut self, community_id: Uuid) {
        self.active = Some(community_id);
        if let Some(entry) = self.inbox.iter_mut().find(|e| e.community_id == community_id) {
            entry.unread_count = 0;
        }
        sort_inbox(&mut self.inbox);
    }

    pub fn close_community(&mut self) {
        self.active = None;
    }

    /// Apply `unread_last_message_update`; the server count is authoritative
    pub fn apply_unread_update(&mut self, update: UnreadUpdate) {
        let active = self.active == Some(update.community_id);
        if let Some(entry) = self.inbox.iter_mut().find(|e| e.community_id == update.community_id) {
            let is_new = entry.last_message.as_ref().map(|m| m.id) != Some(update.last_message.id);
            if is_new {
                entry.message_count += 1;
                entry.last_message = Some(update.last_message);
            }
            entry.unread_count = if active { 0 } else { update.unread_count };
        }
        sort_inbox(&mut self.inbox);
    }

    /// Apply `messages_read`; only our own receipts change local counts
    pub fn apply_messages_read(&mut self, receipt: ReadReceipt) {
        if receipt.user_id != self.me.id {
            return;
        }
        if let Some(entry) = self.inbox.iter_mut().find(|e| e.community_id == receipt.community_id) {
            entry.unread_count = 0;
        }
        sort_inbox(&mut self.inbox);
    }

    /// Apply `message_deleted`. Returns `true` if the message was present.
    pub fn apply_message_deleted(&mut self, notice: DeletedNotice) -> bool {
        let id = EntryId::Server(notice.message_id);
        let Some(timeline) = self.timelines.get_mut(&notice.community_id) else {
            return false;
        };
        let before = timeline.len();
        timeline.retain(|e| e.id != id);
        let removed = timeline.len() != before;
        let latest = timeline.iter().rev().find(|e| !e.is_pending()).map(ChatEntry::summary);

        if let Some(entry) = self.inbox.iter_mut().find(|e| e.community_id == notice.community_id) {
            if removed {
                entry.message_count = entry.message_count.saturating_sub(1);
            }
            if entry.last_message.as_ref().map(|m| m.id) == Some(notice.message_id) {
                entry.last_message = latest;
            }
        }
        sort_inbox(&mut self.inbox);
        removed
    }

    pub fn apply_typing(&mut self, notice: TypingNotice) {
        let key = (notice.community_id, notice.user_id);
        if notice.is_typing && notice.user_id != self.me.id {
            self.typing.insert(key, notice.username);
        } else {
            self.typing.remove(&key);
        }
    }

    /// Usernames currently typing in a community, sorted
    pub fn typing_users(&self, community_id: Uuid) -> Vec<String> {
        let mut names: Vec<String> = self
            .typing
            .iter()
            .filter(|((community, _), _)| *community == community_id)
            .map(|(_, name)| name.clone())
            .collect();
        names.sort();
        names
    }

    /// Apply an `ack` reply to one of our sends
    pub fn apply_ack(&mut self, notice: AckNotice) {
        let Some(client_id) = self.pending_acks.remove(&notice.ack) else {
            return;
        };
        if notice.error.is_some() {
            self.fail_send(&client_id);
        }
    }

    /// Feed any server event into the store
    ///
    /// Returns a gap when a `new_message` skipped ahead.
    pub fn apply_server_event(&mut self, event: ServerEvent) -> Option<SeqGap> {
        match event {
            ServerEvent::NewMessage(message) => return self.apply_new_message(message).gap,
            ServerEvent::UserTyping(notice) => self.apply_typing(notice),
            ServerEvent::UnreadLastMessageUpdate(update) => self.apply_unread_update(update),
            ServerEvent::MessagesRead(receipt) => self.apply_messages_read(receipt),
            ServerEvent::MessageDeleted(notice) => {
                self.apply_message_deleted(notice);
            }
            ServerEvent::Ack(notice) => self.apply_ack(notice),
            ServerEvent::Error(_) => {}
        }
        None
    }

    /// Remember a joined room so it can be re-joined after a reconnect
    pub fn note_joined(&mut self, target: RoomTarget) {
        if !self.joined.contains(&target) {
            self.joined.push(target);
        }
    }

    pub fn note_left(&mut self, target: RoomTarget) {
        self.joined.retain(|t| *t != target);
    }

    /// Rooms to join again on a new connection, in join order
    pub fn rooms_to_rejoin(&self) -> Vec<RoomTarget> {
        self.joined.clone()
    }

    /// Highest confirmed `seq` seen for a community
    pub fn backfill_cursor(&self, community_id: Uuid) -> Option<u64> {
        self.last_seq.get(&community_id).copied()
    }

    /// `after_seq` cursors of every joined community, deduplicated
    pub fn backfill_cursors(&self) -> Vec<(Uuid, u64)> {
        let mut cursors: Vec<(Uuid, u64)> = Vec::new();
        for target in &self.joined {
            if cursors.iter().any(|(id, _)| *id == target.community_id) {
                continue;
            }
            cursors.push((target.community_id, self.backfill_cursor(target.community_id).unwrap_or(0)));
        }
        cursors
    }

    fn advance_seq(&mut self, community_id: Uuid, seq: u64) -> Option<SeqGap> {
        let last = self.last_seq.entry(community_id).or_insert(0);
        let gap = (*last > 0 && seq > *last + 1).then_some(SeqGap {
            community_id,
            after: *last,
            received: seq,
        });
        *last = (*last).max(seq);
        gap
    }

    fn merge_entry(&mut self, entry: ChatEntry) -> ApplyKind {
        let timeline = self.timelines.entry(entry.community_id).or_default();
        if timeline.iter().any(|e| e.id == entry.id) {
            return ApplyKind::Duplicate;
        }

        if let Some(client_id) = entry.client_id.as_deref() {
            if let Some(pos) = timeline
                .iter()
                .position(|e| e.is_pending() && e.client_id.as_deref() == Some(client_id))
            {
                timeline.remove(pos);
                insert_by_seq(timeline, entry);
                return ApplyKind::Reconciled;
            }
        }

        insert_by_seq(timeline, entry);
        ApplyKind::Appended
    }

    fn bump_inbox(&mut self, community_id: Uuid, summary: MessageSummary, count_unread: bool) {
        if let Some(entry) = self.inbox.iter_mut().find(|e| e.community_id == community_id) {
            entry.last_message = Some(summary);
            if count_unread {
                entry.unread_count += 1;
            }
        }
        sort_inbox(&mut self.inbox);
    }
}

/// Confirmed entries stay in `seq` order ahead of any pending placeholders
fn insert_by_seq(timeline: &mut Vec<ChatEntry>, entry: ChatEntry) {
    let seq = entry.seq.unwrap_or(u64::MAX);
    let pos = timeline
        .iter()
        .position(|e| e.seq.map_or(true, |s| s > seq))
        .unwrap_or(timeline.len());
    timeline.insert(pos, entry);
}
