//! Database operations for messaging
//!
//! This module contains database operations for community messages: the
//! transactional insert used by the relay, history pages, search and delete.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::shared::messaging::{Message, SenderProfile};

/// Page size when the client gives none
pub const DEFAULT_PAGE_SIZE: u32 = 50;
/// Largest page a client may request
pub const MAX_PAGE_SIZE: u32 = 200;

const MESSAGE_SELECT: &str = r#"
    SELECT m.id, m.content, m.image, m.is_image, m.community_id, m.channel_id, m.client_id,
           m.seq, m.created_at, u.id AS sender_id, u.username AS sender_username,
           u.avatar AS sender_avatar
    FROM messages m
    JOIN users u ON u.id = m.sender_id
"#;

/// A message about to be inserted
#[derive(Debug, Clone)]
pub struct NewMessage<'a> {
    pub community_id: Uuid,
    pub channel_id: Option<Uuid>,
    pub sender_id: Uuid,
    pub content: &'a str,
    pub image: Option<&'a str>,
    pub is_image: bool,
    pub client_id: Option<&'a str>,
}

/// Result of the relay's insert transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertedMessage {
    pub id: Uuid,
    pub seq: u64,
    /// Recipients whose unread entry was incremented, with the new count
    pub incremented: Vec<(Uuid, u32)>,
}

pub(crate) fn message_from_row(row: &SqliteRow) -> Result<Message, sqlx::Error> {
    let seq: i64 = row.try_get("seq")?;
    Ok(Message {
        id: row.try_get("id")?,
        content: row.try_get("content")?,
        image: row.try_get("image")?,
        is_image: row.try_get("is_image")?,
        sender: SenderProfile {
            id: row.try_get("sender_id")?,
            username: row.try_get("sender_username")?,
            avatar: row.try_get("sender_avatar")?,
        },
        community_id: row.try_get("community_id")?,
        channel_id: row.try_get("channel_id")?,
        client_id: row.try_get("client_id")?,
        seq: u64::try_from(seq).unwrap_or_default(),
        timestamp: row.try_get::<DateTime<Utc>, _>("created_at")?,
    })
}

fn seq_bound(seq: u64) -> i64 {
    i64::try_from(seq).unwrap_or(i64::MAX)
}

/// Insert a message and bump unread counters in one transaction
///
/// Allocates the next community `seq`, inserts the message, then increments
/// the unread entry of every member other than the sender who is not in
/// `viewers`. Either all of it is committed or none of it.
pub async fn insert_message_with_unread(
    pool: &SqlitePool,
    message: &NewMessage<'_>,
    viewers: &HashSet<Uuid>,
) -> Result<InsertedMessage, sqlx::Error> {
    let id = Uuid::new_v4();
    let now = Utc::now();
    let mut tx = pool.begin().await?;

    let seq: i64 = sqlx::query_scalar(
        "UPDATE communities SET last_seq = last_seq + 1 WHERE id = ? RETURNING last_seq",
    )
    .bind(message.community_id)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO messages (id, community_id, channel_id, sender_id, content, image, is_image, client_id, seq, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#
    )
    .bind(id)
    .bind(message.community_id)
    .bind(message.channel_id)
    .bind(message.sender_id)
    .bind(message.content)
    .bind(message.image)
    .bind(message.is_image)
    .bind(message.client_id)
    .bind(seq)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    let members: Vec<Uuid> = sqlx::query_scalar(
        "SELECT user_id FROM community_members WHERE community_id = ? AND user_id != ?",
    )
    .bind(message.community_id)
    .bind(message.sender_id)
    .fetch_all(&mut *tx)
    .await?;

    let mut incremented = Vec::new();
    for user_id in members.into_iter().filter(|user| !viewers.contains(user)) {
        let count: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO unread_entries (user_id, community_id, count, last_read, updated_at)
            VALUES (?, ?, 1, NULL, ?)
            ON CONFLICT (user_id, community_id)
            DO UPDATE SET count = count + 1, updated_at = excluded.updated_at
            RETURNING count
            "#
        )
        .bind(user_id)
        .bind(message.community_id)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;
        incremented.push((user_id, u32::try_from(count).unwrap_or(u32::MAX)));
    }

    tx.commit().await?;

    Ok(InsertedMessage {
        id,
        seq: u64::try_from(seq).unwrap_or_default(),
        incremented,
    })
}

/// Get a message with its sender profile populated
pub async fn get_message(pool: &SqlitePool, message_id: Uuid) -> Result<Option<Message>, sqlx::Error> {
    let sql = format!("{MESSAGE_SELECT} WHERE m.id = ?");
    let row = sqlx::query(&sql).bind(message_id).fetch_optional(pool).await?;
    row.as_ref().map(message_from_row).transpose()
}

/// Newest message of a community, if any
pub async fn latest_message(pool: &SqlitePool, community_id: Uuid) -> Result<Option<Message>, sqlx::Error> {
    let sql = format!("{MESSAGE_SELECT} WHERE m.community_id = ? ORDER BY m.seq DESC LIMIT 1");
    let row = sqlx::query(&sql).bind(community_id).fetch_optional(pool).await?;
    row.as_ref().map(message_from_row).transpose()
}

/// One page of community history, always returned in ascending `seq` order
///
/// With `after_seq` the page starts right after that cursor (reconnect
/// backfill). Otherwise it is the newest `limit` messages below `before_seq`.
/// The flag is `true` when more messages exist in the paging direction.
pub async fn list_messages(
    pool: &SqlitePool,
    community_id: Uuid,
    limit: Option<u32>,
    before_seq: Option<u64>,
    after_seq: Option<u64>,
) -> Result<(Vec<Message>, bool), sqlx::Error> {
    let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE) as usize;
    let upper = before_seq.map(seq_bound).unwrap_or(i64::MAX);

    let rows = match after_seq {
        Some(after) => {
            let sql = format!(
                "{MESSAGE_SELECT} WHERE m.community_id = ? AND m.seq > ? AND m.seq < ? ORDER BY m.seq ASC LIMIT ?"
            );
            sqlx::query(&sql)
                .bind(community_id)
                .bind(seq_bound(after))
                .bind(upper)
                .bind((limit + 1) as i64)
                .fetch_all(pool)
                .await?
        }
        None => {
            let sql = format!(
                "{MESSAGE_SELECT} WHERE m.community_id = ? AND m.seq < ? ORDER BY m.seq DESC LIMIT ?"
            );
            sqlx::query(&sql)
                .bind(community_id)
                .bind(upper)
                .bind((limit + 1) as i64)
                .fetch_all(pool)
                .await?
        }
    };

    let mut messages = rows.iter().map(message_from_row).collect::<Result<Vec<_>, _>>()?;
    let has_more = messages.len() > limit;
    messages.truncate(limit);
    if after_seq.is_none() {
        messages.reverse();
    }
    Ok((messages, has_more))
}

/// Escape `%`, `_` and `\` so user input matches literally inside LIKE
pub fn escape_like(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len());
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Case-insensitive substring search, newest first
pub async fn search_messages(
    pool: &SqlitePool,
    community_id: Uuid,
    query: &str,
    limit: Option<u32>,
) -> Result<Vec<Message>, sqlx::Error> {
    let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    let pattern = format!("%{}%", escape_like(query));
    let sql = format!(
        "{MESSAGE_SELECT} WHERE m.community_id = ? AND m.content LIKE ? ESCAPE '\\' ORDER BY m.seq DESC LIMIT ?"
    );
    let rows = sqlx::query(&sql)
        .bind(community_id)
        .bind(pattern)
        .bind(i64::from(limit))
        .fetch_all(pool)
        .await?;
    rows.iter().map(message_from_row).collect()
}

/// Delete a message. Returns `false` if it did not exist.
pub async fn delete_message(pool: &SqlitePool, message_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM messages WHERE id = ?")
        .bind(message_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() == 1)
}

/// Total number of messages in a community
pub async fn count_messages(pool: &SqlitePool, community_id: Uuid) -> Result<u64, sqlx::Error> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM messages WHERE community_id = ?")
        .bind(community_id)
        .fetch_one(pool)
        .await?;
    Ok(u64::try_from(count).unwrap_or_default())
}
