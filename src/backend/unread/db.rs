//! Database operations for unread counters and the inbox digest

use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::backend::messaging::db::message_from_row;
use crate::shared::messaging::{InboxEntry, UnreadEntry};

/// Length of message previews in inbox rows and unread digests
pub const PREVIEW_LEN: usize = 80;

#[derive(sqlx::FromRow)]
struct UnreadRow {
    community_id: Uuid,
    count: i64,
    last_read: Option<DateTime<Utc>>,
    updated_at: DateTime<Utc>,
}

impl From<UnreadRow> for UnreadEntry {
    fn from(row: UnreadRow) -> Self {
        UnreadEntry {
            community_id: row.community_id,
            count: u32::try_from(row.count.max(0)).unwrap_or(u32::MAX),
            last_read: row.last_read,
            updated_at: row.updated_at,
        }
    }
}

/// Per-community entries with a non-zero count, most recently bumped first
pub async fn list_unread(pool: &SqlitePool, user_id: Uuid) -> Result<Vec<UnreadEntry>, sqlx::Error> {
    let rows = sqlx::query_as::<_, UnreadRow>(
        r#"
        SELECT community_id, count, last_read, updated_at
        FROM unread_entries
        WHERE user_id = ? AND count > 0
        ORDER BY updated_at DESC
        "#
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(UnreadEntry::from).collect())
}

/// Unread count for one community; a missing entry counts as zero
pub async fn unread_count(pool: &SqlitePool, user_id: Uuid, community_id: Uuid) -> Result<u32, sqlx::Error> {
    let count: Option<i64> = sqlx::query_scalar(
        "SELECT count FROM unread_entries WHERE user_id = ? AND community_id = ?",
    )
    .bind(user_id)
    .bind(community_id)
    .fetch_optional(pool)
    .await?;

    Ok(count.map(|c| u32::try_from(c.max(0)).unwrap_or(u32::MAX)).unwrap_or(0))
}

/// Sum of unread counts across all communities
pub async fn total_unread(pool: &SqlitePool, user_id: Uuid) -> Result<u64, sqlx::Error> {
    let total: i64 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(count), 0) FROM unread_entries WHERE user_id = ?",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(u64::try_from(total).unwrap_or_default())
}

/// Reset a community's count to zero and stamp `last_read`
pub async fn mark_read(pool: &SqlitePool, user_id: Uuid, community_id: Uuid) -> Result<UnreadEntry, sqlx::Error> {
    let now = Utc::now();
    let row = sqlx::query_as::<_, UnreadRow>(
        r#"
        INSERT INTO unread_entries (user_id, community_id, count, last_read, updated_at)
        VALUES (?, ?, 0, ?, ?)
        ON CONFLICT (user_id, community_id)
        DO UPDATE SET count = 0, last_read = excluded.last_read, updated_at = excluded.updated_at
        RETURNING community_id, count, last_read, updated_at
        "#
    )
    .bind(user_id)
    .bind(community_id)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(row.into())
}

/// Inbox digest for every community the user belongs to, unsorted
///
/// The newest message of each community is joined in by its `seq`.
pub async fn inbox(pool: &SqlitePool, user_id: Uuid) -> Result<Vec<InboxEntry>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT c.id AS inbox_community_id,
               c.name AS name,
               COALESCE(u.count, 0) AS unread_count,
               (SELECT COUNT(*) FROM messages mc WHERE mc.community_id = c.id) AS message_count,
               m.id, m.content, m.image, m.is_image, m.community_id, m.channel_id, m.client_id,
               m.seq, m.created_at, s.id AS sender_id, s.username AS sender_username,
               s.avatar AS sender_avatar
        FROM community_members cm
        JOIN communities c ON c.id = cm.community_id
        LEFT JOIN unread_entries u ON u.community_id = c.id AND u.user_id = cm.user_id
        LEFT JOIN messages m ON m.community_id = c.id
            AND m.seq = (SELECT MAX(ml.seq) FROM messages ml WHERE ml.community_id = c.id)
        LEFT JOIN users s ON s.id = m.sender_id
        WHERE cm.user_id = ?
        "#
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| {
            let unread: i64 = row.try_get("unread_count")?;
            let message_count: i64 = row.try_get("message_count")?;
            let last_id: Option<Uuid> = row.try_get("id")?;
            let sender_id: Option<Uuid> = row.try_get("sender_id")?;

            let last_message = match (last_id, sender_id) {
                (Some(_), Some(_)) => Some(message_from_row(row)?.summary(PREVIEW_LEN)),
                _ => None,
            };

            Ok(InboxEntry {
                community_id: row.try_get("inbox_community_id")?,
                name: row.try_get("name")?,
                last_message,
                unread_count: u32::try_from(unread.max(0)).unwrap_or(u32::MAX),
                message_count: u64::try_from(message_count).unwrap_or_default(),
            })
        })
        .collect()
}
