//! Database operations for communities
//!
//! This module contains database operations for communities and their
//! membership lists.

use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::shared::messaging::Community;

#[derive(sqlx::FromRow)]
struct CommunityRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    creator_id: Uuid,
    created_at: chrono::DateTime<Utc>,
}

impl From<CommunityRow> for Community {
    fn from(row: CommunityRow) -> Self {
        Community {
            id: row.id,
            name: row.name,
            description: row.description,
            creator_id: row.creator_id,
            created_at: row.created_at,
        }
    }
}

/// Create a community and make its creator the first member
pub async fn create_community(
    pool: &SqlitePool,
    creator_id: Uuid,
    name: &str,
    description: Option<&str>,
) -> Result<Community, sqlx::Error> {
    let id = Uuid::new_v4();
    let now = Utc::now();
    let mut tx = pool.begin().await?;

    let row = sqlx::query_as::<_, CommunityRow>(
        r#"
        INSERT INTO communities (id, name, description, creator_id, last_seq, created_at)
        VALUES (?, ?, ?, ?, 0, ?)
        RETURNING id, name, description, creator_id, created_at
        "#
    )
    .bind(id)
    .bind(name)
    .bind(description)
    .bind(creator_id)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query("INSERT INTO community_members (community_id, user_id, joined_at) VALUES (?, ?, ?)")
        .bind(id)
        .bind(creator_id)
        .bind(now)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(row.into())
}

/// Get a community by ID
pub async fn get_community(
    pool: &SqlitePool,
    community_id: Uuid,
) -> Result<Option<Community>, sqlx::Error> {
    let row = sqlx::query_as::<_, CommunityRow>(
        "SELECT id, name, description, creator_id, created_at FROM communities WHERE id = ?",
    )
    .bind(community_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(Community::from))
}

/// Communities the user is a member of, oldest membership first
pub async fn list_user_communities(
    pool: &SqlitePool,
    user_id: Uuid,
) -> Result<Vec<Community>, sqlx::Error> {
    let rows = sqlx::query_as::<_, CommunityRow>(
        r#"
        SELECT c.id, c.name, c.description, c.creator_id, c.created_at
        FROM communities c
        JOIN community_members m ON m.community_id = c.id
        WHERE m.user_id = ?
        ORDER BY m.joined_at ASC
        "#
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(Community::from).collect())
}

/// Add a member. Returns `false` if the user already was one.
pub async fn add_member(
    pool: &SqlitePool,
    community_id: Uuid,
    user_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "INSERT OR IGNORE INTO community_members (community_id, user_id, joined_at) VALUES (?, ?, ?)",
    )
    .bind(community_id)
    .bind(user_id)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}

pub async fn is_member(
    pool: &SqlitePool,
    community_id: Uuid,
    user_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let found: Option<i64> = sqlx::query_scalar(
        "SELECT 1 FROM community_members WHERE community_id = ? AND user_id = ?",
    )
    .bind(community_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(found.is_some())
}
