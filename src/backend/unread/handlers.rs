//! Unread HTTP Handlers
//!
//! Read paths for unread counters and the inbox digest, plus the HTTP way of
//! marking a community read.

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::backend::communities::require_member;
use crate::backend::error::BackendResult;
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;
use crate::shared::messaging::{sort_inbox, InboxEntry, MarkReadResponse, UnreadSummary, UnreadTotal};
use super::db;
use super::sync::mark_read_and_notify;

/// Per-community breakdown and total (GET /api/unread)
pub async fn get_unread(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> BackendResult<Json<UnreadSummary>> {
    let entries = db::list_unread(&state.db, user.user_id).await?;
    Ok(Json(UnreadSummary::from_entries(entries)))
}

/// Aggregate count only (GET /api/unread/total)
pub async fn get_unread_total(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> BackendResult<Json<UnreadTotal>> {
    let total = db::total_unread(&state.db, user.user_id).await?;
    Ok(Json(UnreadTotal { total }))
}

/// Inbox digest, sorted (GET /api/inbox)
///
/// Ordered by unread count, then last message time (communities without
/// messages last), then total message count.
pub async fn get_inbox(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> BackendResult<Json<Vec<InboxEntry>>> {
    let mut entries = db::inbox(&state.db, user.user_id).await?;
    sort_inbox(&mut entries);
    Ok(Json(entries))
}

/// Mark a community read (POST /api/communities/{id}/read)
pub async fn mark_read(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(community_id): Path<Uuid>,
) -> BackendResult<Json<MarkReadResponse>> {
    require_member(&state, community_id, user.user_id).await?;

    let entry = mark_read_and_notify(&state, user.user_id, community_id).await?;
    Ok(Json(MarkReadResponse {
        community_id,
        count: entry.count,
    }))
}
