//! Community HTTP Handlers
//!
//! Create, list and join communities. All routes sit behind the auth
//! middleware.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::backend::error::{BackendError, BackendResult};
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;
use crate::shared::messaging::{
    Community, CreateCommunityRequest, JoinCommunityResponse, ListCommunitiesResponse,
};
use super::db;

const MAX_NAME_CHARS: usize = 100;

/// Fail with 404 if the community is missing and 403 if the user is not in it
pub async fn require_member(state: &AppState, community_id: Uuid, user_id: Uuid) -> BackendResult<()> {
    if db::is_member(&state.db, community_id, user_id).await? {
        return Ok(());
    }
    if db::get_community(&state.db, community_id).await?.is_none() {
        return Err(BackendError::not_found("Community not found"));
    }
    Err(BackendError::forbidden("You are not a member of this community"))
}

/// Create a community (POST /api/communities)
///
/// The caller becomes its first member.
pub async fn create_community(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<CreateCommunityRequest>,
) -> BackendResult<(StatusCode, Json<Community>)> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(BackendError::bad_request("Community name is required"));
    }
    if name.chars().count() > MAX_NAME_CHARS {
        return Err(BackendError::bad_request("Community name is too long"));
    }
    let description = request
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty());

    let community = db::create_community(&state.db, user.user_id, name, description).await?;
    tracing::info!("[Communities] {} created {} ({})", user.username, community.name, community.id);

    Ok((StatusCode::CREATED, Json(community)))
}

/// List the caller's communities (GET /api/communities)
pub async fn list_communities(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> BackendResult<Json<ListCommunitiesResponse>> {
    let communities = db::list_user_communities(&state.db, user.user_id).await?;
    Ok(Json(ListCommunitiesResponse { communities }))
}

/// Join a community (POST /api/communities/{id}/join)
///
/// Joining twice is not an error.
pub async fn join_community(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(community_id): Path<Uuid>,
) -> BackendResult<Json<JoinCommunityResponse>> {
    if db::get_community(&state.db, community_id).await?.is_none() {
        return Err(BackendError::not_found("Community not found"));
    }

    if db::add_member(&state.db, community_id, user.user_id).await? {
        tracing::info!("[Communities] {} joined {}", user.username, community_id);
    }

    Ok(Json(JoinCommunityResponse {
        success: true,
        community_id,
    }))
}
