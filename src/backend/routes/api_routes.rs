/**
 * API Route Handlers
 *
 * # Routes
 *
 * ## Authentication
 * - `POST /api/auth/signup` - User registration (public)
 * - `POST /api/auth/login` - User login (public)
 * - `GET /api/auth/me` - Current user info
 *
 * ## Communities
 * - `POST /api/communities` - Create a community
 * - `GET /api/communities` - Communities the caller belongs to
 * - `POST /api/communities/{id}/join` - Join a community
 * - `POST /api/communities/{id}/read` - Mark a community read
 *
 * ## Messages
 * - `GET /api/communities/{id}/messages` - History and backfill
 * - `GET /api/communities/{id}/messages/search` - Text search
 * - `DELETE /api/messages/{id}` - Delete own message
 *
 * ## Unread
 * - `GET /api/unread` - Per-community breakdown and total
 * - `GET /api/unread/total` - Total only
 * - `GET /api/inbox` - Sorted inbox digest
 */

use axum::routing::{delete, get, post};
use axum::Router;

use crate::backend::auth::{get_me, login, signup};
use crate::backend::communities::{create_community, join_community, list_communities};
use crate::backend::messaging::{delete_message, list_messages, search_messages};
use crate::backend::server::state::AppState;
use crate::backend::unread::{get_inbox, get_unread, get_unread_total, mark_read};

/// Routes reachable without a token
pub fn configure_public_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/api/auth/signup", post(signup))
        .route("/api/auth/login", post(login))
}

/// Routes that require a bearer token
///
/// The caller wraps these in the auth middleware.
pub fn configure_protected_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/api/auth/me", get(get_me))
        // Communities
        .route("/api/communities", post(create_community).get(list_communities))
        .route("/api/communities/{id}/join", post(join_community))
        .route("/api/communities/{id}/read", post(mark_read))
        // Messages
        .route("/api/communities/{id}/messages", get(list_messages))
        .route("/api/communities/{id}/messages/search", get(search_messages))
        .route("/api/messages/{id}", delete(delete_message))
        // Unread counters
        .route("/api/unread", get(get_unread))
        .route("/api/unread/total", get(get_unread_total))
        .route("/api/inbox", get(get_inbox))
}
