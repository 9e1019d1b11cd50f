/**
 * Get Current User Handler
 *
 * This module implements the handler for GET /api/auth/me, which returns
 * information about the currently authenticated user.
 *
 * The route sits behind the auth middleware, so the token has already been
 * verified and the user looked up by the time this handler runs.
 */

use axum::{extract::State, response::Json};

use crate::backend::auth::handlers::types::UserResponse;
use crate::backend::auth::users::get_user_by_id;
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;

/// Get current user handler
///
/// # Errors
///
/// * `401 Unauthorized` - If the token is missing or invalid (from the middleware)
/// * `404 Not Found` - If the user was deleted after the middleware ran
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(auth): AuthUser,
) -> BackendResult<Json<UserResponse>> {
    let user = get_user_by_id(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| BackendError::not_found("User not found"))?;

    Ok(Json(user.into()))
}
