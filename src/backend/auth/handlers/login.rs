/**
 * Login Handler
 *
 * This module implements the user authentication handler for POST /api/auth/login.
 *
 * # Security
 *
 * - Passwords are verified using bcrypt
 * - Unknown users and wrong passwords both return 401
 * - User passwords are never returned in responses
 */

use axum::{extract::State, response::Json};
use bcrypt::verify;

use crate::backend::auth::handlers::types::{AuthResponse, LoginRequest};
use crate::backend::auth::sessions::create_token;
use crate::backend::auth::users::{get_user_by_email, get_user_by_username};
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::server::state::AppState;

/// Login handler
///
/// The `username` field also accepts an email address.
///
/// # Errors
///
/// * `401 Unauthorized` - If user is not found or password is incorrect
/// * `500 Internal Server Error` - If database query or token generation fails
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> BackendResult<Json<AuthResponse>> {
    tracing::info!("[Auth] Login request for: {}", request.username);

    let user = if request.username.contains('@') {
        get_user_by_email(&state.db, &request.username).await?
    } else {
        get_user_by_username(&state.db, &request.username).await?
    };

    let user = user.ok_or_else(|| {
        tracing::warn!("[Auth] User not found: {}", request.username);
        BackendError::Unauthorized
    })?;

    if !verify(&request.password, &user.password_hash)? {
        tracing::warn!("[Auth] Invalid password for user: {}", request.username);
        return Err(BackendError::Unauthorized);
    }

    let token = create_token(&state.config, user.id, &user.username)?;

    tracing::info!("[Auth] User logged in: {} ({})", user.username, user.id);

    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}
