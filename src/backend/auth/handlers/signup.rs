/**
 * Signup Handler
 *
 * This module implements the user registration handler for POST /api/auth/signup.
 *
 * # Registration Process
 *
 * 1. Validate username, email and password
 * 2. Check if username or email is already taken
 * 3. Hash password using bcrypt
 * 4. Create user in database
 * 5. Generate JWT token
 * 6. Return token and user info
 */

use axum::{extract::State, http::StatusCode, response::Json};
use bcrypt::hash;

use crate::backend::auth::handlers::types::{AuthResponse, SignupRequest};
use crate::backend::auth::sessions::create_token;
use crate::backend::auth::users::{create_user, get_user_by_email, get_user_by_username};
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::server::state::AppState;

/// Validate username format
///
/// Usernames must be:
/// - 3-30 characters long
/// - Contain only alphanumeric characters and underscores
/// - Start with a letter
pub fn is_valid_username(username: &str) -> bool {
    if username.len() < 3 || username.len() > 30 {
        return false;
    }

    let mut chars = username.chars();

    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }

    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Sign up handler
///
/// # Errors
///
/// * `400 Bad Request` - If username, email or password is invalid
/// * `409 Conflict` - If username or email is already registered
/// * `500 Internal Server Error` - If hashing, insert or token generation fails
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> BackendResult<(StatusCode, Json<AuthResponse>)> {
    tracing::info!("[Auth] Signup request for username: {}", request.username);

    if !is_valid_username(&request.username) {
        return Err(BackendError::bad_request(
            "Username must be 3-30 chars, start with a letter, and contain only letters, numbers, and underscores",
        ));
    }

    if !request.email.contains('@') {
        return Err(BackendError::bad_request("Invalid email format"));
    }

    if request.password.len() < 8 {
        return Err(BackendError::bad_request("Password must be at least 8 characters"));
    }

    if get_user_by_username(&state.db, &request.username).await?.is_some() {
        tracing::warn!("[Auth] Username already exists: {}", request.username);
        return Err(BackendError::handler(StatusCode::CONFLICT, "Username already taken"));
    }

    if get_user_by_email(&state.db, &request.email).await?.is_some() {
        tracing::warn!("[Auth] Email already exists: {}", request.email);
        return Err(BackendError::handler(StatusCode::CONFLICT, "Email already registered"));
    }

    let password_hash = hash(&request.password, state.config.bcrypt_cost)?;

    let avatar = request.avatar.as_deref().map(str::trim).filter(|a| !a.is_empty());
    let user = create_user(&state.db, &request.username, &request.email, &password_hash, avatar)
        .await
        .map_err(|e| match &e {
            // Lost a race with a concurrent signup for the same name
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                BackendError::handler(StatusCode::CONFLICT, "Username or email already registered")
            }
            _ => BackendError::from(e),
        })?;

    let token = create_token(&state.config, user.id, &user.username)?;

    tracing::info!("[Auth] User created: {} ({})", user.username, user.id);

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: user.into(),
        }),
    ))
}
