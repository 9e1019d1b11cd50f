/**
 * Authentication Middleware
 *
 * This module provides middleware for protecting routes that require
 * user authentication. It extracts and verifies JWT tokens from the
 * Authorization header and provides the user to handlers.
 *
 * `authenticate_token` is also the WebSocket connection authenticator:
 * the `/ws` handshake calls it before upgrading.
 */

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::backend::auth::sessions::{bearer_token, verify_token};
use crate::backend::auth::users::get_user_by_id;
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;

/// Authenticated user resolved from a verified token
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub username: String,
    pub avatar: Option<String>,
}

/// Read the bearer token from request headers
pub fn token_from_headers(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(bearer_token)
}

/// Verify a token and load the user it names
///
/// Fails with `Unauthorized` when the signature or expiry is invalid, or
/// the user no longer exists. Database failures surface as 500s.
pub async fn authenticate_token(
    state: &AppState,
    token: &str,
) -> Result<AuthenticatedUser, BackendError> {
    let claims = verify_token(&state.config, token).map_err(|e| {
        tracing::warn!("[Auth] Invalid token: {}", e);
        BackendError::Unauthorized
    })?;

    let user_id = claims.user_id().ok_or_else(|| {
        tracing::warn!("[Auth] Token subject is not a user id: {}", claims.sub);
        BackendError::Unauthorized
    })?;

    let user = get_user_by_id(&state.db, user_id).await?.ok_or_else(|| {
        tracing::warn!("[Auth] Token names unknown user: {}", user_id);
        BackendError::Unauthorized
    })?;

    Ok(AuthenticatedUser {
        user_id: user.id,
        username: user.username,
        avatar: user.avatar,
    })
}

/// Authentication middleware
///
/// This middleware:
/// 1. Extracts JWT token from Authorization header
/// 2. Verifies the token and loads the user
/// 3. Attaches user data to request extensions for use in handlers
///
/// Returns 401 Unauthorized if token is missing or invalid
pub async fn auth_middleware(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, BackendError> {
    let token = token_from_headers(request.headers()).ok_or_else(|| {
        tracing::debug!("[Auth] Missing or malformed Authorization header");
        BackendError::Unauthorized
    })?;

    let user = authenticate_token(&app_state, token).await?;
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

/// Axum extractor for the authenticated user
///
/// Reads the user the middleware attached to the request extensions.
#[derive(Clone, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| {
                tracing::warn!("[Auth] AuthenticatedUser not found in request extensions");
                BackendError::Unauthorized
            })
    }
}
