/**
 * Authentication Handler Types
 *
 * The request and response bodies live in `shared::auth` so the HTTP client
 * can use them too. This module adds the server-side conversions.
 */

pub use crate::shared::auth::{AuthResponse, LoginRequest, SignupRequest, UserResponse};

use crate::backend::auth::users::User;

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            avatar: user.avatar,
        }
    }
}
