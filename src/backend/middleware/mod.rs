//! Middleware Module
//!
//! This module contains all HTTP middleware for the backend server.
//!
//! - **`auth`** - Bearer token authentication for protected routes, and the
//!   shared token check used by the WebSocket handshake

pub mod auth;

pub use auth::{auth_middleware, authenticate_token, token_from_headers, AuthUser, AuthenticatedUser};
