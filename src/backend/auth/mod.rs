//! Authentication Module
//!
//! This module handles user registration, login and bearer token management.
//! The token verification here is the single entry point used both by the
//! HTTP auth middleware and by the WebSocket connection authenticator.
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs          - Module exports and documentation
//! ├── users.rs        - User model and database operations
//! ├── sessions.rs     - JWT token management
//! └── handlers/       - HTTP handlers (signup, login, me)
//! ```
//!
//! # Security
//!
//! - Passwords are hashed using bcrypt before storage
//! - JWT tokens (HS256) are used for stateless authentication
//! - Token lifetime comes from `ServerConfig::token_ttl_hours`
//! - Invalid credentials return 401 (no information leakage)

pub mod handlers;
pub mod sessions;
pub mod users;

pub use handlers::{get_me, login, signup};
