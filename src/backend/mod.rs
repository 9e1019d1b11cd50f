//! Backend Module
//!
//! This module contains all server-side code for WanderHub's real-time
//! messaging: an Axum HTTP and WebSocket server backed by SQLite.
//!
//! This module is only compiled when the `ssr` feature is enabled.
//!
//! # Architecture
//!
//! - **`server`** - Configuration, application state, initialization
//! - **`routes`** - HTTP route configuration and router assembly
//! - **`auth`** - Accounts, bcrypt hashes, JWT tokens
//! - **`middleware`** - Bearer token authentication
//! - **`communities`** - Communities and membership
//! - **`messaging`** - Message persistence, history and deletion
//! - **`unread`** - Unread counters and the inbox digest
//! - **`realtime`** - WebSocket sessions, rooms, relay and typing
//! - **`error`** - Backend error type and HTTP conversion
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── main.rs         - Server binary
//! ├── server/         - Server initialization and state
//! ├── routes/         - Route configuration
//! ├── auth/           - Authentication
//! ├── middleware/     - Request middleware
//! ├── communities/    - Communities and members
//! ├── messaging/      - Messages
//! ├── unread/         - Unread counters
//! ├── realtime/       - WebSocket relay
//! └── error/          - Error types
//! ```
//!
//! # Shared State
//!
//! The database is the only shared mutable resource. In-process state is
//! limited to the room registry, viewer presence and typing flags, each
//! behind a `std::sync::Mutex` that is never held across an `.await`.

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Real-time messaging over WebSocket
pub mod realtime;

/// Backend error types
pub mod error;

/// Authentication and user management
pub mod auth;

/// Middleware for request processing
pub mod middleware;

/// Communities and membership
pub mod communities;

/// Message persistence and HTTP paths
pub mod messaging;

/// Unread counters and inbox
pub mod unread;

/// Re-export commonly used types
pub use error::{BackendError, BackendResult};
pub use server::{create_app, AppState, ServerConfig};
