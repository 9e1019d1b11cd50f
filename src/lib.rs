//! WanderHub Messaging - Main Library
//!
//! Real-time messaging for WanderHub travel communities: authenticated users
//! join community rooms over a WebSocket, send messages that are persisted
//! and fanned out to every session in the room, see typing indicators, and
//! keep per-community unread counters that feed a sorted inbox.
//!
//! # Module Structure
//!
//! - **`shared`** - Types shared between server and client
//!   - Wire events, messages, communities, unread entries
//!   - Error types and client configuration
//!
//! - **`backend`** - Server-side code (only compiled with `ssr` feature)
//!   - Axum HTTP and WebSocket server
//!   - SQLite persistence through sqlx
//!   - Room registry, message relay, typing flags
//!
//! - **`client`** - Rust client
//!   - HTTP API client and reconnecting WebSocket client
//!   - `ChatStore` for optimistic sends and inbox ordering
//!
//! # Feature Flags
//!
//! - **`ssr`** (default) - Enables the backend modules and the server binary
//!
//! # Usage
//!
//! ```rust,no_run
//! use wanderhub::backend::server::{create_app, ServerConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let app = create_app(ServerConfig::load()?).await?;
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! - `shared::SharedError` for validation and protocol failures
//! - `backend::BackendError` for HTTP handlers, rendered as JSON
//! - `client::ClientError` for the client side

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
#[cfg(feature = "ssr")]
pub mod backend;

/// Rust client for the messaging API
pub mod client;
