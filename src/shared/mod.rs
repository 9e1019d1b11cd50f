//! Shared Module
//!
//! This module contains types and data structures that are shared between
//! the server and the client store. These types are used for serialization
//! over the REST API and the `/ws` real-time channel.
//!
//! # Overview
//!
//! The shared module provides platform-agnostic types that can be used
//! in both server and client code. All types are designed for serialization
//! and transmission over HTTP and WebSocket frames.

/// Real-time event protocol
pub mod event;

/// Auth request and response bodies
pub mod auth;

/// Shared error types
pub mod error;

/// Client configuration
pub mod config;

/// Messaging, community and unread types
pub mod messaging;

/// Re-export commonly used types for convenience
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
pub use error::SharedError;
pub use event::{ClientEvent, ClientFrame, RoomRef, RoomTarget, ServerEvent};
pub use messaging::{InboxEntry, Message, MessageSummary, UnreadEntry};
