//! Common test utilities and helpers
//!
//! This module provides shared utilities for all tests including:
//! - In-memory database and router fixtures
//! - A live server for WebSocket tests
//! - Authentication test helpers
//! - Custom assertion macros

pub mod assertions;
#[cfg(feature = "ssr")]
pub mod auth_helpers;

// Re-export commonly used utilities
#[cfg(feature = "ssr")]
pub use auth_helpers::*;
#[cfg(feature = "ssr")]
pub use database::*;
#[cfg(feature = "ssr")]
pub use live_server::*;
