//! Integration tests
//!
//! Tests that exercise the router, the database and live WebSocket sessions
//! together.

pub mod api;
pub mod database;
pub mod realtime;
