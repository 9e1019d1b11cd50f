//! API integration tests
//!
//! Tests for HTTP API endpoints.

pub mod auth_test;
pub mod client_test;
pub mod communities_test;
pub mod messages_test;
pub mod unread_test;
