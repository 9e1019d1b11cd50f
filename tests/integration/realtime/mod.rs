//! Real-time integration tests
//!
//! Each test serves the router on an ephemeral port and talks to it with
//! `RealtimeClient`.

pub mod connection_test;
pub mod typing_test;
