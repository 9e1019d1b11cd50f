//! Property-based tests
//!
//! Invariants of the client store, the inbox ordering and the event codec.

pub mod event_proptest;
pub mod inbox_proptest;
pub mod store_proptest;
