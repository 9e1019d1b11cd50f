//! Unread Module
//!
//! Per-user, per-community unread counters. Counts are incremented by the
//! message relay inside the insert transaction and reset by "mark read".

pub mod db;
pub mod handlers;
pub mod sync;

pub use handlers::{get_inbox, get_unread, get_unread_total, mark_read};
pub use sync::mark_read_and_notify;
