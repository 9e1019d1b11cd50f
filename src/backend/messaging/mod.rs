//! Messaging Module
//!
//! Persistence of community messages plus the HTTP read and delete paths.

pub mod db;
pub mod handlers;

pub use handlers::{delete_message, list_messages, search_messages};
