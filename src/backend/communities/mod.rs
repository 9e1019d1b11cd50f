//! Communities Module
//!
//! Communities own a message stream and a membership list. Only members may
//! read history or send messages.

pub mod db;
pub mod handlers;

pub use handlers::{create_community, join_community, list_communities, require_member};
