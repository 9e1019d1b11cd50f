//! Client Module
//!
//! Rust client for the messaging server: an HTTP API client, a WebSocket
//! client with fixed-delay reconnects, and the pure `ChatStore` that merges
//! optimistic sends with confirmed server state.
//!
//! # Module Structure
//!
//! ```text
//! client/
//! ├── mod.rs         - Module exports and documentation
//! ├── error.rs       - ClientError
//! ├── api.rs         - reqwest HTTP client
//! ├── connection.rs  - Connection states and reconnect policy
//! ├── socket.rs      - tokio-tungstenite real-time client
//! └── store.rs       - ChatStore reconciliation and inbox
//! ```

pub mod api;
pub mod connection;
pub mod error;
pub mod socket;
pub mod store;

pub use api::ApiClient;
pub use connection::{ConnectionEvent, ConnectionState, ReconnectPolicy};
pub use error::ClientError;
pub use socket::RealtimeClient;
pub use store::{ApplyKind, ApplyOutcome, ChatEntry, ChatStore, EntryId, PendingSend, SeqGap};
