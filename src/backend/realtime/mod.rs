//! Real-time Messaging Module
//!
//! Everything behind the `/ws` endpoint: room subscriptions, the message
//! relay, typing indicators and viewer presence.
//!
//! # Module Structure
//!
//! ```text
//! realtime/
//! ├── mod.rs       - Module exports and documentation
//! ├── rooms.rs     - Per-room broadcast channels
//! ├── broadcast.rs - Publishing helper used by every broadcast
//! ├── presence.rs  - Which users are viewing which communities
//! ├── session.rs   - Per-connection identity and subscriptions
//! ├── typing.rs    - Typing flags with server-side expiry
//! ├── relay.rs     - Persist and fan out chat messages
//! ├── events.rs    - Client frame dispatch
//! └── socket.rs    - WebSocket upgrade and session loop
//! ```
//!
//! # Delivery
//!
//! Each room is a `tokio::sync::broadcast` channel. A session holds one
//! receiver per joined room in a `StreamMap`, plus its personal user room.
//! Delivery is at-most-once per connected session; a lagging session skips
//! events and the client recovers them through `after_seq` backfill.

pub mod broadcast;
pub mod events;
pub mod presence;
pub mod relay;
pub mod rooms;
pub mod session;
pub mod socket;
pub mod typing;

pub use broadcast::broadcast_event;
pub use rooms::{Envelope, Room, RoomRegistry};
pub use session::{SessionContext, SessionRooms};
pub use socket::ws_handler;
