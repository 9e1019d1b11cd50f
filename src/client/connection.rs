//! Connection lifecycle and reconnect policy
//!
//! ```text
//! Disconnected -> Authenticating -> Connected -> (JoinedRoom <-> LeftRoom) -> Disconnected
//! ```
//!
//! Room memberships do not survive a reconnect; after `Connected` the caller
//! re-joins the rooms the store remembers.

use std::time::Duration;

use crate::client::error::ClientError;
use crate::shared::AppConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Authenticating,
    Connected,
    JoinedRoom,
    LeftRoom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionEvent {
    /// Handshake sent with a token
    Connect,
    /// Server accepted the handshake
    Accepted,
    /// Server rejected the handshake
    Rejected,
    Joined,
    Left,
    /// Socket closed by either side
    Closed,
}

impl ConnectionState {
    /// Next state, or an error when the event is not valid here
    pub fn transition(self, event: ConnectionEvent) -> Result<Self, ClientError> {
        use ConnectionEvent as E;
        use ConnectionState as S;

        let next = match (self, event) {
            (S::Disconnected, E::Connect) => S::Authenticating,
            (S::Authenticating, E::Accepted) => S::Connected,
            (S::Authenticating, E::Rejected) => S::Disconnected,
            (S::Connected | S::JoinedRoom | S::LeftRoom, E::Joined) => S::JoinedRoom,
            (S::JoinedRoom, E::Left) => S::LeftRoom,
            (_, E::Closed) => S::Disconnected,
            (state, event) => {
                return Err(ClientError::InvalidState(format!("{event:?} while {state:?}")));
            }
        };
        Ok(next)
    }

    pub fn is_open(self) -> bool {
        matches!(self, Self::Connected | Self::JoinedRoom | Self::LeftRoom)
    }
}

/// Fixed-delay retry with a small attempt cap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl ReconnectPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self { max_attempts, delay }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.reconnect_attempts, config.reconnect_delay)
    }

    /// Delay before the given retry (1-based), or `None` when attempts are used up
    pub fn delay_before(&self, attempt: u32) -> Option<Duration> {
        (attempt >= 1 && attempt < self.max_attempts).then_some(self.delay)
    }
}
