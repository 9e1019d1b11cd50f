//! Client Error Types
//!
//! Errors surfaced by the HTTP API client and the real-time client.

use thiserror::Error;

use crate::shared::{ConfigError, SharedError};

#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure talking to the HTTP API
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// WebSocket transport failure
    #[error("websocket error: {0}")]
    WebSocket(#[from] Box<tokio_tungstenite::tungstenite::Error>),

    /// The server rejected the credential
    #[error("unauthorized")]
    Unauthorized,

    /// Non-success HTTP response
    #[error("request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    /// Frame could not be encoded or decoded
    #[error(transparent)]
    Protocol(#[from] SharedError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Every reconnect attempt failed
    #[error("gave up after {attempts} connection attempts")]
    ReconnectExhausted { attempts: u32 },

    /// The connection is closed
    #[error("connection closed")]
    Closed,

    /// An operation is not valid in the current connection state
    #[error("invalid connection state: {0}")]
    InvalidState(String),
}

impl From<tokio_tungstenite::tungstenite::Error> for ClientError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        ClientError::WebSocket(Box::new(err))
    }
}

impl ClientError {
    /// Whether another connection attempt could succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, ClientError::WebSocket(_) | ClientError::Network(_) | ClientError::Closed)
    }
}
