//! Real-time client over `tokio-tungstenite`
//!
//! Connects to `/ws` with the bearer token in the query string, sends client
//! frames and yields decoded server events. `connect_with_retry` retries a
//! fixed number of times with a fixed delay and gives up with an error.

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::http::StatusCode;
use tokio_tungstenite::tungstenite::{Error as WsError, Message as WsMessage};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::client::connection::{ConnectionEvent, ConnectionState, ReconnectPolicy};
use crate::client::error::ClientError;
use crate::shared::event::{RoomRef, RoomTarget, TypingPayload};
use crate::shared::{AppConfig, ClientEvent, ClientFrame, ServerEvent};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

pub struct RealtimeClient {
    sink: SplitSink<WsStream, WsMessage>,
    stream: SplitStream<WsStream>,
    state: ConnectionState,
}

impl RealtimeClient {
    /// Open one connection
    ///
    /// A 401 from the handshake maps to `ClientError::Unauthorized`.
    pub async fn connect(config: &AppConfig, token: &str) -> Result<Self, ClientError> {
        let mut state = ConnectionState::Disconnected.transition(ConnectionEvent::Connect)?;
        let url = format!("{}?token={}", config.ws_url, token);

        let (socket, _response) = match connect_async(url).await {
            Ok(connected) => connected,
            Err(WsError::Http(response)) if response.status() == StatusCode::UNAUTHORIZED => {
                state.transition(ConnectionEvent::Rejected)?;
                return Err(ClientError::Unauthorized);
            }
            Err(e) => return Err(e.into()),
        };
        state = state.transition(ConnectionEvent::Accepted)?;
        tracing::info!("[Client] Connected to {}", config.ws_url);

        let (sink, stream) = socket.split();
        Ok(Self { sink, stream, state })
    }

    /// Connect, retrying transport failures per the configured policy
    pub async fn connect_with_retry(config: &AppConfig, token: &str) -> Result<Self, ClientError> {
        let policy = ReconnectPolicy::from_config(config);
        let mut attempt = 1;
        loop {
            match Self::connect(config, token).await {
                Ok(client) => return Ok(client),
                Err(e) if e.is_retryable() => match policy.delay_before(attempt) {
                    Some(delay) => {
                        tracing::warn!("[Client] Connection attempt {} failed: {}", attempt, e);
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                    }
                    None => {
                        tracing::error!("[Client] Giving up after {} attempts: {}", attempt, e);
                        return Err(ClientError::ReconnectExhausted { attempts: attempt });
                    }
                },
                Err(e) => return Err(e),
            }
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Send a raw frame
    pub async fn send(&mut self, frame: &ClientFrame) -> Result<(), ClientError> {
        let text = frame.encode()?;
        self.send_text(&text).await
    }

    /// Send pre-encoded frame text as-is
    pub async fn send_text(&mut self, text: &str) -> Result<(), ClientError> {
        if !self.state.is_open() {
            return Err(ClientError::Closed);
        }
        self.sink.send(WsMessage::Text(text.to_string().into())).await?;
        Ok(())
    }

    pub async fn join(&mut self, target: RoomTarget) -> Result<(), ClientError> {
        self.send(&ClientFrame::new(ClientEvent::JoinCommunity(Some(RoomRef::from(target))))).await?;
        self.state = self.state.transition(ConnectionEvent::Joined)?;
        Ok(())
    }

    pub async fn leave(&mut self, target: RoomTarget) -> Result<(), ClientError> {
        self.send(&ClientFrame::new(ClientEvent::LeaveCommunity(Some(RoomRef::from(target))))).await?;
        if self.state == ConnectionState::JoinedRoom {
            self.state = self.state.transition(ConnectionEvent::Left)?;
        }
        Ok(())
    }

    pub async fn typing(&mut self, target: RoomTarget, is_typing: bool) -> Result<(), ClientError> {
        let payload = TypingPayload {
            community_id: Some(target.community_id.to_string()),
            channel_id: target.channel_id.map(|id| id.to_string()),
            is_typing,
        };
        self.send(&ClientFrame::new(ClientEvent::Typing(payload))).await
    }

    pub async fn mark_read(&mut self, target: RoomTarget) -> Result<(), ClientError> {
        self.send(&ClientFrame::new(ClientEvent::MarkMessagesRead(Some(RoomRef::from(target))))).await
    }

    /// Next server event, skipping control frames
    ///
    /// Returns `Ok(None)` once the server closes the connection.
    pub async fn next_event(&mut self) -> Result<Option<ServerEvent>, ClientError> {
        loop {
            match self.stream.next().await {
                Some(Ok(WsMessage::Text(text))) => return Ok(Some(ServerEvent::decode(text.as_str())?)),
                Some(Ok(WsMessage::Close(_))) | None => {
                    self.state = self.state.transition(ConnectionEvent::Closed)?;
                    return Ok(None);
                }
                Some(Ok(_)) => continue,
                Some(Err(e)) => {
                    self.state = ConnectionState::Disconnected;
                    return Err(e.into());
                }
            }
        }
    }

    pub async fn close(mut self) -> Result<(), ClientError> {
        self.sink.send(WsMessage::Close(None)).await?;
        self.state = self.state.transition(ConnectionEvent::Closed)?;
        Ok(())
    }
}
