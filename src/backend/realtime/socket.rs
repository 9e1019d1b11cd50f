/**
 * WebSocket Endpoint
 *
 * `GET /ws` authenticates the handshake, upgrades, and then runs one task per
 * connection. The task drives a `select!` over inbound frames and the
 * session's room streams, so every event for this connection is written from
 * one place and per-connection order is preserved.
 *
 * # Authentication
 *
 * The bearer token comes from the `token` query parameter or the
 * `Authorization` header. Missing or invalid tokens are rejected with 401
 * before the upgrade is attempted.
 */

use std::sync::Arc;

use axum::extract::ws::{rejection::WebSocketUpgradeRejection, Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;

use crate::backend::error::BackendError;
use crate::backend::middleware::{authenticate_token, token_from_headers};
use crate::backend::realtime::broadcast::broadcast_event;
use crate::backend::realtime::events::{dispatch, reply};
use crate::backend::realtime::rooms::Room;
use crate::backend::realtime::session::{SessionContext, SessionRooms};
use crate::backend::server::state::AppState;
use crate::shared::{ClientFrame, ServerEvent};

#[derive(Debug, Default, Deserialize)]
pub struct WsAuthQuery {
    pub token: Option<String>,
}

/// Handle a WebSocket upgrade request (GET /ws)
pub async fn ws_handler(
    State(state): State<AppState>,
    Query(query): Query<WsAuthQuery>,
    headers: HeaderMap,
    upgrade: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Result<Response, BackendError> {
    let token = query
        .token
        .as_deref()
        .filter(|t| !t.is_empty())
        .or_else(|| token_from_headers(&headers))
        .ok_or_else(|| {
            tracing::warn!("[Realtime] Connection attempt without a token");
            BackendError::Unauthorized
        })?;

    let user = authenticate_token(&state, token).await.map_err(|e| {
        tracing::warn!("[Realtime] Rejected connection: {}", e);
        e
    })?;

    let upgrade = match upgrade {
        Ok(upgrade) => upgrade,
        Err(rejection) => return Ok(rejection.into_response()),
    };

    let ctx = Arc::new(SessionContext::new(user));
    tracing::info!("[Realtime] {} connected (session {})", ctx.username, ctx.session_id);

    Ok(upgrade.on_upgrade(move |socket| run_session(socket, state, ctx)))
}

type Sender = SplitSink<WebSocket, Message>;

async fn send_event(sender: &mut Sender, event: &ServerEvent) -> Result<(), axum::Error> {
    match event.encode() {
        Ok(text) => sender.send(Message::Text(text.into())).await,
        Err(e) => {
            tracing::error!("[Realtime] Failed to encode {}: {}", event.name(), e);
            Ok(())
        }
    }
}

/// Drive one connection until either side closes it
pub async fn run_session(socket: WebSocket, state: AppState, ctx: Arc<SessionContext>) {
    let (mut sender, mut receiver) = socket.split();
    let mut rooms = SessionRooms::new(ctx.clone(), state.rooms.clone(), state.presence.clone());
    rooms.join(Room::User(ctx.user_id));

    'session: loop {
        tokio::select! {
            inbound = receiver.next() => {
                let text = match inbound {
                    Some(Ok(Message::Text(text))) => text,
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => {
                        tracing::debug!("[Realtime] Socket error for {}: {}", ctx.username, e);
                        break;
                    }
                };

                let replies = match ClientFrame::decode(text.as_str()) {
                    Ok(frame) => dispatch(&state, &ctx, &mut rooms, frame).await,
                    Err(e) => {
                        tracing::debug!("[Realtime] Bad frame from {}: {}", ctx.username, e);
                        reply(e.ack, Err(e.error.user_message())).into_iter().collect()
                    }
                };
                for reply in &replies {
                    if send_event(&mut sender, reply).await.is_err() {
                        break 'session;
                    }
                }
            }
            Some((room, item)) = rooms.next() => {
                match item {
                    Ok(envelope) => {
                        if envelope.origin == Some(ctx.session_id) {
                            continue;
                        }
                        if envelope.mirror_of.is_some_and(|channel| rooms.contains(channel)) {
                            continue;
                        }
                        if send_event(&mut sender, &envelope.event).await.is_err() {
                            break;
                        }
                    }
                    Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                        tracing::warn!("[Realtime] {} lagged {} events in {:?}", ctx.username, skipped, room);
                    }
                }
            }
        }
    }

    drop(rooms);
    for flag in state.typing.clear_session(ctx.session_id) {
        if let Some(event) = flag.stop_event() {
            broadcast_event(&state.rooms, flag.room, None, event);
        }
    }
    tracing::info!("[Realtime] {} disconnected (session {})", ctx.username, ctx.session_id);
}
