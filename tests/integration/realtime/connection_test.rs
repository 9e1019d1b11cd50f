//! Connection authentication and lifecycle

use assert_matches::assert_matches;

use wanderhub::backend::realtime::Room;
use wanderhub::client::{ClientError, ConnectionState, RealtimeClient};
use wanderhub::shared::event::{RoomTarget, SendMessagePayload};
use wanderhub::shared::{ClientEvent, ServerEvent};

use crate::common::{
    client_config, connect, create_test_community, create_test_user, expect_event, join_and_wait,
    round_trip, spawn_server, try_connect, wait_until, TestApp,
};

#[tokio::test]
async fn test_invalid_token_is_rejected() {
    let app = TestApp::new().await;
    let addr = spawn_server(&app).await;

    let result = try_connect(addr, "not-a-jwt").await;
    assert_matches!(result.err(), Some(ClientError::Unauthorized));

    let result = try_connect(addr, "").await;
    assert_matches!(result.err(), Some(ClientError::Unauthorized));
}

#[tokio::test]
async fn test_valid_token_connects() {
    let app = TestApp::new().await;
    let user = create_test_user(&app, "marta").await;
    let addr = spawn_server(&app).await;

    let client = connect(addr, &user.token).await;

    assert_eq!(client.state(), ConnectionState::Connected);
}

#[tokio::test]
async fn test_retry_gives_up_after_configured_attempts() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let result = RealtimeClient::connect_with_retry(&client_config(addr), "token").await;

    assert_matches!(result.err(), Some(ClientError::ReconnectExhausted { attempts: 2 }));
}

#[tokio::test]
async fn test_rooms_are_not_restored_after_reconnect() {
    let app = TestApp::new().await;
    let x = create_test_user(&app, "xavier").await;
    let y = create_test_user(&app, "yara").await;
    let community_id = create_test_community(&app, &x, &[&y]).await;
    let room = RoomTarget::community(community_id);
    let addr = spawn_server(&app).await;

    let mut x_client = connect(addr, &x.token).await;
    join_and_wait(&mut x_client, room, 1).await;
    assert!(app.state.presence.is_viewing(Room::Community(community_id), x.id));

    x_client.close().await.unwrap();
    wait_until(|| !app.state.presence.is_viewing(Room::Community(community_id), x.id)).await;

    let mut x_client = connect(addr, &x.token).await;
    let mut y_client = connect(addr, &y.token).await;
    let payload = SendMessagePayload {
        community_id: Some(community_id.to_string()),
        content: "are you there?".to_string(),
        ..Default::default()
    };
    round_trip(&mut y_client, ClientEvent::SendMessage(payload), 2).await;

    // Only the personal room is joined after reconnecting
    let (event, skipped) =
        expect_event(&mut x_client, |e| matches!(e, ServerEvent::UnreadLastMessageUpdate(_))).await;
    assert_matches!(event, ServerEvent::UnreadLastMessageUpdate(u) if u.unread_count == 1);
    assert!(skipped.iter().all(|e| !matches!(e, ServerEvent::NewMessage(_))));
}

#[tokio::test]
async fn test_leave_stops_delivery() {
    let app = TestApp::new().await;
    let x = create_test_user(&app, "xavier").await;
    let y = create_test_user(&app, "yara").await;
    let community_id = create_test_community(&app, &x, &[&y]).await;
    let room = RoomTarget::community(community_id);
    let addr = spawn_server(&app).await;

    let mut x_client = connect(addr, &x.token).await;
    join_and_wait(&mut x_client, room, 1).await;
    round_trip(
        &mut x_client,
        ClientEvent::LeaveCommunity(Some(wanderhub::shared::RoomRef::from(room))),
        2,
    )
    .await;
    assert!(!app.state.presence.is_viewing(Room::Community(community_id), x.id));

    crate::common::post_test_message(&app, &y, community_id, "hello?").await;

    let (event, skipped) =
        expect_event(&mut x_client, |e| matches!(e, ServerEvent::UnreadLastMessageUpdate(_))).await;
    assert_matches!(event, ServerEvent::UnreadLastMessageUpdate(_));
    assert!(skipped.iter().all(|e| !matches!(e, ServerEvent::NewMessage(_))));
}
