//! Typing indicators over live WebSocket sessions

use std::time::Duration;

use assert_matches::assert_matches;

use wanderhub::backend::server::{spawn_background_tasks, ServerConfig};
use wanderhub::shared::event::RoomTarget;
use wanderhub::shared::ServerEvent;

use crate::common::{
    connect, create_test_community, create_test_user, drain_for, expect_event, join_and_wait,
    spawn_server, TestApp,
};

#[tokio::test]
async fn test_typing_reaches_others_only() {
    let app = TestApp::new().await;
    let x = create_test_user(&app, "xavier").await;
    let y = create_test_user(&app, "yara").await;
    let community_id = create_test_community(&app, &x, &[&y]).await;
    let room = RoomTarget::community(community_id);
    let addr = spawn_server(&app).await;

    let mut x_client = connect(addr, &x.token).await;
    let mut y_client = connect(addr, &y.token).await;
    join_and_wait(&mut x_client, room, 1).await;
    join_and_wait(&mut y_client, room, 1).await;

    y_client.typing(room, true).await.unwrap();

    let (event, _) = expect_event(&mut x_client, |e| matches!(e, ServerEvent::UserTyping(_))).await;
    let notice = assert_matches!(event, ServerEvent::UserTyping(n) => n);
    assert_eq!(notice.user_id, y.id);
    assert_eq!(notice.username, "yara");
    assert!(notice.is_typing);

    let own = drain_for(&mut y_client, Duration::from_millis(300)).await;
    assert!(own.iter().all(|e| !matches!(e, ServerEvent::UserTyping(_))));

    y_client.typing(room, false).await.unwrap();
    let (event, _) = expect_event(&mut x_client, |e| matches!(e, ServerEvent::UserTyping(_))).await;
    assert_matches!(event, ServerEvent::UserTyping(n) if !n.is_typing);
}

#[tokio::test]
async fn test_typing_expires_without_stop() {
    let config = ServerConfig {
        typing_ttl_secs: 1,
        ..ServerConfig::for_tests()
    };
    let app = TestApp::with_config(config).await;
    spawn_background_tasks(&app.state);

    let x = create_test_user(&app, "xavier").await;
    let y = create_test_user(&app, "yara").await;
    let community_id = create_test_community(&app, &x, &[&y]).await;
    let room = RoomTarget::community(community_id);
    let addr = spawn_server(&app).await;

    let mut x_client = connect(addr, &x.token).await;
    let mut y_client = connect(addr, &y.token).await;
    join_and_wait(&mut x_client, room, 1).await;
    join_and_wait(&mut y_client, room, 1).await;

    y_client.typing(room, true).await.unwrap();
    expect_event(&mut x_client, |e| matches!(e, ServerEvent::UserTyping(n) if n.is_typing)).await;

    let (event, _) = expect_event(&mut x_client, |e| matches!(e, ServerEvent::UserTyping(_))).await;
    assert_matches!(event, ServerEvent::UserTyping(n) if !n.is_typing && n.user_id == y.id);
}

#[tokio::test]
async fn test_disconnect_clears_typing() {
    let app = TestApp::new().await;
    let x = create_test_user(&app, "xavier").await;
    let y = create_test_user(&app, "yara").await;
    let community_id = create_test_community(&app, &x, &[&y]).await;
    let room = RoomTarget::community(community_id);
    let addr = spawn_server(&app).await;

    let mut x_client = connect(addr, &x.token).await;
    let mut y_client = connect(addr, &y.token).await;
    join_and_wait(&mut x_client, room, 1).await;
    join_and_wait(&mut y_client, room, 1).await;

    y_client.typing(room, true).await.unwrap();
    expect_event(&mut x_client, |e| matches!(e, ServerEvent::UserTyping(n) if n.is_typing)).await;

    y_client.close().await.unwrap();

    let (event, _) = expect_event(&mut x_client, |e| matches!(e, ServerEvent::UserTyping(_))).await;
    assert_matches!(event, ServerEvent::UserTyping(n) if !n.is_typing && n.user_id == y.id);
}

#[tokio::test]
async fn test_typing_without_join_is_not_broadcast() {
    let app = TestApp::new().await;
    let x = create_test_user(&app, "xavier").await;
    let y = create_test_user(&app, "yara").await;
    let community_id = create_test_community(&app, &x, &[&y]).await;
    let room = RoomTarget::community(community_id);
    let addr = spawn_server(&app).await;

    let mut x_client = connect(addr, &x.token).await;
    let mut y_client = connect(addr, &y.token).await;
    join_and_wait(&mut x_client, room, 1).await;

    y_client.typing(room, true).await.unwrap();
    let (event, _) = expect_event(&mut y_client, |e| matches!(e, ServerEvent::Error(_))).await;
    assert_matches!(event, ServerEvent::Error(n) if n.message.contains("Join the room"));

    let seen = drain_for(&mut x_client, Duration::from_millis(300)).await;
    assert!(seen.iter().all(|e| !matches!(e, ServerEvent::UserTyping(_))));
    assert!(!app.state.typing.is_typing(y.id, wanderhub::backend::realtime::Room::Community(community_id)));
}
