//! Unread counter and inbox API tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;

use wanderhub::backend::communities::db::create_community;

use crate::common::{create_test_community, create_test_user, post_test_message, TestApp};

#[tokio::test]
async fn test_messages_increment_other_members() {
    let app = TestApp::new().await;
    let owner = create_test_user(&app, "owner").await;
    let hiker = create_test_user(&app, "hiker").await;
    let community_id = create_test_community(&app, &owner, &[&hiker]).await;

    post_test_message(&app, &owner, community_id, "first").await;
    post_test_message(&app, &owner, community_id, "second").await;

    let (status, body) = app.get("/api/unread", &hiker.token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);
    assert_eq!(body["communities"][0]["communityId"], community_id.to_string());
    assert_eq!(body["communities"][0]["count"], 2);

    // The sender's own messages never count
    let (_, body) = app.get("/api/unread/total", &owner.token).await;
    assert_eq!(body["total"], 0);
}

#[tokio::test]
async fn test_mark_read_resets_count() {
    let app = TestApp::new().await;
    let owner = create_test_user(&app, "owner").await;
    let hiker = create_test_user(&app, "hiker").await;
    let community_id = create_test_community(&app, &owner, &[&hiker]).await;
    post_test_message(&app, &owner, community_id, "hello").await;

    let uri = format!("/api/communities/{community_id}/read");
    let (status, body) = app.post(&uri, &hiker.token, json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);

    let (_, body) = app.get("/api/unread/total", &hiker.token).await;
    assert_eq!(body["total"], 0);

    // Marking an already-read community is idempotent
    let (status, _) = app.post(&uri, &hiker.token, json!({})).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_mark_read_requires_membership() {
    let app = TestApp::new().await;
    let owner = create_test_user(&app, "owner").await;
    let outsider = create_test_user(&app, "outsider").await;
    let community_id = create_test_community(&app, &owner, &[]).await;

    let uri = format!("/api/communities/{community_id}/read");
    let (status, _) = app.post(&uri, &outsider.token, json!({})).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_inbox_orders_by_unread_then_activity() {
    let app = TestApp::new().await;
    let owner = create_test_user(&app, "owner").await;
    let hiker = create_test_user(&app, "hiker").await;

    let quiet = create_community(app.pool(), owner.id, "Quiet", None).await.unwrap();
    let busy = create_community(app.pool(), owner.id, "Busy", None).await.unwrap();
    let read = create_community(app.pool(), hiker.id, "Read", None).await.unwrap();
    for id in [quiet.id, busy.id] {
        wanderhub::backend::communities::db::add_member(app.pool(), id, hiker.id)
            .await
            .unwrap();
    }

    post_test_message(&app, &owner, busy.id, "one").await;
    post_test_message(&app, &owner, busy.id, "two").await;
    post_test_message(&app, &owner, quiet.id, "only").await;
    post_test_message(&app, &hiker, read.id, "my own note").await;

    let (status, body) = app.get("/api/inbox", &hiker.token).await;
    assert_eq!(status, StatusCode::OK);

    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Busy", "Quiet", "Read"]);
    assert_eq!(body[0]["unreadCount"], 2);
    assert_eq!(body[0]["messageCount"], 2);
    assert_eq!(body[0]["lastMessage"]["preview"], "two");
    assert_eq!(body[2]["unreadCount"], 0);
}
