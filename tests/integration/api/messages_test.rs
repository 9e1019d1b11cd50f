//! Message history, search and deletion API tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use uuid::Uuid;

use crate::common::{create_test_community, create_test_user, post_test_message, TestApp};

fn seqs(body: &serde_json::Value) -> Vec<u64> {
    body["messages"]
        .as_array()
        .map(|messages| messages.iter().filter_map(|m| m["seq"].as_u64()).collect())
        .unwrap_or_default()
}

#[tokio::test]
async fn test_history_is_ascending_and_paginated() {
    let app = TestApp::new().await;
    let owner = create_test_user(&app, "owner").await;
    let community_id = create_test_community(&app, &owner, &[]).await;
    for i in 1..=5 {
        post_test_message(&app, &owner, community_id, &format!("message {i}")).await;
    }

    let uri = format!("/api/communities/{community_id}/messages?limit=3");
    let (status, body) = app.get(&uri, &owner.token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(seqs(&body), vec![3, 4, 5]);
    assert_eq!(body["hasMore"], true);

    let uri = format!("/api/communities/{community_id}/messages?limit=3&before_seq=3");
    let (_, body) = app.get(&uri, &owner.token).await;
    assert_eq!(seqs(&body), vec![1, 2]);
    assert_eq!(body["hasMore"], false);
}

#[tokio::test]
async fn test_backfill_after_cursor() {
    let app = TestApp::new().await;
    let owner = create_test_user(&app, "owner").await;
    let community_id = create_test_community(&app, &owner, &[]).await;
    for i in 1..=4 {
        post_test_message(&app, &owner, community_id, &format!("message {i}")).await;
    }

    let uri = format!("/api/communities/{community_id}/messages?after_seq=2");
    let (status, body) = app.get(&uri, &owner.token).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(seqs(&body), vec![3, 4]);
}

#[tokio::test]
async fn test_history_requires_membership() {
    let app = TestApp::new().await;
    let owner = create_test_user(&app, "owner").await;
    let outsider = create_test_user(&app, "outsider").await;
    let community_id = create_test_community(&app, &owner, &[]).await;

    let uri = format!("/api/communities/{community_id}/messages");
    let (status, _) = app.get(&uri, &outsider.token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let uri = format!("/api/communities/{}/messages", Uuid::new_v4());
    let (status, _) = app.get(&uri, &owner.token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_search_matches_literally() {
    let app = TestApp::new().await;
    let owner = create_test_user(&app, "owner").await;
    let community_id = create_test_community(&app, &owner, &[]).await;
    post_test_message(&app, &owner, community_id, "Summit at 100% effort").await;
    post_test_message(&app, &owner, community_id, "Lunch at the hut").await;

    let uri = format!("/api/communities/{community_id}/messages/search?q=100%25");
    let (status, body) = app.get(&uri, &owner.token).await;
    assert_eq!(status, StatusCode::OK);
    let results = body.as_array().cloned().unwrap_or_default();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["content"], "Summit at 100% effort");

    let uri = format!("/api/communities/{community_id}/messages/search?q=%20");
    let (status, _) = app.get(&uri, &owner.token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_only_own_message() {
    let app = TestApp::new().await;
    let owner = create_test_user(&app, "owner").await;
    let hiker = create_test_user(&app, "hiker").await;
    let community_id = create_test_community(&app, &owner, &[&hiker]).await;
    let message = post_test_message(&app, &owner, community_id, "hello").await;

    let uri = format!("/api/messages/{}", message.id);
    let (status, _) = app.delete(&uri, &hiker.token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.delete(&uri, &owner.token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["messageId"], message.id.to_string());

    let (status, _) = app.delete(&uri, &owner.token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
