//! Community API integration tests

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use crate::common::{create_test_community, create_test_user, TestApp};

#[tokio::test]
async fn test_create_community_makes_creator_member() {
    let app = TestApp::new().await;
    let owner = create_test_user(&app, "owner").await;

    let (status, body) = app
        .post("/api/communities", &owner.token, json!({ "name": "  Dolomites  " }))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "Dolomites");
    assert_eq!(body["creatorId"], owner.id.to_string());

    let (status, body) = app.get("/api/communities", &owner.token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["communities"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_create_community_rejects_blank_name() {
    let app = TestApp::new().await;
    let owner = create_test_user(&app, "owner").await;

    let (status, _) = app
        .post("/api/communities", &owner.token, json!({ "name": "   " }))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_join_community() {
    let app = TestApp::new().await;
    let owner = create_test_user(&app, "owner").await;
    let hiker = create_test_user(&app, "hiker").await;
    let community_id = create_test_community(&app, &owner, &[]).await;

    let uri = format!("/api/communities/{community_id}/join");
    let (status, body) = app.post(&uri, &hiker.token, json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    // Joining twice is fine
    let (status, _) = app.post(&uri, &hiker.token, json!({})).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app.get("/api/communities", &hiker.token).await;
    assert_eq!(body["communities"][0]["id"], community_id.to_string());
}

#[tokio::test]
async fn test_join_unknown_community() {
    let app = TestApp::new().await;
    let hiker = create_test_user(&app, "hiker").await;

    let uri = format!("/api/communities/{}/join", Uuid::new_v4());
    let (status, _) = app.post(&uri, &hiker.token, json!({})).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_communities_require_auth() {
    let app = TestApp::new().await;

    let (status, _) = app.get("/api/communities", "garbage").await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
