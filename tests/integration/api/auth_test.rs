//! Authentication API integration tests
//!
//! Tests for the authentication endpoints including login, signup, and user info.

use axum::http::{Method, StatusCode};
use serde_json::json;

use crate::common::{create_test_user, TestApp};

#[tokio::test]
async fn test_signup_success() {
    let app = TestApp::new().await;

    let (status, body) = app
        .request(
            Method::POST,
            "/api/auth/signup",
            None,
            Some(json!({
                "username": "marta",
                "email": "marta@example.com",
                "password": "password123"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body.get("token").and_then(|t| t.as_str()).is_some());
    assert_eq!(body["user"]["username"], "marta");
    assert!(body["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_signup_duplicate_username() {
    let app = TestApp::new().await;
    create_test_user(&app, "marta").await;

    let (status, body) = app
        .request(
            Method::POST,
            "/api/auth/signup",
            None,
            Some(json!({
                "username": "marta",
                "email": "other@example.com",
                "password": "password123"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Username already taken");
}

#[tokio::test]
async fn test_signup_short_password() {
    let app = TestApp::new().await;

    let (status, _) = app
        .request(
            Method::POST,
            "/api/auth/signup",
            None,
            Some(json!({
                "username": "marta",
                "email": "marta@example.com",
                "password": "short"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_success() {
    let app = TestApp::new().await;
    let user = create_test_user(&app, "marta").await;

    let (status, body) = app
        .request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "username": "marta", "password": user.password })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.get("token").is_some());
    assert_eq!(body["user"]["id"], user.id.to_string());
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = TestApp::new().await;
    create_test_user(&app, "marta").await;

    let (status, _) = app
        .request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "username": "marta", "password": "wrong-password" })),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_requires_token() {
    let app = TestApp::new().await;

    let (status, _) = app.request(Method::GET, "/api/auth/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.get("/api/auth/me", "not-a-jwt").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_returns_current_user() {
    let app = TestApp::new().await;
    let user = create_test_user(&app, "marta").await;

    let (status, body) = app.get("/api/auth/me", &user.token).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "marta");
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let app = TestApp::new().await;

    let (status, body) = app.request(Method::GET, "/api/nowhere", None, None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.get("error").is_some());
}
