//! Authentication test helpers
//!
//! Provides utilities for creating test users, generating tokens,
//! and creating communities they belong to.

use uuid::Uuid;

use wanderhub::backend::auth::sessions::create_token;
use wanderhub::backend::auth::users::create_user;
use wanderhub::backend::communities::db::{add_member, create_community};
use wanderhub::backend::middleware::AuthenticatedUser;
use wanderhub::backend::realtime::relay::relay_message;
use wanderhub::backend::realtime::SessionContext;
use wanderhub::shared::event::SendMessagePayload;
use wanderhub::shared::Message;

use super::database::TestApp;

/// Test user credentials
pub struct TestUser {
    pub id: Uuid,
    pub username: String,
    pub password: String,
    pub token: String,
}

/// Create a test user directly in the database
pub async fn create_test_user(app: &TestApp, username: &str) -> TestUser {
    let password = "password123";
    let password_hash = bcrypt::hash(password, app.state.config.bcrypt_cost)
        .expect("Failed to hash password");

    let user = create_user(
        app.pool(),
        username,
        &format!("{username}@example.com"),
        &password_hash,
        None,
    )
    .await
    .expect("Failed to create test user");

    let token = create_token(&app.state.config, user.id, &user.username)
        .expect("Failed to create test token");

    TestUser {
        id: user.id,
        username: user.username,
        password: password.to_string(),
        token,
    }
}

/// Create a community owned by `owner` with `members` added
pub async fn create_test_community(app: &TestApp, owner: &TestUser, members: &[&TestUser]) -> Uuid {
    let community = create_community(app.pool(), owner.id, "Alps Hikers", None)
        .await
        .expect("Failed to create community");
    for member in members {
        add_member(app.pool(), community.id, member.id)
            .await
            .expect("Failed to add member");
    }
    community.id
}

/// Create authorization header value
pub fn auth_header(token: &str) -> String {
    format!("Bearer {}", token)
}

/// Post a text message as `sender` through the relay, outside any socket
pub async fn post_test_message(app: &TestApp, sender: &TestUser, community_id: Uuid, content: &str) -> Message {
    let ctx = SessionContext::new(AuthenticatedUser {
        user_id: sender.id,
        username: sender.username.clone(),
        avatar: None,
    });
    let payload = SendMessagePayload {
        community_id: Some(community_id.to_string()),
        content: content.to_string(),
        ..Default::default()
    };
    relay_message(&app.state, &ctx, payload)
        .await
        .expect("Failed to relay test message")
}
