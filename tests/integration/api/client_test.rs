//! `ApiClient` against a live server

use assert_matches::assert_matches;
use uuid::Uuid;

use wanderhub::client::{ApiClient, ClientError};
use wanderhub::shared::auth::{LoginRequest, SignupRequest};
use wanderhub::shared::messaging::{CreateCommunityRequest, ListMessagesParams};

use crate::assert_ok;
use crate::common::{client_config, post_test_message, spawn_server, TestApp, TestUser};

#[tokio::test]
async fn test_client_signup_and_community_flow() {
    let app = TestApp::new().await;
    let addr = spawn_server(&app).await;
    let mut api = ApiClient::new(&client_config(addr));

    let auth = assert_ok!(
        api.signup(&SignupRequest {
            username: "marta".to_string(),
            email: "marta@example.com".to_string(),
            password: "password123".to_string(),
            avatar: None,
        })
        .await
    );
    assert_eq!(api.token(), Some(auth.token.as_str()));

    let me = assert_ok!(api.me().await);
    assert_eq!(me.id, auth.user.id);

    let community = assert_ok!(
        api.create_community(&CreateCommunityRequest {
            name: "Pyrenees".to_string(),
            description: Some("Weekend trips".to_string()),
        })
        .await
    );
    let communities = assert_ok!(api.list_communities().await);
    assert_eq!(communities.len(), 1);
    assert_eq!(communities[0].id, community.id);

    let sender = TestUser {
        id: me.id,
        username: me.username.clone(),
        password: String::new(),
        token: auth.token.clone(),
    };
    post_test_message(&app, &sender, community.id, "first").await;
    post_test_message(&app, &sender, community.id, "second").await;

    let page = assert_ok!(
        api.list_messages(community.id, &ListMessagesParams { after_seq: Some(1), ..Default::default() })
            .await
    );
    assert_eq!(page.messages.len(), 1);
    assert_eq!(page.messages[0].content, "second");

    let found = assert_ok!(api.search_messages(community.id, "fir").await);
    assert_eq!(found.len(), 1);

    let inbox = assert_ok!(api.inbox().await);
    assert_eq!(inbox[0].message_count, 2);
    assert_eq!(assert_ok!(api.unread_total().await), 0);
}

#[tokio::test]
async fn test_client_maps_errors() {
    let app = TestApp::new().await;
    let addr = spawn_server(&app).await;
    let mut api = ApiClient::new(&client_config(addr));

    let result = api
        .login(&LoginRequest {
            username: "nobody".to_string(),
            password: "password123".to_string(),
        })
        .await;
    assert_matches!(result, Err(ClientError::Unauthorized));

    let api = ApiClient::new(&client_config(addr)).with_token("bogus");
    assert_matches!(api.me().await, Err(ClientError::Unauthorized));

    let user = crate::common::create_test_user(&app, "marta").await;
    let api = ApiClient::new(&client_config(addr)).with_token(user.token);
    let result = api.join_community(Uuid::new_v4()).await;
    assert_matches!(result, Err(ClientError::Api { status: 404, .. }));
}
