//! HTTP API client
//!
//! Thin `reqwest` wrapper over the JSON API. Non-success responses become
//! `ClientError::Api` carrying the server's `error` text.

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use uuid::Uuid;

use crate::client::error::ClientError;
use crate::shared::auth::{AuthResponse, LoginRequest, SignupRequest, UserResponse};
use crate::shared::messaging::{
    Community, CreateCommunityRequest, DeleteMessageResponse, JoinCommunityResponse,
    ListCommunitiesResponse, ListMessagesParams, ListMessagesResponse, MarkReadResponse,
    UnreadSummary, UnreadTotal,
};
use crate::shared::{AppConfig, InboxEntry, Message};

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            http: Client::new(),
            base_url: config.server_url.clone(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = self.authorized(request).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }
        if status == StatusCode::UNAUTHORIZED {
            return Err(ClientError::Unauthorized);
        }
        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => status.to_string(),
        };
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }

    /// Register and keep the returned token
    pub async fn signup(&mut self, request: &SignupRequest) -> Result<AuthResponse, ClientError> {
        let auth: AuthResponse = self.execute(self.http.post(self.url("/api/auth/signup")).json(request)).await?;
        self.token = Some(auth.token.clone());
        Ok(auth)
    }

    /// Log in and keep the returned token
    pub async fn login(&mut self, request: &LoginRequest) -> Result<AuthResponse, ClientError> {
        let auth: AuthResponse = self.execute(self.http.post(self.url("/api/auth/login")).json(request)).await?;
        self.token = Some(auth.token.clone());
        Ok(auth)
    }

    pub async fn me(&self) -> Result<UserResponse, ClientError> {
        self.execute(self.http.get(self.url("/api/auth/me"))).await
    }

    pub async fn create_community(&self, request: &CreateCommunityRequest) -> Result<Community, ClientError> {
        self.execute(self.http.post(self.url("/api/communities")).json(request)).await
    }

    pub async fn list_communities(&self) -> Result<Vec<Community>, ClientError> {
        let response: ListCommunitiesResponse = self.execute(self.http.get(self.url("/api/communities"))).await?;
        Ok(response.communities)
    }

    pub async fn join_community(&self, community_id: Uuid) -> Result<JoinCommunityResponse, ClientError> {
        self.execute(self.http.post(self.url(&format!("/api/communities/{community_id}/join"))))
            .await
    }

    /// History page, or the backfill after a cursor when `after_seq` is set
    pub async fn list_messages(
        &self,
        community_id: Uuid,
        params: &ListMessagesParams,
    ) -> Result<ListMessagesResponse, ClientError> {
        let request = self
            .http
            .get(self.url(&format!("/api/communities/{community_id}/messages")))
            .query(params);
        self.execute(request).await
    }

    pub async fn search_messages(&self, community_id: Uuid, query: &str) -> Result<Vec<Message>, ClientError> {
        let request = self
            .http
            .get(self.url(&format!("/api/communities/{community_id}/messages/search")))
            .query(&[("q", query)]);
        self.execute(request).await
    }

    pub async fn delete_message(&self, message_id: Uuid) -> Result<DeleteMessageResponse, ClientError> {
        self.execute(self.http.delete(self.url(&format!("/api/messages/{message_id}"))))
            .await
    }

    pub async fn unread(&self) -> Result<UnreadSummary, ClientError> {
        self.execute(self.http.get(self.url("/api/unread"))).await
    }

    pub async fn unread_total(&self) -> Result<u64, ClientError> {
        let total: UnreadTotal = self.execute(self.http.get(self.url("/api/unread/total"))).await?;
        Ok(total.total)
    }

    pub async fn inbox(&self) -> Result<Vec<InboxEntry>, ClientError> {
        self.execute(self.http.get(self.url("/api/inbox"))).await
    }

    pub async fn mark_read(&self, community_id: Uuid) -> Result<MarkReadResponse, ClientError> {
        self.execute(self.http.post(self.url(&format!("/api/communities/{community_id}/read"))))
            .await
    }
}
