//! Community Data Structure
//!
//! Represents a community that users join and chat in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A community that owns a message stream
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Community {
    /// Unique community ID
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// User who created the community
    pub creator_id: Uuid,
    /// When the community was created
    pub created_at: DateTime<Utc>,
}

/// Request to create a community
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommunityRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Response for listing the caller's communities
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListCommunitiesResponse {
    pub communities: Vec<Community>,
}

/// Response after joining a community
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinCommunityResponse {
    pub success: bool,
    pub community_id: Uuid,
}
