use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Wrapper for list endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
}

// --- Invitations ---

/// An inbound connection request from the provider's inbox endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct InvitationItem {
    pub id: String,
    /// Optional note attached to the request.
    pub message: Option<String>,
    pub sender: SenderProfile,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SenderProfile {
    pub name: String,
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub location: String,
    /// ISO country code when the provider resolved one ("US").
    pub locale: Option<String>,
    #[serde(rename = "providerId")]
    pub provider_id: String,
    #[serde(rename = "profileUrl")]
    pub profile_url: String,
}

/// Body for the invitation action endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct InvitationAction {
    pub action: String,
}

// --- Posts & engagement ---

#[derive(Debug, Clone, Deserialize)]
pub struct PostItem {
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// One reaction row. `network_distance` uses the provider's
/// "FIRST_DEGREE" / "SECOND_DEGREE" / "THIRD_DEGREE" / "OUT_OF_NETWORK"
/// vocabulary and is frequently absent.
#[derive(Debug, Clone, Deserialize)]
pub struct ReactionItem {
    #[serde(rename = "profileUrl")]
    pub profile_url: String,
    #[serde(rename = "providerId")]
    pub provider_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub headline: String,
    #[serde(rename = "networkDistance")]
    pub network_distance: Option<String>,
    #[serde(rename = "reactionType")]
    pub reaction_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentItem {
    #[serde(rename = "profileUrl")]
    pub profile_url: String,
    #[serde(rename = "providerId")]
    pub provider_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub headline: String,
    #[serde(rename = "networkDistance")]
    pub network_distance: Option<String>,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ViewerItem {
    #[serde(rename = "profileUrl")]
    pub profile_url: String,
    #[serde(rename = "providerId")]
    pub provider_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub headline: String,
    #[serde(rename = "networkDistance")]
    pub network_distance: Option<String>,
}

// --- Profiles ---

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileResponse {
    #[serde(rename = "providerId")]
    pub provider_id: String,
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub location: String,
    pub locale: Option<String>,
    #[serde(default)]
    pub experience: Vec<ExperienceItem>,
    #[serde(rename = "connectionsCount")]
    pub connections_count: Option<u32>,
    #[serde(rename = "followerCount")]
    pub follower_count: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExperienceItem {
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

// --- Messaging ---

#[derive(Debug, Clone, Serialize)]
pub struct NewChatRequest {
    #[serde(rename = "accountId")]
    pub account_id: String,
    #[serde(rename = "attendeeId")]
    pub attendee_id: String,
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewChatResponse {
    #[serde(rename = "chatId")]
    pub chat_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewMessageRequest {
    pub text: String,
}
