pub mod error;
pub mod types;

pub use error::{LinkedInError, Result};
pub use types::{
    CommentItem, ExperienceItem, InvitationItem, PostItem, ProfileResponse, ReactionItem,
    SenderProfile, ViewerItem,
};

use serde::de::DeserializeOwned;
use serde::Serialize;
use types::{InvitationAction, ListResponse, NewChatRequest, NewChatResponse, NewMessageRequest};

const BASE_URL: &str = "https://api.unipile.com/v1";

/// Client for a hosted LinkedIn account API (Unipile-style). Every call is
/// scoped to one connected account via `account_id`.
pub struct LinkedInClient {
    client: reqwest::Client,
    api_key: String,
    account_id: String,
    base_url: String,
}

impl LinkedInClient {
    pub fn new(api_key: String, account_id: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            account_id,
            base_url: BASE_URL.to_string(),
        }
    }

    /// Point the client at a different host (test servers).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    /// Fetch all pending inbound invitations.
    pub async fn received_invitations(&self) -> Result<Vec<InvitationItem>> {
        let url = format!(
            "{}/users/invitations?account_id={}",
            self.base_url, self.account_id
        );
        let resp: ListResponse<InvitationItem> = self.get_json(&url).await?;
        tracing::info!(count = resp.items.len(), "Fetched received invitations");
        Ok(resp.items)
    }

    /// Accept a pending invitation.
    pub async fn accept_invitation(&self, invitation_id: &str) -> Result<()> {
        self.invitation_action(invitation_id, "accept").await
    }

    /// Decline a pending invitation.
    pub async fn decline_invitation(&self, invitation_id: &str) -> Result<()> {
        self.invitation_action(invitation_id, "decline").await
    }

    async fn invitation_action(&self, invitation_id: &str, action: &str) -> Result<()> {
        let url = format!(
            "{}/users/invitations/{}?account_id={}",
            self.base_url, invitation_id, self.account_id
        );
        let body = InvitationAction {
            action: action.to_string(),
        };
        self.post_no_content(&url, &body).await?;
        tracing::info!(invitation_id, action, "Invitation action sent");
        Ok(())
    }

    /// Fetch a member's recent posts, newest first.
    pub async fn recent_posts(&self, identifier: &str, limit: u32) -> Result<Vec<PostItem>> {
        let url = format!(
            "{}/users/{}/posts?account_id={}&limit={}",
            self.base_url, identifier, self.account_id, limit
        );
        let resp: ListResponse<PostItem> = self.get_json(&url).await?;
        tracing::info!(identifier, count = resp.items.len(), "Fetched recent posts");
        Ok(resp.items)
    }

    /// Fetch reactions on a post.
    pub async fn reactions(&self, post_id: &str) -> Result<Vec<ReactionItem>> {
        let url = format!(
            "{}/posts/{}/reactions?account_id={}",
            self.base_url, post_id, self.account_id
        );
        let resp: ListResponse<ReactionItem> = self.get_json(&url).await?;
        tracing::info!(post_id, count = resp.items.len(), "Fetched post reactions");
        Ok(resp.items)
    }

    /// Fetch comments on a post.
    pub async fn comments(&self, post_id: &str) -> Result<Vec<CommentItem>> {
        let url = format!(
            "{}/posts/{}/comments?account_id={}",
            self.base_url, post_id, self.account_id
        );
        let resp: ListResponse<CommentItem> = self.get_json(&url).await?;
        tracing::info!(post_id, count = resp.items.len(), "Fetched post comments");
        Ok(resp.items)
    }

    /// Fetch recent profile viewers. This endpoint is not officially
    /// supported by the provider and rejects calls unpredictably; callers
    /// must treat failures as routine.
    pub async fn profile_viewers(&self) -> Result<Vec<ViewerItem>> {
        let url = format!(
            "{}/users/profile_views?account_id={}",
            self.base_url, self.account_id
        );
        let resp: ListResponse<ViewerItem> = self.get_json(&url).await?;
        tracing::info!(count = resp.items.len(), "Fetched profile viewers");
        Ok(resp.items)
    }

    /// Fetch a full profile, including experience entries.
    pub async fn full_profile(&self, identifier: &str) -> Result<ProfileResponse> {
        let url = format!(
            "{}/users/{}?account_id={}&sections=experience",
            self.base_url, identifier, self.account_id
        );
        let profile: ProfileResponse = self.get_json(&url).await?;
        tracing::info!(identifier, "Fetched full profile");
        Ok(profile)
    }

    /// Open a new conversation with a member. Returns the chat id.
    pub async fn start_conversation(&self, recipient_id: &str, text: &str) -> Result<String> {
        let url = format!("{}/chats", self.base_url);
        let body = NewChatRequest {
            account_id: self.account_id.clone(),
            attendee_id: recipient_id.to_string(),
            text: text.to_string(),
        };
        let resp: NewChatResponse = self.post_json(&url, &body).await?;
        tracing::info!(recipient_id, chat_id = %resp.chat_id, "Conversation opened");
        Ok(resp.chat_id)
    }

    /// Send a message into an existing conversation.
    pub async fn send_message(&self, conversation_id: &str, text: &str) -> Result<()> {
        let url = format!(
            "{}/chats/{}/messages?account_id={}",
            self.base_url, conversation_id, self.account_id
        );
        let body = NewMessageRequest {
            text: text.to_string(),
        };
        self.post_no_content(&url, &body).await?;
        tracing::info!(conversation_id, "Message sent");
        Ok(())
    }

    // --- Request plumbing ---

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let resp = self
            .client
            .get(url)
            .header("X-API-KEY", &self.api_key)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(LinkedInError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(resp.json().await?)
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(&self, url: &str, body: &B) -> Result<T> {
        let resp = self
            .client
            .post(url)
            .header("X-API-KEY", &self.api_key)
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(LinkedInError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(resp.json().await?)
    }

    async fn post_no_content<B: Serialize>(&self, url: &str, body: &B) -> Result<()> {
        let resp = self
            .client
            .post(url)
            .header("X-API-KEY", &self.api_key)
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(LinkedInError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(())
    }
}
