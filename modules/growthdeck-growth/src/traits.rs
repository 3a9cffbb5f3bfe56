// Trait abstractions for pipeline dependencies.
//
// SocialGraph puts every provider call behind one trait; the three store
// traits cover the lead table, the conversation-thread table, and the
// processed-invitation log. These enable deterministic testing with the
// mocks in `testing.rs`: no network, no database.

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use growthdeck_common::types::{
    Engager, ExperienceEntry, FullProfile, Invitation, InvitationSender, Lead, NetworkDistance,
    NewInvitationRecord, NewLead, OwnPost, PostComment, ProcessedInvitation, Thread,
};
use growthdeck_common::GrowthdeckError;
use linkedin_client::{LinkedInClient, LinkedInError};

// ---------------------------------------------------------------------------
// SocialGraph — every provider call the pipelines make
// ---------------------------------------------------------------------------

#[async_trait]
pub trait SocialGraph: Send + Sync {
    /// Fetch pending inbound connection requests, oldest first.
    async fn received_invitations(&self) -> Result<Vec<Invitation>>;

    /// Accept a pending invitation.
    async fn accept_invitation(&self, invitation_id: &str) -> Result<()>;

    /// Decline a pending invitation.
    async fn decline_invitation(&self, invitation_id: &str) -> Result<()>;

    /// Fetch a member's recent posts, newest first.
    async fn recent_posts(&self, identifier: &str, limit: u32) -> Result<Vec<OwnPost>>;

    /// Fetch reactions on a post.
    async fn reactions(&self, post_id: &str) -> Result<Vec<Engager>>;

    /// Fetch comments on a post.
    async fn comments(&self, post_id: &str) -> Result<Vec<PostComment>>;

    /// Fetch recent profile viewers. Unofficial endpoint — fails routinely.
    async fn profile_viewers(&self) -> Result<Vec<Engager>>;

    /// Fetch a full profile. This is the expensive, budget-governed call.
    async fn full_profile(&self, identifier: &str) -> Result<FullProfile>;

    /// Open a new conversation. Returns the platform conversation id.
    async fn start_conversation(&self, recipient_id: &str, text: &str) -> Result<String>;

    /// Send a message into an existing conversation.
    async fn send_message(&self, conversation_id: &str, text: &str) -> Result<()>;
}

// ---------------------------------------------------------------------------
// Stores
// ---------------------------------------------------------------------------

#[async_trait]
pub trait LeadStore: Send + Sync {
    /// Persist a new lead. The store assigns id and created_at.
    async fn create_lead(&self, lead: NewLead) -> Result<Lead>;

    /// Look up a lead by its LinkedIn profile URL (the dedup key).
    async fn find_by_profile_url(&self, url: &str) -> Result<Option<Lead>>;
}

#[async_trait]
pub trait ThreadStore: Send + Sync {
    /// Create or replace a thread record keyed by its conversation id.
    async fn upsert_thread(&self, thread: &Thread) -> Result<()>;

    /// Look up a thread by participant profile URL.
    async fn find_by_profile_url(&self, url: &str) -> Result<Option<Thread>>;
}

#[async_trait]
pub trait InvitationLog: Send + Sync {
    /// All external invitation ids that already have a decision record.
    async fn list_processed_external_ids(&self) -> Result<Vec<String>>;

    /// Write a decision record. Exactly one per external invitation id.
    async fn record(&self, record: NewInvitationRecord) -> Result<ProcessedInvitation>;

    /// Attach the welcome-sequence outcome to an existing record. The only
    /// mutation a record ever receives.
    async fn attach_thread(
        &self,
        invitation_id: Uuid,
        thread_id: &str,
        messages_sent: u32,
    ) -> Result<()>;
}

// ---------------------------------------------------------------------------
// SocialGraph for the hosted LinkedIn API client
// ---------------------------------------------------------------------------

fn api_error(err: LinkedInError) -> GrowthdeckError {
    GrowthdeckError::Api(err.to_string())
}

fn parse_distance(raw: Option<&str>) -> Option<NetworkDistance> {
    match raw {
        Some("FIRST_DEGREE") => Some(NetworkDistance::First),
        Some("SECOND_DEGREE") => Some(NetworkDistance::Second),
        Some("THIRD_DEGREE") => Some(NetworkDistance::Third),
        Some("OUT_OF_NETWORK") => Some(NetworkDistance::OutOfNetwork),
        _ => None,
    }
}

#[async_trait]
impl SocialGraph for LinkedInClient {
    async fn received_invitations(&self) -> Result<Vec<Invitation>> {
        let items = LinkedInClient::received_invitations(self)
            .await
            .map_err(api_error)?;
        Ok(items
            .into_iter()
            .map(|item| Invitation {
                external_id: item.id,
                message: item.message,
                sender: InvitationSender {
                    name: item.sender.name,
                    headline: item.sender.headline,
                    location: item.sender.location,
                    locale: item.sender.locale,
                    provider_id: item.sender.provider_id,
                    profile_url: item.sender.profile_url,
                },
            })
            .collect())
    }

    async fn accept_invitation(&self, invitation_id: &str) -> Result<()> {
        Ok(LinkedInClient::accept_invitation(self, invitation_id)
            .await
            .map_err(api_error)?)
    }

    async fn decline_invitation(&self, invitation_id: &str) -> Result<()> {
        Ok(LinkedInClient::decline_invitation(self, invitation_id)
            .await
            .map_err(api_error)?)
    }

    async fn recent_posts(&self, identifier: &str, limit: u32) -> Result<Vec<OwnPost>> {
        let items = LinkedInClient::recent_posts(self, identifier, limit)
            .await
            .map_err(api_error)?;
        Ok(items
            .into_iter()
            .map(|item| OwnPost {
                id: item.id,
                text: item.text,
                created_at: item.created_at,
            })
            .collect())
    }

    async fn reactions(&self, post_id: &str) -> Result<Vec<Engager>> {
        let items = LinkedInClient::reactions(self, post_id)
            .await
            .map_err(api_error)?;
        Ok(items
            .into_iter()
            .map(|item| Engager {
                profile_url: item.profile_url,
                provider_id: item.provider_id,
                name: item.name,
                headline: item.headline,
                network_distance: parse_distance(item.network_distance.as_deref()),
                reaction_type: item.reaction_type,
            })
            .collect())
    }

    async fn comments(&self, post_id: &str) -> Result<Vec<PostComment>> {
        let items = LinkedInClient::comments(self, post_id)
            .await
            .map_err(api_error)?;
        Ok(items
            .into_iter()
            .map(|item| PostComment {
                profile_url: item.profile_url,
                provider_id: item.provider_id,
                name: item.name,
                headline: item.headline,
                network_distance: parse_distance(item.network_distance.as_deref()),
                text: item.text,
            })
            .collect())
    }

    async fn profile_viewers(&self) -> Result<Vec<Engager>> {
        let items = LinkedInClient::profile_viewers(self)
            .await
            .map_err(api_error)?;
        Ok(items
            .into_iter()
            .map(|item| Engager {
                profile_url: item.profile_url,
                provider_id: item.provider_id,
                name: item.name,
                headline: item.headline,
                network_distance: parse_distance(item.network_distance.as_deref()),
                reaction_type: None,
            })
            .collect())
    }

    async fn full_profile(&self, identifier: &str) -> Result<FullProfile> {
        let profile = LinkedInClient::full_profile(self, identifier)
            .await
            .map_err(api_error)?;
        Ok(FullProfile {
            provider_id: profile.provider_id,
            headline: profile.headline,
            summary: profile.summary,
            location: profile.location,
            locale: profile.locale,
            experience: profile
                .experience
                .into_iter()
                .map(|e| ExperienceEntry {
                    company: e.company,
                    title: e.title,
                    description: e.description,
                })
                .collect(),
            connections_count: profile.connections_count,
            follower_count: profile.follower_count,
        })
    }

    async fn start_conversation(&self, recipient_id: &str, text: &str) -> Result<String> {
        Ok(LinkedInClient::start_conversation(self, recipient_id, text)
            .await
            .map_err(api_error)?)
    }

    async fn send_message(&self, conversation_id: &str, text: &str) -> Result<()> {
        Ok(LinkedInClient::send_message(self, conversation_id, text)
            .await
            .map_err(api_error)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_failures_surface_as_api_errors() {
        let err = api_error(LinkedInError::Api {
            status: 429,
            message: "slow down".to_string(),
        });
        assert!(matches!(err, GrowthdeckError::Api(_)));
        assert!(err.to_string().contains("429"));
    }

    #[test]
    fn distance_parsing_handles_provider_vocabulary() {
        assert_eq!(
            parse_distance(Some("SECOND_DEGREE")),
            Some(NetworkDistance::Second)
        );
        assert_eq!(parse_distance(Some("OUT_OF_NETWORK")), Some(NetworkDistance::OutOfNetwork));
        assert_eq!(parse_distance(Some("somethingelse")), None);
        assert_eq!(parse_distance(None), None);
    }
}
