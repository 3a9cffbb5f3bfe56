use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Engagement & social graph
// ---------------------------------------------------------------------------

/// How a prospect engaged with the account owner's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngagementType {
    Reaction,
    Comment,
    ProfileView,
}

impl EngagementType {
    pub fn label(&self) -> &'static str {
        match self {
            EngagementType::Reaction => "reaction",
            EngagementType::Comment => "comment",
            EngagementType::ProfileView => "profile_view",
        }
    }
}

impl std::fmt::Display for EngagementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Social-graph distance between the account owner and another member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkDistance {
    First,
    Second,
    Third,
    OutOfNetwork,
}

/// An inbound connection request as returned by the social-graph provider.
#[derive(Debug, Clone)]
pub struct Invitation {
    pub external_id: String,
    pub sender: InvitationSender,
    /// Optional note attached to the connection request.
    pub message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct InvitationSender {
    pub name: String,
    pub headline: String,
    /// Free-text location ("Austin, Texas, United States").
    pub location: String,
    /// Structured locale country code when the provider supplies one ("US").
    pub locale: Option<String>,
    pub provider_id: String,
    pub profile_url: String,
}

/// One of the account owner's own posts.
#[derive(Debug, Clone)]
pub struct OwnPost {
    pub id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// A member who reacted to a post or viewed the owner's profile.
#[derive(Debug, Clone)]
pub struct Engager {
    pub profile_url: String,
    pub provider_id: Option<String>,
    pub name: String,
    pub headline: String,
    pub network_distance: Option<NetworkDistance>,
    pub reaction_type: Option<String>,
}

/// A comment left on one of the owner's posts.
#[derive(Debug, Clone)]
pub struct PostComment {
    pub profile_url: String,
    pub provider_id: Option<String>,
    pub name: String,
    pub headline: String,
    pub network_distance: Option<NetworkDistance>,
    pub text: String,
}

/// A full member profile, fetched one expensive call at a time.
#[derive(Debug, Clone, Default)]
pub struct FullProfile {
    pub provider_id: String,
    pub headline: String,
    pub summary: String,
    pub location: String,
    pub locale: Option<String>,
    pub experience: Vec<ExperienceEntry>,
    pub connections_count: Option<u32>,
    pub follower_count: Option<u32>,
}

#[derive(Debug, Clone, Default)]
pub struct ExperienceEntry {
    pub company: String,
    pub title: String,
    pub description: String,
}

// ---------------------------------------------------------------------------
// Leads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    New,
    Contacted,
    Replied,
    Qualified,
    Closed,
}

impl LeadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::New => "new",
            LeadStatus::Contacted => "contacted",
            LeadStatus::Replied => "replied",
            LeadStatus::Qualified => "qualified",
            LeadStatus::Closed => "closed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "new" => Some(LeadStatus::New),
            "contacted" => Some(LeadStatus::Contacted),
            "replied" => Some(LeadStatus::Replied),
            "qualified" => Some(LeadStatus::Qualified),
            "closed" => Some(LeadStatus::Closed),
            _ => None,
        }
    }
}

/// Ideal-customer-profile buckets used by the keyword categorizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icp {
    CoachingConsulting,
    MarketingAgency,
}

impl Icp {
    /// The business tag written onto a lead.
    pub fn business_tag(&self) -> &'static str {
        match self {
            Icp::CoachingConsulting => "Coaching & Consulting",
            Icp::MarketingAgency => "Marketing & Creative Agency",
        }
    }
}

/// A persisted lead. `linkedin_url` is the durable dedup key — at most one
/// lead is ever created per profile URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    pub id: Uuid,
    pub company_name: String,
    pub contact_name: String,
    pub contact_title: String,
    pub linkedin_url: String,
    pub location: String,
    pub business: String,
    pub source: String,
    pub status: LeadStatus,
    pub signal_type: Option<String>,
    pub signal_detail: Option<String>,
    pub notes: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Creation fields for a lead; id and timestamp are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewLead {
    pub company_name: String,
    pub contact_name: String,
    pub contact_title: String,
    pub linkedin_url: String,
    pub location: String,
    pub business: String,
    pub source: String,
    pub status: LeadStatus,
    pub signal_type: Option<String>,
    pub signal_detail: Option<String>,
    pub notes: String,
    pub tags: Vec<String>,
}

// ---------------------------------------------------------------------------
// Conversation threads
// ---------------------------------------------------------------------------

/// A DM conversation, keyed by the platform conversation id. An existing
/// thread for a profile URL means the contact is already in play.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thread {
    pub external_id: String,
    pub participant_profile_url: String,
    pub participant_name: String,
    pub last_message_preview: String,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Processed invitations
// ---------------------------------------------------------------------------

/// Terminal state of one inbound connection-request decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Accepted,
    Declined,
    Error,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Accepted => "accepted",
            Decision::Declined => "declined",
            Decision::Error => "error",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "accepted" => Some(Decision::Accepted),
            "declined" => Some(Decision::Declined),
            "error" => Some(Decision::Error),
            _ => None,
        }
    }
}

/// Durable record of one processed invitation. The set of recorded
/// `external_invitation_id`s is the pipeline's sole idempotency mechanism:
/// an id in this set is never processed again. Records are written once and
/// only mutated to attach a thread id and message count after a successful
/// welcome sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedInvitation {
    pub id: Uuid,
    pub external_invitation_id: String,
    pub inviter_name: String,
    pub inviter_headline: String,
    pub inviter_location: String,
    pub inviter_provider_id: String,
    pub invitation_text: Option<String>,
    pub decision: Decision,
    pub reason: String,
    pub icp_match: Option<String>,
    pub thread_id: Option<String>,
    pub messages_sent: u32,
    pub processed_at: DateTime<Utc>,
}

/// Creation fields for an invitation record. `thread_id` and
/// `messages_sent` start empty and are attached later, if at all.
#[derive(Debug, Clone)]
pub struct NewInvitationRecord {
    pub external_invitation_id: String,
    pub inviter_name: String,
    pub inviter_headline: String,
    pub inviter_location: String,
    pub inviter_provider_id: String,
    pub invitation_text: Option<String>,
    pub decision: Decision,
    pub reason: String,
    pub icp_match: Option<String>,
}
