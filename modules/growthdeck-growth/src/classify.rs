//! LLM classification of inbound connection requests.
//!
//! The country gate runs first and free; this is the second, paid gate. The
//! model sees name/headline/location plus any invitation note and returns a
//! strict verdict object. Responses wrapped in markdown fences are handled
//! by the client's `extract`.

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;

use growthdeck_common::types::Invitation;
use growthdeck_common::GrowthdeckError;
use llm_client::util::truncate_to_char_boundary;
use llm_client::Claude;

const CLASSIFY_MODEL: &str = "claude-haiku-4-5-20251001";

const CLASSIFY_SYSTEM: &str = "\
You screen inbound LinkedIn connection requests for a consultancy serving \
founder-led businesses in two segments: coaching/consulting practices and \
marketing/creative agencies.\n\n\
ACCEPT when the sender looks like a founder, owner, or senior operator of a \
real business in (or adjacent to) those segments.\n\
DECLINE recruiters, job seekers, students, obvious spam/lead-gen automation, \
sellers pitching their own services, and profiles with no discernible \
business.\n\n\
Respond with ONLY a JSON object, no prose:\n\
{\"accept\": bool, \"reason\": string, \"isFounder\": bool, \"isSpam\": bool, \
\"icpMatch\": string, \"confidence\": number between 0 and 1}\n\
icpMatch is \"coaching\", \"agency\", or \"none\".";

/// Verdict contract with the classification endpoint. Field names are part
/// of the wire contract.
#[derive(Debug, Clone, Deserialize)]
pub struct InviteVerdict {
    pub accept: bool,
    pub reason: String,
    #[serde(rename = "isFounder")]
    pub is_founder: bool,
    #[serde(rename = "isSpam")]
    pub is_spam: bool,
    #[serde(rename = "icpMatch")]
    pub icp_match: String,
    pub confidence: f32,
}

/// What the classifier gets to see.
#[derive(Debug, Clone)]
pub struct ClassificationRequest {
    pub profile_summary: String,
    pub invitation_text: Option<String>,
}

impl ClassificationRequest {
    pub fn from_invitation(invitation: &Invitation) -> Self {
        let sender = &invitation.sender;
        Self {
            profile_summary: format!(
                "Name: {}\nHeadline: {}\nLocation: {}",
                sender.name, sender.headline, sender.location
            ),
            invitation_text: invitation.message.clone(),
        }
    }
}

#[async_trait]
pub trait InviteClassifier: Send + Sync {
    async fn classify(&self, request: &ClassificationRequest) -> Result<InviteVerdict>;
}

/// Production classifier backed by the Anthropic messages API.
pub struct ClaudeInviteClassifier {
    claude: Claude,
}

impl ClaudeInviteClassifier {
    pub fn new(api_key: &str) -> Self {
        Self {
            claude: Claude::new(api_key, CLASSIFY_MODEL),
        }
    }

    pub fn with_client(claude: Claude) -> Self {
        Self { claude }
    }
}

#[async_trait]
impl InviteClassifier for ClaudeInviteClassifier {
    async fn classify(&self, request: &ClassificationRequest) -> Result<InviteVerdict> {
        let mut prompt = request.profile_summary.clone();
        if let Some(text) = &request.invitation_text {
            prompt.push_str("\n\nInvitation note:\n");
            prompt.push_str(truncate_to_char_boundary(text, 1000));
        }

        let verdict: InviteVerdict = self
            .claude
            .extract(CLASSIFY_SYSTEM, &prompt)
            .await
            .map_err(|e| GrowthdeckError::Classification(format!("{e:#}")))?;
        info!(
            accept = verdict.accept,
            icp_match = %verdict.icp_match,
            confidence = verdict.confidence,
            "Invitation classified"
        );
        Ok(verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use llm_client::util::strip_code_blocks;

    #[test]
    fn verdict_parses_from_contract_json() {
        let json = r#"{"accept": true, "reason": "Agency founder", "isFounder": true,
                       "isSpam": false, "icpMatch": "agency", "confidence": 0.92}"#;
        let verdict: InviteVerdict = serde_json::from_str(json).unwrap();
        assert!(verdict.accept);
        assert!(verdict.is_founder);
        assert_eq!(verdict.icp_match, "agency");
    }

    #[test]
    fn verdict_parses_when_fenced() {
        let fenced = "```json\n{\"accept\": false, \"reason\": \"Recruiter\", \
                      \"isFounder\": false, \"isSpam\": false, \"icpMatch\": \"none\", \
                      \"confidence\": 0.8}\n```";
        let verdict: InviteVerdict = serde_json::from_str(strip_code_blocks(fenced)).unwrap();
        assert!(!verdict.accept);
        assert_eq!(verdict.reason, "Recruiter");
    }

    #[test]
    fn request_includes_invitation_note() {
        let invitation = Invitation {
            external_id: "inv-1".to_string(),
            message: Some("Loved your post on referrals".to_string()),
            sender: growthdeck_common::types::InvitationSender {
                name: "Sam Lee".to_string(),
                headline: "Founder at Leeway".to_string(),
                location: "Austin, TX".to_string(),
                locale: Some("US".to_string()),
                provider_id: "p-1".to_string(),
                profile_url: "https://linkedin.com/in/samlee".to_string(),
            },
        };
        let request = ClassificationRequest::from_invitation(&invitation);
        assert!(request.profile_summary.contains("Sam Lee"));
        assert!(request.profile_summary.contains("Founder at Leeway"));
        assert_eq!(request.invitation_text.as_deref(), Some("Loved your post on referrals"));
    }
}
