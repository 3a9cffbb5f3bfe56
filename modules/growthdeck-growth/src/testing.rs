//! In-memory mocks for pipeline tests. Available to integration tests via
//! the `test-support` feature.
//!
//! The mocks are builder-configured: seed them with fixture data, inject
//! failures per call site, then assert on the recorded calls afterwards.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use growthdeck_common::types::{
    Engager, FullProfile, Invitation, Lead, NewInvitationRecord, NewLead, OwnPost, PostComment,
    ProcessedInvitation, Thread,
};

use crate::classify::{ClassificationRequest, InviteClassifier, InviteVerdict};
use crate::traits::{InvitationLog, LeadStore, SocialGraph, ThreadStore};

// ---------------------------------------------------------------------------
// MockSocialGraph
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MockSocialGraph {
    invitations: Vec<Invitation>,
    posts: Vec<OwnPost>,
    reactions: HashMap<String, Vec<Engager>>,
    comments: HashMap<String, Vec<PostComment>>,
    viewers: Vec<Engager>,
    profiles: HashMap<String, FullProfile>,

    invitations_fail: bool,
    viewers_fail: bool,
    accept_fails: bool,
    decline_fails: bool,
    failing_profiles: HashSet<String>,
    /// Fail the first N `start_conversation` calls.
    opener_failures: AtomicU32,
    /// Fail every `send_message` call after this many successes, when set.
    send_fail_after: Option<u32>,

    next_chat: AtomicU32,
    sends_ok: AtomicU32,
    pub accepts: Mutex<Vec<String>>,
    pub declines: Mutex<Vec<String>>,
    pub conversations: Mutex<Vec<(String, String)>>,
    pub messages: Mutex<Vec<(String, String)>>,
}

impl MockSocialGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_invitations(mut self, invitations: Vec<Invitation>) -> Self {
        self.invitations = invitations;
        self
    }

    pub fn with_posts(mut self, posts: Vec<OwnPost>) -> Self {
        self.posts = posts;
        self
    }

    pub fn with_reactions(mut self, post_id: &str, reactions: Vec<Engager>) -> Self {
        self.reactions.insert(post_id.to_string(), reactions);
        self
    }

    pub fn with_comments(mut self, post_id: &str, comments: Vec<PostComment>) -> Self {
        self.comments.insert(post_id.to_string(), comments);
        self
    }

    pub fn with_viewers(mut self, viewers: Vec<Engager>) -> Self {
        self.viewers = viewers;
        self
    }

    pub fn with_profile(mut self, url: &str, profile: FullProfile) -> Self {
        self.profiles.insert(url.to_string(), profile);
        self
    }

    pub fn failing_invitations(mut self) -> Self {
        self.invitations_fail = true;
        self
    }

    pub fn failing_viewers(mut self) -> Self {
        self.viewers_fail = true;
        self
    }

    pub fn failing_accept(mut self) -> Self {
        self.accept_fails = true;
        self
    }

    pub fn failing_decline(mut self) -> Self {
        self.decline_fails = true;
        self
    }

    pub fn failing_profile(mut self, url: &str) -> Self {
        self.failing_profiles.insert(url.to_string());
        self
    }

    pub fn failing_opener(self, times: u32) -> Self {
        self.opener_failures.store(times, Ordering::SeqCst);
        self
    }

    pub fn failing_sends_after(mut self, successes: u32) -> Self {
        self.send_fail_after = Some(successes);
        self
    }
}

#[async_trait]
impl SocialGraph for MockSocialGraph {
    async fn received_invitations(&self) -> Result<Vec<Invitation>> {
        if self.invitations_fail {
            return Err(anyhow!("invitations endpoint down"));
        }
        Ok(self.invitations.clone())
    }

    async fn accept_invitation(&self, invitation_id: &str) -> Result<()> {
        if self.accept_fails {
            return Err(anyhow!("accept failed"));
        }
        self.accepts.lock().unwrap().push(invitation_id.to_string());
        Ok(())
    }

    async fn decline_invitation(&self, invitation_id: &str) -> Result<()> {
        if self.decline_fails {
            return Err(anyhow!("decline failed"));
        }
        self.declines.lock().unwrap().push(invitation_id.to_string());
        Ok(())
    }

    async fn recent_posts(&self, _identifier: &str, limit: u32) -> Result<Vec<OwnPost>> {
        Ok(self.posts.iter().take(limit as usize).cloned().collect())
    }

    async fn reactions(&self, post_id: &str) -> Result<Vec<Engager>> {
        Ok(self.reactions.get(post_id).cloned().unwrap_or_default())
    }

    async fn comments(&self, post_id: &str) -> Result<Vec<PostComment>> {
        Ok(self.comments.get(post_id).cloned().unwrap_or_default())
    }

    async fn profile_viewers(&self) -> Result<Vec<Engager>> {
        if self.viewers_fail {
            return Err(anyhow!("viewers endpoint returned 403"));
        }
        Ok(self.viewers.clone())
    }

    async fn full_profile(&self, identifier: &str) -> Result<FullProfile> {
        if self.failing_profiles.contains(identifier) {
            return Err(anyhow!("profile fetch timed out"));
        }
        self.profiles
            .get(identifier)
            .cloned()
            .ok_or_else(|| anyhow!("no such profile: {identifier}"))
    }

    async fn start_conversation(&self, recipient_id: &str, text: &str) -> Result<String> {
        let remaining = self.opener_failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.opener_failures.store(remaining - 1, Ordering::SeqCst);
            return Err(anyhow!("conversation create failed"));
        }
        let n = self.next_chat.fetch_add(1, Ordering::SeqCst) + 1;
        let chat_id = format!("chat-{n}");
        self.conversations
            .lock()
            .unwrap()
            .push((recipient_id.to_string(), text.to_string()));
        Ok(chat_id)
    }

    async fn send_message(&self, conversation_id: &str, text: &str) -> Result<()> {
        if let Some(cap) = self.send_fail_after {
            if self.sends_ok.load(Ordering::SeqCst) >= cap {
                return Err(anyhow!("message send failed"));
            }
        }
        self.sends_ok.fetch_add(1, Ordering::SeqCst);
        self.messages
            .lock()
            .unwrap()
            .push((conversation_id.to_string(), text.to_string()));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MockClassifier
// ---------------------------------------------------------------------------

/// Classifier that matches verdicts by substring of the profile summary and
/// counts its calls, so tests can assert the country gate spent nothing.
#[derive(Default)]
pub struct MockClassifier {
    verdicts: Vec<(String, InviteVerdict)>,
    pub calls: AtomicU32,
}

impl MockClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_verdict(mut self, summary_contains: &str, verdict: InviteVerdict) -> Self {
        self.verdicts.push((summary_contains.to_string(), verdict));
        self
    }

    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

pub fn accept_verdict(reason: &str, icp_match: &str) -> InviteVerdict {
    InviteVerdict {
        accept: true,
        reason: reason.to_string(),
        is_founder: true,
        is_spam: false,
        icp_match: icp_match.to_string(),
        confidence: 0.9,
    }
}

pub fn decline_verdict(reason: &str) -> InviteVerdict {
    InviteVerdict {
        accept: false,
        reason: reason.to_string(),
        is_founder: false,
        is_spam: false,
        icp_match: "none".to_string(),
        confidence: 0.9,
    }
}

#[async_trait]
impl InviteClassifier for MockClassifier {
    async fn classify(&self, request: &ClassificationRequest) -> Result<InviteVerdict> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        for (needle, verdict) in &self.verdicts {
            if request.profile_summary.contains(needle) {
                return Ok(verdict.clone());
            }
        }
        Err(anyhow!("no verdict configured for request"))
    }
}

// ---------------------------------------------------------------------------
// Memory stores
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryLeadStore {
    leads: Mutex<Vec<Lead>>,
    failing_urls: HashSet<String>,
}

impl MemoryLeadStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_for(mut self, url: &str) -> Self {
        self.failing_urls.insert(url.to_string());
        self
    }

    pub fn all(&self) -> Vec<Lead> {
        self.leads.lock().unwrap().clone()
    }

    pub fn seed(&self, lead: Lead) {
        self.leads.lock().unwrap().push(lead);
    }
}

#[async_trait]
impl LeadStore for MemoryLeadStore {
    async fn create_lead(&self, lead: NewLead) -> Result<Lead> {
        if self.failing_urls.contains(&lead.linkedin_url) {
            return Err(anyhow!("insert failed"));
        }
        let created = Lead {
            id: Uuid::new_v4(),
            company_name: lead.company_name,
            contact_name: lead.contact_name,
            contact_title: lead.contact_title,
            linkedin_url: lead.linkedin_url,
            location: lead.location,
            business: lead.business,
            source: lead.source,
            status: lead.status,
            signal_type: lead.signal_type,
            signal_detail: lead.signal_detail,
            notes: lead.notes,
            tags: lead.tags,
            created_at: Utc::now(),
        };
        self.leads.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn find_by_profile_url(&self, url: &str) -> Result<Option<Lead>> {
        Ok(self
            .leads
            .lock()
            .unwrap()
            .iter()
            .find(|lead| lead.linkedin_url == url)
            .cloned())
    }
}

#[derive(Default)]
pub struct MemoryThreadStore {
    threads: Mutex<HashMap<String, Thread>>,
}

impl MemoryThreadStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<Thread> {
        self.threads.lock().unwrap().values().cloned().collect()
    }

    pub fn seed(&self, thread: Thread) {
        self.threads
            .lock()
            .unwrap()
            .insert(thread.external_id.clone(), thread);
    }
}

#[async_trait]
impl ThreadStore for MemoryThreadStore {
    async fn upsert_thread(&self, thread: &Thread) -> Result<()> {
        self.threads
            .lock()
            .unwrap()
            .insert(thread.external_id.clone(), thread.clone());
        Ok(())
    }

    async fn find_by_profile_url(&self, url: &str) -> Result<Option<Thread>> {
        Ok(self
            .threads
            .lock()
            .unwrap()
            .values()
            .find(|thread| thread.participant_profile_url == url)
            .cloned())
    }
}

#[derive(Default)]
pub struct MemoryInvitationLog {
    records: Mutex<Vec<ProcessedInvitation>>,
}

impl MemoryInvitationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<ProcessedInvitation> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl InvitationLog for MemoryInvitationLog {
    async fn list_processed_external_ids(&self) -> Result<Vec<String>> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.external_invitation_id.clone())
            .collect())
    }

    async fn record(&self, record: NewInvitationRecord) -> Result<ProcessedInvitation> {
        let mut records = self.records.lock().unwrap();
        if records
            .iter()
            .any(|r| r.external_invitation_id == record.external_invitation_id)
        {
            return Err(anyhow!(
                "duplicate record for {}",
                record.external_invitation_id
            ));
        }
        let created = ProcessedInvitation {
            id: Uuid::new_v4(),
            external_invitation_id: record.external_invitation_id,
            inviter_name: record.inviter_name,
            inviter_headline: record.inviter_headline,
            inviter_location: record.inviter_location,
            inviter_provider_id: record.inviter_provider_id,
            invitation_text: record.invitation_text,
            decision: record.decision,
            reason: record.reason,
            icp_match: record.icp_match,
            thread_id: None,
            messages_sent: 0,
            processed_at: Utc::now(),
        };
        records.push(created.clone());
        Ok(created)
    }

    async fn attach_thread(
        &self,
        invitation_id: Uuid,
        thread_id: &str,
        messages_sent: u32,
    ) -> Result<()> {
        let mut records = self.records.lock().unwrap();
        let record = records
            .iter_mut()
            .find(|r| r.id == invitation_id)
            .ok_or_else(|| anyhow!("no record with id {invitation_id}"))?;
        record.thread_id = Some(thread_id.to_string());
        record.messages_sent = messages_sent;
        Ok(())
    }
}
