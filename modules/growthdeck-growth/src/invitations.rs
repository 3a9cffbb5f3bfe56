//! Inbound invitation processing.
//!
//! Per invitation: country gate (free) → LLM classification gate → accept
//! or decline → welcome sequence on accept. Every invitation reaches a
//! terminal record — accepted, declined, or error — and an id that has a
//! record is never processed again. One invitation's failure never stops
//! the batch.

use std::collections::HashSet;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{info, warn};

use growthdeck_common::types::{
    Decision, Invitation, InvitationSender, NewInvitationRecord, Thread,
};
use growthdeck_common::Config;

use crate::classify::{ClassificationRequest, InviteClassifier};
use crate::filters::{is_allowed_country, INVITER_COUNTRIES};
use crate::pacing::Pacing;
use crate::traits::{InvitationLog, SocialGraph, ThreadStore};

/// The scripted three-message opener, sent in order after an accept.
/// `{first_name}` is substituted before sending.
pub const WELCOME_MESSAGES: [&str; 3] = [
    "Hi {first_name}, thanks for connecting! Always good to meet another founder here.",
    "Quick one — I share a short weekly breakdown on turning LinkedIn engagement into \
     client conversations. Want me to send the latest one over?",
    "Either way, happy to have you in the network, {first_name}. What's the main thing \
     you're focused on growing this quarter?",
];

#[derive(Debug, Clone)]
pub struct InvitationConfig {
    /// Cap on invitations handled in one run.
    pub max_per_run: u32,
    /// Fixed pause between welcome messages.
    pub message_pause: Duration,
    /// Backoff before the single opener retry.
    pub opener_retry_backoff: Duration,
}

impl InvitationConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_per_run: config.max_invitations_per_run,
            message_pause: Duration::from_secs(4),
            opener_retry_backoff: Duration::from_secs(5),
        }
    }
}

/// Per-invitation outcome echoed in the aggregate result.
#[derive(Debug, Clone)]
pub struct InvitationOutcome {
    pub name: String,
    pub decision: Decision,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct InvitationRunResults {
    pub processed: u32,
    pub accepted: u32,
    pub declined: u32,
    pub errors: u32,
    pub details: Vec<InvitationOutcome>,
}

impl InvitationRunResults {
    pub fn report(&self) -> String {
        self.to_string()
    }

    fn tally(&mut self, outcome: InvitationOutcome) {
        self.processed += 1;
        match outcome.decision {
            Decision::Accepted => self.accepted += 1,
            Decision::Declined => self.declined += 1,
            Decision::Error => self.errors += 1,
        }
        self.details.push(outcome);
    }
}

/// Outcome of one welcome sequence.
struct WelcomeOutcome {
    thread_id: Option<String>,
    messages_sent: u32,
    last_message: Option<String>,
}

pub struct InvitationProcessor<'a> {
    social: &'a dyn SocialGraph,
    classifier: &'a dyn InviteClassifier,
    log: &'a dyn InvitationLog,
    threads: &'a dyn ThreadStore,
    config: InvitationConfig,
}

impl<'a> InvitationProcessor<'a> {
    pub fn new(
        social: &'a dyn SocialGraph,
        classifier: &'a dyn InviteClassifier,
        log: &'a dyn InvitationLog,
        threads: &'a dyn ThreadStore,
        config: InvitationConfig,
    ) -> Self {
        Self {
            social,
            classifier,
            log,
            threads,
            config,
        }
    }

    pub async fn run(&self) -> Result<InvitationRunResults> {
        let invitations = self
            .social
            .received_invitations()
            .await
            .context("Failed to fetch received invitations")?;

        let processed_ids: HashSet<String> = self
            .log
            .list_processed_external_ids()
            .await
            .context("Failed to load processed invitation ids")?
            .into_iter()
            .collect();

        // Provider order is kept (oldest first); no re-sorting.
        let fresh: Vec<Invitation> = invitations
            .into_iter()
            .filter(|invitation| !processed_ids.contains(&invitation.external_id))
            .take(self.config.max_per_run as usize)
            .collect();

        info!(
            fresh = fresh.len(),
            already_processed = processed_ids.len(),
            "Invitation batch ready"
        );

        let mut results = InvitationRunResults::default();
        for invitation in &fresh {
            match self.process_one(invitation).await {
                Ok(outcome) => results.tally(outcome),
                Err(e) => {
                    // Terminal error record, best effort — the loop goes on.
                    let reason = format!("{e:#}");
                    warn!(
                        invitation_id = %invitation.external_id,
                        name = %invitation.sender.name,
                        error = %reason,
                        "Invitation processing failed"
                    );
                    if let Err(record_err) = self
                        .log
                        .record(new_record(invitation, Decision::Error, reason.clone(), None))
                        .await
                    {
                        warn!(
                            invitation_id = %invitation.external_id,
                            error = %record_err,
                            "Failed to persist error record"
                        );
                    }
                    results.tally(InvitationOutcome {
                        name: invitation.sender.name.clone(),
                        decision: Decision::Error,
                        reason,
                    });
                }
            }
        }

        info!(
            processed = results.processed,
            accepted = results.accepted,
            declined = results.declined,
            errors = results.errors,
            "Invitation run complete"
        );
        Ok(results)
    }

    async fn process_one(&self, invitation: &Invitation) -> Result<InvitationOutcome> {
        let sender = &invitation.sender;

        // Country gate — deterministic, avoids LLM spend on geographies the
        // business does not serve.
        if !is_allowed_country(sender.locale.as_deref(), &sender.location, &INVITER_COUNTRIES) {
            let mut reason = format!("Country not in allowlist: {}", describe_location(sender));
            if let Err(e) = self.social.decline_invitation(&invitation.external_id).await {
                // Decline is best effort; the decision stands either way.
                warn!(invitation_id = %invitation.external_id, error = %e, "Decline call failed");
                reason.push_str(&format!(" (decline call failed: {e})"));
            }
            self.log
                .record(new_record(invitation, Decision::Declined, reason.clone(), None))
                .await?;
            return Ok(InvitationOutcome {
                name: sender.name.clone(),
                decision: Decision::Declined,
                reason,
            });
        }

        // Classification gate.
        let request = ClassificationRequest::from_invitation(invitation);
        let verdict = self.classifier.classify(&request).await?;

        if !verdict.accept {
            let mut reason = verdict.reason.clone();
            if let Err(e) = self.social.decline_invitation(&invitation.external_id).await {
                warn!(invitation_id = %invitation.external_id, error = %e, "Decline call failed");
                reason.push_str(&format!(" (decline call failed: {e})"));
            }
            self.log
                .record(new_record(
                    invitation,
                    Decision::Declined,
                    reason.clone(),
                    Some(verdict.icp_match.clone()),
                ))
                .await?;
            return Ok(InvitationOutcome {
                name: sender.name.clone(),
                decision: Decision::Declined,
                reason,
            });
        }

        // Accept path.
        self.social
            .accept_invitation(&invitation.external_id)
            .await
            .context("Accept call failed")?;

        let record = self
            .log
            .record(new_record(
                invitation,
                Decision::Accepted,
                verdict.reason.clone(),
                Some(verdict.icp_match.clone()),
            ))
            .await?;

        let welcome = self.send_welcome_sequence(sender).await;
        if let Some(thread_id) = &welcome.thread_id {
            let thread = Thread {
                external_id: thread_id.clone(),
                participant_profile_url: sender.profile_url.clone(),
                participant_name: sender.name.clone(),
                last_message_preview: welcome.last_message.clone().unwrap_or_default(),
                updated_at: Utc::now(),
            };
            if let Err(e) = self.threads.upsert_thread(&thread).await {
                warn!(thread_id = %thread_id, error = %e, "Thread upsert failed");
            }
            if let Err(e) = self
                .log
                .attach_thread(record.id, thread_id, welcome.messages_sent)
                .await
            {
                warn!(thread_id = %thread_id, error = %e, "Failed to attach thread to record");
            }
        }

        Ok(InvitationOutcome {
            name: sender.name.clone(),
            decision: Decision::Accepted,
            reason: verdict.reason,
        })
    }

    /// Send the three scripted messages with fixed pacing. Message 1 opens
    /// the conversation and gets exactly one retry; a double failure aborts
    /// the sequence (the connection itself stays accepted). Messages 2–3
    /// are not retried — the first failure stops the sequence and the
    /// partial count stands.
    async fn send_welcome_sequence(&self, sender: &InvitationSender) -> WelcomeOutcome {
        let pacing = Pacing::new(self.config.message_pause);
        let first = first_name(&sender.name);
        let messages: Vec<String> = WELCOME_MESSAGES
            .iter()
            .map(|template| template.replace("{first_name}", &first))
            .collect();

        let opener = &messages[0];
        let thread_id = match pacing
            .paced(self.social.start_conversation(&sender.provider_id, opener))
            .await
        {
            Ok(id) => id,
            Err(first_err) => {
                warn!(name = %sender.name, error = %first_err, "Opener failed, retrying once");
                tokio::time::sleep(self.config.opener_retry_backoff).await;
                match pacing
                    .paced(self.social.start_conversation(&sender.provider_id, opener))
                    .await
                {
                    Ok(id) => id,
                    Err(retry_err) => {
                        warn!(
                            name = %sender.name,
                            error = %retry_err,
                            "Opener failed twice; welcome sequence aborted"
                        );
                        return WelcomeOutcome {
                            thread_id: None,
                            messages_sent: 0,
                            last_message: None,
                        };
                    }
                }
            }
        };

        let mut sent: u32 = 1;
        let mut last = opener.clone();
        for message in &messages[1..] {
            match pacing.paced(self.social.send_message(&thread_id, message)).await {
                Ok(()) => {
                    sent += 1;
                    last = message.clone();
                }
                Err(e) => {
                    warn!(
                        thread_id = %thread_id,
                        sent,
                        error = %e,
                        "Welcome message failed; stopping sequence"
                    );
                    break;
                }
            }
        }

        info!(thread_id = %thread_id, sent, "Welcome sequence finished");
        WelcomeOutcome {
            thread_id: Some(thread_id),
            messages_sent: sent,
            last_message: Some(last),
        }
    }
}

fn new_record(
    invitation: &Invitation,
    decision: Decision,
    reason: String,
    icp_match: Option<String>,
) -> NewInvitationRecord {
    let sender = &invitation.sender;
    NewInvitationRecord {
        external_invitation_id: invitation.external_id.clone(),
        inviter_name: sender.name.clone(),
        inviter_headline: sender.headline.clone(),
        inviter_location: sender.location.clone(),
        inviter_provider_id: sender.provider_id.clone(),
        invitation_text: invitation.message.clone(),
        decision,
        reason,
        icp_match,
    }
}

fn describe_location(sender: &InvitationSender) -> String {
    match (&sender.locale, sender.location.trim()) {
        (Some(locale), "") if !locale.is_empty() => locale.clone(),
        (_, "") => "unknown".to_string(),
        (_, location) => location.to_string(),
    }
}

fn first_name(full_name: &str) -> String {
    full_name
        .split_whitespace()
        .next()
        .unwrap_or("there")
        .to_string()
}
