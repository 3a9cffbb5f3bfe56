//! Prospect discovery from the owner's post engagement.
//!
//! Strictly sequential phases: resolve identity → find yesterday's post →
//! collect engagement → cheap pre-filter → budget-capped profile
//! enrichment → results. Cheap deterministic filters always run before
//! expensive network calls, and one candidate's API failure never aborts
//! the batch.

use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::Result;
use chrono_tz::Tz;
use tracing::{info, warn};

use growthdeck_common::types::{EngagementType, LeadStatus, NetworkDistance, NewLead};
use growthdeck_common::{Config, GrowthdeckError};
use llm_client::util::truncate_to_char_boundary;

use crate::budget::CallBudget;
use crate::engagement::{CollectedEngagement, EngagementCollector, ProspectCandidate};
use crate::filters::{categorize_icp, is_ai_company, is_allowed_country, is_likely_founder, PROSPECT_COUNTRIES};
use crate::pacing::Pacing;
use crate::traits::{LeadStore, SocialGraph, ThreadStore};

/// Source tag written onto every lead the prospector creates.
pub const LEAD_SOURCE: &str = "linkedin_engagement";

/// Post title length kept in signal-detail strings, in bytes.
const POST_TITLE_MAX: usize = 80;

// Skip reasons are rendered verbatim in the report — keep them readable.
pub const SKIP_NOT_SECOND_DEGREE: &str = "Not 2nd degree";
pub const SKIP_NOT_FOUNDER: &str = "Headline not founder-like";
pub const SKIP_EXISTING_LEAD: &str = "Already a lead";
pub const SKIP_EXISTING_THREAD: &str = "Already in conversations";
pub const SKIP_COUNTRY: &str = "Country not in allowlist";
pub const SKIP_AI_COMPANY: &str = "Likely AI company";

#[derive(Debug, Clone)]
pub struct ProspectorConfig {
    /// The account owner's provider identifier. No identity, no run.
    pub owner_identifier: String,
    /// Expensive-call cap for the whole run.
    pub profile_budget: u32,
    /// Local timezone for the yesterday-post window.
    pub timezone: Tz,
    /// Fixed pause after each profile lookup.
    pub profile_pause: Duration,
}

impl ProspectorConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            owner_identifier: config.linkedin_account_id.clone(),
            profile_budget: config.profile_budget,
            timezone: config.report_timezone,
            profile_pause: Duration::from_secs(3),
        }
    }
}

/// Summary of one created lead, echoed in the report.
#[derive(Debug, Clone)]
pub struct LeadSummary {
    pub name: String,
    pub business: String,
    pub signal_detail: String,
}

/// Everything a prospector run produced.
#[derive(Debug, Default)]
pub struct ProspectorResults {
    pub candidates_found: u32,
    pub profiles_checked: u32,
    pub leads_created: Vec<LeadSummary>,
    pub api_calls_used: u32,
    pub api_call_budget: u32,
    /// Human-readable reason → drop count, rendered verbatim in the report.
    pub skip_reasons: BTreeMap<String, u32>,
    pub warnings: Vec<String>,
}

impl ProspectorResults {
    fn skip(&mut self, reason: &str) {
        *self.skip_reasons.entry(reason.to_string()).or_insert(0) += 1;
    }

    /// The rendered report (see `report.rs`).
    pub fn report(&self) -> String {
        self.to_string()
    }
}

pub struct Prospector<'a> {
    social: &'a dyn SocialGraph,
    leads: &'a dyn LeadStore,
    threads: &'a dyn ThreadStore,
    config: ProspectorConfig,
}

impl<'a> Prospector<'a> {
    pub fn new(
        social: &'a dyn SocialGraph,
        leads: &'a dyn LeadStore,
        threads: &'a dyn ThreadStore,
        config: ProspectorConfig,
    ) -> Self {
        Self {
            social,
            leads,
            threads,
            config,
        }
    }

    pub async fn run(&self) -> Result<ProspectorResults, GrowthdeckError> {
        if self.config.owner_identifier.trim().is_empty() {
            return Err(GrowthdeckError::Config(
                "owner identifier is not configured".to_string(),
            ));
        }

        let mut budget = CallBudget::new(self.config.profile_budget);
        let mut results = ProspectorResults {
            api_call_budget: self.config.profile_budget,
            ..Default::default()
        };

        let collector = EngagementCollector::new(self.social, self.config.timezone);

        // Phase: find yesterday's post. A failed or empty lookup degrades to
        // an engagement-free run, it does not abort.
        let post = match collector
            .find_yesterdays_post(&self.config.owner_identifier)
            .await
        {
            Ok(lookup) => {
                budget.charge(lookup.api_calls_used);
                results.warnings.extend(lookup.warnings);
                lookup.post
            }
            Err(e) => {
                budget.charge(1);
                warn!(error = %e, "Recent-posts fetch failed");
                results.warnings.push(format!("Recent-posts fetch failed: {e}"));
                None
            }
        };

        // Phase: collect engagement.
        let collected = match &post {
            Some(post) => {
                let collected = collector.collect(post).await;
                budget.charge(collected.api_calls_used);
                collected
            }
            None => CollectedEngagement::default(),
        };
        results.candidates_found = collected.candidates.len() as u32;
        results.warnings.extend(collected.warnings);

        // Phase: cheap pre-filter — no network cost.
        let mut shortlist: Vec<ProspectCandidate> = Vec::new();
        for candidate in collected.candidates {
            // Unknown distance passes; a known non-2nd-degree does not.
            if let Some(distance) = candidate.network_distance {
                if distance != NetworkDistance::Second {
                    results.skip(SKIP_NOT_SECOND_DEGREE);
                    continue;
                }
            }
            if !is_likely_founder(&candidate.headline) {
                results.skip(SKIP_NOT_FOUNDER);
                continue;
            }
            match self.leads.find_by_profile_url(&candidate.profile_url).await {
                Ok(Some(_)) => {
                    results.skip(SKIP_EXISTING_LEAD);
                    continue;
                }
                Ok(None) => {}
                Err(e) => {
                    results
                        .warnings
                        .push(format!("{}: lead lookup failed: {e}", candidate.name));
                    continue;
                }
            }
            match self
                .threads
                .find_by_profile_url(&candidate.profile_url)
                .await
            {
                Ok(Some(_)) => {
                    results.skip(SKIP_EXISTING_THREAD);
                    continue;
                }
                Ok(None) => {}
                Err(e) => {
                    results
                        .warnings
                        .push(format!("{}: thread lookup failed: {e}", candidate.name));
                    continue;
                }
            }
            shortlist.push(candidate);
        }

        // Phase: budget-capped enrichment, in discovery order.
        let remaining = budget.remaining() as usize;
        if shortlist.len() > remaining {
            results.warnings.push(format!(
                "Budget cap reached: {} candidates skipped",
                shortlist.len() - remaining
            ));
        }

        let pacing = Pacing::new(self.config.profile_pause);
        for candidate in shortlist.into_iter().take(remaining) {
            results.profiles_checked += 1;
            budget.charge(1);

            let profile = match pacing
                .paced(self.social.full_profile(&candidate.profile_url))
                .await
            {
                Ok(profile) => profile,
                Err(e) => {
                    warn!(name = %candidate.name, error = %e, "Profile fetch failed");
                    results
                        .warnings
                        .push(format!("{}: profile fetch failed: {e}", candidate.name));
                    continue;
                }
            };

            if !is_allowed_country(profile.locale.as_deref(), &profile.location, &PROSPECT_COUNTRIES)
            {
                results.skip(SKIP_COUNTRY);
                continue;
            }

            let headline = if profile.headline.is_empty() {
                candidate.headline.clone()
            } else {
                profile.headline.clone()
            };

            if is_ai_company(&headline, &profile.experience) {
                results.skip(SKIP_AI_COMPANY);
                continue;
            }

            let mut profile_text = format!("{headline}\n{}", profile.summary);
            for entry in &profile.experience {
                profile_text.push_str(&format!(
                    "\n{} {} {}",
                    entry.company, entry.title, entry.description
                ));
            }
            let icp = categorize_icp(&profile_text);

            let signal_detail = signal_detail(&candidate, post.as_ref().map(|p| p.text.as_str()));
            let company_name = profile
                .experience
                .first()
                .map(|entry| entry.company.clone())
                .unwrap_or_default();

            let lead = NewLead {
                company_name,
                contact_name: candidate.name.clone(),
                contact_title: headline,
                linkedin_url: candidate.profile_url.clone(),
                location: profile.location.clone(),
                business: icp.business_tag().to_string(),
                source: LEAD_SOURCE.to_string(),
                status: LeadStatus::New,
                signal_type: Some(candidate.engagement_type.label().to_string()),
                signal_detail: Some(signal_detail.clone()),
                notes: String::new(),
                tags: vec!["engagement".to_string()],
            };

            match self.leads.create_lead(lead).await {
                Ok(created) => {
                    info!(name = %created.contact_name, business = %created.business, "Lead created");
                    results.leads_created.push(LeadSummary {
                        name: created.contact_name,
                        business: created.business,
                        signal_detail,
                    });
                }
                Err(e) => {
                    warn!(name = %candidate.name, error = %e, "Lead creation failed");
                    results
                        .warnings
                        .push(format!("{}: lead creation failed: {e}", candidate.name));
                }
            }
        }

        results.api_calls_used = budget.used();
        info!(
            candidates = results.candidates_found,
            leads = results.leads_created.len(),
            api_calls = results.api_calls_used,
            "Prospector run complete"
        );
        Ok(results)
    }
}

/// Derive the signal-detail string from the engagement type; reactions
/// reference the post title.
fn signal_detail(candidate: &ProspectCandidate, post_text: Option<&str>) -> String {
    match candidate.engagement_type {
        EngagementType::Reaction => {
            let title = post_text
                .map(|t| truncate_to_char_boundary(t.lines().next().unwrap_or(t), POST_TITLE_MAX))
                .unwrap_or("");
            format!(
                "Reacted ({}) to post \"{}\"",
                candidate.engagement_detail, title
            )
        }
        EngagementType::Comment => format!("Commented: {}", candidate.engagement_detail),
        EngagementType::ProfileView => "Viewed profile".to_string(),
    }
}
