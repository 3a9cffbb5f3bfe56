//! Engagement collection — who interacted with yesterday's post.
//!
//! Produces one deduplicated candidate list from three sources: reactions,
//! comments, and profile viewers. Each source fails independently; a dead
//! source becomes a warning, never an aborted run. First writer per profile
//! URL wins, in merge order reactions → comments → viewers, so a person who
//! both reacted and commented is recorded once as a reaction (the comment
//! signal is dropped — accepted simplification, see DESIGN.md).

use std::collections::HashSet;

use anyhow::Result;
use chrono::{DateTime, Duration, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::{info, warn};

use growthdeck_common::types::{EngagementType, NetworkDistance, OwnPost};

use crate::traits::SocialGraph;

/// Posts page size for the yesterday-post lookup.
pub const POST_PAGE_SIZE: u32 = 20;

/// Comment text kept as engagement detail, in characters.
const COMMENT_DETAIL_MAX_CHARS: usize = 200;

/// A person discovered via engagement signals, not yet promoted to a lead.
/// Ephemeral — lives only within one prospector run.
#[derive(Debug, Clone)]
pub struct ProspectCandidate {
    pub profile_url: String,
    pub provider_id: Option<String>,
    pub name: String,
    pub headline: String,
    pub network_distance: Option<NetworkDistance>,
    pub engagement_type: EngagementType,
    pub engagement_detail: String,
}

/// Outcome of the yesterday-post lookup. Charges one API call.
#[derive(Debug)]
pub struct PostLookup {
    pub post: Option<OwnPost>,
    pub api_calls_used: u32,
    pub warnings: Vec<String>,
}

/// Deduplicated candidates in discovery order, plus the cost of collecting
/// them.
#[derive(Debug, Default)]
pub struct CollectedEngagement {
    pub candidates: Vec<ProspectCandidate>,
    pub api_calls_used: u32,
    pub warnings: Vec<String>,
}

pub struct EngagementCollector<'a> {
    social: &'a dyn SocialGraph,
    timezone: Tz,
}

impl<'a> EngagementCollector<'a> {
    pub fn new(social: &'a dyn SocialGraph, timezone: Tz) -> Self {
        Self { social, timezone }
    }

    /// Find the owner's post from yesterday: the first recent post whose
    /// timestamp falls within yesterday's local-day window. A post from
    /// today or two days ago is ignored even if it is the most recent.
    /// No matching post is a warning, not an error.
    pub async fn find_yesterdays_post(&self, owner: &str) -> Result<PostLookup> {
        let posts = self.social.recent_posts(owner, POST_PAGE_SIZE).await?;
        let (start, end) = yesterday_window(Utc::now(), self.timezone);

        let post = posts
            .into_iter()
            .find(|p| p.created_at >= start && p.created_at < end);

        let mut warnings = Vec::new();
        match &post {
            Some(post) => info!(post_id = %post.id, "Found yesterday's post"),
            None => {
                warn!("No post found in yesterday's window");
                warnings.push("No post from yesterday; engagement collection skipped".to_string());
            }
        }

        Ok(PostLookup {
            post,
            api_calls_used: 1,
            warnings,
        })
    }

    /// Collect reactions, comments, and profile viewers for a post into one
    /// deduplicated candidate list.
    pub async fn collect(&self, post: &OwnPost) -> CollectedEngagement {
        let mut out = CollectedEngagement::default();
        let mut seen: HashSet<String> = HashSet::new();

        // Reactions
        out.api_calls_used += 1;
        match self.social.reactions(&post.id).await {
            Ok(reactions) => {
                for r in reactions {
                    if !seen.insert(r.profile_url.clone()) {
                        continue;
                    }
                    let detail = r
                        .reaction_type
                        .unwrap_or_else(|| "like".to_string());
                    out.candidates.push(ProspectCandidate {
                        profile_url: r.profile_url,
                        provider_id: r.provider_id,
                        name: r.name,
                        headline: r.headline,
                        network_distance: r.network_distance,
                        engagement_type: EngagementType::Reaction,
                        engagement_detail: detail,
                    });
                }
            }
            Err(e) => {
                warn!(post_id = %post.id, error = %e, "Reactions fetch failed");
                out.warnings.push(format!("Reactions fetch failed: {e}"));
            }
        }

        // Comments
        out.api_calls_used += 1;
        match self.social.comments(&post.id).await {
            Ok(comments) => {
                for c in comments {
                    if !seen.insert(c.profile_url.clone()) {
                        continue;
                    }
                    let detail: String = c.text.chars().take(COMMENT_DETAIL_MAX_CHARS).collect();
                    out.candidates.push(ProspectCandidate {
                        profile_url: c.profile_url,
                        provider_id: c.provider_id,
                        name: c.name,
                        headline: c.headline,
                        network_distance: c.network_distance,
                        engagement_type: EngagementType::Comment,
                        engagement_detail: detail,
                    });
                }
            }
            Err(e) => {
                warn!(post_id = %post.id, error = %e, "Comments fetch failed");
                out.warnings.push(format!("Comments fetch failed: {e}"));
            }
        }

        // Profile viewers — unofficial endpoint, expected to fail often.
        out.api_calls_used += 1;
        match self.social.profile_viewers().await {
            Ok(viewers) => {
                for v in viewers {
                    if !seen.insert(v.profile_url.clone()) {
                        continue;
                    }
                    out.candidates.push(ProspectCandidate {
                        profile_url: v.profile_url,
                        provider_id: v.provider_id,
                        name: v.name,
                        headline: v.headline,
                        network_distance: v.network_distance,
                        engagement_type: EngagementType::ProfileView,
                        engagement_detail: "Viewed profile".to_string(),
                    });
                }
            }
            Err(e) => {
                info!(error = %e, "Profile viewers fetch failed (expected for this endpoint)");
                out.warnings
                    .push(format!("Profile viewers unavailable: {e}"));
            }
        }

        info!(
            candidates = out.candidates.len(),
            api_calls = out.api_calls_used,
            "Engagement collected"
        );
        out
    }
}

/// UTC bounds of "yesterday" (00:00:00 to 23:59:59.999…) in the given
/// local timezone. Half-open: start inclusive, end exclusive.
pub(crate) fn yesterday_window(now: DateTime<Utc>, tz: Tz) -> (DateTime<Utc>, DateTime<Utc>) {
    let yesterday = now.with_timezone(&tz).date_naive() - Duration::days(1);
    let midnight = yesterday.and_hms_opt(0, 0, 0).expect("midnight is a valid time");
    let start = match tz.from_local_datetime(&midnight).earliest() {
        Some(dt) => dt.with_timezone(&Utc),
        // Midnight skipped by a DST transition — fall back to UTC midnight
        None => Utc.from_utc_datetime(&midnight),
    };
    (start, start + Duration::days(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::America::Chicago;

    #[test]
    fn window_covers_the_local_previous_day() {
        // 2026-08-29 10:00 local (UTC-5 in August) = 15:00 UTC
        let now = Utc.with_ymd_and_hms(2026, 8, 29, 15, 0, 0).unwrap();
        let (start, end) = yesterday_window(now, Chicago);
        assert_eq!(start, Utc.with_ymd_and_hms(2026, 8, 28, 5, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2026, 8, 29, 5, 0, 0).unwrap());
    }

    #[test]
    fn window_respects_local_date_not_utc_date() {
        // 2026-08-29 23:00 local = 2026-08-30 04:00 UTC; local "yesterday"
        // is still the 28th even though UTC has rolled into the 30th.
        let now = Utc.with_ymd_and_hms(2026, 8, 30, 4, 0, 0).unwrap();
        let (start, _) = yesterday_window(now, Chicago);
        assert_eq!(start, Utc.with_ymd_and_hms(2026, 8, 28, 5, 0, 0).unwrap());
    }
}
