//! Pure classifiers for the growth pipelines.
//!
//! Country allow-listing, founder/title detection, AI-competitor exclusion,
//! and ICP categorization. Zero I/O — these are the rules most likely to
//! need tuning, so they live apart from pipeline control flow and are
//! independently testable.

use regex::Regex;
use std::sync::LazyLock;

use growthdeck_common::types::{ExperienceEntry, Icp};

// ---------------------------------------------------------------------------
// Country allow-listing
// ---------------------------------------------------------------------------

static INVITER_LOCATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(united states|usa|u\.s\.|america|canada|united kingdom|uk|england|scotland|wales|ireland|australia|new zealand|singapore|new york|los angeles|san francisco|chicago|boston|austin|miami|seattle|denver|atlanta|dallas|toronto|vancouver|montreal|london|manchester|dublin|sydney|melbourne|brisbane|perth|auckland|wellington)\b",
    )
    .unwrap()
});

static PROSPECT_LOCATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(united states|usa|u\.s\.|america|canada|united kingdom|uk|england|scotland|wales|australia|new zealand|new york|los angeles|san francisco|chicago|boston|austin|miami|seattle|denver|atlanta|dallas|toronto|vancouver|montreal|london|manchester|sydney|melbourne|brisbane|perth|auckland|wellington)\b",
    )
    .unwrap()
});

/// A fixed market allow-list: structured locale country codes plus free-text
/// city/country patterns for profiles where the provider gives no code.
pub struct CountryAllowlist {
    codes: &'static [&'static str],
    location_re: &'static LazyLock<Regex>,
}

/// Broad English-speaking-market set used by the invitation processor.
pub static INVITER_COUNTRIES: CountryAllowlist = CountryAllowlist {
    codes: &["US", "CA", "GB", "UK", "IE", "AU", "NZ", "SG"],
    location_re: &INVITER_LOCATION_RE,
};

/// Five-code set used by the prospector.
pub static PROSPECT_COUNTRIES: CountryAllowlist = CountryAllowlist {
    codes: &["US", "CA", "GB", "AU", "NZ"],
    location_re: &PROSPECT_LOCATION_RE,
};

/// Country gate. Prefers the structured locale code when the provider
/// supplies one; falls back to free-text pattern matching. Unknown or
/// unparseable location → not allowed (fail closed).
pub fn is_allowed_country(
    locale: Option<&str>,
    location: &str,
    allowlist: &CountryAllowlist,
) -> bool {
    if let Some(code) = locale {
        let code = code.trim().to_uppercase();
        if !code.is_empty() {
            return allowlist.codes.iter().any(|c| *c == code);
        }
    }

    let location = location.trim();
    if location.is_empty() {
        return false;
    }
    allowlist.location_re.is_match(location)
}

// ---------------------------------------------------------------------------
// Founder detection
// ---------------------------------------------------------------------------

static FOUNDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(founder|co-?founder|ceo|chief executive|owner|cto|coo|cmo|cfo|chief (technology|operating|marketing|financial) officer|managing director|president)\b",
    )
    .unwrap()
});

static FOUNDER_EXCLUDE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(student|intern|internship|aspiring|seeking|looking for|open to work|junior)\b")
        .unwrap()
});

/// Headline must match a founder/C-suite title and must NOT match the
/// exclusion pattern. Exclusion takes precedence: "Founder, ex-intern at X"
/// is rejected.
pub fn is_likely_founder(headline: &str) -> bool {
    if FOUNDER_EXCLUDE_RE.is_match(headline) {
        return false;
    }
    FOUNDER_RE.is_match(headline)
}

// ---------------------------------------------------------------------------
// AI-competitor exclusion
// ---------------------------------------------------------------------------

static AI_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\bA\.?I\.?\b|(?i:\b(artificial intelligence|machine learning|deep learning|neural network|generative ai|genai|llms?|gpt|chatbots?|ai[- ](agents?|automation|powered|driven|startup|company|tools?))\b)",
    )
    .unwrap()
});

/// True if the headline or any experience entry reads like an AI/ML
/// company. Used to keep likely competitors out of the lead list.
pub fn is_ai_company(headline: &str, experience: &[ExperienceEntry]) -> bool {
    if AI_RE.is_match(headline) {
        return true;
    }
    experience.iter().any(|entry| {
        let text = format!("{} {} {}", entry.company, entry.title, entry.description);
        AI_RE.is_match(&text)
    })
}

// ---------------------------------------------------------------------------
// ICP categorization
// ---------------------------------------------------------------------------

static COACHING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(coach|coaching|consultant|consulting|consultancy|mentor|mentorship|advisor|advisory|course creator|keynote|speaker|trainer|facilitator|mastermind)\b",
    )
    .unwrap()
});

static AGENCY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(marketing|agency|agencies|brand|branding|seo|paid media|ads|advertising|creative studio|growth|funnels?|copywriting|content studio|media buying)\b",
    )
    .unwrap()
});

/// Crude bag-of-keywords ICP classifier: count matches for each keyword set
/// over the concatenated profile text; the strictly higher count wins, and a
/// tie (including zero matches) defaults to the agency ICP. No weighting,
/// no stemming.
pub fn categorize_icp(profile_text: &str) -> Icp {
    let coaching = COACHING_RE.find_iter(profile_text).count();
    let agency = AGENCY_RE.find_iter(profile_text).count();
    if coaching > agency {
        Icp::CoachingConsulting
    } else {
        Icp::MarketingAgency
    }
}

// ===========================================================================
// Unit tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn experience(company: &str, title: &str, description: &str) -> ExperienceEntry {
        ExperienceEntry {
            company: company.to_string(),
            title: title.to_string(),
            description: description.to_string(),
        }
    }

    // --- country gate ---

    #[test]
    fn locale_code_wins_over_location_text() {
        // Code says Germany even though the text mentions London
        assert!(!is_allowed_country(
            Some("DE"),
            "London expat in Berlin",
            &INVITER_COUNTRIES
        ));
        assert!(is_allowed_country(Some("US"), "", &INVITER_COUNTRIES));
    }

    #[test]
    fn free_text_matches_city_and_country_names() {
        assert!(is_allowed_country(None, "Austin, Texas, United States", &PROSPECT_COUNTRIES));
        assert!(is_allowed_country(None, "Greater Sydney Area", &PROSPECT_COUNTRIES));
        assert!(is_allowed_country(None, "London, England", &INVITER_COUNTRIES));
    }

    #[test]
    fn unknown_location_fails_closed() {
        assert!(!is_allowed_country(None, "", &INVITER_COUNTRIES));
        assert!(!is_allowed_country(None, "   ", &INVITER_COUNTRIES));
        assert!(!is_allowed_country(None, "Planet Earth", &INVITER_COUNTRIES));
        assert!(!is_allowed_country(Some(""), "", &INVITER_COUNTRIES));
    }

    #[test]
    fn germany_not_in_either_allowlist() {
        assert!(!is_allowed_country(None, "Berlin, Germany", &INVITER_COUNTRIES));
        assert!(!is_allowed_country(None, "Berlin, Germany", &PROSPECT_COUNTRIES));
        assert!(!is_allowed_country(Some("DE"), "Berlin, Germany", &INVITER_COUNTRIES));
    }

    #[test]
    fn prospect_list_is_narrower_than_inviter_list() {
        assert!(is_allowed_country(Some("IE"), "Dublin", &INVITER_COUNTRIES));
        assert!(!is_allowed_country(Some("IE"), "Dublin", &PROSPECT_COUNTRIES));
    }

    // --- founder detection ---

    #[test]
    fn founder_titles_match() {
        assert!(is_likely_founder("Founder & CEO at Acme"));
        assert!(is_likely_founder("Co-Founder, Brightside Consulting"));
        assert!(is_likely_founder("Managing Director | Growth Partners"));
        assert!(is_likely_founder("President and Owner, Smith & Sons"));
        assert!(is_likely_founder("CTO at a stealth startup"));
    }

    #[test]
    fn non_founder_titles_do_not_match() {
        assert!(!is_likely_founder("Senior Software Engineer at Acme"));
        assert!(!is_likely_founder("Head of Sales"));
        assert!(!is_likely_founder(""));
    }

    #[test]
    fn exclusion_takes_precedence() {
        assert!(!is_likely_founder("Founder, ex-intern at BigCo"));
        assert!(!is_likely_founder("Aspiring CEO | MBA Student"));
        assert!(!is_likely_founder("CEO-track junior associate"));
        assert!(!is_likely_founder("Owner (seeking new opportunities)"));
    }

    // --- AI-company exclusion ---

    #[test]
    fn ai_headline_matches() {
        assert!(is_ai_company("Building AI agents for sales teams", &[]));
        assert!(is_ai_company("Founder @ GPT-powered analytics", &[]));
        assert!(is_ai_company("We do Machine Learning consulting", &[]));
    }

    #[test]
    fn ai_experience_matches() {
        let exp = vec![
            experience("Acme Corp", "CEO", "B2B logistics"),
            experience("DeepThought Labs", "Advisor", "Large language models (LLMs) for legal"),
        ];
        assert!(is_ai_company("CEO at Acme Corp", &exp));
    }

    #[test]
    fn plain_business_does_not_match() {
        let exp = vec![experience("Smith Roofing", "Owner", "Residential roofing")];
        assert!(!is_ai_company("Owner at Smith Roofing", &exp));
        // lowercase "ai" inside a word must not trigger
        assert!(!is_ai_company("Dairy farm maintenance", &[]));
    }

    // --- ICP categorization ---

    #[test]
    fn coaching_majority_wins() {
        // 3 coaching hits vs 1 agency hit
        let text = "Executive coach and consultant. I run a mentorship program \
                    and help with marketing strategy.";
        assert_eq!(categorize_icp(text), Icp::CoachingConsulting);
    }

    #[test]
    fn agency_majority_wins() {
        let text = "We are a branding agency doing SEO and paid media for one coach.";
        assert_eq!(categorize_icp(text), Icp::MarketingAgency);
    }

    #[test]
    fn tie_and_zero_default_to_agency() {
        assert_eq!(categorize_icp(""), Icp::MarketingAgency);
        assert_eq!(categorize_icp("coach at a marketing firm"), Icp::MarketingAgency);
    }
}
