use std::env;

use chrono_tz::Tz;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // LinkedIn API provider
    pub linkedin_api_key: String,
    /// The account owner's provider identifier. No identity, no run.
    pub linkedin_account_id: String,

    // LLM classification
    pub anthropic_api_key: String,

    // Persistence
    pub database_url: String,

    /// Local timezone for the "yesterday" post window.
    pub report_timezone: Tz,

    /// Expensive-call cap per prospector run.
    pub profile_budget: u32,
    /// Invitation cap per processor run.
    pub max_invitations_per_run: u32,
}

impl Config {
    /// Load configuration from environment variables.
    /// Panics with a clear message if required vars are missing.
    pub fn from_env() -> Self {
        Self {
            linkedin_api_key: required_env("LINKEDIN_API_KEY"),
            linkedin_account_id: required_env("LINKEDIN_ACCOUNT_ID"),
            anthropic_api_key: required_env("ANTHROPIC_API_KEY"),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:growthdeck.db?mode=rwc".to_string()),
            report_timezone: env::var("REPORT_TIMEZONE")
                .unwrap_or_else(|_| "America/Chicago".to_string())
                .parse()
                .expect("REPORT_TIMEZONE must be a valid IANA timezone name"),
            profile_budget: env::var("PROFILE_BUDGET")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .expect("PROFILE_BUDGET must be a number"),
            max_invitations_per_run: env::var("MAX_INVITATIONS_PER_RUN")
                .unwrap_or_else(|_| "25".to_string())
                .parse()
                .expect("MAX_INVITATIONS_PER_RUN must be a number"),
        }
    }

    /// Log the loaded configuration with secrets masked.
    pub fn log_redacted(&self) {
        tracing::info!(
            linkedin_api_key = %mask(&self.linkedin_api_key),
            linkedin_account_id = %self.linkedin_account_id,
            anthropic_api_key = %mask(&self.anthropic_api_key),
            database_url = %self.database_url,
            report_timezone = %self.report_timezone,
            profile_budget = self.profile_budget,
            max_invitations_per_run = self.max_invitations_per_run,
            "Config loaded"
        );
    }
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}

fn mask(secret: &str) -> String {
    let mut chars = secret.chars();
    let prefix: String = chars.by_ref().take(4).collect();
    if chars.next().is_none() {
        return "****".to_string();
    }
    format!("{prefix}****")
}
