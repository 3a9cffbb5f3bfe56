use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use growthdeck_common::Config;
use growthdeck_growth::classify::ClaudeInviteClassifier;
use growthdeck_growth::invitations::{InvitationConfig, InvitationProcessor};
use growthdeck_growth::prospector::{Prospector, ProspectorConfig};
use growthdeck_growth::store::SqliteStore;
use linkedin_client::LinkedInClient;

#[derive(Parser)]
#[command(name = "growthdeck", about = "LinkedIn growth pipelines")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Mine yesterday's post engagement into new leads.
    Prospect,
    /// Process pending inbound connection requests.
    Invitations,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();
    config.log_redacted();

    let store = SqliteStore::connect(&config.database_url).await?;
    let linkedin = LinkedInClient::new(
        config.linkedin_api_key.clone(),
        config.linkedin_account_id.clone(),
    );

    match cli.command {
        Command::Prospect => {
            let prospector = Prospector::new(
                &linkedin,
                &store,
                &store,
                ProspectorConfig::from_config(&config),
            );
            let results = prospector.run().await?;
            info!("{}", results.report());
        }
        Command::Invitations => {
            let classifier = ClaudeInviteClassifier::new(&config.anthropic_api_key);
            let processor = InvitationProcessor::new(
                &linkedin,
                &classifier,
                &store,
                &store,
                InvitationConfig::from_config(&config),
            );
            let results = processor.run().await?;
            info!("{}", results.report());
        }
    }

    Ok(())
}
