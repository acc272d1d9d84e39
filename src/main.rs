use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use gitcensus::{CollectorConfig, Collector, Config, Exporter, GitHubClient};

#[derive(Parser, Debug)]
#[command(name = "gitcensus")]
#[command(version)]
#[command(about = "Collect GitHub users and repositories for a city")]
struct Args {
    /// City to search for (matched against the profile location)
    #[arg(short, long)]
    location: Option<String>,

    /// Minimum follower count
    #[arg(long)]
    min_followers: Option<u32>,

    /// Maximum number of users to collect
    #[arg(long)]
    max_users: Option<usize>,

    /// Maximum number of repositories per user
    #[arg(long)]
    max_repos: Option<usize>,

    /// Items requested per page (1-100)
    #[arg(long)]
    per_page: Option<u32>,

    /// Delay after each successful request, in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Directory for users.csv, repositories.csv and raw_data.json
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Exit with an error if any user or page had to be skipped
    #[arg(long)]
    fail_on_incomplete: bool,
}

impl Args {
    fn apply(self, mut config: Config) -> gitcensus::Result<Config> {
        if let Some(location) = self.location {
            config.location = location;
        }
        if let Some(min_followers) = self.min_followers {
            config.min_followers = min_followers;
        }
        if let Some(max_users) = self.max_users {
            config.max_users = max_users;
        }
        if let Some(max_repos) = self.max_repos {
            config.max_repos_per_user = max_repos;
        }
        if let Some(per_page) = self.per_page {
            config.per_page = per_page;
        }
        if let Some(delay_ms) = self.delay_ms {
            config.request_delay = Duration::from_millis(delay_ms);
        }
        if let Some(output_dir) = self.output_dir {
            config.output_dir = output_dir;
        }
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("gitcensus=info".parse()?)
                .add_directive("reqwest=warn".parse()?),
        )
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let args = Args::parse();
    let fail_on_incomplete = args.fail_on_incomplete;

    // Load configuration
    let config = args.apply(Config::from_env()?)?;

    let github = GitHubClient::new(&config.api())?;
    tracing::debug!(
        "Throttling {:?} after each request",
        github.rate_limiter().delay()
    );

    let collector = Collector::new(github, CollectorConfig::from(&config)).with_progress(true);
    let collection = collector.collect(&config.criteria()).await;

    let summary = Exporter::new(&config.output_dir).export(&collection)?;
    let files: Vec<String> = summary
        .written()
        .iter()
        .map(|p| p.display().to_string())
        .collect();

    let report = &collection.report;
    if report.is_complete() {
        tracing::info!("Data collection completed: {}", report);
    } else {
        tracing::warn!("Data collection finished with gaps: {}", report);
        for skipped in &report.skipped_users {
            tracing::warn!("  skipped {}: {}", skipped.login, skipped.reason);
        }
        for listing in &report.truncated_listings {
            tracing::warn!(
                "  repositories of {} cut short after {}: {}",
                listing.login,
                listing.repos_collected,
                listing.reason
            );
        }
    }
    tracing::info!("Files saved: {}", files.join(", "));

    if fail_on_incomplete && !report.is_complete() {
        anyhow::bail!("collection incomplete: {}", report);
    }

    Ok(())
}
