mod cli;
mod output;
mod poll;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use client::net::api::{ApiError, HttpStatsFetcher, StatsLoader, StatsQuery};
use client::net::config::ApiConfig;
use client::net::types::{Organization, PERFORMANCE_FEATURE};
use client::state::project_card::ProjectCardContainer;
use client::state::projects_stats::projects_stats_store;

use cli::{Cli, Command, ProjectsSubcommand, StatsArgs};
use poll::PollPlan;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("invalid JSON output: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("output write failed: {0}")]
    Output(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
struct CliContext {
    config: ApiConfig,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let mut config = ApiConfig::from_env()?;
    if let Some(base_url) = cli.base_url {
        config = config.with_base_url(&base_url)?;
    }
    if cli.auth_token.is_some() {
        config.auth_token = cli.auth_token;
    }
    let ctx = CliContext { config };

    match cli.command {
        Command::Projects(projects) => match projects.command {
            ProjectsSubcommand::Stats(args) => run_project_stats(&ctx, args).await,
        },
    }
}

async fn run_project_stats(ctx: &CliContext, args: StatsArgs) -> Result<(), CliError> {
    let mut features = args.features;
    if args.performance && !features.iter().any(|f| f == PERFORMANCE_FEATURE) {
        features.push(PERFORMANCE_FEATURE.to_owned());
    }
    let org = Organization { slug: args.org, features };
    let stats_period = args.stats_period.unwrap_or_else(|| ctx.config.stats_period.clone());
    let query = StatsQuery::for_organization(&org, &stats_period);

    let store = projects_stats_store();
    let fetcher = Arc::new(HttpStatsFetcher::new(&ctx.config)?);
    let loader = StatsLoader::new(fetcher, store.clone())
        .with_retry(ctx.config.fetch_retries, Duration::from_millis(ctx.config.retry_backoff_ms));

    let mut cards: Vec<ProjectCardContainer> = args
        .projects
        .iter()
        .map(|project| ProjectCardContainer::attach(&store, project.to_project()))
        .collect();
    let project_ids: Vec<String> = args.projects.iter().map(|p| p.id.clone()).collect();
    let plan = PollPlan {
        rounds: args.rounds,
        interval: Duration::from_secs(args.interval_secs),
        json: args.json,
    };

    let result = poll::run_rounds(
        &loader,
        &org,
        &query,
        &cards,
        &project_ids,
        plan,
        &mut std::io::stdout(),
    )
    .await;

    for card in &mut cards {
        card.detach();
    }
    result
}
