//! Command-line arguments for the `dashboard` binary.

use clap::{Args, Parser, Subcommand};
use client::net::types::Project;

#[derive(Parser, Debug)]
#[command(name = "dashboard", about = "Projects dashboard stats CLI")]
pub struct Cli {
    /// Overrides `DASHBOARD_BASE_URL`.
    #[arg(long, env = "DASHBOARD_BASE_URL")]
    pub base_url: Option<String>,

    /// Overrides `DASHBOARD_AUTH_TOKEN`.
    #[arg(long, env = "DASHBOARD_AUTH_TOKEN", hide_env_values = true)]
    pub auth_token: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Projects(ProjectsCommand),
}

#[derive(Args, Debug)]
pub struct ProjectsCommand {
    #[command(subcommand)]
    pub command: ProjectsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ProjectsSubcommand {
    /// Load stats for projects and print one card summary per project.
    Stats(StatsArgs),
}

#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Organization slug.
    #[arg(long)]
    pub org: String,

    /// Organization feature flags, e.g. `performance-view`.
    #[arg(long = "feature")]
    pub features: Vec<String>,

    /// Shorthand for `--feature performance-view`.
    #[arg(long, default_value_t = false)]
    pub performance: bool,

    /// Overrides `DASHBOARD_STATS_PERIOD`.
    #[arg(long)]
    pub stats_period: Option<String>,

    /// Print card views as JSON lines.
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Number of load rounds. Cards are reprinted only when their stats change.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub rounds: u32,

    /// Pause between rounds.
    #[arg(long, default_value_t = 30)]
    pub interval_secs: u64,

    /// Projects as `ID:SLUG`.
    #[arg(required = true, value_parser = parse_project_ref)]
    pub projects: Vec<ProjectRef>,
}

/// A project named on the command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectRef {
    pub id: String,
    pub slug: String,
}

impl ProjectRef {
    /// Base project a card starts from before stats arrive.
    #[must_use]
    pub fn to_project(&self) -> Project {
        Project {
            id: self.id.clone(),
            slug: self.slug.clone(),
            name: self.slug.clone(),
            ..Project::default()
        }
    }
}

/// Parse `ID:SLUG`.
pub fn parse_project_ref(raw: &str) -> Result<ProjectRef, String> {
    let Some((id, slug)) = raw.split_once(':') else {
        return Err(format!("expected ID:SLUG, got `{raw}`"));
    };
    let (id, slug) = (id.trim(), slug.trim());
    if id.is_empty() || slug.is_empty() {
        return Err(format!("expected ID:SLUG, got `{raw}`"));
    }
    Ok(ProjectRef { id: id.to_owned(), slug: slug.to_owned() })
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
