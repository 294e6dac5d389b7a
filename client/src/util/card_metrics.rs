//! Display model for a project card.
//!
//! Reduces a (merged) project plus its organization to the numbers and
//! labels a card shows: error and transaction totals, the crash free score
//! with its trend, and the fallback shown when release health is missing.
//! Rendering is left to whatever draws the card.

#[cfg(test)]
#[path = "card_metrics_test.rs"]
mod card_metrics_test;

use serde::Serialize;

use crate::net::types::{Organization, Project, StatPoint};
use crate::util::formatters::{display_crash_free_percent, format_abbreviated_number, round_to};
use crate::util::platforms::supports_release_health;

/// Placeholder score when health data exists but no current rate does.
pub const NO_SCORE: &str = "\u{2014}";

/// Shown next to the transactions count while it is still zero.
pub const PERFORMANCE_HINT: &str = "Click here to learn more about performance monitoring";

/// Whether a crash free trend is an improvement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendStatus {
    Good,
    Bad,
}

/// Arrow shown next to the trend value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CrashFreeTrend {
    /// Current minus previous crash free rate, rounded to three decimals.
    pub value: f64,
    pub direction: TrendDirection,
    pub status: TrendStatus,
    /// Absolute change, e.g. `0.5%`.
    pub label: String,
}

/// What the crash free sessions slot of a card shows.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HealthScore {
    /// Health data exists: formatted score and, when both rates are known, a trend.
    Score { display: String, trend: Option<CrashFreeTrend> },
    /// No health data yet, but the platform supports releases.
    MissingReleases,
    /// No health data and the platform cannot report sessions.
    NotAvailable,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProjectCardView {
    pub id: String,
    pub slug: String,
    /// True until the error series has been loaded.
    pub is_loading: bool,
    pub total_errors: u64,
    pub total_transactions: u64,
    pub has_performance: bool,
    pub has_first_event: bool,
    pub errors_label: String,
    pub errors_link: String,
    /// Only for organizations with performance.
    pub transactions_label: Option<String>,
    pub transactions_link: Option<String>,
    /// Performance is enabled but no transactions were recorded in the period.
    pub zero_transactions: bool,
    pub health: HealthScore,
}

impl ProjectCardView {
    #[must_use]
    pub fn new(project: &Project, organization: &Organization) -> Self {
        let has_performance = organization.has_performance();
        let total_errors = series_total(project.stats.as_deref());
        let total_transactions = series_total(project.transaction_stats.as_deref());

        let (transactions_label, transactions_link) = if has_performance {
            (
                Some(format!("transactions: {}", abbreviate(total_transactions))),
                Some(format!(
                    "/organizations/{}/performance/?project={}",
                    organization.slug, project.id
                )),
            )
        } else {
            (None, None)
        };

        Self {
            id: project.id.clone(),
            slug: project.slug.clone(),
            is_loading: project.stats.is_none(),
            total_errors,
            total_transactions,
            has_performance,
            has_first_event: has_first_event(project),
            errors_label: format!("errors: {}", abbreviate(total_errors)),
            errors_link: format!(
                "/organizations/{}/issues/?project={}",
                organization.slug, project.id
            ),
            transactions_label,
            transactions_link,
            zero_transactions: has_performance && total_transactions == 0,
            health: health_score(project),
        }
    }
}

/// Sum of counts in a series; zero when the series is absent.
#[must_use]
pub fn series_total(series: Option<&[StatPoint]>) -> u64 {
    series.map_or(0, |points| points.iter().map(|(_, count)| *count).sum())
}

#[must_use]
pub fn has_first_event(project: &Project) -> bool {
    project.first_event.is_some() || project.first_transaction_event
}

/// Change in crash free rate since the previous period, rounded to three
/// decimals. `None` unless both rates are known.
#[must_use]
pub fn crash_free_trend(project: &Project) -> Option<f64> {
    let session = project.session_stats.as_ref()?;
    let current = session.current_crash_free_rate?;
    let previous = session.previous_crash_free_rate?;
    Some(round_to(current - previous, 3))
}

fn health_score(project: &Project) -> HealthScore {
    let session = project.session_stats.as_ref();
    if session.is_some_and(|s| s.has_health_data) {
        let current = session.and_then(|s| s.current_crash_free_rate);
        let display = current.map_or_else(|| NO_SCORE.to_owned(), display_crash_free_percent);
        let trend = current.and(crash_free_trend(project)).map(|value| CrashFreeTrend {
            value,
            direction: if value >= 0.0 { TrendDirection::Up } else { TrendDirection::Down },
            status: if value > 0.0 { TrendStatus::Good } else { TrendStatus::Bad },
            label: format!("{}%", format_abbreviated_number(value.abs())),
        });
        return HealthScore::Score { display, trend };
    }

    match project.platform.as_deref() {
        Some(platform) if supports_release_health(platform) => HealthScore::MissingReleases,
        _ => HealthScore::NotAvailable,
    }
}

#[allow(clippy::cast_precision_loss)]
fn abbreviate(count: u64) -> String {
    format_abbreviated_number(count as f64)
}
