//! Plain-text and JSON rendering of card views for the terminal.

use client::util::card_metrics::{HealthScore, PERFORMANCE_HINT, ProjectCardView, TrendDirection};

/// One summary line per card.
#[must_use]
pub fn card_line(view: &ProjectCardView) -> String {
    if view.is_loading {
        return format!("{:<24} loading", view.slug);
    }

    let mut line = format!("{:<24} {}", view.slug, view.errors_label);
    if let Some(transactions) = &view.transactions_label {
        line.push_str(" | ");
        line.push_str(transactions);
        if view.zero_transactions {
            line.push_str(" (");
            line.push_str(PERFORMANCE_HINT);
            line.push(')');
        }
    }
    line.push_str("  crash free: ");
    line.push_str(&health_text(&view.health));
    line
}

fn health_text(health: &HealthScore) -> String {
    match health {
        HealthScore::Score { display, trend: None } => display.clone(),
        HealthScore::Score { display, trend: Some(trend) } => {
            let arrow = match trend.direction {
                TrendDirection::Up => '\u{2191}',
                TrendDirection::Down => '\u{2193}',
            };
            format!("{display} ({arrow}{})", trend.label)
        }
        HealthScore::MissingReleases => "set up releases".to_owned(),
        HealthScore::NotAvailable => "not available".to_owned(),
    }
}

/// Compact JSON for `--json` output.
///
/// # Errors
///
/// Returns an error if the view cannot be serialized.
pub fn card_json(view: &ProjectCardView) -> Result<String, serde_json::Error> {
    serde_json::to_string(view)
}

#[cfg(test)]
#[path = "output_test.rs"]
mod tests;
