//! Load rounds for `projects stats`.
//!
//! Each round queues every project, flushes the loader once, and prints the
//! cards whose revision moved since they were last printed. A card whose
//! stats came back unchanged is not printed again. The first round must
//! succeed; later failures are logged and the cards keep what they had.

#[cfg(test)]
#[path = "poll_test.rs"]
mod poll_test;

use std::io::Write;
use std::time::Duration;

use client::net::api::{StatsLoader, StatsQuery};
use client::net::types::Organization;
use client::state::project_card::ProjectCardContainer;

use crate::CliError;
use crate::output;

/// How many rounds to run and how to print them.
#[derive(Debug, Clone, Copy)]
pub struct PollPlan {
    pub rounds: u32,
    pub interval: Duration,
    pub json: bool,
}

/// Run `plan.rounds` load rounds, writing changed cards to `out`.
///
/// # Errors
///
/// Returns the first round's load error, or any write/serialize error.
pub async fn run_rounds<W: Write>(
    loader: &StatsLoader,
    org: &Organization,
    query: &StatsQuery,
    cards: &[ProjectCardContainer],
    project_ids: &[String],
    plan: PollPlan,
    out: &mut W,
) -> Result<(), CliError> {
    let mut printed: Vec<Option<u64>> = vec![None; cards.len()];

    for round in 1..=plan.rounds {
        if round > 1 && !plan.interval.is_zero() {
            tokio::time::sleep(plan.interval).await;
        }
        for id in project_ids {
            loader.enqueue(id.clone());
        }

        match loader.flush(&org.slug, query).await {
            Ok(changed) => {
                tracing::info!(round, changed, org = %org.slug, "project stats round complete");
            }
            Err(e) if round > 1 => {
                tracing::warn!(round, error = %e, "stats round failed; keeping previous cards");
                continue;
            }
            Err(e) => return Err(e.into()),
        }

        for (card, last) in cards.iter().zip(printed.iter_mut()) {
            let revision = card.revision();
            if *last == Some(revision) {
                continue;
            }
            *last = Some(revision);
            let view = card.view(org);
            if plan.json {
                writeln!(out, "{}", output::card_json(&view)?)?;
            } else {
                writeln!(out, "{}", output::card_line(&view))?;
            }
        }
    }
    Ok(())
}
