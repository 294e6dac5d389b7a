//! Per-card view state fed by the projects stats store.
//!
//! DESIGN
//! ======
//! A card seeds its details from `get_state()` when it attaches, then
//! subscribes for later changes. Every notification carries the whole
//! mapping; the card filters to its own slug and applies the store's equality
//! rule, so a publish for another project, or a reload with the same payload,
//! never bumps its revision. Detaching disposes the subscription exactly
//! once; dropping the container detaches it.

#[cfg(test)]
#[path = "project_card_test.rs"]
mod project_card_test;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use store::{Equality, StateMap, Subscription};

use crate::net::types::{Organization, Project};
use crate::state::projects_stats::ProjectsStatsStore;
use crate::util::card_metrics::ProjectCardView;

#[derive(Debug, Default)]
struct CardLocal {
    project_details: Option<Project>,
    revision: u64,
}

/// Card container for one project.
#[derive(Debug)]
pub struct ProjectCardContainer {
    project: Project,
    local: Arc<Mutex<CardLocal>>,
    subscription: Subscription,
}

impl ProjectCardContainer {
    /// Seed from the current store state and subscribe for changes.
    #[must_use]
    pub fn attach(store: &ProjectsStatsStore, project: Project) -> Self {
        let initial = store.get_state().get(&project.slug).cloned();
        let local = Arc::new(Mutex::new(CardLocal { project_details: initial, revision: 0 }));

        let slug = project.slug.clone();
        let sink = Arc::clone(&local);
        let same = store.equality();
        let subscription = store.subscribe(move |items| {
            apply_store_update(&sink, &slug, items, &same);
        });

        let seeded = local_guard(&local).project_details.is_some();
        tracing::trace!(slug = %project.slug, seeded, "project card attached");
        Self { project, local, subscription }
    }

    /// Stop listening to the store. Later calls are no-ops.
    pub fn detach(&mut self) {
        if self.subscription.is_active() {
            self.subscription.dispose();
            tracing::trace!(slug = %self.project.slug, "project card detached");
        }
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.subscription.is_active()
    }

    #[must_use]
    pub fn slug(&self) -> &str {
        &self.project.slug
    }

    /// Loaded details for this card's project, if any arrived.
    #[must_use]
    pub fn details(&self) -> Option<Project> {
        local_guard(&self.local).project_details.clone()
    }

    /// Number of accepted detail updates since attach.
    #[must_use]
    pub fn revision(&self) -> u64 {
        local_guard(&self.local).revision
    }

    /// Base project with loaded details overlaid.
    #[must_use]
    pub fn project(&self) -> Project {
        self.project.merged_with(local_guard(&self.local).project_details.as_ref())
    }

    #[must_use]
    pub fn view(&self, organization: &Organization) -> ProjectCardView {
        ProjectCardView::new(&self.project(), organization)
    }
}

fn local_guard(local: &Mutex<CardLocal>) -> MutexGuard<'_, CardLocal> {
    local.lock().unwrap_or_else(PoisonError::into_inner)
}

fn apply_store_update(
    local: &Mutex<CardLocal>,
    slug: &str,
    items: &StateMap<Project>,
    same: &Equality<Project>,
) -> bool {
    let Some(incoming) = items.get(slug) else {
        return false;
    };
    let mut local = local_guard(local);
    if local.project_details.as_ref().is_some_and(|held| same(held, incoming)) {
        return false;
    }
    local.project_details = Some(incoming.clone());
    local.revision += 1;
    tracing::debug!(slug, revision = local.revision, "project card updated");
    true
}
