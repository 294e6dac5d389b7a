//! Project stats keyed by project slug.
//!
//! DESIGN
//! ======
//! One store per dashboard, built by whoever composes the dashboard and
//! passed down to cards and the loader. Snapshots are whole `Project`
//! payloads as the API returns them; cards overlay them onto their own base
//! project.

#[cfg(test)]
#[path = "projects_stats_test.rs"]
mod projects_stats_test;

use store::KeyedObservableStore;

use crate::net::types::Project;

/// Store of loaded project payloads, keyed by slug.
pub type ProjectsStatsStore = KeyedObservableStore<Project>;

/// Create an empty stats store. Snapshots compare by value, so reloading
/// unchanged stats does not re-render any card.
#[must_use]
pub fn projects_stats_store() -> ProjectsStatsStore {
    KeyedObservableStore::new()
}

/// Publish a successful stats response as one store transition.
///
/// Returns the number of projects whose snapshot changed.
pub fn on_stats_load_success(store: &ProjectsStatsStore, projects: Vec<Project>) -> usize {
    store.publish_many(projects.into_iter().map(|project| (project.slug.clone(), project)))
}
