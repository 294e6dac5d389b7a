//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! `projects_stats` owns the keyed store of loaded projects; `project_card`
//! holds the per-card view state that listens to it.

pub mod project_card;
pub mod projects_stats;
