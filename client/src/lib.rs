//! # client
//!
//! Dashboard-side domain code for the projects overview: wire types for the
//! organization projects API, the projects stats store and the per-card
//! consumers built on it, the HTTP loader that feeds the store, and the
//! formatting that turns a project into card text.
//!
//! Rendering is not part of this crate. Anything that draws cards reads
//! [`state::project_card::ProjectCardContainer`] and its
//! [`util::card_metrics::ProjectCardView`].

pub mod net;
pub mod state;
pub mod util;
