//! Utility helpers shared across client modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Pure derivations (number formatting, platform lookups, card metrics) kept
//! apart from state so they can be unit-tested without a store.

pub mod card_metrics;
pub mod formatters;
pub mod platforms;
