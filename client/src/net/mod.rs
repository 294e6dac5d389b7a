//! Networking modules for the projects API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` fetches project stats and feeds the stats store, `config` reads the
//! API settings from the environment, and `types` defines the wire schema.

pub mod api;
pub mod config;
pub mod types;
