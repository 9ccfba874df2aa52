//! Core domain types
//!
//! These types describe builds the way the agent manager reasons about them,
//! plus the platform records (workflow runs, components) they are derived from.
//! Platform records are only read and transformed here, never persisted.

pub mod build;
pub mod buildpack;
pub mod component;
pub mod workflow;
