//! Service Module
//!
//! Business logic layer for the agent manager.
//! Services call the platform through [`PlatformApi`](agent_manager_client::PlatformApi)
//! and use the core codec and projections to shape its records.

pub mod agent;
pub mod build;
#[cfg(test)]
pub mod fake;

// Re-export for convenience
pub use agent as agent_service;
pub use build as build_service;
