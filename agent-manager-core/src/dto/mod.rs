//! Data Transfer Objects served by the agent manager API
//!
//! Request and response bodies exchanged with API consumers. Field names are
//! camelCase on the wire to match the console.

pub mod agent;
pub mod build;
