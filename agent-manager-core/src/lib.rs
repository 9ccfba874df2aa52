//! Agent Manager Core
//!
//! Core types and pure transformations for the agent manager build control plane.
//!
//! This crate contains:
//! - Domain types: build configuration, workflow runs and components as the platform reports them
//! - Codec: the round-trip between typed build configuration and the untyped workflow parameters document
//! - Build status projection and completion percentage
//! - DTOs: response and request bodies served by the agent manager API
//!
//! Nothing in here performs I/O.

pub mod codec;
pub mod commit;
pub mod domain;
pub mod dto;
pub mod error;
pub mod instrumentation;

pub use error::{CoreError, Result};
