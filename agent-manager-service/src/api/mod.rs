//! API Module
//!
//! HTTP API layer for the agent manager.
//! Each submodule handles endpoints for a specific domain.

pub mod agent;
pub mod build;
pub mod error;
pub mod health;

use std::sync::Arc;

use agent_manager_client::PlatformApi;
use agent_manager_core::domain::buildpack::BuildpackLookup;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::config::InstrumentationConfig;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub platform: Arc<dyn PlatformApi>,
    pub buildpacks: Arc<dyn BuildpackLookup>,
    pub instrumentation: InstrumentationConfig,
}

/// Create the main API router with all endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Agent endpoints
        .route(
            "/api/v1/orgs/{org}/projects/{project}/agents",
            post(agent::create_agent),
        )
        // Build endpoints
        .route(
            "/api/v1/orgs/{org}/projects/{project}/agents/{agent}/builds",
            post(build::trigger_build).get(build::list_builds),
        )
        .route(
            "/api/v1/orgs/{org}/projects/{project}/agents/{agent}/builds/{build}",
            get(build::get_build),
        )
        .route(
            "/api/v1/orgs/{org}/projects/{project}/agents/{agent}/build-parameters",
            get(build::get_build_parameters).put(build::update_build_parameters),
        )
        // Add state and middleware
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
