//! Build API Handlers
//!
//! HTTP endpoints for triggering, polling and listing agent builds, and for
//! the build parameters configured on an agent.

use agent_manager_core::domain::component::ComponentRef;
use agent_manager_core::dto::agent::{BuildParametersResponse, UpdateBuildParametersRequest};
use agent_manager_core::dto::build::{BuildDetailsResponse, BuildResponse, TriggerBuildQuery};
use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::api::AppState;
use crate::api::error::ApiResult;
use crate::service::build_service;

// =============================================================================
// Build Endpoints
// =============================================================================

/// POST /api/v1/orgs/{org}/projects/{project}/agents/{agent}/builds
/// Trigger a build, optionally pinned to `?commitId=`
pub async fn trigger_build(
    State(state): State<AppState>,
    Path((org, project, agent)): Path<(String, String, String)>,
    Query(query): Query<TriggerBuildQuery>,
) -> ApiResult<Json<BuildDetailsResponse>> {
    let agent = ComponentRef::new(org, project, agent);
    tracing::info!("Triggering build for agent: {}", agent);

    let build =
        build_service::trigger_build(state.platform.as_ref(), &agent, query.commit_id.as_deref())
            .await?;

    Ok(Json(build))
}

/// GET /api/v1/orgs/{org}/projects/{project}/agents/{agent}/builds/{build}
/// Get build details with pipeline steps and progress
pub async fn get_build(
    State(state): State<AppState>,
    Path((org, project, agent, build)): Path<(String, String, String, String)>,
) -> ApiResult<Json<BuildDetailsResponse>> {
    let agent = ComponentRef::new(org, project, agent);
    tracing::debug!("Getting build {} of agent {}", build, agent);

    let build = build_service::get_build(state.platform.as_ref(), &agent, &build).await?;
    Ok(Json(build))
}

/// GET /api/v1/orgs/{org}/projects/{project}/agents/{agent}/builds
/// List builds of an agent, newest first
pub async fn list_builds(
    State(state): State<AppState>,
    Path((org, project, agent)): Path<(String, String, String)>,
) -> ApiResult<Json<Vec<BuildResponse>>> {
    let agent = ComponentRef::new(org, project, agent);
    tracing::debug!("Listing builds of agent: {}", agent);

    let builds = build_service::list_builds(state.platform.as_ref(), &agent).await?;
    Ok(Json(builds))
}

// =============================================================================
// Build Parameter Endpoints
// =============================================================================

/// GET /api/v1/orgs/{org}/projects/{project}/agents/{agent}/build-parameters
pub async fn get_build_parameters(
    State(state): State<AppState>,
    Path((org, project, agent)): Path<(String, String, String)>,
) -> ApiResult<Json<BuildParametersResponse>> {
    let agent = ComponentRef::new(org, project, agent);
    tracing::debug!("Getting build parameters of agent: {}", agent);

    let params = build_service::get_build_parameters(
        state.platform.as_ref(),
        &state.instrumentation,
        &agent,
    )
    .await?;

    Ok(Json(params))
}

/// PUT /api/v1/orgs/{org}/projects/{project}/agents/{agent}/build-parameters
/// Replace the build parameters of an agent
pub async fn update_build_parameters(
    State(state): State<AppState>,
    Path((org, project, agent)): Path<(String, String, String)>,
    Json(req): Json<UpdateBuildParametersRequest>,
) -> ApiResult<Json<BuildParametersResponse>> {
    let agent = ComponentRef::new(org, project, agent);
    tracing::info!("Updating build parameters of agent: {}", agent);

    let params = build_service::update_build_parameters(
        state.platform.as_ref(),
        state.buildpacks.as_ref(),
        &state.instrumentation,
        &agent,
        req,
    )
    .await?;

    Ok(Json(params))
}
