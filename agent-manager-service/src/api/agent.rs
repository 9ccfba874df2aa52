//! Agent API Handlers

use agent_manager_core::dto::agent::{AgentResponse, CreateAgentRequest};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::api::AppState;
use crate::api::error::ApiResult;
use crate::service::agent_service;

/// POST /api/v1/orgs/{org}/projects/{project}/agents
/// Create a new agent
pub async fn create_agent(
    State(state): State<AppState>,
    Path((org, project)): Path<(String, String)>,
    Json(req): Json<CreateAgentRequest>,
) -> ApiResult<(StatusCode, Json<AgentResponse>)> {
    tracing::info!("Creating agent {} in {}/{}", req.name, org, project);

    let agent = agent_service::create_agent(
        state.platform.as_ref(),
        state.buildpacks.as_ref(),
        &org,
        &project,
        req,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(agent)))
}
