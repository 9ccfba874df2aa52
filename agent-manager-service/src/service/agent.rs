//! Agent Service
//!
//! Creates the platform component backing a new agent.

use agent_manager_client::{ClientError, PlatformApi};
use agent_manager_core::CoreError;
use agent_manager_core::codec;
use agent_manager_core::domain::buildpack::BuildpackLookup;
use agent_manager_core::domain::component::AgentDefinition;
use agent_manager_core::dto::agent::{AgentResponse, CreateAgentRequest};

use crate::service::build_service::validate_configuration;

/// Longest agent name the platform accepts (a DNS label)
const MAX_AGENT_NAME_LEN: usize = 63;

/// Service error type
#[derive(Debug)]
pub enum AgentError {
    ValidationError(String),
    Platform(ClientError),
    Conversion(CoreError),
}

impl From<ClientError> for AgentError {
    fn from(err: ClientError) -> Self {
        AgentError::Platform(err)
    }
}

impl From<CoreError> for AgentError {
    fn from(err: CoreError) -> Self {
        AgentError::Conversion(err)
    }
}

/// Create a new agent in a project
pub async fn create_agent(
    platform: &dyn PlatformApi,
    buildpacks: &dyn BuildpackLookup,
    org: &str,
    project: &str,
    req: CreateAgentRequest,
) -> Result<AgentResponse, AgentError> {
    validate_agent_name(&req.name)?;

    let agent = AgentDefinition::from(req);
    validate_configuration(&agent.build, agent.input_interface.as_ref())
        .map_err(AgentError::ValidationError)?;

    let request = codec::encode_component(&agent, buildpacks)?;
    let component = platform.create_component(org, project, &request).await?;

    tracing::info!(
        "Agent created: {}/{}/{} (workflow: {})",
        org,
        project,
        component.name,
        request.workflow.name
    );

    Ok(component.into())
}

/// Agent names become component names: lowercase DNS labels
fn validate_agent_name(name: &str) -> Result<(), AgentError> {
    let invalid = |reason: &str| {
        Err(AgentError::ValidationError(format!(
            "invalid agent name '{}': {}",
            name, reason
        )))
    };

    if name.is_empty() || name.len() > MAX_AGENT_NAME_LEN {
        return invalid("must be between 1 and 63 characters");
    }

    if !name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return invalid("only lowercase letters, digits and '-' are allowed");
    }

    if name.starts_with('-') || name.ends_with('-') {
        return invalid("must start and end with a letter or digit");
    }

    Ok(())
}
