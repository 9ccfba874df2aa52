//! Build Service
//!
//! Triggers builds on the platform and projects its workflow runs into build
//! views. Also reads and rewrites the build parameters stored on an agent's
//! component.

use agent_manager_client::{ClientError, PlatformApi};
use agent_manager_core::CoreError;
use agent_manager_core::codec;
use agent_manager_core::domain::build::{BuildConfiguration, BuildView, InputInterface};
use agent_manager_core::domain::buildpack::BuildpackLookup;
use agent_manager_core::domain::component::{
    Component, ComponentRef, UpdateWorkflowParametersRequest,
};
use agent_manager_core::dto::agent::{BuildParametersResponse, UpdateBuildParametersRequest};
use agent_manager_core::dto::build::{BuildDetailsResponse, BuildResponse};
use agent_manager_core::instrumentation::{self, INSTRUMENTED_LANGUAGE};

use crate::config::InstrumentationConfig;

/// Service error type
#[derive(Debug)]
pub enum BuildError {
    NotFound(String),
    ValidationError(String),
    Platform(ClientError),
    Conversion(CoreError),
}

impl From<ClientError> for BuildError {
    fn from(err: ClientError) -> Self {
        if err.is_not_found() {
            BuildError::NotFound(err.to_string())
        } else {
            BuildError::Platform(err)
        }
    }
}

impl From<CoreError> for BuildError {
    fn from(err: CoreError) -> Self {
        BuildError::Conversion(err)
    }
}

// =============================================================================
// Builds
// =============================================================================

/// Trigger a new build for an agent
///
/// An absent or empty commit builds the head of the configured branch.
pub async fn trigger_build(
    platform: &dyn PlatformApi,
    agent: &ComponentRef,
    commit: Option<&str>,
) -> Result<BuildDetailsResponse, BuildError> {
    let run = platform.trigger_build(agent, commit).await?;
    let view = BuildView::from_workflow_run(&run)?;

    tracing::info!(
        "Build {} triggered for agent {} at {}",
        view.name,
        agent,
        view.commit_ref
    );

    Ok(view.into())
}

/// Get a single build with its pipeline progress
///
/// Shows the branch recorded on the run itself.
pub async fn get_build(
    platform: &dyn PlatformApi,
    agent: &ComponentRef,
    build_name: &str,
) -> Result<BuildDetailsResponse, BuildError> {
    let run = platform.get_build(agent, build_name).await?;
    let view = BuildView::from_workflow_run(&run)?;
    Ok(view.into())
}

/// List an agent's builds, newest first
///
/// Runs whose parameters cannot be decoded are skipped. Every listed build
/// shows the branch the agent is configured with now, not the one it ran on.
pub async fn list_builds(
    platform: &dyn PlatformApi,
    agent: &ComponentRef,
) -> Result<Vec<BuildResponse>, BuildError> {
    let component = platform.get_component(agent).await?;
    let branch = component.current_branch().unwrap_or_default();
    let runs = platform.list_builds(agent).await?;

    let mut views: Vec<BuildView> = runs
        .iter()
        .filter_map(|run| match BuildView::from_workflow_run(run) {
            Ok(view) => Some(view.with_branch(branch)),
            Err(e) => {
                tracing::warn!("Skipping build {} of agent {}: {}", run.name, agent, e);
                None
            }
        })
        .collect();

    views.sort_by(|a, b| b.started_at.cmp(&a.started_at));

    tracing::debug!("Listed {} builds for agent {}", views.len(), agent);

    Ok(views.iter().map(BuildResponse::from).collect())
}

// =============================================================================
// Build Parameters
// =============================================================================

/// Get the build parameters currently configured on an agent
pub async fn get_build_parameters(
    platform: &dyn PlatformApi,
    instrumentation: &InstrumentationConfig,
    agent: &ComponentRef,
) -> Result<BuildParametersResponse, BuildError> {
    let component = platform.get_component(agent).await?;
    parameters_response(&component, instrumentation)
}

/// Replace an agent's build parameters
///
/// Reads the component's current parameters document and merges the new
/// configuration into it, so keys this service does not own survive.
pub async fn update_build_parameters(
    platform: &dyn PlatformApi,
    buildpacks: &dyn BuildpackLookup,
    instrumentation: &InstrumentationConfig,
    agent: &ComponentRef,
    req: UpdateBuildParametersRequest,
) -> Result<BuildParametersResponse, BuildError> {
    let config = req.configuration();
    validate_configuration(&config, req.input_interface.as_ref())
        .map_err(BuildError::ValidationError)?;

    let component = platform.get_component(agent).await?;
    let existing = component
        .workflow
        .as_ref()
        .and_then(|wf| wf.parameters.as_ref());

    let parameters = codec::encode_update_parameters(
        existing,
        &agent.component_name,
        &config,
        req.input_interface.as_ref(),
        buildpacks,
    )?;

    let update = UpdateWorkflowParametersRequest {
        system_parameters: codec::encode_repository(&config),
        parameters,
    };

    let updated = platform
        .update_component_build_parameters(agent, &update)
        .await?;

    tracing::info!(
        "Build parameters updated for agent {} (language: {})",
        agent,
        config.language
    );

    parameters_response(&updated, instrumentation)
}

fn parameters_response(
    component: &Component,
    instrumentation: &InstrumentationConfig,
) -> Result<BuildParametersResponse, BuildError> {
    let (configuration, input_interface) =
        codec::extract_component_parameters(component.workflow.as_ref())?;

    // A stored version without major.minor is platform data, not caller input
    let instrumentation_image = if configuration.language == INSTRUMENTED_LANGUAGE {
        instrumentation::instrumentation_image(
            &instrumentation.image_prefix,
            &instrumentation.version,
            &configuration.language_version,
        )
        .inspect_err(|e| {
            tracing::warn!("No instrumentation image for agent {}: {}", component.name, e)
        })
        .ok()
    } else {
        None
    };

    Ok(BuildParametersResponse {
        agent_name: component.name.clone(),
        configuration,
        input_interface,
        instrumentation_image,
    })
}

// =============================================================================
// Validation
// =============================================================================

/// Validate build configuration before it is written to the platform
pub(crate) fn validate_configuration(
    config: &BuildConfiguration,
    iface: Option<&InputInterface>,
) -> Result<(), String> {
    if config.language.trim().is_empty() {
        return Err("language cannot be empty".to_string());
    }

    let url = &config.repository.url;
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(format!(
            "repository url must start with http:// or https://, got '{}'",
            url
        ));
    }

    if config.language == INSTRUMENTED_LANGUAGE {
        instrumentation::major_minor(&config.language_version).map_err(|e| e.to_string())?;
    }

    if let Some(iface) = iface {
        if !(1..=65535).contains(&iface.port) {
            return Err(format!("port must be between 1 and 65535, got {}", iface.port));
        }
    }

    Ok(())
}
