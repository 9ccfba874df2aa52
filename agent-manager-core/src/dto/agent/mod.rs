//! Agent DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::build::{BuildConfiguration, InputInterface, RepositoryConfig};
use crate::domain::component::{AgentDefinition, Component, EnvironmentVariable};

/// Request to create a new agent
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAgentRequest {
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    pub repository: RepositoryConfig,
    pub language: String,
    #[serde(default)]
    pub language_version: String,
    #[serde(default)]
    pub run_command: String,
    #[serde(default)]
    pub input_interface: Option<InputInterface>,
    #[serde(default)]
    pub env: Vec<EnvironmentVariable>,
}

impl From<CreateAgentRequest> for AgentDefinition {
    fn from(req: CreateAgentRequest) -> Self {
        let display_name = if req.display_name.is_empty() {
            req.name.clone()
        } else {
            req.display_name
        };

        Self {
            name: req.name,
            display_name,
            description: req.description,
            build: BuildConfiguration {
                language: req.language,
                language_version: req.language_version,
                run_command: req.run_command,
                repository: req.repository,
            },
            input_interface: req.input_interface,
            env: req.env,
        }
    }
}

/// Request to replace an agent's build parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBuildParametersRequest {
    pub repository: RepositoryConfig,
    pub language: String,
    #[serde(default)]
    pub language_version: String,
    #[serde(default)]
    pub run_command: String,
    #[serde(default)]
    pub input_interface: Option<InputInterface>,
}

impl UpdateBuildParametersRequest {
    pub fn configuration(&self) -> BuildConfiguration {
        BuildConfiguration {
            language: self.language.clone(),
            language_version: self.language_version.clone(),
            run_command: self.run_command.clone(),
            repository: self.repository.clone(),
        }
    }
}

/// Build parameters currently configured on an agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildParametersResponse {
    pub agent_name: String,
    #[serde(flatten)]
    pub configuration: BuildConfiguration,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_interface: Option<InputInterface>,
    /// Set for instrumented languages only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instrumentation_image: Option<String>,
}

/// Agent summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentResponse {
    pub uuid: Uuid,
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub project_name: String,
    pub created_at: DateTime<Utc>,
}

impl From<Component> for AgentResponse {
    fn from(component: Component) -> Self {
        Self {
            uuid: component.uuid,
            name: component.name,
            display_name: component.display_name,
            description: component.description,
            project_name: component.project_name,
            created_at: component.created_at,
        }
    }
}
