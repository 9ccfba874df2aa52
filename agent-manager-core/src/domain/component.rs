//! Component domain types
//!
//! A component is the platform's persistent resource for a deployable unit.
//! Every agent is backed by one component, which owns the latest configured
//! build parameters (as opposed to what an individual workflow run recorded).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::build::{BuildConfiguration, InputInterface};
use super::workflow::SystemParameters;

/// Component type used for every agent
pub const AGENT_COMPONENT_TYPE: &str = "deployment/agent";

/// Addresses a component on the platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentRef {
    pub org_name: String,
    pub project_name: String,
    pub component_name: String,
}

impl ComponentRef {
    pub fn new(
        org_name: impl Into<String>,
        project_name: impl Into<String>,
        component_name: impl Into<String>,
    ) -> Self {
        Self {
            org_name: org_name.into(),
            project_name: project_name.into(),
            component_name: component_name.into(),
        }
    }
}

impl std::fmt::Display for ComponentRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.org_name, self.project_name, self.component_name
        )
    }
}

/// Component record as returned by the platform
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    pub uuid: Uuid,
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    pub project_name: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub workflow: Option<ComponentWorkflow>,
}

impl Component {
    /// Branch the component is currently configured to build from
    pub fn current_branch(&self) -> Option<&str> {
        self.workflow
            .as_ref()
            .and_then(|wf| wf.system_parameters.as_ref())
            .and_then(|sp| sp.branch())
    }
}

/// Workflow configuration stored on a component
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentWorkflow {
    /// Workflow template the platform runs for builds
    pub name: String,
    #[serde(default)]
    pub system_parameters: Option<SystemParameters>,
    /// Opaque parameters document, see [`crate::codec`]
    #[serde(default)]
    pub parameters: Option<serde_json::Value>,
}

/// Name/value pair injected into the agent's runtime environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentVariable {
    pub name: String,
    pub value: String,
}

/// Everything needed to create an agent's backing component
#[derive(Debug, Clone, Default)]
pub struct AgentDefinition {
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub build: BuildConfiguration,
    pub input_interface: Option<InputInterface>,
    pub env: Vec<EnvironmentVariable>,
}

/// Create request sent to the platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateComponentRequest {
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub component_type: String,
    pub workflow: ComponentWorkflow,
    /// Ordered as supplied by the caller
    pub env: Vec<EnvironmentVariable>,
}

/// Replaces a component's workflow parameters on the platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWorkflowParametersRequest {
    pub system_parameters: SystemParameters,
    pub parameters: serde_json::Map<String, serde_json::Value>,
}
