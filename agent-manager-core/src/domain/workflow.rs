//! Workflow run records reported by the platform

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Raw workflow run statuses reported by the platform
pub mod status {
    pub const PENDING: &str = "Pending";
    pub const RUNNING: &str = "Running";
    pub const SUCCEEDED: &str = "Succeeded";
    pub const FAILED: &str = "Failed";
    pub const COMPLETED: &str = "Completed";
}

/// One build execution on the platform
///
/// `status` is kept as the raw string: unknown values are legal and degrade
/// to an all-pending projection instead of failing deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowRun {
    pub uuid: Uuid,
    pub name: String,
    pub component_name: String,
    pub project_name: String,
    #[serde(default)]
    pub status: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub commit: Option<String>,
    #[serde(default)]
    pub workflow: Option<RunWorkflow>,
}

/// Workflow configuration captured on a run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunWorkflow {
    #[serde(default)]
    pub name: Option<String>,
    /// Opaque parameters document, see [`crate::codec`]
    #[serde(default)]
    pub parameters: Option<serde_json::Value>,
    #[serde(default)]
    pub system_parameters: Option<SystemParameters>,
}

/// Parameters the platform keeps beside the opaque `parameters` document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemParameters {
    #[serde(default)]
    pub repository: Option<RepositoryParameters>,
}

/// Source repository reference in platform shape
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryParameters {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub revision: Revision,
    #[serde(default)]
    pub app_path: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revision {
    #[serde(default)]
    pub branch: String,
}

impl SystemParameters {
    /// Branch configured on the repository, if any
    pub fn branch(&self) -> Option<&str> {
        self.repository
            .as_ref()
            .map(|repo| repo.revision.branch.as_str())
            .filter(|branch| !branch.is_empty())
    }
}
