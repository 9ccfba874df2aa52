//! Build domain types
//!
//! A build is never stored by the agent manager. Every read projects a fresh
//! [`BuildView`] from the platform's workflow run: the parameters document is
//! decoded back into a [`BuildConfiguration`], and the coarse run status is
//! expanded into a fixed five-stage pipeline with a completion percentage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::workflow::{RepositoryParameters, Revision, WorkflowRun, status};
use crate::codec;
use crate::commit::commit_ref;
use crate::error::Result;

// =============================================================================
// Build Configuration
// =============================================================================

/// Source repository a build checks out
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub branch: String,
    #[serde(default)]
    pub app_path: String,
}

impl From<&RepositoryParameters> for RepositoryConfig {
    fn from(repo: &RepositoryParameters) -> Self {
        Self {
            url: repo.url.clone(),
            branch: repo.revision.branch.clone(),
            app_path: repo.app_path.clone(),
        }
    }
}

impl From<&RepositoryConfig> for RepositoryParameters {
    fn from(repo: &RepositoryConfig) -> Self {
        Self {
            url: repo.url.clone(),
            revision: Revision {
                branch: repo.branch.clone(),
            },
            app_path: repo.app_path.clone(),
        }
    }
}

/// Typed build configuration
///
/// Any field may be empty when the platform document leaves it out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildConfiguration {
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub language_version: String,
    #[serde(default)]
    pub run_command: String,
    #[serde(default)]
    pub repository: RepositoryConfig,
}

/// Schema file describing an endpoint's API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceSchema {
    pub path: String,
}

/// The single HTTP endpoint an agent exposes
///
/// The platform models endpoints as a list, but agents only ever have one.
/// Callers carry this as `Option<InputInterface>` rather than a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputInterface {
    #[serde(rename = "type")]
    pub interface_type: String,
    pub port: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<InterfaceSchema>,
}

// =============================================================================
// Build Pipeline Stages
// =============================================================================

pub const BUILD_STEP_COUNT: usize = 5;

/// Fixed-length stage array, index 0 is always `Initiated`
pub type BuildSteps = [BuildStep; BUILD_STEP_COUNT];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildStepType {
    Initiated,
    Triggered,
    Running,
    Succeeded,
    /// Workload updated with the built image
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildStepStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildStep {
    #[serde(rename = "type")]
    pub step_type: BuildStepType,
    pub status: BuildStepStatus,
    pub message: String,
}

impl BuildStep {
    fn new(step_type: BuildStepType, status: BuildStepStatus, message: &str) -> Self {
        Self {
            step_type,
            status,
            message: message.to_string(),
        }
    }
}

/// Status and message for stages 1..=4
type StageRow = [(BuildStepStatus, &'static str); BUILD_STEP_COUNT - 1];

const STAGE_TYPES: [BuildStepType; BUILD_STEP_COUNT] = [
    BuildStepType::Initiated,
    BuildStepType::Triggered,
    BuildStepType::Running,
    BuildStepType::Succeeded,
    BuildStepType::Completed,
];

const INITIATED_MESSAGE: &str = "Build initiated";

const PENDING_ROW: StageRow = {
    use BuildStepStatus::Pending;
    [
        (Pending, "Waiting for build to be triggered"),
        (Pending, "Waiting for build to start"),
        (Pending, "Waiting for build to finish"),
        (Pending, "Waiting for workload update"),
    ]
};

/// Raw run status to stage row. Statuses not listed project to [`PENDING_ROW`].
static STATUS_TABLE: [(&str, StageRow); 5] = {
    use BuildStepStatus::{Failed, Pending, Running, Succeeded};
    [
        (
            status::PENDING,
            [
                (Succeeded, "Build triggered"),
                PENDING_ROW[1],
                PENDING_ROW[2],
                PENDING_ROW[3],
            ],
        ),
        (
            status::RUNNING,
            [
                (Succeeded, "Build triggered"),
                (Running, "Build running"),
                PENDING_ROW[2],
                PENDING_ROW[3],
            ],
        ),
        (
            status::SUCCEEDED,
            [
                (Succeeded, "Build triggered"),
                (Succeeded, "Build completed"),
                (Succeeded, "Build succeeded"),
                (Running, "Updating workload"),
            ],
        ),
        (
            status::COMPLETED,
            [
                (Succeeded, "Build triggered"),
                (Succeeded, "Build completed"),
                (Succeeded, "Build succeeded"),
                (Succeeded, "Workload updated successfully"),
            ],
        ),
        (
            status::FAILED,
            [
                (Succeeded, "Build triggered"),
                (Succeeded, "Build completed"),
                (Failed, "Build workflow failed"),
                (Pending, "Workload update skipped"),
            ],
        ),
    ]
};

/// Projects a raw workflow run status onto the five-stage pipeline
///
/// Stage 0 is always `Succeeded`: a run record existing at all means the
/// build was initiated. Unknown statuses (including empty) leave stages 1..=4 pending.
pub fn project_steps(raw_status: &str) -> BuildSteps {
    let row = STATUS_TABLE
        .iter()
        .find(|(key, _)| *key == raw_status)
        .map(|(_, row)| row)
        .unwrap_or(&PENDING_ROW);

    std::array::from_fn(|i| match i {
        0 => BuildStep::new(STAGE_TYPES[0], BuildStepStatus::Succeeded, INITIATED_MESSAGE),
        _ => {
            let (status, message) = row[i - 1];
            BuildStep::new(STAGE_TYPES[i], status, message)
        }
    })
}

/// Completion percentage (0..=100) of a stage array
///
/// Stages are walked in order: a succeeded stage counts fully, a running
/// stage counts half and ends the walk, anything else ends the walk.
pub fn estimate_percent(steps: &[BuildStep]) -> f32 {
    if steps.is_empty() {
        return 0.0;
    }

    let mut completed = 0.0_f32;
    for step in steps {
        match step.status {
            BuildStepStatus::Succeeded => completed += 1.0,
            BuildStepStatus::Running => {
                completed += 0.5;
                break;
            }
            BuildStepStatus::Failed | BuildStepStatus::Pending => break,
        }
    }

    completed * 100.0 / steps.len() as f32
}

// =============================================================================
// Build View
// =============================================================================

/// Read-time projection of a workflow run
#[derive(Debug, Clone, PartialEq)]
pub struct BuildView {
    pub uuid: Uuid,
    pub name: String,
    pub agent_name: String,
    pub project_name: String,
    pub raw_status: String,
    pub started_at: DateTime<Utc>,
    pub image_id: String,
    pub build_configuration: BuildConfiguration,
    pub commit_ref: String,
    pub input_interface: Option<InputInterface>,
    pub steps: BuildSteps,
    pub percent: f32,
}

impl BuildView {
    /// Projects a workflow run into a build view
    ///
    /// Fails only when the run's parameters document is malformed.
    pub fn from_workflow_run(run: &WorkflowRun) -> Result<Self> {
        let (build_configuration, input_interface) = codec::extract_workflow_parameters(run)?;
        let steps = project_steps(&run.status);
        let percent = estimate_percent(&steps);

        Ok(Self {
            uuid: run.uuid,
            name: run.name.clone(),
            agent_name: run.component_name.clone(),
            project_name: run.project_name.clone(),
            raw_status: run.status.clone(),
            started_at: run.created_at,
            image_id: run.image.clone().unwrap_or_default(),
            build_configuration,
            commit_ref: commit_ref(run.commit.as_deref()),
            input_interface,
            steps,
            percent,
        })
    }

    /// Replaces the recorded branch with the component's current one
    ///
    /// Used by list views, which always show the latest configured branch.
    /// Detail views keep the branch the run recorded.
    pub fn with_branch(mut self, branch: &str) -> Self {
        self.build_configuration.repository.branch = branch.to_string();
        self
    }
}
