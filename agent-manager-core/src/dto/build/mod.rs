//! Build DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::build::{BuildSteps, BuildView, InputInterface};

/// Query string accepted when triggering a build
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerBuildQuery {
    #[serde(default)]
    pub commit_id: Option<String>,
}

/// Build parameters as shown on a build
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildParameters {
    pub commit_id: String,
    pub language: String,
    pub language_version: String,
    pub run_command: String,
    pub repo_url: String,
    pub app_path: String,
    pub branch: String,
}

/// Build summary used in list views
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildResponse {
    pub uuid: Uuid,
    pub name: String,
    pub agent_name: String,
    pub project_name: String,
    pub status: String,
    pub started_at: DateTime<Utc>,
    pub image_id: String,
    pub build_parameters: BuildParameters,
}

/// Build with pipeline progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildDetailsResponse {
    #[serde(flatten)]
    pub build: BuildResponse,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_interface: Option<InputInterface>,
    pub steps: BuildSteps,
    pub percent: f32,
}

impl From<&BuildView> for BuildResponse {
    fn from(view: &BuildView) -> Self {
        let config = &view.build_configuration;
        Self {
            uuid: view.uuid,
            name: view.name.clone(),
            agent_name: view.agent_name.clone(),
            project_name: view.project_name.clone(),
            status: view.raw_status.clone(),
            started_at: view.started_at,
            image_id: view.image_id.clone(),
            build_parameters: BuildParameters {
                commit_id: view.commit_ref.clone(),
                language: config.language.clone(),
                language_version: config.language_version.clone(),
                run_command: config.run_command.clone(),
                repo_url: config.repository.url.clone(),
                app_path: config.repository.app_path.clone(),
                branch: config.repository.branch.clone(),
            },
        }
    }
}

impl From<BuildView> for BuildDetailsResponse {
    fn from(view: BuildView) -> Self {
        Self {
            build: BuildResponse::from(&view),
            input_interface: view.input_interface,
            steps: view.steps,
            percent: view.percent,
        }
    }
}
