//! Workflow run endpoints

use agent_manager_core::domain::component::ComponentRef;
use agent_manager_core::domain::workflow::WorkflowRun;
use serde::Serialize;

use crate::error::Result;
use crate::{ListData, PlatformClient};

#[derive(Debug, Serialize)]
struct TriggerBuildRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    commit: Option<&'a str>,
}

impl PlatformClient {
    fn workflow_runs_url(&self, component: &ComponentRef) -> String {
        format!("{}/workflow-runs", self.component_url(component))
    }

    // =============================================================================
    // Workflow Runs
    // =============================================================================

    /// Trigger a build of a component
    ///
    /// # Arguments
    /// * `component` - The component to build
    /// * `commit` - Commit to build; the platform builds the branch head when `None`
    ///
    /// # Returns
    /// The workflow run created for the build
    pub async fn trigger_build(
        &self,
        component: &ComponentRef,
        commit: Option<&str>,
    ) -> Result<WorkflowRun> {
        let url = self.workflow_runs_url(component);
        let body = TriggerBuildRequest {
            commit: commit.filter(|c| !c.is_empty()),
        };

        let response = self.send(|client| client.post(&url).json(&body)).await?;

        self.handle_response(response, "trigger build").await
    }

    /// Get a single workflow run
    ///
    /// # Arguments
    /// * `component` - The component the run belongs to
    /// * `build_name` - Name of the workflow run
    pub async fn get_build(
        &self,
        component: &ComponentRef,
        build_name: &str,
    ) -> Result<WorkflowRun> {
        let url = format!("{}/{}", self.workflow_runs_url(component), build_name);
        let response = self.send(|client| client.get(&url)).await?;

        self.handle_response(response, "get build").await
    }

    /// List workflow runs of a component, in platform order
    pub async fn list_builds(&self, component: &ComponentRef) -> Result<Vec<WorkflowRun>> {
        let url = self.workflow_runs_url(component);
        let response = self.send(|client| client.get(&url)).await?;

        let data: ListData<WorkflowRun> = self.handle_response(response, "list builds").await?;
        Ok(data.items)
    }
}
