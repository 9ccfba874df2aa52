//! Component endpoints

use agent_manager_core::domain::component::{
    Component, ComponentRef, CreateComponentRequest, UpdateWorkflowParametersRequest,
};

use crate::PlatformClient;
use crate::error::Result;

impl PlatformClient {
    // =============================================================================
    // Components
    // =============================================================================

    /// Get a component by reference
    pub async fn get_component(&self, component: &ComponentRef) -> Result<Component> {
        let url = self.component_url(component);
        let response = self.send(|client| client.get(&url)).await?;

        self.handle_response(response, "get component").await
    }

    /// Create a component in a project
    ///
    /// # Arguments
    /// * `org` - Organization name
    /// * `project` - Project name
    /// * `req` - The component to create, see [`agent_manager_core::codec::encode_component`]
    pub async fn create_component(
        &self,
        org: &str,
        project: &str,
        req: &CreateComponentRequest,
    ) -> Result<Component> {
        let url = format!("{}/components", self.project_url(org, project));
        let response = self.send(|client| client.post(&url).json(req)).await?;

        self.handle_response(response, "create component").await
    }

    /// Replace a component's workflow parameters
    ///
    /// The request carries the whole merged document; the platform does not merge.
    pub async fn update_component_build_parameters(
        &self,
        component: &ComponentRef,
        req: &UpdateWorkflowParametersRequest,
    ) -> Result<Component> {
        let url = format!("{}/workflow-parameters", self.component_url(component));
        let response = self.send(|client| client.patch(&url).json(req)).await?;

        self.handle_response(response, "update component build parameters")
            .await
    }
}
