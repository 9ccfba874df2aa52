//! Platform API seam
//!
//! The service depends on [`PlatformApi`] rather than on [`PlatformClient`]
//! directly so that business logic can be tested against an in-memory fake.

use agent_manager_core::domain::component::{
    Component, ComponentRef, CreateComponentRequest, UpdateWorkflowParametersRequest,
};
use agent_manager_core::domain::workflow::WorkflowRun;
use async_trait::async_trait;

use crate::PlatformClient;
use crate::error::Result;

/// Operations the agent manager needs from the platform
#[async_trait]
pub trait PlatformApi: Send + Sync {
    async fn trigger_build(
        &self,
        component: &ComponentRef,
        commit: Option<&str>,
    ) -> Result<WorkflowRun>;

    async fn get_build(&self, component: &ComponentRef, build_name: &str) -> Result<WorkflowRun>;

    async fn list_builds(&self, component: &ComponentRef) -> Result<Vec<WorkflowRun>>;

    async fn get_component(&self, component: &ComponentRef) -> Result<Component>;

    async fn create_component(
        &self,
        org: &str,
        project: &str,
        req: &CreateComponentRequest,
    ) -> Result<Component>;

    async fn update_component_build_parameters(
        &self,
        component: &ComponentRef,
        req: &UpdateWorkflowParametersRequest,
    ) -> Result<Component>;
}

#[async_trait]
impl PlatformApi for PlatformClient {
    async fn trigger_build(
        &self,
        component: &ComponentRef,
        commit: Option<&str>,
    ) -> Result<WorkflowRun> {
        PlatformClient::trigger_build(self, component, commit).await
    }

    async fn get_build(&self, component: &ComponentRef, build_name: &str) -> Result<WorkflowRun> {
        PlatformClient::get_build(self, component, build_name).await
    }

    async fn list_builds(&self, component: &ComponentRef) -> Result<Vec<WorkflowRun>> {
        PlatformClient::list_builds(self, component).await
    }

    async fn get_component(&self, component: &ComponentRef) -> Result<Component> {
        PlatformClient::get_component(self, component).await
    }

    async fn create_component(
        &self,
        org: &str,
        project: &str,
        req: &CreateComponentRequest,
    ) -> Result<Component> {
        PlatformClient::create_component(self, org, project, req).await
    }

    async fn update_component_build_parameters(
        &self,
        component: &ComponentRef,
        req: &UpdateWorkflowParametersRequest,
    ) -> Result<Component> {
        PlatformClient::update_component_build_parameters(self, component, req).await
    }
}
