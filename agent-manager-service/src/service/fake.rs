//! In-memory platform used by service and API tests

use std::collections::HashMap;
use std::sync::Mutex;

use agent_manager_client::{ClientError, PlatformApi, Result};
use agent_manager_core::codec;
use agent_manager_core::domain::build::{BuildConfiguration, InputInterface};
use agent_manager_core::domain::buildpack::StaticBuildpackRegistry;
use agent_manager_core::domain::component::{
    Component, ComponentRef, ComponentWorkflow, CreateComponentRequest,
    UpdateWorkflowParametersRequest,
};
use agent_manager_core::domain::workflow::{RunWorkflow, WorkflowRun, status};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

#[derive(Default)]
struct State {
    components: HashMap<String, Component>,
    runs: Vec<WorkflowRun>,
    updates: usize,
}

/// Platform double keeping components and runs in memory
#[derive(Default)]
pub struct FakePlatform {
    state: Mutex<State>,
}

fn key(component: &ComponentRef) -> String {
    component.to_string()
}

fn not_found(what: &str) -> ClientError {
    ClientError::NotFound(format!("{} not found", what))
}

fn default_interface() -> InputInterface {
    InputInterface {
        interface_type: "HTTP".to_string(),
        port: 8000,
        schema: None,
    }
}

fn component_workflow(name: &str, config: &BuildConfiguration) -> ComponentWorkflow {
    let registry = StaticBuildpackRegistry::default();
    let iface = default_interface();
    let parameters = codec::encode_parameters(name, config, Some(&iface), &registry)
        .expect("test configuration encodes");

    ComponentWorkflow {
        name: codec::workflow_template(&config.language, &registry).to_string(),
        system_parameters: Some(codec::encode_repository(config)),
        parameters: Some(Value::Object(parameters)),
    }
}

impl FakePlatform {
    /// Platform holding one component configured with `config`
    pub fn with_agent(agent: &ComponentRef, config: &BuildConfiguration) -> Self {
        let platform = Self::default();
        let component = Component {
            uuid: Uuid::new_v4(),
            name: agent.component_name.clone(),
            display_name: agent.component_name.clone(),
            description: String::new(),
            project_name: agent.project_name.clone(),
            created_at: Utc::now(),
            workflow: Some(component_workflow(&agent.component_name, config)),
        };
        platform
            .state
            .lock()
            .unwrap()
            .components
            .insert(key(agent), component);
        platform
    }

    /// Reconfigures a component without recording an update
    pub fn set_component_config(&self, agent: &ComponentRef, config: &BuildConfiguration) {
        let mut state = self.state.lock().unwrap();
        let component = state.components.get_mut(&key(agent)).unwrap();
        component.workflow = Some(component_workflow(&agent.component_name, config));
    }

    /// Adds a key to a component's parameters document
    pub fn insert_component_parameter(&self, agent: &ComponentRef, name: &str, value: Value) {
        let mut state = self.state.lock().unwrap();
        let component = state.components.get_mut(&key(agent)).unwrap();
        let parameters = component
            .workflow
            .as_mut()
            .and_then(|wf| wf.parameters.as_mut())
            .and_then(Value::as_object_mut)
            .unwrap();
        parameters.insert(name.to_string(), value);
    }

    pub fn component_parameters(&self, agent: &ComponentRef) -> Value {
        let state = self.state.lock().unwrap();
        state.components[&key(agent)]
            .workflow
            .as_ref()
            .and_then(|wf| wf.parameters.clone())
            .unwrap_or(Value::Null)
    }

    /// Records a run built from the component's current configuration
    pub fn add_run(
        &self,
        agent: &ComponentRef,
        run_status: &str,
        created_at: DateTime<Utc>,
    ) -> String {
        let mut state = self.state.lock().unwrap();
        let run = Self::new_run(&state, agent, run_status, created_at, None).unwrap();
        let name = run.name.clone();
        state.runs.push(run);
        name
    }

    pub fn set_run_status(&self, name: &str, run_status: &str) {
        let mut state = self.state.lock().unwrap();
        let run = state.runs.iter_mut().find(|r| r.name == name).unwrap();
        run.status = run_status.to_string();
    }

    pub fn set_run_parameters(&self, name: &str, parameters: Value) {
        let mut state = self.state.lock().unwrap();
        let run = state.runs.iter_mut().find(|r| r.name == name).unwrap();
        if let Some(workflow) = run.workflow.as_mut() {
            workflow.parameters = Some(parameters);
        }
    }

    /// Number of workflow parameter updates received
    pub fn update_count(&self) -> usize {
        self.state.lock().unwrap().updates
    }

    fn new_run(
        state: &State,
        agent: &ComponentRef,
        run_status: &str,
        created_at: DateTime<Utc>,
        commit: Option<&str>,
    ) -> Result<WorkflowRun> {
        let component = state
            .components
            .get(&key(agent))
            .ok_or_else(|| not_found("component"))?;
        let workflow = component.workflow.clone().unwrap_or_default();

        Ok(WorkflowRun {
            uuid: Uuid::new_v4(),
            name: format!("{}-build-{}", agent.component_name, state.runs.len() + 1),
            component_name: agent.component_name.clone(),
            project_name: agent.project_name.clone(),
            status: run_status.to_string(),
            created_at,
            image: None,
            commit: commit.map(str::to_string),
            workflow: Some(RunWorkflow {
                name: Some(workflow.name),
                parameters: workflow.parameters,
                system_parameters: workflow.system_parameters,
            }),
        })
    }
}

#[async_trait]
impl PlatformApi for FakePlatform {
    async fn trigger_build(
        &self,
        component: &ComponentRef,
        commit: Option<&str>,
    ) -> Result<WorkflowRun> {
        let mut state = self.state.lock().unwrap();
        let commit = commit.filter(|c| !c.is_empty());
        let run = Self::new_run(&state, component, status::PENDING, Utc::now(), commit)?;
        state.runs.push(run.clone());
        Ok(run)
    }

    async fn get_build(&self, component: &ComponentRef, build_name: &str) -> Result<WorkflowRun> {
        let state = self.state.lock().unwrap();
        state
            .runs
            .iter()
            .find(|r| r.component_name == component.component_name && r.name == build_name)
            .cloned()
            .ok_or_else(|| not_found("workflow run"))
    }

    async fn list_builds(&self, component: &ComponentRef) -> Result<Vec<WorkflowRun>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .runs
            .iter()
            .filter(|r| r.component_name == component.component_name)
            .cloned()
            .collect())
    }

    async fn get_component(&self, component: &ComponentRef) -> Result<Component> {
        let state = self.state.lock().unwrap();
        state
            .components
            .get(&key(component))
            .cloned()
            .ok_or_else(|| not_found("component"))
    }

    async fn create_component(
        &self,
        org: &str,
        project: &str,
        req: &CreateComponentRequest,
    ) -> Result<Component> {
        let mut state = self.state.lock().unwrap();
        let key = key(&ComponentRef::new(org, project, req.name.as_str()));
        if state.components.contains_key(&key) {
            return Err(ClientError::api_error(409, "component already exists"));
        }

        let component = Component {
            uuid: Uuid::new_v4(),
            name: req.name.clone(),
            display_name: req.display_name.clone(),
            description: req.description.clone(),
            project_name: project.to_string(),
            created_at: Utc::now(),
            workflow: Some(req.workflow.clone()),
        };
        state.components.insert(key, component.clone());
        Ok(component)
    }

    async fn update_component_build_parameters(
        &self,
        component: &ComponentRef,
        req: &UpdateWorkflowParametersRequest,
    ) -> Result<Component> {
        let mut state = self.state.lock().unwrap();
        state.updates += 1;
        let stored = state
            .components
            .get_mut(&key(component))
            .ok_or_else(|| not_found("component"))?;

        let workflow = stored.workflow.get_or_insert_with(ComponentWorkflow::default);
        workflow.system_parameters = Some(req.system_parameters.clone());
        workflow.parameters = Some(Value::Object(req.parameters.clone()));
        Ok(stored.clone())
    }
}
