//! Workflow parameters codec
//!
//! The platform stores build configuration on a component's workflow as an
//! untyped JSON document. The agent manager recognizes two keys in it:
//!
//! ```json
//! {
//!   "buildpackConfigs": {
//!     "language": "python",
//!     "languageVersion": "3.11",
//!     "googleEntryPoint": "python main.py",
//!     "languageVersionKey": "GOOGLE_PYTHON_VERSION"
//!   },
//!   "endpoints": [
//!     { "name": "reading-agent-endpoint", "port": 8000, "type": "HTTP", "schemaFilePath": "openapi.yaml" }
//!   ]
//! }
//! ```
//!
//! The last three `buildpackConfigs` keys exist only for Google buildpack
//! languages. The repository lives beside this document in `systemParameters`.
//!
//! Decoding goes through typed structs. Encoding for updates is a
//! read-modify-write over the existing document: only the recognized keys are
//! replaced, everything else other writers put there stays in place.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::build::{
    BuildConfiguration, InputInterface, InterfaceSchema, RepositoryConfig,
};
use crate::domain::buildpack::BuildpackLookup;
use crate::domain::component::{
    AGENT_COMPONENT_TYPE, AgentDefinition, ComponentWorkflow, CreateComponentRequest,
};
use crate::domain::workflow::{RepositoryParameters, SystemParameters, WorkflowRun};
use crate::error::{CoreError, Result};

const BUILDPACK_CONFIGS_KEY: &str = "buildpackConfigs";
const ENDPOINTS_KEY: &str = "endpoints";

/// Schema type written on endpoints by the update path
pub const REST_SCHEMA_TYPE: &str = "REST";

/// Workflow template for languages without a registered buildpack
pub const DOCKER_WORKFLOW_TEMPLATE: &str = "docker";

// =============================================================================
// Document Shape
// =============================================================================

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BuildpackConfigs {
    #[serde(default)]
    language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    language_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    google_entry_point: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    language_version_key: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EndpointParameter {
    #[serde(default)]
    name: String,
    #[serde(default)]
    port: i32,
    #[serde(rename = "type", default)]
    endpoint_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    schema_file_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    schema_type: Option<String>,
}

/// The keys of the parameters document this codec owns
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct KnownParameters {
    #[serde(default)]
    buildpack_configs: Option<BuildpackConfigs>,
    #[serde(default)]
    endpoints: Vec<EndpointParameter>,
}

/// Build settings decoded from a parameters document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedParameters {
    pub language: String,
    pub language_version: String,
    pub run_command: String,
    pub input_interface: Option<InputInterface>,
}

// =============================================================================
// Decoding
// =============================================================================

/// Decodes a workflow parameters document
///
/// A document without `buildpackConfigs` belongs to a component that was never
/// configured for builds; that is not an error and decodes to empty values.
/// Only `endpoints[0]` is read.
pub fn decode_parameters(document: &Value) -> Result<DecodedParameters> {
    let known = KnownParameters::deserialize(document).map_err(CoreError::Decode)?;

    let Some(buildpack) = known.buildpack_configs else {
        return Ok(DecodedParameters::default());
    };

    let input_interface = known.endpoints.into_iter().next().map(|endpoint| InputInterface {
        interface_type: endpoint.endpoint_type,
        port: endpoint.port,
        schema: endpoint
            .schema_file_path
            .map(|path| InterfaceSchema { path }),
    });

    Ok(DecodedParameters {
        language: buildpack.language,
        language_version: buildpack.language_version.unwrap_or_default(),
        run_command: buildpack.google_entry_point.unwrap_or_default(),
        input_interface,
    })
}

/// Build configuration and interface recorded on a workflow run
///
/// A run without workflow configuration (or without parameters) predates
/// build configuration and yields empty values.
pub fn extract_workflow_parameters(
    run: &WorkflowRun,
) -> Result<(BuildConfiguration, Option<InputInterface>)> {
    let Some(workflow) = run.workflow.as_ref() else {
        return Ok((BuildConfiguration::default(), None));
    };

    decode_configuration(
        workflow.parameters.as_ref(),
        workflow.system_parameters.as_ref(),
    )
}

/// Build configuration and interface currently configured on a component workflow
pub fn extract_component_parameters(
    workflow: Option<&ComponentWorkflow>,
) -> Result<(BuildConfiguration, Option<InputInterface>)> {
    let Some(workflow) = workflow else {
        return Ok((BuildConfiguration::default(), None));
    };

    decode_configuration(
        workflow.parameters.as_ref(),
        workflow.system_parameters.as_ref(),
    )
}

fn decode_configuration(
    parameters: Option<&Value>,
    system_parameters: Option<&SystemParameters>,
) -> Result<(BuildConfiguration, Option<InputInterface>)> {
    let decoded = match parameters {
        Some(document) if !document.is_null() => decode_parameters(document)?,
        _ => DecodedParameters::default(),
    };

    let repository = system_parameters
        .and_then(|sp| sp.repository.as_ref())
        .map(RepositoryConfig::from)
        .unwrap_or_default();

    let configuration = BuildConfiguration {
        language: decoded.language,
        language_version: decoded.language_version,
        run_command: decoded.run_command,
        repository,
    };

    Ok((configuration, decoded.input_interface))
}

// =============================================================================
// Encoding
// =============================================================================

fn buildpack_configs(
    config: &BuildConfiguration,
    registry: &dyn BuildpackLookup,
) -> BuildpackConfigs {
    if !registry.is_google_buildpack(&config.language) {
        return BuildpackConfigs {
            language: config.language.clone(),
            ..Default::default()
        };
    }

    BuildpackConfigs {
        language: config.language.clone(),
        language_version: Some(config.language_version.clone()),
        google_entry_point: Some(config.run_command.clone()),
        language_version_key: Some(
            registry
                .version_env_var(&config.language)
                .unwrap_or_default()
                .to_string(),
        ),
    }
}

fn endpoint_name(component_name: &str) -> String {
    format!("{}-endpoint", component_name)
}

/// Endpoint entry for an input interface
///
/// `schema_type` is only written alongside a non-empty schema path.
fn endpoint_parameter(
    component_name: &str,
    iface: &InputInterface,
    schema_type: Option<&str>,
) -> EndpointParameter {
    let schema_file_path = iface
        .schema
        .as_ref()
        .map(|schema| schema.path.clone())
        .filter(|path| !path.is_empty());

    EndpointParameter {
        name: endpoint_name(component_name),
        port: iface.port,
        endpoint_type: iface.interface_type.clone(),
        schema_type: schema_file_path
            .as_ref()
            .and(schema_type)
            .map(str::to_string),
        schema_file_path,
    }
}

fn to_value<T: Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value).map_err(CoreError::Encode)
}

/// Builds a parameters document from scratch (create path)
///
/// Endpoints never carry `schemaType` here, unlike [`encode_update_parameters`].
pub fn encode_parameters(
    component_name: &str,
    config: &BuildConfiguration,
    iface: Option<&InputInterface>,
    registry: &dyn BuildpackLookup,
) -> Result<Map<String, Value>> {
    let mut document = Map::new();
    document.insert(
        BUILDPACK_CONFIGS_KEY.to_string(),
        to_value(&buildpack_configs(config, registry))?,
    );

    if let Some(iface) = iface {
        let endpoint = endpoint_parameter(component_name, iface, None);
        document.insert(ENDPOINTS_KEY.to_string(), to_value(&[endpoint])?);
    }

    Ok(document)
}

/// Merges build configuration into an existing parameters document (update path)
///
/// Replaces `buildpackConfigs`, and `endpoints` when an interface is given.
/// Every other key keeps its value and position. Endpoints with a schema get
/// `schemaType: "REST"`.
pub fn encode_update_parameters(
    existing: Option<&Value>,
    component_name: &str,
    config: &BuildConfiguration,
    iface: Option<&InputInterface>,
    registry: &dyn BuildpackLookup,
) -> Result<Map<String, Value>> {
    let mut document: Map<String, Value> = match existing {
        Some(value) if !value.is_null() => {
            Map::deserialize(value).map_err(CoreError::Decode)?
        }
        _ => Map::new(),
    };

    document.insert(
        BUILDPACK_CONFIGS_KEY.to_string(),
        to_value(&buildpack_configs(config, registry))?,
    );

    if let Some(iface) = iface {
        let endpoint = endpoint_parameter(component_name, iface, Some(REST_SCHEMA_TYPE));
        document.insert(ENDPOINTS_KEY.to_string(), to_value(&[endpoint])?);
    }

    Ok(document)
}

/// System parameters carrying the repository reference
pub fn encode_repository(config: &BuildConfiguration) -> SystemParameters {
    SystemParameters {
        repository: Some(RepositoryParameters::from(&config.repository)),
    }
}

/// Workflow template the platform should build a language with
pub fn workflow_template(language: &str, registry: &dyn BuildpackLookup) -> &'static str {
    registry
        .find(language)
        .map(|bp| bp.provider.workflow_template())
        .unwrap_or(DOCKER_WORKFLOW_TEMPLATE)
}

/// Encodes a full component for creation
pub fn encode_component(
    agent: &AgentDefinition,
    registry: &dyn BuildpackLookup,
) -> Result<CreateComponentRequest> {
    let parameters = encode_parameters(
        &agent.name,
        &agent.build,
        agent.input_interface.as_ref(),
        registry,
    )?;

    Ok(CreateComponentRequest {
        name: agent.name.clone(),
        display_name: agent.display_name.clone(),
        description: agent.description.clone(),
        component_type: AGENT_COMPONENT_TYPE.to_string(),
        workflow: ComponentWorkflow {
            name: workflow_template(&agent.build.language, registry).to_string(),
            system_parameters: Some(encode_repository(&agent.build)),
            parameters: Some(Value::Object(parameters)),
        },
        env: agent.env.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::buildpack::StaticBuildpackRegistry;
    use crate::domain::component::EnvironmentVariable;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn python_config() -> BuildConfiguration {
        BuildConfiguration {
            language: "python".to_string(),
            language_version: "3.11".to_string(),
            run_command: "python main.py".to_string(),
            repository: RepositoryConfig {
                url: "https://github.com/acme/agents".to_string(),
                branch: "main".to_string(),
                app_path: "reading".to_string(),
            },
        }
    }

    fn ballerina_config() -> BuildConfiguration {
        BuildConfiguration {
            language: "ballerina".to_string(),
            language_version: "2201.10".to_string(),
            run_command: "bal run".to_string(),
            ..Default::default()
        }
    }

    fn http_interface(schema: Option<&str>) -> InputInterface {
        InputInterface {
            interface_type: "HTTP".to_string(),
            port: 8000,
            schema: schema.map(|path| InterfaceSchema {
                path: path.to_string(),
            }),
        }
    }

    #[test]
    fn test_encode_google_buildpack() {
        let registry = StaticBuildpackRegistry::default();
        let doc = encode_parameters(
            "reading-agent",
            &python_config(),
            Some(&http_interface(Some("openapi.yaml"))),
            &registry,
        )
        .unwrap();

        assert_eq!(
            Value::Object(doc),
            json!({
                "buildpackConfigs": {
                    "language": "python",
                    "languageVersion": "3.11",
                    "googleEntryPoint": "python main.py",
                    "languageVersionKey": "GOOGLE_PYTHON_VERSION"
                },
                "endpoints": [{
                    "name": "reading-agent-endpoint",
                    "port": 8000,
                    "type": "HTTP",
                    "schemaFilePath": "openapi.yaml"
                }]
            })
        );
    }

    #[test]
    fn test_encode_non_google_buildpack_omits_version_fields() {
        let registry = StaticBuildpackRegistry::default();
        let doc = encode_parameters("bal-agent", &ballerina_config(), None, &registry).unwrap();

        let configs = doc[BUILDPACK_CONFIGS_KEY].as_object().unwrap();
        assert_eq!(configs.len(), 1);
        assert_eq!(configs["language"], json!("ballerina"));
        assert!(!configs.contains_key("languageVersion"));
        assert!(!configs.contains_key("googleEntryPoint"));
        assert!(!configs.contains_key("languageVersionKey"));
        assert!(!doc.contains_key(ENDPOINTS_KEY));
    }

    #[test]
    fn test_create_path_never_sets_schema_type() {
        let registry = StaticBuildpackRegistry::default();
        let doc = encode_parameters(
            "reading-agent",
            &python_config(),
            Some(&http_interface(Some("openapi.yaml"))),
            &registry,
        )
        .unwrap();

        assert!(doc[ENDPOINTS_KEY][0].get("schemaType").is_none());
    }

    #[test]
    fn test_update_path_sets_rest_schema_type() {
        let registry = StaticBuildpackRegistry::default();
        let doc = encode_update_parameters(
            None,
            "reading-agent",
            &python_config(),
            Some(&http_interface(Some("openapi.yaml"))),
            &registry,
        )
        .unwrap();

        assert_eq!(doc[ENDPOINTS_KEY][0]["schemaType"], json!("REST"));
        assert_eq!(doc[ENDPOINTS_KEY][0]["schemaFilePath"], json!("openapi.yaml"));
    }

    #[test]
    fn test_empty_schema_path_is_dropped() {
        let registry = StaticBuildpackRegistry::default();
        for schema in [None, Some("")] {
            let doc = encode_update_parameters(
                None,
                "reading-agent",
                &python_config(),
                Some(&http_interface(schema)),
                &registry,
            )
            .unwrap();

            let endpoint = doc[ENDPOINTS_KEY][0].as_object().unwrap();
            assert!(!endpoint.contains_key("schemaFilePath"));
            assert!(!endpoint.contains_key("schemaType"));
        }
    }

    #[test]
    fn test_update_preserves_unknown_keys_and_order() {
        let registry = StaticBuildpackRegistry::default();
        let existing = json!({
            "resources": { "cpu": "500m" },
            "buildpackConfigs": { "language": "go", "languageVersion": "1.22" },
            "endpoints": [{ "name": "old", "port": 1, "type": "HTTP" }],
            "tracing": true
        });

        let doc = encode_update_parameters(
            Some(&existing),
            "reading-agent",
            &python_config(),
            None,
            &registry,
        )
        .unwrap();

        let keys: Vec<&str> = doc.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["resources", "buildpackConfigs", "endpoints", "tracing"]);
        assert_eq!(doc["resources"], json!({ "cpu": "500m" }));
        assert_eq!(doc["tracing"], json!(true));
        assert_eq!(doc[BUILDPACK_CONFIGS_KEY]["language"], json!("python"));
        // No interface given: endpoints left as they were
        assert_eq!(doc[ENDPOINTS_KEY][0]["name"], json!("old"));
    }

    #[test]
    fn test_update_switching_to_non_google_drops_stale_fields() {
        let registry = StaticBuildpackRegistry::default();
        let existing = json!({
            "buildpackConfigs": {
                "language": "python",
                "languageVersion": "3.11",
                "googleEntryPoint": "python main.py",
                "languageVersionKey": "GOOGLE_PYTHON_VERSION"
            }
        });

        let doc = encode_update_parameters(
            Some(&existing),
            "bal-agent",
            &ballerina_config(),
            None,
            &registry,
        )
        .unwrap();

        assert_eq!(doc[BUILDPACK_CONFIGS_KEY], json!({ "language": "ballerina" }));
    }

    #[test]
    fn test_update_rejects_non_object_document() {
        let registry = StaticBuildpackRegistry::default();
        let existing = json!("not-a-map");

        let result =
            encode_update_parameters(Some(&existing), "a", &python_config(), None, &registry);
        assert!(matches!(result, Err(CoreError::Decode(_))));
    }

    #[test]
    fn test_round_trip_google_buildpack() {
        let registry = StaticBuildpackRegistry::default();
        let config = python_config();
        let iface = http_interface(Some("openapi.yaml"));

        for doc in [
            encode_parameters("reading-agent", &config, Some(&iface), &registry).unwrap(),
            encode_update_parameters(None, "reading-agent", &config, Some(&iface), &registry)
                .unwrap(),
        ] {
            let decoded = decode_parameters(&Value::Object(doc)).unwrap();
            assert_eq!(
                decoded,
                DecodedParameters {
                    language: config.language.clone(),
                    language_version: config.language_version.clone(),
                    run_command: config.run_command.clone(),
                    input_interface: Some(iface.clone()),
                }
            );
        }
    }

    #[test]
    fn test_round_trip_non_google_buildpack_loses_version_and_command() {
        let registry = StaticBuildpackRegistry::default();
        let iface = http_interface(Some("api.yaml"));
        let doc = encode_parameters("bal-agent", &ballerina_config(), Some(&iface), &registry)
            .unwrap();

        let decoded = decode_parameters(&Value::Object(doc)).unwrap();
        assert_eq!(decoded.language, "ballerina");
        assert_eq!(decoded.language_version, "");
        assert_eq!(decoded.run_command, "");
        assert_eq!(decoded.input_interface, Some(iface));
    }

    #[test]
    fn test_round_trip_empty_schema_decodes_to_none() {
        let registry = StaticBuildpackRegistry::default();
        let doc = encode_parameters(
            "reading-agent",
            &python_config(),
            Some(&http_interface(Some(""))),
            &registry,
        )
        .unwrap();

        let decoded = decode_parameters(&Value::Object(doc)).unwrap();
        assert_eq!(decoded.input_interface.unwrap().schema, None);
    }

    #[test]
    fn test_decode_without_buildpack_configs() {
        let decoded = decode_parameters(&json!({
            "endpoints": [{ "name": "x", "port": 8000, "type": "HTTP" }]
        }))
        .unwrap();

        assert_eq!(decoded, DecodedParameters::default());
    }

    #[test]
    fn test_decode_reads_first_endpoint_only() {
        let decoded = decode_parameters(&json!({
            "buildpackConfigs": { "language": "python" },
            "endpoints": [
                { "name": "a", "port": 8000, "type": "HTTP" },
                { "name": "b", "port": 9000, "type": "GRPC", "schemaFilePath": "b.proto" }
            ]
        }))
        .unwrap();

        assert_eq!(decoded.input_interface, Some(http_interface(None)));
    }

    #[test]
    fn test_decode_endpoint_without_port() {
        let decoded = decode_parameters(&json!({
            "buildpackConfigs": { "language": "python" },
            "endpoints": [{ "name": "x", "type": "HTTP" }]
        }))
        .unwrap();

        let iface = decoded.input_interface.unwrap();
        assert_eq!(iface.port, 0);
        assert_eq!(iface.interface_type, "HTTP");
    }

    #[test]
    fn test_decode_malformed_document() {
        let malformed = [
            json!("just a string"),
            json!({ "buildpackConfigs": "python" }),
            json!({ "buildpackConfigs": { "language": "python" }, "endpoints": [{ "port": "eighty" }] }),
        ];

        for doc in malformed {
            assert!(matches!(decode_parameters(&doc), Err(CoreError::Decode(_))));
        }
    }

    #[test]
    fn test_encode_repository() {
        let system = encode_repository(&python_config());
        assert_eq!(
            serde_json::to_value(&system).unwrap(),
            json!({
                "repository": {
                    "url": "https://github.com/acme/agents",
                    "revision": { "branch": "main" },
                    "appPath": "reading"
                }
            })
        );
    }

    #[test]
    fn test_extract_component_parameters() {
        let registry = StaticBuildpackRegistry::default();
        let config = python_config();
        let workflow = ComponentWorkflow {
            name: "google-cloud-buildpacks".to_string(),
            system_parameters: Some(encode_repository(&config)),
            parameters: Some(Value::Object(
                encode_parameters("reading-agent", &config, None, &registry).unwrap(),
            )),
        };

        let (decoded, iface) = extract_component_parameters(Some(&workflow)).unwrap();
        assert_eq!(decoded, config);
        assert_eq!(iface, None);

        let (empty, iface) = extract_component_parameters(None).unwrap();
        assert_eq!(empty, BuildConfiguration::default());
        assert_eq!(iface, None);
    }

    #[test]
    fn test_encode_component() {
        let registry = StaticBuildpackRegistry::default();
        let agent = AgentDefinition {
            name: "reading-agent".to_string(),
            display_name: "Reading Agent".to_string(),
            description: "Summarizes articles".to_string(),
            build: python_config(),
            input_interface: Some(http_interface(Some("openapi.yaml"))),
            env: vec![
                EnvironmentVariable {
                    name: "Z_LAST".to_string(),
                    value: "1".to_string(),
                },
                EnvironmentVariable {
                    name: "A_FIRST".to_string(),
                    value: "2".to_string(),
                },
            ],
        };

        let request = encode_component(&agent, &registry).unwrap();

        assert_eq!(request.component_type, AGENT_COMPONENT_TYPE);
        assert_eq!(request.workflow.name, "google-cloud-buildpacks");
        assert_eq!(
            request.workflow.system_parameters,
            Some(encode_repository(&agent.build))
        );
        let names: Vec<&str> = request.env.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Z_LAST", "A_FIRST"]);
        let params = request.workflow.parameters.unwrap();
        assert!(params[ENDPOINTS_KEY][0].get("schemaType").is_none());
    }

    #[test]
    fn test_workflow_template_fallback() {
        let registry = StaticBuildpackRegistry::default();
        assert_eq!(workflow_template("ballerina", &registry), "ballerina-buildpack");
        assert_eq!(workflow_template("cobol", &registry), DOCKER_WORKFLOW_TEMPLATE);
    }
}
