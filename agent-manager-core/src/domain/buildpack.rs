//! Buildpack registry
//!
//! The platform recognizes a fixed set of buildpacks. Languages backed by a
//! Google buildpack need extra fields in the workflow parameters document
//! (version, entry point and the env variable the buildpack reads the version from).
//!
//! The registry is built once at startup and handed to the codec as a
//! [`BuildpackLookup`], so tests can substitute their own table.

use serde::{Deserialize, Serialize};

/// Who provides the buildpack for a language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildpackProvider {
    Google,
    Ballerina,
}

impl BuildpackProvider {
    /// Platform workflow template that builds with this provider
    pub fn workflow_template(&self) -> &'static str {
        match self {
            BuildpackProvider::Google => "google-cloud-buildpacks",
            BuildpackProvider::Ballerina => "ballerina-buildpack",
        }
    }
}

/// Registry entry for one language
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Buildpack {
    pub language: String,
    pub provider: BuildpackProvider,
    /// Environment variable the buildpack reads the language version from
    pub version_env_variable: String,
}

impl Buildpack {
    pub fn new(
        language: impl Into<String>,
        provider: BuildpackProvider,
        version_env_variable: impl Into<String>,
    ) -> Self {
        Self {
            language: language.into(),
            provider,
            version_env_variable: version_env_variable.into(),
        }
    }
}

/// Read-only view over the buildpack registry
pub trait BuildpackLookup: Send + Sync {
    /// Finds the registry entry for a language
    fn find(&self, language: &str) -> Option<&Buildpack>;

    /// Whether the language is built by a Google buildpack
    fn is_google_buildpack(&self, language: &str) -> bool {
        self.find(language)
            .is_some_and(|bp| bp.provider == BuildpackProvider::Google)
    }

    /// Version env variable for a Google buildpack language
    fn version_env_var(&self, language: &str) -> Option<&str> {
        self.find(language)
            .filter(|bp| bp.provider == BuildpackProvider::Google)
            .map(|bp| bp.version_env_variable.as_str())
    }
}

/// Registry backed by a static list of buildpacks
#[derive(Debug, Clone)]
pub struct StaticBuildpackRegistry {
    buildpacks: Vec<Buildpack>,
}

impl StaticBuildpackRegistry {
    pub fn new(buildpacks: Vec<Buildpack>) -> Self {
        Self { buildpacks }
    }

    pub fn buildpacks(&self) -> &[Buildpack] {
        &self.buildpacks
    }
}

impl Default for StaticBuildpackRegistry {
    /// The buildpacks shipped with the platform
    fn default() -> Self {
        use BuildpackProvider::{Ballerina, Google};

        Self::new(vec![
            Buildpack::new("python", Google, "GOOGLE_PYTHON_VERSION"),
            Buildpack::new("go", Google, "GOOGLE_GO_VERSION"),
            Buildpack::new("nodejs", Google, "GOOGLE_NODEJS_VERSION"),
            Buildpack::new("java", Google, "GOOGLE_RUNTIME_VERSION"),
            Buildpack::new("php", Google, "GOOGLE_RUNTIME_VERSION"),
            Buildpack::new("ruby", Google, "GOOGLE_RUNTIME_VERSION"),
            Buildpack::new("dotnet", Google, "GOOGLE_RUNTIME_VERSION"),
            Buildpack::new("ballerina", Ballerina, ""),
        ])
    }
}

impl BuildpackLookup for StaticBuildpackRegistry {
    fn find(&self, language: &str) -> Option<&Buildpack> {
        self.buildpacks.iter().find(|bp| bp.language == language)
    }
}
