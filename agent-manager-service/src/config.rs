//! Service configuration
//!
//! Defines all configurable parameters for the agent manager service,
//! including the listen address, platform connection settings and the
//! instrumentation image used for python agents.

use std::time::Duration;

/// Instrumentation image settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstrumentationConfig {
    /// Image repository, e.g. "ghcr.io/acme/agent-instrumentation"
    pub image_prefix: String,
    /// Instrumentation release the image tag starts with
    pub version: String,
}

impl Default for InstrumentationConfig {
    fn default() -> Self {
        Self {
            image_prefix: "ghcr.io/wso2/amp-python-instrumentation-provider".to_string(),
            version: "0.1.0".to_string(),
        }
    }
}

/// Service configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP API listens on
    pub bind_addr: String,

    /// Platform API base URL (e.g., "http://localhost:9090")
    pub platform_url: String,

    /// Bearer token sent to the platform, if any
    pub platform_token: Option<String>,

    /// Timeout for a single platform request
    pub request_timeout: Duration,

    pub instrumentation: InstrumentationConfig,
}

impl Config {
    /// Creates a new configuration with defaults
    pub fn new(platform_url: String) -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            platform_url,
            platform_token: None,
            request_timeout: Duration::from_secs(30),
            instrumentation: InstrumentationConfig::default(),
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - PLATFORM_URL (required)
    /// - BIND_ADDR (optional, default: 0.0.0.0:8080)
    /// - PLATFORM_TOKEN (optional)
    /// - REQUEST_TIMEOUT (optional, seconds, default: 30)
    /// - INSTRUMENTATION_IMAGE_PREFIX (optional)
    /// - INSTRUMENTATION_VERSION (optional)
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Creates configuration from any key/value source
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let platform_url = lookup("PLATFORM_URL")
            .ok_or_else(|| anyhow::anyhow!("PLATFORM_URL environment variable not set"))?;

        let mut config = Self::new(platform_url);

        if let Some(bind_addr) = lookup("BIND_ADDR") {
            config.bind_addr = bind_addr;
        }

        config.platform_token = lookup("PLATFORM_TOKEN").filter(|token| !token.is_empty());

        config.request_timeout = lookup("REQUEST_TIMEOUT")
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(30));

        if let Some(prefix) = lookup("INSTRUMENTATION_IMAGE_PREFIX") {
            config.instrumentation.image_prefix = prefix;
        }

        if let Some(version) = lookup("INSTRUMENTATION_VERSION") {
            config.instrumentation.version = version;
        }

        Ok(config)
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.bind_addr.is_empty() {
            anyhow::bail!("bind_addr cannot be empty");
        }

        if self.platform_url.is_empty() {
            anyhow::bail!("platform_url cannot be empty");
        }

        if !self.platform_url.starts_with("http://") && !self.platform_url.starts_with("https://")
        {
            anyhow::bail!("platform_url must start with http:// or https://");
        }

        if self.request_timeout.as_secs() == 0 {
            anyhow::bail!("request_timeout must be greater than 0");
        }

        if self.instrumentation.image_prefix.is_empty() || self.instrumentation.version.is_empty()
        {
            anyhow::bail!("instrumentation image prefix and version cannot be empty");
        }

        Ok(())
    }
}
