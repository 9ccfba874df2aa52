//! Agent Manager Platform Client
//!
//! A type-safe HTTP client for the platform API that owns components and
//! workflow runs. The agent manager service only talks to the platform
//! through this crate.
//!
//! # Example
//!
//! ```no_run
//! use agent_manager_client::PlatformClient;
//! use agent_manager_core::domain::component::ComponentRef;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = PlatformClient::new("http://localhost:9090");
//!     let agent = ComponentRef::new("acme", "default", "reading-agent");
//!
//!     let run = client.trigger_build(&agent, None).await?;
//!     println!("Triggered build: {} ({})", run.name, run.status);
//!     Ok(())
//! }
//! ```

mod api;
pub mod auth;
mod builds;
mod components;
pub mod error;

// Re-export commonly used types
pub use api::PlatformApi;
pub use auth::{NoAuth, StaticTokenProvider, TokenProvider};
pub use error::{ClientError, Result};

use std::sync::Arc;

use agent_manager_core::domain::component::ComponentRef;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// HTTP client for the platform API
///
/// Endpoints are grouped by resource:
/// - Workflow runs (trigger, get, list)
/// - Components (get, create, update workflow parameters)
#[derive(Clone)]
pub struct PlatformClient {
    /// Base URL of the platform API (e.g., "http://localhost:9090")
    base_url: String,
    /// HTTP client instance
    client: Client,
    /// Bearer token source
    auth: Arc<dyn TokenProvider>,
}

impl std::fmt::Debug for PlatformClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlatformClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// Envelope every platform response is wrapped in
#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    data: Option<T>,
}

/// Error body returned on failures
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Paged list payload
#[derive(Debug, Deserialize)]
struct ListData<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

impl PlatformClient {
    /// Create a new platform client without authentication
    ///
    /// # Example
    /// ```
    /// use agent_manager_client::PlatformClient;
    ///
    /// let client = PlatformClient::new("http://localhost:9090");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new platform client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    ///
    /// # Example
    /// ```
    /// use agent_manager_client::PlatformClient;
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(30))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = PlatformClient::with_client("http://localhost:9090", http_client);
    /// ```
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            auth: Arc::new(NoAuth),
        }
    }

    /// Use a token provider for bearer authentication
    pub fn with_token_provider(mut self, auth: Arc<dyn TokenProvider>) -> Self {
        self.auth = auth;
        self
    }

    /// Get the base URL of the platform
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn project_url(&self, org: &str, project: &str) -> String {
        format!("{}/api/v1/orgs/{}/projects/{}", self.base_url, org, project)
    }

    fn component_url(&self, component: &ComponentRef) -> String {
        format!(
            "{}/components/{}",
            self.project_url(&component.org_name, &component.project_name),
            component.component_name
        )
    }

    // =============================================================================
    // Request Execution
    // =============================================================================

    fn authorize(request: RequestBuilder, token: Option<String>) -> RequestBuilder {
        match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Send a request, refreshing the token and retrying once on 401
    async fn send<F>(&self, build: F) -> Result<Response>
    where
        F: Fn(&Client) -> RequestBuilder + Send + Sync,
    {
        let token = self.auth.get_token().await?;
        let response = Self::authorize(build(&self.client), token).send().await?;

        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        tracing::debug!("Platform rejected token, refreshing and retrying");
        self.auth.invalidate_token().await;
        let token = self.auth.get_token().await?;
        let response = Self::authorize(build(&self.client), token).send().await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            let message = Self::error_message(response).await;
            return Err(ClientError::Unauthorized(message));
        }

        Ok(response)
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    async fn error_message(response: Response) -> String {
        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        match serde_json::from_str::<ErrorBody>(&text) {
            Ok(ErrorBody {
                error: Some(message),
                ..
            })
            | Ok(ErrorBody {
                message: Some(message),
                ..
            }) => message,
            _ => text,
        }
    }

    /// Handle a platform response and unwrap its `data` payload
    ///
    /// `context` names the operation for the missing-data error, e.g. "get build".
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: Response,
        context: &str,
    ) -> Result<T> {
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(Self::error_message(response).await));
        }

        if !status.is_success() {
            let message = Self::error_message(response).await;
            return Err(ClientError::api_error(status.as_u16(), message));
        }

        let envelope: ApiEnvelope<T> = response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))?;

        envelope
            .data
            .ok_or_else(|| ClientError::MissingData(format!("empty response from {}", context)))
    }
}
