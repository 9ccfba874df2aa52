//! Agent Manager Service
//!
//! Build control plane for agents hosted on the platform.
//!
//! Architecture:
//! - Configuration: Load settings from environment or defaults
//! - API: axum handlers and error mapping
//! - Services: Build and agent logic over the platform client
//!
//! Nothing is stored locally. Every build read is projected fresh from the
//! platform's workflow runs.

mod api;
mod config;
mod service;

use std::sync::Arc;

use agent_manager_client::{PlatformApi, PlatformClient, StaticTokenProvider};
use agent_manager_core::domain::buildpack::StaticBuildpackRegistry;
use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::AppState;
use crate::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "agent_manager_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Agent Manager...");

    let config = load_config()?;
    info!(
        "Loaded configuration: platform_url={}, bind_addr={}",
        config.platform_url, config.bind_addr
    );

    let platform = create_platform_client(&config)?;
    let buildpacks = StaticBuildpackRegistry::default();
    info!("Registered {} buildpacks", buildpacks.buildpacks().len());

    let state = AppState {
        platform,
        buildpacks: Arc::new(buildpacks),
        instrumentation: config.instrumentation.clone(),
    };

    // Build router with all API endpoints
    let app = api::create_router(state);

    info!("Listening on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;

    axum::serve(listener, app)
        .await
        .context("Failed to start server")?;

    Ok(())
}

/// Load configuration from environment
///
/// There is no default platform: a missing `PLATFORM_URL` fails startup.
fn load_config() -> Result<Config> {
    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn create_platform_client(config: &Config) -> Result<Arc<dyn PlatformApi>> {
    let http_client = reqwest::Client::builder()
        .timeout(config.request_timeout)
        .build()
        .context("Failed to build HTTP client")?;

    let mut client = PlatformClient::with_client(config.platform_url.clone(), http_client);
    if let Some(token) = &config.platform_token {
        client = client.with_token_provider(Arc::new(StaticTokenProvider::new(token.clone())));
    }

    Ok(Arc::new(client))
}
