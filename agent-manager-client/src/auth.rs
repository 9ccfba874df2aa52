//! Token providers
//!
//! The client asks a [`TokenProvider`] for a bearer token on every request.
//! When the platform answers 401 the client invalidates the token and retries
//! once, so caching providers get a chance to fetch a fresh one.

use async_trait::async_trait;

use crate::error::Result;

/// Supplies bearer tokens for platform requests
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Current token, or `None` to send the request unauthenticated
    async fn get_token(&self) -> Result<Option<String>>;

    /// Drops any cached token so the next call fetches a new one
    async fn invalidate_token(&self);
}

/// Sends requests without an `Authorization` header
#[derive(Debug, Clone, Default)]
pub struct NoAuth;

#[async_trait]
impl TokenProvider for NoAuth {
    async fn get_token(&self) -> Result<Option<String>> {
        Ok(None)
    }

    async fn invalidate_token(&self) {}
}

/// Always hands out the same preconfigured token
#[derive(Debug, Clone)]
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn get_token(&self) -> Result<Option<String>> {
        Ok(Some(self.token.clone()))
    }

    async fn invalidate_token(&self) {
        tracing::debug!("Static token cannot be refreshed, reusing it");
    }
}
