//! API Error Handling
//!
//! Unified error types and conversion for API responses.

use agent_manager_client::ClientError;
use agent_manager_core::CoreError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::service::{agent_service::AgentError, build_service::BuildError};

/// API error type
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Conflict(String),
    PlatformError(ClientError),
    InternalError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::PlatformError(ClientError::RequestFailed(err)) => {
                tracing::error!("Platform unreachable: {:?}", err);
                (
                    StatusCode::BAD_GATEWAY,
                    "Platform request failed".to_string(),
                )
            }
            ApiError::PlatformError(err) => {
                tracing::error!("Platform error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

impl From<ClientError> for ApiError {
    fn from(err: ClientError) -> Self {
        match err {
            err if err.is_not_found() => ApiError::NotFound(err.to_string()),
            ClientError::ApiError {
                status: 409,
                message,
            } => ApiError::Conflict(message),
            err => ApiError::PlatformError(err),
        }
    }
}

/// Core errors come from platform data, never from request input
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        ApiError::InternalError(err.to_string())
    }
}

impl From<BuildError> for ApiError {
    fn from(err: BuildError) -> Self {
        match err {
            BuildError::NotFound(msg) => ApiError::NotFound(msg),
            BuildError::ValidationError(msg) => ApiError::BadRequest(msg),
            BuildError::Platform(err) => err.into(),
            BuildError::Conversion(err) => err.into(),
        }
    }
}

impl From<AgentError> for ApiError {
    fn from(err: AgentError) -> Self {
        match err {
            AgentError::ValidationError(msg) => ApiError::BadRequest(msg),
            AgentError::Platform(err) => err.into(),
            AgentError::Conversion(err) => err.into(),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
