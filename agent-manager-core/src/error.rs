//! Error types for core transformations

use thiserror::Error;

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised while decoding or deriving build state
#[derive(Debug, Error)]
pub enum CoreError {
    /// The workflow parameters document does not have the expected nested shape
    #[error("failed to decode workflow parameters: {0}")]
    Decode(#[source] serde_json::Error),

    /// Typed build parameters could not be turned into a JSON document
    #[error("failed to encode workflow parameters: {0}")]
    Encode(#[source] serde_json::Error),

    /// Language version has no `major.minor` split
    #[error("invalid language version format: '{0}' (expected major.minor)")]
    InvalidLanguageVersionFormat(String),
}
