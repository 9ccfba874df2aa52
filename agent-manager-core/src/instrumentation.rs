//! Instrumentation image selection
//!
//! Python agents get an auto-instrumentation init image built per
//! interpreter minor version, e.g. `registry/instrumentation:0.4.0-python3.11`.

use crate::error::{CoreError, Result};

/// Language that receives auto-instrumentation
pub const INSTRUMENTED_LANGUAGE: &str = "python";

/// Splits a language version into `(major, minor)`
///
/// Anything after the minor component is ignored.
pub fn major_minor(language_version: &str) -> Result<(&str, &str)> {
    let mut parts = language_version.trim().split('.');
    match (parts.next(), parts.next()) {
        (Some(major), Some(minor)) if !major.is_empty() && !minor.is_empty() => Ok((major, minor)),
        _ => Err(CoreError::InvalidLanguageVersionFormat(
            language_version.to_string(),
        )),
    }
}

/// Image reference for the instrumentation matching a language version
pub fn instrumentation_image(
    image_prefix: &str,
    agent_version: &str,
    language_version: &str,
) -> Result<String> {
    let (major, minor) = major_minor(language_version)?;

    Ok(format!(
        "{}:{}-python{}.{}",
        image_prefix, agent_version, major, minor
    ))
}
