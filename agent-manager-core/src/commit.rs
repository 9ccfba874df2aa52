//! Commit reference normalization

/// Shown when a build was triggered without a specific commit
pub const LATEST_COMMIT: &str = "latest";

/// Length of the short SHA shown by the build trigger template
pub const SHORT_SHA_LEN: usize = 8;

/// Normalizes a commit for display: missing or empty becomes `latest`,
/// anything else is shortened to an 8 character prefix.
pub fn commit_ref(commit: Option<&str>) -> String {
    match commit {
        Some(sha) if !sha.is_empty() => sha.chars().take(SHORT_SHA_LEN).collect(),
        _ => LATEST_COMMIT.to_string(),
    }
}
