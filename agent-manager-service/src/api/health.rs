//! Health Check API Handler
//!
//! Liveness only; the platform is not contacted.

/// GET /health
pub async fn health_check() -> &'static str {
    "OK"
}
