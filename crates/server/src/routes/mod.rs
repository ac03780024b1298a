//! API route handlers
//!
//! - `health`: Health checks, readiness, and metrics
//! - `decode`: Checklist decoding and reference reload

pub mod decode;
pub mod health;

use crate::error::{ServerError, ServerResult};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

/// API version and base info
///
/// # Response
///
/// ```json
/// {
///   "name": "checkdecode-server",
///   "version": "0.1.0",
///   "endpoints": ["..."]
/// }
/// ```
pub async fn api_info() -> ServerResult<impl IntoResponse> {
    Ok(Json(json!({
        "name": "checkdecode-server",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            "/decode",
            "/reference/reload",
            "/health",
            "/ready",
            "/metrics"
        ]
    })))
}

/// 404 Not Found handler
pub async fn not_found() -> ServerError {
    ServerError::NotFound
}
