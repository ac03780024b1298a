use crate::error::ServerResult;
use crate::state::{ReferenceSummary, ServerState};
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::sync::Arc;

/// Health check endpoint (liveness)
pub async fn health_check(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    let summary = ReferenceSummary::of(&state.reference());

    Json(json!({
        "status": "ok",
        "service": "checkdecode-server",
        "reference_mode": summary.reference_mode,
        "reference_entries": summary.reference_entries,
        "reference_ids": summary.reference_ids,
        "uptime_seconds": state.uptime_seconds(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Readiness check endpoint
///
/// An empty reference index is still ready: every item is reported as
/// missed rather than failing. An ID-mode index with explanations but no
/// question texts counts as populated, since code lookups still resolve.
pub async fn readiness_check(
    State(state): State<Arc<ServerState>>,
) -> ServerResult<impl IntoResponse> {
    let reference = state.reference();
    let reference_status = if reference.is_empty() { "empty" } else { "ready" };

    Ok(Json(json!({
        "status": "ready",
        "service": "checkdecode-server",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "uptime_seconds": state.uptime_seconds(),
        "components": {
            "api": "ready",
            "pipeline": "ready",
            "reference": reference_status,
        }
    })))
}

/// Prometheus metrics endpoint
///
/// Falls back to a JSON uptime document when the exporter is disabled.
pub async fn metrics(State(state): State<Arc<ServerState>>) -> Response {
    match &state.metrics {
        Some(handle) => (
            [(CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => Json(json!({
            "uptime_seconds": state.uptime_seconds(),
        }))
        .into_response(),
    }
}
