use crate::error::{ServerError, ServerResult};
use crate::state::{ReferenceSummary, ServerState};
use crate::telemetry;
use axum::extract::{Multipart, State};
use axum::Json;
use checkdecode::DecodeResult;
use index::ReferenceIndex;
use std::sync::Arc;
use std::time::Instant;

/// Multipart field carrying the uploaded checklist
pub const UPLOAD_FIELD: &str = "file";

/// Decode an uploaded checklist
///
/// Expects `multipart/form-data` with the `.docx` in field `file`. Parsing
/// and matching run on the blocking pool against the reference snapshot
/// current when the request arrived.
pub async fn decode_document(
    State(state): State<Arc<ServerState>>,
    mut multipart: Multipart,
) -> ServerResult<Json<DecodeResult>> {
    let mut upload = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(UPLOAD_FIELD) {
            upload = Some(field.bytes().await?);
            break;
        }
    }
    let bytes = upload.ok_or_else(|| {
        ServerError::BadRequest(format!("multipart field '{UPLOAD_FIELD}' is required"))
    })?;

    let pipeline = Arc::clone(&state.pipeline);
    let index = state.reference();
    let start = Instant::now();

    let outcome = tokio::task::spawn_blocking(move || {
        checkdecode::decode_document(&bytes, &pipeline, &index)
    })
    .await?
    .map_err(ServerError::from);

    match &outcome {
        Ok(result) => telemetry::record_decode(Ok(result), start.elapsed()),
        Err(err) => telemetry::record_decode(Err(err.error_code()), start.elapsed()),
    }

    outcome.map(Json)
}

/// Rebuild the reference index from the configured files and swap it in
pub async fn reload_reference(
    State(state): State<Arc<ServerState>>,
) -> ServerResult<Json<ReferenceSummary>> {
    let source = state.config.reference.clone();
    let index = tokio::task::spawn_blocking(move || ReferenceIndex::load(&source)).await??;

    let summary = ReferenceSummary::of(&index);
    let previous = state.swap_reference(index);
    tracing::info!(
        reference_mode = %summary.reference_mode,
        reference_entries = summary.reference_entries,
        previous_entries = previous.len(),
        "reference_reloaded"
    );

    Ok(Json(summary))
}
