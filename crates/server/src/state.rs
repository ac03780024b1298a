use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use checkdecode::Pipeline;
use index::ReferenceIndex;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::{Arc, RwLock};
use std::time::Instant;

/// Shared application state
///
/// The reference index is held as an immutable snapshot. Requests clone the
/// current `Arc` and never observe a half-loaded index; a reload builds the
/// replacement off the lock and swaps it in.
pub struct ServerState {
    /// Server configuration
    pub config: Arc<ServerConfig>,

    /// Compiled pipeline (shared across requests)
    pub pipeline: Arc<Pipeline>,

    /// Prometheus handle, present when the exporter is installed
    pub metrics: Option<PrometheusHandle>,

    reference: RwLock<Arc<ReferenceIndex>>,
    started_at: Instant,
}

impl ServerState {
    /// Create new server state, loading reference data from the configured files
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        let index = ReferenceIndex::load(&config.reference)?;
        Self::with_index(config, index)
    }

    /// Create server state around an already built reference index
    pub fn with_index(config: ServerConfig, index: ReferenceIndex) -> ServerResult<Self> {
        let pipeline = Pipeline::new(&config.pipeline)
            .map_err(|err| ServerError::Config(format!("invalid pipeline config: {err}")))?;

        Ok(Self {
            config: Arc::new(config),
            pipeline: Arc::new(pipeline),
            metrics: None,
            reference: RwLock::new(Arc::new(index)),
            started_at: Instant::now(),
        })
    }

    /// Attach a Prometheus handle for the `/metrics` endpoint
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Current reference snapshot
    pub fn reference(&self) -> Arc<ReferenceIndex> {
        let guard = self
            .reference
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&guard)
    }

    /// Replace the reference snapshot; returns the previous one
    pub fn swap_reference(&self, index: ReferenceIndex) -> Arc<ReferenceIndex> {
        let mut guard = self
            .reference
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        std::mem::replace(&mut *guard, Arc::new(index))
    }

    /// Seconds since the state was created
    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

/// Reference summary reported by health and reload endpoints
#[derive(Debug, serde::Serialize)]
pub struct ReferenceSummary {
    pub reference_mode: String,
    /// Canonical keys available for label matching
    pub reference_entries: usize,
    /// Identifiers available for code lookups (ID mode)
    pub reference_ids: usize,
}

impl ReferenceSummary {
    pub fn of(index: &ReferenceIndex) -> Self {
        Self {
            reference_mode: index.mode().to_string(),
            reference_entries: index.len(),
            reference_ids: index.id_count(),
        }
    }
}
