// Metrics hooks for the `matcher` crate.
//
// Callers install a global `ResolveMetrics` implementation via
// [`set_resolve_metrics`]; every `Resolver::resolve` call then reports its
// outcome and latency. The crate itself never depends on a metrics backend.
use std::sync::{Arc, RwLock};
use std::time::Duration;

use once_cell::sync::OnceCell;

use crate::types::MatchKind;

/// Observer for individual resolutions.
pub trait ResolveMetrics: Send + Sync {
    fn record_resolve(&self, kind: MatchKind, latency: Duration);
}

fn metrics_lock() -> &'static RwLock<Option<Arc<dyn ResolveMetrics>>> {
    static METRICS: OnceCell<RwLock<Option<Arc<dyn ResolveMetrics>>>> = OnceCell::new();
    METRICS.get_or_init(|| RwLock::new(None))
}

pub(crate) fn metrics_recorder() -> Option<Arc<dyn ResolveMetrics>> {
    let guard = metrics_lock()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.clone()
}

/// Install or clear the global resolve metrics recorder.
///
/// Typically called once during service startup.
pub fn set_resolve_metrics(recorder: Option<Arc<dyn ResolveMetrics>>) {
    let mut guard = metrics_lock()
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = recorder;
}
