//! Prometheus recording for decode requests and individual resolutions.

use checkdecode::DecodeResult;
use matcher::{MatchKind, ResolveMetrics};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::Arc;
use std::time::Duration;

pub const DECODE_REQUESTS: &str = "checkdecode_decode_requests_total";
pub const ITEMS_MATCHED: &str = "checkdecode_items_matched_total";
pub const ITEMS_MISSED: &str = "checkdecode_items_missed_total";
pub const DECODE_DURATION: &str = "checkdecode_decode_duration_seconds";
pub const RESOLVE_TOTAL: &str = "checkdecode_resolve_total";
pub const RESOLVE_DURATION: &str = "checkdecode_resolve_duration_seconds";

/// Install the global Prometheus recorder and the resolver hook.
pub fn install() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    matcher::set_resolve_metrics(Some(Arc::new(PrometheusResolveMetrics)));
    Ok(handle)
}

/// Forwards resolver outcomes to the `metrics` facade.
#[derive(Debug, Default)]
pub struct PrometheusResolveMetrics;

impl ResolveMetrics for PrometheusResolveMetrics {
    fn record_resolve(&self, kind: MatchKind, latency: Duration) {
        metrics::counter!(RESOLVE_TOTAL, "kind" => kind.as_str()).increment(1);
        metrics::histogram!(RESOLVE_DURATION).record(latency.as_secs_f64());
    }
}

pub fn record_decode(result: Result<&DecodeResult, &str>, elapsed: Duration) {
    metrics::histogram!(DECODE_DURATION).record(elapsed.as_secs_f64());
    match result {
        Ok(decoded) => {
            metrics::counter!(DECODE_REQUESTS, "outcome" => "ok").increment(1);
            metrics::counter!(ITEMS_MATCHED).increment(decoded.matched.len() as u64);
            metrics::counter!(ITEMS_MISSED).increment(decoded.missed.len() as u64);
        }
        Err(code) => {
            metrics::counter!(DECODE_REQUESTS, "outcome" => "error", "code" => code.to_string())
                .increment(1);
        }
    }
}
