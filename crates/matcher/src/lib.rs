//! # Checklist Matcher (`matcher`)
//!
//! ## Purpose
//!
//! `matcher` sits between the ingest layer (`ingest`), which finds the items
//! a user ticked, and the reference layer (`index`), which knows what each
//! item means. It resolves every checked item to an explanation and assembles
//! the final report.
//!
//! Resolution order for one item:
//!
//! 1. its structured code, looked up by identifier (when enabled)
//! 2. its canonical key, looked up exactly
//! 3. the closest reference key by string similarity, if the score reaches
//!    the configured cutoff
//!
//! "No match" is an ordinary outcome ([`MatchResult::Unmatched`]), never an
//! error.
//!
//! ## Core Types
//!
//! - [`MatchConfig`]: cutoff, similarity metric and code resolution toggle.
//! - [`Similarity`]: pluggable metric; [`SequenceRatio`] by default,
//!   [`NormalizedLevenshtein`] and [`JaroWinkler`] via `strsim`.
//! - [`Resolver`]: stateless apart from configuration; reference data is
//!   passed in per call.
//! - [`report::assemble`]: builds a [`DecodeResult`] with a Markdown report.
//!
//! ## Example Usage
//!
//! ```
//! use index::ReferenceIndex;
//! use ingest::ChecklistItem;
//! use matcher::report::{assemble, dedup_items, ReportConfig};
//! use matcher::{MatchConfig, Resolver};
//!
//! let index = ReferenceIndex::from_direct_entries([("Headache", "Pain in the head.")]);
//! let resolver = Resolver::new(MatchConfig::default()).unwrap();
//!
//! let items = dedup_items(&[
//!     ChecklistItem::from_label("Head ache"),
//!     ChecklistItem::from_label("Head ache"),
//!     ChecklistItem::from_label("Dizziness"),
//! ]);
//! let results = resolver.resolve_all(&items, &index);
//! let decoded = assemble(&items, &results, &ReportConfig::default());
//!
//! assert_eq!(decoded.matched, ["Head ache"]);
//! assert_eq!(decoded.missed, ["Dizziness"]);
//! assert_eq!(decoded.report_markdown, "### Head ache\nPain in the head.");
//! ```
//!
//! ## Observability
//!
//! Install a [`ResolveMetrics`] implementation via [`set_resolve_metrics`] to
//! record per-item outcomes and latency. This is typically done once during
//! service startup so every [`Resolver`] shares the same metrics backend.

pub mod engine;
pub mod metrics;
pub mod report;
pub mod similarity;
pub mod types;

pub use crate::engine::Resolver;
pub use crate::metrics::{set_resolve_metrics, ResolveMetrics};
pub use crate::report::{DecodeResult, FuzzyResolution, ReportConfig};
pub use crate::similarity::{
    JaroWinkler, NormalizedLevenshtein, SequenceRatio, Similarity, SimilarityMetric,
};
pub use crate::types::{MatchConfig, MatchError, MatchKind, MatchResult, DEFAULT_CUTOFF};
