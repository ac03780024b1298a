//! Workspace umbrella crate for checklist decoding.
//!
//! This crate stitches the stages together so callers can go from an uploaded
//! `.docx` to a [`DecodeResult`] with a single call:
//!
//! ```text
//! bytes -> ingest (reader + mark detector) -> dedup -> matcher (resolver)
//!       -> report assembler -> DecodeResult
//! ```
//!
//! Reference data is loaded separately into an immutable [`ReferenceIndex`]
//! and passed in per call, so one [`Pipeline`] can serve any number of index
//! snapshots.
//!
//! ```
//! use checkdecode::{decode_document, Pipeline, PipelineConfig, ReferenceIndex};
//! use ingest::fixtures::docx_bytes;
//! use ingest::{RawDocument, Row, Table};
//!
//! let index = ReferenceIndex::from_direct_entries([("Fever", "Body temperature above normal.")]);
//! let pipeline = Pipeline::new(&PipelineConfig::default()).unwrap();
//!
//! let doc = RawDocument::new(vec![Table::new(vec![Row::new(["Fever", "+"])])], vec![]);
//! let bytes = docx_bytes(&doc).unwrap();
//!
//! let result = decode_document(&bytes, &pipeline, &index).unwrap();
//! assert_eq!(result.matched, ["Fever"]);
//! assert_eq!(result.report_markdown, "### Fever\nBody temperature above normal.");
//! ```

mod config;

use std::time::Instant;

use thiserror::Error;
use tracing::{info, warn, Level};

pub use crate::config::{ConfigLoadError, PipelineConfig};
pub use canonical::{canonical_key, collapse_whitespace, CanonicalKey};
pub use index::{
    build_reference, write_reference_map, BuilderConfig, IndexError, ReferenceIndex,
    ReferenceMode, ReferenceSource,
};
pub use ingest::{ChecklistItem, Extractor, IngestConfig, IngestError, RawDocument};
pub use matcher::report::{assemble, dedup_items};
pub use matcher::{
    DecodeResult, FuzzyResolution, MatchConfig, MatchError, MatchResult, ReportConfig, Resolver,
};

/// Errors that can occur while decoding a document through the pipeline.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PipelineError {
    #[error("ingest failure: {0}")]
    Ingest(#[from] IngestError),

    #[error("matcher failure: {0}")]
    Match(#[from] MatchError),
}

/// Compiled, reusable decoding pipeline. Holds configuration only.
#[derive(Debug, Clone)]
pub struct Pipeline {
    extractor: Extractor,
    resolver: Resolver,
    report: ReportConfig,
}

impl Pipeline {
    /// Validates and compiles every stage configuration.
    pub fn new(cfg: &PipelineConfig) -> Result<Self, PipelineError> {
        Ok(Self {
            extractor: Extractor::new(&cfg.ingest)?,
            resolver: Resolver::new(cfg.matcher.clone())?,
            report: cfg.report.clone(),
        })
    }

    pub fn extractor(&self) -> &Extractor {
        &self.extractor
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Decodes an uploaded `.docx`.
    pub fn decode(&self, bytes: &[u8], index: &ReferenceIndex) -> Result<DecodeResult, PipelineError> {
        let items = ingest::ingest(bytes, &self.extractor)?;
        Ok(self.decode_items(&items, index))
    }

    /// Decodes an already parsed document.
    pub fn decode_raw(&self, doc: &RawDocument, index: &ReferenceIndex) -> DecodeResult {
        let items = self.extractor.extract(doc);
        self.decode_items(&items, index)
    }

    /// Deduplicates, resolves and assembles extracted items.
    pub fn decode_items(&self, items: &[ChecklistItem], index: &ReferenceIndex) -> DecodeResult {
        let items = dedup_items(items);
        let results = self.resolver.resolve_all(&items, index);
        assemble(&items, &results, &self.report)
    }
}

/// Decodes `bytes` with `pipeline` against `index`, logging the outcome.
pub fn decode_document(
    bytes: &[u8],
    pipeline: &Pipeline,
    index: &ReferenceIndex,
) -> Result<DecodeResult, PipelineError> {
    let start = Instant::now();
    let span = tracing::span!(
        Level::INFO,
        "checkdecode.decode",
        reference_mode = %index.mode(),
        reference_entries = index.len()
    );
    let _guard = span.enter();

    match pipeline.decode(bytes, index) {
        Ok(result) => {
            info!(
                matched = result.matched.len(),
                missed = result.missed.len(),
                elapsed_micros = start.elapsed().as_micros(),
                "decode_document_success"
            );
            Ok(result)
        }
        Err(err) => {
            warn!(
                error = %err,
                elapsed_micros = start.elapsed().as_micros(),
                "decode_document_failure"
            );
            Err(err)
        }
    }
}

/// Builds a direct reference map from the body paragraphs of a `.docx`.
pub fn build_reference_from_docx(
    bytes: &[u8],
    cfg: &BuilderConfig,
) -> Result<serde_json::Map<String, serde_json::Value>, IngestError> {
    let paragraphs = ingest::read_paragraphs(bytes)?;
    Ok(build_reference(&paragraphs, cfg))
}
