//! Checklist Ingest Layer
//!
//! This is where an uploaded checklist enters the decoding pipeline. We take
//! the raw `.docx` bytes, read the main document part, and hand back the rows
//! and paragraphs the user actually ticked.
//!
//! ## What we do here
//!
//! - **Guard the payload** - Empty uploads and uploads over the configured
//!   size limit are rejected before the container is opened; the main part
//!   is read through a cap on its inflated size.
//! - **Read the document** - `word/document.xml` is walked with `quick-xml`
//!   into a [`RawDocument`]: top-level tables plus body paragraphs.
//! - **Detect marks** - Table rows whose mark column holds `+` and paragraphs
//!   carrying a check glyph become [`ChecklistItem`]s. Bracketed codes such as
//!   `[KD-001]` are captured on the way.
//! - **Log everything** - Structured logs via tracing for debugging production issues.
//!
//! ## Main entry point
//!
//! Build an [`Extractor`] once from an [`IngestConfig`] and call [`ingest`]
//! per upload. Duplicates are preserved; the report layer decides what to do
//! with them.
//!
//! ## Example
//!
//! ```
//! use ingest::fixtures::docx_bytes;
//! use ingest::{ingest, Extractor, IngestConfig, RawDocument, Row, Table};
//!
//! let doc = RawDocument::new(
//!     vec![Table::new(vec![Row::new(["Fever", "+"]), Row::new(["Cough", ""])])],
//!     vec!["\u{2611} Headache".into()],
//! );
//! let bytes = docx_bytes(&doc).unwrap();
//!
//! let extractor = Extractor::new(&IngestConfig::default()).unwrap();
//! let items = ingest(&bytes, &extractor).unwrap();
//!
//! let labels: Vec<_> = items.iter().map(|i| i.label.as_str()).collect();
//! assert_eq!(labels, ["Fever", "Headache"]);
//! ```
use std::time::Instant;

use tracing::{info, warn, Level};

pub mod docx;
#[doc(hidden)]
pub mod fixtures;

mod config;
mod error;
mod marks;
mod types;

pub use crate::config::{
    ConfigError, IngestConfig, MarkConfig, TableMarkPolicy, DEFAULT_CODE_PATTERN,
    DEFAULT_MAX_DOCUMENT_XML_BYTES, DEFAULT_SEPARATORS,
};
pub use crate::docx::{parse_docx, parse_docx_limited, parse_document_xml};
pub use crate::error::IngestError;
pub use crate::marks::Extractor;
pub use crate::types::{Cell, ChecklistItem, ItemOrigin, RawDocument, Row, Table};

/// Reads an uploaded `.docx` and returns every checked item in document order.
pub fn ingest(bytes: &[u8], extractor: &Extractor) -> Result<Vec<ChecklistItem>, IngestError> {
    let start = Instant::now();
    let span = tracing::span!(Level::INFO, "ingest.ingest", payload_bytes = bytes.len());
    let _guard = span.enter();

    match ingest_inner(bytes, extractor) {
        Ok(items) => {
            let elapsed_micros = start.elapsed().as_micros();
            info!(
                items = items.len(),
                with_code = items.iter().filter(|i| i.code.is_some()).count(),
                elapsed_micros,
                "ingest_success"
            );
            Ok(items)
        }
        Err(err) => {
            let elapsed_micros = start.elapsed().as_micros();
            warn!(error = %err, elapsed_micros, "ingest_failure");
            Err(err)
        }
    }
}

fn ingest_inner(bytes: &[u8], extractor: &Extractor) -> Result<Vec<ChecklistItem>, IngestError> {
    if bytes.is_empty() {
        return Err(IngestError::EmptyPayload);
    }
    // Reject oversized uploads before the container is opened.
    if let Some(limit) = extractor.max_payload_bytes() {
        if bytes.len() > limit {
            return Err(IngestError::PayloadTooLarge(format!(
                "upload size {} exceeds limit of {limit}",
                bytes.len()
            )));
        }
    }

    let doc = parse_docx_limited(bytes, extractor.max_document_xml_bytes())?;
    Ok(extractor.extract(&doc))
}

/// Body paragraphs of a `.docx`, in document order. Table content is not
/// included.
pub fn read_paragraphs(bytes: &[u8]) -> Result<Vec<String>, IngestError> {
    let doc = parse_docx(bytes)?;
    Ok(doc.paragraphs().to_vec())
}
