//! Error types produced by the ingest crate.
//!
//! | Error | Category | Description |
//! |-------|----------|-------------|
//! | [`EmptyPayload`](IngestError::EmptyPayload) | Validation | Upload has zero bytes |
//! | [`PayloadTooLarge`](IngestError::PayloadTooLarge) | Validation | Size limit exceeded |
//! | [`MalformedDocument`](IngestError::MalformedDocument) | Parse | Not a readable zip/XML document |
//! | [`MissingDocumentPart`](IngestError::MissingDocumentPart) | Parse | Container lacks the main document part |
//! | [`InvalidConfig`](IngestError::InvalidConfig) | Config | Mark configuration rejected |
//!
//! "No checked items" is not an error: extraction simply returns an empty list.
use thiserror::Error;

use crate::config::ConfigError;

/// Errors that can occur while reading an uploaded checklist.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum IngestError {
    #[error("document payload is empty")]
    EmptyPayload,

    #[error("payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("malformed document: {0}")]
    MalformedDocument(String),

    #[error("document part missing: {0}")]
    MissingDocumentPart(String),

    #[error("invalid ingest configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}

impl From<zip::result::ZipError> for IngestError {
    fn from(err: zip::result::ZipError) -> Self {
        IngestError::MalformedDocument(format!("unreadable container: {err}"))
    }
}

impl From<quick_xml::Error> for IngestError {
    fn from(err: quick_xml::Error) -> Self {
        IngestError::MalformedDocument(format!("invalid document xml: {err}"))
    }
}
