//! Configuration types for checklist extraction.
//!
//! [`IngestConfig`] decides which glyphs count as "selected" and how the
//! table mark column is compared. Like the rest of the workspace configs it is
//! cheap to clone and deserializes from JSON, TOML or environment layers.
//!
//! # Quick Start
//!
//! ```rust
//! use ingest::IngestConfig;
//!
//! let config = IngestConfig::default();
//! config.validate().expect("default config is valid");
//! assert_eq!(config.marks.table_marks, vec!["+", "\u{FF0B}"]);
//! ```
//!
//! # Serialization
//!
//! ```json
//! {
//!   "version": 1,
//!   "max_payload_bytes": 10485760,
//!   "max_document_xml_bytes": 67108864,
//!   "marks": {
//!     "table_marks": ["+", "＋"],
//!     "paragraph_marks": ["☑", "☒", "✔", "X", "x"],
//!     "table_policy": "exact",
//!     "code_pattern": "\\[([A-Za-z]{2,4}-\\d{2,6})\\]"
//!   }
//! }
//! ```
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default bracketed identifier, e.g. `[KD-001]`. Group 1 is the bare code.
pub const DEFAULT_CODE_PATTERN: &str = r"\[([A-Za-z]{2,4}-\d{2,6})\]";

/// Cap on the inflated size of `word/document.xml` (64 MiB).
pub const DEFAULT_MAX_DOCUMENT_XML_BYTES: usize = 64 * 1024 * 1024;

/// Characters trimmed from both ends of a paragraph label once marks are gone.
pub const DEFAULT_SEPARATORS: &str = " -\u{2013}\u{2014}\t";

/// Runtime configuration for checklist extraction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct IngestConfig {
    /// Configuration schema version. Must be >= 1.
    pub version: u32,

    /// Reject uploads larger than this many bytes before unzipping.
    pub max_payload_bytes: Option<usize>,

    /// Reject documents whose main part inflates past this many bytes. The
    /// compressed upload size says nothing about this.
    pub max_document_xml_bytes: usize,

    pub marks: MarkConfig,
}

/// How the second cell of a table row is compared against the table marks.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TableMarkPolicy {
    /// Trimmed cell text must equal one of the marks.
    #[default]
    Exact,
    /// Any mark appearing anywhere in the cell selects the row.
    Contains,
}

/// Glyph sets and patterns used by the mark detector.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MarkConfig {
    /// Affirmative marks expected in the mark column of a table.
    pub table_marks: Vec<String>,

    /// Marks that select a free-text paragraph when they appear anywhere in it.
    /// They are also stripped from the resulting label.
    pub paragraph_marks: Vec<String>,

    pub table_policy: TableMarkPolicy,

    /// Trimmed from both ends of a paragraph label after mark removal.
    pub separators: String,

    /// Regex locating the structured code inside a selected label. `None`
    /// disables code detection.
    pub code_pattern: Option<String>,
}

impl Default for MarkConfig {
    fn default() -> Self {
        Self {
            table_marks: vec!["+".into(), "\u{FF0B}".into()],
            paragraph_marks: vec![
                "\u{2611}".into(),
                "\u{2612}".into(),
                "\u{2714}".into(),
                "X".into(),
                "x".into(),
            ],
            table_policy: TableMarkPolicy::Exact,
            separators: DEFAULT_SEPARATORS.into(),
            code_pattern: Some(DEFAULT_CODE_PATTERN.into()),
        }
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            version: 1,
            max_payload_bytes: None,
            max_document_xml_bytes: DEFAULT_MAX_DOCUMENT_XML_BYTES,
            marks: MarkConfig::default(),
        }
    }
}

/// Errors surfaced by [`IngestConfig::validate`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("config version must be >= 1")]
    InvalidVersion,

    #[error("max_document_xml_bytes must be > 0")]
    ZeroDocumentLimit,

    #[error("{field} must contain at least one mark")]
    EmptyMarkSet { field: &'static str },

    #[error("{field} contains an empty mark")]
    BlankMark { field: &'static str },

    #[error("invalid code_pattern: {0}")]
    InvalidCodePattern(String),
}

impl IngestConfig {
    /// Checks invariants that would otherwise surface as surprising
    /// extraction results.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version == 0 {
            return Err(ConfigError::InvalidVersion);
        }
        if self.max_document_xml_bytes == 0 {
            return Err(ConfigError::ZeroDocumentLimit);
        }
        self.marks.validate()
    }
}

impl MarkConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_marks("table_marks", &self.table_marks)?;
        check_marks("paragraph_marks", &self.paragraph_marks)?;
        self.compile_code_pattern()?;
        Ok(())
    }

    pub(crate) fn compile_code_pattern(&self) -> Result<Option<Regex>, ConfigError> {
        self.code_pattern
            .as_deref()
            .map(|pattern| {
                Regex::new(pattern).map_err(|err| ConfigError::InvalidCodePattern(err.to_string()))
            })
            .transpose()
    }
}

fn check_marks(field: &'static str, marks: &[String]) -> Result<(), ConfigError> {
    if marks.is_empty() {
        return Err(ConfigError::EmptyMarkSet { field });
    }
    if marks.iter().any(|m| m.trim().is_empty()) {
        return Err(ConfigError::BlankMark { field });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = IngestConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.marks.table_policy, TableMarkPolicy::Exact);
        assert!(cfg.max_payload_bytes.is_none());
        assert_eq!(cfg.max_document_xml_bytes, DEFAULT_MAX_DOCUMENT_XML_BYTES);
    }

    #[test]
    fn zero_document_limit_rejected() {
        let cfg = IngestConfig {
            max_document_xml_bytes: 0,
            ..Default::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroDocumentLimit));
    }

    #[test]
    fn zero_version_rejected() {
        let cfg = IngestConfig {
            version: 0,
            ..Default::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::InvalidVersion));
    }

    #[test]
    fn empty_table_marks_rejected() {
        let mut cfg = IngestConfig::default();
        cfg.marks.table_marks.clear();
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::EmptyMarkSet {
                field: "table_marks"
            })
        );
    }

    #[test]
    fn blank_paragraph_mark_rejected() {
        let mut cfg = IngestConfig::default();
        cfg.marks.paragraph_marks.push("  ".into());
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::BlankMark {
                field: "paragraph_marks"
            })
        );
    }

    #[test]
    fn broken_code_pattern_rejected() {
        let mut cfg = IngestConfig::default();
        cfg.marks.code_pattern = Some("[unclosed".into());
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidCodePattern(_))
        ));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: IngestConfig =
            serde_json::from_str(r#"{"marks": {"table_policy": "contains"}}"#).expect("parse");
        assert_eq!(cfg.version, 1);
        assert_eq!(cfg.marks.table_policy, TableMarkPolicy::Contains);
        assert_eq!(cfg.marks.table_marks, vec!["+", "\u{FF0B}"]);
    }
}
