//! # Checklist Reference Index
//!
//! This crate holds the reference knowledge base every checked item is
//! resolved against. Data is loaded once (at process start or on an explicit
//! reload) and is read-only afterwards, so a loaded [`ReferenceIndex`] can be
//! shared across threads behind an `Arc` without locking.
//!
//! ## Core Features
//!
//! - **Two data shapes** behind a common [`ReferenceBackend`] trait:
//!   - [`DirectBackend`]: canonical key -> explanation text, from one JSON file.
//!   - [`IdBackend`]: identifier -> explanation text and identifier -> question
//!     text, from two JSON files. The question key -> identifier reverse index
//!     is derived on every load and never edited directly.
//! - **Canonical keys**: every key goes through [`canonical::canonical_key`]
//!   at load time, so lookups only ever compare normalized strings.
//! - **Stable order**: [`ReferenceIndex::all_keys`] follows file order, which
//!   makes fuzzy tie-breaking deterministic.
//! - **Forgiving loads**: a missing file is logged and yields an empty index;
//!   malformed JSON is an error.
//! - **Offline builder**: [`builder`] segments a source document's paragraphs
//!   into a direct reference map.
//!
//! ## Example Usage
//!
//! ```
//! use index::{ReferenceIndex, ReferenceMode};
//!
//! let index = ReferenceIndex::from_direct_entries([
//!     ("Fever", "Body temperature above normal."),
//!     ("Head ache (tension)", "Pain in the head."),
//! ]);
//!
//! assert_eq!(index.mode(), ReferenceMode::Direct);
//! assert_eq!(index.len(), 2);
//! assert_eq!(
//!     index.lookup_exact("head ache").and_then(|hit| hit.text),
//!     Some("Pain in the head.")
//! );
//! ```

mod backend;
pub mod builder;
pub mod loader;

use std::path::{Path, PathBuf};
use std::time::Instant;

use canonical::CanonicalKey;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

pub use backend::{DirectBackend, IdBackend, ReferenceBackend, ReferenceHit, ReferenceMode};
pub use builder::{build_reference, write_reference_map, BuilderConfig};

/// Where reference data is read from.
///
/// Serialized with a `mode` tag so it can sit directly in a config file:
///
/// ```json
/// { "mode": "by_id", "explanations": "decode_by_id.json", "questions": "questions_by_id.json" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ReferenceSource {
    Direct {
        path: PathBuf,
    },
    ById {
        explanations: PathBuf,
        #[serde(default)]
        questions: Option<PathBuf>,
    },
}

impl Default for ReferenceSource {
    fn default() -> Self {
        ReferenceSource::Direct {
            path: PathBuf::from("decode_map.json"),
        }
    }
}

impl ReferenceSource {
    pub fn mode(&self) -> ReferenceMode {
        match self {
            ReferenceSource::Direct { .. } => ReferenceMode::Direct,
            ReferenceSource::ById { .. } => ReferenceMode::ById,
        }
    }
}

/// Errors raised while loading or writing reference data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IndexError {
    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },
    #[error("malformed JSON in {path}: {message}")]
    Parse { path: String, message: String },
    #[error("invalid entry {key:?} in {path}: {reason}")]
    InvalidEntry {
        path: String,
        key: String,
        reason: String,
    },
    #[error("invalid builder configuration: {0}")]
    InvalidConfig(String),
}

impl IndexError {
    pub fn io<E: std::fmt::Display>(path: &Path, err: E) -> Self {
        Self::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }

    pub fn parse<E: std::fmt::Display>(path: &Path, err: E) -> Self {
        Self::Parse {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }
}

/// Immutable, loaded reference data.
pub struct ReferenceIndex {
    /// Storage shape, abstracted behind a trait.
    backend: Box<dyn ReferenceBackend>,
}

impl std::fmt::Debug for ReferenceIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReferenceIndex")
            .field("mode", &self.mode())
            .field("len", &self.len())
            .finish()
    }
}

impl ReferenceIndex {
    /// Reads the configured files and builds a fresh index. Derived
    /// structures are always rebuilt from scratch.
    pub fn load(source: &ReferenceSource) -> Result<Self, IndexError> {
        let start = Instant::now();
        let backend: Box<dyn ReferenceBackend> = match source {
            ReferenceSource::Direct { path } => {
                Box::new(DirectBackend::new(loader::read_entries(path)?))
            }
            ReferenceSource::ById {
                explanations,
                questions,
            } => {
                let explanations = loader::read_entries(explanations)?;
                let questions = match questions {
                    Some(path) => loader::read_entries(path)?,
                    None => Vec::new(),
                };
                Box::new(IdBackend::new(explanations, questions))
            }
        };

        let index = Self::with_backend(backend);
        info!(
            mode = %index.mode(),
            entries = index.len(),
            ids = index.id_count(),
            elapsed_micros = start.elapsed().as_micros(),
            "reference_loaded"
        );
        Ok(index)
    }

    /// Wraps a custom backend (e.g. a prebuilt one in tests).
    pub fn with_backend(backend: Box<dyn ReferenceBackend>) -> Self {
        Self { backend }
    }

    /// An index with no entries.
    pub fn empty(mode: ReferenceMode) -> Self {
        match mode {
            ReferenceMode::Direct => Self::with_backend(Box::new(DirectBackend::default())),
            ReferenceMode::ById => Self::with_backend(Box::new(IdBackend::default())),
        }
    }

    /// Direct index from in-memory `(raw key, text)` pairs.
    pub fn from_direct_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|(k, v)| (k.into(), Some(v.into())));
        Self::with_backend(Box::new(DirectBackend::new(entries)))
    }

    /// ID-indexed index from in-memory `(id, text)` and `(id, question)` pairs.
    pub fn from_id_entries<E, Q, K, V>(explanations: E, questions: Q) -> Self
    where
        E: IntoIterator<Item = (K, V)>,
        Q: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let explanations = explanations
            .into_iter()
            .map(|(k, v)| (k.into(), Some(v.into())));
        let questions = questions
            .into_iter()
            .map(|(k, v)| (k.into(), Some(v.into())));
        Self::with_backend(Box::new(IdBackend::new(explanations, questions)))
    }

    pub fn mode(&self) -> ReferenceMode {
        self.backend.mode()
    }

    /// Number of canonical keys available for matching.
    pub fn len(&self) -> usize {
        self.backend.len()
    }

    /// Number of identifiers available for code lookups (ID mode only).
    pub fn id_count(&self) -> usize {
        self.backend.id_count()
    }

    /// True when no lookup of either kind can succeed.
    pub fn is_empty(&self) -> bool {
        self.backend.is_empty()
    }

    pub fn lookup_exact(&self, key: &str) -> Option<ReferenceHit<'_>> {
        self.backend.lookup_exact(key)
    }

    pub fn lookup_by_id(&self, id: &str) -> Option<ReferenceHit<'_>> {
        self.backend.lookup_by_id(id)
    }

    /// Every canonical key in load order.
    pub fn all_keys(&self) -> &[CanonicalKey] {
        self.backend.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, body).expect("write fixture");
        path
    }

    #[test]
    fn load_direct_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write(
            dir.path(),
            "decode_map.json",
            r#"{"Fever": "Hot.", "Head  ache (daily)": "Pain.", "Rash": null}"#,
        );
        let index = ReferenceIndex::load(&ReferenceSource::Direct { path }).expect("load");

        assert_eq!(index.mode(), ReferenceMode::Direct);
        let keys: Vec<&str> = index.all_keys().iter().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["fever", "head ache", "rash"]);
        assert_eq!(index.lookup_exact("head ache").and_then(|h| h.text), Some("Pain."));
        assert_eq!(index.lookup_exact("rash").and_then(|h| h.text), None);
    }

    #[test]
    fn load_by_id_from_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let explanations = write(dir.path(), "by_id.json", r#"{"KD-001": "Explanation text"}"#);
        let questions = write(dir.path(), "questions.json", r#"{"KD-001": "Symptom"}"#);
        let source = ReferenceSource::ById {
            explanations,
            questions: Some(questions),
        };
        let index = ReferenceIndex::load(&source).expect("load");

        assert_eq!(index.mode(), ReferenceMode::ById);
        assert_eq!(index.lookup_by_id("KD-001").and_then(|h| h.text), Some("Explanation text"));
        assert_eq!(index.lookup_exact("symptom").and_then(|h| h.id), Some("KD-001"));
    }

    #[test]
    fn missing_files_yield_empty_index() {
        let dir = tempfile::tempdir().expect("tempdir");
        let direct = ReferenceSource::Direct {
            path: dir.path().join("nope.json"),
        };
        assert!(ReferenceIndex::load(&direct).expect("load").is_empty());

        let by_id = ReferenceSource::ById {
            explanations: dir.path().join("a.json"),
            questions: Some(dir.path().join("b.json")),
        };
        let index = ReferenceIndex::load(&by_id).expect("load");
        assert!(index.is_empty());
        assert!(index.lookup_by_id("KD-001").is_none());
    }

    #[test]
    fn explanations_without_questions_still_serve_codes() {
        let dir = tempfile::tempdir().expect("tempdir");
        let explanations = write(dir.path(), "by_id.json", r#"{"KD-001": "Text"}"#);
        let source = ReferenceSource::ById {
            explanations,
            questions: None,
        };
        let index = ReferenceIndex::load(&source).expect("load");

        assert_eq!(index.len(), 0);
        assert_eq!(index.id_count(), 1);
        assert!(!index.is_empty());
        assert_eq!(index.lookup_by_id("KD-001").and_then(|h| h.text), Some("Text"));
        assert_eq!(ReferenceIndex::empty(ReferenceMode::Direct).id_count(), 0);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write(dir.path(), "broken.json", "{ not json");
        let err = ReferenceIndex::load(&ReferenceSource::Direct { path }).unwrap_err();
        assert!(matches!(err, IndexError::Parse { .. }));
    }

    #[test]
    fn reload_rebuilds_reverse_index() {
        let dir = tempfile::tempdir().expect("tempdir");
        let explanations = write(dir.path(), "e.json", r#"{"Q-1": "one"}"#);
        let questions = write(dir.path(), "q.json", r#"{"Q-1": "Old question"}"#);
        let source = ReferenceSource::ById {
            explanations,
            questions: Some(questions.clone()),
        };
        let first = ReferenceIndex::load(&source).expect("load");
        assert!(first.lookup_exact("old question").is_some());

        fs::write(&questions, r#"{"Q-1": "New question"}"#).expect("rewrite");
        let second = ReferenceIndex::load(&source).expect("reload");
        assert!(second.lookup_exact("old question").is_none());
        assert!(second.lookup_exact("new question").is_some());
    }

    #[test]
    fn source_config_shape() {
        let source: ReferenceSource =
            serde_json::from_str(r#"{"mode": "by_id", "explanations": "e.json"}"#).expect("de");
        assert_eq!(
            source,
            ReferenceSource::ById {
                explanations: "e.json".into(),
                questions: None
            }
        );
        assert_eq!(source.mode(), ReferenceMode::ById);
        assert_eq!(ReferenceSource::default().mode(), ReferenceMode::Direct);
    }

    #[test]
    fn empty_index_per_mode() {
        assert_eq!(ReferenceIndex::empty(ReferenceMode::ById).mode(), ReferenceMode::ById);
        assert!(ReferenceIndex::empty(ReferenceMode::Direct).all_keys().is_empty());
    }
}
