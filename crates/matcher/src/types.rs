use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::similarity::SimilarityMetric;

/// Default minimum similarity for a fuzzy match to be accepted.
pub const DEFAULT_CUTOFF: f64 = 0.6;

/// Configuration for the resolver.
///
/// `MatchConfig` is cheap to clone and serde-friendly so it can be embedded in
/// higher-level configs and overridden from the environment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MatchConfig {
    /// Minimum fuzzy score, inclusive, in `[0.0, 1.0]`.
    pub cutoff: f64,

    /// Metric used by the fuzzy fallback.
    pub metric: SimilarityMetric,

    /// Look up items that carry a structured code by identifier before
    /// trying their label.
    pub resolve_codes: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            cutoff: DEFAULT_CUTOFF,
            metric: SimilarityMetric::default(),
            resolve_codes: true,
        }
    }
}

impl MatchConfig {
    pub fn validate(&self) -> Result<(), MatchError> {
        if !(0.0..=1.0).contains(&self.cutoff) {
            return Err(MatchError::InvalidConfig(format!(
                "cutoff must be between 0.0 and 1.0, got {}",
                self.cutoff
            )));
        }
        Ok(())
    }
}

/// Outcome of resolving one checked item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MatchResult {
    /// Exact hit on the canonical key, or on the item's code when `code` is set.
    Matched {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        code: Option<String>,
    },
    /// Closest reference key at or above the cutoff.
    MatchedViaFuzzy {
        text: String,
        matched_key: String,
        score: f64,
    },
    Unmatched,
}

impl MatchResult {
    pub fn is_match(&self) -> bool {
        !matches!(self, MatchResult::Unmatched)
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            MatchResult::Matched { text, .. } | MatchResult::MatchedViaFuzzy { text, .. } => {
                Some(text)
            }
            MatchResult::Unmatched => None,
        }
    }

    pub fn kind(&self) -> MatchKind {
        match self {
            MatchResult::Matched { code: Some(_), .. } => MatchKind::Code,
            MatchResult::Matched { code: None, .. } => MatchKind::Exact,
            MatchResult::MatchedViaFuzzy { .. } => MatchKind::Fuzzy,
            MatchResult::Unmatched => MatchKind::Unmatched,
        }
    }
}

/// Coarse outcome label for logs and metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    Code,
    Exact,
    Fuzzy,
    Unmatched,
}

impl MatchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchKind::Code => "code",
            MatchKind::Exact => "exact",
            MatchKind::Fuzzy => "fuzzy",
            MatchKind::Unmatched => "unmatched",
        }
    }
}

/// Errors produced by the matching layer. Failing to find a match is not one
/// of them.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MatchError {
    #[error("invalid match config: {0}")]
    InvalidConfig(String),
}
