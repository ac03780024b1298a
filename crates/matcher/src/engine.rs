use std::sync::Arc;
use std::time::Instant;

use canonical::canonical_key;
use index::ReferenceIndex;
use ingest::ChecklistItem;
use tracing::{debug, info};

use crate::metrics::metrics_recorder;
use crate::similarity::Similarity;
use crate::types::{MatchConfig, MatchError, MatchResult};

#[cfg(test)]
mod tests;

/// Resolves checked items against a [`ReferenceIndex`].
///
/// The resolver holds configuration only. Reference data is passed in on
/// every call, so a single resolver can serve several index snapshots.
#[derive(Clone)]
pub struct Resolver {
    cfg: MatchConfig,
    similarity: Arc<dyn Similarity>,
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("cfg", &self.cfg)
            .field("similarity", &self.similarity.name())
            .finish()
    }
}

impl Resolver {
    /// Validates `cfg` and builds the configured similarity metric.
    pub fn new(cfg: MatchConfig) -> Result<Self, MatchError> {
        let similarity: Arc<dyn Similarity> = Arc::from(cfg.metric.build());
        Self::with_similarity(cfg, similarity)
    }

    /// Uses a caller-provided metric instead of `cfg.metric`.
    pub fn with_similarity(
        cfg: MatchConfig,
        similarity: Arc<dyn Similarity>,
    ) -> Result<Self, MatchError> {
        cfg.validate()?;
        Ok(Self { cfg, similarity })
    }

    pub fn config(&self) -> &MatchConfig {
        &self.cfg
    }

    /// Resolves one item: by code first (when enabled and present), then by
    /// label.
    pub fn resolve(&self, item: &ChecklistItem, index: &ReferenceIndex) -> MatchResult {
        let start = Instant::now();
        let result = self.resolve_inner(item, index);
        if let Some(metrics) = metrics_recorder() {
            metrics.record_resolve(result.kind(), start.elapsed());
        }
        result
    }

    /// Resolves every item, keeping input order.
    pub fn resolve_all(&self, items: &[ChecklistItem], index: &ReferenceIndex) -> Vec<MatchResult> {
        items.iter().map(|item| self.resolve(item, index)).collect()
    }

    fn resolve_inner(&self, item: &ChecklistItem, index: &ReferenceIndex) -> MatchResult {
        if self.cfg.resolve_codes {
            if let Some(code) = item.code.as_deref() {
                let text = index.lookup_by_id(code).and_then(|hit| hit.text);
                if let Some(text) = text {
                    return MatchResult::Matched {
                        text: text.to_string(),
                        code: Some(code.to_string()),
                    };
                }
                debug!(code, label = %item.label, "resolve_code_miss");
            }
        }
        self.resolve_label(&item.label, index)
    }

    /// Resolves a raw label: exact canonical key, then fuzzy fallback.
    pub fn resolve_label(&self, label: &str, index: &ReferenceIndex) -> MatchResult {
        let key = canonical_key(label);
        if key.is_empty() {
            return MatchResult::Unmatched;
        }

        // An exact hit is final even when it carries no text.
        if let Some(hit) = index.lookup_exact(&key) {
            return match hit.text {
                Some(text) => MatchResult::Matched {
                    text: text.to_string(),
                    code: None,
                },
                None => MatchResult::Unmatched,
            };
        }

        let Some((matched_key, score)) = self.best_candidate(&key, index) else {
            return MatchResult::Unmatched;
        };
        if score < self.cfg.cutoff {
            debug!(key = %key, best = matched_key, score, cutoff = self.cfg.cutoff, "resolve_below_cutoff");
            return MatchResult::Unmatched;
        }

        match index.lookup_exact(matched_key).and_then(|hit| hit.text) {
            Some(text) => {
                info!(
                    label,
                    matched_key,
                    score,
                    metric = self.similarity.name(),
                    "resolve_fuzzy"
                );
                MatchResult::MatchedViaFuzzy {
                    text: text.to_string(),
                    matched_key: matched_key.to_string(),
                    score,
                }
            }
            None => MatchResult::Unmatched,
        }
    }

    /// Highest scoring key; the earliest key in load order wins ties.
    fn best_candidate<'a>(&self, key: &str, index: &'a ReferenceIndex) -> Option<(&'a str, f64)> {
        let mut best: Option<(&'a str, f64)> = None;
        for candidate in index.all_keys() {
            let score = self.similarity.score(key, candidate.as_str());
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((candidate.as_str(), score));
            }
        }
        best
    }
}
