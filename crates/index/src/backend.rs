use std::fmt;

use canonical::CanonicalKey;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Which shape of reference data backs an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceMode {
    /// Canonical key -> explanation text.
    Direct,
    /// Identifier -> explanation text, plus identifier -> question text.
    ById,
}

impl ReferenceMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceMode::Direct => "direct",
            ReferenceMode::ById => "by_id",
        }
    }
}

impl fmt::Display for ReferenceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a successful lookup. `text` is `None` when the entry exists but
/// carries no explanation (a JSON `null`, an empty string, or an identifier
/// with no explanation record).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceHit<'a> {
    pub id: Option<&'a str>,
    pub text: Option<&'a str>,
}

/// Read-only storage behind a [`ReferenceIndex`](crate::ReferenceIndex).
///
/// Implementations are built once and never mutated, so they are shared
/// across request threads without locking.
pub trait ReferenceBackend: Send + Sync {
    fn mode(&self) -> ReferenceMode;

    /// Number of distinct canonical keys.
    fn len(&self) -> usize;

    /// Number of identifiers reachable by code lookup. Zero in direct mode.
    fn id_count(&self) -> usize {
        0
    }

    /// True when neither label nor code lookups can ever hit.
    fn is_empty(&self) -> bool {
        self.len() == 0 && self.id_count() == 0
    }

    /// Exact lookup by canonical key. In ID mode this goes through the
    /// question-text reverse index.
    fn lookup_exact(&self, key: &str) -> Option<ReferenceHit<'_>>;

    /// Lookup by structured identifier. Always `None` in direct mode.
    fn lookup_by_id(&self, id: &str) -> Option<ReferenceHit<'_>>;

    /// Every canonical key, in load order.
    fn keys(&self) -> &[CanonicalKey];
}

fn non_blank(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.trim().is_empty())
}

/// Inserts `key` keeping its first position while letting the later value win.
fn insert_ordered<V>(
    order: &mut Vec<CanonicalKey>,
    map: &mut HashMap<CanonicalKey, V>,
    key: CanonicalKey,
    value: V,
) {
    if !map.contains_key(key.as_str()) {
        order.push(key.clone());
    }
    map.insert(key, value);
}

/// Canonical key -> explanation text.
#[derive(Debug, Default)]
pub struct DirectBackend {
    keys: Vec<CanonicalKey>,
    entries: HashMap<CanonicalKey, Option<String>>,
}

impl DirectBackend {
    /// Builds the backend from raw (un-normalized) keys in file order.
    pub fn new<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, Option<String>)>,
    {
        let mut backend = Self::default();
        for (raw, text) in entries {
            let key = CanonicalKey::from_label(&raw);
            if key.is_empty() {
                debug!(raw_key = %raw, "reference_key_blank");
                continue;
            }
            insert_ordered(&mut backend.keys, &mut backend.entries, key, non_blank(text));
        }
        backend
    }
}

impl ReferenceBackend for DirectBackend {
    fn mode(&self) -> ReferenceMode {
        ReferenceMode::Direct
    }

    fn len(&self) -> usize {
        self.keys.len()
    }

    fn lookup_exact(&self, key: &str) -> Option<ReferenceHit<'_>> {
        self.entries.get(key).map(|text| ReferenceHit {
            id: None,
            text: text.as_deref(),
        })
    }

    fn lookup_by_id(&self, _id: &str) -> Option<ReferenceHit<'_>> {
        None
    }

    fn keys(&self) -> &[CanonicalKey] {
        &self.keys
    }
}

/// Identifier -> explanation text, identifier -> question text, and the
/// derived question key -> identifier reverse index.
#[derive(Debug, Default)]
pub struct IdBackend {
    explanations: HashMap<String, Option<String>>,
    questions: HashMap<String, String>,
    reverse: HashMap<CanonicalKey, String>,
    keys: Vec<CanonicalKey>,
}

impl IdBackend {
    /// Builds the backend and derives the reverse index from scratch.
    /// Identifiers are trimmed; question keys that collide keep the first
    /// position and point at the last identifier.
    pub fn new<E, Q>(explanations: E, questions: Q) -> Self
    where
        E: IntoIterator<Item = (String, Option<String>)>,
        Q: IntoIterator<Item = (String, Option<String>)>,
    {
        let mut backend = Self {
            explanations: explanations
                .into_iter()
                .map(|(id, text)| (id.trim().to_string(), non_blank(text)))
                .collect(),
            ..Self::default()
        };

        for (id, question) in questions {
            let id = id.trim().to_string();
            let Some(question) = question else {
                continue;
            };
            let key = CanonicalKey::from_label(&question);
            if key.is_empty() {
                debug!(id = %id, "reference_question_blank");
                continue;
            }
            backend.questions.insert(id.clone(), question);
            insert_ordered(&mut backend.keys, &mut backend.reverse, key, id);
        }
        backend
    }

    /// Question text recorded for `id`, if any.
    pub fn question(&self, id: &str) -> Option<&str> {
        self.questions.get(id).map(String::as_str)
    }

    fn hit<'a>(&'a self, id: &'a str) -> ReferenceHit<'a> {
        ReferenceHit {
            id: Some(id),
            text: self.explanations.get(id).and_then(|t| t.as_deref()),
        }
    }
}

impl ReferenceBackend for IdBackend {
    fn mode(&self) -> ReferenceMode {
        ReferenceMode::ById
    }

    fn len(&self) -> usize {
        self.keys.len()
    }

    fn id_count(&self) -> usize {
        self.explanations.len()
    }

    fn lookup_exact(&self, key: &str) -> Option<ReferenceHit<'_>> {
        self.reverse.get(key).map(|id| self.hit(id))
    }

    fn lookup_by_id(&self, id: &str) -> Option<ReferenceHit<'_>> {
        let (id, _) = self.explanations.get_key_value(id.trim())?;
        Some(self.hit(id))
    }

    fn keys(&self) -> &[CanonicalKey] {
        &self.keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(pairs: &[(&str, Option<&str>)]) -> Vec<(String, Option<String>)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.map(str::to_string)))
            .collect()
    }

    #[test]
    fn direct_keys_are_canonical() {
        let backend = DirectBackend::new(entries(&[("Fever (high)", Some("Hot"))]));
        assert_eq!(backend.keys()[0].as_str(), "fever");
        assert_eq!(backend.lookup_exact("fever").and_then(|h| h.text), Some("Hot"));
        assert!(backend.lookup_exact("Fever").is_none());
    }

    #[test]
    fn direct_collision_keeps_first_position_last_value() {
        let backend = DirectBackend::new(entries(&[
            ("Alpha", Some("first")),
            ("Beta", Some("beta")),
            (" ALPHA ", Some("second")),
        ]));
        let keys: Vec<&str> = backend.keys().iter().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["alpha", "beta"]);
        assert_eq!(backend.lookup_exact("alpha").and_then(|h| h.text), Some("second"));
    }

    #[test]
    fn null_and_blank_texts_are_no_text() {
        let backend = DirectBackend::new(entries(&[("a", None), ("b", Some("  ")), ("(x)", Some("t"))]));
        assert_eq!(backend.len(), 2);
        assert_eq!(backend.lookup_exact("a"), Some(ReferenceHit { id: None, text: None }));
        assert_eq!(backend.lookup_exact("b").and_then(|h| h.text), None);
        assert!(backend.lookup_by_id("a").is_none());
    }

    #[test]
    fn id_backend_reverse_index() {
        let backend = IdBackend::new(
            entries(&[("KD-001", Some("Explanation")), ("KD-002", None)]),
            entries(&[("KD-001", Some("Head ache (daily)")), ("KD-002", Some("Nausea"))]),
        );
        assert_eq!(backend.mode(), ReferenceMode::ById);
        assert_eq!(backend.len(), 2);

        let hit = backend.lookup_exact("head ache").expect("reverse hit");
        assert_eq!(hit.id, Some("KD-001"));
        assert_eq!(hit.text, Some("Explanation"));

        let hit = backend.lookup_exact("nausea").expect("reverse hit");
        assert_eq!(hit.text, None);

        assert_eq!(backend.lookup_by_id(" KD-001 ").and_then(|h| h.text), Some("Explanation"));
        assert!(backend.lookup_by_id("KD-404").is_none());
        assert_eq!(backend.question("KD-002"), Some("Nausea"));
    }

    #[test]
    fn question_without_explanation_has_no_text() {
        let backend = IdBackend::new(Vec::new(), entries(&[("Q-1", Some("Orphan"))]));
        let hit = backend.lookup_exact("orphan").expect("reverse hit");
        assert_eq!(hit, ReferenceHit { id: Some("Q-1"), text: None });
        assert_eq!(backend.id_count(), 0);
    }

    #[test]
    fn mode_names() {
        assert_eq!(ReferenceMode::Direct.to_string(), "direct");
        assert_eq!(ReferenceMode::ById.as_str(), "by_id");
    }
}
