use super::*;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use index::ReferenceIndex;
use ingest::ChecklistItem;

use crate::metrics::{set_resolve_metrics, ResolveMetrics};
use crate::similarity::SimilarityMetric;
use crate::types::MatchKind;

fn resolver(cutoff: f64) -> Resolver {
    Resolver::new(MatchConfig {
        cutoff,
        ..MatchConfig::default()
    })
    .expect("valid config")
}

fn direct(entries: &[(&str, &str)]) -> ReferenceIndex {
    ReferenceIndex::from_direct_entries(entries.iter().copied())
}

#[test]
fn exact_match_on_canonical_key() {
    let index = direct(&[("Fever", "Body temperature above normal.")]);
    let result = resolver(0.6).resolve_label("  FEVER (38C) ", &index);
    assert_eq!(
        result,
        MatchResult::Matched {
            text: "Body temperature above normal.".into(),
            code: None
        }
    );
}

#[test]
fn exact_precedes_fuzzy() {
    // "headache" is an exact key; "head ache" would also score highly against it
    let index = direct(&[("Head ache", "spaced"), ("Headache", "joined")]);
    let result = resolver(0.0).resolve_label("Headache", &index);
    assert_eq!(result.text(), Some("joined"));
    assert_eq!(result.kind(), MatchKind::Exact);
}

#[test]
fn fuzzy_fallback_respects_cutoff() {
    let index = direct(&[("Headache", "Pain in the head.")]);

    let accepted = resolver(0.9).resolve_label("Head ache", &index);
    match accepted {
        MatchResult::MatchedViaFuzzy {
            text,
            matched_key,
            score,
        } => {
            assert_eq!(text, "Pain in the head.");
            assert_eq!(matched_key, "headache");
            assert!((score - 16.0 / 17.0).abs() < 1e-9);
        }
        other => panic!("expected fuzzy match, got {other:?}"),
    }

    let rejected = resolver(0.95).resolve_label("Head ache", &index);
    assert_eq!(rejected, MatchResult::Unmatched);
}

#[test]
fn cutoff_is_inclusive() {
    let index = direct(&[("abcd", "text")]);
    // ratio("bcde", "abcd") == 0.75 exactly
    let result = resolver(0.75).resolve_label("bcde", &index);
    assert_eq!(result.kind(), MatchKind::Fuzzy);
}

#[test]
fn ties_go_to_first_key_in_load_order() {
    let index = direct(&[("abx", "first"), ("aby", "second")]);
    let result = resolver(0.5).resolve_label("abz", &index);
    assert_eq!(result.text(), Some("first"));
}

#[test]
fn empty_label_and_empty_index_are_unmatched() {
    let index = direct(&[("Fever", "t")]);
    assert_eq!(resolver(0.0).resolve_label("   ", &index), MatchResult::Unmatched);
    assert_eq!(resolver(0.0).resolve_label("(only aside)", &index), MatchResult::Unmatched);

    let empty = ReferenceIndex::empty(index::ReferenceMode::Direct);
    assert_eq!(resolver(0.0).resolve_label("Fever", &empty), MatchResult::Unmatched);
}

#[test]
fn entry_without_text_is_unmatched() {
    let index = ReferenceIndex::with_backend(Box::new(index::DirectBackend::new(vec![
        ("Rash".to_string(), None),
        ("Rashes".to_string(), Some("plural".to_string())),
    ])));
    // exact hit without text does not fall through to fuzzy
    assert_eq!(resolver(0.0).resolve_label("rash", &index), MatchResult::Unmatched);
}

#[test]
fn code_resolution_in_id_mode() {
    let index = ReferenceIndex::from_id_entries(
        [("KD-001", "Explanation text")],
        Vec::<(&str, &str)>::new(),
    );
    let item = ChecklistItem::from_label("Symptom [KD-001]").with_code("KD-001");
    assert_eq!(
        resolver(0.6).resolve(&item, &index),
        MatchResult::Matched {
            text: "Explanation text".into(),
            code: Some("KD-001".into())
        }
    );
}

#[test]
fn unknown_code_falls_back_to_question_text() {
    let index = ReferenceIndex::from_id_entries(
        [("KD-001", "Explanation text")],
        [("KD-001", "Symptom [KD-404]")],
    );
    let item = ChecklistItem::from_label("Symptom [KD-404]").with_code("KD-404");
    let result = resolver(0.6).resolve(&item, &index);
    assert_eq!(
        result,
        MatchResult::Matched {
            text: "Explanation text".into(),
            code: None
        }
    );
}

#[test]
fn code_resolution_can_be_disabled() {
    let index = ReferenceIndex::from_id_entries([("KD-001", "Explanation")], [("KD-001", "Other")]);
    let resolver = Resolver::new(MatchConfig {
        resolve_codes: false,
        cutoff: 0.99,
        ..MatchConfig::default()
    })
    .expect("config");
    let item = ChecklistItem::from_label("Symptom [KD-001]").with_code("KD-001");
    assert_eq!(resolver.resolve(&item, &index), MatchResult::Unmatched);
}

#[test]
fn direct_mode_ignores_codes() {
    let index = direct(&[("Symptom [KD-001]", "by label")]);
    let item = ChecklistItem::from_label("Symptom [KD-001]").with_code("KD-001");
    assert_eq!(
        resolver(0.6).resolve(&item, &index),
        MatchResult::Matched {
            text: "by label".into(),
            code: None
        }
    );
}

#[test]
fn alternative_metric_is_used() {
    let resolver = Resolver::new(MatchConfig {
        metric: SimilarityMetric::NormalizedLevenshtein,
        cutoff: 0.85,
        ..MatchConfig::default()
    })
    .expect("config");
    let index = direct(&[("Headache", "t")]);
    // levenshtein("head ache", "headache") == 1 over 9 chars
    match resolver.resolve_label("Head ache", &index) {
        MatchResult::MatchedViaFuzzy { score, .. } => {
            assert!((score - 8.0 / 9.0).abs() < 1e-9)
        }
        other => panic!("expected fuzzy match, got {other:?}"),
    }
}

#[test]
fn invalid_cutoff_rejected_at_construction() {
    let err = Resolver::new(MatchConfig {
        cutoff: 2.0,
        ..MatchConfig::default()
    })
    .expect_err("invalid");
    assert!(matches!(err, MatchError::InvalidConfig(_)));
}

#[test]
fn resolve_all_keeps_order() {
    let index = direct(&[("A", "a"), ("B", "b")]);
    let items = vec![
        ChecklistItem::from_label("B"),
        ChecklistItem::from_label("zzz"),
        ChecklistItem::from_label("A"),
    ];
    let results = resolver(0.6).resolve_all(&items, &index);
    let texts: Vec<Option<&str>> = results.iter().map(MatchResult::text).collect();
    assert_eq!(texts, vec![Some("b"), None, Some("a")]);
}

#[derive(Default)]
struct RecordingMetrics {
    events: Mutex<Vec<MatchKind>>,
}

impl ResolveMetrics for RecordingMetrics {
    fn record_resolve(&self, kind: MatchKind, _latency: Duration) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(kind);
    }
}

#[test]
fn metrics_recorder_observes_resolutions() {
    let metrics = Arc::new(RecordingMetrics::default());
    set_resolve_metrics(Some(metrics.clone()));

    let index = direct(&[("Metrics probe label", "t")]);
    let item = ChecklistItem::from_label("Metrics probe label");
    resolver(0.6).resolve(&item, &index);
    set_resolve_metrics(None);

    // other tests may resolve concurrently while the recorder is installed
    let events = metrics.events.lock().unwrap_or_else(|p| p.into_inner());
    assert!(events.contains(&MatchKind::Exact));
}
