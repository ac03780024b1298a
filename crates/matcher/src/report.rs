//! Report assembly.
//!
//! Turns resolved items into a [`DecodeResult`]: the matched and missed label
//! lists plus a Markdown report with one `### heading` section per match.
use std::collections::HashSet;

use ingest::ChecklistItem;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::types::MatchResult;

/// Report returned when nothing resolved. Same locale as the reference
/// builder's reserved lead-ins.
pub const DEFAULT_EMPTY_REPORT: &str = "Отмеченные пункты не найдены в базе расшифровок.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Body of `report_markdown` when no item matched.
    pub empty_report: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            empty_report: DEFAULT_EMPTY_REPORT.to_string(),
        }
    }
}

/// A label that only resolved through the fuzzy fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuzzyResolution {
    pub label: String,
    pub matched_key: String,
    pub score: f64,
}

/// Final, serializable result of decoding one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodeResult {
    pub matched: Vec<String>,
    pub missed: Vec<String>,
    /// Every extracted label after deduplication, in document order.
    pub extracted: Vec<String>,
    /// Distinct structured codes seen in the extracted labels.
    pub found_codes: Vec<String>,
    pub fuzzy: Vec<FuzzyResolution>,
    pub report_markdown: String,
}

/// Drops repeated items, keyed on the raw label; the first occurrence wins.
pub fn dedup_items(items: &[ChecklistItem]) -> Vec<ChecklistItem> {
    let mut seen = HashSet::new();
    items
        .iter()
        .filter(|item| seen.insert(item.label.as_str()))
        .cloned()
        .collect()
}

/// Builds the result from items and their resolutions, paired by position.
///
/// `items` are expected to be deduplicated already; surplus entries on either
/// side are ignored.
pub fn assemble(items: &[ChecklistItem], results: &[MatchResult], cfg: &ReportConfig) -> DecodeResult {
    let mut matched = Vec::new();
    let mut missed = Vec::new();
    let mut fuzzy = Vec::new();
    let mut sections = Vec::new();

    for (item, result) in items.iter().zip(results) {
        match result {
            MatchResult::Matched { text, code } => {
                let heading = match code {
                    Some(code) => format!("[{code}]"),
                    None => item.label.clone(),
                };
                sections.push(format!("### {heading}\n{text}"));
                matched.push(item.label.clone());
            }
            MatchResult::MatchedViaFuzzy {
                text,
                matched_key,
                score,
            } => {
                sections.push(format!("### {}\n{text}", item.label));
                matched.push(item.label.clone());
                fuzzy.push(FuzzyResolution {
                    label: item.label.clone(),
                    matched_key: matched_key.clone(),
                    score: *score,
                });
            }
            MatchResult::Unmatched => missed.push(item.label.clone()),
        }
    }

    let mut seen_codes = HashSet::new();
    let found_codes = items
        .iter()
        .filter_map(|item| item.code.as_deref())
        .filter(|code| seen_codes.insert(*code))
        .map(str::to_string)
        .collect();

    let report_markdown = if sections.is_empty() {
        cfg.empty_report.clone()
    } else {
        sections.join("\n\n")
    };

    info!(
        extracted = items.len(),
        matched = matched.len(),
        missed = missed.len(),
        fuzzy = fuzzy.len(),
        "decode_complete"
    );

    DecodeResult {
        matched,
        missed,
        extracted: items.iter().map(|item| item.label.clone()).collect(),
        found_codes,
        fuzzy,
        report_markdown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(label: &str) -> ChecklistItem {
        ChecklistItem::from_label(label)
    }

    fn matched(text: &str) -> MatchResult {
        MatchResult::Matched {
            text: text.into(),
            code: None,
        }
    }

    #[test]
    fn dedup_keeps_first_seen_order() {
        let items = vec![item("A"), item("B"), item("A")];
        let labels: Vec<String> = dedup_items(&items).into_iter().map(|i| i.label).collect();
        assert_eq!(labels, vec!["A", "B"]);
    }

    #[test]
    fn dedup_is_on_raw_label() {
        let items = vec![item("Fever"), item("fever"), item("Fever")];
        assert_eq!(dedup_items(&items).len(), 2);
    }

    #[test]
    fn empty_extraction_gives_sentinel() {
        let result = assemble(&[], &[], &ReportConfig::default());
        assert!(result.matched.is_empty());
        assert!(result.missed.is_empty());
        assert!(result.extracted.is_empty());
        assert_eq!(result.report_markdown, DEFAULT_EMPTY_REPORT);
        assert_eq!(
            result.report_markdown,
            "Отмеченные пункты не найдены в базе расшифровок."
        );
    }

    #[test]
    fn all_missed_gives_sentinel() {
        let cfg = ReportConfig {
            empty_report: "nothing".into(),
        };
        let result = assemble(&[item("X")], &[MatchResult::Unmatched], &cfg);
        assert_eq!(result.missed, vec!["X"]);
        assert_eq!(result.report_markdown, "nothing");
    }

    #[test]
    fn sections_follow_item_order() {
        let items = vec![item("Fever"), item("Cough"), item("Head ache")];
        let results = vec![
            matched("Hot."),
            MatchResult::Unmatched,
            MatchResult::MatchedViaFuzzy {
                text: "Pain.".into(),
                matched_key: "headache".into(),
                score: 0.94,
            },
        ];
        let result = assemble(&items, &results, &ReportConfig::default());
        assert_eq!(result.matched, vec!["Fever", "Head ache"]);
        assert_eq!(result.missed, vec!["Cough"]);
        assert_eq!(result.extracted, vec!["Fever", "Cough", "Head ache"]);
        assert_eq!(result.report_markdown, "### Fever\nHot.\n\n### Head ache\nPain.");
        assert_eq!(
            result.fuzzy,
            vec![FuzzyResolution {
                label: "Head ache".into(),
                matched_key: "headache".into(),
                score: 0.94
            }]
        );
    }

    #[test]
    fn code_matches_use_code_heading() {
        let items = vec![
            item("Symptom [KD-001]").with_code("KD-001"),
            item("Other [KD-002]").with_code("KD-002"),
            item("Again [KD-001]").with_code("KD-001"),
        ];
        let results = vec![
            MatchResult::Matched {
                text: "Explanation text".into(),
                code: Some("KD-001".into()),
            },
            MatchResult::Unmatched,
            MatchResult::Unmatched,
        ];
        let result = assemble(&items, &results, &ReportConfig::default());
        assert_eq!(result.report_markdown, "### [KD-001]\nExplanation text");
        assert_eq!(result.matched, vec!["Symptom [KD-001]"]);
        assert_eq!(result.found_codes, vec!["KD-001", "KD-002"]);
    }
}
