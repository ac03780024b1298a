//! String similarity used by the fuzzy fallback.
//!
//! All scores are in `[0.0, 1.0]`, where `1.0` means identical. The default
//! [`SequenceRatio`] is the Ratcliff/Obershelp "gestalt" ratio: twice the
//! number of characters in matching blocks divided by the total length.
use serde::{Deserialize, Serialize};

/// A similarity score between a query key and a candidate key.
pub trait Similarity: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    fn score(&self, query: &str, candidate: &str) -> f64;
}

/// Built-in metrics selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityMetric {
    #[default]
    SequenceRatio,
    NormalizedLevenshtein,
    JaroWinkler,
}

impl SimilarityMetric {
    pub fn build(self) -> Box<dyn Similarity> {
        match self {
            SimilarityMetric::SequenceRatio => Box::new(SequenceRatio),
            SimilarityMetric::NormalizedLevenshtein => Box::new(NormalizedLevenshtein),
            SimilarityMetric::JaroWinkler => Box::new(JaroWinkler),
        }
    }
}

/// Ratcliff/Obershelp ratio over Unicode scalar values.
///
/// The longest common block is found first (earliest in the candidate, then
/// earliest in the query, on ties) and the search recurses on both sides of
/// it. No characters are treated as junk.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceRatio;

impl Similarity for SequenceRatio {
    fn name(&self) -> &'static str {
        "sequence_ratio"
    }

    fn score(&self, query: &str, candidate: &str) -> f64 {
        let a: Vec<char> = candidate.chars().collect();
        let b: Vec<char> = query.chars().collect();
        let total = a.len() + b.len();
        if total == 0 {
            return 1.0;
        }
        2.0 * matching_chars(&a, &b) as f64 / total as f64
    }
}

/// Total size of all matching blocks between `a` and `b`.
fn matching_chars(a: &[char], b: &[char]) -> usize {
    let mut matched = 0;
    let mut queue = vec![(0, a.len(), 0, b.len())];
    while let Some((alo, ahi, blo, bhi)) = queue.pop() {
        let (i, j, k) = longest_match(a, b, alo, ahi, blo, bhi);
        if k == 0 {
            continue;
        }
        matched += k;
        if alo < i && blo < j {
            queue.push((alo, i, blo, j));
        }
        if i + k < ahi && j + k < bhi {
            queue.push((i + k, ahi, j + k, bhi));
        }
    }
    matched
}

/// Longest block with `a[i..i+k] == b[j..j+k]` inside the given windows.
fn longest_match(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_k) = (alo, blo, 0);
    // run[j + 1] = length of the match ending at (i - 1, j)
    let mut prev = vec![0usize; b.len() + 1];
    let mut cur = vec![0usize; b.len() + 1];
    for i in alo..ahi {
        for j in blo..bhi {
            cur[j + 1] = if a[i] == b[j] { prev[j] + 1 } else { 0 };
            let k = cur[j + 1];
            if k > best_k {
                best_i = i + 1 - k;
                best_j = j + 1 - k;
                best_k = k;
            }
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    (best_i, best_j, best_k)
}

/// `1 - levenshtein / max_len`, via `strsim`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizedLevenshtein;

impl Similarity for NormalizedLevenshtein {
    fn name(&self) -> &'static str {
        "normalized_levenshtein"
    }

    fn score(&self, query: &str, candidate: &str) -> f64 {
        strsim::normalized_levenshtein(query, candidate)
    }
}

/// Jaro-Winkler similarity via `strsim`. Favors shared prefixes.
#[derive(Debug, Clone, Copy, Default)]
pub struct JaroWinkler;

impl Similarity for JaroWinkler {
    fn name(&self) -> &'static str {
        "jaro_winkler"
    }

    fn score(&self, query: &str, candidate: &str) -> f64 {
        strsim::jaro_winkler(query, candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ratio(a: &str, b: &str) -> f64 {
        SequenceRatio.score(a, b)
    }

    fn approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn identical_and_empty() {
        approx(ratio("fever", "fever"), 1.0);
        approx(ratio("", ""), 1.0);
        approx(ratio("abc", ""), 0.0);
        approx(ratio("abc", "xyz"), 0.0);
    }

    #[test]
    fn known_ratios() {
        // "head" + "ache" match: 2 * 8 / 17
        approx(ratio("head ache", "headache"), 16.0 / 17.0);
        // classic example: "abcd" vs "bcde" shares "bcd"
        approx(ratio("abcd", "bcde"), 0.75);
    }

    #[test]
    fn blocks_left_and_right_of_longest_match_count() {
        // "a" + "bcd" + "e" with noise in between
        approx(ratio("a_bcd_e", "aXbcdYe"), 2.0 * 5.0 / 14.0);
    }

    #[test]
    fn works_on_non_ascii() {
        approx(ratio("головная боль", "головная боль"), 1.0);
        assert!(ratio("головная боль", "головная бол") > 0.9);
    }

    #[test]
    fn metric_selection() {
        assert_eq!(SimilarityMetric::default().build().name(), "sequence_ratio");
        let lev = SimilarityMetric::NormalizedLevenshtein.build();
        approx(lev.score("kitten", "sitting"), 1.0 - 3.0 / 7.0);
        let jw = SimilarityMetric::JaroWinkler.build();
        assert!(jw.score("headache", "head ache") > 0.9);
    }

    #[test]
    fn metric_names_deserialize() {
        let metric: SimilarityMetric =
            serde_json::from_str("\"normalized_levenshtein\"").expect("de");
        assert_eq!(metric, SimilarityMetric::NormalizedLevenshtein);
    }
}
