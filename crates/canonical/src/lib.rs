//! Canonical label layer.
//!
//! Every place that compares checklist text goes through this crate: labels
//! extracted from an uploaded document, keys of the flat reference map, and
//! question texts of the identifier-indexed reference data. Keeping a single
//! implementation is what makes "same item" a well-defined notion.
//!
//! ## What we do
//!
//! - Fold no-break and zero-width spaces to ASCII spaces
//! - Collapse whitespace runs and trim
//! - Drop parenthesized asides such as `(38C+)`
//! - Lowercase
//!
//! No accent folding, no punctuation stripping, no Unicode normalization
//! forms. Output depends only on the input string.

mod key;
mod whitespace;

pub use crate::key::{canonical_key, CanonicalKey};
pub use crate::whitespace::{collapse_whitespace, fold_special_spaces, SPECIAL_SPACES};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_is_idempotent() {
        let inputs = [
            "",
            "   ",
            "Fever (38C+)",
            "  Foo   BAR ",
            "a (b (c) d) e",
            "Pain (left) (right) side",
            "\u{200B}Cough\u{00A0}\u{00A0}dry\t",
            "Боль в горле (острая)",
            "Symptom [KD-001]",
        ];

        for input in inputs {
            let once = canonical_key(input);
            let twice = canonical_key(&once);
            assert_eq!(once, twice, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn whitespace_and_case_insensitive() {
        assert_eq!(canonical_key("  Foo   BAR "), canonical_key("foo bar"));
        assert_eq!(canonical_key("foo bar"), "foo bar");
    }

    #[test]
    fn parenthetical_removed() {
        assert_eq!(canonical_key("Fever (38C+)"), canonical_key("Fever"));
    }

    #[test]
    fn cyrillic_lowercased() {
        assert_eq!(canonical_key("ГОЛОВНАЯ  Боль"), "головная боль");
    }

    #[test]
    fn special_spaces_folded_before_collapse() {
        assert_eq!(canonical_key("Head\u{200B}\u{00A0} ache"), "head ache");
    }

    #[test]
    fn empty_maps_to_empty() {
        assert_eq!(canonical_key(""), "");
        assert_eq!(canonical_key("(only an aside)"), "");
    }
}
