use std::borrow::Borrow;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::whitespace::{collapse_whitespace, fold_special_spaces};

/// Single-level parenthesized aside. Nested parentheses are not balanced:
/// the shortest `(...)` span is removed and any stray `)` stays in the text.
static PARENTHETICAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\([^)]*\)").unwrap_or_else(|err| panic!("invalid parenthetical regex: {err}"))
});

/// Computes the comparison key for a checklist label or reference question.
///
/// Steps, in order:
///
/// 1. fold U+00A0 / U+200B to ASCII spaces
/// 2. trim and collapse whitespace runs to a single space
/// 3. drop every `(...)` aside
/// 4. collapse again (removal can leave double spaces) and lowercase
///
/// The function is pure, total and idempotent.
///
/// ```rust
/// use canonical::canonical_key;
///
/// assert_eq!(canonical_key("  Fever   (38C+) "), "fever");
/// assert_eq!(canonical_key("Head\u{00A0}ACHE"), "head ache");
/// assert_eq!(canonical_key(""), "");
/// ```
pub fn canonical_key(raw: &str) -> String {
    let collapsed = collapse_whitespace(&fold_special_spaces(raw));
    if !collapsed.contains('(') {
        return collapsed.to_lowercase();
    }
    let stripped = PARENTHETICAL.replace_all(&collapsed, "");
    collapse_whitespace(&stripped).to_lowercase()
}

/// A normalized label. Two labels denote the same checklist item iff their
/// keys are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalKey(String);

impl CanonicalKey {
    /// Normalizes `raw` with [`canonical_key`].
    pub fn from_label(raw: &str) -> Self {
        Self(canonical_key(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for CanonicalKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CanonicalKey {
    fn from(raw: &str) -> Self {
        Self::from_label(raw)
    }
}
