//! Whitespace normalization utilities.
//!
//! Word-processor exports are full of layout characters that look like
//! spaces but are not all treated as whitespace by Rust: U+00A0 is, U+200B is
//! not. [`fold_special_spaces`] maps both to an ASCII space so the collapsing
//! step sees them.
//!
//! # Examples
//!
//! ```rust
//! use canonical::collapse_whitespace;
//!
//! let normalized = collapse_whitespace("  hello   world  ");
//! assert_eq!(normalized, "hello world");
//! ```

/// Code points that are folded to an ASCII space before collapsing.
pub const SPECIAL_SPACES: [char; 2] = ['\u{00A0}', '\u{200B}'];

/// Collapses repeated whitespace, trims edges, and normalizes newlines to
/// single spaces.
///
/// # Algorithm
///
/// 1. Split the text on any Unicode whitespace (using `split_whitespace()`)
/// 2. Join the resulting segments with single ASCII spaces
/// 3. The result has no leading or trailing whitespace
///
/// # Examples
///
/// ```rust
/// use canonical::collapse_whitespace;
///
/// assert_eq!(collapse_whitespace("hello \t \t world"), "hello world");
/// assert_eq!(collapse_whitespace("hello\r\nworld"), "hello world");
/// assert_eq!(collapse_whitespace("   \n\t   "), "");
/// ```
pub fn collapse_whitespace(text: &str) -> String {
    let mut normalized = String::with_capacity(text.len());
    for segment in text.split_whitespace() {
        if !normalized.is_empty() {
            normalized.push(' ');
        }
        normalized.push_str(segment);
    }
    normalized
}

/// Replaces no-break and zero-width spaces with an ASCII space.
///
/// The result still needs [`collapse_whitespace`]; this function never
/// merges runs on its own.
///
/// ```rust
/// use canonical::fold_special_spaces;
///
/// assert_eq!(fold_special_spaces("a\u{200B}b\u{00A0}c"), "a b c");
/// ```
pub fn fold_special_spaces(text: &str) -> String {
    text.chars()
        .map(|ch| if SPECIAL_SPACES.contains(&ch) { ' ' } else { ch })
        .collect()
}
