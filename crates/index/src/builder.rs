//! Offline construction of a direct reference map from a source document.
//!
//! The source is a flat run of paragraphs where short heading-like lines name
//! an item and the paragraphs below them explain it:
//!
//! ```text
//! Short Heading             <- key
//! First sentence.           <- text
//! Second sentence.          <- text
//! Another Heading           <- key
//! ...
//! ```
//!
//! A line is a heading when it is at most `max_heading_chars` characters long,
//! does not end with `.`, and does not open with a reserved lead-in such as
//! "Возможные ..." that introduces body text.
use std::path::Path;

use canonical::collapse_whitespace;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::IndexError;

pub const DEFAULT_MAX_HEADING_CHARS: usize = 220;

/// Lead-ins that mark a line as body text even when it is short.
pub const DEFAULT_RESERVED_PREFIXES: [&str; 3] = ["возможные", "признак", "расшифровка"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Longest line, in characters, still treated as a heading.
    pub max_heading_chars: usize,

    /// Compared case-insensitively against the start of each line.
    pub reserved_prefixes: Vec<String>,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            max_heading_chars: DEFAULT_MAX_HEADING_CHARS,
            reserved_prefixes: DEFAULT_RESERVED_PREFIXES
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}

impl BuilderConfig {
    pub fn validate(&self) -> Result<(), IndexError> {
        if self.max_heading_chars == 0 {
            return Err(IndexError::InvalidConfig(
                "max_heading_chars must be greater than zero".into(),
            ));
        }
        if self.reserved_prefixes.iter().any(|p| p.trim().is_empty()) {
            return Err(IndexError::InvalidConfig(
                "reserved_prefixes must not contain blank entries".into(),
            ));
        }
        Ok(())
    }

    /// Whether an already collapsed, non-empty line reads as a heading.
    pub fn looks_like_heading(&self, line: &str) -> bool {
        if line.chars().count() > self.max_heading_chars || line.ends_with('.') {
            return false;
        }
        let lower = line.to_lowercase();
        !self
            .reserved_prefixes
            .iter()
            .any(|prefix| lower.starts_with(&prefix.to_lowercase()))
    }
}

#[derive(Default)]
struct Segmenter {
    map: Map<String, Value>,
    key: Option<String>,
    buf: Vec<String>,
}

impl Segmenter {
    fn flush(&mut self) {
        if let Some(key) = self.key.as_ref() {
            if !self.buf.is_empty() {
                let text = self.buf.join("\n").trim().to_string();
                if self.map.contains_key(key) {
                    debug!(key = %key, "reference_heading_repeated");
                }
                self.map.insert(key.clone(), Value::String(text));
            }
        }
        self.buf.clear();
    }
}

/// Segments `paragraphs` into heading -> explanation pairs.
///
/// Blank lines are ignored. Text before the first heading is dropped, as is a
/// heading with no text under it. A repeated heading keeps its first position
/// and takes the later text.
pub fn build_reference<I, S>(paragraphs: I, cfg: &BuilderConfig) -> Map<String, Value>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seg = Segmenter::default();
    for paragraph in paragraphs {
        let line = collapse_whitespace(paragraph.as_ref());
        if line.is_empty() {
            continue;
        }
        if cfg.looks_like_heading(&line) {
            seg.flush();
            seg.key = Some(line);
        } else if seg.key.is_some() {
            seg.buf.push(line);
        }
    }
    seg.flush();
    seg.map
}

/// Writes `map` as pretty-printed UTF-8 JSON. Non-ASCII text is written as-is.
pub fn write_reference_map(path: &Path, map: &Map<String, Value>) -> Result<(), IndexError> {
    let body = serde_json::to_string_pretty(map).map_err(|err| IndexError::parse(path, err))?;
    std::fs::write(path, body).map_err(|err| IndexError::io(path, err))?;
    info!(path = %path.display(), keys = map.len(), "reference_map_written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> BuilderConfig {
        BuilderConfig::default()
    }

    #[test]
    fn headings_collect_following_text() {
        let paragraphs = [
            "Short Heading",
            "Explanation line one.",
            "Explanation line two.",
            "Another Heading",
            "More text.",
        ];
        let map = build_reference(paragraphs, &cfg());
        assert_eq!(map.len(), 2);
        assert_eq!(
            map["Short Heading"],
            "Explanation line one.\nExplanation line two."
        );
        assert_eq!(map["Another Heading"], "More text.");
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Short Heading", "Another Heading"]);
    }

    #[test]
    fn text_before_first_heading_and_empty_headings_dropped() {
        let paragraphs = [
            "Preamble sentence.",
            "",
            "Lonely Heading",
            "Real Heading",
            "   Body   with   gaps.  ",
        ];
        let map = build_reference(paragraphs, &cfg());
        assert_eq!(map.len(), 1);
        assert_eq!(map["Real Heading"], "Body with gaps.");
    }

    #[test]
    fn reserved_lead_ins_are_body_text() {
        let paragraphs = [
            "Головная боль",
            "Возможные причины: усталость",
            "РАСШИФРОВКА ниже",
            "Признак важен",
        ];
        let map = build_reference(paragraphs, &cfg());
        assert_eq!(map.len(), 1);
        assert_eq!(
            map["Головная боль"],
            "Возможные причины: усталость\nРАСШИФРОВКА ниже\nПризнак важен"
        );
    }

    #[test]
    fn long_lines_are_body_text() {
        let long = "word ".repeat(60);
        let paragraphs = ["Heading".to_string(), long.clone()];
        let map = build_reference(&paragraphs, &cfg());
        assert_eq!(map["Heading"], long.trim());
    }

    #[test]
    fn heading_length_counts_characters() {
        let cfg = BuilderConfig {
            max_heading_chars: 5,
            ..BuilderConfig::default()
        };
        assert!(cfg.looks_like_heading("жжжжж"));
        assert!(!cfg.looks_like_heading("жжжжжж"));
    }

    #[test]
    fn repeated_heading_overwrites() {
        let paragraphs = ["A", "one.", "B", "two.", "A", "three."];
        let map = build_reference(paragraphs, &cfg());
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["A", "B"]);
        assert_eq!(map["A"], "three.");
    }

    #[test]
    fn invalid_config_rejected() {
        let zero = BuilderConfig {
            max_heading_chars: 0,
            ..BuilderConfig::default()
        };
        assert!(zero.validate().is_err());
        let blank = BuilderConfig {
            reserved_prefixes: vec![" ".into()],
            ..BuilderConfig::default()
        };
        assert!(blank.validate().is_err());
        assert!(cfg().validate().is_ok());
    }

    #[test]
    fn written_map_is_readable_unicode() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("decode_map.json");
        let map = build_reference(["Тошнота", "Текст."], &cfg());
        write_reference_map(&path, &map).expect("write");

        let body = std::fs::read_to_string(&path).expect("read");
        assert!(body.contains("\"Тошнота\": \"Текст.\""));
        let entries = crate::loader::read_entries(&path).expect("reload");
        assert_eq!(entries.len(), 1);
    }
}
