//! Checked-item detection over a [`RawDocument`].
//!
//! Two strategies run on every document, tables first:
//!
//! - **table**: a row with at least two cells is selected when its second
//!   cell carries a table mark; the first cell is the label.
//! - **paragraph**: a paragraph is selected when any paragraph mark appears in
//!   it; the marks are blanked out and separator characters trimmed.
use regex::Regex;
use tracing::debug;

use crate::config::{IngestConfig, MarkConfig, TableMarkPolicy};
use crate::error::IngestError;
use crate::types::{ChecklistItem, ItemOrigin, RawDocument};

/// Compiled mark detector. Build once, share across requests.
#[derive(Debug, Clone)]
pub struct Extractor {
    marks: MarkConfig,
    code_pattern: Option<Regex>,
    max_payload_bytes: Option<usize>,
    max_document_xml_bytes: usize,
}

impl Extractor {
    pub fn new(cfg: &IngestConfig) -> Result<Self, IngestError> {
        cfg.validate()?;
        let code_pattern = cfg.marks.compile_code_pattern()?;
        Ok(Self {
            marks: cfg.marks.clone(),
            code_pattern,
            max_payload_bytes: cfg.max_payload_bytes,
            max_document_xml_bytes: cfg.max_document_xml_bytes,
        })
    }

    pub fn max_payload_bytes(&self) -> Option<usize> {
        self.max_payload_bytes
    }

    pub fn max_document_xml_bytes(&self) -> usize {
        self.max_document_xml_bytes
    }

    /// Returns every selected item in document order: all table rows, then
    /// all paragraphs. Duplicates are kept.
    pub fn extract(&self, doc: &RawDocument) -> Vec<ChecklistItem> {
        let mut items = self.extract_tables(doc);
        let table_hits = items.len();
        items.extend(self.extract_paragraphs(doc));
        debug!(
            table_hits,
            paragraph_hits = items.len() - table_hits,
            "checklist_extracted"
        );
        items
    }

    fn extract_tables(&self, doc: &RawDocument) -> Vec<ChecklistItem> {
        let mut items = Vec::new();
        for (table_idx, table) in doc.tables().iter().enumerate() {
            for (row_idx, row) in table.rows.iter().enumerate() {
                let [left, right, ..] = row.cells.as_slice() else {
                    continue;
                };
                if !self.is_table_mark(&right.text) {
                    continue;
                }
                let label = left.text.trim();
                if label.is_empty() {
                    continue;
                }
                items.push(self.item(
                    label.to_string(),
                    ItemOrigin::Table {
                        table: table_idx,
                        row: row_idx,
                    },
                ));
            }
        }
        items
    }

    fn extract_paragraphs(&self, doc: &RawDocument) -> Vec<ChecklistItem> {
        let mut items = Vec::new();
        for (index, paragraph) in doc.paragraphs().iter().enumerate() {
            let text = paragraph.trim();
            if text.is_empty() || !self.has_paragraph_mark(text) {
                continue;
            }
            // Latin `X`/`x` marks would otherwise eat letters out of the code.
            let code = self.find_code(text);
            let mut clean = text.to_string();
            for mark in &self.marks.paragraph_marks {
                clean = clean.replace(mark.as_str(), " ");
            }
            let separators = self.marks.separators.as_str();
            let label = clean.trim_matches(|ch: char| separators.contains(ch));
            if label.is_empty() {
                continue;
            }
            items.push(ChecklistItem {
                label: label.to_string(),
                code,
                origin: ItemOrigin::Paragraph { index },
            });
        }
        items
    }

    fn is_table_mark(&self, cell: &str) -> bool {
        let cell = cell.trim();
        match self.marks.table_policy {
            TableMarkPolicy::Exact => self.marks.table_marks.iter().any(|m| m == cell),
            TableMarkPolicy::Contains => self
                .marks
                .table_marks
                .iter()
                .any(|m| cell.contains(m.as_str())),
        }
    }

    fn has_paragraph_mark(&self, text: &str) -> bool {
        self.marks
            .paragraph_marks
            .iter()
            .any(|m| text.contains(m.as_str()))
    }

    fn item(&self, label: String, origin: ItemOrigin) -> ChecklistItem {
        let code = self.find_code(&label);
        ChecklistItem {
            label,
            code,
            origin,
        }
    }

    /// First code occurrence in `label`. Uses capture group 1 when the
    /// pattern has one, otherwise the whole match without brackets.
    pub fn find_code(&self, label: &str) -> Option<String> {
        let pattern = self.code_pattern.as_ref()?;
        let caps = pattern.captures(label)?;
        let found = caps.get(1).or_else(|| caps.get(0))?.as_str();
        let code = found.trim_start_matches('[').trim_end_matches(']').trim();
        (!code.is_empty()).then(|| code.to_string())
    }
}
