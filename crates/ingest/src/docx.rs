//! Office Open XML (`.docx`) reader producing a [`RawDocument`].
//!
//! Only `word/document.xml` is read. The walk mirrors what a word processor
//! shows as plain text:
//!
//! - body-level `w:p` elements become paragraphs
//! - top-level `w:tbl` elements become tables; a cell's text is its
//!   paragraphs joined with `\n`
//! - inside a run (`w:r`), `w:t` contributes text, `w:tab` a tab, `w:br` and
//!   `w:cr` a newline; tab stops declared in paragraph properties do not
//!
//! Nested tables, drawings and text boxes are skipped entirely. The main part
//! is read through a byte cap; the sizes recorded in the zip headers are
//! never trusted.
use std::io::{Cursor, Read};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::config::DEFAULT_MAX_DOCUMENT_XML_BYTES;
use crate::error::IngestError;
use crate::types::{Cell, RawDocument, Row, Table};

/// Path of the main document part inside the container.
pub const DOCUMENT_PART: &str = "word/document.xml";

/// Elements whose whole subtree is ignored.
const SKIPPED: [&[u8]; 5] = [b"drawing", b"pict", b"AlternateContent", b"txbxContent", b"object"];

/// Parses a `.docx` blob into tables and paragraphs, with the default cap on
/// the inflated main part.
pub fn parse_docx(bytes: &[u8]) -> Result<RawDocument, IngestError> {
    parse_docx_limited(bytes, DEFAULT_MAX_DOCUMENT_XML_BYTES)
}

/// Parses a `.docx` blob, rejecting a main part that inflates past
/// `max_xml_bytes`.
pub fn parse_docx_limited(bytes: &[u8], max_xml_bytes: usize) -> Result<RawDocument, IngestError> {
    if bytes.is_empty() {
        return Err(IngestError::EmptyPayload);
    }
    let xml = read_document_part(bytes, max_xml_bytes)?;
    parse_document_xml(&xml)
}

fn read_document_part(bytes: &[u8], max_xml_bytes: usize) -> Result<String, IngestError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    let mut part = match archive.by_name(DOCUMENT_PART) {
        Ok(part) => part,
        Err(zip::result::ZipError::FileNotFound) => {
            return Err(IngestError::MissingDocumentPart(DOCUMENT_PART.into()))
        }
        Err(err) => return Err(err.into()),
    };
    let cap = u64::try_from(max_xml_bytes).unwrap_or(u64::MAX).saturating_add(1);
    let mut raw = Vec::new();
    (&mut part)
        .take(cap)
        .read_to_end(&mut raw)
        .map_err(|err| IngestError::MalformedDocument(format!("unreadable {DOCUMENT_PART}: {err}")))?;
    if raw.len() > max_xml_bytes {
        return Err(IngestError::PayloadTooLarge(format!(
            "{DOCUMENT_PART} inflates past limit of {max_xml_bytes} bytes"
        )));
    }
    String::from_utf8(raw).map_err(|err| {
        IngestError::MalformedDocument(format!("{DOCUMENT_PART} is not UTF-8: {err}"))
    })
}

#[derive(Default)]
struct Walker {
    tables: Vec<Table>,
    paragraphs: Vec<String>,

    table_depth: usize,
    skip_depth: usize,
    in_paragraph: bool,
    run_depth: usize,
    in_text: bool,

    paragraph: String,
    table: Table,
    row: Option<Row>,
    cell: Option<Vec<String>>,
}

impl Walker {
    fn collecting(&self) -> bool {
        self.skip_depth == 0 && self.table_depth <= 1
    }

    fn in_run(&self) -> bool {
        self.in_paragraph && self.run_depth > 0
    }

    fn start(&mut self, e: &BytesStart<'_>) {
        let name = e.local_name();
        let name = name.as_ref();
        if self.skip_depth > 0 || SKIPPED.contains(&name) {
            self.skip_depth += 1;
            return;
        }
        match name {
            b"tbl" => {
                self.table_depth += 1;
                if self.table_depth == 1 {
                    self.table = Table::default();
                }
            }
            b"tr" if self.table_depth == 1 => self.row = Some(Row::default()),
            b"tc" if self.table_depth == 1 => self.cell = Some(Vec::new()),
            b"p" if self.collecting() => {
                self.in_paragraph = true;
                self.paragraph.clear();
            }
            b"r" if self.in_paragraph && self.collecting() => self.run_depth += 1,
            b"t" if self.in_paragraph && self.collecting() => self.in_text = true,
            _ => {}
        }
    }

    fn empty(&mut self, e: &BytesStart<'_>) {
        if self.skip_depth > 0 || !self.collecting() {
            return;
        }
        match e.local_name().as_ref() {
            b"tab" if self.in_run() => self.paragraph.push('\t'),
            b"br" | b"cr" if self.in_run() => self.paragraph.push('\n'),
            b"p" => {
                self.paragraph.clear();
                self.finish_paragraph();
            }
            b"tc" if self.table_depth == 1 => {
                if let Some(row) = self.row.as_mut() {
                    row.cells.push(Cell::default());
                }
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if self.in_text && self.skip_depth == 0 {
            self.paragraph.push_str(text);
        }
    }

    fn end(&mut self, local_name: &[u8]) {
        if self.skip_depth > 0 {
            self.skip_depth -= 1;
            return;
        }
        match local_name {
            b"t" => self.in_text = false,
            b"r" => self.run_depth = self.run_depth.saturating_sub(1),
            b"p" if self.in_paragraph && self.collecting() => {
                self.in_paragraph = false;
                self.run_depth = 0;
                self.in_text = false;
                self.finish_paragraph();
            }
            b"tc" if self.table_depth == 1 => {
                if let (Some(paragraphs), Some(row)) = (self.cell.take(), self.row.as_mut()) {
                    row.cells.push(Cell::new(paragraphs.join("\n")));
                }
            }
            b"tr" if self.table_depth == 1 => {
                if let Some(row) = self.row.take() {
                    self.table.rows.push(row);
                }
            }
            b"tbl" => {
                if self.table_depth == 1 {
                    self.tables.push(std::mem::take(&mut self.table));
                }
                self.table_depth = self.table_depth.saturating_sub(1);
            }
            _ => {}
        }
    }

    fn finish_paragraph(&mut self) {
        let text = std::mem::take(&mut self.paragraph);
        match (self.table_depth, self.cell.as_mut()) {
            (0, _) => self.paragraphs.push(text),
            (1, Some(cell)) => cell.push(text),
            _ => {}
        }
    }

    fn into_document(self) -> RawDocument {
        RawDocument::new(self.tables, self.paragraphs)
    }
}

/// Parses the XML of the main document part.
pub fn parse_document_xml(xml: &str) -> Result<RawDocument, IngestError> {
    let mut reader = Reader::from_str(xml);
    let mut walker = Walker::default();
    let mut saw_body = false;

    loop {
        match reader.read_event()? {
            Event::Eof => break,
            Event::Start(e) => {
                if e.local_name().as_ref() == b"body" {
                    saw_body = true;
                }
                walker.start(&e);
            }
            Event::Empty(e) => walker.empty(&e),
            Event::Text(e) => {
                if walker.in_text {
                    let text = e.unescape()?;
                    walker.text(&text);
                }
            }
            Event::CData(e) => {
                if walker.in_text {
                    walker.text(&String::from_utf8_lossy(&e));
                }
            }
            Event::End(e) => walker.end(e.local_name().as_ref()),
            _ => {}
        }
    }

    if !saw_body {
        return Err(IngestError::MalformedDocument(
            "document part has no w:body element".into(),
        ));
    }
    Ok(walker.into_document())
}
