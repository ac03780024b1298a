//! Minimal `.docx` writer used by tests, demos and benchmarks.
//!
//! The output is the smallest package word processors accept: content types,
//! the package relationship and `word/document.xml`. Parsing the result with
//! [`parse_docx`](crate::parse_docx) yields the input document back.
use std::io::{Cursor, Write};

use quick_xml::escape::escape;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::docx::DOCUMENT_PART;
use crate::error::IngestError;
use crate::types::RawDocument;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

/// Renders the main document part for `doc`. Tables are written first, then
/// paragraphs, matching the order the extractor scans them in.
pub fn document_xml(doc: &RawDocument) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
         <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\"><w:body>",
    );
    for table in doc.tables() {
        xml.push_str("<w:tbl>");
        for row in &table.rows {
            xml.push_str("<w:tr>");
            for cell in &row.cells {
                xml.push_str("<w:tc>");
                for line in cell.text.split('\n') {
                    push_paragraph(&mut xml, line);
                }
                xml.push_str("</w:tc>");
            }
            xml.push_str("</w:tr>");
        }
        xml.push_str("</w:tbl>");
    }
    for paragraph in doc.paragraphs() {
        push_paragraph(&mut xml, paragraph);
    }
    xml.push_str("</w:body></w:document>");
    xml
}

fn push_paragraph(xml: &mut String, text: &str) {
    if text.is_empty() {
        xml.push_str("<w:p/>");
        return;
    }
    xml.push_str("<w:p><w:r>");
    let mut chunk = String::new();
    for ch in text.chars() {
        match ch {
            '\t' | '\n' => {
                flush_text(xml, &mut chunk);
                xml.push_str(if ch == '\t' { "<w:tab/>" } else { "<w:br/>" });
            }
            _ => chunk.push(ch),
        }
    }
    flush_text(xml, &mut chunk);
    xml.push_str("</w:r></w:p>");
}

fn flush_text(xml: &mut String, chunk: &mut String) {
    if chunk.is_empty() {
        return;
    }
    xml.push_str("<w:t xml:space=\"preserve\">");
    xml.push_str(&escape(chunk.as_str()));
    xml.push_str("</w:t>");
    chunk.clear();
}

/// Packs `doc` into an uncompressed `.docx` container.
pub fn docx_bytes(doc: &RawDocument) -> Result<Vec<u8>, IngestError> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    let parts = [
        ("[Content_Types].xml", CONTENT_TYPES.to_string()),
        ("_rels/.rels", PACKAGE_RELS.to_string()),
        (DOCUMENT_PART, document_xml(doc)),
    ];
    for (name, body) in parts {
        writer.start_file(name, options)?;
        writer
            .write_all(body.as_bytes())
            .map_err(|err| IngestError::MalformedDocument(format!("write {name}: {err}")))?;
    }

    Ok(writer.finish()?.into_inner())
}
