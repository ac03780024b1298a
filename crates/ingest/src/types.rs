use serde::{Deserialize, Serialize};

/// One table cell with its plain text. Multi-paragraph cells join their
/// paragraphs with `\n`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cell {
    pub text: String,
}

impl Cell {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Row {
    pub cells: Vec<Cell>,
}

impl Row {
    pub fn new<I, S>(cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cells: cells.into_iter().map(Cell::new).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Table {
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }
}

/// Read-only dual view over an uploaded document: top-level tables and
/// body paragraphs, both in document order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawDocument {
    tables: Vec<Table>,
    paragraphs: Vec<String>,
}

impl RawDocument {
    pub fn new(tables: Vec<Table>, paragraphs: Vec<String>) -> Self {
        Self { tables, paragraphs }
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn paragraphs(&self) -> &[String] {
        &self.paragraphs
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty() && self.paragraphs.is_empty()
    }
}

/// Where a checked item was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemOrigin {
    Table { table: usize, row: usize },
    Paragraph { index: usize },
}

/// A selected checklist row: the raw label as it appears in the document and
/// the bracketed code found inside it, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub origin: ItemOrigin,
}

impl ChecklistItem {
    /// Convenience constructor for items without an origin of interest.
    pub fn from_label(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            code: None,
            origin: ItemOrigin::Paragraph { index: 0 },
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}
