//! Section shapes handed to the document composer.
//!
//! The set of block kinds is closed so the composer can match on it
//! exhaustively.

use serde::{Deserialize, Serialize};

/// One titled section of a report document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    pub blocks: Vec<SectionBlock>,
}

impl Section {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            blocks: Vec::new(),
        }
    }

    pub fn with_block(mut self, block: SectionBlock) -> Self {
        self.blocks.push(block);
        self
    }

    /// A section whose data never arrived; rendered as an explicit placeholder.
    pub fn no_data(title: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(title).with_block(SectionBlock::NoData {
            reason: reason.into(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SectionBlock {
    KeyValue(KeyValueBlock),
    Table(TableBlock),
    Insight(InsightBlock),
    NoData { reason: String },
}

/// Label/value lines, one per entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyValueBlock {
    pub entries: Vec<KeyValueEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyValueEntry {
    pub label: String,
    pub value: String,
}

impl KeyValueBlock {
    pub fn push(&mut self, label: impl Into<String>, value: impl Into<String>) {
        self.entries.push(KeyValueEntry {
            label: label.into(),
            value: value.into(),
        });
    }
}

/// Table with caller-supplied fixed column widths (points)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableBlock {
    pub caption: Option<String>,
    pub columns: Vec<TableColumn>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableColumn {
    pub header: String,
    pub width: f32,
    #[serde(default)]
    pub align: CellAlign,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellAlign {
    #[default]
    Left,
    Right,
}

impl TableColumn {
    pub fn left(header: impl Into<String>, width: f32) -> Self {
        Self {
            header: header.into(),
            width,
            align: CellAlign::Left,
        }
    }

    pub fn right(header: impl Into<String>, width: f32) -> Self {
        Self {
            header: header.into(),
            width,
            align: CellAlign::Right,
        }
    }
}

/// Free-form observation paragraph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightBlock {
    pub text: String,
}
