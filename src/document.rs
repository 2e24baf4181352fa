//! In-memory document model shared by every pipeline stage.
//!
//! A [`Document`] is built once per input file by the extractor and never
//! mutated afterwards; the page pipeline reads it and produces a
//! [`TranslatedDocument`] with exactly the same number of pages in the same
//! order.

use crate::config::OutputFormat;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Suffix appended to the original base name of every output file.
pub const TRANSLATED_SUFFIX: &str = "_translated";

/// Format of an input file, decided by its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    Pdf,
    /// Legacy Word binary format; converted to DOCX before extraction.
    Doc,
    Docx,
}

impl SourceFormat {
    /// Sniff the format from a file name's extension (case-insensitive).
    ///
    /// Returns `None` for anything other than `.pdf`, `.doc`, `.docx`.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let ext = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Some(SourceFormat::Pdf),
            "doc" => Some(SourceFormat::Doc),
            "docx" => Some(SourceFormat::Docx),
            _ => None,
        }
    }

    /// Extension without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            SourceFormat::Pdf => "pdf",
            SourceFormat::Doc => "doc",
            SourceFormat::Docx => "docx",
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Text extracted from one input file.
///
/// PDF inputs have one page per PDF page; Word inputs have a single page
/// holding the whole body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Original file name as supplied by the user (no directory).
    pub file_name: String,
    pub format: SourceFormat,
    /// Page texts in reading order. A page may be empty.
    pub pages: Vec<String>,
}

impl Document {
    pub fn new(file_name: impl Into<String>, format: SourceFormat, pages: Vec<String>) -> Self {
        Self {
            file_name: file_name.into(),
            format,
            pages,
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Total characters across all pages.
    pub fn char_count(&self) -> usize {
        self.pages.iter().map(|p| p.chars().count()).sum()
    }
}

/// The translation of a [`Document`], page for page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatedDocument {
    /// Original file name of the source document.
    pub source_name: String,
    pub source_format: SourceFormat,
    /// Translated page texts; same length and order as the source pages.
    pub pages: Vec<String>,
}

impl TranslatedDocument {
    /// Name of the file this document is written to in `format`.
    pub fn output_file_name(&self, format: OutputFormat) -> String {
        translated_file_name(&self.source_name, format)
    }
}

/// Derive `<original base name>_translated.<ext>` from an input file name.
///
/// Only the last extension is replaced; any directory part is dropped.
pub fn translated_file_name(original: &str, format: OutputFormat) -> String {
    let stem = Path::new(original)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("document");
    format!("{stem}{TRANSLATED_SUFFIX}.{}", format.extension())
}
