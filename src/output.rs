//! Result types returned by the translation entry points.

use crate::config::OutputFormat;
use crate::document::SourceFormat;
use crate::error::FileError;
use serde::{Deserialize, Serialize};

/// A serialised output document, ready to be offered for download or
/// written to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComposedOutput {
    /// Document bytes. Omitted from JSON reports.
    #[serde(skip)]
    pub bytes: Vec<u8>,
    /// `<original base name>_translated.<ext>`
    pub file_name: String,
    pub format: OutputFormat,
}

impl ComposedOutput {
    /// MIME type of [`Self::bytes`].
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// One successfully translated input file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslatedFile {
    /// Original file name.
    pub source_name: String,
    pub source_format: SourceFormat,
    /// Pages extracted from the source (and translated).
    pub page_count: usize,
    /// Characters extracted from the source.
    pub source_chars: usize,
    /// Characters in the translated text.
    pub translated_chars: usize,
    pub output: ComposedOutput,
    pub duration_ms: u64,
}

/// Overall outcome of a batch, returned explicitly instead of kept as
/// ambient state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    /// Every file was translated.
    Completed,
    /// At least one file was translated and at least one failed.
    CompletedWithErrors,
    /// No file was translated.
    Failed,
}

impl BatchStatus {
    /// Derive the status from success and failure counts.
    pub fn from_counts(succeeded: usize, failed: usize) -> Self {
        match (succeeded, failed) {
            (_, 0) => BatchStatus::Completed,
            (0, _) => BatchStatus::Failed,
            _ => BatchStatus::CompletedWithErrors,
        }
    }
}

/// Everything a batch produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub status: BatchStatus,
    /// Successful files, in input order.
    pub files: Vec<TranslatedFile>,
    /// Skipped or aborted files, in input order.
    pub failures: Vec<FileError>,
    pub total_duration_ms: u64,
}

impl BatchReport {
    /// Number of files the batch was given.
    pub fn total_files(&self) -> usize {
        self.files.len() + self.failures.len()
    }

    pub fn is_success(&self) -> bool {
        self.status == BatchStatus::Completed
    }
}

/// Summary of an input file, produced without translating it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub file_name: String,
    pub format: SourceFormat,
    pub page_count: usize,
    pub char_count: usize,
    /// Translation calls a full run would make at the configured chunk size.
    pub chunk_count: usize,
}
