//! Error types for the edgequake-doctranslate library.
//!
//! Three error types reflect three distinct failure scopes:
//!
//! * [`DocTranslateError`] — a single-file operation failed (unsupported
//!   extension, unreadable PDF, legacy conversion error, translation service
//!   error). Returned as `Err` from [`crate::translate_file`] and friends.
//!
//! * [`TranslateError`] — a translator backend failed. Wrapped into
//!   [`DocTranslateError::Translation`] by the page pipeline so the caller
//!   knows which page and chunk were being translated.
//!
//! * [`FileError`] — **Non-fatal**: the batch driver converts a failed file
//!   into this record, stores it in [`crate::output::BatchReport`], and moves
//!   on to the next file.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Every failure of a single-file translation.
#[derive(Debug, Error)]
pub enum DocTranslateError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// No files were given to a batch.
    #[error("No input files given.\nAttach at least one .pdf, .doc or .docx file to translate.")]
    NoInputFiles,

    /// Input file was not found at the given path.
    #[error("File not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file extension is not one of `.pdf`, `.doc`, `.docx`.
    #[error("Unsupported format: '{file_name}' (expected .pdf, .doc or .docx)")]
    UnsupportedFormat { file_name: String },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}\nTry repairing with: qpdf --decrypt input.pdf output.pdf")]
    CorruptPdf { path: PathBuf, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{path}' is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{path}'")]
    WrongPassword { path: PathBuf },

    /// pdfium returned an error while reading the text of a page.
    #[error("Text extraction failed for page {page}: {detail}")]
    ExtractionFailed { page: usize, detail: String },

    // ── Word errors ───────────────────────────────────────────────────────
    /// The `.docx` archive could not be read.
    #[error("DOCX '{path}' could not be read: {detail}")]
    DocxReadFailed { path: PathBuf, detail: String },

    /// The external `.doc` → `.docx` converter failed.
    #[error("Failed to convert legacy .doc file '{path}' with {converter}: {detail}")]
    LegacyConversionFailed {
        path: PathBuf,
        converter: String,
        detail: String,
    },

    // ── Translation errors ────────────────────────────────────────────────
    /// The translation backend failed on one chunk; the whole file is aborted.
    #[error("Translation failed on page {page}, chunk {chunk}: {source}")]
    Translation {
        page: usize,
        chunk: usize,
        #[source]
        source: TranslateError,
    },

    // ── Output errors ─────────────────────────────────────────────────────
    /// The translated document could not be serialised.
    #[error("Failed to compose {format} output: {detail}")]
    ComposeFailed { format: String, detail: String },

    /// Could not create or write an output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
PDF input and output need the native pdfium library.\n\
  • Install it system-wide (libpdfium.so / libpdfium.dylib / pdfium.dll), or\n\
  • Set PDFIUM_LIB_PATH=/path/to/libpdfium to use an existing copy.\n"
    )]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failures of a translator backend.
#[derive(Debug, Clone, Error)]
pub enum TranslateError {
    /// The request never produced a response (DNS, TLS, connection reset…).
    #[error("request to {backend} failed: {detail}")]
    Http { backend: String, detail: String },

    /// The per-call timeout elapsed.
    #[error("{backend} did not answer within {secs}s")]
    Timeout { backend: String, secs: u64 },

    /// HTTP 429. The service decides when it will accept requests again.
    #[error("rate limit exceeded for {backend}")]
    RateLimited {
        backend: String,
        retry_after_secs: Option<u64>,
    },

    /// HTTP 401/403.
    #[error("authentication error from {backend}: {detail}")]
    Auth { backend: String, detail: String },

    /// Any other non-success status.
    #[error("{backend} returned HTTP {status}: {detail}")]
    Status {
        backend: String,
        status: u16,
        detail: String,
    },

    /// The response body did not have the expected shape.
    #[error("unexpected response from {backend}: {detail}")]
    InvalidResponse { backend: String, detail: String },

    /// The chat-model provider could not be created (missing API key etc.).
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    /// The chat-model API returned an error.
    #[error("LLM API error: {message}")]
    LlmApi { message: String },
}

/// What kind of failure a [`FileError`] records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileErrorKind {
    /// Extension is not pdf, doc or docx.
    UnsupportedFormat,
    /// Legacy `.doc` conversion failed.
    LegacyConversion,
    /// The file could not be opened or its text extracted.
    Extraction,
    /// The translation service failed on one of the file's chunks.
    Translation,
    /// The output document could not be composed.
    Output,
}

/// A non-fatal error for a single input file.
///
/// Stored in [`crate::output::BatchReport::failures`]. The batch continues
/// with the remaining files.
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[error("{file_name}: {message}")]
pub struct FileError {
    /// Original file name as given by the user.
    pub file_name: String,
    pub kind: FileErrorKind,
    /// Human-readable description.
    pub message: String,
}

impl FileError {
    /// Record `err` as the failure of `file_name`.
    pub fn from_error(file_name: impl Into<String>, err: &DocTranslateError) -> Self {
        Self {
            file_name: file_name.into(),
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

impl DocTranslateError {
    /// Classify this error for per-file reporting.
    pub fn kind(&self) -> FileErrorKind {
        match self {
            DocTranslateError::UnsupportedFormat { .. } => FileErrorKind::UnsupportedFormat,
            DocTranslateError::LegacyConversionFailed { .. } => FileErrorKind::LegacyConversion,
            DocTranslateError::Translation { .. } => FileErrorKind::Translation,
            DocTranslateError::ComposeFailed { .. }
            | DocTranslateError::OutputWriteFailed { .. } => FileErrorKind::Output,
            _ => FileErrorKind::Extraction,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_format_display() {
        let e = DocTranslateError::UnsupportedFormat {
            file_name: "report.xyz".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("report.xyz"), "got: {msg}");
        assert!(msg.contains(".docx"));
    }

    #[test]
    fn translation_error_carries_position() {
        let e = DocTranslateError::Translation {
            page: 3,
            chunk: 2,
            source: TranslateError::RateLimited {
                backend: "google".into(),
                retry_after_secs: Some(30),
            },
        };
        let msg = e.to_string();
        assert!(msg.contains("page 3"), "got: {msg}");
        assert!(msg.contains("chunk 2"), "got: {msg}");
        assert!(msg.contains("google"));
    }

    #[test]
    fn status_display() {
        let e = TranslateError::Status {
            backend: "google".into(),
            status: 503,
            detail: "Service Unavailable".into(),
        };
        assert!(e.to_string().contains("503"));
    }

    #[test]
    fn file_error_kind_follows_error() {
        let e = DocTranslateError::LegacyConversionFailed {
            path: PathBuf::from("/tmp/a.doc"),
            converter: "soffice".into(),
            detail: "exit status 1".into(),
        };
        let fe = FileError::from_error("a.doc", &e);
        assert_eq!(fe.kind, FileErrorKind::LegacyConversion);
        assert_eq!(fe.file_name, "a.doc");
        assert!(fe.to_string().starts_with("a.doc: "));

        let e = DocTranslateError::CorruptPdf {
            path: PathBuf::from("/tmp/b.pdf"),
            detail: "bad xref".into(),
        };
        assert_eq!(e.kind(), FileErrorKind::Extraction);
    }

    #[test]
    fn file_error_serialises_kind_snake_case() {
        let fe = FileError {
            file_name: "report.xyz".into(),
            kind: FileErrorKind::UnsupportedFormat,
            message: "Unsupported format".into(),
        };
        let json = serde_json::to_string(&fe).unwrap();
        assert!(json.contains("\"unsupported_format\""), "got: {json}");
    }
}
