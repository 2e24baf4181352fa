//! # edgequake-doctranslate
//!
//! Translate PDF, DOC and DOCX documents into another language and re-emit
//! them as PDF or DOCX.
//!
//! Text is extracted page by page, cut into chunks small enough for one
//! call to the translation service, translated strictly in order, and
//! reassembled so page count, page order and line structure survive.
//!
//! ## Pipeline Overview
//!
//! ```text
//! .pdf / .doc / .docx
//!  │
//!  ├─ 1. Input     sniff format by extension, stage uploads in a temp dir
//!  ├─ 2. Extract   pdfium page text / docx-rs paragraphs / soffice for .doc
//!  ├─ 3. Segment   ≤ 5 000-char chunks, cut at line breaks when possible
//!  ├─ 4. Translate Google web endpoint or any edgequake-llm chat model
//!  ├─ 5. Compose   DOCX paragraphs or fixed-position A4 PDF pages
//!  └─ 6. Output    <name>_translated.<ext> + per-file report
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgequake_doctranslate::{translate_to_dir, OutputFormat, TargetLanguage, TranslationConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = TranslationConfig::builder()
//!         .target_language(TargetLanguage::Es)
//!         .output_format(OutputFormat::Docx)
//!         .build()?;
//!     let report = translate_to_dir(&["contrato.pdf", "carta.doc"], "out", &config).await?;
//!     for failure in &report.failures {
//!         eprintln!("{failure}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `doctranslate` binary (clap + indicatif + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! edgequake-doctranslate = { version = "0.1", default-features = false }
//! ```
//!
//! ## Native Requirements
//!
//! PDF input and PDF output need the pdfium shared library, found on the
//! system library path or through `PDFIUM_LIB_PATH`. Legacy `.doc` input
//! needs LibreOffice (`soffice`) or, on macOS, the built-in `textutil`.
//! DOCX-to-DOCX translation needs neither.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod document;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod translate;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{OutputFormat, TargetLanguage, TranslationConfig, TranslationConfigBuilder, TranslatorBackend};
pub use document::{Document, SourceFormat, TranslatedDocument};
pub use error::{DocTranslateError, FileError, FileErrorKind, TranslateError};
pub use output::{BatchReport, BatchStatus, ComposedOutput, DocumentInfo, TranslatedFile};
pub use pipeline::legacy::{ConverterKind, DocConverter};
pub use pipeline::segment::split_text;
pub use pipeline::translator::Translator;
pub use progress::{NoopProgressCallback, ProgressCallback, TranslationProgressCallback};
pub use translate::{inspect, translate_batch, translate_bytes, translate_file, translate_sync, translate_to_dir};
