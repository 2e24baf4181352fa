//! Batch driver: extract, translate and compose each input file in turn.
//!
//! Files are independent. A file that cannot be read, converted, translated
//! or composed becomes a [`FileError`] in the [`BatchReport`] and the batch
//! moves on to the next file. Only problems that would affect every file
//! (no input, invalid configuration, an unwritable output directory) are
//! returned as `Err`.

use crate::config::TranslationConfig;
use crate::document::Document;
use crate::error::{DocTranslateError, FileError};
use crate::output::{BatchReport, BatchStatus, ComposedOutput, DocumentInfo, TranslatedFile};
use crate::pipeline::input::{self, StagedInput};
use crate::pipeline::segment::chunk_count;
use crate::pipeline::translator::{adapter_for, TranslatorAdapter};
use crate::pipeline::{compose, extract, pages};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Translate one local file.
///
/// # Errors
/// Any failure of this file, including an unsupported extension.
pub async fn translate_file(
    path: impl AsRef<Path>,
    config: &TranslationConfig,
) -> Result<TranslatedFile, DocTranslateError> {
    let adapter = adapter_for(config)?;
    let staged = input::resolve_local(path.as_ref())?;
    translate_staged(&staged, &adapter, config).await
}

/// Translate an uploaded file held in memory.
///
/// `file_name` decides the format and the output name. The bytes are
/// written to a temp directory that is removed before this returns.
///
/// # Example
/// ```rust,no_run
/// use edgequake_doctranslate::{translate_bytes, OutputFormat, TargetLanguage, TranslationConfig};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let bytes = std::fs::read("carta.docx")?;
/// let config = TranslationConfig::builder()
///     .target_language(TargetLanguage::Fr)
///     .output_format(OutputFormat::Docx)
///     .build()?;
/// let translated = translate_bytes("carta.docx", &bytes, &config).await?;
/// std::fs::write(&translated.output.file_name, &translated.output.bytes)?;
/// # Ok(())
/// # }
/// ```
pub async fn translate_bytes(
    file_name: &str,
    bytes: &[u8],
    config: &TranslationConfig,
) -> Result<TranslatedFile, DocTranslateError> {
    let adapter = adapter_for(config)?;
    let staged = input::stage_bytes(file_name, bytes).await?;
    translate_staged(&staged, &adapter, config).await
}

/// Translate every file in `paths`, keeping outputs in memory.
///
/// # Errors
/// [`DocTranslateError::NoInputFiles`] for an empty list, and
/// [`DocTranslateError::InvalidConfig`] when no translator can be built.
/// Per-file failures are reported in [`BatchReport::failures`].
pub async fn translate_batch<P: AsRef<Path>>(
    paths: &[P],
    config: &TranslationConfig,
) -> Result<BatchReport, DocTranslateError> {
    run_batch(paths, config, None).await
}

/// Translate every file in `paths` and write each output into `out_dir`.
///
/// Outputs are written as soon as their file finishes, atomically
/// (temp file + rename). A write failure stops the batch. When two inputs
/// map to the same output name, the later one gets a `(2)`, `(3)`, ...
/// counter before its extension.
pub async fn translate_to_dir<P: AsRef<Path>>(
    paths: &[P],
    out_dir: impl AsRef<Path>,
    config: &TranslationConfig,
) -> Result<BatchReport, DocTranslateError> {
    let out_dir = out_dir.as_ref();
    tokio::fs::create_dir_all(out_dir)
        .await
        .map_err(|e| DocTranslateError::OutputWriteFailed {
            path: out_dir.to_path_buf(),
            source: e,
        })?;
    run_batch(paths, config, Some(out_dir)).await
}

/// Synchronous wrapper around [`translate_batch`].
///
/// Creates a temporary tokio runtime internally.
pub fn translate_sync<P: AsRef<Path>>(
    paths: &[P],
    config: &TranslationConfig,
) -> Result<BatchReport, DocTranslateError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| DocTranslateError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(translate_batch(paths, config))
}

/// Extract a file and report its size without translating it.
///
/// Does not need network access or a translator.
pub async fn inspect(path: impl AsRef<Path>, config: &TranslationConfig) -> Result<DocumentInfo, DocTranslateError> {
    let staged = input::resolve_local(path.as_ref())?;
    let doc = extract::extract(&staged, config).await?;
    Ok(document_info(&doc, config.chunk_max_chars))
}

/// Write `output` into `out_dir` under its own file name.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn write_output(output: &ComposedOutput, out_dir: &Path) -> Result<PathBuf, DocTranslateError> {
    let path = out_dir.join(&output.file_name);
    let tmp_path = path.with_extension(format!("{}.tmp", output.format.extension()));

    tokio::fs::write(&tmp_path, &output.bytes)
        .await
        .map_err(|e| DocTranslateError::OutputWriteFailed {
            path: path.clone(),
            source: e,
        })?;

    tokio::fs::rename(&tmp_path, &path)
        .await
        .map_err(|e| DocTranslateError::OutputWriteFailed {
            path: path.clone(),
            source: e,
        })?;

    debug!("Wrote {} ({} bytes)", path.display(), output.len());
    Ok(path)
}

// ── Internal helpers ─────────────────────────────────────────────────────

fn document_info(doc: &Document, chunk_max_chars: usize) -> DocumentInfo {
    DocumentInfo {
        file_name: doc.file_name.clone(),
        format: doc.format,
        page_count: doc.page_count(),
        char_count: doc.char_count(),
        chunk_count: doc.pages.iter().map(|p| chunk_count(p, chunk_max_chars)).sum(),
    }
}

/// `name`, or `<stem>(n).<ext>` with the smallest `n >= 2` not in `used`.
fn unique_file_name(name: &str, used: &HashSet<String>) -> String {
    if !used.contains(name) {
        return name.to_string();
    }
    let (stem, ext) = match name.rfind('.') {
        Some(dot) => name.split_at(dot),
        None => (name, ""),
    };
    (2..)
        .map(|n| format!("{stem}({n}){ext}"))
        .find(|candidate| !used.contains(candidate))
        .unwrap_or_else(|| name.to_string())
}

async fn run_batch<P: AsRef<Path>>(
    paths: &[P],
    config: &TranslationConfig,
    out_dir: Option<&Path>,
) -> Result<BatchReport, DocTranslateError> {
    if paths.is_empty() {
        return Err(DocTranslateError::NoInputFiles);
    }

    let start = Instant::now();
    let total = paths.len();
    let adapter = adapter_for(config)?;
    let progress = config.progress_callback.as_ref();
    info!(
        "Translating {} file(s) to {} as {} via {}",
        total,
        config.target_language,
        config.output_format,
        adapter.backend_name()
    );

    if let Some(cb) = progress {
        cb.on_batch_start(total);
    }

    let mut files = Vec::new();
    let mut failures = Vec::new();
    let mut used_names = HashSet::new();

    for (idx, path) in paths.iter().enumerate() {
        let index = idx + 1;
        let path = path.as_ref();
        let file_name = input::display_name(path);
        if let Some(cb) = progress {
            cb.on_file_start(index, total, &file_name);
        }

        let result = match input::resolve_local(path) {
            Ok(staged) => translate_staged(&staged, &adapter, config).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(mut translated) => {
                let name = unique_file_name(&translated.output.file_name, &used_names);
                if name != translated.output.file_name {
                    debug!("{} renamed to {}", translated.output.file_name, name);
                    translated.output.file_name = name;
                }
                used_names.insert(translated.output.file_name.clone());
                if let Some(dir) = out_dir {
                    write_output(&translated.output, dir).await?;
                }
                if let Some(cb) = progress {
                    cb.on_file_complete(index, total, &file_name, &translated.output.file_name);
                }
                files.push(translated);
            }
            Err(e) => {
                warn!("Skipping {}: {}", file_name, e);
                let failure = FileError::from_error(&file_name, &e);
                if let Some(cb) = progress {
                    cb.on_file_error(index, total, &file_name, &failure.message);
                }
                failures.push(failure);
            }
        }
    }

    let status = BatchStatus::from_counts(files.len(), failures.len());
    let total_duration_ms = start.elapsed().as_millis() as u64;
    info!(
        "Batch finished: {}/{} file(s) translated in {}ms ({:?})",
        files.len(),
        total,
        total_duration_ms,
        status
    );

    if let Some(cb) = progress {
        cb.on_batch_complete(total, files.len());
    }

    Ok(BatchReport {
        status,
        files,
        failures,
        total_duration_ms,
    })
}

async fn translate_staged(
    staged: &StagedInput,
    adapter: &TranslatorAdapter,
    config: &TranslationConfig,
) -> Result<TranslatedFile, DocTranslateError> {
    let start = Instant::now();

    // ── Step 1: Extract ──────────────────────────────────────────────────
    let doc = extract::extract(staged, config).await?;

    // ── Step 2: Translate page by page ───────────────────────────────────
    let translated = pages::translate_document(
        adapter,
        &doc,
        config.chunk_max_chars,
        config.progress_callback.as_ref(),
    )
    .await?;

    // ── Step 3: Compose ──────────────────────────────────────────────────
    let output = compose::compose(
        &translated.pages,
        &translated.source_name,
        config.output_format,
        config,
    )
    .await?;

    let duration_ms = start.elapsed().as_millis() as u64;
    info!(
        "{} → {} ({} pages, {}ms)",
        doc.file_name, output.file_name, doc.page_count(), duration_ms
    );

    Ok(TranslatedFile {
        source_name: doc.file_name.clone(),
        source_format: doc.format,
        page_count: doc.page_count(),
        source_chars: doc.char_count(),
        translated_chars: translated.pages.iter().map(|p| p.chars().count()).sum(),
        output,
        duration_ms,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{OutputFormat, TargetLanguage};
    use crate::document::SourceFormat;
    use crate::pipeline::mock::MockTranslator;
    use std::sync::Arc;

    #[test]
    fn document_info_counts_chunks() {
        let doc = Document::new(
            "a.pdf",
            SourceFormat::Pdf,
            vec!["x".repeat(12), String::new()],
        );
        let info = document_info(&doc, 5);
        assert_eq!(info.page_count, 2);
        assert_eq!(info.char_count, 12);
        // 12 chars → 3 chunks, empty page → 1
        assert_eq!(info.chunk_count, 4);
    }

    #[test]
    fn colliding_names_get_a_counter() {
        let mut used = HashSet::new();
        assert_eq!(unique_file_name("carta_translated.docx", &used), "carta_translated.docx");
        used.insert("carta_translated.docx".to_string());
        assert_eq!(unique_file_name("carta_translated.docx", &used), "carta_translated(2).docx");
        used.insert("carta_translated(2).docx".to_string());
        assert_eq!(unique_file_name("carta_translated.docx", &used), "carta_translated(3).docx");
        assert_eq!(unique_file_name("outra_translated.pdf", &used), "outra_translated.pdf");
    }

    #[tokio::test]
    async fn empty_batch_is_rejected() {
        let config = TranslationConfig::builder()
            .translator(Arc::new(MockTranslator::identity()))
            .build()
            .unwrap();
        let paths: Vec<PathBuf> = Vec::new();
        let err = translate_batch(&paths, &config).await.unwrap_err();
        assert!(matches!(err, DocTranslateError::NoInputFiles));
    }

    #[tokio::test]
    async fn write_output_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = ComposedOutput {
            bytes: b"PK..".to_vec(),
            file_name: "carta_translated.docx".into(),
            format: OutputFormat::Docx,
        };
        let path = write_output(&out, dir.path()).await.unwrap();
        assert_eq!(path, dir.path().join("carta_translated.docx"));
        assert_eq!(std::fs::read(&path).unwrap(), b"PK..");
        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[tokio::test]
    async fn unsupported_file_does_not_need_translator_calls() {
        let mock = Arc::new(MockTranslator::uppercase());
        let config = TranslationConfig::builder()
            .translator(mock.clone())
            .target_language(TargetLanguage::Pt)
            .build()
            .unwrap();
        let report = translate_batch(&["/tmp/report.xyz"], &config).await.unwrap();
        assert_eq!(report.status, BatchStatus::Failed);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].file_name, "report.xyz");
        assert_eq!(mock.calls(), 0);
    }
}
