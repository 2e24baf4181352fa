//! Text extraction: build a [`Document`] from a staged input file.
//!
//! | Format | Pages | Backend |
//! |--------|-------|---------|
//! | PDF    | one per PDF page | pdfium page text API |
//! | DOCX   | one, body paragraphs joined with `\n` | `docx-rs` |
//! | DOC    | as DOCX, after conversion | [`DocConverter`] + `docx-rs` |
//!
//! pdfium calls run inside `spawn_blocking` because the library is
//! synchronous and CPU-bound. Every extracted page is normalised before it
//! reaches the segmenter: PDF pages with [`clean_extracted_text`], Word text
//! with [`clean_paragraph_text`] so empty paragraphs survive.

use crate::config::TranslationConfig;
use crate::document::{Document, SourceFormat};
use crate::error::DocTranslateError;
use crate::pipeline::input::StagedInput;
use crate::pipeline::legacy::{resolve_converter, DocConverter};
use crate::pipeline::normalize::{clean_extracted_text, clean_paragraph_text};
use docx_rs::{DocumentChild, ParagraphChild, RunChild};
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info};

/// Extract the text of `input` as an immutable [`Document`].
pub async fn extract(input: &StagedInput, config: &TranslationConfig) -> Result<Document, DocTranslateError> {
    let path = input.path();
    let pages = match input.format() {
        SourceFormat::Pdf => extract_pdf(path, config.password.as_deref()).await?,
        SourceFormat::Docx => vec![extract_docx(path).await?],
        SourceFormat::Doc => {
            let converter = resolve_converter(config);
            vec![extract_doc(path, converter.as_ref()).await?]
        }
    };

    let clean = match input.format() {
        SourceFormat::Pdf => clean_extracted_text,
        SourceFormat::Docx | SourceFormat::Doc => clean_paragraph_text,
    };
    let pages: Vec<String> = pages.iter().map(|p| clean(p)).collect();
    let doc = Document::new(input.file_name(), input.format(), pages);
    info!(
        "Extracted {}: {} page(s), {} chars",
        doc.file_name,
        doc.page_count(),
        doc.char_count()
    );
    Ok(doc)
}

// ── pdfium ───────────────────────────────────────────────────────────────────

/// Bind to the pdfium shared library.
///
/// `PDFIUM_LIB_PATH` may name the library file itself or the directory that
/// holds it; otherwise the platform's default library search path is used.
pub fn bind_pdfium() -> Result<Pdfium, DocTranslateError> {
    let bindings = match std::env::var_os("PDFIUM_LIB_PATH").filter(|p| !p.is_empty()) {
        Some(p) => {
            let p = PathBuf::from(p);
            let lib = if p.is_dir() { p.join(PDFIUM_LIBRARY_NAME) } else { p };
            debug!("Binding pdfium from {}", lib.display());
            Pdfium::bind_to_library(&lib)
        }
        None => Pdfium::bind_to_system_library(),
    }
    .map_err(|e| DocTranslateError::PdfiumBindingFailed(e.to_string()))?;

    Ok(Pdfium::new(bindings))
}

#[cfg(target_os = "windows")]
const PDFIUM_LIBRARY_NAME: &str = "pdfium.dll";
#[cfg(target_os = "macos")]
const PDFIUM_LIBRARY_NAME: &str = "libpdfium.dylib";
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
const PDFIUM_LIBRARY_NAME: &str = "libpdfium.so";

/// Map a pdfium load error to a password or corruption error.
fn map_load_error(path: &Path, password: Option<&str>, err: PdfiumError) -> DocTranslateError {
    let err_str = format!("{:?}", err);
    if err_str.contains("Password") || err_str.contains("password") {
        if password.is_some() {
            DocTranslateError::WrongPassword {
                path: path.to_path_buf(),
            }
        } else {
            DocTranslateError::PasswordRequired {
                path: path.to_path_buf(),
            }
        }
    } else {
        DocTranslateError::CorruptPdf {
            path: path.to_path_buf(),
            detail: err_str,
        }
    }
}

async fn extract_pdf(path: &Path, password: Option<&str>) -> Result<Vec<String>, DocTranslateError> {
    let path = path.to_path_buf();
    let password = password.map(str::to_string);

    tokio::task::spawn_blocking(move || extract_pdf_blocking(&path, password.as_deref()))
        .await
        .map_err(|e| DocTranslateError::Internal(format!("Extraction task panicked: {}", e)))?
}

fn extract_pdf_blocking(path: &Path, password: Option<&str>) -> Result<Vec<String>, DocTranslateError> {
    let pdfium = bind_pdfium()?;
    let document = pdfium
        .load_pdf_from_file(path, password)
        .map_err(|e| map_load_error(path, password, e))?;

    let pages = document.pages();
    let total = pages.len() as usize;
    info!("PDF loaded: {} pages", total);

    let mut texts = Vec::with_capacity(total);
    for (idx, page) in pages.iter().enumerate() {
        let text = page
            .text()
            .map_err(|e| DocTranslateError::ExtractionFailed {
                page: idx + 1,
                detail: format!("{:?}", e),
            })?
            .all();
        debug!("Page {}: {} chars", idx + 1, text.chars().count());
        texts.push(text);
    }
    Ok(texts)
}

// ── docx ─────────────────────────────────────────────────────────────────────

async fn extract_docx(path: &Path) -> Result<String, DocTranslateError> {
    let bytes = tokio::fs::read(path).await.map_err(|e| DocTranslateError::DocxReadFailed {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;
    docx_text(&bytes).map_err(|detail| DocTranslateError::DocxReadFailed {
        path: path.to_path_buf(),
        detail,
    })
}

/// Body paragraphs of a `.docx` archive, joined with `\n`.
pub fn docx_text(bytes: &[u8]) -> Result<String, String> {
    Ok(docx_paragraphs(bytes)?.join("\n"))
}

/// Text of each top-level body paragraph, in order. Tables are not read.
pub fn docx_paragraphs(bytes: &[u8]) -> Result<Vec<String>, String> {
    let docx = docx_rs::read_docx(bytes).map_err(|e| format!("{e:?}"))?;
    Ok(docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(p) => Some(paragraph_text(&p.children)),
            _ => None,
        })
        .collect())
}

fn paragraph_text(children: &[ParagraphChild]) -> String {
    let mut out = String::new();
    for child in children {
        match child {
            ParagraphChild::Run(run) => {
                for rc in &run.children {
                    match rc {
                        RunChild::Text(t) => out.push_str(&t.text),
                        RunChild::Tab(_) => out.push('\t'),
                        RunChild::Break(_) => out.push('\n'),
                        _ => {}
                    }
                }
            }
            ParagraphChild::Hyperlink(link) => out.push_str(&paragraph_text(&link.children)),
            _ => {}
        }
    }
    out
}

// ── legacy doc ───────────────────────────────────────────────────────────────

async fn extract_doc(path: &Path, converter: &dyn DocConverter) -> Result<String, DocTranslateError> {
    // Converted output is removed with the directory on every exit path.
    let work_dir = TempDir::new().map_err(|e| DocTranslateError::Internal(format!("tempdir: {e}")))?;
    let docx_path = converter.convert_to_docx(path, work_dir.path()).await?;
    debug!("{} wrote {}", converter.name(), docx_path.display());

    let bytes = tokio::fs::read(&docx_path)
        .await
        .map_err(|e| DocTranslateError::LegacyConversionFailed {
            path: path.to_path_buf(),
            converter: converter.name().to_string(),
            detail: e.to_string(),
        })?;
    docx_text(&bytes).map_err(|detail| DocTranslateError::DocxReadFailed {
        path: path.to_path_buf(),
        detail,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::input::{resolve_local, stage_bytes};
    use async_trait::async_trait;
    use docx_rs::{Docx, Paragraph, Run};
    use std::io::Cursor;
    use std::sync::Arc;

    fn build_docx(paragraphs: &[&str]) -> Vec<u8> {
        let mut docx = Docx::new();
        for p in paragraphs {
            docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(*p)));
        }
        let mut buf = Cursor::new(Vec::new());
        docx.build().pack(&mut buf).unwrap();
        buf.into_inner()
    }

    /// Writes a fixed DOCX instead of running an external tool.
    struct FixtureConverter(Vec<u8>);

    #[async_trait]
    impl DocConverter for FixtureConverter {
        fn name(&self) -> &str {
            "fixture"
        }

        async fn convert_to_docx(&self, path: &Path, out_dir: &Path) -> Result<PathBuf, DocTranslateError> {
            let target = out_dir.join("converted.docx");
            assert!(path.exists());
            tokio::fs::write(&target, &self.0).await.unwrap();
            Ok(target)
        }
    }

    #[test]
    fn docx_paragraphs_in_order() {
        let bytes = build_docx(&["Olá mundo", "", "Segunda linha"]);
        assert_eq!(
            docx_paragraphs(&bytes).unwrap(),
            vec!["Olá mundo", "", "Segunda linha"]
        );
        assert_eq!(docx_text(&bytes).unwrap(), "Olá mundo\n\nSegunda linha");
    }

    #[test]
    fn multi_run_paragraph_is_concatenated() {
        let docx = Docx::new().add_paragraph(
            Paragraph::new()
                .add_run(Run::new().add_text("Bon"))
                .add_run(Run::new().add_text("jour")),
        );
        let mut buf = Cursor::new(Vec::new());
        docx.build().pack(&mut buf).unwrap();
        assert_eq!(docx_text(&buf.into_inner()).unwrap(), "Bonjour");
    }

    #[test]
    fn garbage_is_not_a_docx() {
        assert!(docx_paragraphs(b"definitely not a zip").is_err());
    }

    #[tokio::test]
    async fn docx_is_a_single_page() {
        let staged = stage_bytes("carta.docx", &build_docx(&["Bonjour", "Au revoir"]))
            .await
            .unwrap();
        let doc = extract(&staged, &TranslationConfig::default()).await.unwrap();
        assert_eq!(doc.format, SourceFormat::Docx);
        assert_eq!(doc.file_name, "carta.docx");
        assert_eq!(doc.pages, vec!["Bonjour\nAu revoir".to_string()]);
    }

    #[tokio::test]
    async fn docx_empty_paragraphs_are_kept() {
        let staged = stage_bytes("espacos.docx", &build_docx(&["Topo", "", "", "", "", "Base"]))
            .await
            .unwrap();
        let doc = extract(&staged, &TranslationConfig::default()).await.unwrap();
        assert_eq!(doc.pages, vec!["Topo\n\n\n\n\nBase".to_string()]);
    }

    #[tokio::test]
    async fn corrupt_docx_is_read_error() {
        let staged = stage_bytes("broken.docx", b"PK\x03\x04 truncated").await.unwrap();
        let err = extract(&staged, &TranslationConfig::default()).await.unwrap_err();
        assert!(matches!(err, DocTranslateError::DocxReadFailed { .. }));
    }

    #[tokio::test]
    async fn doc_goes_through_converter() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("antigo.doc");
        std::fs::write(&path, b"\xD0\xCF\x11\xE0").unwrap();

        let config = TranslationConfig::builder()
            .doc_converter(Arc::new(FixtureConverter(build_docx(&["Texto antigo"]))))
            .build()
            .unwrap();
        let input = resolve_local(&path).unwrap();
        let doc = extract(&input, &config).await.unwrap();
        assert_eq!(doc.format, SourceFormat::Doc);
        assert_eq!(doc.pages, vec!["Texto antigo".to_string()]);
    }
}
