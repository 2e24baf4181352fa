//! Output composition: render translated pages as a new DOCX or PDF.
//!
//! - **DOCX** — one paragraph per line of every page, in order, with no page
//!   breaks between source pages.
//! - **PDF** — every page is re-split into chunks of at most
//!   `pdf_chunk_max_chars` characters and each chunk gets its own A4 page.
//!   Lines are drawn from a fixed top-left offset without wrapping; a line
//!   wider than the page runs off its right edge.
//!
//! PDF layout ([`layout_pdf`]) is computed separately from rendering so it
//! can be checked without the native pdfium library.

use crate::config::{OutputFormat, TranslationConfig};
use crate::document::translated_file_name;
use crate::error::DocTranslateError;
use crate::output::ComposedOutput;
use crate::pipeline::extract::bind_pdfium;
use crate::pipeline::segment::split_text;
use docx_rs::{Docx, Paragraph, Run};
use pdfium_render::prelude::*;
use std::io::Cursor;
use tracing::{debug, info};

/// A4 width in points.
pub const PAGE_WIDTH_PT: f32 = 595.0;
/// A4 height in points.
pub const PAGE_HEIGHT_PT: f32 = 842.0;
/// Distance of the first baseline from the left and top edges.
pub const TEXT_OFFSET_PT: f32 = 72.0;
pub const FONT_SIZE_PT: f32 = 11.0;
pub const LINE_HEIGHT: f32 = 1.2;

/// One line of text at an absolute position, in PDF user space
/// (origin bottom-left).
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub x: f32,
    pub y: f32,
    pub text: String,
}

/// Everything drawn on one output PDF page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    pub lines: Vec<TextLine>,
}

/// Compose the translated pages in `format`.
pub async fn compose(
    pages: &[String],
    original_name: &str,
    format: OutputFormat,
    config: &TranslationConfig,
) -> Result<ComposedOutput, DocTranslateError> {
    match format {
        OutputFormat::Docx => compose_docx(pages, original_name),
        OutputFormat::Pdf => compose_pdf(pages, original_name, config.pdf_chunk_max_chars).await,
    }
}

// ── DOCX ─────────────────────────────────────────────────────────────────────

/// Build a DOCX with one paragraph per line, pages concatenated.
pub fn compose_docx(pages: &[String], original_name: &str) -> Result<ComposedOutput, DocTranslateError> {
    let mut docx = Docx::new();
    let mut paragraphs = 0usize;
    for page in pages {
        for line in page.split('\n') {
            docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(line)));
            paragraphs += 1;
        }
    }

    let mut buf = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buf)
        .map_err(|e| DocTranslateError::ComposeFailed {
            format: OutputFormat::Docx.to_string(),
            detail: e.to_string(),
        })?;

    let bytes = buf.into_inner();
    info!("Composed DOCX: {} paragraphs, {} bytes", paragraphs, bytes.len());
    Ok(ComposedOutput {
        bytes,
        file_name: translated_file_name(original_name, OutputFormat::Docx),
        format: OutputFormat::Docx,
    })
}

// ── PDF ──────────────────────────────────────────────────────────────────────

/// Lay out translated pages as fixed-position PDF pages.
///
/// Each source page yields at least one output page, even when empty; an
/// empty page list yields none. The line break a chunk carries over from the
/// previous cut is not drawn, so every output page starts at the top offset.
pub fn layout_pdf(pages: &[String], pdf_chunk_max_chars: usize) -> Vec<PageLayout> {
    let advance = FONT_SIZE_PT * LINE_HEIGHT;
    let top = PAGE_HEIGHT_PT - TEXT_OFFSET_PT;

    pages
        .iter()
        .flat_map(|page| {
            split_text(page, pdf_chunk_max_chars)
                .into_iter()
                .enumerate()
                .map(|(i, chunk)| {
                    if i > 0 && chunk.starts_with('\n') {
                        chunk[1..].to_string()
                    } else {
                        chunk
                    }
                })
        })
        .map(|chunk| PageLayout {
            lines: chunk
                .split('\n')
                .enumerate()
                .filter(|(_, line)| !line.trim().is_empty())
                .map(|(i, line)| TextLine {
                    x: TEXT_OFFSET_PT,
                    y: top - i as f32 * advance,
                    text: line.to_string(),
                })
                .collect(),
        })
        .collect()
}

/// Build a PDF from the translated pages.
///
/// A document with no pages gets a single blank page so every reader can
/// open it.
pub async fn compose_pdf(
    pages: &[String],
    original_name: &str,
    pdf_chunk_max_chars: usize,
) -> Result<ComposedOutput, DocTranslateError> {
    let mut layouts = layout_pdf(pages, pdf_chunk_max_chars);
    if layouts.is_empty() {
        layouts.push(PageLayout::default());
    }
    let page_count = layouts.len();

    let bytes = tokio::task::spawn_blocking(move || render_pdf_blocking(&layouts))
        .await
        .map_err(|e| DocTranslateError::Internal(format!("Compose task panicked: {}", e)))??;

    info!("Composed PDF: {} pages, {} bytes", page_count, bytes.len());
    Ok(ComposedOutput {
        bytes,
        file_name: translated_file_name(original_name, OutputFormat::Pdf),
        format: OutputFormat::Pdf,
    })
}

fn render_pdf_blocking(layouts: &[PageLayout]) -> Result<Vec<u8>, DocTranslateError> {
    let pdf_err = |e: PdfiumError| DocTranslateError::ComposeFailed {
        format: OutputFormat::Pdf.to_string(),
        detail: format!("{:?}", e),
    };

    let pdfium = bind_pdfium()?;
    let mut document = pdfium.create_new_pdf().map_err(pdf_err)?;
    let font = document.fonts_mut().helvetica();

    for (idx, layout) in layouts.iter().enumerate() {
        let mut page = document
            .pages_mut()
            .create_page_at_end(PdfPagePaperSize::a4())
            .map_err(pdf_err)?;
        for line in &layout.lines {
            page.objects_mut()
                .create_text_object(
                    PdfPoints::new(line.x),
                    PdfPoints::new(line.y),
                    &line.text,
                    font,
                    PdfPoints::new(FONT_SIZE_PT),
                )
                .map_err(pdf_err)?;
        }
        debug!("Drew output page {}: {} lines", idx + 1, layout.lines.len());
    }

    document.save_to_bytes().map_err(pdf_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::extract::docx_paragraphs;

    #[test]
    fn docx_has_one_paragraph_per_line() {
        let pages = vec!["BONJOUR\nMONDE".to_string(), "AU REVOIR".to_string()];
        let out = compose_docx(&pages, "lettre.pdf").unwrap();
        assert_eq!(out.file_name, "lettre_translated.docx");
        assert_eq!(
            out.mime_type(),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        );
        assert_eq!(
            docx_paragraphs(&out.bytes).unwrap(),
            vec!["BONJOUR", "MONDE", "AU REVOIR"]
        );
    }

    #[test]
    fn empty_docx_is_valid() {
        let out = compose_docx(&[], "vazio.docx").unwrap();
        assert!(!out.is_empty());
        assert!(docx_paragraphs(&out.bytes).unwrap().is_empty());
        assert_eq!(out.file_name, "vazio_translated.docx");
    }

    #[test]
    fn layout_one_output_page_per_chunk() {
        let pages = vec!["a".repeat(2500), String::new(), "fim".to_string()];
        let layouts = layout_pdf(&pages, 1000);
        // 2500 chars → 3 chunks, empty page → 1, "fim" → 1
        assert_eq!(layouts.len(), 5);
        assert!(layouts[3].lines.is_empty());
        assert_eq!(layouts[4].lines[0].text, "fim");
    }

    #[test]
    fn layout_lines_start_at_offset_and_descend() {
        let layouts = layout_pdf(&["um\ndois\n\nquatro".to_string()], 1000);
        let lines = &layouts[0].lines;
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].x, TEXT_OFFSET_PT);
        assert_eq!(lines[0].y, PAGE_HEIGHT_PT - TEXT_OFFSET_PT);
        assert_eq!(lines[1].text, "dois");
        assert!(lines[1].y < lines[0].y);
        // Blank line keeps its slot.
        let advance = FONT_SIZE_PT * LINE_HEIGHT;
        assert!((lines[2].y - (lines[0].y - 3.0 * advance)).abs() < 1e-3);
        assert_eq!(lines[2].text, "quatro");
    }

    #[test]
    fn continuation_page_starts_at_top_offset() {
        let layouts = layout_pdf(&["primeira\nsegunda".to_string()], 10);
        assert_eq!(layouts.len(), 2);
        let top = PAGE_HEIGHT_PT - TEXT_OFFSET_PT;
        assert_eq!(layouts[0].lines[0].text, "primeira");
        assert_eq!(layouts[1].lines.len(), 1);
        assert_eq!(layouts[1].lines[0].text, "segunda");
        assert_eq!(layouts[1].lines[0].y, top);
    }

    #[test]
    fn leading_break_of_first_chunk_is_kept() {
        let layouts = layout_pdf(&["\ntexto".to_string()], 1000);
        let advance = FONT_SIZE_PT * LINE_HEIGHT;
        assert_eq!(layouts[0].lines[0].text, "texto");
        assert!((layouts[0].lines[0].y - (PAGE_HEIGHT_PT - TEXT_OFFSET_PT - advance)).abs() < 1e-3);
    }

    #[test]
    fn layout_of_nothing_is_empty() {
        assert!(layout_pdf(&[], 1000).is_empty());
    }
}
