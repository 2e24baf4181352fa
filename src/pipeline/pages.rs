//! Page pipeline: segment each page, translate the chunks in order, and
//! reassemble one translated string per page.
//!
//! Work is strictly sequential. A page is finished before the next one
//! starts and a chunk's translation is awaited before the next chunk is
//! sent, so the reassembled text is always in source order.

use crate::document::{Document, TranslatedDocument};
use crate::error::DocTranslateError;
use crate::pipeline::segment::split_text;
use crate::pipeline::translator::TranslatorAdapter;
use crate::progress::ProgressCallback;
use tracing::debug;

/// Translate one page.
///
/// Each translated chunk is followed by `"\n"`; trailing whitespace of the
/// accumulated result is trimmed. `page_num` is 1-indexed and only used to
/// locate a failure.
pub async fn translate_page(
    adapter: &TranslatorAdapter,
    text: &str,
    chunk_max_chars: usize,
    page_num: usize,
) -> Result<String, DocTranslateError> {
    let chunks = split_text(text, chunk_max_chars);
    debug!("Page {}: {} chunk(s)", page_num, chunks.len());

    let mut out = String::with_capacity(text.len() + chunks.len());
    for (idx, chunk) in chunks.iter().enumerate() {
        let translated = adapter
            .translate(chunk)
            .await
            .map_err(|source| DocTranslateError::Translation {
                page: page_num,
                chunk: idx + 1,
                source,
            })?;
        out.push_str(&translated);
        out.push('\n');
    }

    out.truncate(out.trim_end().len());
    Ok(out)
}

/// Translate every page of `doc`, preserving page count and order.
///
/// The first failing chunk aborts the whole document.
pub async fn translate_document(
    adapter: &TranslatorAdapter,
    doc: &Document,
    chunk_max_chars: usize,
    progress: Option<&ProgressCallback>,
) -> Result<TranslatedDocument, DocTranslateError> {
    let total = doc.page_count();
    let mut pages = Vec::with_capacity(total);

    for (idx, text) in doc.pages.iter().enumerate() {
        let page_num = idx + 1;
        let translated = translate_page(adapter, text, chunk_max_chars, page_num).await?;
        if let Some(cb) = progress {
            cb.on_page_translated(&doc.file_name, page_num, total, translated.chars().count());
        }
        pages.push(translated);
    }

    Ok(TranslatedDocument {
        source_name: doc.file_name.clone(),
        source_format: doc.format,
        pages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TargetLanguage;
    use crate::document::SourceFormat;
    use crate::error::TranslateError;
    use crate::pipeline::mock::MockTranslator;
    use crate::progress::TranslationProgressCallback;
    use std::sync::{Arc, Mutex};

    fn adapter(mock: Arc<MockTranslator>) -> TranslatorAdapter {
        TranslatorAdapter::new(mock, TargetLanguage::En)
    }

    #[tokio::test]
    async fn uppercases_pages_in_order() {
        let doc = Document::new(
            "lettre.pdf",
            SourceFormat::Pdf,
            vec!["Bonjour".into(), "Au revoir".into()],
        );
        let out = translate_document(&adapter(Arc::new(MockTranslator::uppercase())), &doc, 5000, None)
            .await
            .unwrap();
        assert_eq!(out.pages, vec!["BONJOUR", "AU REVOIR"]);
        assert_eq!(out.source_name, "lettre.pdf");
        assert_eq!(out.source_format, SourceFormat::Pdf);
    }

    #[tokio::test]
    async fn chunks_are_sent_in_order_and_joined_with_newlines() {
        let mock = Arc::new(MockTranslator::identity());
        let out = translate_page(&adapter(mock.clone()), "hello\nworld", 5, 1).await.unwrap();
        assert_eq!(mock.inputs(), vec!["hello", "\nworld"]);
        // "hello" + "\n" + "\nworld" + "\n", trailing whitespace trimmed
        assert_eq!(out, "hello\n\nworld");
    }

    #[tokio::test]
    async fn hard_cut_chunks_are_separated() {
        let mock = Arc::new(MockTranslator::identity());
        let out = translate_page(&adapter(mock.clone()), "abcdefghijkl", 5, 1).await.unwrap();
        assert_eq!(mock.calls(), 3);
        assert_eq!(out, "abcde\nfghij\nkl");
    }

    #[tokio::test]
    async fn empty_pages_are_kept() {
        let mock = Arc::new(MockTranslator::uppercase());
        let doc = Document::new(
            "a.pdf",
            SourceFormat::Pdf,
            vec!["um".into(), "".into(), "  \n".into(), "dois".into()],
        );
        let out = translate_document(&adapter(mock.clone()), &doc, 5000, None).await.unwrap();
        assert_eq!(out.pages, vec!["UM", "", "", "DOIS"]);
        // Blank pages never reach the backend.
        assert_eq!(mock.calls(), 2);
    }

    #[tokio::test]
    async fn failure_reports_page_and_chunk() {
        let mock = Arc::new(MockTranslator::failing_after(3));
        let doc = Document::new(
            "a.pdf",
            SourceFormat::Pdf,
            vec!["one".into(), "aaaa\nbbbb\ncccc".into()],
        );
        // Page 1: one call. Page 2: chunks "aaaa", "\nbbbb", "\ncccc" → third fails.
        let err = translate_document(&adapter(mock), &doc, 5, None).await.unwrap_err();
        match err {
            DocTranslateError::Translation { page, chunk, source } => {
                assert_eq!(page, 2);
                assert_eq!(chunk, 3);
                assert!(matches!(source, TranslateError::Status { status: 503, .. }));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<(usize, usize, usize)>>,
    }

    impl TranslationProgressCallback for Recorder {
        fn on_page_translated(&self, _file_name: &str, page_num: usize, total_pages: usize, chars: usize) {
            self.events.lock().unwrap().push((page_num, total_pages, chars));
        }
    }

    #[tokio::test]
    async fn page_events_follow_page_order() {
        let recorder = Arc::new(Recorder::default());
        let cb: ProgressCallback = recorder.clone();
        let doc = Document::new("a.docx", SourceFormat::Docx, vec!["ab".into(), "cde".into()]);
        translate_document(&adapter(Arc::new(MockTranslator::identity())), &doc, 10, Some(&cb))
            .await
            .unwrap();
        assert_eq!(*recorder.events.lock().unwrap(), vec![(1, 2, 2), (2, 2, 3)]);
    }
}
