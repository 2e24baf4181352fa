//! Progress-callback trait for per-file and per-page translation events.
//!
//! Inject an [`Arc<dyn TranslationProgressCallback>`] via
//! [`crate::config::TranslationConfigBuilder::progress_callback`] to receive
//! events as the batch driver works through each file.
//!
//! Files, pages, and chunks are processed strictly one after another, so
//! events arrive in order: `on_file_start` for file *n* always follows
//! `on_file_complete` / `on_file_error` for file *n − 1*.
//!
//! # Example
//!
//! ```rust
//! use edgequake_doctranslate::{TranslationConfig, TranslationProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct PageCounter {
//!     pages: AtomicUsize,
//! }
//!
//! impl TranslationProgressCallback for PageCounter {
//!     fn on_page_translated(&self, file_name: &str, page_num: usize, total_pages: usize, _chars: usize) {
//!         self.pages.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{file_name}: page {page_num}/{total_pages}");
//!     }
//! }
//!
//! let counter = Arc::new(PageCounter { pages: AtomicUsize::new(0) });
//!
//! let config = TranslationConfig::builder()
//!     .progress_callback(counter as Arc<dyn TranslationProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the batch driver as it processes each file and page.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. `Send + Sync` lets the callback live inside a
/// [`crate::config::TranslationConfig`] shared with blocking tasks.
pub trait TranslationProgressCallback: Send + Sync {
    /// Called once before the first file is opened.
    fn on_batch_start(&self, total_files: usize) {
        let _ = total_files;
    }

    /// Called before a file is extracted.
    ///
    /// # Arguments
    /// * `index`       — 1-indexed position of the file in the batch
    /// * `total_files` — files in the batch
    /// * `file_name`   — original file name
    fn on_file_start(&self, index: usize, total_files: usize, file_name: &str) {
        let _ = (index, total_files, file_name);
    }

    /// Called when every chunk of a page has been translated.
    ///
    /// # Arguments
    /// * `page_num`    — 1-indexed page number
    /// * `total_pages` — pages in the document
    /// * `chars`       — character count of the translated page
    fn on_page_translated(&self, file_name: &str, page_num: usize, total_pages: usize, chars: usize) {
        let _ = (file_name, page_num, total_pages, chars);
    }

    /// Called when a file has been translated and composed.
    fn on_file_complete(&self, index: usize, total_files: usize, file_name: &str, output_name: &str) {
        let _ = (index, total_files, file_name, output_name);
    }

    /// Called when a file is skipped or aborted.
    fn on_file_error(&self, index: usize, total_files: usize, file_name: &str, error: &str) {
        let _ = (index, total_files, file_name, error);
    }

    /// Called once after all files have been attempted.
    fn on_batch_complete(&self, total_files: usize, succeeded: usize) {
        let _ = (total_files, succeeded);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl TranslationProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::TranslationConfig`].
pub type ProgressCallback = Arc<dyn TranslationProgressCallback>;
