//! Translator abstraction: one `translate(text, lang) -> text` seam between
//! the page pipeline and whatever service does the actual translating.
//!
//! Backends implement [`Translator`]. The page pipeline never talks to a
//! backend directly; it goes through a [`TranslatorAdapter`], which fixes the
//! target language once per batch (the source language is always
//! auto-detected by the service) and skips the network for blank input.
//!
//! Backend errors are returned unchanged. There is no retry here: the
//! caller decides whether a failure aborts the file.

use crate::config::{TargetLanguage, TranslationConfig, TranslatorBackend};
use crate::error::{DocTranslateError, TranslateError};
use crate::pipeline::google::GoogleTranslator;
use crate::pipeline::llm::LlmTranslator;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

/// A remote text-translation capability.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Short backend name used in logs and error messages.
    fn name(&self) -> &str;

    /// Translate `text` from an auto-detected language into `target`.
    async fn translate(&self, text: &str, target: TargetLanguage) -> Result<String, TranslateError>;
}

/// A [`Translator`] bound to a single target language.
#[derive(Clone)]
pub struct TranslatorAdapter {
    inner: Arc<dyn Translator>,
    target: TargetLanguage,
}

impl TranslatorAdapter {
    pub fn new(inner: Arc<dyn Translator>, target: TargetLanguage) -> Self {
        Self { inner, target }
    }

    pub fn target(&self) -> TargetLanguage {
        self.target
    }

    pub fn backend_name(&self) -> &str {
        self.inner.name()
    }

    /// Translate one chunk into the bound target language.
    ///
    /// Whitespace-only input is returned as-is without a remote call.
    pub async fn translate(&self, text: &str) -> Result<String, TranslateError> {
        if text.trim().is_empty() {
            return Ok(text.to_string());
        }
        debug!(
            "{}: translating {} chars → {}",
            self.inner.name(),
            text.chars().count(),
            self.target
        );
        self.inner.translate(text, self.target).await
    }
}

impl std::fmt::Debug for TranslatorAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslatorAdapter")
            .field("backend", &self.inner.name())
            .field("target", &self.target)
            .finish()
    }
}

/// Resolve the translator for a batch, from most-specific to least-specific.
///
/// 1. **Pre-built translator** (`config.translator`) — used as-is. This is
///    how tests inject deterministic fakes.
/// 2. **Backend selector** (`config.backend`) — build the Google client or
///    the LLM translator from the remaining config fields.
pub fn resolve_translator(config: &TranslationConfig) -> Result<Arc<dyn Translator>, DocTranslateError> {
    if let Some(ref translator) = config.translator {
        return Ok(Arc::clone(translator));
    }

    let translator: Arc<dyn Translator> = match config.backend {
        TranslatorBackend::Google => Arc::new(
            GoogleTranslator::new(&config.google_endpoint, config.api_timeout_secs)
                .map_err(|e| DocTranslateError::InvalidConfig(e.to_string()))?,
        ),
        TranslatorBackend::Llm => Arc::new(
            LlmTranslator::from_config(config)
                .map_err(|e| DocTranslateError::InvalidConfig(e.to_string()))?,
        ),
    };
    info!("Using translator backend: {}", translator.name());
    Ok(translator)
}

/// Build the adapter for a batch.
pub fn adapter_for(config: &TranslationConfig) -> Result<TranslatorAdapter, DocTranslateError> {
    Ok(TranslatorAdapter::new(
        resolve_translator(config)?,
        config.target_language,
    ))
}
