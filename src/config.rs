//! Configuration types for document translation.
//!
//! All translation behaviour is controlled through [`TranslationConfig`],
//! built via its [`TranslationConfigBuilder`]. One struct holds every knob so
//! a batch can be described, logged, and replayed as a single value.

use crate::error::DocTranslateError;
use crate::pipeline::legacy::{ConverterKind, DocConverter};
use crate::pipeline::translator::Translator;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Default upper bound on characters sent in one translation call.
///
/// The public Google endpoint rejects payloads above 5 000 characters.
pub const DEFAULT_CHUNK_MAX_CHARS: usize = 5000;

/// Default upper bound on characters drawn on one output PDF page.
pub const DEFAULT_PDF_CHUNK_MAX_CHARS: usize = 1000;

/// Default Google web-translation endpoint.
pub const DEFAULT_GOOGLE_ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";

/// Configuration for a translation batch.
///
/// Built via [`TranslationConfig::builder()`] or using
/// [`TranslationConfig::default()`].
///
/// # Example
/// ```rust
/// use edgequake_doctranslate::{OutputFormat, TargetLanguage, TranslationConfig};
///
/// let config = TranslationConfig::builder()
///     .target_language(TargetLanguage::Fr)
///     .output_format(OutputFormat::Docx)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct TranslationConfig {
    /// Language every document is translated into. Default: English.
    pub target_language: TargetLanguage,

    /// Format of the emitted documents. Default: PDF.
    pub output_format: OutputFormat,

    /// Which translation service to call. Default: [`TranslatorBackend::Google`].
    pub backend: TranslatorBackend,

    /// Pre-constructed translator. Takes precedence over `backend`.
    pub translator: Option<Arc<dyn Translator>>,

    /// LLM provider name for the LLM backend (e.g. "openai", "ollama").
    pub provider_name: Option<String>,

    /// LLM model identifier for the LLM backend.
    pub model: Option<String>,

    /// Sampling temperature for the LLM backend. Default: 0.1.
    pub temperature: f32,

    /// Maximum tokens the LLM may generate per chunk. Default: 4096.
    ///
    /// A 5 000-character chunk translates to roughly 1 500–2 500 tokens
    /// depending on the language pair.
    pub max_tokens: usize,

    /// Custom system prompt for the LLM backend. If None, uses built-in default.
    pub system_prompt: Option<String>,

    /// Google-compatible endpoint URL. Default: [`DEFAULT_GOOGLE_ENDPOINT`].
    pub google_endpoint: String,

    /// Maximum characters per translation call. Default: 5000.
    pub chunk_max_chars: usize,

    /// Maximum characters per output PDF page. Default: 1000.
    pub pdf_chunk_max_chars: usize,

    /// Per-translation-call timeout in seconds. Default: 60.
    pub api_timeout_secs: u64,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Which external tool converts legacy `.doc` files. Default: auto.
    pub converter: ConverterKind,

    /// Pre-constructed `.doc` converter. Takes precedence over `converter`.
    pub doc_converter: Option<Arc<dyn DocConverter>>,

    /// Receives per-file and per-page events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            target_language: TargetLanguage::default(),
            output_format: OutputFormat::default(),
            backend: TranslatorBackend::default(),
            translator: None,
            provider_name: None,
            model: None,
            temperature: 0.1,
            max_tokens: 4096,
            system_prompt: None,
            google_endpoint: DEFAULT_GOOGLE_ENDPOINT.to_string(),
            chunk_max_chars: DEFAULT_CHUNK_MAX_CHARS,
            pdf_chunk_max_chars: DEFAULT_PDF_CHUNK_MAX_CHARS,
            api_timeout_secs: 60,
            password: None,
            converter: ConverterKind::default(),
            doc_converter: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for TranslationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranslationConfig")
            .field("target_language", &self.target_language)
            .field("output_format", &self.output_format)
            .field("backend", &self.backend)
            .field("translator", &self.translator.as_ref().map(|t| t.name().to_string()))
            .field("provider_name", &self.provider_name)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("google_endpoint", &self.google_endpoint)
            .field("chunk_max_chars", &self.chunk_max_chars)
            .field("pdf_chunk_max_chars", &self.pdf_chunk_max_chars)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("converter", &self.converter)
            .field("doc_converter", &self.doc_converter.as_ref().map(|c| c.name().to_string()))
            .field("progress_callback", &self.progress_callback.as_ref().map(|_| "<callback>"))
            .finish()
    }
}

impl TranslationConfig {
    /// Create a new builder for `TranslationConfig`.
    pub fn builder() -> TranslationConfigBuilder {
        TranslationConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`TranslationConfig`].
#[derive(Debug)]
pub struct TranslationConfigBuilder {
    config: TranslationConfig,
}

impl TranslationConfigBuilder {
    pub fn target_language(mut self, lang: TargetLanguage) -> Self {
        self.config.target_language = lang;
        self
    }

    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.config.output_format = format;
        self
    }

    pub fn backend(mut self, backend: TranslatorBackend) -> Self {
        self.config.backend = backend;
        self
    }

    pub fn translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.config.translator = Some(translator);
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = Some(name.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = Some(model.into());
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    pub fn google_endpoint(mut self, url: impl Into<String>) -> Self {
        self.config.google_endpoint = url.into();
        self
    }

    pub fn chunk_max_chars(mut self, n: usize) -> Self {
        self.config.chunk_max_chars = n;
        self
    }

    pub fn pdf_chunk_max_chars(mut self, n: usize) -> Self {
        self.config.pdf_chunk_max_chars = n;
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs;
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn converter(mut self, kind: ConverterKind) -> Self {
        self.config.converter = kind;
        self
    }

    pub fn doc_converter(mut self, converter: Arc<dyn DocConverter>) -> Self {
        self.config.doc_converter = Some(converter);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<TranslationConfig, DocTranslateError> {
        let c = &self.config;
        if c.chunk_max_chars == 0 {
            return Err(DocTranslateError::InvalidConfig(
                "Chunk size must be ≥ 1 character".into(),
            ));
        }
        if c.pdf_chunk_max_chars == 0 {
            return Err(DocTranslateError::InvalidConfig(
                "PDF page chunk size must be ≥ 1 character".into(),
            ));
        }
        if c.api_timeout_secs == 0 {
            return Err(DocTranslateError::InvalidConfig(
                "API timeout must be ≥ 1 second".into(),
            ));
        }
        if c.backend == TranslatorBackend::Google
            && c.translator.is_none()
            && !(c.google_endpoint.starts_with("http://") || c.google_endpoint.starts_with("https://"))
        {
            return Err(DocTranslateError::InvalidConfig(format!(
                "Google endpoint must be an HTTP/HTTPS URL, got '{}'",
                c.google_endpoint
            )));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Languages a document can be translated into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetLanguage {
    /// Portuguese
    Pt,
    /// English (default)
    #[default]
    En,
    /// Spanish
    Es,
    /// French
    Fr,
    /// German
    De,
}

impl TargetLanguage {
    /// Every supported target, in menu order.
    pub const ALL: [TargetLanguage; 5] = [
        TargetLanguage::Pt,
        TargetLanguage::En,
        TargetLanguage::Es,
        TargetLanguage::Fr,
        TargetLanguage::De,
    ];

    /// ISO 639-1 code sent to the translation service.
    pub fn code(self) -> &'static str {
        match self {
            TargetLanguage::Pt => "pt",
            TargetLanguage::En => "en",
            TargetLanguage::Es => "es",
            TargetLanguage::Fr => "fr",
            TargetLanguage::De => "de",
        }
    }

    /// English name, used in LLM prompts.
    pub fn english_name(self) -> &'static str {
        match self {
            TargetLanguage::Pt => "Portuguese",
            TargetLanguage::En => "English",
            TargetLanguage::Es => "Spanish",
            TargetLanguage::Fr => "French",
            TargetLanguage::De => "German",
        }
    }
}

impl fmt::Display for TargetLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for TargetLanguage {
    type Err = DocTranslateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_lowercase();
        TargetLanguage::ALL
            .into_iter()
            .find(|l| l.code() == code)
            .ok_or_else(|| {
                DocTranslateError::InvalidConfig(format!(
                    "Unsupported target language '{}' (expected one of pt, en, es, fr, de)",
                    s
                ))
            })
    }
}

/// Format of the emitted translated document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Fixed-position text pages. (default)
    #[default]
    Pdf,
    /// Flowed paragraphs.
    Docx,
}

impl OutputFormat {
    /// File extension without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Pdf => "pdf",
            OutputFormat::Docx => "docx",
        }
    }

    /// MIME type of the emitted bytes.
    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Pdf => "application/pdf",
            OutputFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Pdf => f.write_str("PDF"),
            OutputFormat::Docx => f.write_str("DOCX"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = DocTranslateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pdf" => Ok(OutputFormat::Pdf),
            "docx" => Ok(OutputFormat::Docx),
            other => Err(DocTranslateError::InvalidConfig(format!(
                "Unsupported output format '{}' (expected PDF or DOCX)",
                other
            ))),
        }
    }
}

/// Which translation service a batch talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslatorBackend {
    /// Google web translation endpoint, source language auto-detected. (default)
    #[default]
    Google,
    /// A chat model reached through edgequake-llm.
    Llm,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let c = TranslationConfig::default();
        assert_eq!(c.chunk_max_chars, 5000);
        assert_eq!(c.pdf_chunk_max_chars, 1000);
        assert_eq!(c.target_language, TargetLanguage::En);
        assert_eq!(c.output_format, OutputFormat::Pdf);
        assert_eq!(c.backend, TranslatorBackend::Google);
        assert_eq!(c.converter, ConverterKind::Auto);
    }

    #[test]
    fn builder_rejects_zero_chunk_size() {
        let err = TranslationConfig::builder().chunk_max_chars(0).build();
        assert!(matches!(err, Err(DocTranslateError::InvalidConfig(_))));

        let err = TranslationConfig::builder().pdf_chunk_max_chars(0).build();
        assert!(matches!(err, Err(DocTranslateError::InvalidConfig(_))));
    }

    #[test]
    fn builder_rejects_non_http_endpoint() {
        let err = TranslationConfig::builder()
            .google_endpoint("ftp://example.org")
            .build();
        assert!(matches!(err, Err(DocTranslateError::InvalidConfig(_))));
    }

    #[test]
    fn builder_clamps_temperature() {
        let c = TranslationConfig::builder().temperature(9.0).build().unwrap();
        assert_eq!(c.temperature, 2.0);
    }

    #[test]
    fn target_language_parses_codes() {
        assert_eq!("pt".parse::<TargetLanguage>().unwrap(), TargetLanguage::Pt);
        assert_eq!(" DE ".parse::<TargetLanguage>().unwrap(), TargetLanguage::De);
        assert!("it".parse::<TargetLanguage>().is_err());
        assert_eq!(TargetLanguage::Es.to_string(), "es");
    }

    #[test]
    fn output_format_extension_and_mime() {
        assert_eq!(OutputFormat::Pdf.extension(), "pdf");
        assert_eq!(OutputFormat::Pdf.mime_type(), "application/pdf");
        assert_eq!(OutputFormat::Docx.extension(), "docx");
        assert_eq!(
            OutputFormat::Docx.mime_type(),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        );
        assert_eq!("DOCX".parse::<OutputFormat>().unwrap(), OutputFormat::Docx);
        assert!("odt".parse::<OutputFormat>().is_err());
    }
}
