//! Chat-model translation backend.
//!
//! Sends each chunk to any provider supported by `edgequake-llm` with a
//! translation-only system prompt. All prompt wording lives in
//! [`crate::prompts`]. One chunk is one request; there is no retry, a
//! failed call surfaces as [`TranslateError::LlmApi`].

use crate::config::{TargetLanguage, TranslationConfig};
use crate::error::TranslateError;
use crate::pipeline::normalize::strip_outer_fences;
use crate::pipeline::translator::Translator;
use crate::prompts::translation_system_prompt;
use async_trait::async_trait;
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider, ProviderFactory};
use std::sync::Arc;
use std::time::Instant;
use tokio::time::{timeout, Duration};
use tracing::debug;

const DEFAULT_MODEL: &str = "gpt-4.1-nano";

/// Translator backed by a chat-completion model.
pub struct LlmTranslator {
    provider: Arc<dyn LLMProvider>,
    name: String,
    options: CompletionOptions,
    system_prompt: Option<String>,
    timeout_secs: u64,
}

impl LlmTranslator {
    /// Wrap an already-configured provider, using the config's sampling
    /// settings.
    pub fn with_provider(provider: Arc<dyn LLMProvider>, config: &TranslationConfig) -> Self {
        let name = match (&config.provider_name, &config.model) {
            (Some(p), Some(m)) => format!("llm:{p}/{m}"),
            (Some(p), None) => format!("llm:{p}"),
            _ => "llm".to_string(),
        };
        Self {
            provider,
            name,
            options: build_options(config),
            system_prompt: config.system_prompt.clone(),
            timeout_secs: config.api_timeout_secs,
        }
    }

    /// Resolve a provider from the config and environment.
    pub fn from_config(config: &TranslationConfig) -> Result<Self, TranslateError> {
        let provider = resolve_provider(config)?;
        Ok(Self::with_provider(provider, config))
    }
}

#[async_trait]
impl Translator for LlmTranslator {
    fn name(&self) -> &str {
        &self.name
    }

    async fn translate(&self, text: &str, target: TargetLanguage) -> Result<String, TranslateError> {
        let start = Instant::now();
        let messages = vec![
            ChatMessage::system(translation_system_prompt(target, self.system_prompt.as_deref())),
            ChatMessage::user(text),
        ];
        let response = timeout(
            Duration::from_secs(self.timeout_secs),
            self.provider.chat(&messages, Some(&self.options)),
        )
        .await
        .map_err(|_| TranslateError::Timeout {
            backend: self.name.clone(),
            secs: self.timeout_secs,
        })?
        .map_err(|e| TranslateError::LlmApi {
            message: e.to_string(),
        })?;

        debug!(
            "{}: {} input tokens, {} output tokens, {:?}",
            self.name,
            response.prompt_tokens,
            response.completion_tokens,
            start.elapsed()
        );

        Ok(strip_outer_fences(&response.content))
    }
}

/// Build `CompletionOptions` from the translation config.
fn build_options(config: &TranslationConfig) -> CompletionOptions {
    CompletionOptions {
        temperature: Some(config.temperature),
        max_tokens: Some(config.max_tokens),
        ..Default::default()
    }
}

fn create_provider(provider_name: &str, model: &str) -> Result<Arc<dyn LLMProvider>, TranslateError> {
    ProviderFactory::create_llm_provider(provider_name, model).map_err(|e| {
        TranslateError::ProviderNotConfigured {
            provider: provider_name.to_string(),
            hint: format!("{e}"),
        }
    })
}

/// Resolve the chat provider, from most-specific to least-specific.
///
/// 1. **Named provider + model** (`config.provider_name`) — the factory reads
///    the matching API key (`OPENAI_API_KEY`, …) from the environment.
/// 2. **Environment pair** (`EDGEQUAKE_LLM_PROVIDER` + `EDGEQUAKE_MODEL`).
/// 3. **OpenAI key present** — OpenAI with the configured or default model.
/// 4. **Full auto-detection** (`ProviderFactory::from_env`).
fn resolve_provider(config: &TranslationConfig) -> Result<Arc<dyn LLMProvider>, TranslateError> {
    if let Some(ref name) = config.provider_name {
        let model = config.model.as_deref().unwrap_or(DEFAULT_MODEL);
        return create_provider(name, model);
    }

    if let (Ok(prov), Ok(model)) = (
        std::env::var("EDGEQUAKE_LLM_PROVIDER"),
        std::env::var("EDGEQUAKE_MODEL"),
    ) {
        if !prov.is_empty() && !model.is_empty() {
            return create_provider(&prov, &model);
        }
    }

    if let Ok(openai_key) = std::env::var("OPENAI_API_KEY") {
        if !openai_key.is_empty() {
            let model = config.model.as_deref().unwrap_or(DEFAULT_MODEL);
            return create_provider("openai", model);
        }
    }

    let (llm_provider, _embedding) =
        ProviderFactory::from_env().map_err(|e| TranslateError::ProviderNotConfigured {
            provider: "auto".to_string(),
            hint: format!(
                "No LLM provider could be auto-detected from environment.\n\
                Set OPENAI_API_KEY, ANTHROPIC_API_KEY, or pass --provider.\n\
                Error: {}",
                e
            ),
        })?;

    Ok(llm_provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_options_defaults() {
        let config = TranslationConfig::default();
        let opts = build_options(&config);
        assert_eq!(opts.temperature, Some(0.1));
        assert_eq!(opts.max_tokens, Some(4096));
    }
}
