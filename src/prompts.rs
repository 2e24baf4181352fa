//! System prompts for the chat-model translation backend.
//!
//! Callers can override the default via
//! [`crate::config::TranslationConfig::system_prompt`]; the override may use
//! the `{language}` placeholder, which is replaced with the target
//! language's English name.

use crate::config::TargetLanguage;

/// Default system prompt for translating one chunk of document text.
pub const DEFAULT_TRANSLATION_PROMPT: &str = r#"You are a professional document translator. Translate the text provided by the user into {language}.

Follow these rules precisely:

1. Detect the source language yourself; never ask which language it is.
2. Translate ALL of the text. Do not summarise, shorten, or omit anything.
3. Keep every line break exactly where it is. The text comes from a document
   page and its line structure must survive translation.
4. Keep numbers, dates, URLs, e-mail addresses, and code identifiers unchanged.
5. If a passage is already in {language}, reproduce it unchanged.
6. Output ONLY the translated text:
   - Do NOT wrap it in ``` fences or quotes
   - Do NOT add notes, explanations, or a preamble"#;

/// Render the system prompt for `target`, using `custom` when provided.
pub fn translation_system_prompt(target: TargetLanguage, custom: Option<&str>) -> String {
    custom
        .unwrap_or(DEFAULT_TRANSLATION_PROMPT)
        .replace("{language}", target.english_name())
}
