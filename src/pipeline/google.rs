//! Google web-translation backend.
//!
//! Talks to the keyless `translate_a/single` endpoint used by the Google
//! Translate web widget. The text travels in a form-encoded POST body so
//! 5 000-character chunks never hit URL length limits.
//!
//! The response is a nested JSON array whose first element lists the
//! translated sentences:
//!
//! ```text
//! [[["Hello ","Bonjour ",null,null,10],["world","monde",null,null,10]],null,"fr",…]
//! ```
//!
//! Concatenating the first field of every sentence gives the translation.

use crate::config::TargetLanguage;
use crate::error::TranslateError;
use crate::pipeline::translator::Translator;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

const BACKEND: &str = "google";

/// Translator backed by the Google web endpoint; source language is always
/// auto-detected.
#[derive(Debug, Clone)]
pub struct GoogleTranslator {
    client: reqwest::Client,
    endpoint: String,
    timeout_secs: u64,
}

impl GoogleTranslator {
    /// Build a client for `endpoint` with a per-request timeout.
    pub fn new(endpoint: impl Into<String>, timeout_secs: u64) -> Result<Self, TranslateError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| TranslateError::Http {
                backend: BACKEND.into(),
                detail: e.to_string(),
            })?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            timeout_secs,
        })
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    fn name(&self) -> &str {
        BACKEND
    }

    async fn translate(&self, text: &str, target: TargetLanguage) -> Result<String, TranslateError> {
        let response = self
            .client
            .post(&self.endpoint)
            .query(&[
                ("client", "gtx"),
                ("sl", "auto"),
                ("tl", target.code()),
                ("dt", "t"),
            ])
            .form(&[("q", text)])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TranslateError::Timeout {
                        backend: BACKEND.into(),
                        secs: self.timeout_secs,
                    }
                } else {
                    TranslateError::Http {
                        backend: BACKEND.into(),
                        detail: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok());
            warn!("Google endpoint rate-limited the request (retry-after: {:?})", retry_after_secs);
            return Err(TranslateError::RateLimited {
                backend: BACKEND.into(),
                retry_after_secs,
            });
        }

        let body = response.text().await.map_err(|e| TranslateError::Http {
            backend: BACKEND.into(),
            detail: e.to_string(),
        })?;

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(TranslateError::Auth {
                backend: BACKEND.into(),
                detail: truncate(&body, 200),
            });
        }
        if !status.is_success() {
            return Err(TranslateError::Status {
                backend: BACKEND.into(),
                status: status.as_u16(),
                detail: truncate(&body, 200),
            });
        }

        let translated = parse_response(&body)?;
        debug!(
            "Google: {} chars in, {} chars out",
            text.chars().count(),
            translated.chars().count()
        );
        Ok(translated)
    }
}

/// Extract the translated text from a `translate_a/single` response body.
pub fn parse_response(body: &str) -> Result<String, TranslateError> {
    let value: Value = serde_json::from_str(body).map_err(|e| TranslateError::InvalidResponse {
        backend: BACKEND.into(),
        detail: format!("not JSON: {e}"),
    })?;

    let top = value.as_array().ok_or_else(|| TranslateError::InvalidResponse {
        backend: BACKEND.into(),
        detail: "top-level value is not an array".into(),
    })?;

    let sentences = match top.first() {
        Some(Value::Array(sentences)) => sentences,
        // Nothing to translate: the service answers `[null, …]`.
        Some(Value::Null) => return Ok(String::new()),
        _ => {
            return Err(TranslateError::InvalidResponse {
                backend: BACKEND.into(),
                detail: "missing sentence list".into(),
            })
        }
    };

    let mut out = String::new();
    for sentence in sentences {
        if let Some(part) = sentence.get(0).and_then(Value::as_str) {
            out.push_str(part);
        }
    }
    Ok(out)
}

fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((i, _)) => format!("{}\u{2026}", &s[..i]),
        None => s.to_string(),
    }
}
