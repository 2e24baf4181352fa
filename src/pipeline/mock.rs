//! Deterministic translator for tests and dry runs.
//!
//! - [`MockTranslator::uppercase()`] — returns the input upper-cased
//! - [`MockTranslator::identity()`] — returns the input unchanged
//! - [`MockTranslator::tagging()`] — prefixes the target code, `"[fr] text"`
//! - [`MockTranslator::failing()`] — always fails with HTTP 503
//! - [`MockTranslator::failing_after(n)`] — succeeds `n` times, then fails

use crate::config::TargetLanguage;
use crate::error::TranslateError;
use crate::pipeline::translator::Translator;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Behaviour of a [`MockTranslator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockBehavior {
    Uppercase,
    Identity,
    Tagging,
    /// Fails once `succeed` calls have gone through.
    FailAfter { succeed: usize },
}

/// A [`Translator`] that never touches the network.
///
/// Every input it receives is recorded so tests can assert call order.
#[derive(Debug)]
pub struct MockTranslator {
    behavior: MockBehavior,
    calls: AtomicUsize,
    inputs: Mutex<Vec<String>>,
}

impl MockTranslator {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
            inputs: Mutex::new(Vec::new()),
        }
    }

    pub fn uppercase() -> Self {
        Self::new(MockBehavior::Uppercase)
    }

    pub fn identity() -> Self {
        Self::new(MockBehavior::Identity)
    }

    pub fn tagging() -> Self {
        Self::new(MockBehavior::Tagging)
    }

    pub fn failing() -> Self {
        Self::new(MockBehavior::FailAfter { succeed: 0 })
    }

    pub fn failing_after(succeed: usize) -> Self {
        Self::new(MockBehavior::FailAfter { succeed })
    }

    /// Number of `translate` calls received.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Inputs received, in call order.
    pub fn inputs(&self) -> Vec<String> {
        self.inputs
            .lock()
            .map(|v| v.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Translator for MockTranslator {
    fn name(&self) -> &str {
        "mock"
    }

    async fn translate(&self, text: &str, target: TargetLanguage) -> Result<String, TranslateError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut inputs) = self.inputs.lock() {
            inputs.push(text.to_string());
        }

        match self.behavior {
            MockBehavior::Uppercase => Ok(text.to_uppercase()),
            MockBehavior::Identity => Ok(text.to_string()),
            MockBehavior::Tagging => Ok(format!("[{}] {}", target.code(), text)),
            MockBehavior::FailAfter { succeed } if n < succeed => Ok(text.to_string()),
            MockBehavior::FailAfter { .. } => Err(TranslateError::Status {
                backend: "mock".into(),
                status: 503,
                detail: "Service Unavailable".into(),
            }),
        }
    }
}
