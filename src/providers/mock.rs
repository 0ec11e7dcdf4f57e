/*!
 * Mock provider implementations for testing.
 *
 * This module provides mock remote capabilities:
 * - `MockRemoteApi::working()` - Always succeeds with a tagged translation
 * - `MockRemoteApi::failing()` - Always fails with a remote-service error
 * - `MockLanguageModel` - Scripted prompt completions with prompt capture
 */

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::errors::TranslateError;
use crate::providers::{LanguageModel, RemoteApi, RemoteLanguage};

/// Behavior mode for the mock remote API
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockRemoteBehavior {
    /// Always succeeds, tagging the text with the target code
    Working,
    /// Always fails with a remote-service error
    Failing,
}

/// Mock remote translation API
pub struct MockRemoteApi {
    /// Behavior mode
    behavior: MockRemoteBehavior,
    /// Languages the mock advertises
    languages: Vec<RemoteLanguage>,
    /// Request counter shared across clones
    request_count: Arc<AtomicUsize>,
}

impl MockRemoteApi {
    /// Create a working mock advertising the given (code, name) languages
    pub fn working(languages: &[(&str, &str)]) -> Self {
        Self {
            behavior: MockRemoteBehavior::Working,
            languages: languages
                .iter()
                .map(|(code, name)| RemoteLanguage {
                    code: code.to_string(),
                    name: name.to_string(),
                })
                .collect(),
            request_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a mock that fails every call
    pub fn failing() -> Self {
        Self {
            behavior: MockRemoteBehavior::Failing,
            languages: Vec::new(),
            request_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of translate calls served so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }
}

impl Clone for MockRemoteApi {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior,
            languages: self.languages.clone(),
            request_count: Arc::clone(&self.request_count),
        }
    }
}

impl RemoteApi for MockRemoteApi {
    fn translate(
        &self,
        text: &str,
        _source_code: &str,
        target_code: &str,
    ) -> Result<String, TranslateError> {
        self.request_count.fetch_add(1, Ordering::SeqCst);

        match self.behavior {
            MockRemoteBehavior::Working => Ok(format!("[{}] {}", target_code, text)),
            MockRemoteBehavior::Failing => Err(TranslateError::RemoteService(
                "simulated remote failure".to_string(),
            )),
        }
    }

    fn languages(&self) -> Result<Vec<RemoteLanguage>, TranslateError> {
        match self.behavior {
            MockRemoteBehavior::Working => Ok(self.languages.clone()),
            MockRemoteBehavior::Failing => Err(TranslateError::RemoteService(
                "simulated remote failure".to_string(),
            )),
        }
    }
}

/// Mock prompt-completion model
///
/// Completions come from a fixed string or a responder function; every
/// prompt is captured for assertions.
pub struct MockLanguageModel {
    /// Fixed completion used when no responder is set
    fixed: Option<String>,
    /// Custom responder (optional)
    responder: Option<fn(&str) -> Option<String>>,
    /// Request counter shared across clones
    request_count: Arc<AtomicUsize>,
    /// Most recent prompt
    last_prompt: Arc<Mutex<Option<String>>>,
}

impl MockLanguageModel {
    /// Create a model that always returns the same completion
    pub fn returning(completion: impl Into<String>) -> Self {
        Self {
            fixed: Some(completion.into()),
            responder: None,
            request_count: Arc::new(AtomicUsize::new(0)),
            last_prompt: Arc::new(Mutex::new(None)),
        }
    }

    /// Create a model that never produces a completion
    pub fn absent() -> Self {
        Self {
            fixed: None,
            responder: None,
            request_count: Arc::new(AtomicUsize::new(0)),
            last_prompt: Arc::new(Mutex::new(None)),
        }
    }

    /// Create a model driven by a responder function
    pub fn with_responder(responder: fn(&str) -> Option<String>) -> Self {
        Self {
            fixed: None,
            responder: Some(responder),
            request_count: Arc::new(AtomicUsize::new(0)),
            last_prompt: Arc::new(Mutex::new(None)),
        }
    }

    /// Number of infer calls served so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// The most recent prompt, if any call happened
    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().clone()
    }
}

impl Clone for MockLanguageModel {
    fn clone(&self) -> Self {
        Self {
            fixed: self.fixed.clone(),
            responder: self.responder,
            request_count: Arc::clone(&self.request_count),
            last_prompt: Arc::clone(&self.last_prompt),
        }
    }
}

impl LanguageModel for MockLanguageModel {
    fn infer(&self, prompt: &str) -> Option<String> {
        self.request_count.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock() = Some(prompt.to_string());

        if let Some(responder) = self.responder {
            return responder(prompt);
        }
        self.fixed.clone()
    }
}
