use std::time::Duration;

use log::error;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::providers::LanguageModel;

/// Default OpenAI completions endpoint
const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/completions";

/// Default completion budget; prompts end with the text to translate, so a
/// short tail is enough
const DEFAULT_MAX_TOKENS: u32 = 100;

/// OpenAI-compatible completions client used for few-shot translation
///
/// Implements [`LanguageModel`]: failures are logged and reported as an
/// absent completion rather than an error, matching the capability contract.
pub struct OpenAiCompletions {
    /// HTTP client for API requests
    client: Client,
    /// API key for bearer authentication
    api_key: String,
    /// Endpoint URL, defaults to the public API
    endpoint: String,
    /// Model identifier
    model: String,
    /// Maximum tokens generated per completion
    max_tokens: u32,
}

/// Completions request payload
#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
}

/// Completions response payload
#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

/// One generated completion
#[derive(Debug, Deserialize)]
struct CompletionChoice {
    text: String,
}

impl OpenAiCompletions {
    /// Create a client for the public API
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(60))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: model.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// Point the client at an OpenAI-compatible endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the completion token budget
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    fn complete(&self, prompt: &str) -> anyhow::Result<String> {
        let request = CompletionRequest {
            model: &self.model,
            prompt,
            max_tokens: self.max_tokens,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            anyhow::bail!("API error ({}): {}", status, error_text);
        }

        let parsed = response.json::<CompletionResponse>()?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.text)
            .ok_or_else(|| anyhow::anyhow!("Response contained no choices"))
    }
}

impl LanguageModel for OpenAiCompletions {
    fn infer(&self, prompt: &str) -> Option<String> {
        match self.complete(prompt) {
            Ok(text) => Some(text),
            Err(e) => {
                error!("OpenAI completion failed: {}", e);
                None
            }
        }
    }
}
