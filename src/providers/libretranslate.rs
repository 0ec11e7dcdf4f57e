use std::time::Duration;

use log::{error, warn};
use rand::seq::IndexedRandom;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::TranslateError;
use crate::providers::{RemoteApi, RemoteLanguage};

/// Default public LibreTranslate instance
pub const DEFAULT_MIRROR: &str = "https://libretranslate.com/";

/// Default number of attempts across mirrors before giving up
const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// LibreTranslate client for interacting with LibreTranslate-compatible APIs
///
/// Holds a list of mirror URLs; every translate attempt picks one at random
/// so a dead mirror only costs one attempt out of the retry budget.
pub struct LibreTranslateApi {
    /// HTTP client for API requests
    client: Client,
    /// Mirror base URLs, trailing slash normalized
    mirrors: Vec<Url>,
    /// Optional API key sent with every request
    api_key: Option<String>,
    /// Number of attempts before the request fails
    max_attempts: u32,
}

/// Translation request payload (form encoded)
#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

/// Translation response payload
#[derive(Debug, Deserialize)]
struct TranslateResponse {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

impl LibreTranslateApi {
    /// Create a client against the default public mirror
    pub fn new() -> Self {
        Self::with_mirrors(&[DEFAULT_MIRROR]).expect("default mirror URL is valid")
    }

    /// Create a client over an explicit mirror list
    pub fn with_mirrors(mirrors: &[&str]) -> Result<Self, TranslateError> {
        let parsed = mirrors
            .iter()
            .map(|mirror| parse_mirror(mirror))
            .collect::<Result<Vec<_>, _>>()?;

        if parsed.is_empty() {
            return Err(TranslateError::RemoteService(
                "No mirrors configured".to_string(),
            ));
        }

        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
            mirrors: parsed,
            api_key: None,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        })
    }

    /// Set the API key sent with every request
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the attempt budget for translate calls
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    fn try_translate(
        &self,
        mirror: &Url,
        text: &str,
        source_code: &str,
        target_code: &str,
    ) -> Result<String, TranslateError> {
        let api_url = mirror.join("translate").map_err(|e| {
            TranslateError::RemoteService(format!("Invalid translate URL on {}: {}", mirror, e))
        })?;

        let request = TranslateRequest {
            q: text,
            source: source_code,
            target: target_code,
            api_key: self.api_key.as_deref(),
        };

        let response = self
            .client
            .post(api_url)
            .form(&request)
            .send()
            .map_err(|e| {
                TranslateError::RemoteService(format!("Failed to send request: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            return Err(TranslateError::RemoteService(format!(
                "API error ({}): {}",
                status, error_text
            )));
        }

        let parsed = response.json::<TranslateResponse>().map_err(|e| {
            TranslateError::RemoteService(format!("Failed to parse response: {}", e))
        })?;

        Ok(parsed.translated_text)
    }

    fn try_languages(&self, mirror: &Url) -> Result<Vec<RemoteLanguage>, TranslateError> {
        let api_url = mirror.join("languages").map_err(|e| {
            TranslateError::RemoteService(format!("Invalid languages URL on {}: {}", mirror, e))
        })?;

        let response = self.client.get(api_url).send().map_err(|e| {
            TranslateError::RemoteService(format!("Failed to send request: {}", e))
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            return Err(TranslateError::RemoteService(format!(
                "API error ({}): {}",
                status, error_text
            )));
        }

        response.json::<Vec<RemoteLanguage>>().map_err(|e| {
            TranslateError::RemoteService(format!("Failed to parse response: {}", e))
        })
    }
}

impl Default for LibreTranslateApi {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoteApi for LibreTranslateApi {
    fn translate(
        &self,
        text: &str,
        source_code: &str,
        target_code: &str,
    ) -> Result<String, TranslateError> {
        let mut attempt = 0;
        let mut last_error: Option<String> = None;

        while attempt < self.max_attempts {
            let Some(mirror) = self.mirrors.choose(&mut rand::rng()) else {
                break;
            };

            match self.try_translate(mirror, text, source_code, target_code) {
                Ok(result) => return Ok(result),
                Err(e) => {
                    warn!(
                        "LibreTranslate request to {} failed: {} - attempt {}/{}",
                        mirror,
                        e,
                        attempt + 1,
                        self.max_attempts
                    );
                    last_error = Some(e.to_string());
                }
            }

            attempt += 1;
        }

        let message = last_error
            .unwrap_or_else(|| format!("Request failed after {} attempts", self.max_attempts));
        error!("LibreTranslate translate failed: {}", message);
        Err(TranslateError::RemoteService(message))
    }

    fn languages(&self) -> Result<Vec<RemoteLanguage>, TranslateError> {
        let mut last_error: Option<String> = None;

        // Enumeration runs once at graph-build time; walk the mirrors in
        // order instead of sampling so the result is reproducible.
        for mirror in &self.mirrors {
            match self.try_languages(mirror) {
                Ok(languages) => return Ok(languages),
                Err(e) => {
                    warn!("LibreTranslate languages on {} failed: {}", mirror, e);
                    last_error = Some(e.to_string());
                }
            }
        }

        let message =
            last_error.unwrap_or_else(|| "No mirrors available for languages".to_string());
        error!("LibreTranslate languages failed: {}", message);
        Err(TranslateError::RemoteService(message))
    }
}

/// Normalize a mirror URL to end with a slash so endpoint joins append
fn parse_mirror(url: &str) -> Result<Url, TranslateError> {
    let normalized = if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{}/", url)
    };

    Url::parse(&normalized).map_err(|e| {
        TranslateError::RemoteService(format!("Invalid mirror URL '{}': {}", url, e))
    })
}
