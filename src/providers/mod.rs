/*!
 * Network-backed translation providers.
 *
 * This module contains client implementations for the remote capabilities
 * the graph can build edges from:
 * - LibreTranslate: HTTP translation API with mirror fallback
 * - OpenAI: completions API used for few-shot prompting
 */

use serde::{Deserialize, Serialize};

use crate::errors::TranslateError;

/// A language advertised by a remote translation service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteLanguage {
    /// Language code as the service reports it
    pub code: String,
    /// Display name as the service reports it
    pub name: String,
}

/// Remote HTTP translation capability
///
/// Implementations translate whole strings server-side; they expose no
/// hypothesis scoring, so edges built on them replicate their single result.
pub trait RemoteApi: Send + Sync {
    /// Translate text between two language codes
    ///
    /// # Arguments
    /// * `text` - The text to translate
    /// * `source_code` - Source language code
    /// * `target_code` - Target language code
    ///
    /// # Returns
    /// * `Result<String, TranslateError>` - The translated text or a remote-service error
    fn translate(
        &self,
        text: &str,
        source_code: &str,
        target_code: &str,
    ) -> Result<String, TranslateError>;

    /// List the languages the service translates between
    fn languages(&self) -> Result<Vec<RemoteLanguage>, TranslateError>;
}

/// Prompt-completion language model capability
pub trait LanguageModel: Send + Sync {
    /// Complete a prompt
    ///
    /// # Returns
    /// * `Option<String>` - The completion, absent when the model fails or returns nothing
    fn infer(&self, prompt: &str) -> Option<String>;
}

pub mod libretranslate;
pub mod mock;
pub mod openai;
