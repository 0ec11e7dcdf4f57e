/*!
 * Paragraph-level translation caching.
 *
 * `CachedTranslation` wraps any translation and memoizes results per
 * paragraph, so interactively editing the end of a text does not pay for
 * re-translating the unchanged paragraphs before it. The cache is rebuilt
 * on every call from only the paragraphs of that call, which bounds memory
 * to the most recent input.
 */

use std::collections::HashMap;
use std::sync::Arc;

use log::debug;
use parking_lot::Mutex;

use crate::errors::TranslateError;
use crate::translate::core::{
    check_hypothesis_count, combine_paragraph_hypotheses, split_paragraphs, Language, Translation,
};
use crate::translate::hypothesis::Hypothesis;

/// A memoizing decorator around another translation
pub struct CachedTranslation {
    /// The translation doing the actual work
    underlying: Arc<dyn Translation>,

    /// Paragraph text to its previously computed hypotheses
    cache: Mutex<HashMap<String, Vec<Hypothesis>>>,
}

impl CachedTranslation {
    /// Wrap a translation with paragraph caching
    pub fn new(underlying: Arc<dyn Translation>) -> Self {
        Self {
            underlying,
            cache: Mutex::new(HashMap::new()),
        }
    }
}

impl Translation for CachedTranslation {
    fn from_lang(&self) -> &Language {
        self.underlying.from_lang()
    }

    fn to_lang(&self) -> &Language {
        self.underlying.to_lang()
    }

    fn hypotheses(
        &self,
        input_text: &str,
        num_hypotheses: usize,
    ) -> Result<Vec<Hypothesis>, TranslateError> {
        // The lock covers the whole rebuild-and-respond sequence; concurrent
        // callers on one edge serialize here, which is acceptable for an
        // optimization-only structure.
        let mut cache = self.cache.lock();

        let paragraphs = split_paragraphs(input_text);
        let mut new_cache: HashMap<String, Vec<Hypothesis>> =
            HashMap::with_capacity(paragraphs.len());
        let mut translated_paragraphs = Vec::with_capacity(paragraphs.len());

        for paragraph in paragraphs {
            // A cached entry is only reusable if it was computed for the
            // same hypothesis count.
            let translated = match cache
                .get(paragraph)
                .filter(|cached| cached.len() == num_hypotheses)
            {
                Some(cached) => {
                    debug!(
                        "Cache hit for paragraph '{}' ({} -> {})",
                        truncate_text(paragraph, 30),
                        self.from_lang().code(),
                        self.to_lang().code()
                    );
                    cached.clone()
                }
                None => {
                    debug!(
                        "Cache miss for paragraph '{}' ({} -> {})",
                        truncate_text(paragraph, 30),
                        self.from_lang().code(),
                        self.to_lang().code()
                    );
                    let computed = self.underlying.hypotheses(paragraph, num_hypotheses)?;
                    check_hypothesis_count(&computed, num_hypotheses)?;
                    computed
                }
            };

            new_cache.insert(paragraph.to_string(), translated.clone());
            translated_paragraphs.push(translated);
        }

        // Discard entries from prior calls; only this call's paragraphs stay
        *cache = new_cache;

        Ok(combine_paragraph_hypotheses(
            &translated_paragraphs,
            num_hypotheses,
        ))
    }
}

/// Truncate text to a maximum length with ellipsis, on a char boundary
fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        format!("{}...", text.chars().take(max_chars).collect::<String>())
    }
}
