/*!
 * Translation delegated to a remote HTTP service.
 */

use std::sync::Arc;

use crate::errors::TranslateError;
use crate::providers::RemoteApi;
use crate::translate::core::{Language, Translation};
use crate::translate::hypothesis::Hypothesis;

/// A translation performed by a remote translation API
///
/// Remote services return one best translation and no scores, so the single
/// result is replicated to satisfy the hypothesis-count contract, all at
/// score 0. Service failures propagate as remote-service errors; the input
/// is never silently returned unchanged.
pub struct RemoteTranslation {
    from_lang: Arc<Language>,
    to_lang: Arc<Language>,
    api: Arc<dyn RemoteApi>,
}

impl RemoteTranslation {
    /// Create a remote translation between two languages
    pub fn new(from_lang: Arc<Language>, to_lang: Arc<Language>, api: Arc<dyn RemoteApi>) -> Self {
        Self {
            from_lang,
            to_lang,
            api,
        }
    }
}

impl Translation for RemoteTranslation {
    fn from_lang(&self) -> &Language {
        &self.from_lang
    }

    fn to_lang(&self) -> &Language {
        &self.to_lang
    }

    fn hypotheses(
        &self,
        input_text: &str,
        num_hypotheses: usize,
    ) -> Result<Vec<Hypothesis>, TranslateError> {
        let result = self
            .api
            .translate(input_text, self.from_lang.code(), self.to_lang.code())?;
        Ok(vec![Hypothesis::new(result, 0.0); num_hypotheses])
    }
}
