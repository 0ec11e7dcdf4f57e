/*!
 * Mock translation implementations for the yaomt test suite
 *
 * `MockTranslation` is a closure-backed `Translation` with a shared call
 * counter, used to observe caching behavior and to script exact hypothesis
 * lists for composition tests.
 */

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use yaomt::{Hypothesis, Language, TranslateError, Translation};

/// Shorthand for a shared language endpoint
pub fn lang(code: &str, name: &str) -> Arc<Language> {
    Arc::new(Language::new(code, name))
}

type Responder = Box<dyn Fn(&str, usize) -> Result<Vec<Hypothesis>, TranslateError> + Send + Sync>;

/// A scripted translation with a call counter
pub struct MockTranslation {
    from_lang: Arc<Language>,
    to_lang: Arc<Language>,
    responder: Responder,
    call_count: Arc<AtomicUsize>,
}

impl MockTranslation {
    /// Create a mock driven by an arbitrary responder
    pub fn new<F>(from_lang: Arc<Language>, to_lang: Arc<Language>, responder: F) -> Self
    where
        F: Fn(&str, usize) -> Result<Vec<Hypothesis>, TranslateError> + Send + Sync + 'static,
    {
        Self {
            from_lang,
            to_lang,
            responder: Box::new(responder),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A mock that maps whole input strings through a fixed table, echoing
    /// on a miss; ranks past the first append an alt marker
    pub fn mapping(
        from_lang: Arc<Language>,
        to_lang: Arc<Language>,
        entries: &[(&str, &str)],
    ) -> Self {
        let table: Vec<(String, String)> = entries
            .iter()
            .map(|(input, output)| (input.to_string(), output.to_string()))
            .collect();
        Self::new(from_lang, to_lang, move |text, n| {
            let translated = table
                .iter()
                .find(|(input, _)| input == text)
                .map(|(_, output)| output.clone())
                .unwrap_or_else(|| text.to_string());
            Ok((0..n)
                .map(|rank| {
                    let value = if rank == 0 {
                        translated.clone()
                    } else {
                        format!("{} (alt {})", translated, rank)
                    };
                    Hypothesis::new(value, -0.1 * (rank + 1) as f64)
                })
                .collect())
        })
    }

    /// A mock that uppercases its input, replicated across ranks at score 0
    pub fn uppercase(from_lang: Arc<Language>, to_lang: Arc<Language>) -> Self {
        Self::new(from_lang, to_lang, |text, n| {
            Ok(vec![Hypothesis::new(text.to_uppercase(), 0.0); n])
        })
    }

    /// A mock that fails every call with an inference error
    pub fn failing(from_lang: Arc<Language>, to_lang: Arc<Language>) -> Self {
        Self::new(from_lang, to_lang, |_, _| {
            Err(TranslateError::Inference(
                "simulated mock failure".to_string(),
            ))
        })
    }

    /// Number of `hypotheses` calls served so far
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Handle on the shared call counter, surviving moves into an `Arc`
    pub fn counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.call_count)
    }
}

impl Translation for MockTranslation {
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
        self.call_count.fetch_add(1, Ordering::SeqCst);
        (self.responder)(input_text, num_hypotheses)
    }
}
