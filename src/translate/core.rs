/*!
 * Core translation capability and the language value type.
 *
 * This module defines the `Translation` trait every backend implements,
 * the `Language` endpoints translations run between, the two synthesized
 * translation kinds the graph closure produces (identity and composite),
 * and the paragraph split/recombine helpers shared by the paragraph-aware
 * backends.
 */

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::errors::TranslateError;
use crate::translate::hypothesis::Hypothesis;

/// A language that can be translated from or to
///
/// Languages are value types keyed by their code; two instances with the
/// same code are interchangeable for lookups regardless of display name.
#[derive(Debug, Clone)]
pub struct Language {
    code: String,
    name: String,
}

impl Language {
    /// Create a language from its code and display name
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }

    /// Stable identifier, usually an ISO 639 code
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Human-readable display name
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for Language {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for Language {}

impl Hash for Language {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code.hash(state);
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A translation between two languages
///
/// The endpoints are fixed at construction. `hypotheses` is the core
/// operation and must return exactly `num_hypotheses` entries; backends
/// without genuine alternatives replicate their single best result.
pub trait Translation: Send + Sync {
    /// The language this translation translates from
    fn from_lang(&self) -> &Language;

    /// The language this translation translates to
    fn to_lang(&self) -> &Language;

    /// Translate text, returning exactly `num_hypotheses` ranked candidates
    fn hypotheses(
        &self,
        input_text: &str,
        num_hypotheses: usize,
    ) -> Result<Vec<Hypothesis>, TranslateError>;

    /// Translate text, returning the single best candidate
    fn translate(&self, input_text: &str) -> Result<String, TranslateError> {
        let mut hypotheses = self.hypotheses(input_text, 1)?;
        if hypotheses.is_empty() {
            return Err(TranslateError::Inference(
                "translation produced no hypotheses".to_string(),
            ));
        }
        Ok(hypotheses.remove(0).value)
    }
}

/// A translation from a language to itself that returns its input unchanged
///
/// Every language in a built graph carries one of these, so looking up a
/// self-pair always succeeds without callers special-casing it.
pub struct IdentityTranslation {
    lang: Arc<Language>,
}

impl IdentityTranslation {
    /// Create an identity translation for the given language
    pub fn new(lang: Arc<Language>) -> Self {
        Self { lang }
    }
}

impl Translation for IdentityTranslation {
    fn from_lang(&self) -> &Language {
        &self.lang
    }

    fn to_lang(&self) -> &Language {
        &self.lang
    }

    fn hypotheses(
        &self,
        input_text: &str,
        num_hypotheses: usize,
    ) -> Result<Vec<Hypothesis>, TranslateError> {
        Ok(vec![Hypothesis::new(input_text, 0.0); num_hypotheses])
    }
}

/// A pivot translation chaining two translations through a shared language
///
/// `first` translates into the intermediate language, `second` out of it.
pub struct CompositeTranslation {
    first: Arc<dyn Translation>,
    second: Arc<dyn Translation>,
}

impl CompositeTranslation {
    /// Chain two translations; `first.to_lang()` must be `second.from_lang()`
    pub fn new(first: Arc<dyn Translation>, second: Arc<dyn Translation>) -> Self {
        Self { first, second }
    }
}

impl Translation for CompositeTranslation {
    fn from_lang(&self) -> &Language {
        self.first.from_lang()
    }

    fn to_lang(&self) -> &Language {
        self.second.to_lang()
    }

    fn hypotheses(
        &self,
        input_text: &str,
        num_hypotheses: usize,
    ) -> Result<Vec<Hypothesis>, TranslateError> {
        let first_hypotheses = self.first.hypotheses(input_text, num_hypotheses)?;

        // n x n cross product; n is small, pivot chains are shallow
        let mut combined = Vec::with_capacity(num_hypotheses * num_hypotheses);
        for first_hypothesis in &first_hypotheses {
            let second_hypotheses = self
                .second
                .hypotheses(&first_hypothesis.value, num_hypotheses)?;
            for second_hypothesis in second_hypotheses {
                combined.push(Hypothesis::new(
                    second_hypothesis.value,
                    first_hypothesis.score + second_hypothesis.score,
                ));
            }
        }

        // Stable descending sort keeps first-discovered candidates on ties
        combined.sort_by(|a, b| b.cmp_by_score(a));
        combined.truncate(num_hypotheses);
        Ok(combined)
    }
}

/// Split input text into paragraphs on newlines
///
/// This is the coarse granularity caching and model translation operate on;
/// it preserves blank-line structure across translation. Sentence-level
/// chunking happens below this, per paragraph.
pub fn split_paragraphs(input_text: &str) -> Vec<&str> {
    input_text.split('\n').collect()
}

/// Recombine per-paragraph hypothesis lists into whole-text hypotheses
///
/// For each rank, joins that rank's values across paragraphs with newlines
/// and sums the scores. Exactly one leading newline (the join artifact of a
/// leading empty paragraph accumulator) is stripped. Every inner list must
/// hold at least `num_hypotheses` entries.
pub fn combine_paragraph_hypotheses(
    paragraphs: &[Vec<Hypothesis>],
    num_hypotheses: usize,
) -> Vec<Hypothesis> {
    let mut combined = Vec::with_capacity(num_hypotheses);
    for rank in 0..num_hypotheses {
        let mut value = String::new();
        let mut score = 0.0;
        for hypotheses in paragraphs {
            value.push('\n');
            value.push_str(&hypotheses[rank].value);
            score += hypotheses[rank].score;
        }
        let value = value.strip_prefix('\n').unwrap_or(&value).to_string();
        combined.push(Hypothesis::new(value, score));
    }
    combined
}

/// Check that a backend honored the exact-count hypothesis contract
pub(crate) fn check_hypothesis_count(
    hypotheses: &[Hypothesis],
    num_hypotheses: usize,
) -> Result<(), TranslateError> {
    if hypotheses.len() != num_hypotheses {
        return Err(TranslateError::Inference(format!(
            "expected {} hypotheses, backend returned {}",
            num_hypotheses,
            hypotheses.len()
        )));
    }
    Ok(())
}
