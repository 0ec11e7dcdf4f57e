/*!
 * Translation via few-shot prompting of a language model.
 *
 * Input is split into sentences with the heuristic chunker (the boundary
 * probe is itself a few-shot prompt), then each sentence is translated by
 * embedding it in a prompt of worked examples and truncating the completion
 * at the example delimiter.
 */

use std::sync::Arc;

use log::debug;

use crate::errors::TranslateError;
use crate::providers::LanguageModel;
use crate::translate::chunk;
use crate::translate::core::{Language, Translation};
use crate::translate::hypothesis::Hypothesis;
use crate::translate::sbd;

/// Delimiter between a prompt's source text and the expected translation
const RESPONSE_DELIMITER: &str = "----------";

/// Delimiter between worked examples
const EXAMPLE_DELIMITER: &str = "==========";

/// Worked translation examples embedded in every prompt
const WORKED_EXAMPLES: &str = "\
Translate to French (fr)
From English (en)
==========
Bramshott is a village with mediaeval origins in the East Hampshire district of Hampshire, England. It lies 0.9 miles (1.4 km) north of Liphook.
----------
Bramshott est un village avec des origines médiévales dans le quartier East Hampshire de Hampshire, en Angleterre. Il se trouve à 0,9 miles (1,4 km) au nord de Liphook.
==========

Translate to Spanish (es)
From English (en)
==========
The library opens at nine in the morning and closes at six in the evening.
----------
La biblioteca abre a las nueve de la mañana y cierra a las seis de la tarde.
==========

";

/// A translation performed with a few-shot prompted language model
pub struct FewShotTranslation {
    from_lang: Arc<Language>,
    to_lang: Arc<Language>,
    language_model: Arc<dyn LanguageModel>,
}

impl FewShotTranslation {
    /// Create a few-shot translation between two languages
    pub fn new(
        from_lang: Arc<Language>,
        to_lang: Arc<Language>,
        language_model: Arc<dyn LanguageModel>,
    ) -> Self {
        Self {
            from_lang,
            to_lang,
            language_model,
        }
    }
}

impl Translation for FewShotTranslation {
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
        let sentences = chunk::chunk(input_text, |tail| {
            sbd::fewshot_probe_sentence_boundary(tail, self.language_model.as_ref())
        })?;

        let mut translated = String::new();
        for sentence in sentences {
            let prompt = generate_prompt(
                &sentence,
                self.from_lang.name(),
                self.from_lang.code(),
                self.to_lang.name(),
                self.to_lang.code(),
            );
            debug!("Few-shot prompt for sentence '{}'", sentence);

            let response = self.language_model.infer(&prompt).ok_or_else(|| {
                TranslateError::RemoteService(
                    "language model returned no completion".to_string(),
                )
            })?;
            translated.push_str(&parse_inference(&response));
        }

        // The model exposes no scoring; replicate the single result
        Ok(vec![Hypothesis::new(translated, 0.0); num_hypotheses])
    }
}

/// Build the few-shot translation prompt for one sentence
pub fn generate_prompt(
    text: &str,
    from_name: &str,
    from_code: &str,
    to_name: &str,
    to_code: &str,
) -> String {
    format!(
        "{}Translate to {} ({})\nFrom {} ({})\n{}\n{}\n{}\n",
        WORKED_EXAMPLES,
        to_name,
        to_code,
        from_name,
        from_code,
        EXAMPLE_DELIMITER,
        text,
        RESPONSE_DELIMITER
    )
}

/// Extract the translated sentence from a completion
///
/// The completion continues the worked-example shape, so everything from
/// the first delimiter on is prompt scaffolding, not translation.
pub fn parse_inference(output: &str) -> String {
    let end = output
        .find(EXAMPLE_DELIMITER)
        .into_iter()
        .chain(output.find(RESPONSE_DELIMITER))
        .min()
        .unwrap_or(output.len());
    output[..end].trim_matches('\n').to_string()
}
