/*!
 * Sentence-boundary probes for the heuristic chunker.
 *
 * Two probe flavors exist, both producing the "translated chunk" the
 * chunker aligns against:
 * - a seq2seq probe backed by a dedicated sentence-boundary-detection
 *   package, prompted with a marker token;
 * - a few-shot probe backed by a prompt-completion language model, prompted
 *   with worked sentence-boundary examples.
 */

use crate::errors::TranslateError;
use crate::providers::LanguageModel;
use crate::translate::core::Translation;

/// Marker prepended to a probe input for seq2seq boundary detection
pub const DETECT_BOUNDARIES_TOKEN: &str = "<detect-sentence-boundaries>";

/// Marker a boundary model emits after the first complete sentence
pub const SENTENCE_BOUNDARY_TOKEN: &str = "<sentence-boundary>";

/// Delimiter between worked examples in the few-shot prompt
pub const FEWSHOT_DELIMITER: &str = "----------";

/// Probe prefix length in chars; longer than most single sentences
pub const SENTENCE_GUESS_LENGTH: usize = 150;

/// Worked examples teaching a language model to mark sentence boundaries
const FEWSHOT_SBD_EXAMPLES: &str = "\
<detect-sentence-boundaries> I walked down to the river. Then I went to the
I walked down to the river. <sentence-boundary>
----------
<detect-sentence-boundaries> The library ships offline translation models. It is also
The library ships offline translation models. <sentence-boundary>
----------
<detect-sentence-boundaries> The package index is updated monthly. New models are
The package index is updated monthly. <sentence-boundary>
----------
";

/// Probe the first sentence boundary with a seq2seq boundary model
///
/// Translates a bounded prefix of the input through the boundary model and
/// returns the model output truncated at the boundary marker. An output
/// without the marker yields an empty string, which makes the chunker
/// consume the remaining input as one unit.
pub fn probe_sentence_boundary(
    input_text: &str,
    sbd_translation: &dyn Translation,
) -> Result<String, TranslateError> {
    let guess = char_prefix(input_text, SENTENCE_GUESS_LENGTH);
    let translated = sbd_translation.translate(&format!("{}{}", DETECT_BOUNDARIES_TOKEN, guess))?;
    Ok(truncate_at_boundary(&translated))
}

/// Probe the first sentence boundary with a few-shot language model
///
/// A failed or unparseable completion yields an empty string rather than an
/// error; boundary probing is best-effort and the chunker degrades to
/// whole-input chunks.
pub fn fewshot_probe_sentence_boundary(
    input_text: &str,
    language_model: &dyn LanguageModel,
) -> Result<String, TranslateError> {
    let prompt = fewshot_sbd_prompt(input_text);
    let Some(response) = language_model.infer(&prompt) else {
        return Ok(String::new());
    };
    let Some(parsed) = parse_fewshot_response(&response) else {
        return Ok(String::new());
    };
    Ok(truncate_at_boundary(&parsed))
}

/// Build the few-shot sentence-boundary prompt for an input prefix
pub fn fewshot_sbd_prompt(input_text: &str) -> String {
    let guess = char_prefix(input_text, SENTENCE_GUESS_LENGTH);
    format!(
        "{}{} {}",
        FEWSHOT_SBD_EXAMPLES, DETECT_BOUNDARIES_TOKEN, guess
    )
}

/// Extract the model's boundary guess from a few-shot completion
///
/// The completion mirrors the worked-example shape; the guess is the last
/// non-empty line of the second-to-last delimiter-separated section.
pub fn parse_fewshot_response(response_text: &str) -> Option<String> {
    let sections: Vec<&str> = response_text.split(FEWSHOT_DELIMITER).collect();
    if sections.len() < 2 {
        return None;
    }
    let lines: Vec<&str> = sections[sections.len() - 2].split('\n').collect();
    if lines.len() < 2 {
        return None;
    }
    lines
        .iter()
        .rev()
        .find(|line| !line.trim().is_empty())
        .map(|line| line.to_string())
}

/// The prefix of a boundary guess before the boundary marker, empty when
/// the marker is absent
fn truncate_at_boundary(guess: &str) -> String {
    match guess.find(SENTENCE_BOUNDARY_TOKEN) {
        Some(index) => guess[..index].to_string(),
        None => String::new(),
    }
}

/// First `max_chars` chars of a string
fn char_prefix(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((offset, _)) => &text[..offset],
        None => text,
    }
}
