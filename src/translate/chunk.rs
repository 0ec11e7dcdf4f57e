/*!
 * Heuristic sentence chunking.
 *
 * Used when no dedicated sentence-segmentation model is available. A probe
 * translation is applied to the unconsumed input; the probe's model was
 * trained to stop at a sentence boundary, so the point where its output
 * stops corresponding to the input marks the end of one sentence. The
 * correspondence is found by scanning input prefixes for the best string
 * similarity against the probe output.
 *
 * This is a fallback of last resort; a bundled sentence splitter is always
 * preferred when the package ships one.
 */

use crate::errors::TranslateError;
use crate::similarity::match_ratio;

/// Minimum similarity ratio a prefix must exceed to count as a boundary
const MIN_BOUNDARY_RATIO: f64 = 0.5;

/// Split text into sentence-sized chunks using a probe translation
///
/// `probe` translates a prefix of the remaining input up to (roughly) one
/// sentence. The best-matching input prefix, scanned up to twice the probe
/// output's length, becomes the next chunk. When no prefix beats the
/// similarity floor, or the probe returns nothing, the entire remaining
/// input is consumed as one chunk, which guarantees termination.
pub fn chunk<F>(input_text: &str, mut probe: F) -> Result<Vec<String>, TranslateError>
where
    F: FnMut(&str) -> Result<String, TranslateError>,
{
    let mut chunks = Vec::new();
    let mut remaining: &str = input_text;

    while !remaining.trim().is_empty() {
        let translated = probe(remaining)?;
        let translated_len = translated.chars().count();

        let remaining_chars: Vec<(usize, char)> = remaining.char_indices().collect();
        let remaining_len = remaining_chars.len();

        // Scan prefixes for the best alignment against the probe output
        let mut best_char_count = remaining_len;
        let mut best_ratio = MIN_BOUNDARY_RATIO;
        for i in 0..(translated_len * 2) {
            if i > remaining_len {
                break;
            }
            let candidate = prefix_of(remaining, &remaining_chars, i);
            let ratio = match_ratio(candidate, &translated);
            if ratio > best_ratio {
                best_char_count = i;
                best_ratio = ratio;
            }
        }

        // An empty prefix can never win (ratio 0 against non-empty probe
        // output), but guard against zero progress anyway.
        if best_char_count == 0 {
            best_char_count = remaining_len;
        }

        let boundary = byte_offset(remaining, &remaining_chars, best_char_count);
        chunks.push(remaining[..boundary].to_string());
        remaining = &remaining[boundary..];
    }

    Ok(chunks)
}

/// The prefix holding the first `char_count` chars
fn prefix_of<'a>(text: &'a str, chars: &[(usize, char)], char_count: usize) -> &'a str {
    &text[..byte_offset(text, chars, char_count)]
}

/// Byte offset just past the first `char_count` chars
fn byte_offset(text: &str, chars: &[(usize, char)], char_count: usize) -> usize {
    chars
        .get(char_count)
        .map(|(offset, _)| *offset)
        .unwrap_or(text.len())
}
