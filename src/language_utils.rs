use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for ISO language code handling
///
/// Package metadata usually carries display names for both endpoints, but
/// some packages omit them; these helpers resolve a name from the ISO 639-1
/// (2-letter) or ISO 639-3 (3-letter) code instead.
/// Get the English display name for a language code
pub fn get_language_name(code: &str) -> Result<String> {
    let normalized = code.trim().to_lowercase();

    let language = match normalized.len() {
        2 => Language::from_639_1(&normalized),
        3 => Language::from_639_3(&normalized),
        _ => None,
    };

    language
        .map(|lang| lang.to_name().to_string())
        .ok_or_else(|| anyhow!("Unknown language code: {}", code))
}

/// Get the display name for a code, falling back to the code itself when
/// it is not a recognized ISO 639 identifier
pub fn display_name_or_code(code: &str) -> String {
    get_language_name(code).unwrap_or_else(|_| code.to_string())
}
