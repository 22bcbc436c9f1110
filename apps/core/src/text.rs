//! Text normalization applied before any title comparison.
//!
//! Browser titles mix precomposed and decomposed kana, and some pages use the
//! legacy spacing voiced sound marks (U+309B, U+309C) where the combining
//! marks belong. Both spellings must compare equal, which plain lowercasing
//! does not give us.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

const SPACING_VOICED_MARK: char = '\u{309B}';
const SPACING_SEMI_VOICED_MARK: char = '\u{309C}';
const COMBINING_VOICED_MARK: char = '\u{3099}';
const COMBINING_SEMI_VOICED_MARK: char = '\u{309A}';

/// Maps the spacing voiced marks to their combining forms, then composes (NFC).
pub fn normalize(input: &str) -> String {
    input
        .chars()
        .map(|c| match c {
            SPACING_VOICED_MARK => COMBINING_VOICED_MARK,
            SPACING_SEMI_VOICED_MARK => COMBINING_SEMI_VOICED_MARK,
            other => other,
        })
        .nfc()
        .collect()
}

/// Normalized and lowercased, the form every title comparison uses.
pub fn fold_for_match(input: &str) -> String {
    normalize(input).to_lowercase()
}

/// Anything that is not a JSON string normalizes to an empty string.
pub fn normalize_value(value: &Value) -> String {
    value.as_str().map(normalize).unwrap_or_default()
}

/// Serde helper for source replies where a title may come back as `null` or
/// some other non-string value.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_str().map(str::to_string).unwrap_or_default())
}

/// Sort key approximating a locale-aware, accent- and case-insensitive compare.
pub fn collation_key(input: &str) -> String {
    normalize(input)
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}
