//! Reversible encodings source sites use to hide plain URLs.
//!
//! Only trivial obfuscation is handled here: base64 arguments to `atob()` and
//! `\xNN` / `\uNNNN` escapes inside script text.

use base64::{Engine as _, engine::general_purpose};
use regex::{Captures, Regex};
use std::sync::OnceLock;

fn escape_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\\x([0-9a-fA-F]{2})|\\u([0-9a-fA-F]{4})").expect("escape pattern is valid")
    })
}

/// Decode a base64 string into UTF-8 text.
///
/// Tries the standard and URL-safe alphabets, padded and unpadded. Returns
/// `None` if nothing decodes or the payload is not valid UTF-8.
pub fn decode_base64(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    let engines = [
        &general_purpose::STANDARD,
        &general_purpose::STANDARD_NO_PAD,
        &general_purpose::URL_SAFE,
        &general_purpose::URL_SAFE_NO_PAD,
    ];

    engines
        .iter()
        .find_map(|engine| engine.decode(trimmed).ok())
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .map(|decoded| decoded.trim().to_string())
        .filter(|decoded| !decoded.is_empty())
}

/// True when `text` contains at least one `\xNN` or `\uNNNN` escape
pub fn has_js_escapes(text: &str) -> bool {
    escape_pattern().is_match(text)
}

/// Replace `\xNN` and `\uNNNN` escapes with the characters they encode.
/// Escapes that do not form a valid `char` are left untouched.
pub fn unescape_js(text: &str) -> String {
    escape_pattern()
        .replace_all(text, |caps: &Captures| {
            let hex = caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str());
            hex.and_then(|h| u32::from_str_radix(h, 16).ok())
                .and_then(char::from_u32)
                .map(String::from)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
