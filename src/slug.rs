use std::sync::OnceLock;

use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

fn sound_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("static pattern compiles"))
}

/// True if `name` is usable as a sound base name: ASCII letters, digits, `_` and `-`
pub fn is_valid_sound_name(name: &str) -> bool {
    sound_name_pattern().is_match(name)
}

/// Convert an imported file stem into a valid sound base name
/// - Strips diacritics via Unicode NFD decomposition
/// - Maps letters NFD leaves intact (ı, ğ, ş, ø, ß...) to ASCII
/// - Replaces spaces, dots and other characters with underscores
/// - Collapses multiple underscores
/// - Trims leading/trailing underscores
pub fn soundify(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut last_was_underscore = false;

    for ch in input.nfd() {
        if is_combining_mark(ch) {
            continue;
        }

        let mapped: &str = match ch {
            'ğ' => "g",
            'ı' => "i",
            'ş' => "s",
            'Ğ' => "G",
            'İ' => "I",
            'Ş' => "S",
            'ø' => "o",
            'Ø' => "O",
            'ł' => "l",
            'Ł' => "L",
            'ß' => "ss",
            'æ' => "ae",
            'Æ' => "AE",
            _ => {
                if ch.is_ascii_alphanumeric() || ch == '-' {
                    let mut buf = [0u8; 4];
                    result.push_str(ch.encode_utf8(&mut buf));
                    last_was_underscore = false;
                } else if ch == '_' || ch.is_whitespace() || !ch.is_control() {
                    if !last_was_underscore && !result.is_empty() {
                        result.push('_');
                        last_was_underscore = true;
                    }
                }
                continue;
            }
        };

        result.push_str(mapped);
        last_was_underscore = false;
    }

    if result.ends_with('_') {
        result.pop();
    }

    result
}
