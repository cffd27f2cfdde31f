//! "Smart bypass" rules: patterns that look like code or identifiers
//! rather than prose, which auto-invert should leave alone even when the
//! dictionary and n-gram scorer would otherwise flag them.
//!
//! Checked in order; the first rule that matches wins. The order matters
//! — a `snake_case_url/path` should report as a URL, not a snake_case
//! identifier, and a too-short word short-circuits before any of the
//! pattern checks run.

use crate::keymap::char_for;
use crate::scancode::KeyEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BypassReason {
    TooShort,
    UrlDetected,
    SnakeCaseDetected,
    AllCapsAcronym,
    CamelCaseDetected,
}

const MIN_BYPASS_CHECK_LEN: usize = 2;

fn chars(word: &[KeyEntry]) -> Vec<char> {
    word.iter()
        .filter_map(|e| char_for(e.code, e.shifted))
        .collect()
}

pub fn check(word: &[KeyEntry]) -> Option<BypassReason> {
    let chars = chars(word);
    if chars.len() < MIN_BYPASS_CHECK_LEN {
        return Some(BypassReason::TooShort);
    }
    if contains_url_or_path_chars(&chars) {
        return Some(BypassReason::UrlDetected);
    }
    if chars.contains(&'_') {
        return Some(BypassReason::SnakeCaseDetected);
    }
    if is_all_caps_acronym(&chars) {
        return Some(BypassReason::AllCapsAcronym);
    }
    if is_camel_or_pascal_case(&chars) {
        return Some(BypassReason::CamelCaseDetected);
    }
    None
}

fn contains_url_or_path_chars(chars: &[char]) -> bool {
    if chars.first() == Some(&'.') {
        return true;
    }
    if chars.iter().filter(|c| **c == '/').count() >= 1 {
        return true;
    }
    if chars.contains(&'@') {
        return true;
    }
    if chars.contains(&':') && chars.len() >= 2 {
        return true;
    }
    if chars.len() >= 3 {
        let prefix: String = chars.iter().take(3).collect::<String>().to_lowercase();
        if prefix == "www" || prefix == "htt" || prefix == "ftp" {
            return true;
        }
    }
    false
}

fn is_all_caps_acronym(chars: &[char]) -> bool {
    if !(2..=5).contains(&chars.len()) {
        return false;
    }
    chars.iter().all(|c| c.is_ascii_uppercase())
}

fn is_camel_or_pascal_case(chars: &[char]) -> bool {
    let has_lower = chars.iter().any(|c| c.is_ascii_lowercase());
    let has_upper = chars.iter().any(|c| c.is_ascii_uppercase());
    if !(has_lower && has_upper) {
        return false;
    }
    // A genuine camelCase/PascalCase transition: a lowercase letter
    // directly followed by an uppercase one somewhere in the word.
    chars
        .windows(2)
        .any(|w| w[0].is_ascii_lowercase() && w[1].is_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(s: &str) -> Vec<KeyEntry> {
        s.chars()
            .map(|c| {
                let lower = c.to_ascii_lowercase();
                let code = "qwertyuiopasdfghjklzxcvbnm"
                    .find(lower)
                    .map(|i| {
                        const CODES: [u16; 26] = [
                            16, 17, 18, 19, 20, 21, 22, 23, 24, 25, 30, 31, 32, 33, 34, 35, 36,
                            37, 38, 44, 45, 46, 47, 48, 49, 50,
                        ];
                        CODES[i]
                    })
                    .unwrap_or(12);
                KeyEntry::new(code, c.is_ascii_uppercase())
            })
            .collect()
    }

    #[test]
    fn too_short_wins_over_everything_else() {
        assert_eq!(check(&word("a")), Some(BypassReason::TooShort));
    }

    #[test]
    fn all_caps_short_word_is_acronym() {
        assert_eq!(check(&word("HTML")), Some(BypassReason::AllCapsAcronym));
    }

    #[test]
    fn camel_case_detected() {
        assert_eq!(
            check(&word("myVariable")),
            Some(BypassReason::CamelCaseDetected)
        );
    }

    #[test]
    fn pascal_case_detected() {
        assert_eq!(
            check(&word("MyClass")),
            Some(BypassReason::CamelCaseDetected)
        );
    }

    #[test]
    fn plain_lowercase_word_is_not_bypassed() {
        assert_eq!(check(&word("hello")), None);
    }
}
