//! English and Russian word lists used by the decision engine's
//! dictionary-lookup stage.
//!
//! The Russian list is stored pre-converted to the sequence of QWERTY
//! characters a Russian keyboard layout's physical keys would produce —
//! the same position mapping `text_transform::invert_layout` uses, just
//! baked in once at load time instead of computed per lookup.

use crate::error::DictionaryError;
use std::collections::HashSet;
use std::path::Path;

const EN_DICT_PATH: &str = "/usr/share/hunspell/en_US.dic";
const RU_DICT_PATH: &str = "/usr/share/hunspell/ru_RU.dic";

const EN_MIN_LEN: usize = 2;
const EN_MAX_LEN: usize = 20;
const RU_MIN_LETTERS: usize = 2;
const RU_MAX_LETTERS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DictResult {
    Unknown,
    English,
    Russian,
    Both,
}

fn cyrillic_to_qwerty_char(c: char) -> Option<char> {
    let lower = c.to_lowercase().next().unwrap_or(c);
    crate::keymap::CYRILLIC_QWERTY_POSITIONS
        .iter()
        .find(|(cyr, _)| *cyr == lower)
        .map(|(_, q)| *q)
}

fn cyrillic_word_to_qwerty(word: &str) -> Option<String> {
    let mut out = String::with_capacity(word.len());
    for c in word.chars() {
        out.push(cyrillic_to_qwerty_char(c)?);
    }
    Some(out)
}

fn extract_word(line: &str) -> &str {
    line.split('/').next().unwrap_or(line).trim()
}

/// Loads a hunspell `.dic` file: the first line is the word-count header
/// and is always skipped.
fn load_hunspell(path: &Path) -> Result<Vec<String>, DictionaryError> {
    let text = std::fs::read_to_string(path).map_err(|e| DictionaryError::Read {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(text.lines().skip(1).map(extract_word).map(String::from).collect())
}

#[derive(Debug, Default, Clone)]
pub struct Dictionary {
    english: HashSet<String>,
    russian_as_qwerty: HashSet<String>,
}

impl Dictionary {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Loads the two well-known hunspell dictionaries. Per the daemon's
    /// degrade-gracefully policy, a missing or unreadable file yields an
    /// empty word set for that language rather than failing the whole
    /// load — callers should log the individual error themselves.
    pub fn load_default() -> Self {
        Self::load_from(Path::new(EN_DICT_PATH), Path::new(RU_DICT_PATH))
    }

    pub fn load_from(en_path: &Path, ru_path: &Path) -> Self {
        let english = load_hunspell(en_path)
            .unwrap_or_default()
            .into_iter()
            .map(|w| w.to_lowercase())
            .filter(|w| w.chars().count() >= EN_MIN_LEN && w.chars().count() <= EN_MAX_LEN)
            .filter(|w| w.is_ascii())
            .collect();

        let russian_as_qwerty = load_hunspell(ru_path)
            .unwrap_or_default()
            .into_iter()
            .filter(|w| {
                let len = w.chars().count();
                len >= RU_MIN_LETTERS && len <= RU_MAX_LETTERS
            })
            .filter_map(|w| cyrillic_word_to_qwerty(&w))
            .collect();

        Dictionary {
            english,
            russian_as_qwerty,
        }
    }

    /// Looks up a word already typed as a sequence of QWERTY characters
    /// (i.e. exactly as it arrived from the keyboard, regardless of which
    /// layout the user intended).
    pub fn lookup(&self, qwerty_word: &str) -> DictResult {
        let word = qwerty_word.to_lowercase();
        let is_en = self.english.contains(&word);
        let is_ru = self.russian_as_qwerty.contains(&word);
        match (is_en, is_ru) {
            (true, true) => DictResult::Both,
            (true, false) => DictResult::English,
            (false, true) => DictResult::Russian,
            (false, false) => DictResult::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_word_before_flags() {
        assert_eq!(extract_word("hello/S"), "hello");
        assert_eq!(extract_word("hello"), "hello");
    }

    #[test]
    fn cyrillic_to_qwerty_matches_known_mapping() {
        assert_eq!(cyrillic_word_to_qwerty("привет"), Some("ghbdtn".to_string()));
    }

    #[test]
    fn missing_files_degrade_to_empty_dictionary() {
        let dict = Dictionary::load_from(
            Path::new("/nonexistent/en.dic"),
            Path::new("/nonexistent/ru.dic"),
        );
        assert_eq!(dict.lookup("hello"), DictResult::Unknown);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let mut dict = Dictionary::empty();
        dict.english.insert("hello".to_string());
        assert_eq!(dict.lookup("HELLO"), DictResult::English);
    }
}
