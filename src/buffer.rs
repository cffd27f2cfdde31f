//! The current and last-committed word, tracked one keystroke at a time.

use crate::scancode::KeyEntry;

const MAX_WORD_LEN: usize = 256;

/// Tracks the word currently being typed plus the word that preceded it.
///
/// `last_word` only ever becomes the previous `current` on a real word
/// boundary (`commit_word`); it is left untouched if the current word is
/// empty, so repeated whitespace doesn't erase the word auto-invert is
/// still acting on.
#[derive(Debug, Default, Clone)]
pub struct InputBuffer {
    current: Vec<KeyEntry>,
    last_word: Vec<KeyEntry>,
    trailing: Vec<KeyEntry>,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a key to the current word. Silently drops keys past the
    /// capacity rather than erroring — a 256-key word has already stopped
    /// being meaningful input.
    pub fn push_char(&mut self, entry: KeyEntry) {
        if self.current.is_empty() {
            self.trailing.clear();
        }
        if self.current.len() < MAX_WORD_LEN {
            self.current.push(entry);
        }
    }

    pub fn pop_char(&mut self) -> Option<KeyEntry> {
        self.current.pop()
    }

    /// Moves the current word into `last_word` and starts a new one. A
    /// no-op when the current word is empty, matching the original's
    /// choice not to clear `last_word` on back-to-back delimiters.
    pub fn commit_word(&mut self) {
        if self.current.is_empty() {
            return;
        }
        self.last_word = std::mem::take(&mut self.current);
    }

    pub fn reset_all(&mut self) {
        self.current.clear();
        self.last_word.clear();
        self.trailing.clear();
    }

    pub fn reset_current(&mut self) {
        self.current.clear();
    }

    pub fn reset_trailing(&mut self) {
        self.trailing.clear();
    }

    pub fn push_trailing(&mut self, entry: KeyEntry) {
        self.trailing.push(entry);
    }

    pub fn trailing(&self) -> &[KeyEntry] {
        &self.trailing
    }

    pub fn current(&self) -> &[KeyEntry] {
        &self.current
    }

    pub fn last_word(&self) -> &[KeyEntry] {
        &self.last_word
    }

    /// The word auto-invert and the hotkeys act on: the word still being
    /// typed if there is one, otherwise the one just committed.
    pub fn active_word(&self) -> &[KeyEntry] {
        if !self.current.is_empty() {
            &self.current
        } else {
            &self.last_word
        }
    }

    pub fn is_current_empty(&self) -> bool {
        self.current.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: u16) -> KeyEntry {
        KeyEntry::new(code, false)
    }

    #[test]
    fn commit_word_is_noop_on_empty_current() {
        let mut buf = InputBuffer::new();
        buf.push_char(key(30));
        buf.commit_word();
        assert_eq!(buf.last_word().len(), 1);
        buf.commit_word();
        assert_eq!(buf.last_word().len(), 1);
    }

    #[test]
    fn active_word_prefers_current() {
        let mut buf = InputBuffer::new();
        buf.push_char(key(30));
        buf.commit_word();
        buf.push_char(key(31));
        assert_eq!(buf.active_word(), &[key(31)]);
    }

    #[test]
    fn active_word_falls_back_to_last_word() {
        let mut buf = InputBuffer::new();
        buf.push_char(key(30));
        buf.commit_word();
        assert_eq!(buf.active_word(), &[key(30)]);
    }

    #[test]
    fn push_char_clears_trailing_on_empty_to_nonempty_transition() {
        let mut buf = InputBuffer::new();
        buf.push_trailing(key(1));
        buf.push_char(key(30));
        assert!(buf.trailing().is_empty());
    }

    #[test]
    fn capacity_is_bounded() {
        let mut buf = InputBuffer::new();
        for _ in 0..300 {
            buf.push_char(key(30));
        }
        assert_eq!(buf.current().len(), MAX_WORD_LEN);
    }
}
