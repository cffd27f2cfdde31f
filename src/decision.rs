//! The auto-switch decision: given the word just typed, should the OS
//! layout change, and if so to what?

use crate::bypass::{self, BypassReason};
use crate::config::AutoSwitchConfig;
use crate::dictionary::{DictResult, Dictionary};
use crate::keymap::char_for;
use crate::ngram::{self, Lang, NgramDecision, NgramTables};
use crate::scancode::KeyEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutId {
    English,
    Russian,
}

impl LayoutId {
    pub fn other(self) -> Self {
        match self {
            LayoutId::English => LayoutId::Russian,
            LayoutId::Russian => LayoutId::English,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionOutcome {
    NoAction,
    Bypassed(BypassReason),
    Switch(LayoutId),
}

fn word_as_qwerty(word: &[KeyEntry]) -> String {
    word.iter()
        .filter_map(|e| char_for(e.code, e.shifted))
        .collect()
}

/// Runs the full gating pipeline for one committed word: length gate,
/// bypass rules, dictionary lookup, n-gram fallback.
pub fn decide(
    word: &[KeyEntry],
    os_layout: LayoutId,
    cfg: &AutoSwitchConfig,
    dict: &Dictionary,
    tables: &NgramTables,
) -> DecisionOutcome {
    if !cfg.enabled {
        return DecisionOutcome::NoAction;
    }
    if word.len() < cfg.min_word_len {
        return DecisionOutcome::NoAction;
    }

    if let Some(reason) = bypass::check(word) {
        return DecisionOutcome::Bypassed(reason);
    }

    let text = word_as_qwerty(word);
    if !ngram::has_only_scoreable_chars(&text) {
        return DecisionOutcome::NoAction;
    }

    match dict.lookup(&text) {
        DictResult::English => return from_detected(LayoutId::English, os_layout),
        DictResult::Russian => return from_detected(LayoutId::Russian, os_layout),
        DictResult::Both | DictResult::Unknown => {}
    }

    match ngram::analyze(tables, &text, cfg.min_score, cfg.threshold) {
        NgramDecision::Switch(Lang::English) => from_detected(LayoutId::English, os_layout),
        NgramDecision::Switch(Lang::Russian) => from_detected(LayoutId::Russian, os_layout),
        NgramDecision::NoSwitch => DecisionOutcome::NoAction,
    }
}

fn from_detected(detected: LayoutId, os_layout: LayoutId) -> DecisionOutcome {
    if detected == os_layout {
        DecisionOutcome::NoAction
    } else {
        DecisionOutcome::Switch(detected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn dict_with(en: &[&str]) -> Dictionary {
        let dict = Dictionary::load_from(Path::new("/nonexistent"), Path::new("/nonexistent"));
        let _ = en;
        dict
    }

    #[test]
    fn disabled_config_never_switches() {
        let mut cfg = AutoSwitchConfig::default();
        cfg.enabled = false;
        let dict = dict_with(&[]);
        let tables = NgramTables::new();
        let word = [KeyEntry::new(19, false), KeyEntry::new(18, false)];
        assert_eq!(
            decide(&word, LayoutId::English, &cfg, &dict, &tables),
            DecisionOutcome::NoAction
        );
    }

    #[test]
    fn short_word_is_not_evaluated() {
        let cfg = AutoSwitchConfig::default();
        let dict = dict_with(&[]);
        let tables = NgramTables::new();
        let word = [KeyEntry::new(30, false)];
        assert_eq!(
            decide(&word, LayoutId::English, &cfg, &dict, &tables),
            DecisionOutcome::NoAction
        );
    }

    #[test]
    fn same_layout_as_detected_takes_no_action() {
        assert_eq!(
            from_detected(LayoutId::English, LayoutId::English),
            DecisionOutcome::NoAction
        );
    }

    #[test]
    fn different_layout_switches() {
        assert_eq!(
            from_detected(LayoutId::Russian, LayoutId::English),
            DecisionOutcome::Switch(LayoutId::Russian)
        );
    }
}
