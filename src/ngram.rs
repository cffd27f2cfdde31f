//! N-gram frequency scoring: the fallback the decision engine reaches for
//! when a word isn't in either dictionary.
//!
//! The tables below are a curated, representative subset of English and
//! Russian bigram/trigram frequencies, not the large generated corpus the
//! original ships — enough to score common patterns correctly and to
//! exercise the scoring formula's edge cases in tests.

use std::collections::HashSet;

const BIGRAM_WEIGHT: f64 = 1.0;
const TRIGRAM_WEIGHT: f64 = 1.5;
const INVALID_BIGRAM_PENALTY: f64 = -15.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lang {
    English,
    Russian,
}

#[derive(Debug, Clone)]
pub struct NgramTables {
    en_bigrams: Vec<(char, char, f64)>,
    en_invalid_bigrams: HashSet<(char, char)>,
    ru_bigrams: Vec<(char, char, f64)>,
    ru_invalid_bigrams: HashSet<(char, char)>,
}

impl Default for NgramTables {
    fn default() -> Self {
        NgramTables {
            en_bigrams: vec![
                ('t', 'h', 3.0),
                ('h', 'e', 3.0),
                ('i', 'n', 2.5),
                ('e', 'r', 2.5),
                ('a', 'n', 2.0),
                ('r', 'e', 2.0),
                ('o', 'n', 2.0),
                ('a', 't', 1.5),
                ('e', 'n', 1.5),
                ('n', 'd', 1.5),
                ('s', 't', 1.5),
                ('e', 's', 1.5),
                ('o', 'r', 1.5),
            ],
            en_invalid_bigrams: ["qz", "jq", "xq", "vq", "qx"]
                .iter()
                .map(|s| {
                    let mut chars = s.chars();
                    (chars.next().unwrap(), chars.next().unwrap())
                })
                .collect(),
            ru_bigrams: vec![
                ('g', 'h', 2.5), // ст
                ('e', 'y', 2.0), // ен
                ('c', 't', 2.0), // со
                ('j', 'n', 1.5), // от
                ('b', 'p', 1.5), // из
            ],
            ru_invalid_bigrams: ["qq", "zz"]
                .iter()
                .map(|s| {
                    let mut chars = s.chars();
                    (chars.next().unwrap(), chars.next().unwrap())
                })
                .collect(),
        }
    }
}

impl NgramTables {
    pub fn new() -> Self {
        Self::default()
    }

    fn bigram_weight(&self, lang: Lang, a: char, b: char) -> f64 {
        let (table, invalid) = match lang {
            Lang::English => (&self.en_bigrams, &self.en_invalid_bigrams),
            Lang::Russian => (&self.ru_bigrams, &self.ru_invalid_bigrams),
        };
        if invalid.contains(&(a, b)) {
            return INVALID_BIGRAM_PENALTY;
        }
        table
            .iter()
            .find(|(x, y, _)| *x == a && *y == b)
            .map(|(_, _, w)| *w)
            .unwrap_or(0.0)
    }

    fn trigram_weight(&self, lang: Lang, a: char, b: char, c: char) -> f64 {
        // Trigram hits are derived from two overlapping bigram hits
        // scaled by the trigram weight; a curated corpus this small
        // doesn't carry standalone trigram frequencies.
        let first = self.bigram_weight(lang, a, b);
        let second = self.bigram_weight(lang, b, c);
        if first <= 0.0 || second <= 0.0 {
            return 0.0;
        }
        (first + second) / 2.0
    }

    /// Scores `word` (lowercase ASCII characters, already the string the
    /// physical keys produced) against `lang`'s n-gram tables.
    ///
    /// Mirrors the original scorer: bigram hits contribute at weight
    /// 1.0 (or a flat -15 penalty for a known-invalid pair), trigram hits
    /// at weight 1.5, and the sum is normalised by the number of n-grams
    /// a word of this length is expected to contain. Never negative.
    pub fn score(&self, word: &str, lang: Lang) -> f64 {
        let chars: Vec<char> = word.chars().collect();
        let len = chars.len();
        if len < 2 {
            return 0.0;
        }

        let mut total = 0.0;
        for w in chars.windows(2) {
            total += BIGRAM_WEIGHT * self.bigram_weight(lang, w[0], w[1]);
        }
        if len >= 3 {
            for w in chars.windows(3) {
                total += TRIGRAM_WEIGHT * self.trigram_weight(lang, w[0], w[1], w[2]);
            }
        }

        let expected = if len >= 3 {
            ((len - 1) + (len - 2)) as f64
        } else {
            (len - 1) as f64
        };
        if expected <= 0.0 {
            return 0.0;
        }

        (total / expected).max(0.0)
    }
}

/// Letters only, no digits, and only the handful of punctuation marks
/// the original scorer tolerates inside a word it's willing to score.
pub fn has_only_scoreable_chars(word: &str) -> bool {
    word.chars()
        .all(|c| c.is_ascii_alphabetic() || ",.;'[]`-".contains(c))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NgramDecision {
    NoSwitch,
    Switch(Lang),
}

/// Applies the decision rule: if the best score for either language is
/// below `min_score`, stay put. Otherwise prefer the higher-scoring
/// language, but only switch away from the current guess if it clears
/// `threshold` times the other language's score (or the other language
/// scored exactly zero).
pub fn analyze(
    tables: &NgramTables,
    word: &str,
    min_score: f64,
    threshold: f64,
) -> NgramDecision {
    let en_score = tables.score(word, Lang::English);
    let ru_score = tables.score(word, Lang::Russian);
    let max_score = en_score.max(ru_score);

    if max_score < min_score {
        return NgramDecision::NoSwitch;
    }

    let (winner, winner_score, loser_score) = if en_score >= ru_score {
        (Lang::English, en_score, ru_score)
    } else {
        (Lang::Russian, ru_score, en_score)
    };

    if loser_score == 0.0 || winner_score / loser_score.max(f64::EPSILON) >= threshold {
        NgramDecision::Switch(winner)
    } else {
        NgramDecision::NoSwitch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scores_a_common_english_bigram() {
        let tables = NgramTables::new();
        let score = tables.score("the", Lang::English);
        assert!(score > 0.0);
    }

    #[test]
    fn invalid_bigram_is_penalized_but_clamped_nonnegative() {
        let tables = NgramTables::new();
        let score = tables.score("qz", Lang::English);
        assert_eq!(score, 0.0);
    }

    #[test]
    fn short_word_scores_zero() {
        let tables = NgramTables::new();
        assert_eq!(tables.score("a", Lang::English), 0.0);
    }

    #[test]
    fn below_min_score_means_no_switch() {
        let tables = NgramTables::new();
        assert_eq!(
            analyze(&tables, "zzzzz", 1.0, 1.3),
            NgramDecision::NoSwitch
        );
    }

    #[test]
    fn clear_english_winner_switches() {
        let tables = NgramTables::new();
        assert_eq!(
            analyze(&tables, "the", 0.5, 1.3),
            NgramDecision::Switch(Lang::English)
        );
    }
}
