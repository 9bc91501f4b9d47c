use std::collections::HashSet;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::WordFrequencyRecord;

pub const DEFAULT_TOP_N: usize = 10;

/// Common English words. Not applied unless passed in [`RankOptions::stop_words`].
pub const DEFAULT_STOP_WORDS: &[&str] = &[
    "the", "be", "to", "of", "and", "a", "in", "that", "have", "i", "it", "for", "not", "on",
    "with", "he", "as", "you", "do", "at",
];

static NON_WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\W+").unwrap());
static ALL_DIGITS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").unwrap());

#[derive(Debug, Clone)]
pub struct RankOptions {
    pub top_n: usize,
    /// Lowercase words to drop before counting. `None` keeps every word.
    pub stop_words: Option<HashSet<String>>,
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            stop_words: None,
        }
    }
}

impl RankOptions {
    pub fn with_default_stop_words(mut self) -> Self {
        self.stop_words = Some(DEFAULT_STOP_WORDS.iter().map(|w| w.to_string()).collect());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ranking {
    /// Every surviving token, repeats included.
    pub total: usize,
    /// Most frequent words, count descending; ties keep first-seen order.
    pub top: Vec<WordFrequencyRecord>,
}

pub fn tokenize(fragment: &str) -> Vec<String> {
    let lower = fragment.to_lowercase();
    NON_WORD_RE
        .split(&lower)
        .filter(|token| is_word(token))
        .map(str::to_string)
        .collect()
}

/// Drops empty, single-character and all-digit tokens.
fn is_word(token: &str) -> bool {
    token.chars().nth(1).is_some() && !ALL_DIGITS_RE.is_match(token)
}

pub fn rank<S: AsRef<str>>(fragments: &[S], options: &RankOptions) -> Ranking {
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for fragment in fragments {
        for token in tokenize(fragment.as_ref()) {
            if let Some(stop) = &options.stop_words {
                if stop.contains(&token) {
                    continue;
                }
            }
            *counts.entry(token).or_insert(0) += 1;
        }
    }

    let total = counts.values().sum();

    let mut entries: Vec<(String, usize)> = counts.into_iter().collect();
    // Stable: equal counts stay in first-seen order.
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    entries.truncate(options.top_n);

    Ranking {
        total,
        top: entries
            .into_iter()
            .map(|(word, count)| WordFrequencyRecord { word, count })
            .collect(),
    }
}
