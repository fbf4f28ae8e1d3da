//! Profanity redaction applied to message bodies before storage and fan-out.
//!
//! [`Censor`] is the seam; [`WordListCensor`] is the built-in implementation.
//! Matching is case-insensitive and sees through common character
//! substitutions (`@` for `a`, `1` for `i`, ...). Every character of a match
//! is replaced by `*`, so the output has the same length in characters as
//! the input.

use std::fmt;

/// Pure text transform that redacts disallowed terms.
pub trait Censor: Send + Sync + fmt::Debug {
    /// Returns `text` with disallowed terms replaced.
    fn censor(&self, text: &str) -> String;
}

const DEFAULT_WORDS: &[&str] = &[
    "anal",
    "anus",
    "arse",
    "asshole",
    "bastard",
    "bitch",
    "bollock",
    "boob",
    "bullshit",
    "clit",
    "cock",
    "cunt",
    "dick",
    "dildo",
    "dumbass",
    "fag",
    "fuck",
    "jackass",
    "jizz",
    "motherfucker",
    "nigga",
    "nigger",
    "penis",
    "piss",
    "porn",
    "pussy",
    "retard",
    "shit",
    "slut",
    "twat",
    "vagina",
    "wank",
    "whore",
];

/// Words containing a listed term that must never be redacted.
const DEFAULT_FALSE_POSITIVES: &[&str] = &[
    "analy",
    "arsenal",
    "canal",
    "cockpit",
    "cockroach",
    "cocktail",
    "dickens",
    "dickinson",
    "hancock",
    "hitchcock",
    "peacock",
    "scunthorpe",
    "shitake",
];

/// Word-list profanity filter.
#[derive(Debug, Clone)]
pub struct WordListCensor {
    words: Vec<Vec<char>>,
    false_positives: Vec<Vec<char>>,
}

impl WordListCensor {
    /// Creates a censor with the built-in lists.
    #[must_use]
    pub fn new() -> Self {
        Self::with_extra_words(&[])
    }

    /// Creates a censor with the built-in lists plus `extra` terms.
    #[must_use]
    pub fn with_extra_words(extra: &[String]) -> Self {
        let words = DEFAULT_WORDS
            .iter()
            .map(|w| normalize(w))
            .chain(extra.iter().map(|w| normalize(w)))
            .filter(|w| !w.is_empty())
            .collect();
        let false_positives = DEFAULT_FALSE_POSITIVES
            .iter()
            .map(|w| normalize(w))
            .collect();
        Self {
            words,
            false_positives,
        }
    }
}

impl Default for WordListCensor {
    fn default() -> Self {
        Self::new()
    }
}

impl Censor for WordListCensor {
    fn censor(&self, text: &str) -> String {
        let original: Vec<char> = text.chars().collect();
        let folded: Vec<char> = original.iter().copied().map(fold_char).collect();

        let protected: Vec<(usize, usize)> = self
            .false_positives
            .iter()
            .flat_map(|fp| occurrences(&folded, fp).map(move |start| (start, start + fp.len())))
            .collect();

        let mut masked = vec![false; original.len()];
        for word in &self.words {
            for start in occurrences(&folded, word) {
                let end = start + word.len();
                let allowed = protected.iter().any(|&(ps, pe)| ps <= start && end <= pe);
                if allowed {
                    continue;
                }
                for flag in masked.iter_mut().skip(start).take(word.len()) {
                    *flag = true;
                }
            }
        }

        original
            .iter()
            .zip(masked)
            .map(|(&c, hide)| if hide { '*' } else { c })
            .collect()
    }
}

fn normalize(word: &str) -> Vec<char> {
    word.trim().chars().map(fold_char).collect()
}

/// Maps one character to its comparison form, keeping a 1:1 char mapping so
/// match offsets line up with the original text.
fn fold_char(c: char) -> char {
    match c {
        '@' | '4' => 'a',
        '3' => 'e',
        '1' | '!' => 'i',
        '0' => 'o',
        '$' | '5' => 's',
        '7' => 't',
        _ => c.to_lowercase().next().unwrap_or(c),
    }
}

fn occurrences<'a>(haystack: &'a [char], needle: &'a [char]) -> impl Iterator<Item = usize> + 'a {
    haystack
        .windows(needle.len().max(1))
        .enumerate()
        .filter(move |(_, window)| !needle.is_empty() && *window == needle)
        .map(|(start, _)| start)
}
