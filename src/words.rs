//! Word extraction and aggregation.
//!
//! Reviews are split on whitespace, each piece is stripped of ASCII
//! punctuation and emoji, lowercased, and kept only if more than one
//! character survives. The resulting token sequence is then either handed to
//! the renderer as is ([`Aggregation::Flat`]) or folded into a
//! [`FrequencyTable`] ([`Aggregation::Unique`]).

use std::collections::HashMap;

use clap::ValueEnum;
use lazy_static::lazy_static;
use regex::Regex;

use crate::error::EmptyInputError;
use crate::report::ReviewRecord;
use crate::stopwords::Stopwords;

lazy_static! {
    static ref EMOJI_RE: Regex = Regex::new(
        r"[\p{Extended_Pictographic}\p{Emoji_Presentation}\p{Emoji_Modifier}\x{1F1E6}-\x{1F1FF}\x{200D}\x{FE0E}\x{FE0F}\x{20E3}\x{E0020}-\x{E007F}]"
    )
    .unwrap();
}

///Cleans a single whitespace-free token: drops ASCII punctuation and emoji, then lowercases.
/// # Example
/// ```
/// use review_cloud::clean_word;
/// assert_eq!(clean_word("App!😀"), "app");
/// assert_eq!(clean_word("don't"), "dont");
/// ```
pub fn clean_word(raw: &str) -> String {
    let without_punctuation: String = raw.chars().filter(|c| !c.is_ascii_punctuation()).collect();
    EMOJI_RE
        .replace_all(&without_punctuation, "")
        .to_lowercase()
}

///Extracts the tokens of one review, in order. Tokens of one character or less after cleaning are dropped.
/// # Example
/// ```
/// use review_cloud::extract_words;
/// assert_eq!(extract_words("a b. cc"), vec!["cc".to_string()]);
/// ```
pub fn extract_words(review_text: &str) -> Vec<String> {
    review_text
        .split_whitespace()
        .map(clean_word)
        .filter(|w| w.chars().count() > 1)
        .collect()
}

/// Token sequence of all reviews, in record order.
pub fn extract_words_from_reviews(reviews: &[ReviewRecord]) -> Vec<String> {
    reviews
        .iter()
        .filter_map(|r| r.review_text.as_deref())
        .flat_map(extract_words)
        .collect()
}

///Joins tokens with single spaces. Fails when there is nothing to join.
pub fn join_tokens(tokens: &[String]) -> Result<String, EmptyInputError> {
    if tokens.is_empty() {
        return Err(EmptyInputError::NoTokens { reviews: 0 });
    }
    Ok(tokens.join(" "))
}

/// How tokens are handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Aggregation {
    /// Every occurrence, duplicates and stopwords included
    #[default]
    Flat,
    /// Exact-match tokens folded into counts, stopwords removed
    Unique,
}

/// Word counts, stopwords excluded. Built once and read-only afterwards.
///
/// Only character-identical tokens share a key: "car" and "cars" are counted
/// separately. No stemming happens anywhere in the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: HashMap<String, u32>,
}

impl FrequencyTable {
    /// Counts a space-joined token string (see [`join_tokens`]).
    pub fn from_text(text: &str, stopwords: &Stopwords) -> Self {
        Self::from_tokens(text.split(' ').filter(|t| !t.is_empty()), stopwords)
    }

    pub fn from_tokens<I, S>(tokens: I, stopwords: &Stopwords) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let counts = tokens
            .into_iter()
            .map(|t| t.as_ref().to_lowercase())
            .filter(|t| !stopwords.contains(t))
            .fold(HashMap::new(), |mut acc, t| {
                *acc.entry(t).or_insert(0) += 1;
                acc
            });
        Self { counts }
    }

    pub fn get(&self, word: &str) -> Option<u32> {
        self.counts.get(word).copied()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.counts.iter().map(|(w, c)| (w.as_str(), *c))
    }

    ///Sorts entries by descending count; ties are ordered alphabetically.
    /// # Example
    /// ```
    /// use review_cloud::{FrequencyTable, Stopwords};
    /// let table = FrequencyTable::from_tokens(["two", "one", "two", "three"], &Stopwords::empty());
    /// let sorted = table.sorted();
    /// assert_eq!(sorted[0], ("two".to_string(), 2));
    /// assert_eq!(sorted[1], ("one".to_string(), 1));
    /// assert_eq!(sorted[2], ("three".to_string(), 1));
    /// ```
    pub fn sorted(&self) -> Vec<(String, u32)> {
        sort_counts(self.iter().map(|(w, c)| (w.to_string(), c)).collect())
    }
}

impl From<HashMap<String, u32>> for FrequencyTable {
    fn from(counts: HashMap<String, u32>) -> Self {
        Self {
            counts: counts.into_iter().filter(|(_, c)| *c > 0).collect(),
        }
    }
}

pub(crate) fn sort_counts(mut counts: Vec<(String, u32)>) -> Vec<(String, u32)> {
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts
}

/// What the renderer receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloudWords {
    /// Raw token sequence; the renderer counts and filters it itself.
    Flat(Vec<String>),
    /// Pre-counted words.
    Unique(FrequencyTable),
}

impl CloudWords {
    /// Number of distinct words carried.
    pub fn distinct(&self) -> usize {
        match self {
            CloudWords::Flat(tokens) => {
                let mut seen: Vec<&str> = tokens.iter().map(String::as_str).collect();
                seen.sort_unstable();
                seen.dedup();
                seen.len()
            }
            CloudWords::Unique(table) => table.len(),
        }
    }
}

/// Builds the renderer input from the full token sequence.
///
/// An empty sequence fails in both modes, before anything is rendered.
pub fn aggregate(
    tokens: Vec<String>,
    mode: Aggregation,
    stopwords: &Stopwords,
) -> Result<CloudWords, EmptyInputError> {
    let joined = join_tokens(&tokens)?;
    Ok(match mode {
        Aggregation::Flat => CloudWords::Flat(tokens),
        Aggregation::Unique => CloudWords::Unique(FrequencyTable::from_text(&joined, stopwords)),
    })
}
