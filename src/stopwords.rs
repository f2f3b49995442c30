//! Stopword set shared by the aggregator and the renderer.
//!
//! The set is built once, up front, and handed to whoever needs it. It is
//! never mutated afterwards. Entries go through the same cleaning as review
//! tokens, so "don't" is stored as "dont" and matches what the tokenizer emits.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;

use crate::words::clean_word;

/// English stopwords commonly excluded from word clouds.
const ENGLISH: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any",
    "are", "aren't", "as", "at", "be", "because", "been", "before", "being", "below", "between",
    "both", "but", "by", "can", "can't", "cannot", "com", "could", "couldn't", "did", "didn't",
    "do", "does", "doesn't", "doing", "don't", "down", "during", "each", "else", "ever", "few",
    "for", "from", "further", "get", "had", "hadn't", "has", "hasn't", "have", "haven't",
    "having", "he", "he'd", "he'll", "he's", "hence", "her", "here", "here's", "hers", "herself",
    "him", "himself", "his", "how", "how's", "however", "http", "i", "i'd", "i'll", "i'm",
    "i've", "if", "in", "into", "is", "isn't", "it", "it's", "its", "itself", "just", "k",
    "let's", "like", "me", "more", "most", "mustn't", "my", "myself", "no", "nor", "not", "of",
    "off", "on", "once", "only", "or", "other", "otherwise", "ought", "our", "ours",
    "ourselves", "out", "over", "own", "r", "same", "shall", "shan't", "she", "she'd", "she'll",
    "she's", "should", "shouldn't", "since", "so", "some", "such", "than", "that", "that's",
    "the", "their", "theirs", "them", "themselves", "then", "there", "there's", "therefore",
    "these", "they", "they'd", "they'll", "they're", "they've", "this", "those", "through", "to",
    "too", "under", "until", "up", "very", "was", "wasn't", "we", "we'd", "we'll", "we're",
    "we've", "were", "weren't", "what", "what's", "when", "when's", "where", "where's", "which",
    "while", "who", "who's", "whom", "why", "why's", "with", "won't", "would", "wouldn't", "www",
    "you", "you'd", "you'll", "you're", "you've", "your", "yours", "yourself", "yourselves",
];

/// Immutable, case-insensitive set of words to leave out of a cloud.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stopwords {
    words: HashSet<String>,
}

impl Default for Stopwords {
    fn default() -> Self {
        Self::english()
    }
}

impl Stopwords {
    /// The built-in English list.
    pub fn english() -> Self {
        Self::from_words(ENGLISH.iter().copied())
    }

    /// No stopwords at all.
    pub fn empty() -> Self {
        Self {
            words: HashSet::new(),
        }
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words.into_iter().filter_map(|w| normalize(w.as_ref())).collect(),
        }
    }

    /// Returns a new set extended with the words of a text file.
    ///
    /// One word per line; blank lines and lines starting with `#` are skipped.
    pub fn with_file<P: AsRef<Path>>(self, path: P) -> io::Result<Self> {
        let content = fs::read_to_string(path)?;
        let extra = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.starts_with('#'))
            .filter_map(normalize);
        let mut words = self.words;
        words.extend(extra);
        Ok(Self { words })
    }

    pub fn contains(&self, word: &str) -> bool {
        if self.words.contains(word) {
            return true;
        }
        // raw input like "Don't" is cleaned before a second lookup
        let needs_cleaning = word
            .chars()
            .any(|c| c.is_uppercase() || !c.is_alphanumeric());
        needs_cleaning && normalize(word).is_some_and(|w| self.words.contains(&w))
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

fn normalize(word: &str) -> Option<String> {
    let cleaned = clean_word(word.trim());
    (!cleaned.is_empty()).then_some(cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::words::{Aggregation, CloudWords, aggregate, extract_words};
    use std::io::Write;

    #[test]
    fn english_list_contains_common_words() {
        let stop = Stopwords::english();
        for w in ["the", "and", "not", "too", "you're"] {
            assert!(stop.contains(w), "{w} should be a stopword");
        }
        assert!(!stop.contains("great"));
        assert!(!stop.contains("ads"));
    }

    #[test]
    fn contractions_match_cleaned_tokens() {
        let stop = Stopwords::english();
        for w in ["dont", "im", "youre", "cant", "isnt", "wont"] {
            assert!(stop.contains(w), "{w} should be a stopword");
        }
        assert!(stop.contains("Don't"));
    }

    #[test]
    fn contractions_never_reach_the_frequency_table() {
        let stop = Stopwords::english();
        let tokens = extract_words("I don't like it, I'm done. You're wrong, can't use it");
        let CloudWords::Unique(table) = aggregate(tokens, Aggregation::Unique, &stop).unwrap() else {
            panic!("expected a frequency table");
        };
        for w in ["dont", "im", "youre", "cant", "like"] {
            assert_eq!(table.get(w), None, "{w} should be filtered");
        }
        assert_eq!(table.get("done"), Some(1));
        assert_eq!(table.get("wrong"), Some(1));
        assert_eq!(table.get("use"), Some(1));
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let stop = Stopwords::from_words(["Ads"]);
        assert!(stop.contains("ads"));
        assert!(stop.contains("ADS"));
        assert!(!stop.contains("ad"));
    }

    #[test]
    fn empty_set_contains_nothing() {
        let stop = Stopwords::empty();
        assert!(stop.is_empty());
        assert!(!stop.contains("the"));
    }

    #[test]
    fn file_extends_existing_set() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "# app specific").unwrap();
        writeln!(f, "App").unwrap();
        writeln!(f).unwrap();
        writeln!(f, "  update  ").unwrap();
        writeln!(f, "Doesn't").unwrap();

        let base = Stopwords::from_words(["the"]);
        let stop = base.with_file(f.path()).unwrap();
        assert_eq!(stop.len(), 4);
        assert!(stop.contains("doesnt"));
        assert!(stop.contains("app"));
        assert!(stop.contains("update"));
        assert!(stop.contains("the"));
        assert!(!stop.contains("# app specific"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let res = Stopwords::empty().with_file("/nonexistent/stopwords.txt");
        assert!(res.is_err());
    }
}
