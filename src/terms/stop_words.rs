// Stop-word sets used to exclude low-information terms from the ranking.
//
// The default set is tuned for marketplace listings: ordinary English
// function words plus listing boilerplate ("ITEM", "PLEASE"). The broader
// English list from the `stop-words` crate is available as an alternative.

use std::collections::HashSet;

use stop_words::{get, LANGUAGE};

use super::tokenize::normalize_token;

/// The built-in listing stop words (already uppercase).
pub const LISTING_STOP_WORDS: [&str; 37] = [
    "THE", "AND", "A", "AN", "OF", "TO", "IN", "FOR", "WITH", "ON", "IS", "IT", "THIS", "THAT",
    "ARE", "BE", "AS", "AT", "BY", "FROM", "OR", "YOUR", "YOU", "OUR", "WE", "I", "MY", "ALL",
    "CAN", "WILL", "NOT", "HAVE", "HAS", "ITEM", "ITEMS", "PLEASE", "AM",
];

/// An immutable set of normalized (uppercase, letters-only) stop words.
///
/// Built once at startup and shared read-only by every analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopWordSet {
    words: HashSet<String>,
}

impl Default for StopWordSet {
    fn default() -> Self {
        Self::listing()
    }
}

impl StopWordSet {
    /// The built-in listing set.
    pub fn listing() -> Self {
        Self::from_words(LISTING_STOP_WORDS)
    }

    /// The English stop-word list shipped with the `stop-words` crate.
    pub fn english() -> Self {
        let words: Vec<String> = get(LANGUAGE::English);
        Self::from_words(words)
    }

    /// Build a set from arbitrary words, normalizing each the same way
    /// listing tokens are normalized. Words that normalize to nothing are
    /// dropped.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| normalize_token(w.as_ref()))
            .filter(|w| !w.is_empty())
            .collect();
        Self { words }
    }

    /// An empty set (nothing is excluded except single letters).
    pub fn empty() -> Self {
        Self {
            words: HashSet::new(),
        }
    }

    /// Check whether a normalized term is a stop word.
    pub fn contains(&self, term: &str) -> bool {
        self.words.contains(term)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// All stop words in alphabetical order (for display).
    pub fn sorted(&self) -> Vec<&str> {
        let mut words: Vec<&str> = self.words.iter().map(String::as_str).collect();
        words.sort_unstable();
        words
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_set_has_37_unique_entries() {
        assert_eq!(StopWordSet::listing().len(), 37);
    }

    #[test]
    fn test_from_words_normalizes_case_and_punctuation() {
        let set = StopWordSet::from_words(["the", "Don't", "  "]);
        assert!(set.contains("THE"));
        assert!(set.contains("DONT"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_english_set_is_uppercase() {
        let set = StopWordSet::english();
        assert!(!set.is_empty());
        assert!(set.contains("THE"));
        assert!(set.sorted().iter().all(|w| !w.chars().any(char::is_lowercase)));
    }

    #[test]
    fn test_sorted_is_alphabetical() {
        let set = StopWordSet::from_words(["zebra", "apple", "mango"]);
        assert_eq!(set.sorted(), vec!["APPLE", "MANGO", "ZEBRA"]);
    }
}
