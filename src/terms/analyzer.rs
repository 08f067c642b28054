// Term frequency analysis — count qualifying terms and rank the top N.
//
// Counts are kept in first-seen order so that ranking is deterministic:
// a stable sort by descending count leaves equal-count terms in the order
// they first appeared in the text.

use std::collections::HashMap;
use std::num::NonZeroUsize;

use super::stop_words::StopWordSet;
use super::tokenize::tokenize;

/// A single ranked term and how often it occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermFrequency {
    pub term: String,
    pub count: u32,
}

impl TermFrequency {
    pub fn new(term: impl Into<String>, count: u32) -> Self {
        Self {
            term: term.into(),
            count,
        }
    }
}

/// Occurrence counts for every qualifying term, in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct TermCounts {
    entries: Vec<TermFrequency>,
    index: HashMap<String, usize>,
}

impl TermCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one occurrence of `term`.
    pub fn add(&mut self, term: String) {
        if let Some(&i) = self.index.get(&term) {
            self.entries[i].count += 1;
        } else {
            self.index.insert(term.clone(), self.entries.len());
            self.entries.push(TermFrequency { term, count: 1 });
        }
    }

    /// Count for a term, if it was seen at all.
    pub fn get(&self, term: &str) -> Option<u32> {
        self.index.get(term).map(|&i| self.entries[i].count)
    }

    /// Number of distinct terms.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of counted occurrences across all terms.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|e| u64::from(e.count)).sum()
    }

    /// Iterate terms in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &TermFrequency> {
        self.entries.iter()
    }

    /// The `n` most frequent terms, highest count first, ties in first-seen
    /// order. Returns fewer than `n` entries when fewer terms exist.
    pub fn top(&self, n: NonZeroUsize) -> Vec<TermFrequency> {
        let mut ranked = self.entries.clone();
        // sort_by is stable, which is what preserves first-seen order on ties
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked.truncate(n.get());
        ranked
    }
}

/// Whether a normalized term should be counted.
fn qualifies(term: &str, stop_words: &StopWordSet) -> bool {
    term.chars().nth(1).is_some() && !stop_words.contains(term)
}

/// Count every qualifying term across all text fragments.
///
/// Each fragment is tokenized separately, so a word never spans two
/// fragments. Terms of a single letter and stop words are skipped.
pub fn count_terms<S: AsRef<str>>(texts: &[S], stop_words: &StopWordSet) -> TermCounts {
    let mut counts = TermCounts::new();
    for text in texts {
        for term in tokenize(text.as_ref()) {
            if qualifies(&term, stop_words) {
                counts.add(term);
            }
        }
    }
    counts
}

/// Rank the `n` most frequent qualifying terms in `texts`.
///
/// Empty or degenerate input yields an empty result, never an error.
pub fn analyze<S: AsRef<str>>(
    texts: &[S],
    stop_words: &StopWordSet,
    n: NonZeroUsize,
) -> Vec<TermFrequency> {
    count_terms(texts, stop_words).top(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(v: usize) -> NonZeroUsize {
        NonZeroUsize::new(v).unwrap()
    }

    #[test]
    fn test_counts_accumulate_per_occurrence() {
        let counts = count_terms(&["oak oak pine", "OAK"], &StopWordSet::empty());
        assert_eq!(counts.get("OAK"), Some(3));
        assert_eq!(counts.get("PINE"), Some(1));
        assert_eq!(counts.len(), 2);
        assert_eq!(counts.total(), 4);
    }

    #[test]
    fn test_single_letters_never_counted() {
        let counts = count_terms(&["a b c x-y ab"], &StopWordSet::empty());
        assert_eq!(counts.len(), 1);
        assert_eq!(counts.get("AB"), Some(1));
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let top = analyze(&["pine oak birch oak pine birch"], &StopWordSet::empty(), n(3));
        let terms: Vec<&str> = top.iter().map(|t| t.term.as_str()).collect();
        assert_eq!(terms, vec!["PINE", "OAK", "BIRCH"]);
    }

    #[test]
    fn test_top_truncates_to_n() {
        let top = analyze(
            &["one two two three three three four four four four"],
            &StopWordSet::empty(),
            n(2),
        );
        assert_eq!(
            top,
            vec![TermFrequency::new("FOUR", 4), TermFrequency::new("THREE", 3)]
        );
    }

    #[test]
    fn test_fragments_are_token_boundaries() {
        let counts = count_terms(&["wood", "working"], &StopWordSet::empty());
        assert_eq!(counts.get("WOOD"), Some(1));
        assert_eq!(counts.get("WORKING"), Some(1));
        assert_eq!(counts.get("WOODWORKING"), None);
    }
}
