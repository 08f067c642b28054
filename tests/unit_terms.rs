// Unit tests for the term frequency analyzer.
//
// Covers the ranking properties (stop words and single letters never
// returned, result length, determinism including ties, case and punctuation
// folding) and the worked listing scenarios.

use std::collections::HashSet;
use std::num::NonZeroUsize;

use shopwords::terms::analyzer::{analyze, count_terms, TermFrequency};
use shopwords::terms::stop_words::StopWordSet;

fn n(v: usize) -> NonZeroUsize {
    NonZeroUsize::new(v).unwrap()
}

fn tf(term: &str, count: u32) -> TermFrequency {
    TermFrequency::new(term, count)
}

fn sample_listings() -> Vec<String> {
    vec![
        "Handmade Leather Wallet - Minimalist Bifold Wallet for Men".to_string(),
        "Leather Card Holder, Slim Wallet &amp; Gift for Him".to_string(),
        "Personalized Leather Keychain | Custom Gift".to_string(),
        "Leather Watch Strap (20mm) - Handmade in the USA".to_string(),
        "A gift he'll love: the leather wallet you've been looking for!".to_string(),
    ]
}

// ============================================================
// Worked scenarios
// ============================================================

#[test]
fn cat_and_hat_scenario() {
    let texts = ["The Cat and the Hat", "A cat in a hat", "Hats are fun"];
    let stop_words = StopWordSet::from_words(["THE", "AND", "A", "ARE"]);

    // IN is not a stop word here, so it ties with HATS and FUN at 1 and
    // wins the tie by appearing first.
    let top = analyze(&texts, &stop_words, n(3));
    assert_eq!(top, vec![tf("CAT", 2), tf("HAT", 2), tf("IN", 1)]);

    // Plurals are not folded: HATS is its own term.
    let counts = count_terms(&texts, &stop_words);
    assert_eq!(counts.get("HATS"), Some(1));
    assert_eq!(counts.get("HAT"), Some(2));
}

#[test]
fn cat_and_hat_with_in_excluded() {
    let texts = ["The Cat and the Hat", "A cat in a hat", "Hats are fun"];
    let stop_words = StopWordSet::from_words(["THE", "AND", "A", "ARE", "IN"]);
    let top = analyze(&texts, &stop_words, n(3));
    assert_eq!(top, vec![tf("CAT", 2), tf("HAT", 2), tf("HATS", 1)]);
}

#[test]
fn empty_input_yields_empty_result() {
    let texts: [&str; 0] = [];
    assert!(analyze(&texts, &StopWordSet::listing(), n(5)).is_empty());
}

#[test]
fn only_stop_words_and_single_letters_yields_empty_result() {
    let top = analyze(&["I am to it"], &StopWordSet::listing(), n(5));
    assert!(top.is_empty());

    let custom = StopWordSet::from_words(["AM", "TO", "IT"]);
    assert!(analyze(&["I am to it"], &custom, n(5)).is_empty());
}

#[test]
fn fewer_terms_than_n_returns_all_without_padding() {
    let top = analyze(&["walnut maple walnut"], &StopWordSet::listing(), n(5));
    assert_eq!(top, vec![tf("WALNUT", 2), tf("MAPLE", 1)]);
}

#[test]
fn realistic_listing_ranking() {
    let texts = sample_listings();
    let top = analyze(&texts, &StopWordSet::listing(), n(5));

    assert_eq!(top[0], tf("LEATHER", 5));
    assert_eq!(top[1], tf("WALLET", 4));
    assert_eq!(top[2], tf("GIFT", 3));
    assert_eq!(top[3], tf("HANDMADE", 2));
    assert_eq!(top.len(), 5);
    // Apostrophes join: HE'LL -> HELL, YOU'VE -> YOUVE
    let counts = count_terms(&texts, &StopWordSet::listing());
    assert_eq!(counts.get("HELL"), Some(1));
    assert_eq!(counts.get("YOUVE"), Some(1));
    // Entities are decoded rather than counted as words
    assert_eq!(counts.get("AMP"), None);
}

// ============================================================
// Properties
// ============================================================

#[test]
fn no_stop_word_or_single_letter_is_ever_returned() {
    let stop_words = StopWordSet::listing();
    let texts = sample_listings();
    let counts = count_terms(&texts, &stop_words);

    for entry in counts.iter() {
        assert!(!stop_words.contains(&entry.term), "{} is a stop word", entry.term);
        assert!(entry.term.chars().count() > 1, "{} is a single letter", entry.term);
    }
}

#[test]
fn result_length_is_min_of_n_and_distinct_terms() {
    let texts = sample_listings();
    let stop_words = StopWordSet::listing();
    let distinct = count_terms(&texts, &stop_words).len();

    for k in 1..=distinct + 3 {
        let top = analyze(&texts, &stop_words, n(k));
        assert_eq!(top.len(), k.min(distinct), "n = {k}");
    }
}

#[test]
fn result_is_sorted_by_count_descending() {
    let top = analyze(&sample_listings(), &StopWordSet::listing(), n(50));
    assert!(top.windows(2).all(|w| w[0].count >= w[1].count));
}

#[test]
fn analysis_is_idempotent_and_deterministic() {
    let texts = sample_listings();
    let stop_words = StopWordSet::listing();
    let first = analyze(&texts, &stop_words, n(10));
    for _ in 0..5 {
        assert_eq!(analyze(&texts, &stop_words, n(10)), first);
    }
}

#[test]
fn ties_are_broken_by_first_appearance() {
    let top = analyze(&["zinc brass copper", "copper brass zinc"], &StopWordSet::empty(), n(3));
    assert_eq!(top, vec![tf("ZINC", 2), tf("BRASS", 2), tf("COPPER", 2)]);
}

#[test]
fn case_variants_count_as_one_term() {
    let counts = count_terms(&["Cat CAT cat cAt"], &StopWordSet::empty());
    assert_eq!(counts.get("CAT"), Some(4));
    assert_eq!(counts.len(), 1);
}

#[test]
fn punctuation_variants_count_as_one_term() {
    let counts = count_terms(&["cat, cat. cat! (cat) \"cat\""], &StopWordSet::empty());
    assert_eq!(counts.get("CAT"), Some(5));
    assert_eq!(counts.len(), 1);
}

#[test]
fn stop_word_matching_is_case_insensitive() {
    let stop_words = StopWordSet::from_words(["oak"]);
    let counts = count_terms(&["Oak OAK oak pine"], &stop_words);
    assert_eq!(counts.get("OAK"), None);
    assert_eq!(counts.get("PINE"), Some(1));
}

#[test]
fn english_preset_removes_more_than_listing_set() {
    let texts = sample_listings();
    let listing: HashSet<String> = count_terms(&texts, &StopWordSet::listing())
        .iter()
        .map(|t| t.term.clone())
        .collect();
    let english: HashSet<String> = count_terms(&texts, &StopWordSet::english())
        .iter()
        .map(|t| t.term.clone())
        .collect();

    assert!(english.is_subset(&listing));
    assert!(!english.contains("BEEN"));
}
