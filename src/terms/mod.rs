// Term extraction — tokenization, stop-word filtering and frequency ranking.

pub mod analyzer;
pub mod stop_words;
pub mod tokenize;
