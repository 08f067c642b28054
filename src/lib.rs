// shopwords: the most frequent terms in an Etsy shop's active listings.
//
// This is the library root. Each module corresponds to one stage of the
// fetch -> tokenize -> rank -> display flow.

pub mod config;
pub mod etsy;
pub mod output;
pub mod pipeline;
pub mod terms;
