// Shop analysis pipeline: fetch listings -> select text -> rank terms.

pub mod shops;
