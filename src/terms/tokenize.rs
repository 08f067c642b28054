// Tokenizer for listing text.
//
// Listing titles and descriptions come back from the Etsy API with HTML
// entities left in (`&amp;`, `&#39;`, `&quot;`). Those are decoded first,
// then the text is split on whitespace and punctuation. Apostrophes are not
// split points, so "mom's" becomes MOMS rather than MOM + S.

use std::sync::LazyLock;

use regex_lite::{Captures, Regex};

static HTML_ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[a-zA-Z]{2,8});")
        .expect("HTML entity pattern is valid")
});

/// Most passes `decode_entities` makes. Sellers who paste already-escaped
/// text end up with `&amp;quot;`, which needs two.
const MAX_DECODE_PASSES: usize = 3;

/// Replace HTML character references with the characters they stand for.
///
/// Double-encoded references (`&amp;amp;`) are decoded until the text stops
/// changing, up to a few passes. Unknown named entities are left untouched;
/// they get stripped to their letters by the tokenizer like any other text.
pub fn decode_entities(text: &str) -> String {
    let mut decoded = text.to_string();
    for _ in 0..MAX_DECODE_PASSES {
        let next = decode_once(&decoded);
        if next == decoded {
            break;
        }
        decoded = next;
    }
    decoded
}

fn decode_once(text: &str) -> String {
    HTML_ENTITY
        .replace_all(text, |caps: &Captures| {
            let entity = &caps[1];
            decode_entity(entity).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

fn decode_entity(entity: &str) -> Option<String> {
    let decoded = if let Some(hex) = entity
        .strip_prefix("#x")
        .or_else(|| entity.strip_prefix("#X"))
    {
        char::from_u32(u32::from_str_radix(hex, 16).ok()?)?
    } else if let Some(dec) = entity.strip_prefix('#') {
        char::from_u32(dec.parse().ok()?)?
    } else {
        match entity {
            "amp" => '&',
            "quot" => '"',
            "apos" => '\'',
            "lt" => '<',
            "gt" => '>',
            "nbsp" => ' ',
            "ndash" => '\u{2013}',
            "mdash" => '\u{2014}',
            "rsquo" | "lsquo" => '\u{2019}',
            "hellip" => '\u{2026}',
            _ => return None,
        }
    };
    Some(decoded.to_string())
}

/// Apostrophes join the letters on either side instead of splitting them.
fn is_apostrophe(c: char) -> bool {
    matches!(c, '\'' | '\u{2018}' | '\u{2019}' | '`')
}

/// Anything that is not a letter, digit or apostrophe separates tokens.
fn is_boundary(c: char) -> bool {
    !(c.is_alphanumeric() || is_apostrophe(c))
}

/// Normalize a raw token into a term: uppercase, letters only.
///
/// Returns an empty string for tokens without any alphabetic characters
/// (e.g. "2024" or "--").
pub fn normalize_token(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_alphabetic())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Split a text fragment into normalized terms.
///
/// Empty results of normalization are dropped here; length and stop-word
/// filtering happen in the analyzer.
pub fn tokenize(text: &str) -> Vec<String> {
    let decoded = decode_entities(text);
    decoded
        .split(is_boundary)
        .map(normalize_token)
        .filter(|term| !term.is_empty())
        .collect()
}
