//! Hashtag extraction from post messages.
//!
//! Tags end at whitespace or one of `. , ! )`. A field is a tag only if it is
//! a single `#` followed by at least one other character, so `#test#desmos`
//! yields nothing.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

static HASHTAG_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#([^\s#.,!)]+)$").expect("static hashtag pattern"));

// Hex floats need a binary exponent. Tags never contain '.', so there is no
// fraction part to match.
static HEX_FLOAT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?0[xX](_?[0-9a-fA-F])+[pP][+-]?[0-9]+$").expect("static hex float pattern")
});

fn is_tag_terminator(c: char) -> bool {
    c.is_whitespace() || matches!(c, '.' | ',' | '!' | ')')
}

/// Decimal, `inf`/`nan` and hex float forms all count as numbers.
fn is_numeric(tag: &str) -> bool {
    tag.parse::<f64>().is_ok() || HEX_FLOAT_REGEX.is_match(tag)
}

/// Extracts the deduplicated hashtags of `message`, without the leading `#`.
///
/// If any extracted tag is numeric the whole result is empty.
pub fn extract(message: &str) -> BTreeSet<String> {
    let mut tags = BTreeSet::new();

    for field in message.split(is_tag_terminator).filter(|f| !f.is_empty()) {
        let Some(captures) = HASHTAG_REGEX.captures(field) else {
            continue;
        };
        let tag = captures[1].trim().trim_start_matches('#');
        if is_numeric(tag) {
            return BTreeSet::new();
        }
        tags.insert(tag.to_string());
    }

    tags
}
