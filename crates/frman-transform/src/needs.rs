//! Free-text needs matching.
//!
//! Matching is plain substring search, phrase by phrase, against the text
//! as already stripped of earlier phrases. A phrase that is a prefix of a
//! longer one ("Food" and "Food delivery") will consume part of the longer
//! one unless the longer phrase is listed first; vocabulary order is the
//! caller's to get right. Removing a phrase can also splice the text on
//! either side into another phrase ("FoWaterod" leaves "Food"), so matching
//! the remainder again is not guaranteed to find nothing.

use frman_model::{NeedsMatch, OTHER_NEED};

/// Match `text` against `known` phrases.
///
/// Each matched phrase is removed from the working text, first as
/// `"<phrase>, "` and then bare. Any non-whitespace text left over is kept
/// verbatim as the remainder and adds the `Other` tag.
pub fn normalize_needs<S: AsRef<str>>(text: &str, known: &[S]) -> NeedsMatch {
    let mut remainder = text.to_string();
    let mut needs = Vec::new();
    for phrase in known {
        let phrase = phrase.as_ref();
        if phrase.is_empty() || !remainder.contains(phrase) {
            continue;
        }
        needs.push(phrase.to_string());
        remainder = remainder.replace(&format!("{phrase}, "), "");
        remainder = remainder.replace(phrase, "");
    }
    if remainder.trim().is_empty() {
        remainder.clear();
    } else {
        needs.push(OTHER_NEED.to_string());
    }
    NeedsMatch { needs, remainder }
}

/// Distinct needs answers in first-seen order, blanks skipped.
pub fn unique_needs<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = Vec::new();
    for value in values {
        let value = value.as_ref();
        if value.trim().is_empty() || seen.iter().any(|existing: &String| existing == value) {
            continue;
        }
        seen.push(value.to_string());
    }
    seen
}
