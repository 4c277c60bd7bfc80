//! Question-identity pairing between a spreadsheet row and stored rows.
//!
//! Two passes over the store: normalized-exact text equality first, then a
//! normalized-prefix match (the export and the store drift in trailing
//! punctuation and truncation, so full equality alone leaves rows orphaned).

use crate::matcher::normalize;

#[derive(Debug)]
pub enum Pairing<'a, T> {
    NoMatch,
    Unique(&'a T),
    Ambiguous(Vec<&'a T>),
}

/// Pair one sheet question text against stored items by identity.
///
/// `text_of` projects the stored item's question text. `prefix_len` is in
/// characters of the normalized text.
pub fn pair_by_question<'a, T>(
    question: &str,
    items: &'a [T],
    text_of: impl Fn(&T) -> &str,
    prefix_len: usize,
) -> Pairing<'a, T> {
    let needle = normalize(question);
    if needle.is_empty() {
        return Pairing::NoMatch;
    }

    let exact: Vec<&T> = items
        .iter()
        .filter(|item| normalize(text_of(item)) == needle)
        .collect();
    match exact.len() {
        1 => return Pairing::Unique(exact[0]),
        n if n > 1 => return Pairing::Ambiguous(exact),
        _ => {}
    }

    let prefix: String = needle.chars().take(prefix_len).collect();
    let by_prefix: Vec<&T> = items
        .iter()
        .filter(|item| normalize(text_of(item)).starts_with(&prefix))
        .collect();
    match by_prefix.len() {
        0 => Pairing::NoMatch,
        1 => Pairing::Unique(by_prefix[0]),
        _ => Pairing::Ambiguous(by_prefix),
    }
}
