use crate::model::{AnswerMatch, Candidate, MatchTier, OptionLabel};

/// Longest normalized-target prefix considered by the prefix tier.
const PREFIX_LEN: usize = 10;

/// Shared text normalization: surrounding whitespace trimmed, lowercased.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Find which candidate, if any, represents the same answer as `target`.
///
/// Three tiers, evaluated in strict order, first hit wins:
/// 1. exact normalized equality, first candidate in label order;
/// 2. single-letter shorthand ("b" → position 1), a pure positional lookup
///    that never inspects candidate text;
/// 3. prefix match on the first `min(10, len)` normalized characters.
///
/// Total over its input domain: always terminates, returns at most one
/// label, and "no match" is a normal outcome rather than an error.
pub fn match_answer(target: &str, candidates: &[Candidate]) -> Option<OptionLabel> {
    match_answer_explain(target, candidates).map(|m| m.label)
}

/// Like [`match_answer`], but reports which tier produced the hit.
pub fn match_answer_explain(target: &str, candidates: &[Candidate]) -> Option<AnswerMatch> {
    let target = normalize(target);

    // Tier 1: exact normalized equality
    for c in candidates {
        if normalize(&c.text) == target {
            return Some(AnswerMatch { label: c.label, tier: MatchTier::Exact });
        }
    }

    // Tier 2: single-letter shorthand, positional only
    if let Some(offset) = letter_offset(&target) {
        if let Some(c) = candidates.get(offset) {
            return Some(AnswerMatch { label: c.label, tier: MatchTier::Letter });
        }
    }

    // Tier 3: normalized-prefix match. starts_with on an empty prefix is
    // vacuously true, so an empty target must stop here.
    if !target.is_empty() {
        let prefix: String = target.chars().take(PREFIX_LEN).collect();
        for c in candidates {
            if normalize(&c.text).starts_with(&prefix) {
                return Some(AnswerMatch { label: c.label, tier: MatchTier::Prefix });
            }
        }
    }

    None
}

/// Zero-based letter offset for a normalized single-character target.
///
/// Defined only for ASCII 'a'–'z'; digits, punctuation, and non-ASCII
/// alphabetics fall through to the prefix tier.
fn letter_offset(normalized_target: &str) -> Option<usize> {
    let mut chars = normalized_target.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) if ch.is_ascii_lowercase() => Some(ch as usize - 'a' as usize),
        _ => None,
    }
}
