//! Candidate scoring
//!
//! Ranks candidates by how many reference tokens appear in their display
//! name; shorter names win ties, then the catalog's own order.

use std::cmp::Reverse;

use crate::domain::CandidateProduct;

/// Score of one candidate against a reference term
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MatchScore {
    /// Reference tokens found as substrings of the lower-cased name
    pub token_hits: usize,
    /// Display name length in characters
    pub name_len: usize,
}

/// Lower-cased whitespace tokens of a reference term
pub fn reference_tokens(reference: &str) -> Vec<String> {
    reference
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

pub fn score(candidate: &CandidateProduct, tokens: &[String]) -> MatchScore {
    let name = candidate.name.to_lowercase();
    MatchScore {
        token_hits: tokens.iter().filter(|t| name.contains(t.as_str())).count(),
        name_len: candidate.name.chars().count(),
    }
}

/// Pick the best candidate, or `None` for an empty list
pub fn best_match<'a>(
    candidates: &'a [CandidateProduct],
    reference: &str,
) -> Option<&'a CandidateProduct> {
    let tokens = reference_tokens(reference);
    // min_by_key keeps the first of equal keys, which preserves catalog order
    candidates.iter().min_by_key(|c| {
        let s = score(c, &tokens);
        (Reverse(s.token_hits), s.name_len)
    })
}
