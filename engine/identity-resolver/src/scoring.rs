//! Candidate scoring
//!
//! Computes the confidence score used by the fuzzy tier and carried on
//! suggestions. The base component (0-100) comes from exact / prefix /
//! substring relationships between normalized keys, falling back to Jaccard
//! token overlap; position and team agreement add fixed, independent
//! bonuses, so the full range is 0-130.

use crate::normalize::normalize;
use std::collections::HashSet;

/// Tokenize into the lowercase word set used for overlap comparison
fn token_set(s: &str) -> HashSet<String> {
    s.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Jaccard similarity over whitespace/punctuation-tokenized lowercase word
/// sets. Returns 0.0 when either side has no tokens.
pub fn token_overlap(a: &str, b: &str) -> f64 {
    let set_a = token_set(a);
    let set_b = token_set(b);
    if set_a.is_empty() || set_b.is_empty() {
        return 0.0;
    }

    let intersection = set_a.intersection(&set_b).count();
    let union = set_a.union(&set_b).count();
    intersection as f64 / union as f64
}

/// Score a candidate against a query, 0..=130.
///
/// Base: 100 on normalized-key equality, 90 when the candidate key starts
/// with the query key, 80 when it contains it, else `floor(70 *
/// token_overlap)`. A supplied query position matching the candidate's adds
/// 20; a supplied query team matching adds 10. Bonuses are additive and
/// independent, and raising token overlap never lowers the base.
pub fn score(
    query: &str,
    candidate_name: &str,
    candidate_position: Option<&str>,
    candidate_team: Option<&str>,
    query_position: Option<&str>,
    query_team: Option<&str>,
) -> u32 {
    let query_key = normalize(query);
    let candidate_key = normalize(candidate_name);

    let base: u32 = if query_key.is_empty() {
        0
    } else if query_key == candidate_key {
        100
    } else if candidate_key.starts_with(&query_key) {
        90
    } else if candidate_key.contains(&query_key) {
        80
    } else {
        (70.0 * token_overlap(query, candidate_name)).floor() as u32
    };

    let mut total = base;
    if let (Some(query_pos), Some(candidate_pos)) = (query_position, candidate_position) {
        if query_pos.eq_ignore_ascii_case(candidate_pos) {
            total += 20;
        }
    }
    if let (Some(query_team), Some(candidate_team)) = (query_team, candidate_team) {
        if query_team.eq_ignore_ascii_case(candidate_team) {
            total += 10;
        }
    }

    total
}
