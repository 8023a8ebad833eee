//! Alias generation
//!
//! Produces the plausible textual variants of a player name used to
//! pre-populate the alias table when an identity is ingested. Generation is
//! deterministic and purely textual; callers normalize each variant
//! independently before storage, so the alias table always keys off the
//! normalizer's output.

use std::collections::BTreeSet;

/// Generate the alias variant set for a full name.
///
/// Emits the full name itself, `first last`, `last, first`, the
/// concatenated `firstlast`, and initial-based forms (`F last`, `F. last`,
/// `first L`, `first L.`). When the full name splits into exactly two
/// tokens, compact initial variants (`flast`, `first l`) are added as well.
///
/// `first_name`/`last_name` override the split derived from `full_name`
/// when the feed carries them separately (hyphenated or multi-token
/// surnames split badly otherwise).
///
/// Output is de-duplicated and never contains empty strings.
pub fn generate_aliases(
    full_name: &str,
    first_name: Option<&str>,
    last_name: Option<&str>,
) -> BTreeSet<String> {
    let mut aliases = BTreeSet::new();
    let mut push = |alias: String| {
        let trimmed = alias.trim().to_string();
        if !trimmed.is_empty() {
            aliases.insert(trimmed);
        }
    };

    let full_name = full_name.trim();
    push(full_name.to_string());

    let tokens: Vec<&str> = full_name.split_whitespace().collect();

    let first = first_name
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .or_else(|| tokens.first().copied());
    let last = last_name
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .or_else(|| if tokens.len() >= 2 { tokens.last().copied() } else { None });

    if let (Some(first), Some(last)) = (first, last) {
        push(format!("{first} {last}"));
        push(format!("{last}, {first}"));
        push(format!("{first}{last}"));

        if let Some(first_initial) = first.chars().next() {
            push(format!("{first_initial} {last}"));
            push(format!("{first_initial}. {last}"));
        }
        if let Some(last_initial) = last.chars().next() {
            push(format!("{first} {last_initial}"));
            push(format!("{first} {last_initial}."));
        }
    }

    if tokens.len() == 2 {
        let (first, last) = (tokens[0], tokens[1]);
        push(format!("{first}{last}"));
        if let Some(first_initial) = first.chars().next() {
            push(format!("{first_initial}{last}"));
        }
        if let Some(last_initial) = last.chars().next() {
            push(format!("{first} {last_initial}"));
        }
    }

    aliases
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_token_name_variants() {
        let aliases = generate_aliases("Justin Jefferson", None, None);

        for expected in [
            "Justin Jefferson",
            "Jefferson, Justin",
            "JustinJefferson",
            "J Jefferson",
            "J. Jefferson",
            "Justin J",
            "Justin J.",
            "JJefferson",
        ] {
            assert!(aliases.contains(expected), "missing variant: {expected}");
        }
        assert!(!aliases.contains(""));
    }

    #[test]
    fn test_explicit_name_parts_override_split() {
        let aliases =
            generate_aliases("Jaxon Smith-Njigba", Some("Jaxon"), Some("Smith-Njigba"));

        assert!(aliases.contains("Smith-Njigba, Jaxon"));
        assert!(aliases.contains("J. Smith-Njigba"));
        assert!(aliases.contains("JaxonSmith-Njigba"));
    }

    #[test]
    fn test_three_token_name_skips_compact_variants() {
        let aliases = generate_aliases("Amon-Ra St. Brown", None, None);

        // derived split: first token / last token
        assert!(aliases.contains("Amon-Ra Brown"));
        assert!(aliases.contains("Brown, Amon-Ra"));
        // compact two-token forms only apply to exactly-two-token names
        assert!(!aliases.contains("ASt."));
    }

    #[test]
    fn test_deterministic_output() {
        let a = generate_aliases("CeeDee Lamb", None, None);
        let b = generate_aliases("CeeDee Lamb", None, None);
        assert_eq!(a, b);
    }

    #[test]
    fn test_single_token_and_empty_input() {
        let aliases = generate_aliases("Cher", None, None);
        assert_eq!(aliases.len(), 1);
        assert!(aliases.contains("Cher"));

        assert!(generate_aliases("  ", None, None).is_empty());
    }
}
