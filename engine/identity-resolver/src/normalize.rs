//! Name normalization
//!
//! Reduces a raw player name to the canonical match key used for exact and
//! alias lookups. The reduction is a pure, total function: the same input
//! always yields the same key, and garbage input yields the empty string
//! rather than an error.

/// Suffix tokens dropped from names ("Odell Beckham Jr." keys the same as
/// "Odell Beckham")
const SUFFIX_TOKENS: &[&str] = &["jr", "sr", "ii", "iii", "iv", "v", "junior", "senior"];

/// Punctuation replaced with a space before tokenization
const PUNCT_TO_SPACE: &[char] = &[
    '.', ',', '/', '#', '!', '$', '%', '^', '&', '*', ';', ':', '{', '}', '=', '-', '_', '`', '~',
    '(', ')',
];

/// Normalize a raw name into its canonical match key.
///
/// Steps, in order: trim and lowercase; remove apostrophes outright (so
/// "O'Dell" becomes "odell", not "o dell"); replace periods and the fixed
/// punctuation class with spaces (so "D.J." tokenizes as "d j"); collapse
/// whitespace; drop suffix tokens; strip any remaining non-alphanumeric
/// character; remove all spaces.
///
/// The output is a guaranteed fixed point: `normalize(normalize(x)) ==
/// normalize(x)`, because the final step already removed every separator.
///
/// # Examples
///
/// ```
/// use identity_resolver::normalize;
///
/// assert_eq!(normalize("D.J. Moore Jr."), "djmoore");
/// assert_eq!(normalize("O'Dell Beckham"), "odellbeckham");
/// assert_eq!(normalize("  "), "");
/// ```
pub fn normalize(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();

    let no_apostrophes: String =
        lowered.chars().filter(|c| *c != '\'' && *c != '\u{2019}').collect();

    let spaced: String = no_apostrophes
        .chars()
        .map(|c| if PUNCT_TO_SPACE.contains(&c) { ' ' } else { c })
        .collect();

    let without_suffixes = spaced
        .split_whitespace()
        .filter(|token| !SUFFIX_TOKENS.contains(token))
        .collect::<Vec<_>>()
        .join(" ");

    let stripped: String = without_suffixes
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == ' ')
        .collect();

    let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");

    collapsed.replace(' ', "")
}
