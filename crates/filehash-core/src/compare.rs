//! Format-tolerant comparison of a computed digest against user input.

/// Result of comparing a computed digest string with a user-supplied one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonOutcome {
    /// Computed digest, lowercased.
    pub computed: String,
    /// User input after trimming, stripping non-hex characters and
    /// lowercasing.
    pub user_input: String,
    pub matches: bool,
}

/// Compare a computed digest against whatever the user pasted.
///
/// The user string is trimmed, every character outside `[0-9a-fA-F]` is
/// dropped, and the rest is lowercased, so `"5D 41-40 2A ..."` matches the
/// plain hex form. The comparison is exact byte equality of the normalized
/// strings; a truncated prefix never matches.
pub fn compare(computed: &str, user_input: &str) -> ComparisonOutcome {
    let computed = computed.trim().to_ascii_lowercase();
    let user_input: String = user_input
        .trim()
        .chars()
        .filter(char::is_ascii_hexdigit)
        .collect::<String>()
        .to_ascii_lowercase();
    let matches = computed == user_input;
    ComparisonOutcome {
        computed,
        user_input,
        matches,
    }
}
