//! Line tokenization.
//!
//! Log lines are split on runs of whitespace. Nothing else is normalized:
//! case, punctuation and embedded symbols are preserved exactly, so two
//! tokens compare equal only if their text is identical.

/// Placeholder token marking a generalized template position.
///
/// Also used as the key of the shared overflow child in the prefix tree.
pub const WILDCARD: &str = "<*>";

/// Split a raw log line into whitespace-delimited tokens.
///
/// Empty and all-whitespace lines produce an empty sequence.
///
/// # Example
/// ```
/// use log_template_miner::domain::token::tokenize;
///
/// assert_eq!(tokenize("  GET /a\t200 "), vec!["GET", "/a", "200"]);
/// assert!(tokenize("   ").is_empty());
/// ```
pub fn tokenize(line: &str) -> Vec<&str> {
    line.split_whitespace().collect()
}

/// Check whether a token is the wildcard placeholder.
#[inline]
pub fn is_wildcard(token: &str) -> bool {
    token == WILDCARD
}
