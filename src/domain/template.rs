//! Log templates and position-wise generalization.
//!
//! A template is the generalized shape of a family of log lines: the token
//! sequence of the first line seen, with every position that later lines
//! disagreed on replaced by [`WILDCARD`]. Generalization is one-way; a
//! wildcard position never becomes literal again.

use crate::domain::token::{is_wildcard, WILDCARD};
use std::fmt;

/// Result of merging a token sequence into a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Every position already agreed (or was already a wildcard)
    Unchanged,
    /// At least one literal position became a wildcard
    Generalized {
        /// Number of positions that turned into wildcards during this merge
        new_wildcards: usize,
    },
    /// Token counts differ; the template was left untouched
    LengthMismatch,
}

impl MergeOutcome {
    /// Check if the merge introduced new wildcards.
    pub fn is_generalized(&self) -> bool {
        matches!(self, MergeOutcome::Generalized { .. })
    }
}

/// An ordered token sequence with zero or more wildcard positions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Template {
    tokens: Vec<String>,
}

impl Template {
    /// Create a template seeded verbatim from a token sequence.
    ///
    /// No positions are generalized; tokens that happen to equal the
    /// wildcard placeholder are kept as-is and behave like wildcards.
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> Self {
        Self {
            tokens: tokens.iter().map(|t| t.as_ref().to_owned()).collect(),
        }
    }

    /// The template tokens, wildcards included.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Number of token positions.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Check if the template has no positions.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Number of wildcard positions.
    pub fn wildcard_count(&self) -> usize {
        self.tokens.iter().filter(|t| is_wildcard(t)).count()
    }

    /// Merge a newly observed token sequence into this template in place.
    ///
    /// Positions where the template and the line agree keep their token;
    /// positions that disagree become wildcards. If the lengths differ the
    /// template is left unchanged and [`MergeOutcome::LengthMismatch`] is
    /// returned. This is not an error: callers keep going with the stale
    /// template.
    pub fn merge(&mut self, tokens: &[&str]) -> MergeOutcome {
        if self.tokens.len() != tokens.len() {
            return MergeOutcome::LengthMismatch;
        }

        let mut new_wildcards = 0;
        for (slot, &token) in self.tokens.iter_mut().zip(tokens) {
            if slot.as_str() != token && !is_wildcard(slot) {
                *slot = WILDCARD.to_owned();
                new_wildcards += 1;
            }
        }

        if new_wildcards == 0 {
            MergeOutcome::Unchanged
        } else {
            MergeOutcome::Generalized { new_wildcards }
        }
    }

    /// Return the generalization of this template against `tokens`.
    ///
    /// Same rules as [`Template::merge`], without mutating `self`. A length
    /// mismatch yields an unchanged copy.
    ///
    /// # Example
    /// ```
    /// use log_template_miner::Template;
    ///
    /// let template = Template::from_tokens(&["GET", "/a", "200"]);
    /// let merged = template.generalize(&["GET", "/b", "200"]);
    /// assert_eq!(merged.to_string(), "GET <*> 200");
    /// ```
    pub fn generalize(&self, tokens: &[&str]) -> Template {
        let mut merged = self.clone();
        merged.merge(tokens);
        merged
    }

    /// Collect the tokens of `tokens` that sit at wildcard positions.
    ///
    /// Values are returned left to right. A length mismatch yields no
    /// variables rather than an error.
    pub fn extract_variables(&self, tokens: &[&str]) -> Vec<String> {
        if self.tokens.len() != tokens.len() {
            return Vec::new();
        }

        self.tokens
            .iter()
            .zip(tokens)
            .filter(|(slot, _)| is_wildcard(slot))
            .map(|(_, &token)| token.to_owned())
            .collect()
    }
}

impl fmt::Display for Template {
    /// Renders tokens joined by single spaces, wildcards as `<*>`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tokens = self.tokens.iter();
        if let Some(first) = tokens.next() {
            f.write_str(first)?;
            for token in tokens {
                f.write_str(" ")?;
                f.write_str(token)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_generalizes_differing_positions() {
        let mut template = Template::from_tokens(&["GET", "/a", "200"]);
        let outcome = template.merge(&["GET", "/b", "200"]);

        assert_eq!(outcome, MergeOutcome::Generalized { new_wildcards: 1 });
        assert!(outcome.is_generalized());
        assert_eq!(template.tokens(), &["GET", "<*>", "200"]);
    }

    #[test]
    fn test_merge_identical_is_unchanged() {
        let mut template = Template::from_tokens(&["a", "b"]);
        let outcome = template.merge(&["a", "b"]);
        assert_eq!(outcome, MergeOutcome::Unchanged);
        assert!(!outcome.is_generalized());
        assert_eq!(template.wildcard_count(), 0);
    }

    #[test]
    fn test_merge_length_mismatch_leaves_template() {
        let mut template = Template::from_tokens(&["a", "b", "c"]);
        let outcome = template.merge(&["a", "x"]);
        assert_eq!(outcome, MergeOutcome::LengthMismatch);
        assert!(!outcome.is_generalized());
        assert_eq!(template.tokens(), &["a", "b", "c"]);
    }

    #[test]
    fn test_wildcard_never_reverts() {
        let mut template = Template::from_tokens(&["user", "alice", "ok"]);
        template.merge(&["user", "bob", "ok"]);
        assert_eq!(template.to_string(), "user <*> ok");

        // A line matching the original literal does not restore it
        assert_eq!(template.merge(&["user", "alice", "ok"]), MergeOutcome::Unchanged);
        assert_eq!(template.to_string(), "user <*> ok");
    }

    #[test]
    fn test_generalize_does_not_mutate() {
        let template = Template::from_tokens(&["x", "1"]);
        let merged = template.generalize(&["x", "2"]);

        assert_eq!(template.to_string(), "x 1");
        assert_eq!(merged.to_string(), "x <*>");
    }

    #[test]
    fn test_generalize_length_mismatch_returns_copy() {
        let template = Template::from_tokens(&["x", "1"]);
        assert_eq!(template.generalize(&["x"]), template);
    }

    #[test]
    fn test_extract_variables_in_order() {
        let template = Template::from_tokens(&["<*>", "to", "<*>", "failed"]);
        let vars = template.extract_variables(&["conn", "to", "db-1", "failed"]);
        assert_eq!(vars, vec!["conn", "db-1"]);
    }

    #[test]
    fn test_extract_variables_without_wildcards() {
        let template = Template::from_tokens(&["a", "b"]);
        assert!(template.extract_variables(&["a", "b"]).is_empty());
    }

    #[test]
    fn test_extract_variables_length_mismatch() {
        let template = Template::from_tokens(&["<*>", "b"]);
        assert!(template.extract_variables(&["a"]).is_empty());
    }

    #[test]
    fn test_seeded_wildcard_token_behaves_as_wildcard() {
        let mut template = Template::from_tokens(&["value", "<*>"]);
        assert_eq!(template.merge(&["value", "7"]), MergeOutcome::Unchanged);
        assert_eq!(template.extract_variables(&["value", "7"]), vec!["7"]);
    }

    #[test]
    fn test_display() {
        assert_eq!(Template::from_tokens(&["a", "<*>", "c"]).to_string(), "a <*> c");
        assert_eq!(Template::from_tokens::<&str>(&[]).to_string(), "");
    }
}
