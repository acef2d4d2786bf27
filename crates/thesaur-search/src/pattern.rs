//! Search pattern construction.
//!
//! A free-text query becomes one regular expression: each whitespace-separated
//! term is escaped, and terms are joined with `.*` so a label matches when it
//! contains every term in order, with anything in between.
//!
//! The same pattern is sent to the triple store (SPARQL `regex`, XPath syntax)
//! and compiled locally for highlighting, so escaping is limited to the
//! sequences both dialects accept.

use regex::{Regex, RegexBuilder};
use thesaur_core::{Error, Result};

/// Characters escaped with a backslash in a term.
const META: &[char] = &[
    '\\', '|', '.', '?', '*', '+', '(', ')', '{', '}', '-', '[', ']', '^', '$',
];

/// Escape a term so it matches literally.
pub fn escape_term(term: &str) -> String {
    let mut out = String::with_capacity(term.len() + 4);
    for c in term.chars() {
        if META.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Build the pattern for a free-text query, e.g. `appel urgent` into
/// `appel.*urgent`. A blank query yields the empty pattern, which matches
/// every label.
pub fn build_pattern(text: &str) -> String {
    text.split_whitespace()
        .map(escape_term)
        .collect::<Vec<_>>()
        .join(".*")
}

/// Compile a pattern for case-insensitive matching.
pub fn compile_pattern(pattern: &str) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| Error::InvalidSearchParameters(format!("invalid search pattern: {}", e)))
}
