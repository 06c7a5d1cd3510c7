//! Route matching logic.
//!
//! # Responsibilities
//! - Decide whether a token sequence is eligible for a pattern (length rules)
//! - Walk pattern and tokens left to right
//! - Bind parameter segments into path info
//!
//! # Design Decisions
//! - Literal matching is exact and case-sensitive
//! - A trailing wildcard consumes tokens without binding them
//! - `[*]` also matches the empty path; any other wildcard pattern needs
//!   at least as many tokens as it has segments
//! - No match is `None`, never an error

use std::collections::BTreeMap;

use crate::routing::pattern::{RoutePattern, Segment};

/// Parameter name to captured token.
pub type PathInfo = BTreeMap<String, String>;

/// A successful match of a pattern against a token sequence.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MatchResult {
    /// Tokens consumed by the pattern (all of them, on success).
    pub tokens: Vec<String>,
    /// Values bound by parameter segments.
    pub path_info: PathInfo,
}

/// Match `tokens` against `pattern`.
pub fn match_tokens(tokens: &[&str], pattern: &RoutePattern) -> Option<MatchResult> {
    if !is_eligible(tokens, pattern) {
        return None;
    }

    let segments = pattern.segments();
    let mut path_info = PathInfo::new();

    for (index, token) in tokens.iter().enumerate() {
        // Past the end only happens with a trailing wildcard, which then
        // absorbs the rest.
        let segment = segments.get(index).or_else(|| segments.last())?;

        match segment {
            Segment::Param(name) => {
                path_info.insert(name.clone(), (*token).to_string());
            }
            Segment::Wildcard => {}
            Segment::Literal(literal) if literal == token => {}
            Segment::Literal(_) => return None,
        }
    }

    Some(MatchResult {
        tokens: tokens.iter().map(|t| (*t).to_string()).collect(),
        path_info,
    })
}

fn is_eligible(tokens: &[&str], pattern: &RoutePattern) -> bool {
    pattern.len() == tokens.len()
        || (pattern.ends_with_wildcard() && tokens.len() >= pattern.len())
        || (tokens.is_empty() && pattern.is_catch_all())
}
