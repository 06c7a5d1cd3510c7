//! Request path tokenization.
//!
//! A path is split on `/`; each piece is trimmed of surrounding whitespace
//! and empty pieces are dropped. Leading, trailing and repeated slashes
//! therefore never produce tokens.

/// Split a request path into its non-empty, trimmed segments.
///
/// Borrows from `path`; never fails.
pub fn tokenize(path: &str) -> Vec<&str> {
    path.split('/')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .collect()
}
