//! Route pattern definitions.
//!
//! A pattern is an ordered list of segments. Each segment is a literal,
//! a named parameter, or the trailing wildcard. Patterns are validated when
//! they are built, so a malformed pattern never reaches request time.
//!
//! # String form
//! ```text
//! /                  root, matches only the empty path
//! /todos/:id         literal "todos", parameter "id"
//! /static/*          literal "static", then one or more trailing segments
//! ```

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::routing::tokenizer::tokenize;

/// Marker for the trailing wildcard in the string form.
pub const WILDCARD: &str = "*";

/// Prefix that turns a segment of the string form into a parameter.
pub const PARAM_PREFIX: char = ':';

/// A single element of a route pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Matches a token with identical content.
    Literal(String),
    /// Matches any single token, binding it under this name.
    Param(String),
    /// Absorbs all remaining tokens. Only valid as the last segment.
    Wildcard,
}

impl Segment {
    pub fn literal(value: impl Into<String>) -> Self {
        Segment::Literal(value.into())
    }

    pub fn param(name: impl Into<String>) -> Self {
        Segment::Param(name.into())
    }

    fn parse(raw: &str) -> Self {
        if raw == WILDCARD {
            Segment::Wildcard
        } else if let Some(name) = raw.strip_prefix(PARAM_PREFIX) {
            Segment::Param(name.to_string())
        } else {
            Segment::Literal(raw.to_string())
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Literal(value) => f.write_str(value),
            Segment::Param(name) => write!(f, "{}{}", PARAM_PREFIX, name),
            Segment::Wildcard => f.write_str(WILDCARD),
        }
    }
}

/// Errors raised while declaring a route.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// A wildcard appeared before the final position.
    #[error("wildcard at position {position} must be the last segment of `{pattern}`")]
    WildcardNotLast { pattern: String, position: usize },

    /// The same parameter name is bound twice.
    #[error("parameter `{name}` appears more than once in `{pattern}`")]
    DuplicateParam { pattern: String, name: String },

    /// A parameter marker without a name (`:`).
    #[error("parameter without a name in `{pattern}`")]
    EmptyParamName { pattern: String },

    /// A literal that no token could ever equal.
    #[error("literal segment {literal:?} can never match a path token")]
    InvalidLiteral { literal: String },
}

/// A validated route pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoutePattern {
    segments: Vec<Segment>,
}

impl RoutePattern {
    /// Build a pattern from segments, rejecting malformed ones.
    pub fn new(segments: Vec<Segment>) -> Result<Self, RouteError> {
        let pattern = Self { segments };
        pattern.validate()?;
        Ok(pattern)
    }

    /// The root pattern, matching only the empty path.
    pub fn root() -> Self {
        Self { segments: Vec::new() }
    }

    /// The catch-all pattern `[*]`, matching every path.
    pub fn any() -> Self {
        Self {
            segments: vec![Segment::Wildcard],
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// True when the last segment is the wildcard.
    pub fn ends_with_wildcard(&self) -> bool {
        matches!(self.segments.last(), Some(Segment::Wildcard))
    }

    /// True for the catch-all pattern `[*]`.
    pub fn is_catch_all(&self) -> bool {
        self.segments.len() == 1 && self.ends_with_wildcard()
    }

    /// Parameter names bound by this pattern, in order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Param(name) => Some(name.as_str()),
            _ => None,
        })
    }

    fn validate(&self) -> Result<(), RouteError> {
        let last = self.segments.len().saturating_sub(1);
        let mut seen = HashSet::new();

        for (position, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Wildcard if position != last => {
                    return Err(RouteError::WildcardNotLast {
                        pattern: self.to_string(),
                        position,
                    });
                }
                Segment::Wildcard => {}
                Segment::Param(name) if name.is_empty() => {
                    return Err(RouteError::EmptyParamName {
                        pattern: self.to_string(),
                    });
                }
                Segment::Param(name) => {
                    if !seen.insert(name.as_str()) {
                        return Err(RouteError::DuplicateParam {
                            pattern: self.to_string(),
                            name: name.clone(),
                        });
                    }
                }
                Segment::Literal(literal) => {
                    if literal.is_empty() || literal.contains('/') || literal.trim() != literal {
                        return Err(RouteError::InvalidLiteral {
                            literal: literal.clone(),
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

impl FromStr for RoutePattern {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let segments = tokenize(s).into_iter().map(Segment::parse).collect();
        Self::new(segments)
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_string_form() {
        let pattern: RoutePattern = "/todos/:id/*".parse().unwrap();
        assert_eq!(
            pattern.segments(),
            &[Segment::literal("todos"), Segment::param("id"), Segment::Wildcard]
        );
        assert!(pattern.ends_with_wildcard());
        assert_eq!(pattern.param_names().collect::<Vec<_>>(), vec!["id"]);
    }

    #[test]
    fn test_root_and_catch_all() {
        assert_eq!("/".parse::<RoutePattern>().unwrap(), RoutePattern::root());
        assert_eq!("".parse::<RoutePattern>().unwrap(), RoutePattern::root());
        assert_eq!("/*".parse::<RoutePattern>().unwrap(), RoutePattern::any());
        assert!(RoutePattern::any().is_catch_all());
        assert!(!RoutePattern::root().is_catch_all());
    }

    #[test]
    fn test_display_round_trips() {
        for raw in ["/", "/todos", "/todos/:id", "/files/*"] {
            assert_eq!(raw.parse::<RoutePattern>().unwrap().to_string(), raw);
        }
    }

    #[test]
    fn test_wildcard_must_be_last() {
        let err = "/a/*/b".parse::<RoutePattern>().unwrap_err();
        assert_eq!(
            err,
            RouteError::WildcardNotLast {
                pattern: "/a/*/b".into(),
                position: 1
            }
        );
    }

    #[test]
    fn test_duplicate_params_rejected() {
        let err = "/a/:id/:id".parse::<RoutePattern>().unwrap_err();
        assert!(matches!(err, RouteError::DuplicateParam { ref name, .. } if name == "id"));
    }

    #[test]
    fn test_empty_param_rejected() {
        assert!(matches!(
            "/a/:".parse::<RoutePattern>(),
            Err(RouteError::EmptyParamName { .. })
        ));
    }

    #[test]
    fn test_invalid_literals_rejected() {
        for bad in ["", "a/b", " a"] {
            let err = RoutePattern::new(vec![Segment::literal(bad)]).unwrap_err();
            assert!(matches!(err, RouteError::InvalidLiteral { .. }), "{bad:?}");
        }
    }
}
