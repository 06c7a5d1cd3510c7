//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request path
//!     → tokenizer.rs (split into segments)
//!     → router.rs (walk routes in declaration order)
//!     → matcher.rs (compare one pattern, capture parameters)
//!     → Return: matched route + path info, or no match
//!
//! Route declaration (at startup or reload):
//!     pattern strings
//!     → pattern.rs (parse & validate)
//!     → Freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Routes validated at declaration, immutable at runtime
//! - No regex in hot path (segment equality only)
//! - Deterministic: same input always matches same route
//! - First match wins (declaration order, not specificity)

pub mod matcher;
pub mod pattern;
pub mod router;
pub mod tokenizer;

pub use matcher::{match_tokens, MatchResult, PathInfo};
pub use pattern::{RouteError, RoutePattern, Segment};
pub use router::{Route, RouteTable, RouteTableBuilder, Selected};
pub use tokenizer::tokenize;
