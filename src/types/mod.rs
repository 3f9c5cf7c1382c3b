//! Core data types for the matching engine
//!
//! ## Types
//!
//! - [`Value`]: a dynamic actual-side element
//! - [`ValueKind`]: kind of a value, also usable as a type-check pattern
//! - [`Pattern`]: expected-side matcher (literal, regex, kind or custom)
//! - [`Matches`]: the predicate capability every pattern implements
//! - [`MatchResult`]: success flag plus missing patterns and extra items
//!
//! Patterns and items are identified by their position in the input
//! slices. Two equal patterns are still two distinct patterns.

mod value;
mod pattern;
pub mod result;

// Re-export all types at module level
pub use value::{Value, ValueKind};
pub use pattern::{CustomPredicate, Matches, Pattern};
pub use result::{display_order, Assignment, MatchResult, MatchStats};
