//! # exact-match
//!
//! Order-independent, exact-membership matching of a collection against
//! a list of patterns.
//!
//! ## Architecture
//!
//! - **Types**: `Value`, `Pattern`, `MatchResult`
//! - **Graph**: candidate graph and its fixed-point reduction
//! - **Engine**: branch-and-bound search over the residual, plus the API
//!
//! ## Design Principles
//!
//! 1. **Minimal mismatch**: missing + extra is always as small as possible
//! 2. **Reduction before search**: unambiguous pairs never reach the solver
//! 3. **Errors propagate**: a failing predicate aborts the whole match
//! 4. **Stateless**: the engine is a pure function of its inputs
//!
//! ## Example
//!
//! ```
//! use exact_match::{match_items, Pattern, Value};
//!
//! let patterns = [Pattern::regex("fool").unwrap(), Pattern::regex("foo").unwrap()];
//! let items = [Value::from("fool"), Value::from("food")];
//!
//! assert!(match_items(&patterns, &items).unwrap().success);
//! ```

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Core data types: Value, Pattern, MatchResult
pub mod types;

/// Candidate graph, residual and reducer
pub mod graph;

/// Matching engine: solver and public API
pub mod engine;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use error::{MatchError, PredicateError};
pub use types::{CustomPredicate, Matches, MatchResult, Pattern, Value, ValueKind};
pub use graph::{CandidateGraph, Propagation};
pub use engine::{match_items, match_values, MatchConfig, Matcher, MatchingEngine, SearchLimits};
