//! Matching engine module.
//!
//! ## Design Principles
//!
//! 1. **Two phases**: reduce first, search only what reduction leaves
//! 2. **Stateless**: every call builds its own graph; nothing is cached
//! 3. **Synchronous**: no I/O, no threads, no suspension
//! 4. **Fail fast**: the first predicate error aborts the match
//!
//! ## Guarantees
//!
//! - `success` is true iff every pattern and item can be paired
//! - `missing` and `extra` have the minimum possible combined size
//! - Which of several interchangeable duplicates ends up unpaired is
//!   not part of the contract
//!
//! ## Example
//!
//! ```
//! use exact_match::engine::MatchingEngine;
//! use exact_match::types::{Pattern, Value};
//!
//! let engine = MatchingEngine::default();
//! let patterns = [Pattern::literal(1), Pattern::literal(1), Pattern::literal(5)];
//! let items = [Value::from(1), Value::from(5)];
//!
//! let result = engine.match_items(&patterns, &items).unwrap();
//! assert!(!result.success);
//! assert_eq!(result.missing.len(), 1);
//! assert!(result.extra.is_empty());
//! ```

pub mod matcher;
pub mod solver;

pub use matcher::{classify, match_items, match_values, MatchConfig, Matcher, MatchingEngine};
pub use solver::{find_best_solution, SearchLimits, SearchStats, Solution, Solver};
