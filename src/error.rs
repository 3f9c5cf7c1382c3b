//! Error types for the matching engine.
//!
//! A match either succeeds with a complete [`MatchResult`](crate::MatchResult)
//! or fails with one of these errors. No partial results are produced.

use std::error::Error as StdError;

use thiserror::Error;

use crate::types::ValueKind;

/// Boxed error raised by a custom predicate
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// An error raised while testing a pattern against an item.
///
/// The original error is kept intact as the `source`.
#[derive(Debug, Error)]
#[error("predicate `{description}` failed: {source}")]
pub struct PredicateError {
    /// Description of the pattern that failed
    pub description: String,

    #[source]
    pub source: BoxError,
}

impl PredicateError {
    /// Wrap an error raised by the predicate described by `description`
    pub fn new(description: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self {
            description: description.into(),
            source: source.into(),
        }
    }
}

/// Errors returned by the matching engine
#[derive(Debug, Error)]
pub enum MatchError {
    /// The actual value is not a collection
    #[error("expected a collection of items, got {kind}")]
    InvalidInput { kind: ValueKind },

    /// A predicate failed; the match was abandoned
    #[error(transparent)]
    Predicate(#[from] PredicateError),

    /// A residual component is larger than `SearchLimits::max_residual`
    #[error("indeterminate residual of {size} entries exceeds the limit of {limit}")]
    ResidualTooLarge { size: usize, limit: usize },

    /// The search explored more nodes than `SearchLimits::max_nodes`
    #[error("search abandoned after exploring {explored} nodes (limit {limit})")]
    SearchBudgetExhausted { explored: u64, limit: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predicate_error_keeps_source() {
        let err = PredicateError::new("a custom check", "boom");
        assert_eq!(err.to_string(), "predicate `a custom check` failed: boom");
        assert_eq!(err.source().map(|s| s.to_string()), Some("boom".to_string()));
    }

    #[test]
    fn test_match_error_messages() {
        let err = MatchError::InvalidInput { kind: ValueKind::Integer };
        assert_eq!(err.to_string(), "expected a collection of items, got integer");

        let err = MatchError::ResidualTooLarge { size: 40, limit: 32 };
        assert!(err.to_string().contains("40"));

        let err: MatchError = PredicateError::new("p", "bad").into();
        assert_eq!(err.to_string(), "predicate `p` failed: bad");
    }
}
