//! The matching engine entry points.
//!
//! ## Pipeline
//!
//! ```text
//! patterns + items
//!     -> CandidateGraph::build   (every pattern against every item)
//!     -> reduce                  (commit forced pairs to a fixed point)
//!     -> Solver::solve           (branch and bound, residual only)
//!     -> classify                (missing / extra in original order)
//! ```
//!
//! The solver never sees the full input, only what the reducer could not
//! decide. For inputs without ambiguous duplicates that is nothing at all.

use serde::Deserialize;
use tracing::debug;

use crate::engine::solver::{SearchLimits, SearchStats, Solution, Solver};
use crate::error::{MatchError, PredicateError};
use crate::graph::{reduce, CandidateGraph, Propagation, Reduction};
use crate::types::{Assignment, MatchResult, MatchStats, Matches, Pattern, Value};

// ============================================================================
// Configuration
// ============================================================================

/// Engine configuration.
///
/// Deserializable so hosts can embed it in their own config files:
///
/// ```
/// use exact_match::{MatchConfig, Propagation};
///
/// let config: MatchConfig = toml::from_str(r#"
///     propagation = "degree-one"
///
///     [limits]
///     max_residual = 64
/// "#).unwrap();
///
/// assert_eq!(config.propagation, Propagation::DegreeOne);
/// assert_eq!(config.limits.max_residual, Some(64));
/// assert_eq!(config.limits.max_nodes, None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Which single-candidate commits the reducer may make
    pub propagation: Propagation,

    /// Guards on the residual search
    pub limits: SearchLimits,
}

impl MatchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_propagation(mut self, propagation: Propagation) -> Self {
        self.propagation = propagation;
        self
    }

    pub fn with_limits(mut self, limits: SearchLimits) -> Self {
        self.limits = limits;
        self
    }
}

// ============================================================================
// Matcher
// ============================================================================

/// Stateless matching engine.
///
/// Holds only its configuration, so one instance can be shared freely
/// between threads.
///
/// ## Example
///
/// ```
/// use exact_match::{Matcher, Pattern, Value};
///
/// let matcher = Matcher::default();
/// let patterns = [Pattern::regex("fool").unwrap(), Pattern::regex("foo").unwrap()];
/// let items = [Value::from("food"), Value::from("fool")];
///
/// let result = matcher.match_items(&patterns, &items).unwrap();
/// assert!(result.success);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchingEngine {
    config: MatchConfig,
}

/// Short name for [`MatchingEngine`]
pub type Matcher = MatchingEngine;

impl MatchingEngine {
    pub fn new(config: MatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Match built-in patterns against a slice of values
    pub fn match_items<'a>(
        &self,
        patterns: &'a [Pattern],
        items: &'a [Value],
    ) -> Result<MatchResult<'a, Pattern, Value>, MatchError> {
        self.match_with(patterns, items, |pattern, item| pattern.matches(item))
    }

    /// Match built-in patterns against a value that must be a list
    ///
    /// # Errors
    ///
    /// [`MatchError::InvalidInput`] if `actual` is not a [`Value::List`]
    pub fn match_values<'a>(
        &self,
        patterns: &'a [Pattern],
        actual: &'a Value,
    ) -> Result<MatchResult<'a, Pattern, Value>, MatchError> {
        let items = actual
            .as_list()
            .ok_or(MatchError::InvalidInput { kind: actual.kind() })?;
        self.match_items(patterns, items)
    }

    /// Match arbitrary patterns against arbitrary items
    ///
    /// # Arguments
    ///
    /// * `patterns` - Expected-side patterns
    /// * `items` - Actual-side items
    /// * `predicate` - Decides whether a pattern matches an item; its first
    ///   error aborts the match
    pub fn match_with<'a, P, I, F>(
        &self,
        patterns: &'a [P],
        items: &'a [I],
        predicate: F,
    ) -> Result<MatchResult<'a, P, I>, MatchError>
    where
        F: FnMut(&P, &I) -> Result<bool, PredicateError>,
    {
        let graph = CandidateGraph::build(patterns, items, predicate)?;
        let reduction = reduce(&graph, self.config.propagation);

        debug!(
            patterns = patterns.len(),
            items = items.len(),
            edges = graph.edge_count(),
            forced = reduction.forced.len(),
            residual = reduction.residual.len(),
            "candidate graph reduced"
        );

        let mut solver = Solver::new(self.config.limits);
        let solution = solver.solve(&reduction.residual)?;

        Ok(classify(patterns, items, &graph, reduction, solution, solver.stats()))
    }
}

/// Merge forced pairs and the solver's output into a [`MatchResult`]
pub fn classify<'a, P, I>(
    patterns: &'a [P],
    items: &'a [I],
    graph: &CandidateGraph,
    reduction: Reduction,
    solution: Solution,
    search: SearchStats,
) -> MatchResult<'a, P, I> {
    debug_assert!(solution.is_complete());
    debug_assert!(solution.pairs.iter().all(|&(p, i)| graph.has_edge(p, i)));

    let stats = MatchStats {
        edges: graph.edge_count(),
        forced_pairs: reduction.forced.len(),
        reduction_passes: reduction.passes,
        residual_size: reduction.residual.len(),
        components: search.components,
        search_nodes: search.nodes,
        pruned: search.pruned,
    };

    let mut pairs = reduction.forced;
    pairs.extend(solution.pairs);
    pairs.sort_unstable();

    let mut missing = reduction.unmatched_patterns;
    missing.extend(solution.unmatched_patterns);
    missing.sort_unstable();

    let mut extra = reduction.unmatched_items;
    extra.extend(solution.unmatched_items);
    extra.sort_unstable();

    let assignment = Assignment { pairs, missing, extra };
    MatchResult::new(patterns, items, assignment, stats)
}

// ============================================================================
// Convenience Functions
// ============================================================================

/// [`MatchingEngine::match_items`] with the default configuration
pub fn match_items<'a>(
    patterns: &'a [Pattern],
    items: &'a [Value],
) -> Result<MatchResult<'a, Pattern, Value>, MatchError> {
    MatchingEngine::default().match_items(patterns, items)
}

/// [`MatchingEngine::match_values`] with the default configuration
pub fn match_values<'a>(
    patterns: &'a [Pattern],
    actual: &'a Value,
) -> Result<MatchResult<'a, Pattern, Value>, MatchError> {
    MatchingEngine::default().match_values(patterns, actual)
}

// ============================================================================
// Unit Tests
// ============================================================================
