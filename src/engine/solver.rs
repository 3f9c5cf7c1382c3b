//! Branch-and-bound search over the indeterminate residual.
//!
//! ## Algorithm
//!
//! The residual is split into connected components and each component is
//! searched on its own; unmatched counts of independent components simply
//! add up. Inside a component:
//!
//! 1. Nodes without a live candidate become unmatched.
//! 2. The bound is `unmatched so far + the residual's minimum unmatched
//!    count`, computed from a maximum matching. A branch is pruned if its
//!    bound exceeds the component's optimum or cannot beat the incumbent.
//! 3. The pattern with the fewest live candidates is picked and the search
//!    branches on pairing it with each candidate, then on leaving it
//!    unmatched.
//!
//! Since the bound is exact, only branches that keep the optimum reachable
//! are descended into, and the search of a component stops at the first
//! complete solution.
//!
//! ## Symmetry
//!
//! Two items with identical live candidate sets are interchangeable, so
//! only the first of them is tried as a partner. Likewise, when a pattern
//! is left unmatched, every pattern with the same live candidate set is
//! left unmatched with it: any solution pairing one of those twins is a
//! relabelling of one already reached through the pairing branches. This
//! keeps groups of duplicate values from blowing up the search.
//!
//! ## Example
//!
//! ```
//! use exact_match::engine::{find_best_solution, SearchLimits};
//! use exact_match::graph::{CandidateGraph, Residual};
//!
//! // Two patterns compete for the same single item
//! let graph = CandidateGraph::from_edges(2, 1, &[(0, 0), (1, 0)]);
//! let residual = Residual::from_graph(&graph);
//!
//! let solution = find_best_solution(&residual, &SearchLimits::default()).unwrap();
//! assert_eq!(solution.pairs.len(), 1);
//! assert_eq!(solution.unmatched_count(), 1);
//! ```

use std::collections::BTreeSet;

use serde::Deserialize;
use tracing::{debug, trace, warn};

use crate::error::MatchError;
use crate::graph::Residual;

// ============================================================================
// Limits
// ============================================================================

/// Guards against pathological residuals.
///
/// Both limits are off by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct SearchLimits {
    /// Largest residual component (patterns + items) that will be searched
    pub max_residual: Option<usize>,

    /// Maximum number of search nodes across all components
    pub max_nodes: Option<u64>,
}

impl SearchLimits {
    pub fn with_max_residual(mut self, limit: usize) -> Self {
        self.max_residual = Some(limit);
        self
    }

    pub fn with_max_nodes(mut self, limit: u64) -> Self {
        self.max_nodes = Some(limit);
        self
    }
}

// ============================================================================
// Solution
// ============================================================================

/// A (partial) assignment of patterns to items.
///
/// Every index lives in exactly one of: a pair, the unmatched sets, the
/// indeterminate sets.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Solution {
    /// Matched `(pattern, item)` pairs
    pub pairs: Vec<(usize, usize)>,

    pub unmatched_patterns: BTreeSet<usize>,

    pub unmatched_items: BTreeSet<usize>,

    /// Patterns not decided yet
    pub indeterminate_patterns: BTreeSet<usize>,

    /// Items not decided yet
    pub indeterminate_items: BTreeSet<usize>,
}

impl Solution {
    /// Fresh solution where every node of `residual` is undecided
    pub fn pending(residual: &Residual) -> Self {
        Self {
            indeterminate_patterns: residual.patterns().collect(),
            indeterminate_items: residual.items().collect(),
            ..Self::default()
        }
    }

    /// Unmatched patterns plus unmatched items
    #[inline]
    pub fn unmatched_count(&self) -> usize {
        self.unmatched_patterns.len() + self.unmatched_items.len()
    }

    /// True once nothing is left undecided
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.indeterminate_patterns.is_empty() && self.indeterminate_items.is_empty()
    }

    /// True if every pattern and item is paired
    #[inline]
    pub fn is_perfect(&self) -> bool {
        self.is_complete() && self.unmatched_count() == 0
    }

    pub fn pair(&mut self, p: usize, i: usize) {
        let was_pending = self.indeterminate_patterns.remove(&p) & self.indeterminate_items.remove(&i);
        debug_assert!(was_pending, "pairing a decided node ({}, {})", p, i);
        self.pairs.push((p, i));
    }

    pub fn leave_pattern(&mut self, p: usize) {
        let was_pending = self.indeterminate_patterns.remove(&p);
        debug_assert!(was_pending, "pattern {} already decided", p);
        self.unmatched_patterns.insert(p);
    }

    pub fn leave_item(&mut self, i: usize) {
        let was_pending = self.indeterminate_items.remove(&i);
        debug_assert!(was_pending, "item {} already decided", i);
        self.unmatched_items.insert(i);
    }

    /// Fold a complete solution of a disjoint component into this one
    pub fn absorb(&mut self, other: Solution) {
        for &(p, i) in &other.pairs {
            self.indeterminate_patterns.remove(&p);
            self.indeterminate_items.remove(&i);
        }
        for p in &other.unmatched_patterns {
            self.indeterminate_patterns.remove(p);
        }
        for i in &other.unmatched_items {
            self.indeterminate_items.remove(i);
        }
        self.pairs.extend(other.pairs);
        self.unmatched_patterns.extend(other.unmatched_patterns);
        self.unmatched_items.extend(other.unmatched_items);
    }
}

// ============================================================================
// Solver
// ============================================================================

/// Counters describing one search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchStats {
    /// Residual components searched
    pub components: usize,
    /// Search nodes visited
    pub nodes: u64,
    /// Branches cut by the bound
    pub pruned: u64,
}

/// Branch-and-bound solver for residual graphs
#[derive(Debug, Clone, Default)]
pub struct Solver {
    limits: SearchLimits,
    stats: SearchStats,
}

impl Solver {
    pub fn new(limits: SearchLimits) -> Self {
        Self {
            limits,
            stats: SearchStats::default(),
        }
    }

    /// Counters accumulated by the last call to [`Solver::solve`]
    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Find a complete solution of `residual` with minimal unmatched count
    ///
    /// # Errors
    ///
    /// - [`MatchError::ResidualTooLarge`] if a component exceeds `max_residual`
    /// - [`MatchError::SearchBudgetExhausted`] if `max_nodes` runs out
    pub fn solve(&mut self, residual: &Residual) -> Result<Solution, MatchError> {
        self.stats = SearchStats::default();
        let mut solution = Solution::pending(residual);
        if residual.is_empty() {
            return Ok(solution);
        }

        let components = residual.components();
        if let Some(limit) = self.limits.max_residual {
            if let Some(size) = components.iter().map(Residual::len).find(|&len| len > limit) {
                warn!(size, limit, "residual component exceeds search limit");
                return Err(MatchError::ResidualTooLarge { size, limit });
            }
        }

        for component in components {
            self.stats.components += 1;
            let best = self.solve_component(component)?;
            solution.absorb(best);
        }

        debug_assert!(solution.is_complete());
        debug!(
            components = self.stats.components,
            nodes = self.stats.nodes,
            pruned = self.stats.pruned,
            unmatched = solution.unmatched_count(),
            "residual search finished"
        );
        Ok(solution)
    }

    fn solve_component(&mut self, component: Residual) -> Result<Solution, MatchError> {
        let size = component.len();
        let mut search = ComponentSearch {
            target: component.unmatched_lower_bound(),
            best: None,
            stats: &mut self.stats,
            max_nodes: self.limits.max_nodes,
        };
        let root = Solution::pending(&component);
        search.explore(component, root)?;

        let best = search.best.take().unwrap_or_default();
        trace!(size, unmatched = best.unmatched_count(), "component solved");
        Ok(best)
    }
}

/// Find the best complete solution of `residual` under `limits`
pub fn find_best_solution(residual: &Residual, limits: &SearchLimits) -> Result<Solution, MatchError> {
    Solver::new(*limits).solve(residual)
}

// ============================================================================
// Component Search
// ============================================================================

struct ComponentSearch<'a> {
    /// Optimum of the component; reaching it ends the search
    target: usize,
    best: Option<Solution>,
    stats: &'a mut SearchStats,
    max_nodes: Option<u64>,
}

impl ComponentSearch<'_> {
    fn finished(&self) -> bool {
        self.best
            .as_ref()
            .map_or(false, |best| best.unmatched_count() <= self.target)
    }

    fn visit(&mut self) -> Result<(), MatchError> {
        self.stats.nodes += 1;
        match self.max_nodes {
            Some(limit) if self.stats.nodes > limit => {
                warn!(limit, "search node budget exhausted");
                Err(MatchError::SearchBudgetExhausted {
                    explored: self.stats.nodes,
                    limit,
                })
            }
            _ => Ok(()),
        }
    }

    fn explore(&mut self, mut residual: Residual, mut partial: Solution) -> Result<(), MatchError> {
        self.visit()?;

        let (patterns, items) = residual.take_isolated();
        for p in patterns {
            partial.leave_pattern(p);
        }
        for i in items {
            partial.leave_item(i);
        }

        let bound = partial.unmatched_count() + residual.unmatched_lower_bound();
        let beaten = self
            .best
            .as_ref()
            .map_or(false, |best| bound >= best.unmatched_count());
        if bound > self.target || beaten {
            self.stats.pruned += 1;
            return Ok(());
        }

        // Every remaining item has a pattern, so no pattern means no residual
        let Some(p) = residual.most_constrained_pattern() else {
            trace!(unmatched = partial.unmatched_count(), "new incumbent");
            self.best = Some(partial);
            return Ok(());
        };

        let candidates: Vec<usize> = residual.pattern_candidates(p).collect();
        let mut tried: Vec<BTreeSet<usize>> = Vec::new();
        for i in candidates {
            if self.finished() {
                return Ok(());
            }
            let neighbours: BTreeSet<usize> = residual.item_candidates(i).collect();
            if tried.contains(&neighbours) {
                continue;
            }

            let mut next = residual.clone();
            next.commit(p, i);
            let mut branch = partial.clone();
            branch.pair(p, i);
            self.explore(next, branch)?;

            tried.push(neighbours);
        }

        if self.finished() {
            return Ok(());
        }

        let twins: Vec<usize> = residual
            .patterns()
            .filter(|&q| residual.pattern_candidates(q).eq(residual.pattern_candidates(p)))
            .collect();
        for q in twins {
            residual.remove_pattern(q);
            partial.leave_pattern(q);
        }
        self.explore(residual, partial)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::CandidateGraph;

    fn residual(patterns: usize, items: usize, edges: &[(usize, usize)]) -> Residual {
        Residual::from_graph(&CandidateGraph::from_edges(patterns, items, edges))
    }

    fn solve(r: &Residual) -> Solution {
        find_best_solution(r, &SearchLimits::default()).unwrap()
    }

    fn assert_valid(r: &Residual, solution: &Solution) {
        assert!(solution.is_complete());
        let mut patterns = BTreeSet::new();
        let mut items = BTreeSet::new();
        for &(p, i) in &solution.pairs {
            assert!(r.pattern_candidates(p).any(|c| c == i), "pair ({}, {}) is not an edge", p, i);
            assert!(patterns.insert(p));
            assert!(items.insert(i));
        }
        assert!(patterns.is_disjoint(&solution.unmatched_patterns));
        assert!(items.is_disjoint(&solution.unmatched_items));
        assert_eq!(patterns.len() + solution.unmatched_patterns.len(), r.pattern_count());
        assert_eq!(items.len() + solution.unmatched_items.len(), r.item_count());
    }

    #[test]
    fn test_empty_residual() {
        let r = Residual::default();
        let mut solver = Solver::default();
        let solution = solver.solve(&r).unwrap();

        assert!(solution.is_perfect());
        assert_eq!(solver.stats().nodes, 0);
        assert_eq!(solver.stats().components, 0);
    }

    #[test]
    fn test_perfect_duplicates() {
        let edges: Vec<_> = (0..3).flat_map(|p| (0..3).map(move |i| (p, i))).collect();
        let r = residual(3, 3, &edges);
        let solution = solve(&r);

        assert_valid(&r, &solution);
        assert!(solution.is_perfect());
    }

    #[test]
    fn test_surplus_item() {
        let r = residual(1, 2, &[(0, 0), (0, 1)]);
        let solution = solve(&r);

        assert_valid(&r, &solution);
        assert_eq!(solution.unmatched_count(), 1);
        assert_eq!(solution.unmatched_items.len(), 1);
    }

    #[test]
    fn test_most_constrained_pattern_first() {
        // p0 -> {i0, i1}, p1 -> {i0}: pairing p0 with i0 first is a dead end
        let r = residual(2, 2, &[(0, 0), (0, 1), (1, 0)]);
        let solution = solve(&r);

        assert_valid(&r, &solution);
        assert!(solution.is_perfect());
    }

    #[test]
    fn test_three_patterns_two_items() {
        // p0 -> {i0, i1}, p1 -> {i0}, p2 -> {i1}: exactly one pattern is left over
        let r = residual(3, 2, &[(0, 0), (0, 1), (1, 0), (2, 1)]);
        let solution = solve(&r);

        assert_valid(&r, &solution);
        assert_eq!(solution.unmatched_count(), 1);
        assert_eq!(solution.unmatched_patterns.len(), 1);
        assert!(solution.unmatched_items.is_empty());
    }

    #[test]
    fn test_hall_violation() {
        // Ten patterns that only accept i0, one pattern that accepts anything
        let mut edges: Vec<_> = (0..10).map(|p| (p, 0)).collect();
        edges.extend((0..11).map(|i| (10, i)));
        let r = residual(11, 11, &edges);
        let solution = solve(&r);

        assert_valid(&r, &solution);
        assert_eq!(solution.pairs.len(), 2);
        assert_eq!(solution.unmatched_count(), 18);
    }

    #[test]
    fn test_components_are_solved_independently() {
        let r = residual(4, 4, &[(0, 0), (0, 1), (1, 0), (1, 1), (2, 2), (2, 3), (3, 2), (3, 3)]);
        let mut solver = Solver::default();
        let solution = solver.solve(&r).unwrap();

        assert_valid(&r, &solution);
        assert!(solution.is_perfect());
        assert_eq!(solver.stats().components, 2);
    }

    #[test]
    fn test_large_duplicate_group_is_cheap() {
        // 25 identical patterns against 24 identical items
        let edges: Vec<_> = (0..25).flat_map(|p| (0..24).map(move |i| (p, i))).collect();
        let r = residual(25, 24, &edges);
        let mut solver = Solver::default();
        let solution = solver.solve(&r).unwrap();

        assert_valid(&r, &solution);
        assert_eq!(solution.unmatched_count(), 1);
        assert!(solver.stats().nodes < 100, "explored {} nodes", solver.stats().nodes);
    }

    #[test]
    fn test_overlapping_distinct_candidates_stay_cheap() {
        // Twenty patterns, each on a different 3-subset of six items
        let mut edges = Vec::new();
        let mut p = 0;
        for a in 0..6 {
            for b in a + 1..6 {
                for c in b + 1..6 {
                    edges.extend([(p, a), (p, b), (p, c)]);
                    p += 1;
                }
            }
        }
        let r = residual(20, 6, &edges);
        let mut solver = Solver::default();
        let solution = solver.solve(&r).unwrap();

        assert_valid(&r, &solution);
        assert_eq!(solution.pairs.len(), 6);
        assert_eq!(solution.unmatched_count(), 14);
        assert!(solver.stats().nodes < 200, "explored {} nodes", solver.stats().nodes);
    }

    #[test]
    fn test_max_residual_limit() {
        let edges: Vec<_> = (0..3).flat_map(|p| (0..3).map(move |i| (p, i))).collect();
        let r = residual(3, 3, &edges);

        let err = find_best_solution(&r, &SearchLimits::default().with_max_residual(5)).unwrap_err();
        assert!(matches!(err, MatchError::ResidualTooLarge { size: 6, limit: 5 }));

        assert!(find_best_solution(&r, &SearchLimits::default().with_max_residual(6)).is_ok());
    }

    #[test]
    fn test_max_nodes_limit() {
        let r = residual(2, 2, &[(0, 0), (0, 1), (1, 0)]);
        let err = find_best_solution(&r, &SearchLimits::default().with_max_nodes(1)).unwrap_err();
        assert!(matches!(err, MatchError::SearchBudgetExhausted { limit: 1, .. }));
    }

    #[test]
    fn test_solution_bookkeeping() {
        let r = residual(2, 2, &[(0, 0), (1, 1)]);
        let mut solution = Solution::pending(&r);
        assert!(!solution.is_complete());

        solution.pair(0, 0);
        solution.leave_pattern(1);
        solution.leave_item(1);

        assert!(solution.is_complete());
        assert!(!solution.is_perfect());
        assert_eq!(solution.unmatched_count(), 2);
    }
}
