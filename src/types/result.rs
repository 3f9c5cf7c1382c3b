//! Outcome of a match.
//!
//! [`MatchResult`] is what an assertion layer consumes: the success flag,
//! the unmatched patterns (`missing`) and the unmatched items (`extra`),
//! both in their original order. The index-level [`Assignment`] and the
//! [`MatchStats`] counters are carried along for callers that want them.
//!
//! ## Display Order
//!
//! Failure messages read better sorted, but only when every value can be
//! compared with every other. [`display_order`] implements that policy:
//! sort if the values are mutually orderable, else keep encounter order.

use std::cmp::Ordering;

use crate::types::Pattern;

/// Index-level pairing behind a [`MatchResult`]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Assignment {
    /// `(pattern, item)` pairs, ascending by pattern index
    pub pairs: Vec<(usize, usize)>,

    /// Unmatched pattern indices, ascending
    pub missing: Vec<usize>,

    /// Unmatched item indices, ascending
    pub extra: Vec<usize>,
}

impl Assignment {
    /// Unmatched patterns plus unmatched items
    #[inline]
    pub fn unmatched_count(&self) -> usize {
        self.missing.len() + self.extra.len()
    }
}

/// Counters describing how a match was computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatchStats {
    /// Edges in the candidate graph
    pub edges: usize,

    /// Pairs committed by the reducer
    pub forced_pairs: usize,

    /// Reducer passes, including the final unchanged one
    pub reduction_passes: usize,

    /// Nodes (patterns + items) left for the solver
    pub residual_size: usize,

    /// Residual components searched
    pub components: usize,

    /// Search nodes visited
    pub search_nodes: u64,

    /// Branches cut by the bound
    pub pruned: u64,
}

/// Result of matching items against patterns.
///
/// ## Example
///
/// ```
/// use exact_match::{match_items, Pattern, Value};
///
/// let patterns = [Pattern::literal(1), Pattern::literal(5)];
/// let items = [Value::from(1), Value::from(1), Value::from(5)];
/// let result = match_items(&patterns, &items).unwrap();
///
/// assert!(!result.success);
/// assert!(result.missing.is_empty());
/// assert_eq!(result.extra, vec![&Value::from(1)]);
/// ```
#[derive(Debug, Clone)]
pub struct MatchResult<'a, P, I> {
    /// True iff `missing` and `extra` are both empty
    pub success: bool,

    /// Patterns with no paired item, in pattern order
    pub missing: Vec<&'a P>,

    /// Items with no paired pattern, in item order
    pub extra: Vec<&'a I>,

    pub assignment: Assignment,

    pub stats: MatchStats,
}

impl<'a, P, I> MatchResult<'a, P, I> {
    /// Resolve an assignment against the inputs it was computed from
    ///
    /// # Panics
    ///
    /// Panics if the assignment refers to indices outside the inputs
    pub fn new(patterns: &'a [P], items: &'a [I], assignment: Assignment, stats: MatchStats) -> Self {
        let missing: Vec<&'a P> = assignment.missing.iter().map(|&p| &patterns[p]).collect();
        let extra: Vec<&'a I> = assignment.extra.iter().map(|&i| &items[i]).collect();

        Self {
            success: missing.is_empty() && extra.is_empty(),
            missing,
            extra,
            assignment,
            stats,
        }
    }

    /// Pattern/item pairs in pattern order
    pub fn pairs<'r>(&'r self, patterns: &'a [P], items: &'a [I]) -> impl Iterator<Item = (&'a P, &'a I)> + 'r {
        self.assignment.pairs.iter().map(move |&(p, i)| (&patterns[p], &items[i]))
    }
}

impl<'a, P, I: PartialOrd> MatchResult<'a, P, I> {
    /// `extra`, sorted if every item is orderable against every other
    pub fn extra_for_display(&self) -> Vec<&'a I> {
        display_order(&self.extra, |a, b| a.partial_cmp(b))
    }
}

impl<'a, I> MatchResult<'a, Pattern, I> {
    /// `missing`, sorted if every pattern is a mutually orderable literal
    pub fn missing_for_display(&self) -> Vec<&'a Pattern> {
        display_order(&self.missing, Pattern::partial_cmp_literal)
    }
}

/// Sort `values` if all of them are pairwise comparable, else keep order
pub fn display_order<'a, T, F>(values: &[&'a T], compare: F) -> Vec<&'a T>
where
    T: ?Sized,
    F: Fn(&T, &T) -> Option<Ordering>,
{
    let mut ordered = values.to_vec();
    let orderable = values
        .iter()
        .enumerate()
        .all(|(idx, a)| values[idx + 1..].iter().all(|b| compare(*a, *b).is_some()));

    if orderable {
        ordered.sort_by(|a, b| compare(*a, *b).unwrap_or(Ordering::Equal));
    }
    ordered
}

// ============================================================================
// Unit Tests
// ============================================================================
