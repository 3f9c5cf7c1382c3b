//! Fixed-point reduction of the candidate graph.
//!
//! ## Rules
//!
//! Each pass applies, in order:
//!
//! 1. Nodes with no live candidate are declared unmatched and removed.
//! 2. Every pattern whose sole candidate is an item whose sole candidate is
//!    that same pattern is paired with it (a *forced pair*).
//! 3. The same check from the item side.
//!
//! Passes repeat until one changes nothing. A forced pair can never cost
//! optimality: neither endpoint has any other edge to offer.
//!
//! With [`Propagation::DegreeOne`] rules 2 and 3 only require the sole
//! candidate on *one* side. That is still safe (some maximum pairing always
//! contains the only edge of a degree-one node) and lets commits cascade
//! through chains of overlapping patterns.
//!
//! ## Example
//!
//! ```
//! use exact_match::graph::{reduce, CandidateGraph, Propagation};
//!
//! // pattern 0 -> item 1, pattern 1 -> items {0, 2}, pattern 2 -> nothing
//! let graph = CandidateGraph::from_edges(3, 3, &[(0, 1), (1, 0), (1, 2)]);
//! let reduction = reduce(&graph, Propagation::Reciprocal);
//!
//! assert_eq!(reduction.forced, vec![(0, 1)]);
//! assert_eq!(reduction.unmatched_patterns, vec![2]);
//! assert_eq!(reduction.residual.len(), 3);
//! ```

use serde::Deserialize;
use tracing::trace;

use crate::graph::{CandidateGraph, Residual};

/// Which single-candidate nodes the reducer may commit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Propagation {
    /// Only pairs that are each other's sole candidate
    #[default]
    Reciprocal,
    /// Any node with a sole candidate
    DegreeOne,
}

/// Output of [`reduce`]
#[derive(Debug, Clone, Default)]
pub struct Reduction {
    /// Committed `(pattern, item)` pairs, in commit order
    pub forced: Vec<(usize, usize)>,

    /// Patterns left without any candidate, ascending
    pub unmatched_patterns: Vec<usize>,

    /// Items left without any candidate, ascending
    pub unmatched_items: Vec<usize>,

    /// Indeterminate remainder; every node in it has at least one edge
    pub residual: Residual,

    /// Number of passes run, including the final unchanged one
    pub passes: usize,
}

impl Reduction {
    /// True when nothing is left for the solver
    #[inline]
    pub fn is_determined(&self) -> bool {
        self.residual.is_empty()
    }
}

/// Reduce `graph` to its indeterminate residual
///
/// # Arguments
///
/// * `graph` - The full candidate graph
/// * `propagation` - Which single-candidate commits are allowed
pub fn reduce(graph: &CandidateGraph, propagation: Propagation) -> Reduction {
    let mut reduction = Reduction {
        residual: Residual::from_graph(graph),
        ..Reduction::default()
    };

    loop {
        reduction.passes += 1;
        if !sweep(&mut reduction, propagation) {
            break;
        }
    }

    reduction.unmatched_patterns.sort_unstable();
    reduction.unmatched_items.sort_unstable();

    trace!(
        passes = reduction.passes,
        forced = reduction.forced.len(),
        residual = reduction.residual.len(),
        "reduction reached fixed point"
    );

    reduction
}

/// One full pass over both sides; returns whether anything changed
fn sweep(reduction: &mut Reduction, propagation: Propagation) -> bool {
    let residual = &mut reduction.residual;
    let mut changed = false;

    let (patterns, items) = residual.take_isolated();
    changed |= !patterns.is_empty() || !items.is_empty();
    reduction.unmatched_patterns.extend(patterns);
    reduction.unmatched_items.extend(items);

    let patterns: Vec<usize> = residual.patterns().collect();
    for p in patterns {
        let Some(i) = residual.sole_item_of(p) else {
            continue;
        };
        if propagation == Propagation::DegreeOne || residual.sole_pattern_of(i) == Some(p) {
            residual.commit(p, i);
            reduction.forced.push((p, i));
            changed = true;
        }
    }

    let items: Vec<usize> = residual.items().collect();
    for i in items {
        let Some(p) = residual.sole_pattern_of(i) else {
            continue;
        };
        if propagation == Propagation::DegreeOne || residual.sole_item_of(p) == Some(i) {
            residual.commit(p, i);
            reduction.forced.push((p, i));
            changed = true;
        }
    }

    changed
}

// ============================================================================
// Unit Tests
// ============================================================================
