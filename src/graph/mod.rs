//! Candidate graph construction and reduction.
//!
//! ## Architecture
//!
//! Matching is a bipartite problem: patterns on one side, items on the
//! other, an edge wherever a pattern matches an item.
//!
//! - [`CandidateGraph`]: immutable graph built from the predicate
//! - [`Residual`]: mutable copy holding only undecided nodes
//! - [`reduce`]: commits forced pairs until a fixed point
//!
//! ## Cost
//!
//! | Step | Complexity |
//! |------|------------|
//! | Build | O(P × I) predicate calls |
//! | Reduce (reciprocal) | O(E log E) per pass, two passes in practice |
//! | Components | O(E log E) |
//!
//! ## Example
//!
//! ```
//! use exact_match::graph::{reduce, CandidateGraph, Propagation};
//!
//! let patterns = [1, 2, 3];
//! let items = [3, 2, 1];
//! let graph = CandidateGraph::build(&patterns, &items, |p, i| Ok::<_, ()>(p == i)).unwrap();
//! let reduction = reduce(&graph, Propagation::default());
//!
//! assert!(reduction.is_determined());
//! assert_eq!(reduction.forced.len(), 3);
//! ```

pub mod candidate;
pub mod residual;
pub mod reduce;

pub use candidate::CandidateGraph;
pub use residual::Residual;
pub use reduce::{reduce, Propagation, Reduction};
