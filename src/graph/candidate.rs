//! Bipartite compatibility graph between pattern and item indices.
//!
//! ## Layout
//!
//! The graph is stored as two adjacency lists, one per side:
//!
//! - `pattern_candidates[p]`: items pattern `p` matches (ascending)
//! - `item_candidates[i]`: patterns item `i` is matched by (ascending)
//!
//! Every edge is recorded on both sides or on neither. The graph is never
//! mutated after [`CandidateGraph::build`] returns; the reducer works on
//! its own [`Residual`](crate::graph::Residual) copy.
//!
//! ## Example
//!
//! ```
//! use exact_match::graph::CandidateGraph;
//!
//! let patterns = [1, 2, 2];
//! let items = [2, 1, 3];
//! let graph = CandidateGraph::build(&patterns, &items, |p, i| Ok::<_, ()>(p == i)).unwrap();
//!
//! assert_eq!(graph.candidates_for_pattern(0), &[1]);
//! assert_eq!(graph.candidates_for_item(0), &[1, 2]);
//! assert!(graph.candidates_for_item(2).is_empty());
//! ```

/// Compatibility graph: edge `(p, i)` iff pattern `p` matches item `i`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CandidateGraph {
    /// Pattern index -> matching item indices
    pattern_candidates: Vec<Vec<usize>>,

    /// Item index -> matching pattern indices
    item_candidates: Vec<Vec<usize>>,

    /// Total number of edges
    edge_count: usize,
}

impl CandidateGraph {
    /// Build the graph by testing every pattern against every item
    ///
    /// Pairs are evaluated pattern by pattern, items in order. The first
    /// error stops the build and is returned as-is.
    ///
    /// # Arguments
    ///
    /// * `patterns` - Expected-side patterns
    /// * `items` - Actual-side items
    /// * `matches` - Predicate deciding whether a pattern matches an item
    pub fn build<P, I, E, F>(patterns: &[P], items: &[I], mut matches: F) -> Result<Self, E>
    where
        F: FnMut(&P, &I) -> Result<bool, E>,
    {
        let mut graph = Self::empty(patterns.len(), items.len());

        for (p, pattern) in patterns.iter().enumerate() {
            for (i, item) in items.iter().enumerate() {
                if matches(pattern, item)? {
                    graph.add_edge(p, i);
                }
            }
        }

        Ok(graph)
    }

    /// Graph with the given node counts and no edges
    pub fn empty(pattern_count: usize, item_count: usize) -> Self {
        Self {
            pattern_candidates: vec![Vec::new(); pattern_count],
            item_candidates: vec![Vec::new(); item_count],
            edge_count: 0,
        }
    }

    /// Build from an explicit edge list
    ///
    /// # Panics
    ///
    /// Panics if an edge refers to an index outside the given counts
    pub fn from_edges(pattern_count: usize, item_count: usize, edges: &[(usize, usize)]) -> Self {
        let mut graph = Self::empty(pattern_count, item_count);
        let mut sorted = edges.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        for (p, i) in sorted {
            graph.add_edge(p, i);
        }
        graph
    }

    // Callers add edges in ascending (p, i) order, which keeps both
    // adjacency lists sorted without a final sort.
    fn add_edge(&mut self, p: usize, i: usize) {
        self.pattern_candidates[p].push(i);
        self.item_candidates[i].push(p);
        self.edge_count += 1;
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    pub fn pattern_count(&self) -> usize {
        self.pattern_candidates.len()
    }

    #[inline]
    pub fn item_count(&self) -> usize {
        self.item_candidates.len()
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Items matched by pattern `p`, ascending
    #[inline]
    pub fn candidates_for_pattern(&self, p: usize) -> &[usize] {
        &self.pattern_candidates[p]
    }

    /// Patterns matching item `i`, ascending
    #[inline]
    pub fn candidates_for_item(&self, i: usize) -> &[usize] {
        &self.item_candidates[i]
    }

    /// Check whether pattern `p` matches item `i`
    pub fn has_edge(&self, p: usize, i: usize) -> bool {
        self.pattern_candidates
            .get(p)
            .map_or(false, |items| items.binary_search(&i).is_ok())
    }

    /// Iterate over all edges in ascending `(pattern, item)` order
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.pattern_candidates
            .iter()
            .enumerate()
            .flat_map(|(p, items)| items.iter().map(move |&i| (p, i)))
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
