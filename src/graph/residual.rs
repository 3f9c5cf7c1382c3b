//! Mutable working copy of the candidate graph.
//!
//! ## Design
//!
//! A `Residual` holds the patterns and items that are still undecided and
//! the edges between them. Deciding a node (pairing it or declaring it
//! unmatched) removes it together with all of its edges, so the degree of
//! every remaining node always counts its *live* candidates.
//!
//! Both sides are kept in `BTreeMap`s so iteration order, and therefore
//! every choice made by the reducer and the solver, is deterministic.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::graph::CandidateGraph;

/// Undecided part of a candidate graph
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Residual {
    /// Undecided pattern -> live candidate items
    patterns: BTreeMap<usize, BTreeSet<usize>>,

    /// Undecided item -> live candidate patterns
    items: BTreeMap<usize, BTreeSet<usize>>,
}

impl Residual {
    /// Copy every node and edge of `graph`
    pub fn from_graph(graph: &CandidateGraph) -> Self {
        let patterns = (0..graph.pattern_count())
            .map(|p| (p, graph.candidates_for_pattern(p).iter().copied().collect()))
            .collect();
        let items = (0..graph.item_count())
            .map(|i| (i, graph.candidates_for_item(i).iter().copied().collect()))
            .collect();

        Self { patterns, items }
    }

    // ========================================================================
    // Size and Lookup
    // ========================================================================

    /// True when every node has been decided
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty() && self.items.is_empty()
    }

    /// Number of undecided nodes (patterns + items)
    #[inline]
    pub fn len(&self) -> usize {
        self.patterns.len() + self.items.len()
    }

    #[inline]
    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    #[inline]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Undecided pattern indices, ascending
    pub fn patterns(&self) -> impl Iterator<Item = usize> + '_ {
        self.patterns.keys().copied()
    }

    /// Undecided item indices, ascending
    pub fn items(&self) -> impl Iterator<Item = usize> + '_ {
        self.items.keys().copied()
    }

    /// Live candidates of pattern `p` (empty if `p` is decided)
    pub fn pattern_candidates(&self, p: usize) -> impl Iterator<Item = usize> + '_ {
        self.patterns.get(&p).into_iter().flatten().copied()
    }

    /// Live candidates of item `i` (empty if `i` is decided)
    pub fn item_candidates(&self, i: usize) -> impl Iterator<Item = usize> + '_ {
        self.items.get(&i).into_iter().flatten().copied()
    }

    pub fn pattern_degree(&self, p: usize) -> Option<usize> {
        self.patterns.get(&p).map(BTreeSet::len)
    }

    pub fn item_degree(&self, i: usize) -> Option<usize> {
        self.items.get(&i).map(BTreeSet::len)
    }

    /// The sole live candidate of pattern `p`, if it has exactly one
    pub fn sole_item_of(&self, p: usize) -> Option<usize> {
        sole(self.patterns.get(&p)?)
    }

    /// The sole live candidate of item `i`, if it has exactly one
    pub fn sole_pattern_of(&self, i: usize) -> Option<usize> {
        sole(self.items.get(&i)?)
    }

    /// Undecided pattern with the fewest live candidates (lowest index on ties)
    pub fn most_constrained_pattern(&self) -> Option<usize> {
        self.patterns
            .iter()
            .min_by_key(|&(&p, items)| (items.len(), p))
            .map(|(&p, _)| p)
    }

    // ========================================================================
    // Deciding Nodes
    // ========================================================================

    /// Remove pattern `p` and its edges
    ///
    /// # Returns
    ///
    /// The items that lost an edge
    pub fn remove_pattern(&mut self, p: usize) -> Vec<usize> {
        let touched: Vec<usize> = self.patterns.remove(&p).into_iter().flatten().collect();
        for i in &touched {
            if let Some(patterns) = self.items.get_mut(i) {
                patterns.remove(&p);
            }
        }
        touched
    }

    /// Remove item `i` and its edges
    ///
    /// # Returns
    ///
    /// The patterns that lost an edge
    pub fn remove_item(&mut self, i: usize) -> Vec<usize> {
        let touched: Vec<usize> = self.items.remove(&i).into_iter().flatten().collect();
        for p in &touched {
            if let Some(items) = self.patterns.get_mut(p) {
                items.remove(&i);
            }
        }
        touched
    }

    /// Pair pattern `p` with item `i`, removing both
    ///
    /// # Returns
    ///
    /// `(patterns, items)` other than `p` and `i` that lost an edge
    pub fn commit(&mut self, p: usize, i: usize) -> (Vec<usize>, Vec<usize>) {
        let mut items = self.remove_pattern(p);
        items.retain(|&other| other != i);
        let patterns = self.remove_item(i);
        (patterns, items)
    }

    /// Remove every node with no live candidate
    ///
    /// # Returns
    ///
    /// `(patterns, items)` that were removed, ascending
    pub fn take_isolated(&mut self) -> (Vec<usize>, Vec<usize>) {
        let patterns: Vec<usize> = self
            .patterns
            .iter()
            .filter(|(_, items)| items.is_empty())
            .map(|(&p, _)| p)
            .collect();
        let items: Vec<usize> = self
            .items
            .iter()
            .filter(|(_, patterns)| patterns.is_empty())
            .map(|(&i, _)| i)
            .collect();

        for p in &patterns {
            self.patterns.remove(p);
        }
        for i in &items {
            self.items.remove(i);
        }
        (patterns, items)
    }

    // ========================================================================
    // Search Support
    // ========================================================================

    /// Minimum unmatched count of any pairing of this residual
    ///
    /// Equal to `len - 2 * max_matching`, so it accounts for groups of
    /// patterns that can only reach fewer items than they have members.
    pub fn unmatched_lower_bound(&self) -> usize {
        self.len() - 2 * self.max_matching()
    }

    /// Size of a maximum pairing, by augmenting paths
    pub fn max_matching(&self) -> usize {
        let mut owner: BTreeMap<usize, usize> = BTreeMap::new();
        let mut size = 0;

        for &p in self.patterns.keys() {
            let mut visited = BTreeSet::new();
            if self.augment(p, &mut visited, &mut owner) {
                size += 1;
            }
        }
        size
    }

    /// Try to pair `p`, re-pairing earlier owners along the way
    fn augment(&self, p: usize, visited: &mut BTreeSet<usize>, owner: &mut BTreeMap<usize, usize>) -> bool {
        for i in self.pattern_candidates(p) {
            if !visited.insert(i) {
                continue;
            }
            let free = match owner.get(&i).copied() {
                None => true,
                Some(q) => self.augment(q, visited, owner),
            };
            if free {
                owner.insert(i, p);
                return true;
            }
        }
        false
    }

    /// Split into connected components, ordered by smallest pattern index
    ///
    /// Nodes without edges form their own single-node components.
    pub fn components(&self) -> Vec<Residual> {
        let mut seen_patterns = BTreeSet::new();
        let mut seen_items = BTreeSet::new();
        let mut components = Vec::new();

        let starts = self
            .patterns
            .keys()
            .map(|&p| Node::Pattern(p))
            .chain(self.items.keys().map(|&i| Node::Item(i)));

        for start in starts {
            let fresh = match start {
                Node::Pattern(p) => seen_patterns.insert(p),
                Node::Item(i) => seen_items.insert(i),
            };
            if !fresh {
                continue;
            }

            let mut component = Residual::default();
            let mut queue = VecDeque::from([start]);
            while let Some(node) = queue.pop_front() {
                match node {
                    Node::Pattern(p) => {
                        let edges = self.patterns[&p].clone();
                        for &i in &edges {
                            if seen_items.insert(i) {
                                queue.push_back(Node::Item(i));
                            }
                        }
                        component.patterns.insert(p, edges);
                    }
                    Node::Item(i) => {
                        let edges = self.items[&i].clone();
                        for &p in &edges {
                            if seen_patterns.insert(p) {
                                queue.push_back(Node::Pattern(p));
                            }
                        }
                        component.items.insert(i, edges);
                    }
                }
            }
            components.push(component);
        }

        components
    }
}

#[derive(Debug, Clone, Copy)]
enum Node {
    Pattern(usize),
    Item(usize),
}

fn sole(set: &BTreeSet<usize>) -> Option<usize> {
    if set.len() == 1 {
        set.iter().next().copied()
    } else {
        None
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn residual(patterns: usize, items: usize, edges: &[(usize, usize)]) -> Residual {
        Residual::from_graph(&CandidateGraph::from_edges(patterns, items, edges))
    }

    #[test]
    fn test_from_graph() {
        let r = residual(2, 3, &[(0, 0), (0, 1), (1, 1)]);
        assert_eq!(r.len(), 5);
        assert_eq!(r.pattern_degree(0), Some(2));
        assert_eq!(r.item_degree(1), Some(2));
        assert_eq!(r.item_degree(2), Some(0));
        assert_eq!(r.sole_item_of(1), Some(1));
        assert_eq!(r.sole_pattern_of(0), Some(0));
        assert_eq!(r.sole_item_of(0), None);
    }

    #[test]
    fn test_commit_removes_edges() {
        let mut r = residual(2, 2, &[(0, 0), (0, 1), (1, 1)]);
        let (patterns, items) = r.commit(0, 0);

        assert!(patterns.is_empty());
        assert_eq!(items, vec![1]);
        assert_eq!(r.pattern_degree(0), None);
        assert_eq!(r.item_degree(0), None);
        assert_eq!(r.item_degree(1), Some(1));
        assert_eq!(r.len(), 2);
    }

    #[test]
    fn test_take_isolated() {
        let mut r = residual(3, 3, &[(0, 0)]);
        let (patterns, items) = r.take_isolated();
        assert_eq!(patterns, vec![1, 2]);
        assert_eq!(items, vec![1, 2]);
        assert_eq!(r.len(), 2);
    }

    #[test]
    fn test_most_constrained_pattern() {
        let r = residual(3, 3, &[(0, 0), (0, 1), (1, 2), (2, 0), (2, 2)]);
        assert_eq!(r.most_constrained_pattern(), Some(1));
        assert_eq!(Residual::default().most_constrained_pattern(), None);
    }

    #[test]
    fn test_unmatched_lower_bound() {
        // Three patterns all wanting one item: at least 2 unmatched
        let r = residual(3, 1, &[(0, 0), (1, 0), (2, 0)]);
        assert_eq!(r.unmatched_lower_bound(), 2);

        // Perfect matching possible
        let r = residual(2, 2, &[(0, 0), (1, 1)]);
        assert_eq!(r.unmatched_lower_bound(), 0);

        // Isolated nodes always count
        let r = residual(2, 2, &[(0, 0)]);
        assert_eq!(r.unmatched_lower_bound(), 2);
    }

    #[test]
    fn test_lower_bound_sees_hall_shortfall() {
        // p0, p1 and p2 all compete for i0; only p2 can reach i1 or i2
        let r = residual(3, 3, &[(0, 0), (1, 0), (2, 0), (2, 1), (2, 2)]);
        assert_eq!(r.max_matching(), 2);
        assert_eq!(r.unmatched_lower_bound(), 2);
    }

    #[test]
    fn test_max_matching_needs_augmenting_path() {
        // Greedy p0 -> i0 must be undone for p1, whose only candidate is i0
        let r = residual(2, 2, &[(0, 0), (0, 1), (1, 0)]);
        assert_eq!(r.max_matching(), 2);
        assert_eq!(r.unmatched_lower_bound(), 0);
    }

    #[test]
    fn test_components() {
        let r = residual(4, 4, &[(0, 0), (0, 1), (1, 1), (2, 3), (3, 3)]);
        let components = r.components();

        assert_eq!(components.len(), 3);
        assert_eq!(components[0].patterns().collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(components[0].items().collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(components[1].patterns().collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(components[1].items().collect::<Vec<_>>(), vec![3]);
        assert_eq!(components[2].patterns().count(), 0);
        assert_eq!(components[2].items().collect::<Vec<_>>(), vec![2]);

        let total: usize = components.iter().map(Residual::len).sum();
        assert_eq!(total, r.len());
    }
}
